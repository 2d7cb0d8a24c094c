//! Countdown and periodic timers advanced by frame delta.

/// Slack applied when comparing accumulated float time against a boundary.
///
/// Twenty steps of 0.1 s do not sum to exactly 2.0 in `f32`.
pub const TIMER_EPSILON: f32 = 1e-4;

/// Countdown to zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timer {
    remaining: f32,
}

impl Timer {
    pub fn new(seconds: f32) -> Self {
        Self { remaining: seconds }
    }

    /// Remaining seconds; zero once expired.
    pub fn remaining(&self) -> f32 {
        if self.is_expired() { 0.0 } else { self.remaining }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining <= TIMER_EPSILON
    }

    /// Advances by `dt`, returning true if the timer is expired afterwards.
    pub fn advance(&mut self, dt: f32) -> bool {
        self.remaining -= dt.max(0.0);
        self.is_expired()
    }

    pub fn set(&mut self, seconds: f32) {
        self.remaining = seconds;
    }

    pub fn add(&mut self, seconds: f32) {
        self.remaining += seconds;
    }
}

/// Fires once per `interval` of accumulated time.
///
/// An interval at or below [`TIMER_EPSILON`] fires exactly once per advance
/// (every frame).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IntervalTimer {
    interval: f32,
    accumulated: f32,
}

impl IntervalTimer {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            accumulated: 0.0,
        }
    }

    pub fn interval(&self) -> f32 {
        self.interval
    }

    /// Advances by `dt`, returning how many intervals elapsed.
    pub fn advance(&mut self, dt: f32) -> u32 {
        if self.interval.is_nan() || self.interval <= TIMER_EPSILON {
            return 1;
        }

        self.accumulated += dt.max(0.0);
        let periods = ((self.accumulated + TIMER_EPSILON) / self.interval).floor();
        if periods < 1.0 {
            return 0;
        }
        self.accumulated = (self.accumulated - periods * self.interval).max(0.0);
        periods as u32
    }
}
