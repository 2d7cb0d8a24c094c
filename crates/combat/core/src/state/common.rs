use std::cmp::Ordering;
use std::fmt;

/// Unique identifier for any entity that can deal or receive combat effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Reserved identifier for effects that have no attacker (environment, scripted
    /// hazards, status runners whose source has been despawned).
    pub const ENVIRONMENT: Self = Self(u32::MAX);

    /// Returns true if this entity represents the environment rather than a combatant.
    #[inline]
    pub const fn is_environment(self) -> bool {
        self.0 == Self::ENVIRONMENT.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_environment() {
            write!(f, "#env")
        } else {
            write!(f, "#{}", self.0)
        }
    }
}

/// Discrete simulation step counter (one per physics step of the host).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FrameId(pub u64);

impl FrameId {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the frame `ticks` steps before this one, saturating at zero.
    pub fn saturating_back(self, ticks: u64) -> Self {
        Self(self.0.saturating_sub(ticks))
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::ops::Add<u64> for FrameId {
    type Output = FrameId;
    fn add(self, rhs: u64) -> FrameId {
        FrameId(self.0 + rhs)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Continuous combat clock in seconds, independent of frame rate.
///
/// Ordered with [`f64::total_cmp`] so it can key ordered maps.
#[derive(Clone, Copy, Debug, Default)]
pub struct CombatTime(pub f64);

impl CombatTime {
    pub const ZERO: Self = Self(0.0);

    pub fn seconds(self) -> f64 {
        self.0
    }

    /// Returns this time moved back by `seconds`, never below zero.
    pub fn saturating_back(self, seconds: f64) -> Self {
        Self((self.0 - seconds).max(0.0))
    }
}

impl PartialEq for CombatTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.total_cmp(&other.0) == Ordering::Equal
    }
}

impl Eq for CombatTime {}

impl PartialOrd for CombatTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CombatTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::ops::Add<f64> for CombatTime {
    type Output = CombatTime;
    fn add(self, rhs: f64) -> CombatTime {
        CombatTime(self.0 + rhs)
    }
}

impl fmt::Display for CombatTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.0)
    }
}

/// Handle of a runner admitted into a [`crate::status::StatusRegistry`].
///
/// Ids are assigned at admission and never reused by the same registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RunnerId(pub u64);

impl fmt::Display for RunnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "runner#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combat_time_orders_totally() {
        let mut times = vec![CombatTime(1.5), CombatTime(0.0), CombatTime(0.25)];
        times.sort();
        assert_eq!(times, vec![CombatTime(0.0), CombatTime(0.25), CombatTime(1.5)]);
    }

    #[test]
    fn frame_saturates_at_zero() {
        assert_eq!(FrameId(3).saturating_back(5), FrameId::ZERO);
        assert_eq!(FrameId(4).saturating_back(2), FrameId(2));
    }
}
