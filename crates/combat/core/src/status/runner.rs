//! Per-instance status state machine: `Pending -> Active -> Finished`.

use std::sync::Arc;

use bitflags::bitflags;

use crate::effect::{Effect, EffectContext};
use crate::result::CombatResult;
use crate::state::{CombatTarget, EntityId, RunnerId};
use crate::tag::TagSet;

use super::spec::{StatusSpec, StatusSpecKind};
use super::timer::{IntervalTimer, Timer};

bitflags! {
    /// Operations a runner variant supports. Unsupported operations are no-ops.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct RunnerCapabilities: u8 {
        /// Applies a periodic tick effect.
        const TICKABLE         = 1 << 0;
        /// Remaining duration can be reduced, extended or set.
        const DURATION_MUTABLE = 1 << 1;
        /// Can absorb an overflowing stack by refreshing its duration.
        const REFRESHABLE      = 1 << 2;
        /// Potency can be multiplied after admission.
        const AMPLIFIABLE      = 1 << 3;
        /// The start effect is undone on finish.
        const REVERTIBLE       = 1 << 4;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum RunnerState {
    Pending,
    Active,
    Finished,
}

/// Mutation of a runner's remaining duration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DurationChange {
    Reduce(f32),
    Extend(f32),
    Set(f32),
}

/// Timed instance of a [`StatusSpec`] attached to one target.
///
/// Created `Pending`, activated by [`super::StatusRegistry`] on admission, and
/// finished exactly once. Every effect it applies is pushed to the `out` buffer
/// passed by the registry.
#[derive(Clone, Debug)]
pub struct StatusRunner {
    spec: Arc<StatusSpec>,
    source: EntityId,
    id: Option<RunnerId>,
    state: RunnerState,
    potency: f32,
    timer: Option<Timer>,
    interval: Option<IntervalTimer>,
    applied_start: Option<CombatResult>,
    fired: bool,
    was_dispelled: bool,
}

impl StatusRunner {
    pub fn new(spec: Arc<StatusSpec>, source: EntityId) -> Self {
        let (timer, interval) = match &spec.kind {
            StatusSpecKind::Duration { duration } => (Some(Timer::new(*duration)), None),
            StatusSpecKind::Tick { duration, interval } => (
                Some(Timer::new(*duration)),
                Some(IntervalTimer::new(*interval)),
            ),
            StatusSpecKind::Delayed { delay } => (Some(Timer::new(*delay)), None),
            StatusSpecKind::Condition { interval, .. } => (None, Some(IntervalTimer::new(*interval))),
        };

        Self {
            spec,
            source,
            id: None,
            state: RunnerState::Pending,
            potency: 1.0,
            timer,
            interval,
            applied_start: None,
            fired: false,
            was_dispelled: false,
        }
    }

    /// Builder: set initial potency.
    pub fn with_potency(mut self, potency: f32) -> Self {
        self.potency = potency;
        self
    }

    /// Assigned on admission; `None` while pending.
    pub fn id(&self) -> Option<RunnerId> {
        self.id
    }

    pub fn spec(&self) -> &Arc<StatusSpec> {
        &self.spec
    }

    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn tags(&self) -> &TagSet {
        &self.spec.tags
    }

    pub fn source(&self) -> EntityId {
        self.source
    }

    pub fn state(&self) -> RunnerState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.state == RunnerState::Active
    }

    pub fn is_finished(&self) -> bool {
        self.state == RunnerState::Finished
    }

    pub fn was_dispelled(&self) -> bool {
        self.was_dispelled
    }

    pub fn potency(&self) -> f32 {
        self.potency
    }

    pub fn capabilities(&self) -> RunnerCapabilities {
        self.spec.capabilities()
    }

    pub fn supports(&self, capability: RunnerCapabilities) -> bool {
        self.capabilities().contains(capability)
    }

    /// Remaining duration (or delay) in seconds; `None` for untimed runners.
    pub fn remaining(&self) -> Option<f32> {
        self.timer.as_ref().map(Timer::remaining)
    }

    fn context(&self) -> EffectContext {
        EffectContext::new(self.source).with_potency(self.potency)
    }

    fn apply(
        &self,
        effect: &Effect,
        ctx: &EffectContext,
        target: &mut dyn CombatTarget,
        out: &mut Vec<CombatResult>,
    ) -> Option<CombatResult> {
        let result = effect.apply(target, ctx)?;
        out.push(result.clone());
        Some(result)
    }

    /// `Pending -> Active`: applies the start effect.
    ///
    /// Runners with a non-positive duration, or a delay that already elapsed,
    /// finish before returning.
    pub fn activate(&mut self, id: RunnerId, target: &mut dyn CombatTarget, out: &mut Vec<CombatResult>) {
        if self.state != RunnerState::Pending {
            tracing::debug!(runner = %id, state = %self.state, "activate on non-pending runner ignored");
            return;
        }
        self.id = Some(id);
        self.state = RunnerState::Active;

        let ctx = self.context();
        if let Some(effect) = &self.spec.on_start {
            let applied = self.apply(effect, &ctx, target, out);
            if self.supports(RunnerCapabilities::REVERTIBLE) {
                self.applied_start = applied;
            }
        }

        if self.timer.as_ref().is_some_and(Timer::is_expired) {
            if matches!(self.spec.kind, StatusSpecKind::Delayed { .. }) {
                self.fire(target, out);
            }
            self.finish(false, target, out);
        }
    }

    /// Advances timers by `dt`. Ticking a runner that is not active is ignored.
    pub fn tick(&mut self, dt: f32, target: &mut dyn CombatTarget, out: &mut Vec<CombatResult>) {
        if !self.is_active() {
            tracing::debug!(status = %self.spec.name, state = %self.state, "tick on inactive runner ignored");
            return;
        }

        let spec = Arc::clone(&self.spec);
        match &spec.kind {
            StatusSpecKind::Duration { .. } => {
                if self.advance_timer(dt) {
                    self.finish(false, target, out);
                }
            }
            StatusSpecKind::Tick { .. } => {
                // Time past expiry never produces ticks.
                let step = self.remaining().map_or(dt, |r| dt.min(r));
                let ticks = self.interval.as_mut().map_or(0, |i| i.advance(step));
                self.apply_ticks(ticks, target, out);
                if self.advance_timer(dt) {
                    self.finish(false, target, out);
                }
            }
            StatusSpecKind::Delayed { .. } => {
                if self.advance_timer(dt) {
                    self.fire(target, out);
                    self.finish(false, target, out);
                }
            }
            StatusSpecKind::Condition { condition, .. } => {
                let ticks = self.interval.as_mut().map_or(0, |i| i.advance(dt));
                let ctx = self.context();
                for _ in 0..ticks {
                    if let Some(effect) = &spec.on_tick {
                        self.apply(effect, &ctx, target, out);
                    }
                    if condition.evaluate(target) {
                        if let Some(effect) = &spec.on_end {
                            self.apply(effect, &ctx, target, out);
                        }
                        self.finish(false, target, out);
                        break;
                    }
                }
            }
        }
    }

    fn advance_timer(&mut self, dt: f32) -> bool {
        self.timer.as_mut().is_some_and(|timer| timer.advance(dt))
    }

    fn apply_ticks(&self, ticks: u32, target: &mut dyn CombatTarget, out: &mut Vec<CombatResult>) {
        let Some(effect) = &self.spec.on_tick else {
            return;
        };
        let ctx = self.context();
        for _ in 0..ticks {
            self.apply(effect, &ctx, target, out);
        }
    }

    fn fire(&mut self, target: &mut dyn CombatTarget, out: &mut Vec<CombatResult>) {
        if self.fired {
            return;
        }
        self.fired = true;
        if let Some(effect) = &self.spec.on_end {
            let ctx = self.context();
            self.apply(effect, &ctx, target, out);
        }
    }

    /// `Active -> Finished`: runs end side effects once.
    ///
    /// Returns false (and does nothing) if the runner was already finished.
    pub fn finish(
        &mut self,
        was_dispelled: bool,
        target: &mut dyn CombatTarget,
        out: &mut Vec<CombatResult>,
    ) -> bool {
        match self.state {
            RunnerState::Finished => {
                tracing::debug!(status = %self.spec.name, "stop on finished runner ignored");
                return false;
            }
            RunnerState::Pending => {
                self.state = RunnerState::Finished;
                self.was_dispelled = was_dispelled;
                return true;
            }
            RunnerState::Active => {}
        }

        // Mark first so effects applied below can never re-enter.
        self.state = RunnerState::Finished;
        self.was_dispelled = was_dispelled;

        let spec = Arc::clone(&self.spec);
        match spec.kind {
            StatusSpecKind::Duration { .. } | StatusSpecKind::Tick { .. } => {
                let ctx = self.context();
                if let Some(effect) = &spec.on_end {
                    self.apply(effect, &ctx, target, out);
                }
                if let (Some(effect), Some(applied)) = (&spec.on_start, self.applied_start.take())
                    && let Some(revert) = effect.revert_effect(&applied)
                {
                    self.apply(&revert, &EffectContext::new(self.source), target, out);
                }
            }
            StatusSpecKind::Delayed { .. } => self.fire(target, out),
            StatusSpecKind::Condition { .. } => {}
        }

        self.timer = None;
        self.interval = None;
        tracing::debug!(status = %self.spec.name, was_dispelled, "runner finished");
        true
    }

    /// Changes the remaining duration. Reaching zero finishes the runner as dispelled.
    ///
    /// Returns false without mutating if the runner is not active or not
    /// `DURATION_MUTABLE`.
    pub fn modify_duration(
        &mut self,
        change: DurationChange,
        target: &mut dyn CombatTarget,
        out: &mut Vec<CombatResult>,
    ) -> bool {
        if !self.is_active() || !self.supports(RunnerCapabilities::DURATION_MUTABLE) {
            return false;
        }
        let Some(timer) = self.timer.as_mut() else {
            return false;
        };

        match change {
            DurationChange::Reduce(seconds) => timer.add(-seconds),
            DurationChange::Extend(seconds) => timer.add(seconds),
            DurationChange::Set(seconds) => timer.set(seconds),
        }

        if timer.is_expired() {
            self.finish(true, target, out);
        }
        true
    }

    /// Sets the remaining duration after an overflowing stack was absorbed.
    pub fn refresh(&mut self, duration: f32) -> bool {
        if !self.is_active() || !self.supports(RunnerCapabilities::REFRESHABLE) {
            return false;
        }
        match self.timer.as_mut() {
            Some(timer) => {
                timer.set(duration);
                true
            }
            None => false,
        }
    }

    /// Multiplies potency for every effect applied from now on.
    pub fn amplify(&mut self, factor: f32) -> bool {
        if !self.is_active() || !self.supports(RunnerCapabilities::AMPLIFIABLE) {
            return false;
        }
        self.potency *= factor;
        true
    }
}
