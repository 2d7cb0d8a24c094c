//! The mutable surface an effect is allowed to touch.

use bitflags::bitflags;

use crate::stats::StatKind;

use super::EntityId;

bitflags! {
    /// Crowd-control states a target can be held in.
    ///
    /// Each flag is reference counted by the target so overlapping sources
    /// (two stuns from different runners) release independently.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    #[cfg_attr(feature = "serde", serde(transparent))]
    pub struct ControlFlags: u8 {
        const STUNNED  = 1 << 0;
        const ROOTED   = 1 << 1;
        const SILENCED = 1 << 2;
        const DISARMED = 1 << 3;
    }
}

/// State of an entity that effects apply to.
///
/// Every mutator returns the amount that was actually applied so results and
/// revert effects describe what really happened, not what was requested.
pub trait CombatTarget {
    fn entity(&self) -> EntityId;

    fn health(&self) -> f32;

    fn max_health(&self) -> f32;

    fn is_alive(&self) -> bool {
        self.health() > 0.0
    }

    /// Current value of a tracked stat (base plus active modifiers).
    fn stat(&self, stat: StatKind) -> f32;

    /// Reduces health by `amount`, returning the damage actually dealt.
    fn apply_damage(&mut self, amount: f32) -> f32;

    /// Restores health by `amount`, returning the healing actually done.
    fn heal(&mut self, amount: f32) -> f32;

    /// Shifts a stat by `delta`, returning the delta actually applied.
    fn modify_stat(&mut self, stat: StatKind, delta: f32) -> f32;

    /// Engages control flags, returning the flags that were newly engaged.
    fn engage_control(&mut self, flags: ControlFlags) -> ControlFlags;

    /// Releases one hold on each flag, returning the flags that became free.
    fn release_control(&mut self, flags: ControlFlags) -> ControlFlags;

    /// Flags currently held by at least one source.
    fn controls(&self) -> ControlFlags;
}
