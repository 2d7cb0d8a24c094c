//! Effects that shift stats or crowd-control state and can be undone.

use crate::result::ResultKind;
use crate::state::{CombatTarget, ControlFlags};
use crate::stats::StatKind;

/// Shift a stat by a flat amount.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifierEffect {
    pub stat: StatKind,
    pub amount: f32,
}

impl StatModifierEffect {
    pub fn new(stat: StatKind, amount: f32) -> Self {
        Self { stat, amount }
    }

    pub fn apply(&self, target: &mut dyn CombatTarget, potency: f32) -> ResultKind {
        ResultKind::StatChange {
            stat: self.stat,
            delta: target.modify_stat(self.stat, self.amount * potency),
        }
    }

    /// Inverse of an applied delta. `None` when nothing was applied.
    pub fn revert(&self, applied_delta: f32) -> Option<Self> {
        (applied_delta != 0.0).then(|| Self::new(self.stat, -applied_delta))
    }
}

/// Engage or release crowd control.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ControlEffect {
    pub flags: ControlFlags,
    /// `true` engages the flags, `false` releases one hold on each.
    pub engage: bool,
}

impl ControlEffect {
    pub fn engage(flags: ControlFlags) -> Self {
        Self {
            flags,
            engage: true,
        }
    }

    pub fn release(flags: ControlFlags) -> Self {
        Self {
            flags,
            engage: false,
        }
    }

    pub fn apply(&self, target: &mut dyn CombatTarget) -> ResultKind {
        let flags = if self.engage {
            target.engage_control(self.flags)
        } else {
            target.release_control(self.flags)
        };
        ResultKind::Control {
            flags,
            engaged: self.engage,
        }
    }

    /// Toggles engage/release over the same flags.
    pub fn revert(&self) -> Self {
        Self {
            flags: self.flags,
            engage: !self.engage,
        }
    }
}
