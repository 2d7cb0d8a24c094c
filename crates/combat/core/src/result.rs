//! Immutable records of what an effect actually did.

use crate::effect::DamageType;
use crate::state::{ControlFlags, EntityId, RunnerId};
use crate::stats::StatKind;
use crate::tag::TagSet;

/// Outcome of one applied effect or one status lifecycle transition.
///
/// Results are snapshots: they never reference runners, only identities.
#[derive(Clone, Debug, PartialEq)]
pub struct CombatResult {
    pub source: EntityId,
    pub target: EntityId,
    pub tags: TagSet,
    pub kind: ResultKind,
}

/// Kind-specific payload of a [`CombatResult`].
///
/// [`ResultCategory`] is the field-less discriminant used to index and query the
/// combat log.
#[derive(Clone, Debug, PartialEq, strum::EnumDiscriminants)]
#[strum_discriminants(name(ResultCategory))]
#[strum_discriminants(derive(Hash, PartialOrd, Ord, strum::Display, strum::EnumIter))]
pub enum ResultKind {
    /// Health removed after mitigation.
    Damage {
        amount: f32,
        damage_type: DamageType,
        /// The hit brought the target to zero health.
        lethal: bool,
    },

    Heal { amount: f32 },

    /// A status runner was admitted.
    StatusApplied { status: String, runner: RunnerId },

    /// A status runner finished and was removed.
    StatusExpired {
        status: String,
        runner: RunnerId,
        was_dispelled: bool,
    },

    /// Delta actually applied to a stat.
    StatChange { stat: StatKind, delta: f32 },

    /// Crowd control engaged or released; `flags` are the flags that changed state.
    Control { flags: ControlFlags, engaged: bool },

    Generic { label: String },
}

impl CombatResult {
    pub fn new(source: EntityId, target: EntityId, tags: TagSet, kind: ResultKind) -> Self {
        Self {
            source,
            target,
            tags,
            kind,
        }
    }

    pub fn category(&self) -> ResultCategory {
        ResultCategory::from(&self.kind)
    }

    /// Amount of health removed, or zero for non-damage results.
    pub fn damage(&self) -> f32 {
        match self.kind {
            ResultKind::Damage { amount, .. } => amount,
            _ => 0.0,
        }
    }
}
