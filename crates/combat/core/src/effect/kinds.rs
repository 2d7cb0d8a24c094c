//! Effect kind enum - wraps all effect types for dispatch.

use std::sync::Arc;

use crate::status::StatusSpec;
use crate::tag::Category;

use super::{ControlEffect, DamageEffect, HealEffect, StatModifierEffect};

/// Every instruction an [`super::Effect`] can carry.
///
/// Health, stat and control kinds are applied directly to a
/// [`crate::state::CombatTarget`]. `ApplyStatus` and `Dispel` need the target's
/// status registry and are routed by [`crate::combatant::Combatant`].
#[derive(Clone, Debug, PartialEq)]
pub enum EffectKind {
    Damage(DamageEffect),

    Heal(HealEffect),

    ModifyStat(StatModifierEffect),

    Control(ControlEffect),

    /// Start a status runner built from the shared definition.
    ApplyStatus(Arc<StatusSpec>),

    /// Force-stop every runner carrying the category (hierarchy-aware).
    Dispel(Category),
}

impl From<DamageEffect> for EffectKind {
    fn from(effect: DamageEffect) -> Self {
        Self::Damage(effect)
    }
}

impl From<HealEffect> for EffectKind {
    fn from(effect: HealEffect) -> Self {
        Self::Heal(effect)
    }
}

impl From<StatModifierEffect> for EffectKind {
    fn from(effect: StatModifierEffect) -> Self {
        Self::ModifyStat(effect)
    }
}

impl From<ControlEffect> for EffectKind {
    fn from(effect: ControlEffect) -> Self {
        Self::Control(effect)
    }
}
