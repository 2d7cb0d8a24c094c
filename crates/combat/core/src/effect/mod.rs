//! Effect system - immutable instructions applied to a combat target.
//!
//! # Architecture
//!
//! This module uses an **Enum + Struct hybrid** approach:
//! - Individual effect types are structs (DamageEffect, ControlEffect, etc.)
//! - [`EffectKind`] wraps them for dispatching
//! - [`Effect`] adds the tags and optional visual that travel with every kind
//!
//! Effects are shared freely between payloads and status definitions; all
//! per-application state lives in [`EffectContext`] and in the returned
//! [`CombatResult`].

mod condition;
mod damage;
mod kinds;
mod modifier;

pub use condition::StatusCondition;
pub use damage::{DamageEffect, DamageType, HealEffect};
pub use kinds::EffectKind;
pub use modifier::{ControlEffect, StatModifierEffect};

use std::fmt;

use crate::result::{CombatResult, ResultKind};
use crate::state::{CombatTarget, EntityId};
use crate::tag::{Tag, TagSet};

/// Handle to a presentation asset played when an effect lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisualId(pub u32);

impl fmt::Display for VisualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "visual#{}", self.0)
    }
}

/// Who applies an effect and how strongly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EffectContext {
    pub source: EntityId,
    /// Multiplier on every magnitude the effect carries.
    pub potency: f32,
}

impl EffectContext {
    pub fn new(source: EntityId) -> Self {
        Self {
            source,
            potency: 1.0,
        }
    }

    /// Builder: set potency.
    pub fn with_potency(mut self, potency: f32) -> Self {
        self.potency = potency;
        self
    }
}

/// Complete effect: what to do, the tags it carries, and how it looks.
#[derive(Clone, Debug, PartialEq)]
pub struct Effect {
    pub kind: EffectKind,
    pub tags: TagSet,
    pub visual: Option<VisualId>,
}

impl Effect {
    pub fn new(kind: impl Into<EffectKind>) -> Self {
        Self {
            kind: kind.into(),
            tags: TagSet::new(),
            visual: None,
        }
    }

    /// Builder: add a tag.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tags.insert(tag);
        self
    }

    /// Builder: replace the tag set.
    pub fn tags(mut self, tags: TagSet) -> Self {
        self.tags = tags;
        self
    }

    /// Builder: attach a visual.
    pub fn visual(mut self, visual: VisualId) -> Self {
        self.visual = Some(visual);
        self
    }

    /// Applies the effect to `target`.
    ///
    /// Returns `None` for kinds that need a status registry (`ApplyStatus`,
    /// `Dispel`); those are routed by the combatant that owns the registry.
    pub fn apply(
        &self,
        target: &mut dyn CombatTarget,
        ctx: &EffectContext,
    ) -> Option<CombatResult> {
        let kind = match &self.kind {
            EffectKind::Damage(effect) => effect.apply(target, ctx.potency),
            EffectKind::Heal(effect) => effect.apply(target, ctx.potency),
            EffectKind::ModifyStat(effect) => effect.apply(target, ctx.potency),
            EffectKind::Control(effect) => effect.apply(target),
            EffectKind::ApplyStatus(_) | EffectKind::Dispel(_) => {
                tracing::debug!(
                    entity = %target.entity(),
                    "effect needs a status registry, skipping direct application"
                );
                return None;
            }
        };

        Some(CombatResult::new(
            ctx.source,
            target.entity(),
            self.tags.clone(),
            kind,
        ))
    }

    /// Effect that undoes `applied`, if this kind is reversible.
    ///
    /// Stat modifiers revert the delta that was actually applied; control
    /// effects toggle engage/release over the same flags. Damage and healing are
    /// never reverted.
    pub fn revert_effect(&self, applied: &CombatResult) -> Option<Effect> {
        let kind = match (&self.kind, &applied.kind) {
            (EffectKind::ModifyStat(effect), ResultKind::StatChange { delta, .. }) => {
                EffectKind::ModifyStat(effect.revert(*delta)?)
            }
            (EffectKind::Control(effect), ResultKind::Control { .. }) => {
                EffectKind::Control(effect.revert())
            }
            _ => return None,
        };

        Some(Effect {
            kind,
            tags: self.tags.clone(),
            visual: None,
        })
    }
}
