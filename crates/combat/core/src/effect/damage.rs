//! Health effects: damage with mitigation and healing.

use crate::result::ResultKind;
use crate::state::CombatTarget;
use crate::stats::StatKind;

/// How damage is mitigated by the target.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    /// Mitigated by armor.
    #[default]
    Physical,
    /// Mitigated by resistance.
    Elemental,
    /// Never mitigated.
    True,
}

impl DamageType {
    /// Stat that mitigates this damage type, if any.
    pub fn mitigating_stat(self) -> Option<StatKind> {
        match self {
            Self::Physical => Some(StatKind::Armor),
            Self::Elemental => Some(StatKind::Resistance),
            Self::True => None,
        }
    }

    /// Applies `raw * 100 / (100 + mitigation)`.
    pub fn mitigate(self, raw: f32, target: &dyn CombatTarget) -> f32 {
        match self.mitigating_stat() {
            Some(stat) => raw * 100.0 / (100.0 + target.stat(stat).max(0.0)),
            None => raw,
        }
    }
}

/// Deal damage to the target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageEffect {
    pub amount: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub damage_type: DamageType,
}

impl DamageEffect {
    pub fn new(amount: f32, damage_type: DamageType) -> Self {
        Self {
            amount,
            damage_type,
        }
    }

    pub fn apply(&self, target: &mut dyn CombatTarget, potency: f32) -> ResultKind {
        let planned = self.damage_type.mitigate(self.amount * potency, target);
        let was_alive = target.is_alive();
        let amount = target.apply_damage(planned);

        ResultKind::Damage {
            amount,
            damage_type: self.damage_type,
            lethal: was_alive && !target.is_alive(),
        }
    }
}

/// Restore health to the target.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealEffect {
    pub amount: f32,
}

impl HealEffect {
    pub fn new(amount: f32) -> Self {
        Self { amount }
    }

    pub fn apply(&self, target: &mut dyn CombatTarget, potency: f32) -> ResultKind {
        ResultKind::Heal {
            amount: target.heal(self.amount * potency),
        }
    }
}
