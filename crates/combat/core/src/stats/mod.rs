//! Read-only boundary to the attribute/modifier system.
//!
//! The engine never owns attribute formulas. Effect factories read scaled values
//! through [`StatOracle`] at creation time, and [`crate::state::Vitals`] keeps a
//! flat per-target view that status effects can temporarily shift.

/// Attributes the engine reads or temporarily modifies.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    MaxHealth,
    /// Flat mitigation against physical damage.
    Armor,
    /// Outgoing damage multiplier source for effect factories.
    Power,
    /// Flat mitigation against elemental damage.
    Resistance,
    MoveSpeed,
    AttackSpeed,
}

/// Read-only attribute lookup provided by the host's stat system.
pub trait StatOracle {
    /// Returns the current value of `stat`, or `None` if the host does not track it.
    fn stat_value(&self, stat: StatKind) -> Option<f32>;

    /// Returns the value of `stat`, falling back to `default` when untracked.
    fn get_stat_value(&self, stat: StatKind, default: f32) -> f32 {
        self.stat_value(stat).unwrap_or(default)
    }
}

/// Oracle that tracks nothing; every lookup falls back to its default.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoStats;

impl StatOracle for NoStats {
    fn stat_value(&self, _stat: StatKind) -> Option<f32> {
        None
    }
}

impl<S: StatOracle + ?Sized> StatOracle for &S {
    fn stat_value(&self, stat: StatKind) -> Option<f32> {
        (**self).stat_value(stat)
    }
}

/// Magnitude authored for an effect factory.
///
/// Resolved once when the effect is created; the resulting number is frozen
/// into the immutable effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Magnitude {
    /// Fixed value.
    Flat(f32),

    /// `base + stat * ratio`, reading the attacker's stat.
    Scaled {
        base: f32,
        stat: StatKind,
        ratio: f32,
    },
}

impl Magnitude {
    /// Resolves the magnitude against the attacker's stats.
    pub fn resolve(&self, stats: &(impl StatOracle + ?Sized)) -> f32 {
        match *self {
            Self::Flat(value) => value,
            Self::Scaled { base, stat, ratio } => base + stats.get_stat_value(stat, 0.0) * ratio,
        }
    }
}

impl From<f32> for Magnitude {
    fn from(value: f32) -> Self {
        Self::Flat(value)
    }
}
