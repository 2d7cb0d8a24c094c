//! Concrete per-entity combat state.

use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::stats::{StatKind, StatOracle};

use super::EntityId;
use super::target::{CombatTarget, ControlFlags};

/// Health, stats and crowd-control holds of one entity.
///
/// Stats are stored flat: base values come from the host's [`StatOracle`] at
/// construction and status effects shift them through
/// [`CombatTarget::modify_stat`]. No stat is allowed below zero.
#[derive(Clone, Debug, PartialEq)]
pub struct Vitals {
    entity: EntityId,
    health: f32,
    stats: BTreeMap<StatKind, f32>,
    control_holds: [u16; 8],
}

impl Vitals {
    /// Creates vitals at full health.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidVitals`] if `max_health` is not a positive,
    /// finite number.
    pub fn new(entity: EntityId, max_health: f32) -> Result<Self, ConfigError> {
        if !max_health.is_finite() || max_health <= 0.0 {
            return Err(ConfigError::InvalidVitals { entity, max_health });
        }

        let mut stats = BTreeMap::new();
        stats.insert(StatKind::MaxHealth, max_health);

        Ok(Self {
            entity,
            health: max_health,
            stats,
            control_holds: Default::default(),
        })
    }

    /// Creates vitals by reading every tracked stat from the host oracle.
    ///
    /// `MaxHealth` falls back to `default_max_health` when the host does not track it.
    pub fn from_oracle(
        entity: EntityId,
        stats: &(impl StatOracle + ?Sized),
        default_max_health: f32,
    ) -> Result<Self, ConfigError> {
        use strum::IntoEnumIterator;

        let max_health = stats.get_stat_value(StatKind::MaxHealth, default_max_health);
        let mut vitals = Self::new(entity, max_health)?;
        for stat in StatKind::iter().filter(|s| *s != StatKind::MaxHealth) {
            if let Some(value) = stats.stat_value(stat) {
                vitals.stats.insert(stat, value.max(0.0));
            }
        }
        Ok(vitals)
    }

    /// Builder: set a base stat value. Setting `MaxHealth` restores full health.
    pub fn with_stat(mut self, stat: StatKind, value: f32) -> Self {
        if stat == StatKind::MaxHealth {
            let max = value.max(f32::EPSILON);
            self.health = max;
            self.stats.insert(stat, max);
        } else {
            self.stats.insert(stat, value.max(0.0));
        }
        self
    }

    /// Builder: start below full health.
    pub fn with_health(mut self, health: f32) -> Self {
        self.health = health.clamp(0.0, self.max_health());
        self
    }

    /// Number of active holds on a single control flag.
    pub fn control_holds(&self, flag: ControlFlags) -> u16 {
        Self::slot(flag)
            .map(|slot| self.control_holds[slot])
            .unwrap_or(0)
    }

    fn slot(flag: ControlFlags) -> Option<usize> {
        (flag.bits().count_ones() == 1).then(|| flag.bits().trailing_zeros() as usize)
    }
}

/// Current stats double as the attacker's oracle when effect factories scale magnitudes.
impl StatOracle for Vitals {
    fn stat_value(&self, stat: StatKind) -> Option<f32> {
        self.stats.get(&stat).copied()
    }
}

impl CombatTarget for Vitals {
    fn entity(&self) -> EntityId {
        self.entity
    }

    fn health(&self) -> f32 {
        self.health
    }

    fn max_health(&self) -> f32 {
        self.stats.get(&StatKind::MaxHealth).copied().unwrap_or(0.0)
    }

    fn stat(&self, stat: StatKind) -> f32 {
        self.stats.get(&stat).copied().unwrap_or(0.0)
    }

    fn apply_damage(&mut self, amount: f32) -> f32 {
        let dealt = amount.max(0.0).min(self.health);
        self.health -= dealt;
        dealt
    }

    fn heal(&mut self, amount: f32) -> f32 {
        if !self.is_alive() {
            return 0.0;
        }
        let healed = amount.max(0.0).min(self.max_health() - self.health);
        self.health += healed;
        healed
    }

    fn modify_stat(&mut self, stat: StatKind, delta: f32) -> f32 {
        let current = self.stat(stat);
        let floor = if stat == StatKind::MaxHealth {
            f32::EPSILON
        } else {
            0.0
        };
        let updated = (current + delta).max(floor);
        self.stats.insert(stat, updated);

        if stat == StatKind::MaxHealth {
            self.health = self.health.min(updated);
        }

        updated - current
    }

    fn engage_control(&mut self, flags: ControlFlags) -> ControlFlags {
        let mut newly = ControlFlags::empty();
        for flag in flags.iter() {
            if let Some(slot) = Self::slot(flag) {
                if self.control_holds[slot] == 0 {
                    newly |= flag;
                }
                self.control_holds[slot] = self.control_holds[slot].saturating_add(1);
            }
        }
        newly
    }

    fn release_control(&mut self, flags: ControlFlags) -> ControlFlags {
        let mut freed = ControlFlags::empty();
        for flag in flags.iter() {
            if let Some(slot) = Self::slot(flag)
                && self.control_holds[slot] > 0
            {
                self.control_holds[slot] -= 1;
                if self.control_holds[slot] == 0 {
                    freed |= flag;
                }
            }
        }
        freed
    }

    fn controls(&self) -> ControlFlags {
        ControlFlags::all()
            .iter()
            .filter(|flag| self.control_holds(*flag) > 0)
            .fold(ControlFlags::empty(), |acc, flag| acc | flag)
    }
}
