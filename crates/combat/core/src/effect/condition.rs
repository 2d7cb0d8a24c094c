//! Stop conditions evaluated by condition-gated runners.

use crate::state::{CombatTarget, ControlFlags};
use crate::stats::StatKind;

/// Predicate over the target's current state.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusCondition {
    /// Health fraction (0.0..=1.0) is strictly below the threshold.
    HealthBelow(f32),

    /// Health fraction (0.0..=1.0) is strictly above the threshold.
    HealthAbove(f32),

    StatAtLeast { stat: StatKind, value: f32 },

    StatAtMost { stat: StatKind, value: f32 },

    /// None of the given control flags are held.
    ControlCleared(ControlFlags),

    /// Target has no health left.
    Dead,

    /// All conditions must be true.
    All(Vec<StatusCondition>),

    /// Any condition must be true.
    Any(Vec<StatusCondition>),
}

impl StatusCondition {
    pub fn evaluate(&self, target: &dyn CombatTarget) -> bool {
        match self {
            Self::HealthBelow(threshold) => health_fraction(target) < *threshold,
            Self::HealthAbove(threshold) => health_fraction(target) > *threshold,
            Self::StatAtLeast { stat, value } => target.stat(*stat) >= *value,
            Self::StatAtMost { stat, value } => target.stat(*stat) <= *value,
            Self::ControlCleared(flags) => !target.controls().intersects(*flags),
            Self::Dead => !target.is_alive(),
            Self::All(conditions) => conditions.iter().all(|c| c.evaluate(target)),
            Self::Any(conditions) => conditions.iter().any(|c| c.evaluate(target)),
        }
    }
}

fn health_fraction(target: &dyn CombatTarget) -> f32 {
    let max = target.max_health();
    if max <= 0.0 { 0.0 } else { target.health() / max }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EntityId, Vitals};

    #[test]
    fn health_thresholds_use_fraction() {
        let target = Vitals::new(EntityId(1), 200.0).unwrap().with_health(50.0);
        assert!(StatusCondition::HealthBelow(0.3).evaluate(&target));
        assert!(!StatusCondition::HealthAbove(0.3).evaluate(&target));
        assert!(!StatusCondition::Dead.evaluate(&target));
    }

    #[test]
    fn combinators() {
        let mut target = Vitals::new(EntityId(1), 100.0).unwrap();
        target.engage_control(ControlFlags::ROOTED);

        let cleared = StatusCondition::ControlCleared(ControlFlags::ROOTED);
        assert!(!cleared.evaluate(&target));
        assert!(StatusCondition::Any(vec![cleared.clone(), StatusCondition::HealthAbove(0.5)])
            .evaluate(&target));
        assert!(!StatusCondition::All(vec![cleared, StatusCondition::HealthAbove(0.5)])
            .evaluate(&target));
    }
}
