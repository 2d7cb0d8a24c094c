//! Combat status and effect resolution.
//!
//! `combat-core` decides what happens when effects land on a target: immediate
//! effects are applied to the target's [`Vitals`], statuses become timed
//! [`StatusRunner`]s whose admission is governed by tag [`StackPolicy`]s and
//! category [`InteractionRegistry`] rules, and every outcome is published as a
//! [`CombatResult`] that a [`CombatLog`] can index for same-frame and windowed
//! queries. The crate is pure and single-threaded; hosts drive it by calling
//! [`Combatant::tick`] and [`CombatLog::advance`] once per step.
pub mod combat_log;
pub mod combatant;
pub mod config;
pub mod effect;
pub mod error;
pub mod interaction;
pub mod result;
pub mod state;
pub mod stats;
pub mod status;
pub mod tag;

pub use combat_log::{CombatLog, LogEntry};
pub use combatant::{
    CombatListener, CombatSinks, Combatant, CombatantBuilder, HitOutcome, Payload,
    VisualController,
};
pub use config::CombatConfig;
pub use effect::{
    ControlEffect, DamageEffect, DamageType, Effect, EffectContext, EffectKind, HealEffect,
    StatModifierEffect, StatusCondition, VisualId,
};
pub use error::{CombatError, ConfigError, ErrorSeverity, StatusError};
pub use interaction::{CategoryInteraction, InteractionKind, InteractionRegistry};
pub use result::{CombatResult, ResultCategory, ResultKind};
pub use state::{CombatTarget, CombatTime, ControlFlags, EntityId, FrameId, RunnerId, Vitals};
pub use stats::{Magnitude, NoStats, StatKind, StatOracle};
pub use status::{
    Admission, DurationChange, RunnerCapabilities, RunnerState, StatusEvent, StatusRegistry,
    StatusRunner, StatusSpec, StatusSpecKind, TIMER_EPSILON,
};
pub use tag::{
    Category, DurationBehavior, OverflowBehavior, StackPolicy, StackPolicyResult, Tag, TagBuilder,
    TagSet,
};
