//! Common error infrastructure for combat-core.
//!
//! Pure evaluation (stack policies, interaction matching, duration math) is
//! total and never fails. Errors only exist at the configuration boundary
//! (building combatants, vitals) and for explicit runner lookups. Admission
//! rejection is a normal `false` return, not an error.

use crate::state::{EntityId, RunnerId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Recoverable error - the caller can continue with the next operation.
    ///
    /// Examples: runner already finished, status not found
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: non-positive max health
    Validation,

    /// Fatal error - the component must not be activated.
    ///
    /// Examples: combatant built without an interaction registry
    Fatal,
}

impl ErrorSeverity {
    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common interface for all combat-core error types.
pub trait CombatError: std::error::Error {
    fn severity(&self) -> ErrorSeverity;
}

/// Missing or invalid configuration detected while wiring a component.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// A combatant cannot resolve interactions without a rule registry.
    #[error("combatant {entity} has no interaction registry")]
    MissingInteractions { entity: EntityId },

    /// A combatant cannot receive effects without target state.
    #[error("combatant {entity} has no vitals")]
    MissingVitals { entity: EntityId },

    #[error("vitals for {entity} have invalid max health {max_health}")]
    InvalidVitals { entity: EntityId, max_health: f32 },

    /// Vitals were built for a different entity than the combatant.
    #[error("vitals belong to {vitals} but combatant is {entity}")]
    EntityMismatch { entity: EntityId, vitals: EntityId },
}

impl CombatError for ConfigError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::InvalidVitals { .. } => ErrorSeverity::Validation,
            Self::MissingInteractions { .. }
            | Self::MissingVitals { .. }
            | Self::EntityMismatch { .. } => ErrorSeverity::Fatal,
        }
    }
}

/// Errors from explicit runner operations on a status registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StatusError {
    /// The runner was never admitted or has already been removed.
    #[error("{0} is not active")]
    RunnerNotActive(RunnerId),

    /// The runner's variant does not support the requested operation.
    #[error("{runner} does not support {operation}")]
    Unsupported {
        runner: RunnerId,
        operation: &'static str,
    },
}

impl CombatError for StatusError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }
}
