/// Combat engine configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Frames of history the combat log keeps before pruning (0 = keep everything).
    pub log_retention_ticks: u64,

    /// Seconds of combat time the combat log keeps before pruning (0 = keep everything).
    pub log_retention_seconds: f64,

    /// Simulation step in seconds used by hosts that drive the engine at a fixed rate.
    pub fixed_timestep: f32,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_TAGS_PER_EFFECT: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_LOG_RETENTION_TICKS: u64 = 600;
    pub const DEFAULT_LOG_RETENTION_SECONDS: f64 = 10.0;
    pub const DEFAULT_FIXED_TIMESTEP: f32 = 1.0 / 60.0;

    pub fn new() -> Self {
        Self {
            log_retention_ticks: Self::DEFAULT_LOG_RETENTION_TICKS,
            log_retention_seconds: Self::DEFAULT_LOG_RETENTION_SECONDS,
            fixed_timestep: Self::DEFAULT_FIXED_TIMESTEP,
        }
    }

    /// Configuration that never prunes the combat log.
    pub fn unbounded() -> Self {
        Self {
            log_retention_ticks: 0,
            log_retention_seconds: 0.0,
            ..Self::new()
        }
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
