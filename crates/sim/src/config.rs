//! Scenario configuration: file content plus environment overrides.
use std::env;

use combat_core::CombatConfig;

/// Applies environment overrides on top of loaded configuration.
///
/// Environment variables:
/// - `COMBAT_LOG_RETENTION_TICKS` - Frames kept by the combat log (0 = unbounded)
/// - `COMBAT_LOG_RETENTION_SECONDS` - Seconds kept by the combat log (0 = unbounded)
/// - `COMBAT_FIXED_TIMESTEP` - Simulation step in seconds
pub fn apply_env_overrides(config: &mut CombatConfig) {
    if let Some(ticks) = read_env::<u64>("COMBAT_LOG_RETENTION_TICKS") {
        config.log_retention_ticks = ticks;
    }

    if let Some(seconds) = read_env::<f64>("COMBAT_LOG_RETENTION_SECONDS") {
        config.log_retention_seconds = seconds.max(0.0);
    }

    if let Some(step) = read_env::<f32>("COMBAT_FIXED_TIMESTEP") {
        if step.is_finite() && step > 0.0 {
            config.fixed_timestep = step;
        } else {
            tracing::warn!(step, "ignoring non-positive COMBAT_FIXED_TIMESTEP");
        }
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
