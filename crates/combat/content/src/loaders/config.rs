//! Combat configuration loader.

use std::path::Path;

use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for engine configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    ///
    /// Missing keys keep their [`CombatConfig::default`] values.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the TOML file containing a CombatConfig
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML text.
    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if !(config.fixed_timestep.is_finite() && config.fixed_timestep > 0.0) {
            anyhow::bail!(
                "fixed_timestep must be a positive number of seconds, got {}",
                config.fixed_timestep
            );
        }
        if config.log_retention_seconds < 0.0 {
            anyhow::bail!(
                "log_retention_seconds cannot be negative, got {}",
                config.log_retention_seconds
            );
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "log_retention_ticks = 120").unwrap();

        let config = ConfigLoader::load(file.path()).unwrap();
        assert_eq!(config.log_retention_ticks, 120);
        assert_eq!(
            config.log_retention_seconds,
            CombatConfig::DEFAULT_LOG_RETENTION_SECONDS
        );
        assert_eq!(config.fixed_timestep, CombatConfig::DEFAULT_FIXED_TIMESTEP);
    }

    #[test]
    fn rejects_zero_timestep() {
        let err = ConfigLoader::parse("fixed_timestep = 0.0").unwrap_err();
        assert!(err.to_string().contains("fixed_timestep"));
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let err = ConfigLoader::load(&path).unwrap_err();
        assert!(err.to_string().contains("absent.toml"));
    }
}
