use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chimera_core::Wheel;
use serde::{Deserialize, Serialize};

/// Environment variable naming a config file when `--config` is absent.
pub const CONFIG_ENV: &str = "CHIMERA_CONFIG";

/// Settings read from a TOML file. Every field is optional; command-line
/// flags override whatever is set here.
///
/// ```toml
/// wheel = 210
///
/// [primes]
/// limit = 100000
///
/// [fixture]
/// seed = 7
/// count = 32
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub wheel: Wheel,
    pub primes: PrimesConfig,
    pub fixture: FixtureConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PrimesConfig {
    pub limit: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FixtureConfig {
    pub seed: u64,
    pub count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            wheel: Wheel::W30,
            primes: PrimesConfig::default(),
            fixture: FixtureConfig::default(),
        }
    }
}

impl Default for PrimesConfig {
    fn default() -> Self {
        Self { limit: 1000 }
    }
}

impl Default for FixtureConfig {
    fn default() -> Self {
        Self { seed: 42, count: 16 }
    }
}

impl Config {
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("invalid config")
    }

    /// Load from `explicit`, else from `$CHIMERA_CONFIG`, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            tracing::debug!("no config file, using defaults");
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config =
            Self::parse(&content).with_context(|| format!("in config {}", path.display()))?;
        tracing::debug!("loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_default() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::parse("wheel = 210\n[fixture]\nseed = 9\n").unwrap();
        assert_eq!(config.wheel, Wheel::W210);
        assert_eq!(config.fixture.seed, 9);
        assert_eq!(config.fixture.count, 16);
        assert_eq!(config.primes.limit, 1000);
    }

    #[test]
    fn test_rejects_unknown_wheel() {
        let err = Config::parse("wheel = 7").unwrap_err();
        assert!(format!("{err:#}").contains("unsupported wheel modulus"), "{err:#}");
    }

    #[test]
    fn test_rejects_unknown_keys() {
        assert!(Config::parse("[primes]\nlimt = 5\n").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("chimera.toml");
        std::fs::write(&path, "[primes]\nlimit = 50\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.primes.limit, 50);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
