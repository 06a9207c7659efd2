//! Configuration file for the CLI.
//!
//! A TOML file with three tables: `[defaults]` for the strategy parameters
//! used when a flag is omitted, `[policy]` for the engine policy and
//! `[cache]` for live quote caching.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use pledge_core::{PolicyConfig, DEFAULT_REINVESTMENT_SYMBOL};

use crate::error::{CliError, CliResult};

/// Strategy defaults, in percent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyDefaults {
    pub loan_rate_pct: Decimal,
    pub ltv_pct: Decimal,
    pub dividend_yield_pct: Decimal,
    pub growth_pct: Decimal,
    pub reinvest_symbol: String,
}

impl Default for StrategyDefaults {
    fn default() -> Self {
        Self {
            loan_rate_pct: dec!(2.58),
            ltv_pct: dec!(50),
            dividend_yield_pct: dec!(6),
            growth_pct: dec!(12),
            reinvest_symbol: DEFAULT_REINVESTMENT_SYMBOL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Validity of a live quote, in seconds.
    pub ttl_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self { ttl_secs: 600 }
    }
}

impl CacheSettings {
    #[cfg_attr(not(feature = "yahoo"), allow(dead_code))]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: StrategyDefaults,
    pub policy: PolicyConfig,
    pub cache: CacheSettings,
}

impl AppConfig {
    /// Loads the file at `path`, or the defaults if it does not exist.
    pub fn load(path: &Path) -> CliResult<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| CliError::Config(format!("{}: {e}", path.display())))?;
        config.policy.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn to_toml(&self) -> CliResult<String> {
        toml::to_string_pretty(self).map_err(|e| CliError::Config(e.to_string()))
    }
}

/// Resolves the config file path: explicit, else the user config directory.
pub fn config_path(explicit: Option<&Path>) -> CliResult<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path.to_path_buf());
    }
    let base = dirs::config_dir()
        .or_else(dirs::home_dir)
        .ok_or_else(|| CliError::Config("could not determine config directory".into()))?;
    Ok(base.join("pledge").join("config.toml"))
}
