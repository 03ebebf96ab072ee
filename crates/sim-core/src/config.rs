//! Farm configuration loaded from YAML.

use crate::{validate_config, ValidationError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Simulation configuration parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmConfig {
    /// Number of tile rows (default: 3).
    pub rows: usize,
    /// Number of tile columns (default: 4).
    pub columns: usize,
    /// Cash on day zero.
    pub starting_balance: i64,
    /// Seed for the automated driver's RNG.
    pub rng_seed: u64,
}

impl Default for FarmConfig {
    fn default() -> Self {
        Self {
            rows: 3,
            columns: 4,
            starting_balance: 1000,
            rng_seed: 42,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("io error: {0}")]
    Io(String),
    #[error("invalid config: {0}")]
    Invalid(#[from] ValidationError),
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e.to_string())
    }
}

impl FarmConfig {
    /// Parse and validate a config; absent fields keep their defaults.
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: FarmConfig =
            serde_yaml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        validate_config(&cfg)?;
        Ok(cfg)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Number of tiles on the grid. Validated configs never overflow here.
    pub fn tile_count(&self) -> usize {
        self.rows * self.columns
    }
}
