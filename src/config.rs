//! Processor configuration
//!
//! Memory limit and clock frequency, optionally loaded from a TOML file in
//! the user's configuration directory.

use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "config-file")]
use std::fs;
#[cfg(feature = "config-file")]
use std::path::{Path, PathBuf};

#[cfg(feature = "config-file")]
use crate::error::ConfigError;
use crate::error::ProcessorError;
use crate::memory::{DEFAULT_MEMORY_LIMIT, ZERO_PAGE_SIZE};

pub const DEFAULT_FREQUENCY_MHZ: f32 = 1.023;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct ProcessorConfig {
    /// Bytes of addressable memory
    #[cfg_attr(feature = "config-file", serde(default = "default_memory_limit"))]
    pub memory_limit: usize,

    /// Target clock in MHz
    #[cfg_attr(feature = "config-file", serde(default = "default_frequency"))]
    pub frequency_mhz: f32,
}

fn default_memory_limit() -> usize {
    DEFAULT_MEMORY_LIMIT
}

fn default_frequency() -> f32 {
    DEFAULT_FREQUENCY_MHZ
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            memory_limit: default_memory_limit(),
            frequency_mhz: default_frequency(),
        }
    }
}

impl ProcessorConfig {
    pub fn validate(&self) -> Result<(), ProcessorError> {
        if self.memory_limit <= ZERO_PAGE_SIZE || self.memory_limit > DEFAULT_MEMORY_LIMIT {
            return Err(ProcessorError::InvalidMemoryLimit {
                limit: self.memory_limit,
            });
        }
        if !self.frequency_mhz.is_finite() || self.frequency_mhz <= 0.0 {
            return Err(ProcessorError::InvalidFrequency(self.frequency_mhz));
        }
        Ok(())
    }

    /// Time allotted to one instruction: `1000 / frequency` nanoseconds.
    pub fn instruction_budget(&self) -> Duration {
        Duration::from_nanos((1000.0 / self.frequency_mhz as f64).round() as u64)
    }
}

#[cfg(feature = "config-file")]
impl ProcessorConfig {
    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        match dirs::config_dir() {
            Some(config_dir) => config_dir.join("mos6502").join("config.toml"),
            None => PathBuf::from("config.toml"),
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        log::info!("Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Load from `path` (or the default location), falling back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        let default_path = Self::config_path();
        let path = path.unwrap_or(&default_path);

        if path.exists() {
            match Self::load(path) {
                Ok(config) => return config,
                Err(e) => log::error!("Failed to load config file {}: {}", path.display(), e),
            }
        }

        log::info!("Using default configuration");
        Self::default()
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        self.validate()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        log::info!("Saved configuration to: {}", path.display());
        Ok(())
    }
}
