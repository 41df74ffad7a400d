//! Configuration system for Apigen
//!
//! Configuration is loaded once at process start and then passed explicitly
//! (by reference) into every component. There is no ambient global lookup.
//!
//! # Configuration Hierarchy
//!
//! Values are resolved in the following order (highest priority wins):
//!
//! 1. **Environment Variables** (`AG_*`)
//! 2. **Config File** (`apigen.toml`)
//! 3. **Defaults**
//!
//! # Example
//!
//! ```no_run
//! use apigen_core::config::ApigenConfig;
//!
//! let config = ApigenConfig::load()?;
//! println!("controllers live in {}", config.generator.controllers_path);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod generator;
pub mod logging;
pub mod server;

pub use generator::GeneratorConfig;
pub use logging::LoggingConfig;
pub use server::ServerConfig;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up relative to the application root
pub const CONFIG_FILE_NAME: &str = "apigen.toml";

/// Complete Apigen configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ApigenConfig {
    pub generator: GeneratorConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

impl ApigenConfig {
    /// Load configuration from `apigen.toml` in the current directory
    pub fn load() -> Result<Self> {
        Self::load_from(CONFIG_FILE_NAME)
    }

    /// Load configuration with full supersedence chain from a specific file.
    ///
    /// A missing file is not an error: defaults (plus environment) are used.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = Self::default();

        if path.exists() {
            let file_config = Self::from_file(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            config.merge(file_config);
        } else {
            log::debug!("No config file at {}, using defaults", path.display());
        }

        config.apply_env_vars();
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.as_ref().display()))
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Render this configuration as a TOML document
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize config to TOML")
    }

    /// Merge another config into this one (other takes priority)
    pub fn merge(&mut self, other: Self) {
        self.generator.merge(other.generator);
        self.server.merge(other.server);
        self.logging.merge(other.logging);
    }

    /// Apply environment variables to configuration
    pub fn apply_env_vars(&mut self) {
        self.generator.apply_env_vars();
        self.server.apply_env_vars();
        self.logging.apply_env_vars();
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.generator.validate()?;
        self.server.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}
