//! # Naming Configuration
//!
//! Layered configuration for the naming context and logging.
//!
//! ## Architecture
//!
//! - **Defaults**: every field has a safe default, so no file is required
//! - **TOML file**: optional, located through `NAMING_CONFIG_PATH` or passed explicitly
//! - **Environment overrides**: `NAMING_*` variables, `__` separating nested keys
//!   (for example `NAMING_LOGGING__LEVEL=info`)
//! - **Explicit Validation**: names and identifiers are checked at load time
//!
//! ## Usage
//!
//! ```rust,no_run
//! use naming_core::config::ConfigManager;
//! use naming_core::context::InMemoryContext;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! let context = InMemoryContext::from_config(manager.config())?;
//! # Ok(())
//! # }
//! ```
//!
//! A configuration file looks like:
//!
//! ```toml
//! environment = "production"
//!
//! [logging]
//! level = "info"
//! json = true
//!
//! [[bindings]]
//! name = "java:comp/env/greeter"
//! value = "app::greeting::EnglishGreeter"
//! ```

pub mod loader;

pub use crate::error::ConfigurationError;
pub use loader::ConfigManager;

use crate::context::CompositeName;
use crate::error::ConfigResult;
use serde::{Deserialize, Serialize};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct NamingConfig {
    /// Deployment environment (test, development, production)
    pub environment: String,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Textual bindings used to seed an in-memory context
    pub bindings: Vec<SeedBinding>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            logging: LoggingConfig::default(),
            bindings: Vec::new(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Explicit level; derived from the environment when absent
    pub level: Option<String>,
    /// Emit JSON instead of human-readable lines
    pub json: bool,
}

/// A name bound to text, typically a type identifier
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SeedBinding {
    pub name: String,
    pub value: String,
}

impl NamingConfig {
    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        if self.environment.trim().is_empty() {
            return Err(ConfigurationError::invalid_value(
                "environment",
                self.environment.clone(),
                "environment must not be empty",
            ));
        }

        if let Some(level) = &self.logging.level {
            if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
                return Err(ConfigurationError::invalid_value(
                    "logging.level",
                    level.clone(),
                    format!("expected one of {}", LOG_LEVELS.join(", ")),
                ));
            }
        }

        for seed in &self.bindings {
            let parsed = CompositeName::parse(&seed.name).map_err(|e| {
                ConfigurationError::invalid_value("bindings.name", seed.name.clone(), e.to_string())
            })?;
            if parsed.last().is_none() {
                return Err(ConfigurationError::invalid_value(
                    "bindings.name",
                    seed.name.clone(),
                    "cannot bind the root context",
                ));
            }
            if seed.value.trim().is_empty() {
                return Err(ConfigurationError::invalid_value(
                    "bindings.value",
                    seed.value.clone(),
                    format!("value for {} must not be empty", seed.name),
                ));
            }
        }

        Ok(())
    }

    /// Effective log level: explicit setting, otherwise derived from the environment
    pub fn log_level(&self) -> String {
        self.logging
            .level
            .as_ref()
            .map(|level| level.to_lowercase())
            .unwrap_or_else(|| crate::logging::level_for_environment(&self.environment).to_string())
    }
}
