//! Configuration Loader
//!
//! Environment-aware configuration loading built on the `config` crate.
//! Handles file discovery, environment detection, and environment overrides.

use super::NamingConfig;
use crate::error::{ConfigResult, ConfigurationError};
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_VAR: &str = "NAMING_CONFIG_PATH";

/// Loaded and validated configuration
#[derive(Debug)]
pub struct ConfigManager {
    config: NamingConfig,
    source_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Load configuration with environment auto-detection
    pub fn load() -> ConfigResult<Arc<ConfigManager>> {
        let path = env::var(CONFIG_PATH_VAR).ok().map(PathBuf::from);
        let environment = crate::logging::detect_environment();
        Self::load_from_file_with_env(path.as_deref(), &environment)
    }

    /// Load configuration from an optional file with an explicit environment.
    /// This is useful for testing without modifying global environment variables.
    pub fn load_from_file_with_env(
        path: Option<&Path>,
        environment: &str,
    ) -> ConfigResult<Arc<ConfigManager>> {
        let source_name = path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "<defaults>".to_string());

        debug!(
            "Loading configuration for environment '{}' from {}",
            environment, source_name
        );

        let mut builder = config::Config::builder()
            .set_default("environment", environment)
            .map_err(|e| ConfigurationError::load_error(&source_name, e))?;

        if let Some(path) = path {
            if !path.is_file() {
                return Err(ConfigurationError::load_error(
                    &source_name,
                    "configuration path must point to a regular file",
                ));
            }
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix("NAMING")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: NamingConfig = builder
            .build()
            .and_then(|settings| settings.try_deserialize())
            .map_err(|e| ConfigurationError::load_error(&source_name, e))?;

        config.validate()?;

        info!(
            environment = %config.environment,
            source = %source_name,
            bindings = config.bindings.len(),
            "Configuration loaded successfully"
        );

        Ok(Arc::new(ConfigManager {
            config,
            source_path: path.map(Path::to_path_buf),
        }))
    }

    /// Get the loaded configuration
    pub fn config(&self) -> &NamingConfig {
        &self.config
    }

    pub fn environment(&self) -> &str {
        &self.config.environment
    }

    /// File the configuration was read from, if any
    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }
}
