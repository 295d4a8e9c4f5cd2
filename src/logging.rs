//! # Structured Logging Module
//!
//! Environment-aware structured logging for lookups and resolution diagnostics.

use crate::config::NamingConfig;
use crate::error::ResolveDiagnostic;
use chrono::Utc;
use std::process;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging for the detected environment
pub fn init_structured_logging() {
    let config = NamingConfig {
        environment: detect_environment(),
        ..NamingConfig::default()
    };
    init_from_config(&config);
}

/// Initialize structured logging from loaded configuration.
///
/// Only the first call installs a subscriber. `RUST_LOG` takes precedence over
/// the configured level when set.
pub fn init_from_config(config: &NamingConfig) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let log_level = config.log_level();
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let result = if config.logging.json {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .json()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true)
                        .with_filter(filter),
                )
                .try_init()
        } else {
            tracing_subscriber::registry()
                .with(
                    fmt::layer()
                        .with_target(true)
                        .with_thread_ids(true)
                        .with_level(true)
                        .with_ansi(true)
                        .with_filter(filter),
                )
                .try_init()
        };

        if result.is_err() {
            // A global subscriber is already set by the host application
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            pid = process::id(),
            environment = %config.environment,
            level = %log_level,
            json = config.logging.json,
            "🔧 STRUCTURED LOGGING: Initialized"
        );
    });
}

/// Get current environment from environment variables
pub fn detect_environment() -> String {
    environment_from(|key| std::env::var(key).ok())
}

/// Environment name from `NAMING_ENV`, then `APP_ENV`, read through `lookup`
pub fn environment_from(lookup: impl Fn(&str) -> Option<String>) -> String {
    lookup("NAMING_ENV")
        .or_else(|| lookup("APP_ENV"))
        .unwrap_or_else(|| "development".to_string())
}

/// Get log level based on environment
pub fn level_for_environment(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}

/// Log structured data for lookup operations
pub fn log_lookup_operation(
    operation: &str,
    name: &str,
    target_type: &str,
    status: &str,
    details: Option<&str>,
) {
    tracing::debug!(
        operation = %operation,
        name = %name,
        target_type = %target_type,
        status = %status,
        details = details,
        timestamp = %Utc::now().to_rfc3339(),
        "🔎 LOOKUP_OPERATION"
    );
}

/// Log a non-fatal resolution failure with full context
pub fn log_resolution_diagnostic(diagnostic: &ResolveDiagnostic, target_type: &str) {
    tracing::error!(
        kind = diagnostic.kind(),
        name = %diagnostic.name(),
        target_type = %target_type,
        error = %diagnostic,
        timestamp = %Utc::now().to_rfc3339(),
        "❌ RESOLUTION_DIAGNOSTIC"
    );
}
