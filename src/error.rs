//! # Error Types
//!
//! Structured error handling for name resolution using thiserror.
//!
//! Only [`NamingError`] ever reaches a caller of the resolver through `Err`.
//! [`ContextError`] and [`ClassLoadError`] are raised by the collaborators and
//! translated at the resolver boundary, while [`ResolveDiagnostic`] describes the
//! non-fatal outcomes that `resolve` collapses into an empty result.

use thiserror::Error;

/// Fatal errors surfaced by [`crate::resolver::NameResolver`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamingError {
    #[error("Could not get {name} from naming context: {reason}")]
    RegistryUnavailable { name: String, reason: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Name already bound: {name}")]
    AlreadyBound { name: String },

    #[error("Operation '{operation}' not supported by naming context")]
    NotSupported { operation: String },
}

impl NamingError {
    /// Create a registry unavailable error
    pub fn registry_unavailable(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::RegistryUnavailable {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Translate a failed lookup. Whatever the context reports, the name could
    /// not be consulted, so every lookup failure is a registry failure.
    pub fn from_lookup(name: &str, error: ContextError) -> Self {
        Self::registry_unavailable(name, error.to_string())
    }

    /// Translate a failed bind, unbind or list for the given name.
    ///
    /// Name validation and duplicate binding keep their own variants, anything
    /// else means the context could not be consulted.
    pub fn from_context(name: &str, error: ContextError) -> Self {
        match error {
            ContextError::InvalidName { name, reason } => Self::InvalidName { name, reason },
            ContextError::AlreadyBound { name } => Self::AlreadyBound { name },
            ContextError::NotSupported { operation } => Self::NotSupported { operation },
            ContextError::NotContext { name } => Self::invalid_name(name, "not a context"),
            other => Self::registry_unavailable(name, other.to_string()),
        }
    }

    /// Whether this error is a connectivity-level failure
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::RegistryUnavailable { .. })
    }
}

/// Errors raised by a [`crate::context::NamingContext`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ContextError {
    #[error("Naming context is closed")]
    Closed,

    #[error("Naming context unreachable: {message}")]
    Unreachable { message: String },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Name already bound: {name}")]
    AlreadyBound { name: String },

    #[error("Not a context: {name}")]
    NotContext { name: String },

    #[error("Operation '{operation}' not supported")]
    NotSupported { operation: String },
}

impl ContextError {
    /// Create an unreachable context error
    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::Unreachable {
            message: message.into(),
        }
    }

    /// Create an invalid name error
    pub fn invalid_name(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unsupported operation error
    pub fn not_supported(operation: impl Into<String>) -> Self {
        Self::NotSupported {
            operation: operation.into(),
        }
    }
}

/// Errors raised by a [`crate::registry::ClassLoader`] implementation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassLoadError {
    #[error("Class not found: {identifier}")]
    NotFound { identifier: String },

    #[error("Class {identifier} could not be instantiated: {reason}")]
    ConstructionFailed { identifier: String, reason: String },
}

impl ClassLoadError {
    /// Create a class not found error
    pub fn not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            identifier: identifier.into(),
        }
    }

    /// Create a construction failure
    pub fn construction_failed(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ConstructionFailed {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }
}

/// Non-fatal resolution outcomes. These are logged and collapsed into an
/// empty result by [`crate::resolver::NameResolver::resolve`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveDiagnostic {
    #[error("Lookup for key {name} should return a value of {expected}, but returned {actual}")]
    TypeMismatch {
        name: String,
        expected: String,
        actual: String,
    },

    #[error("Could not find class {identifier} from lookup for name {name}")]
    ClassNotFound { name: String, identifier: String },

    #[error(
        "Lookup for key {name} returned class {identifier} which does not implement/extend the expected type {expected}"
    )]
    IncompatibleClass {
        name: String,
        identifier: String,
        expected: String,
    },

    #[error("Class {identifier} from lookup for name {name} could not be instantiated: {reason}")]
    InstantiationFailed {
        name: String,
        identifier: String,
        reason: String,
    },
}

impl ResolveDiagnostic {
    /// Short machine-readable kind used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::TypeMismatch { .. } => "type_mismatch",
            Self::ClassNotFound { .. } => "class_not_found",
            Self::IncompatibleClass { .. } => "incompatible_class",
            Self::InstantiationFailed { .. } => "instantiation_failed",
        }
    }

    /// The looked up name this diagnostic refers to
    pub fn name(&self) -> &str {
        match self {
            Self::TypeMismatch { name, .. }
            | Self::ClassNotFound { name, .. }
            | Self::IncompatibleClass { name, .. }
            | Self::InstantiationFailed { name, .. } => name,
        }
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Failed to read configuration from '{source_name}': {error}")]
    LoadError { source_name: String, error: String },

    #[error("Invalid value '{value}' for field '{field}': {context}")]
    InvalidValue {
        field: String,
        value: String,
        context: String,
    },
}

impl ConfigurationError {
    /// Create a load error
    pub fn load_error(source_name: impl Into<String>, error: impl std::fmt::Display) -> Self {
        Self::LoadError {
            source_name: source_name.into(),
            error: error.to_string(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(
        field: impl Into<String>,
        value: impl Into<String>,
        context: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.into(),
            context: context.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NamingError>;

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;
