//! # Type Registry Infrastructure
//!
//! Resolution of textual type identifiers to constructible types.
//!
//! ## Overview
//!
//! When a name is bound to text rather than to a value of the requested type,
//! the resolver treats the text as a fully-qualified type identifier and asks a
//! [`ClassLoader`] for it. Types only become loadable by being registered, so the
//! in-process implementation is a [`TypeRegistry`] of identifiers to
//! [`TypeDescriptor`]s carrying a default constructor and interface casts.
//!
//! ## Architecture
//!
//! ```text
//! Type Registry
//! ├── ClassLoader       (collaborator contract used by the resolver)
//! ├── TypeRegistry      (DashMap-backed identifier -> descriptor map)
//! └── TypeDescriptor    (capabilities + optional default constructor)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use naming_core::registry::{ClassLoader, TypeRegistry};
//! use std::sync::Arc;
//!
//! trait Clock: Send + Sync {
//!     fn now(&self) -> u64;
//! }
//!
//! #[derive(Default)]
//! struct FixedClock;
//! impl Clock for FixedClock {
//!     fn now(&self) -> u64 {
//!         42
//!     }
//! }
//!
//! let registry = TypeRegistry::new();
//! registry
//!     .register::<FixedClock>("app::time::FixedClock")
//!     .implements(|c| c as Arc<dyn Clock>);
//!
//! let descriptor = registry.resolve_type("app::time::FixedClock").unwrap();
//! assert!(descriptor.is_compatible::<dyn Clock>());
//!
//! let instance = registry.instantiate_default(&descriptor).unwrap();
//! assert_eq!(instance.cast::<dyn Clock>().unwrap().now(), 42);
//! ```

pub mod type_registry;

pub use type_registry::{Constructor, TypeDescriptor, TypeRegistration, TypeRegistry};

use crate::binding::Binding;
use crate::error::ClassLoadError;
use std::sync::Arc;

/// Resolves type identifiers and constructs default instances
pub trait ClassLoader: Send + Sync {
    /// Resolve a fully-qualified identifier, failing with [`ClassLoadError::NotFound`]
    fn resolve_type(&self, identifier: &str) -> Result<Arc<TypeDescriptor>, ClassLoadError>;

    /// Construct a default instance, failing with [`ClassLoadError::ConstructionFailed`]
    fn instantiate_default(&self, descriptor: &TypeDescriptor) -> Result<Binding, ClassLoadError> {
        descriptor.instantiate()
    }
}
