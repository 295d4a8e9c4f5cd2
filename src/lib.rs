#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Naming Core
//!
//! Typed name lookup over pluggable naming contexts.
//!
//! ## Overview
//!
//! A host application keeps a directory of name to value bindings, such as
//! `java:comp/env/jdbc/orders`. Components ask for a name together with the type
//! they need and get back a correctly-typed shared value, or nothing. A binding
//! that holds text instead of a value may name a registered type, which is then
//! default-constructed on demand.
//!
//! ## Module Organization
//!
//! - [`binding`] - Type-erased values and their declared capabilities
//! - [`context`] - Naming context contract and the in-memory directory
//! - [`registry`] - Class loader contract and the type registry
//! - [`resolver`] - The name resolver itself
//! - [`config`] - Layered configuration loading
//! - [`logging`] - Structured logging setup and helpers
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use naming_core::config::ConfigManager;
//! use naming_core::context::InMemoryContext;
//! use naming_core::registry::TypeRegistry;
//! use naming_core::resolver::NameResolver;
//! use std::sync::Arc;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manager = ConfigManager::load()?;
//! naming_core::logging::init_from_config(manager.config());
//!
//! let context = Arc::new(InMemoryContext::from_config(manager.config())?);
//! let types = Arc::new(TypeRegistry::new());
//! let resolver = NameResolver::new(context.clone(), types);
//!
//! let greeting = resolver.resolve::<str>("java:comp/env/greeting")?;
//! println!("greeting: {greeting:?}");
//!
//! context.close();
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests
//! ```

pub mod binding;
pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod registry;
pub mod resolver;

pub use binding::{Binding, Capabilities};
pub use config::{ConfigManager, NamingConfig};
pub use context::{InMemoryContext, NamingContext};
pub use error::{ClassLoadError, ContextError, NamingError, ResolveDiagnostic, Result};
pub use registry::{ClassLoader, TypeDescriptor, TypeRegistry};
pub use resolver::{NameResolver, Resolution};
