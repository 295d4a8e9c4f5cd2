//! # Naming Contexts
//!
//! The name-to-value directory consulted by the resolver.
//!
//! ## Overview
//!
//! [`NamingContext`] is the collaborator contract. Only [`NamingContext::lookup`]
//! is required; contexts that are read-only keep the default `bind`, `rebind`,
//! `unbind` and `list` implementations, which report the operation as unsupported.
//!
//! [`InMemoryContext`] is the in-process directory. It is an explicitly owned
//! handle: create it, share it through an `Arc`, and `close()` it on shutdown.
//!
//! ## Usage
//!
//! ```rust
//! use naming_core::binding::Binding;
//! use naming_core::context::{InMemoryContext, NamingContext};
//!
//! let context = InMemoryContext::new();
//! context.bind("java:comp/env/greeting", Binding::text("hello")).unwrap();
//!
//! let found = context.lookup("java:comp/env/greeting").unwrap();
//! assert_eq!(found.unwrap().as_text(), Some("hello"));
//! assert!(context.lookup("java:comp/env/missing").unwrap().is_none());
//! ```

pub mod in_memory;
pub mod name;

pub use in_memory::{BindingInfo, InMemoryContext};
pub use name::CompositeName;

use crate::binding::Binding;
use crate::error::ContextError;

/// A child entry reported by [`NamingContext::list`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameClassPair {
    /// Name relative to the listed context
    pub name: String,
    /// Runtime type name of the bound value, or `"context"` for subcontexts
    pub class_name: String,
    pub subcontext: bool,
}

/// Directory of name to value bindings
pub trait NamingContext: Send + Sync {
    /// Look up the value bound to `name`, `Ok(None)` when nothing is bound
    fn lookup(&self, name: &str) -> Result<Option<Binding>, ContextError>;

    /// Bind a value, failing when the name is already bound
    fn bind(&self, _name: &str, _binding: Binding) -> Result<(), ContextError> {
        Err(ContextError::not_supported("bind"))
    }

    /// Bind a value, replacing any existing binding
    fn rebind(&self, _name: &str, _binding: Binding) -> Result<(), ContextError> {
        Err(ContextError::not_supported("rebind"))
    }

    /// Remove a binding, returning whether one existed
    fn unbind(&self, _name: &str) -> Result<bool, ContextError> {
        Err(ContextError::not_supported("unbind"))
    }

    /// Direct children of a context
    fn list(&self, _context_name: &str) -> Result<Vec<NameClassPair>, ContextError> {
        Err(ContextError::not_supported("list"))
    }
}
