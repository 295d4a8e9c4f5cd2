//! # In-Memory Naming Context
//!
//! Thread-safe in-process directory backed by an ordered map of composite names.
//!
//! ## Key Features
//!
//! - **Hierarchical names**: `java:comp/env/jdbc/orders` style names, with
//!   intermediate components acting as implicit subcontexts
//! - **Lifetime-scoped**: an owned handle that is closed explicitly on shutdown
//! - **Config seeding**: textual bindings can be loaded from [`NamingConfig`]

use super::name::CompositeName;
use super::{NameClassPair, NamingContext};
use crate::binding::Binding;
use crate::config::NamingConfig;
use crate::error::ContextError;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

#[derive(Debug, Clone)]
struct Entry {
    binding: Binding,
    bound_at: DateTime<Utc>,
}

/// Snapshot of a single binding
#[derive(Debug, Clone)]
pub struct BindingInfo {
    pub name: String,
    pub type_name: &'static str,
    pub bound_at: DateTime<Utc>,
}

/// In-process naming context
#[derive(Debug, Default)]
pub struct InMemoryContext {
    entries: RwLock<BTreeMap<CompositeName, Entry>>,
    closed: AtomicBool,
}

impl InMemoryContext {
    /// Create an empty, open context
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a context seeded with the textual bindings from configuration
    pub fn from_config(config: &NamingConfig) -> Result<Self, ContextError> {
        let context = Self::new();
        for seed in &config.bindings {
            context.bind(&seed.name, Binding::text(seed.value.as_str()))?;
        }

        info!(
            environment = %config.environment,
            bindings = config.bindings.len(),
            "Naming context seeded from configuration"
        );
        Ok(context)
    }

    /// Close the context. Every later operation fails with [`ContextError::Closed`].
    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            let released = {
                let mut entries = self.entries.write();
                let count = entries.len();
                entries.clear();
                count
            };
            info!(released_bindings = released, "Naming context closed");
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Snapshot of every binding, ordered by name
    pub fn bindings(&self) -> Result<Vec<BindingInfo>, ContextError> {
        self.ensure_open()?;
        let entries = self.entries.read();
        Ok(entries
            .iter()
            .map(|(name, entry)| BindingInfo {
                name: name.to_string(),
                type_name: entry.binding.type_name(),
                bound_at: entry.bound_at,
            })
            .collect())
    }

    fn ensure_open(&self) -> Result<(), ContextError> {
        if self.is_closed() {
            Err(ContextError::Closed)
        } else {
            Ok(())
        }
    }

    fn parse_bindable(name: &str) -> Result<CompositeName, ContextError> {
        let parsed = CompositeName::parse(name)?;
        if parsed.last().is_none() {
            return Err(ContextError::invalid_name(
                name,
                "cannot bind the root context",
            ));
        }
        Ok(parsed)
    }

    /// Reject names that sit below an existing leaf, or that name an existing subcontext
    fn check_placement(
        entries: &BTreeMap<CompositeName, Entry>,
        name: &CompositeName,
    ) -> Result<(), ContextError> {
        if let Some(leaf) = entries.keys().find(|existing| existing.is_ancestor_of(name)) {
            return Err(ContextError::NotContext {
                name: leaf.to_string(),
            });
        }
        if entries.keys().any(|existing| name.is_ancestor_of(existing)) {
            return Err(ContextError::AlreadyBound {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    fn insert(&self, name: &str, binding: Binding, replace: bool) -> Result<(), ContextError> {
        let parsed = Self::parse_bindable(name)?;
        let type_name = binding.type_name();

        // Checked under the write lock so a concurrent close cannot be undone
        let mut entries = self.entries.write();
        self.ensure_open()?;
        if !replace && entries.contains_key(&parsed) {
            return Err(ContextError::AlreadyBound {
                name: parsed.to_string(),
            });
        }
        Self::check_placement(&entries, &parsed)?;

        let previous = entries.insert(
            parsed,
            Entry {
                binding,
                bound_at: Utc::now(),
            },
        );
        debug!(
            name = %name,
            type_name = type_name,
            replaced = previous.is_some(),
            "Bound name"
        );
        Ok(())
    }
}

impl NamingContext for InMemoryContext {
    fn lookup(&self, name: &str) -> Result<Option<Binding>, ContextError> {
        self.ensure_open()?;
        let parsed = CompositeName::parse(name)?;
        let entries = self.entries.read();
        Ok(entries.get(&parsed).map(|entry| entry.binding.clone()))
    }

    fn bind(&self, name: &str, binding: Binding) -> Result<(), ContextError> {
        self.insert(name, binding, false)
    }

    fn rebind(&self, name: &str, binding: Binding) -> Result<(), ContextError> {
        self.insert(name, binding, true)
    }

    fn unbind(&self, name: &str) -> Result<bool, ContextError> {
        self.ensure_open()?;
        let parsed = CompositeName::parse(name)?;
        let removed = self.entries.write().remove(&parsed).is_some();
        debug!(name = %name, removed = removed, "Unbound name");
        Ok(removed)
    }

    fn list(&self, context_name: &str) -> Result<Vec<NameClassPair>, ContextError> {
        self.ensure_open()?;
        let context = CompositeName::parse(context_name)?;
        let entries = self.entries.read();

        if entries.contains_key(&context) {
            return Err(ContextError::NotContext {
                name: context.to_string(),
            });
        }

        let mut children: BTreeMap<String, NameClassPair> = BTreeMap::new();
        for (name, entry) in entries.iter() {
            if let Some(child) = name.child_of(&context) {
                children.insert(
                    child.to_string(),
                    NameClassPair {
                        name: child.to_string(),
                        class_name: entry.binding.type_name().to_string(),
                        subcontext: false,
                    },
                );
            } else if let Some(child) = name.descendant_of(&context) {
                children
                    .entry(child.to_string())
                    .or_insert_with(|| NameClassPair {
                        name: child.to_string(),
                        class_name: "context".to_string(),
                        subcontext: true,
                    });
            }
        }

        Ok(children.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SeedBinding;

    #[test]
    fn test_bind_and_lookup() {
        let context = InMemoryContext::new();
        context
            .bind("java:comp/env/mail", Binding::text("smtp"))
            .unwrap();

        let found = context.lookup("java:comp/env/mail").unwrap().unwrap();
        assert_eq!(found.as_text(), Some("smtp"));
        assert!(context.lookup("java:comp/env/other").unwrap().is_none());
        assert_eq!(context.len(), 1);
    }

    #[test]
    fn test_lookup_normalises_trailing_slash() {
        let context = InMemoryContext::new();
        context.bind("services/mail", Binding::object(25u16)).unwrap();

        assert!(context.lookup("services/mail/").unwrap().is_some());
    }

    #[test]
    fn test_duplicate_bind_rejected_but_rebind_replaces() {
        let context = InMemoryContext::new();
        context.bind("a/b", Binding::object(1u32)).unwrap();

        let err = context.bind("a/b", Binding::object(2u32)).unwrap_err();
        assert_eq!(
            err,
            ContextError::AlreadyBound {
                name: "a/b".to_string()
            }
        );

        context.rebind("a/b", Binding::object(2u32)).unwrap();
        let value = context.lookup("a/b").unwrap().unwrap().cast::<u32>().unwrap();
        assert_eq!(*value, 2);
    }

    #[test]
    fn test_placement_rules() {
        let context = InMemoryContext::new();
        context.bind("env/jdbc/orders", Binding::object(1u8)).unwrap();

        assert!(matches!(
            context.bind("env/jdbc/orders/replica", Binding::object(2u8)),
            Err(ContextError::NotContext { .. })
        ));
        assert!(matches!(
            context.bind("env/jdbc", Binding::object(3u8)),
            Err(ContextError::AlreadyBound { .. })
        ));
        assert!(matches!(
            context.bind("java:", Binding::object(4u8)),
            Err(ContextError::InvalidName { .. })
        ));
    }

    #[test]
    fn test_unbind() {
        let context = InMemoryContext::new();
        context.bind("x", Binding::text("y")).unwrap();

        assert!(context.unbind("x").unwrap());
        assert!(!context.unbind("x").unwrap());
        assert!(context.is_empty());
    }

    #[test]
    fn test_list_children_and_subcontexts() {
        let context = InMemoryContext::new();
        context.bind("java:comp/env/mail", Binding::text("smtp")).unwrap();
        context
            .bind("java:comp/env/jdbc/orders", Binding::object(1u8))
            .unwrap();
        context
            .bind("java:comp/env/jdbc/billing", Binding::object(2u8))
            .unwrap();
        context.bind("java:comp/other", Binding::object(3u8)).unwrap();

        let children = context.list("java:comp/env").unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].name, "jdbc");
        assert!(children[0].subcontext);
        assert_eq!(children[1].name, "mail");
        assert!(children[1].class_name.ends_with("String"));
        assert!(!children[1].subcontext);

        assert!(context.list("java:comp/nothing").unwrap().is_empty());
        assert!(matches!(
            context.list("java:comp/env/mail"),
            Err(ContextError::NotContext { .. })
        ));
    }

    #[test]
    fn test_closed_context_rejects_everything() {
        let context = InMemoryContext::new();
        context.bind("a", Binding::text("b")).unwrap();
        context.close();

        assert!(context.is_closed());
        assert_eq!(context.lookup("a").unwrap_err(), ContextError::Closed);
        assert_eq!(
            context.bind("c", Binding::text("d")).unwrap_err(),
            ContextError::Closed
        );
        assert_eq!(context.list("a").unwrap_err(), ContextError::Closed);
        assert!(context.bindings().is_err());
        assert!(context.is_empty());
    }

    #[test]
    fn test_close_racing_with_binds_leaves_context_empty() {
        for _ in 0..50 {
            let context = InMemoryContext::new();
            std::thread::scope(|scope| {
                for writer in 0..4 {
                    let context = &context;
                    scope.spawn(move || {
                        for i in 0..200 {
                            let name = format!("race/{writer}/{i}");
                            if let Err(err) = context.bind(&name, Binding::object(i)) {
                                assert_eq!(err, ContextError::Closed);
                                break;
                            }
                        }
                    });
                }
                scope.spawn(|| context.close());
            });

            assert!(context.is_closed());
            assert!(context.is_empty());
        }
    }

    #[test]
    fn test_from_config_seeds_text_bindings() {
        let mut config = NamingConfig::default();
        config.bindings.push(SeedBinding {
            name: "java:comp/env/greeter".to_string(),
            value: "app::Greeter".to_string(),
        });

        let context = InMemoryContext::from_config(&config).unwrap();
        let info = context.bindings().unwrap();
        assert_eq!(info.len(), 1);
        assert_eq!(info[0].name, "java:comp/env/greeter");
        assert_eq!(
            context
                .lookup("java:comp/env/greeter")
                .unwrap()
                .unwrap()
                .as_text(),
            Some("app::Greeter")
        );
    }
}
