//! # Type Registry
//!
//! Thread-safe map of fully-qualified identifiers to constructible types.

use super::ClassLoader;
use crate::binding::{AnyValue, Binding, Capabilities};
use crate::error::ClassLoadError;
use dashmap::DashMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Fallible no-argument constructor producing a type-erased value
pub type Constructor = Arc<dyn Fn() -> Result<AnyValue, String> + Send + Sync>;

/// A loadable type
#[derive(Clone)]
pub struct TypeDescriptor {
    identifier: String,
    capabilities: Arc<Capabilities>,
    constructor: Option<Constructor>,
}

impl TypeDescriptor {
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Rust type name of the registered type
    pub fn type_name(&self) -> &'static str {
        self.capabilities.type_name()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Whether instances of this type can be handed out as `T`
    pub fn is_compatible<T: ?Sized + 'static>(&self) -> bool {
        self.capabilities.is_compatible::<T>()
    }

    pub fn has_default_constructor(&self) -> bool {
        self.constructor.is_some()
    }

    /// Run the default constructor
    pub fn instantiate(&self) -> Result<Binding, ClassLoadError> {
        let constructor = self.constructor.as_ref().ok_or_else(|| {
            ClassLoadError::construction_failed(&self.identifier, "no default constructor")
        })?;

        let value = constructor()
            .map_err(|reason| ClassLoadError::construction_failed(&self.identifier, reason))?;

        Ok(Binding::from_parts(value, Arc::clone(&self.capabilities)))
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("identifier", &self.identifier)
            .field("capabilities", &self.capabilities)
            .field("default_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Registry of loadable types keyed by identifier
#[derive(Debug, Default)]
pub struct TypeRegistry {
    types: DashMap<String, Arc<TypeDescriptor>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type constructed through `Default`
    pub fn register<V>(&self, identifier: &str) -> TypeRegistration<'_, V>
    where
        V: Any + Send + Sync + Default,
    {
        let constructor: Constructor = Arc::new(|| Ok(Arc::new(V::default()) as AnyValue));
        self.insert::<V>(identifier, Some(constructor))
    }

    /// Register a type whose constructor may fail
    pub fn register_with<V, E, F>(&self, identifier: &str, constructor: F) -> TypeRegistration<'_, V>
    where
        V: Any + Send + Sync,
        E: fmt::Display,
        F: Fn() -> Result<V, E> + Send + Sync + 'static,
    {
        let constructor: Constructor = Arc::new(move || {
            constructor()
                .map(|value| Arc::new(value) as AnyValue)
                .map_err(|e| e.to_string())
        });
        self.insert::<V>(identifier, Some(constructor))
    }

    /// Register a type that has no default constructor
    pub fn register_abstract<V>(&self, identifier: &str) -> TypeRegistration<'_, V>
    where
        V: Any + Send + Sync,
    {
        self.insert::<V>(identifier, None)
    }

    /// Remove a registration, returning whether one existed
    pub fn unregister(&self, identifier: &str) -> bool {
        let removed = self.types.remove(identifier.trim()).is_some();
        if removed {
            info!(identifier = %identifier, "Unregistered type");
        }
        removed
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.types.contains_key(identifier.trim())
    }

    /// All registered identifiers, sorted
    pub fn identifiers(&self) -> Vec<String> {
        let mut identifiers: Vec<String> =
            self.types.iter().map(|entry| entry.key().clone()).collect();
        identifiers.sort();
        identifiers
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn insert<V>(&self, identifier: &str, constructor: Option<Constructor>) -> TypeRegistration<'_, V>
    where
        V: Any + Send + Sync,
    {
        let identifier = identifier.trim().to_string();
        let descriptor = TypeDescriptor {
            identifier: identifier.clone(),
            capabilities: Arc::new(Capabilities::of::<V>()),
            constructor,
        };

        if self
            .types
            .insert(identifier.clone(), Arc::new(descriptor))
            .is_some()
        {
            warn!(identifier = %identifier, "Replaced existing type registration");
        } else {
            info!(
                identifier = %identifier,
                type_name = std::any::type_name::<V>(),
                "Registered type"
            );
        }

        TypeRegistration {
            registry: self,
            identifier,
            _marker: std::marker::PhantomData,
        }
    }
}

impl ClassLoader for TypeRegistry {
    fn resolve_type(&self, identifier: &str) -> Result<Arc<TypeDescriptor>, ClassLoadError> {
        let key = identifier.trim();
        match self.types.get(key) {
            Some(entry) => {
                debug!(identifier = %key, "Resolved type");
                Ok(Arc::clone(entry.value()))
            }
            None => Err(ClassLoadError::not_found(identifier)),
        }
    }
}

/// Handle returned by registration, used to declare interface targets
pub struct TypeRegistration<'a, V> {
    registry: &'a TypeRegistry,
    identifier: String,
    _marker: std::marker::PhantomData<fn() -> V>,
}

impl<V: Any + Send + Sync> TypeRegistration<'_, V> {
    /// Declare that instances of this type can be handed out as `T`
    pub fn implements<T, F>(self, cast: F) -> Self
    where
        T: ?Sized + 'static,
        F: Fn(Arc<V>) -> Arc<T> + Send + Sync + 'static,
    {
        if let Some(mut entry) = self.registry.types.get_mut(&self.identifier) {
            let descriptor = Arc::make_mut(entry.value_mut());
            Arc::make_mut(&mut descriptor.capabilities).add_cast::<V, T, F>(cast);
        }
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}
