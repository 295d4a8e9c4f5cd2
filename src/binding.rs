//! # Bindings and Capabilities
//!
//! Type-erased values stored in a naming context, together with an explicit
//! table of the target types each value can be handed out as.
//!
//! ## Overview
//!
//! A [`Binding`] owns an `Arc<dyn Any + Send + Sync>`. Whether it can be returned
//! for a requested target type is decided by its [`Capabilities`]: a map from the
//! target's `TypeId` to a caster producing `Arc<Target>`. Every value can be cast
//! to its own concrete type; trait-object targets are declared explicitly.
//!
//! ## Usage
//!
//! ```rust
//! use naming_core::binding::Binding;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! let binding = Binding::builder(English)
//!     .implements(|g| g as Arc<dyn Greeter>)
//!     .build();
//!
//! assert!(binding.is_compatible::<English>());
//! assert_eq!(binding.cast::<dyn Greeter>().unwrap().greet(), "hello");
//! assert!(binding.cast::<String>().is_none());
//! ```

use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Shared, type-erased value
pub type AnyValue = Arc<dyn Any + Send + Sync>;

type Caster = Arc<dyn Fn(&AnyValue) -> Option<Box<dyn Any>> + Send + Sync>;

/// Target types a value of one concrete type can be cast to
#[derive(Clone)]
pub struct Capabilities {
    type_name: &'static str,
    casts: HashMap<TypeId, (&'static str, Caster)>,
}

impl Capabilities {
    /// Capabilities of `V`, initially only the identity cast
    pub fn of<V: Any + Send + Sync>() -> Self {
        let identity: Caster = Arc::new(|value: &AnyValue| {
            Arc::clone(value)
                .downcast::<V>()
                .ok()
                .map(|v| Box::new(v) as Box<dyn Any>)
        });

        let mut casts = HashMap::new();
        casts.insert(TypeId::of::<V>(), (type_name::<V>(), identity));

        Self {
            type_name: type_name::<V>(),
            casts,
        }
    }

    /// Add a cast from `V` to the target `T`, usually a trait object
    pub(crate) fn add_cast<V, T, F>(&mut self, cast: F)
    where
        V: Any + Send + Sync,
        T: ?Sized + 'static,
        F: Fn(Arc<V>) -> Arc<T> + Send + Sync + 'static,
    {
        let caster: Caster = Arc::new(move |value: &AnyValue| {
            Arc::clone(value)
                .downcast::<V>()
                .ok()
                .map(|v| Box::new(cast(v)) as Box<dyn Any>)
        });
        self.casts
            .insert(TypeId::of::<T>(), (type_name::<T>(), caster));
    }

    /// Name of the concrete type these capabilities describe
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether a value with these capabilities can be handed out as `T`
    pub fn is_compatible<T: ?Sized + 'static>(&self) -> bool {
        self.casts.contains_key(&TypeId::of::<T>())
    }

    /// Names of every target type, sorted
    pub fn targets(&self) -> Vec<&'static str> {
        let mut targets: Vec<_> = self.casts.values().map(|(name, _)| *name).collect();
        targets.sort_unstable();
        targets
    }

    pub(crate) fn cast<T: ?Sized + 'static>(&self, value: &AnyValue) -> Option<Arc<T>> {
        let (_, caster) = self.casts.get(&TypeId::of::<T>())?;
        caster(value)?.downcast::<Arc<T>>().ok().map(|boxed| *boxed)
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("type_name", &self.type_name)
            .field("targets", &self.targets())
            .finish()
    }
}

/// A value bound to a name
#[derive(Clone)]
pub struct Binding {
    value: AnyValue,
    capabilities: Arc<Capabilities>,
}

impl Binding {
    /// Bind a plain object, castable only to its own type
    pub fn object<V: Any + Send + Sync>(value: V) -> Self {
        Self::builder(value).build()
    }

    /// Bind a textual value. Text is castable to `String` and `str`, and is
    /// also treated as a class identifier by the resolver.
    pub fn text(text: impl Into<String>) -> Self {
        let text: String = text.into();
        Self::builder(text)
            .implements(|s: Arc<String>| Arc::<str>::from(s.as_str()))
            .build()
    }

    /// Start building a binding for `value`
    pub fn builder<V: Any + Send + Sync>(value: V) -> BindingBuilder<V> {
        Self::shared(Arc::new(value))
    }

    /// Start building a binding for an already shared value
    pub fn shared<V: Any + Send + Sync>(value: Arc<V>) -> BindingBuilder<V> {
        BindingBuilder {
            value,
            capabilities: Capabilities::of::<V>(),
        }
    }

    pub(crate) fn from_parts(value: AnyValue, capabilities: Arc<Capabilities>) -> Self {
        Self {
            value,
            capabilities,
        }
    }

    /// Runtime type name of the bound value
    pub fn type_name(&self) -> &'static str {
        self.capabilities.type_name()
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    pub fn is_text(&self) -> bool {
        self.value.is::<String>()
    }

    pub fn as_text(&self) -> Option<&str> {
        self.value.downcast_ref::<String>().map(String::as_str)
    }

    /// Whether this binding can be handed out as `T`
    pub fn is_compatible<T: ?Sized + 'static>(&self) -> bool {
        self.capabilities.is_compatible::<T>()
    }

    /// Cast to `T`, or `None` when the value is not compatible
    pub fn cast<T: ?Sized + 'static>(&self) -> Option<Arc<T>> {
        self.capabilities.cast::<T>(&self.value)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => write!(f, "Binding::Text({text:?})"),
            None => write!(f, "Binding::Object({})", self.type_name()),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_text() {
            Some(text) => f.write_str(text),
            None => write!(f, "<{}>", self.type_name()),
        }
    }
}

/// Builder declaring the interface targets of a bound value
pub struct BindingBuilder<V: Any + Send + Sync> {
    value: Arc<V>,
    capabilities: Capabilities,
}

impl<V: Any + Send + Sync> BindingBuilder<V> {
    /// Declare that the value can be handed out as `T`
    pub fn implements<T, F>(mut self, cast: F) -> Self
    where
        T: ?Sized + 'static,
        F: Fn(Arc<V>) -> Arc<T> + Send + Sync + 'static,
    {
        self.capabilities.add_cast::<V, T, F>(cast);
        self
    }

    pub fn build(self) -> Binding {
        Binding {
            value: self.value,
            capabilities: Arc::new(self.capabilities),
        }
    }
}
