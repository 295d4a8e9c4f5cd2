//! Shared fixtures: sample service types, a populated type registry, and a
//! naming context whose connectivity can be switched off.

use naming_core::binding::Binding;
use naming_core::context::{InMemoryContext, NameClassPair, NamingContext};
use naming_core::error::ContextError;
use naming_core::registry::TypeRegistry;
use naming_core::resolver::NameResolver;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const ENGLISH: &str = "app::greeting::EnglishGreeter";
pub const FRENCH: &str = "app::greeting::FrenchGreeter";
pub const LOUD: &str = "app::greeting::LoudGreeter";
pub const ABSTRACT: &str = "app::greeting::TemplateGreeter";
pub const AUDIT_LOG: &str = "app::audit::AuditLog";

pub trait Greeter: fmt::Debug + Send + Sync {
    fn greet(&self, who: &str) -> String;
}

#[derive(Debug, Default)]
pub struct EnglishGreeter;

impl Greeter for EnglishGreeter {
    fn greet(&self, who: &str) -> String {
        format!("Hello, {who}")
    }
}

#[derive(Debug, Default)]
pub struct FrenchGreeter;

impl Greeter for FrenchGreeter {
    fn greet(&self, who: &str) -> String {
        format!("Bonjour, {who}")
    }
}

/// Needs a volume setting, so construction fails without one
#[derive(Debug)]
pub struct LoudGreeter {
    pub volume: u8,
}

impl Greeter for LoudGreeter {
    fn greet(&self, who: &str) -> String {
        format!("HELLO, {}{}", who.to_uppercase(), "!".repeat(self.volume as usize))
    }
}

#[derive(Debug)]
pub struct TemplateGreeter {
    pub template: String,
}

impl Greeter for TemplateGreeter {
    fn greet(&self, who: &str) -> String {
        self.template.replace("{}", who)
    }
}

/// Registered but unrelated to [`Greeter`]
#[derive(Debug, Default)]
pub struct AuditLog {
    pub entries: Vec<String>,
}

pub fn type_registry() -> Arc<TypeRegistry> {
    let registry = TypeRegistry::new();
    registry
        .register::<EnglishGreeter>(ENGLISH)
        .implements(|g| g as Arc<dyn Greeter>);
    registry
        .register::<FrenchGreeter>(FRENCH)
        .implements(|g| g as Arc<dyn Greeter>);
    registry
        .register_with(LOUD, || Err::<LoudGreeter, _>("volume not configured"))
        .implements(|g| g as Arc<dyn Greeter>);
    registry
        .register_abstract::<TemplateGreeter>(ABSTRACT)
        .implements(|g| g as Arc<dyn Greeter>);
    registry.register::<AuditLog>(AUDIT_LOG);
    Arc::new(registry)
}

pub fn resolver_with_context() -> (Arc<InMemoryContext>, NameResolver) {
    let context = Arc::new(InMemoryContext::new());
    let resolver = NameResolver::new(context.clone(), type_registry());
    (context, resolver)
}

pub fn greeter_binding<G: Greeter + 'static>(greeter: G) -> Binding {
    Binding::builder(greeter)
        .implements(|g| g as Arc<dyn Greeter>)
        .build()
}

/// A context that can lose its connection to the directory
#[derive(Default)]
pub struct ToggleContext {
    inner: InMemoryContext,
    offline: AtomicBool,
}

impl ToggleContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    pub fn go_online(&self) {
        self.offline.store(false, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), ContextError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(ContextError::unreachable("directory connection refused"))
        } else {
            Ok(())
        }
    }
}

impl NamingContext for ToggleContext {
    fn lookup(&self, name: &str) -> Result<Option<Binding>, ContextError> {
        self.check()?;
        self.inner.lookup(name)
    }

    fn bind(&self, name: &str, binding: Binding) -> Result<(), ContextError> {
        self.check()?;
        self.inner.bind(name, binding)
    }

    fn list(&self, context_name: &str) -> Result<Vec<NameClassPair>, ContextError> {
        self.check()?;
        self.inner.list(context_name)
    }
}
