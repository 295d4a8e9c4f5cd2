//! # Name Resolver
//!
//! Typed lookup over a [`NamingContext`] with class-identifier fallback.
//!
//! ## Overview
//!
//! [`NameResolver::resolve`] looks a name up and hands back a value of the
//! requested type, or nothing. When the bound value is not of the requested type
//! but is text, the text is treated as a type identifier: the [`ClassLoader`]
//! resolves it, checks the type against the target, and default-constructs it.
//!
//! Only a failing context surfaces as an error. Every other anomaly is logged as a
//! [`ResolveDiagnostic`] and reported as an empty result. Callers that need to
//! tell "not bound" apart from "bound but unusable" use
//! [`NameResolver::resolve_detailed`].
//!
//! ## Usage
//!
//! ```rust
//! use naming_core::binding::Binding;
//! use naming_core::context::{InMemoryContext, NamingContext};
//! use naming_core::registry::TypeRegistry;
//! use naming_core::resolver::NameResolver;
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!     fn greet(&self) -> String;
//! }
//!
//! #[derive(Default)]
//! struct English;
//! impl Greeter for English {
//!     fn greet(&self) -> String {
//!         "hello".to_string()
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let types = Arc::new(TypeRegistry::new());
//! types
//!     .register::<English>("app::English")
//!     .implements(|g| g as Arc<dyn Greeter>);
//!
//! let context = Arc::new(InMemoryContext::new());
//! context.bind("java:comp/env/greeter", Binding::text("app::English"))?;
//!
//! let resolver = NameResolver::new(context, types);
//! let greeter = resolver.resolve::<dyn Greeter>("java:comp/env/greeter")?;
//! assert_eq!(greeter.unwrap().greet(), "hello");
//!
//! assert!(resolver.resolve::<dyn Greeter>("java:comp/env/missing")?.is_none());
//! # Ok(())
//! # }
//! ```

use crate::binding::Binding;
use crate::context::NamingContext;
use crate::error::{ClassLoadError, NamingError, ResolveDiagnostic, Result};
use crate::logging::{log_lookup_operation, log_resolution_diagnostic};
use crate::registry::ClassLoader;
use std::any::type_name;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of a lookup before non-fatal failures are collapsed
pub enum Resolution<T: ?Sized> {
    /// The bound value itself was compatible with the target type
    Bound(Arc<T>),
    /// The bound text named a type that was default-constructed
    Instantiated(Arc<T>),
    /// Nothing is bound to the name
    NotBound,
    /// A binding exists but could not be turned into the target type
    Rejected(ResolveDiagnostic),
}

impl<T: ?Sized> Resolution<T> {
    /// The resolved value, if any
    pub fn into_value(self) -> Option<Arc<T>> {
        match self {
            Self::Bound(value) | Self::Instantiated(value) => Some(value),
            Self::NotBound | Self::Rejected(_) => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&ResolveDiagnostic> {
        match self {
            Self::Rejected(diagnostic) => Some(diagnostic),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Bound(_) | Self::Instantiated(_))
    }

    fn status(&self) -> &'static str {
        match self {
            Self::Bound(_) => "bound",
            Self::Instantiated(_) => "instantiated",
            Self::NotBound => "not_bound",
            Self::Rejected(_) => "rejected",
        }
    }
}

impl<T: ?Sized> fmt::Debug for Resolution<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bound(_) => write!(f, "Bound({})", type_name::<T>()),
            Self::Instantiated(_) => write!(f, "Instantiated({})", type_name::<T>()),
            Self::NotBound => f.write_str("NotBound"),
            Self::Rejected(diagnostic) => f.debug_tuple("Rejected").field(diagnostic).finish(),
        }
    }
}

/// Resolves names to typed values
#[derive(Clone)]
pub struct NameResolver {
    context: Arc<dyn NamingContext>,
    class_loader: Arc<dyn ClassLoader>,
}

impl NameResolver {
    pub fn new(context: Arc<dyn NamingContext>, class_loader: Arc<dyn ClassLoader>) -> Self {
        Self {
            context,
            class_loader,
        }
    }

    pub fn context(&self) -> &Arc<dyn NamingContext> {
        &self.context
    }

    pub fn class_loader(&self) -> &Arc<dyn ClassLoader> {
        &self.class_loader
    }

    /// Resolve `name` to a `T`.
    ///
    /// Returns `Ok(None)` when nothing is bound and when the binding could not be
    /// turned into a `T`; the latter is logged. Fails only when the context
    /// cannot be consulted. The name is passed to the context untouched.
    pub fn resolve<T: ?Sized + 'static>(&self, name: &str) -> Result<Option<Arc<T>>> {
        match self.resolve_detailed::<T>(name)? {
            Resolution::Rejected(diagnostic) => {
                log_resolution_diagnostic(&diagnostic, type_name::<T>());
                Ok(None)
            }
            resolution => Ok(resolution.into_value()),
        }
    }

    /// Resolve `name` to a `T` without collapsing non-fatal failures
    pub fn resolve_detailed<T: ?Sized + 'static>(&self, name: &str) -> Result<Resolution<T>> {
        let binding = self.context.lookup(name).map_err(|e| {
            warn!(name = %name, error = %e, "Naming context lookup failed");
            NamingError::from_lookup(name, e)
        })?;

        let resolution = match binding {
            Some(binding) => self.coerce::<T>(name, &binding),
            None => Resolution::NotBound,
        };

        log_lookup_operation(
            "resolve",
            name,
            type_name::<T>(),
            resolution.status(),
            resolution.diagnostic().map(ResolveDiagnostic::kind),
        );
        Ok(resolution)
    }

    /// Resolve every direct child of `context_name` that yields a `T`, keyed by
    /// the child's relative name. Subcontexts and unusable bindings are skipped.
    pub fn list<T: ?Sized + 'static>(&self, context_name: &str) -> Result<BTreeMap<String, Arc<T>>> {
        let pairs = self
            .context
            .list(context_name)
            .map_err(|e| NamingError::from_context(context_name, e))?;

        let mut resolved = BTreeMap::new();
        for pair in pairs.into_iter().filter(|pair| !pair.subcontext) {
            let child = child_name(context_name, &pair.name);

            match self.resolve_detailed::<T>(&child)? {
                Resolution::Bound(value) | Resolution::Instantiated(value) => {
                    resolved.insert(pair.name, value);
                }
                Resolution::Rejected(diagnostic) => {
                    debug!(
                        name = %child,
                        reason = diagnostic.kind(),
                        "Skipping child that does not resolve to the requested type"
                    );
                }
                Resolution::NotBound => {}
            }
        }

        debug!(
            context = %context_name,
            target_type = type_name::<T>(),
            resolved = resolved.len(),
            "Listed context"
        );
        Ok(resolved)
    }

    /// Bind a value, failing when the name is already bound
    pub fn bind(&self, name: &str, binding: Binding) -> Result<()> {
        self.context
            .bind(name, binding)
            .map_err(|e| NamingError::from_context(name, e))
    }

    /// Bind a value, replacing any existing binding
    pub fn rebind(&self, name: &str, binding: Binding) -> Result<()> {
        self.context
            .rebind(name, binding)
            .map_err(|e| NamingError::from_context(name, e))
    }

    /// Remove a binding, returning whether one existed
    pub fn unbind(&self, name: &str) -> Result<bool> {
        self.context
            .unbind(name)
            .map_err(|e| NamingError::from_context(name, e))
    }

    fn coerce<T: ?Sized + 'static>(&self, name: &str, binding: &Binding) -> Resolution<T> {
        if let Some(value) = binding.cast::<T>() {
            return Resolution::Bound(value);
        }

        // Text that is not wanted as text may be a type identifier
        let Some(identifier) = binding.as_text() else {
            return Resolution::Rejected(ResolveDiagnostic::TypeMismatch {
                name: name.to_string(),
                expected: type_name::<T>().to_string(),
                actual: binding.type_name().to_string(),
            });
        };

        let descriptor = match self.class_loader.resolve_type(identifier) {
            Ok(descriptor) => descriptor,
            Err(ClassLoadError::NotFound { .. }) => {
                return Resolution::Rejected(ResolveDiagnostic::ClassNotFound {
                    name: name.to_string(),
                    identifier: identifier.to_string(),
                })
            }
            Err(ClassLoadError::ConstructionFailed { reason, .. }) => {
                return Resolution::Rejected(ResolveDiagnostic::InstantiationFailed {
                    name: name.to_string(),
                    identifier: identifier.to_string(),
                    reason,
                })
            }
        };

        let incompatible = || {
            Resolution::Rejected(ResolveDiagnostic::IncompatibleClass {
                name: name.to_string(),
                identifier: descriptor.identifier().to_string(),
                expected: type_name::<T>().to_string(),
            })
        };

        if !descriptor.is_compatible::<T>() {
            return incompatible();
        }

        let instance = match self.class_loader.instantiate_default(&descriptor) {
            Ok(instance) => instance,
            Err(e) => {
                let reason = match e {
                    ClassLoadError::ConstructionFailed { reason, .. } => reason,
                    other => other.to_string(),
                };
                return Resolution::Rejected(ResolveDiagnostic::InstantiationFailed {
                    name: name.to_string(),
                    identifier: descriptor.identifier().to_string(),
                    reason,
                });
            }
        };

        match instance.cast::<T>() {
            Some(value) => Resolution::Instantiated(value),
            None => incompatible(),
        }
    }
}

/// Join a context name and a relative child name with the composite separator.
/// A bare scheme root such as `java:` takes the child directly.
fn child_name(context_name: &str, child: &str) -> String {
    let parent = context_name.trim_end_matches('/');
    if parent.is_empty() || parent.ends_with(':') {
        format!("{parent}{child}")
    } else {
        format!("{parent}/{child}")
    }
}

impl fmt::Debug for NameResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NameResolver").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::InMemoryContext;
    use crate::error::ContextError;
    use crate::registry::TypeRegistry;

    trait Notifier: Send + Sync {
        fn channel(&self) -> &'static str;
    }

    #[derive(Default)]
    struct EmailNotifier;

    impl Notifier for EmailNotifier {
        fn channel(&self) -> &'static str {
            "email"
        }
    }

    #[derive(Default)]
    struct Unrelated;

    struct Unreachable;

    impl NamingContext for Unreachable {
        fn lookup(&self, _name: &str) -> std::result::Result<Option<Binding>, ContextError> {
            Err(ContextError::unreachable("connection refused"))
        }
    }

    fn resolver() -> (Arc<InMemoryContext>, NameResolver) {
        let types = Arc::new(TypeRegistry::new());
        types
            .register::<EmailNotifier>("notify::EmailNotifier")
            .implements(|n| n as Arc<dyn Notifier>);
        types.register::<Unrelated>("notify::Unrelated");
        types
            .register_abstract::<EmailNotifier>("notify::AbstractNotifier")
            .implements(|n| n as Arc<dyn Notifier>);

        let context = Arc::new(InMemoryContext::new());
        let resolver = NameResolver::new(context.clone(), types);
        (context, resolver)
    }

    #[test]
    fn test_compatible_binding_returned_as_is() {
        let (context, resolver) = resolver();
        let shared = Arc::new(EmailNotifier);
        context
            .bind(
                "notify/primary",
                Binding::shared(shared.clone())
                    .implements(|n| n as Arc<dyn Notifier>)
                    .build(),
            )
            .unwrap();

        let concrete = resolver
            .resolve::<EmailNotifier>("notify/primary")
            .unwrap()
            .unwrap();
        assert!(Arc::ptr_eq(&concrete, &shared));

        let resolution = resolver
            .resolve_detailed::<dyn Notifier>("notify/primary")
            .unwrap();
        assert!(matches!(resolution, Resolution::Bound(_)));
    }

    #[test]
    fn test_text_fallback_instantiates() {
        let (context, resolver) = resolver();
        context
            .bind("notify/default", Binding::text("notify::EmailNotifier"))
            .unwrap();

        let resolution = resolver
            .resolve_detailed::<dyn Notifier>("notify/default")
            .unwrap();
        assert!(matches!(resolution, Resolution::Instantiated(_)));
        assert_eq!(resolution.into_value().unwrap().channel(), "email");
    }

    #[test]
    fn test_text_requested_as_text_is_not_instantiated() {
        let (context, resolver) = resolver();
        context
            .bind("notify/default", Binding::text("notify::EmailNotifier"))
            .unwrap();

        let text = resolver.resolve::<str>("notify/default").unwrap().unwrap();
        assert_eq!(&*text, "notify::EmailNotifier");
        let owned = resolver.resolve::<String>("notify/default").unwrap().unwrap();
        assert_eq!(owned.as_str(), "notify::EmailNotifier");
    }

    #[test]
    fn test_each_diagnostic_collapses_to_none() {
        let (context, resolver) = resolver();
        context.bind("a/mismatch", Binding::object(7u64)).unwrap();
        context.bind("a/missing", Binding::text("notify::Nope")).unwrap();
        context
            .bind("a/incompatible", Binding::text("notify::Unrelated"))
            .unwrap();
        context
            .bind("a/abstract", Binding::text("notify::AbstractNotifier"))
            .unwrap();

        let cases = [
            ("a/mismatch", "type_mismatch"),
            ("a/missing", "class_not_found"),
            ("a/incompatible", "incompatible_class"),
            ("a/abstract", "instantiation_failed"),
        ];

        for (name, kind) in cases {
            let detailed = resolver.resolve_detailed::<dyn Notifier>(name).unwrap();
            assert_eq!(detailed.diagnostic().map(ResolveDiagnostic::kind), Some(kind));
            assert!(resolver.resolve::<dyn Notifier>(name).unwrap().is_none());
        }
    }

    #[test]
    fn test_unbound_name_is_empty_not_error() {
        let (_, resolver) = resolver();
        let resolution = resolver.resolve_detailed::<dyn Notifier>("nothing/here").unwrap();
        assert!(matches!(resolution, Resolution::NotBound));
        assert!(!resolution.is_found());
    }

    #[test]
    fn test_unreachable_context_is_fatal() {
        let resolver = NameResolver::new(Arc::new(Unreachable), Arc::new(TypeRegistry::new()));
        let err = resolver.resolve::<String>("anything").unwrap_err();
        assert!(err.is_unavailable());
    }

    /// Directory with its own URL-style names and its own idea of validity
    struct LdapDirectory;

    impl NamingContext for LdapDirectory {
        fn lookup(&self, name: &str) -> std::result::Result<Option<Binding>, ContextError> {
            match name {
                "ldap://localhost:389/o=app" => Ok(Some(Binding::text("hello"))),
                n if n.starts_with("ldap://") => Ok(None),
                n => Err(ContextError::invalid_name(n, "registry says no")),
            }
        }
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<parking_lot::Mutex<Vec<u8>>>);

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock()).into_owned()
        }
    }

    impl std::io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_names_are_passed_to_context_untouched() {
        let resolver = NameResolver::new(Arc::new(LdapDirectory), Arc::new(TypeRegistry::new()));

        let value = resolver
            .resolve::<String>("ldap://localhost:389/o=app")
            .unwrap()
            .unwrap();
        assert_eq!(value.as_str(), "hello");
        assert!(resolver
            .resolve::<String>("ldap://localhost:389/o=other")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_context_name_rejection_is_unavailable() {
        let resolver = NameResolver::new(Arc::new(LdapDirectory), Arc::new(TypeRegistry::new()));
        let err = resolver.resolve::<String>("valid/name").unwrap_err();
        assert_eq!(
            err,
            NamingError::registry_unavailable(
                "valid/name",
                "Invalid name 'valid/name': registry says no"
            )
        );
    }

    #[test]
    fn test_resolve_logs_diagnostic_for_rejected_binding() {
        let (context, resolver) = resolver();
        context.bind("a/mismatch", Binding::object(7u64)).unwrap();
        context.bind("a/missing", Binding::text("notify::Nope")).unwrap();

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::ERROR)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            assert!(resolver.resolve::<dyn Notifier>("a/mismatch").unwrap().is_none());
            assert!(resolver.resolve::<dyn Notifier>("a/missing").unwrap().is_none());
            assert!(resolver.resolve::<dyn Notifier>("a/unbound").unwrap().is_none());
        });

        let output = logs.contents();
        assert_eq!(output.matches("RESOLUTION_DIAGNOSTIC").count(), 2, "{output}");
        assert!(output.contains("kind=\"type_mismatch\""), "{output}");
        assert!(output.contains("kind=\"class_not_found\""), "{output}");
        assert!(!output.contains("a/unbound"), "{output}");
    }

    #[test]
    fn test_child_name_joining() {
        assert_eq!(child_name("java:comp/env", "mail"), "java:comp/env/mail");
        assert_eq!(child_name("java:comp/env/", "mail"), "java:comp/env/mail");
        assert_eq!(child_name("java:", "comp"), "java:comp");
    }

    #[test]
    fn test_read_only_context_rejects_bind() {
        let resolver = NameResolver::new(Arc::new(Unreachable), Arc::new(TypeRegistry::new()));
        let err = resolver.bind("x", Binding::text("y")).unwrap_err();
        assert_eq!(
            err,
            NamingError::NotSupported {
                operation: "bind".to_string()
            }
        );
    }

    #[test]
    fn test_list_keeps_only_matching_children() {
        let (context, resolver) = resolver();
        context
            .bind("java:comp/env/notify/email", Binding::text("notify::EmailNotifier"))
            .unwrap();
        context
            .bind("java:comp/env/notify/other", Binding::text("notify::Unrelated"))
            .unwrap();
        context
            .bind("java:comp/env/notify/nested/deep", Binding::text("notify::EmailNotifier"))
            .unwrap();

        let notifiers = resolver
            .list::<dyn Notifier>("java:comp/env/notify")
            .unwrap();
        assert_eq!(notifiers.len(), 1);
        assert_eq!(notifiers["email"].channel(), "email");
    }
}
