//! Hierarchical names of the form `scheme:first/second/leaf`.

use crate::error::ContextError;
use std::fmt;
use std::str::FromStr;

/// A parsed, validated name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeName {
    scheme: Option<String>,
    components: Vec<String>,
}

impl CompositeName {
    /// Parse a name, rejecting empty names, empty components and names with
    /// surrounding whitespace. A single trailing `/` is ignored.
    pub fn parse(name: &str) -> Result<Self, ContextError> {
        if name.is_empty() {
            return Err(ContextError::invalid_name(name, "name is empty"));
        }
        if name.trim() != name {
            return Err(ContextError::invalid_name(
                name,
                "leading or trailing whitespace",
            ));
        }

        let body = name.strip_suffix('/').unwrap_or(name);

        let first_segment = body.split('/').next().unwrap_or_default();
        let (scheme, path) = match first_segment.find(':') {
            Some(idx) => {
                let scheme = &body[..idx];
                if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
                    return Err(ContextError::invalid_name(name, "invalid scheme"));
                }
                (Some(scheme.to_string()), &body[idx + 1..])
            }
            None => (None, body),
        };

        if path.is_empty() {
            return match scheme {
                Some(scheme) => Ok(Self {
                    scheme: Some(scheme),
                    components: Vec::new(),
                }),
                None => Err(ContextError::invalid_name(name, "name is empty")),
            };
        }

        let mut components = Vec::new();
        for component in path.split('/') {
            if component.is_empty() {
                return Err(ContextError::invalid_name(name, "empty component"));
            }
            components.push(component.to_string());
        }

        Ok(Self { scheme, components })
    }

    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    pub fn components(&self) -> &[String] {
        &self.components
    }

    /// Final component, `None` for a bare scheme root such as `java:`
    pub fn last(&self) -> Option<&str> {
        self.components.last().map(String::as_str)
    }

    /// Append a relative component
    pub fn child(&self, component: &str) -> Result<Self, ContextError> {
        if component.is_empty() || component.contains('/') {
            return Err(ContextError::invalid_name(
                component,
                "child must be a single non-empty component",
            ));
        }
        let mut child = self.clone();
        child.components.push(component.to_string());
        Ok(child)
    }

    /// The component directly below `context`, if this name is one level under it
    pub fn child_of(&self, context: &CompositeName) -> Option<&str> {
        if self.scheme != context.scheme || self.components.len() != context.components.len() + 1
        {
            return None;
        }
        self.components
            .starts_with(&context.components)
            .then(|| self.components[context.components.len()].as_str())
    }

    /// Whether `other` lies strictly below this name
    pub fn is_ancestor_of(&self, other: &CompositeName) -> bool {
        self.scheme == other.scheme
            && self.components.len() < other.components.len()
            && other.components.starts_with(&self.components)
    }

    /// The component directly below `context` on the way to this name,
    /// for any name nested deeper than one level
    pub fn descendant_of(&self, context: &CompositeName) -> Option<&str> {
        if self.scheme != context.scheme || self.components.len() <= context.components.len() + 1
        {
            return None;
        }
        self.components
            .starts_with(&context.components)
            .then(|| self.components[context.components.len()].as_str())
    }
}

impl fmt::Display for CompositeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(scheme) = &self.scheme {
            write!(f, "{scheme}:")?;
        }
        f.write_str(&self.components.join("/"))
    }
}

impl FromStr for CompositeName {
    type Err = ContextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
