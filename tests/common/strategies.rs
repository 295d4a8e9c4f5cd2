use proptest::prelude::*;

/// Strategy for a single name component
pub fn name_component_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,15}"
}

/// Strategy for hierarchical names, optionally carrying a `java:` scheme
pub fn composite_name_strategy() -> impl Strategy<Value = String> {
    (
        any::<bool>(),
        prop::collection::vec(name_component_strategy(), 1..5),
    )
        .prop_map(|(with_scheme, components)| {
            let path = components.join("/");
            if with_scheme {
                format!("java:{path}")
            } else {
                path
            }
        })
}

/// Strategy for type identifiers that are never registered
pub fn unknown_identifier_strategy() -> impl Strategy<Value = String> {
    "missing::[a-z]{1,8}::[A-Z][a-zA-Z]{0,12}"
}
