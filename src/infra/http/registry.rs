//! Named function entry points, registered once at startup.
//!
//! The binary registers each entry point explicitly and then resolves the one
//! selected by `function.target`; nothing is registered from static
//! initialisers.

use std::collections::BTreeMap;

use axum::Router;
use thiserror::Error;

use super::function::FunctionState;

/// Builds the router for one function from the shared state.
pub type EntryPoint = fn(&FunctionState) -> Router;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("function `{name}` is already registered")]
    Duplicate { name: String },
    #[error("function `{name}` is not registered (available: {available})")]
    Unknown { name: String, available: String },
}

#[derive(Default)]
pub struct FunctionRegistry {
    entries: BTreeMap<&'static str, EntryPoint>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, name: &'static str, entry: EntryPoint) -> Result<(), RegistryError> {
        if self.entries.contains_key(name) {
            return Err(RegistryError::Duplicate {
                name: name.to_string(),
            });
        }
        self.entries.insert(name, entry);
        Ok(())
    }

    pub fn resolve(&self, name: &str) -> Result<EntryPoint, RegistryError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::Unknown {
                name: name.to_string(),
                available: self.names().join(", "),
            })
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::http::function::{MAIN_FUNCTION, markdown_to_html};

    fn empty(_state: &FunctionState) -> Router {
        Router::new()
    }

    #[test]
    fn resolves_registered_entry_points() {
        let mut registry = FunctionRegistry::new();
        registry
            .register(MAIN_FUNCTION, markdown_to_html)
            .expect("register main");
        registry.register("noop", empty).expect("register noop");

        assert!(registry.resolve(MAIN_FUNCTION).is_ok());
        assert_eq!(registry.names(), vec!["main", "noop"]);
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = FunctionRegistry::new();
        registry.register("main", empty).expect("first");
        assert_eq!(
            registry.register("main", empty),
            Err(RegistryError::Duplicate {
                name: "main".to_string()
            })
        );
    }

    #[test]
    fn unknown_target_lists_available_names() {
        let mut registry = FunctionRegistry::new();
        registry.register("main", empty).expect("register");

        let err = registry.resolve("render").expect_err("unknown");
        assert_eq!(
            err.to_string(),
            "function `render` is not registered (available: main)"
        );
    }
}
