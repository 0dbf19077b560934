//! Function registry for looking up validator functions by name.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::Error;
use crate::function::Function;

/// Registry of available validator functions.
///
/// Registration takes `&mut self`; once a registry is shared for
/// evaluation it can no longer change.
#[derive(Default, Clone)]
pub struct Registry {
    functions: HashMap<String, Arc<dyn Function>>,
}

impl Registry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the builtin functions.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::builtin::register_all(&mut registry);
        registry
    }

    /// Register a function under `name`, failing if the name is taken.
    pub fn register(&mut self, name: impl Into<String>, f: impl Function + 'static) -> Result<(), Error> {
        self.register_arc(name, Arc::new(f))
    }

    /// Register a function that's already in an Arc.
    pub fn register_arc(&mut self, name: impl Into<String>, f: Arc<dyn Function>) -> Result<(), Error> {
        let name = name.into();
        if self.functions.contains_key(&name) {
            return Err(Error::DuplicateFunction(name));
        }
        self.functions.insert(name, f);
        Ok(())
    }

    /// Register a function, panicking if the name is taken.
    ///
    /// Meant for wiring code where a conflict is a programming error.
    pub fn must_register(&mut self, name: impl Into<String>, f: impl Function + 'static) {
        let name = name.into();
        if let Err(err) = self.register(name.clone(), f) {
            panic!("register {name:?}: {err}");
        }
    }

    /// Register a function, replacing any previous one with the same name.
    pub fn replace(&mut self, name: impl Into<String>, f: impl Function + 'static) -> Option<Arc<dyn Function>> {
        self.functions.insert(name.into(), Arc::new(f))
    }

    /// Look up a function by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Function>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// List all function names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.functions.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("functions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::BoolFunction;

    #[test]
    fn test_register_and_get() {
        let mut registry = Registry::new();
        registry.register("yes", BoolFunction::new(true)).unwrap();

        assert!(registry.contains("yes"));
        assert!(registry.get("yes").is_some());
        assert!(!registry.contains("no"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_conflict() {
        let mut registry = Registry::new();
        registry.register("yes", BoolFunction::new(true)).unwrap();
        let err = registry.register("yes", BoolFunction::new(false)).unwrap_err();
        assert!(matches!(err, Error::DuplicateFunction(name) if name == "yes"));

        assert!(registry.replace("yes", BoolFunction::new(false)).is_some());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    #[should_panic(expected = "already registered")]
    fn test_must_register_panics_on_conflict() {
        let mut registry = Registry::with_builtins();
        registry.must_register("required", BoolFunction::new(true));
    }

    #[test]
    fn test_builtin_names_sorted() {
        let registry = Registry::with_builtins();
        assert_eq!(
            registry.names(),
            vec!["email", "eq", "false", "isbn10", "isbn13", "one_of", "required", "true"]
        );
    }
}
