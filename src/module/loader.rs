//! Module sources: where fresh, undecorated modules come from.
//!
//! A [`ModuleSource`] is the "real loader" the interception hook delegates
//! to. The in-memory [`SourceRegistry`] maps fully-qualified names to module
//! factories; every load produces a fresh module object, which is what lets
//! an uninstall re-import pristine, undecorated originals.

use crate::core::error::{LoadError, LoadResult};
use crate::module::namespace::Module;
use indexmap::IndexMap;
use std::sync::Arc;

/// Factory producing a fresh module object on every load.
pub type ModuleFactory = Arc<dyn Fn() -> Module + Send + Sync>;

/// A provider of module objects by fully-qualified name.
pub trait ModuleSource: Send + Sync {
    /// Load a fresh module. Every call returns a new, undecorated object.
    fn load(&self, fullname: &str) -> LoadResult<Module>;

    /// Check whether this source can provide the named module.
    fn contains(&self, fullname: &str) -> bool;
}

/// In-memory module source backed by registered factories.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    factories: IndexMap<String, ModuleFactory>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry builder.
    pub fn builder() -> SourceRegistryBuilder {
        SourceRegistryBuilder::new()
    }

    /// Register a module factory under a fully-qualified name.
    pub fn register<F>(&mut self, fullname: impl Into<String>, factory: F)
    where
        F: Fn() -> Module + Send + Sync + 'static,
    {
        self.factories.insert(fullname.into(), Arc::new(factory));
    }

    /// All registered module names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(|s| s.as_str())
    }

    /// Number of registered modules.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl ModuleSource for SourceRegistry {
    fn load(&self, fullname: &str) -> LoadResult<Module> {
        let factory = self
            .factories
            .get(fullname)
            .ok_or_else(|| LoadError::NotFound(fullname.to_string()))?;
        Ok(factory())
    }

    fn contains(&self, fullname: &str) -> bool {
        self.factories.contains_key(fullname)
    }
}

/// Builder for a customized source registry.
pub struct SourceRegistryBuilder {
    registry: SourceRegistry,
}

impl SourceRegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::new(),
        }
    }

    /// Register a module factory.
    pub fn module<F>(mut self, fullname: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> Module + Send + Sync + 'static,
    {
        self.registry.register(fullname, factory);
        self
    }

    /// Build the registry.
    pub fn build(self) -> SourceRegistry {
        self.registry
    }
}

impl Default for SourceRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
