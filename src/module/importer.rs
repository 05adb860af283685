//! The importer: resolver chain plus the loaded-module registry.
//!
//! This is the well-defined extension point the interception hook plugs
//! into. Resolvers are consulted front-to-back before the base source; the
//! registry caches loaded modules by name, so a second import of the same
//! name never re-runs resolution (and therefore never re-decorates).

use crate::core::error::LoadResult;
use crate::module::loader::ModuleSource;
use crate::module::namespace::Module;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;

/// A participant in module resolution.
pub trait ModuleResolver: Send + Sync {
    /// Attempt to resolve a module.
    ///
    /// Return `None` to decline and yield to the next resolver in the chain;
    /// return `Some` to claim the load, successful or not.
    fn resolve(&self, fullname: &str, source: &dyn ModuleSource) -> Option<LoadResult<Module>>;
}

/// Imports modules through a resolver chain, caching results by name.
///
/// Shared state is behind locks only because the importer itself is shared;
/// the execution model is single-threaded cooperative and imports are not
/// expected to race.
pub struct Importer {
    resolvers: RwLock<Vec<Arc<dyn ModuleResolver>>>,
    registry: RwLock<IndexMap<String, Arc<Module>>>,
    source: Arc<dyn ModuleSource>,
}

impl Importer {
    /// Create an importer over a base source.
    pub fn new(source: Arc<dyn ModuleSource>) -> Self {
        Self {
            resolvers: RwLock::new(Vec::new()),
            registry: RwLock::new(IndexMap::new()),
            source,
        }
    }

    /// The base source modules are loaded from when no resolver claims them.
    pub fn source(&self) -> &Arc<dyn ModuleSource> {
        &self.source
    }

    /// Import a module by fully-qualified name.
    ///
    /// A registry hit short-circuits resolution entirely. Otherwise the
    /// first resolver to claim the name wins; with no claim, the base source
    /// loads it. The module is published in the registry before it is
    /// returned to the importer's caller.
    pub fn import(&self, fullname: &str) -> LoadResult<Arc<Module>> {
        if let Some(module) = self.registry.read().get(fullname) {
            return Ok(module.clone());
        }

        let resolvers: Vec<Arc<dyn ModuleResolver>> = self.resolvers.read().clone();
        let resolved = resolvers
            .iter()
            .find_map(|resolver| resolver.resolve(fullname, self.source.as_ref()));

        let module = match resolved {
            Some(result) => result?,
            None => self.source.load(fullname)?,
        };

        let module = Arc::new(module);
        self.registry
            .write()
            .insert(fullname.to_string(), module.clone());
        Ok(module)
    }

    /// Get an already-imported module without triggering a load.
    pub fn get(&self, fullname: &str) -> Option<Arc<Module>> {
        self.registry.read().get(fullname).cloned()
    }

    /// Evict a module from the registry, returning it if it was present.
    pub fn evict(&self, fullname: &str) -> Option<Arc<Module>> {
        self.registry.write().shift_remove(fullname)
    }

    /// Names of all currently registered modules.
    pub fn loaded_names(&self) -> Vec<String> {
        self.registry.read().keys().cloned().collect()
    }

    /// Insert a resolver at the front of the chain, so it observes every
    /// import before any later-registered resolver.
    pub fn install_resolver(&self, resolver: Arc<dyn ModuleResolver>) {
        self.resolvers.write().insert(0, resolver);
    }

    /// Remove a resolver from the chain by identity. Returns whether it was
    /// present.
    pub fn remove_resolver(&self, resolver: &Arc<dyn ModuleResolver>) -> bool {
        let mut resolvers = self.resolvers.write();
        let before = resolvers.len();
        resolvers.retain(|candidate| !same_resolver(candidate, resolver));
        resolvers.len() != before
    }

    /// Check whether a resolver is currently in the chain.
    pub fn has_resolver(&self, resolver: &Arc<dyn ModuleResolver>) -> bool {
        self.resolvers
            .read()
            .iter()
            .any(|candidate| same_resolver(candidate, resolver))
    }

    /// Number of resolvers in the chain.
    pub fn resolver_count(&self) -> usize {
        self.resolvers.read().len()
    }
}

fn same_resolver(a: &Arc<dyn ModuleResolver>, b: &Arc<dyn ModuleResolver>) -> bool {
    // Compare by object identity; thin-pointer comparison avoids the vtable.
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}
