//! The interception hook: a resolver that decorates modules as they load.
//!
//! Installed at the front of an importer's resolver chain, the hook claims
//! every import its filter enables, delegates the real load to the base
//! source, then runs the decoration engine over the fresh module before the
//! importer publishes it. Uninstalling evicts every module the hook touched
//! and re-imports pristine originals.

use crate::core::error::LoadResult;
use crate::decorate::{decorate_module, Decorator};
use crate::intercept::filter::FilterFn;
use crate::module::importer::{Importer, ModuleResolver};
use crate::module::loader::ModuleSource;
use crate::module::namespace::Module;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;

/// A resolver that decorates every module it loads.
pub struct InterceptHook {
    importer: Arc<Importer>,
    decorator: Decorator,
    filter: RwLock<Option<FilterFn>>,
    loaded: Mutex<BTreeSet<String>>,
}

impl InterceptHook {
    /// Create a hook bound to an importer and a decorator.
    pub fn new(importer: Arc<Importer>, decorator: Decorator) -> Self {
        Self {
            importer,
            decorator,
            filter: RwLock::new(None),
            loaded: Mutex::new(BTreeSet::new()),
        }
    }

    /// Restrict the hook to module names the filter enables. With no filter
    /// set, every import is claimed.
    pub fn set_filter(&self, filter: Option<FilterFn>) {
        *self.filter.write() = filter;
    }

    /// Names of the modules this hook has decorated so far.
    pub fn decorated_names(&self) -> Vec<String> {
        self.loaded.lock().iter().cloned().collect()
    }

    /// Check whether the hook is currently in the importer's resolver chain.
    pub fn installed(self: &Arc<Self>) -> bool {
        let resolver: Arc<dyn ModuleResolver> = self.clone();
        self.importer.has_resolver(&resolver)
    }

    /// Insert the hook at the front of the resolver chain. Installing an
    /// already-installed hook is a no-op.
    pub fn install(self: &Arc<Self>) {
        if self.installed() {
            return;
        }
        let resolver: Arc<dyn ModuleResolver> = self.clone();
        self.importer.install_resolver(resolver);
        log::debug!("interception hook installed");
    }

    /// Remove the hook from the chain and restore every module it decorated.
    ///
    /// Each recorded module is evicted from the importer's registry and
    /// re-imported through the now-hookless chain, so callers observe the
    /// undecorated originals again. Uninstalling an already-removed hook is
    /// a no-op.
    pub fn uninstall(self: &Arc<Self>) {
        let resolver: Arc<dyn ModuleResolver> = self.clone();
        if !self.importer.remove_resolver(&resolver) {
            return;
        }

        let decorated = std::mem::take(&mut *self.loaded.lock());
        for fullname in decorated {
            self.importer.evict(&fullname);
            if let Err(err) = self.importer.import(&fullname) {
                log::warn!("could not restore module '{}': {}", fullname, err);
            }
        }
        log::debug!("interception hook removed");
    }

    fn enabled(&self, fullname: &str) -> bool {
        match self.filter.read().as_ref() {
            Some(filter) => filter(fullname),
            None => true,
        }
    }
}

impl ModuleResolver for InterceptHook {
    fn resolve(&self, fullname: &str, source: &dyn ModuleSource) -> Option<LoadResult<Module>> {
        if !self.enabled(fullname) {
            return None;
        }

        let mut module = match source.load(fullname) {
            Ok(module) => module,
            Err(err) => return Some(Err(err)),
        };

        // Record before decorating so a failed restore still gets retried
        // on the next uninstall.
        self.loaded.lock().insert(fullname.to_string());
        decorate_module(&mut module, &self.decorator);
        Some(Ok(module))
    }
}

impl std::fmt::Debug for InterceptHook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterceptHook")
            .field("filtered", &self.filter.read().is_some())
            .field("decorated", &self.loaded.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotation::Annotation;
    use crate::core::callable::{CallArgs, Callable, FunctionDef, Parameter, Signature};
    use crate::core::types::{Value, ValueType};
    use crate::intercept::filter::PrefixFilter;
    use crate::module::loader::SourceRegistry;
    use crate::validate::Validator;

    fn int_identity(module: &str) -> Arc<dyn Callable> {
        FunctionDef::shared(
            Signature::builder("f")
                .module(module)
                .param(Parameter::new("x").annotated(Annotation::Type(ValueType::Integer)))
                .build(),
            |args| Ok(args.require("x")?.clone()),
        )
    }

    fn importer() -> Arc<Importer> {
        let source = SourceRegistry::builder()
            .module("pkg.mod", || {
                Module::new("pkg.mod").function(int_identity("pkg.mod"))
            })
            .module("other.mod", || {
                Module::new("other.mod").function(int_identity("other.mod"))
            })
            .build();
        Arc::new(Importer::new(Arc::new(source)))
    }

    fn hook(importer: &Arc<Importer>) -> Arc<InterceptHook> {
        Arc::new(InterceptHook::new(
            importer.clone(),
            Arc::new(Validator::decorate),
        ))
    }

    #[test]
    fn test_install_is_idempotent() {
        let importer = importer();
        let hook = hook(&importer);

        assert!(!hook.installed());
        hook.install();
        hook.install();
        assert!(hook.installed());
        assert_eq!(importer.resolver_count(), 1);
    }

    #[test]
    fn test_imported_modules_are_decorated() {
        let importer = importer();
        let hook = hook(&importer);
        hook.install();

        let module = importer.import("pkg.mod").unwrap();
        let f = module.get_function("f").unwrap();
        assert!(Validator::is_function_validated(f));
        assert!(f.call(&CallArgs::positional([Value::String("no".into())])).is_err());
        assert_eq!(hook.decorated_names(), vec!["pkg.mod"]);
    }

    #[test]
    fn test_filter_limits_interception() {
        let importer = importer();
        let hook = hook(&importer);
        hook.set_filter(Some(PrefixFilter::new(["pkg"]).into_filter_fn()));
        hook.install();

        let claimed = importer.import("pkg.mod").unwrap();
        assert!(Validator::is_function_validated(
            claimed.get_function("f").unwrap()
        ));

        let declined = importer.import("other.mod").unwrap();
        assert!(!Validator::is_function_validated(
            declined.get_function("f").unwrap()
        ));
        assert_eq!(hook.decorated_names(), vec!["pkg.mod"]);
    }

    #[test]
    fn test_uninstall_restores_originals() {
        let importer = importer();
        let hook = hook(&importer);
        hook.install();

        importer.import("pkg.mod").unwrap();
        hook.uninstall();
        assert!(!hook.installed());

        let restored = importer.import("pkg.mod").unwrap();
        assert!(!Validator::is_function_validated(
            restored.get_function("f").unwrap()
        ));
        assert!(hook.decorated_names().is_empty());
    }

    #[test]
    fn test_uninstall_is_idempotent() {
        let importer = importer();
        let hook = hook(&importer);
        hook.install();
        hook.uninstall();
        hook.uninstall();
        assert_eq!(importer.resolver_count(), 0);
    }

    #[test]
    fn test_load_failure_propagates() {
        let importer = importer();
        let hook = hook(&importer);
        hook.install();

        assert!(importer.import("missing").is_err());
        assert!(hook.decorated_names().is_empty());
    }
}
