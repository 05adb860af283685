//! Lifecycle facade over the interception hook.
//!
//! [`Typesafety`] is the entry point most consumers use: construct one over
//! an importer, activate to start decorating imports, deactivate to restore
//! every touched module. Double activation and deactivation without a prior
//! activation are both errors, so a misordered test harness fails loudly
//! instead of silently stacking hooks.

use crate::core::error::LifecycleError;
use crate::intercept::filter::FilterFn;
use crate::intercept::hook::InterceptHook;
use crate::module::importer::Importer;
use crate::validate::Validator;
use std::sync::Arc;

/// Activates and deactivates validation of imported modules.
pub struct Typesafety {
    importer: Arc<Importer>,
    hook: Option<Arc<InterceptHook>>,
}

impl Typesafety {
    /// Create an inactive instance bound to an importer.
    pub fn new(importer: Arc<Importer>) -> Self {
        Self {
            importer,
            hook: None,
        }
    }

    /// The importer this instance installs its hook into.
    pub fn importer(&self) -> &Arc<Importer> {
        &self.importer
    }

    /// Check whether enforcement is currently active.
    pub fn active(&self) -> bool {
        self.hook.is_some()
    }

    /// Start validating. Modules imported from here on have their eligible
    /// members wrapped in validators; an optional filter limits that to
    /// enabled name prefixes.
    pub fn activate(&mut self, filter: Option<FilterFn>) -> Result<(), LifecycleError> {
        if self.active() {
            return Err(LifecycleError::AlreadyActive);
        }

        let hook = Arc::new(InterceptHook::new(
            self.importer.clone(),
            Arc::new(Validator::decorate),
        ));
        hook.set_filter(filter);
        hook.install();
        self.hook = Some(hook);
        Ok(())
    }

    /// Stop validating and restore every decorated module to its original.
    pub fn deactivate(&mut self) -> Result<(), LifecycleError> {
        let hook = self.hook.take().ok_or(LifecycleError::NotActive)?;
        hook.uninstall();
        Ok(())
    }
}

impl std::fmt::Debug for Typesafety {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typesafety")
            .field("active", &self.active())
            .finish()
    }
}
