//! The decoration engine: walk a namespace and wrap its eligible members.
//!
//! The engine applies a supplied decorator to every mutable, locally-defined
//! member of a module or class, recursing into nested classes. It never
//! touches attributes excluded by a restricted attribute set, nor module
//! members whose defining module differs from the one being decorated
//! (re-exported names belong to their origin module and were wrapped there).

use crate::core::callable::Callable;
use crate::module::namespace::{Attribute, Module, Namespace, PropertyDef};
use std::sync::Arc;

/// A decorator applied to each eligible callable.
pub type Decorator = Arc<dyn Fn(Arc<dyn Callable>) -> Arc<dyn Callable> + Send + Sync>;

/// Applies a decorator across a whole namespace.
pub struct ModuleDecorator {
    decorator: Decorator,
}

impl ModuleDecorator {
    /// Create an engine around a decorator function.
    pub fn new(decorator: Decorator) -> Self {
        Self { decorator }
    }

    /// Decorate every eligible member of a module.
    pub fn decorate(&self, module: &mut Module) {
        let origin = Namespace::name(module).to_string();
        self.walk(module, Some(origin.as_str()));
    }

    /// Decorate every eligible member of an arbitrary namespace, without
    /// origin-module filtering.
    pub fn decorate_namespace(&self, namespace: &mut dyn Namespace) {
        self.walk(namespace, None);
    }

    fn walk(&self, namespace: &mut dyn Namespace, origin: Option<&str>) {
        for name in namespace.attribute_names() {
            if !namespace.is_assignable(&name) {
                continue;
            }

            let Some(attribute) = namespace.get(&name).cloned() else {
                continue;
            };

            let replacement = match attribute {
                Attribute::Function(function) => {
                    if is_foreign(&function, origin) {
                        continue;
                    }
                    Attribute::Function((self.decorator)(function))
                }
                Attribute::Class(mut class) => {
                    // Classes aggregate members across modules intentionally,
                    // so they are walked without origin filtering.
                    self.walk(&mut class, None);
                    Attribute::Class(class)
                }
                Attribute::Property(property) => {
                    let foreign = property
                        .defining_accessor()
                        .map(|accessor| is_foreign(accessor, origin))
                        .unwrap_or(false);
                    if foreign {
                        continue;
                    }
                    Attribute::Property(self.wrap_property(property))
                }
                Attribute::Static(function) => {
                    if is_foreign(&function, origin) {
                        continue;
                    }
                    Attribute::Static((self.decorator)(function))
                }
                Attribute::ClassMethod(function) => {
                    if is_foreign(&function, origin) {
                        continue;
                    }
                    Attribute::ClassMethod((self.decorator)(function))
                }
                Attribute::Data(_) => continue,
            };

            if let Err(err) = namespace.set(&name, replacement) {
                log::warn!(
                    "could not decorate attribute '{}' of '{}': {}",
                    name,
                    namespace.name(),
                    err
                );
            }
        }
    }

    fn wrap_property(&self, property: PropertyDef) -> PropertyDef {
        PropertyDef {
            getter: property.getter.map(|f| (self.decorator)(f)),
            setter: property.setter.map(|f| (self.decorator)(f)),
            deleter: property.deleter.map(|f| (self.decorator)(f)),
        }
    }
}

/// True when the callable declares a defining module different from the
/// namespace being decorated.
fn is_foreign(function: &Arc<dyn Callable>, origin: Option<&str>) -> bool {
    match (function.signature().module.as_deref(), origin) {
        (Some(module), Some(origin)) => module != origin,
        _ => false,
    }
}

/// Decorate every eligible member of a module with the supplied decorator.
pub fn decorate_module(module: &mut Module, decorator: &Decorator) {
    ModuleDecorator::new(decorator.clone()).decorate(module);
}
