//! # Typefence - Runtime Type Enforcement
//!
//! Typefence is a runtime type-enforcement library for dynamically-typed
//! value pipelines. Callables declare signatures with annotations; a
//! validator wraps each annotated callable and checks arguments before the
//! body runs and the return value after it. An interception hook plugs into
//! the module importer so whole namespaces get decorated as they load.
//!
//! ## Features
//!
//! - **Declared Signatures**: Callables register parameter and return
//!   annotations through a builder, no reflection required
//! - **Validating Proxies**: Decoration wraps a callable transparently; name,
//!   doc, and declared signature survive
//! - **Namespace Walking**: Modules, classes, properties, and bindings are
//!   decorated recursively, skipping re-exported and restricted members
//! - **Import Interception**: A resolver hook decorates modules at load time,
//!   filtered by dotted name prefixes, and restores originals on uninstall
//! - **Lifecycle Facade**: One handle to activate and deactivate the whole
//!   mechanism, with loud errors on misuse
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use typefence::prelude::*;
//! use std::sync::Arc;
//!
//! // Register module sources
//! let source = SourceRegistry::builder()
//!     .module("math.basic", || {
//!         Module::new("math.basic").function(FunctionDef::shared(
//!             Signature::builder("double")
//!                 .module("math.basic")
//!                 .param(Parameter::new("x").annotated(Annotation::of(ValueType::Integer)))
//!                 .returns(Annotation::of(ValueType::Integer))
//!                 .build(),
//!             |args| Ok(Value::Integer(args.integer("x")? * 2)),
//!         ))
//!     })
//!     .build();
//!
//! // Activate enforcement for the math package
//! let importer = Arc::new(Importer::new(Arc::new(source)));
//! let mut typesafety = Typesafety::new(importer.clone());
//! typesafety.activate(Some(PrefixFilter::new(["math"]).into_filter_fn()))?;
//!
//! // Imported functions now validate their arguments
//! let module = importer.import("math.basic")?;
//! let double = module.get_function("double").unwrap();
//! assert!(double.call(&CallArgs::positional([Value::String("no".into())])).is_err());
//!
//! // Restore the undecorated originals
//! typesafety.deactivate()?;
//! ```
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`core`]: Values, annotations, callables, and error handling
//! - [`validate`]: Annotation recognition and the validating proxy
//! - [`module`]: Namespaces, module sources, and the importer
//! - [`decorate`]: The namespace-walking decoration engine
//! - [`intercept`]: The import hook, name filter, and lifecycle facade
//! - [`signature`]: Signature rendering and decoration-chain resolution

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod decorate;
pub mod intercept;
pub mod module;
pub mod signature;
pub mod validate;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use typefence::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{FunctionValue, InstanceValue, Value, ValueType};

    // Annotations
    pub use crate::core::annotation::{Annotation, PredicateFn};

    // Callables
    pub use crate::core::callable::{
        Arguments, CallArgs, Callable, FunctionBody, FunctionDef, Parameter, Signature,
        SignatureBuilder,
    };

    // Errors
    pub use crate::core::error::{
        CallError, CallResult, LifecycleError, LoadError, LoadResult, NamespaceError,
        TypefenceError, TypefenceResult, TypesafetyError,
    };

    // Validation
    pub use crate::validate::{AnnotationPlan, Rule, Validator};

    // Modules
    pub use crate::module::importer::{Importer, ModuleResolver};
    pub use crate::module::loader::{ModuleFactory, ModuleSource, SourceRegistry, SourceRegistryBuilder};
    pub use crate::module::namespace::{Attribute, ClassDef, Module, Namespace, PropertyDef};

    // Decoration
    pub use crate::decorate::{decorate_module, Decorator, ModuleDecorator};

    // Interception
    pub use crate::intercept::{FilterFn, InterceptHook, PrefixFilter, Typesafety};

    // Signature helpers
    pub use crate::signature::{render_signature, resolve_original};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
