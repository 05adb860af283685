//! Core types, traits, and error handling.

pub mod annotation;
pub mod callable;
pub mod error;
pub mod types;

pub use annotation::{Annotation, PredicateFn};
pub use callable::{Arguments, CallArgs, Callable, FunctionDef, Parameter, Signature};
pub use error::{
    CallError, CallResult, LifecycleError, LoadError, LoadResult, NamespaceError, TypefenceError,
    TypefenceResult, TypesafetyError,
};
pub use types::{FunctionValue, InstanceValue, Value, ValueType};
