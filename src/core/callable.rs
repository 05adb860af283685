//! The Callable trait, declared signatures, and argument binding.
//!
//! Rust cannot enumerate the parameter names or defaults of an arbitrary
//! function at runtime, so callables declare them explicitly: a [`Signature`]
//! is the statically declared rule table a [`crate::validate::Validator`]
//! enforces. The [`Signature::builder`] mirrors the registration-time builder
//! used everywhere else in this crate.

use crate::core::annotation::Annotation;
use crate::core::error::{CallError, CallResult};
use crate::core::types::{Value, ValueType};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// Declaration of a single callable parameter.
#[derive(Debug, Clone)]
pub struct Parameter {
    /// Parameter name, unique within the signature.
    pub name: String,
    /// Raw annotation, if any. Recognition happens at plan construction.
    pub annotation: Option<Annotation>,
    /// Declared default value, if any.
    pub default: Option<Value>,
}

impl Parameter {
    /// Create an unannotated parameter.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotation: None,
            default: None,
        }
    }

    /// Attach an annotation.
    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotation = Some(annotation);
        self
    }

    /// Attach a default value.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

/// Declared signature of a callable.
///
/// Holds everything the enforcement layer knows about a callable: its
/// identity (name, defining module, doc) and its parameter/return
/// declarations. Built once at registration, never mutated.
#[derive(Debug, Clone)]
pub struct Signature {
    /// Callable name.
    pub name: String,
    /// Fully-qualified name of the defining module, when known. Used to
    /// avoid re-wrapping names re-exported from elsewhere.
    pub module: Option<String>,
    /// Documentation string.
    pub doc: Option<String>,
    /// Opt-out marker: a callable with this flag set is never decorated,
    /// regardless of its annotations.
    pub skip: bool,
    /// Parameter declarations, in declaration order.
    pub parameters: Vec<Parameter>,
    /// Return annotation, if any.
    pub returns: Option<Annotation>,
}

impl Signature {
    /// Create a new signature builder.
    pub fn builder(name: impl Into<String>) -> SignatureBuilder {
        SignatureBuilder::new(name)
    }

    /// Find a parameter by name.
    pub fn get_parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// All parameter names in declaration order.
    pub fn parameter_names(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.name.as_str()).collect()
    }

    /// Bind a call's arguments against this signature.
    ///
    /// Declared defaults are filled in first, positional arguments then fill
    /// declared parameter slots left-to-right (extras beyond the declared
    /// count are dropped), and named arguments fill by name last. Named
    /// arguments that do not match a declared parameter are passed through
    /// untouched; the body decides what to do with them.
    pub fn bind(&self, args: &CallArgs) -> Arguments {
        let mut values: IndexMap<String, Value> = IndexMap::new();

        for parameter in &self.parameters {
            if let Some(default) = &parameter.default {
                values.insert(parameter.name.clone(), default.clone());
            }
        }

        for (index, value) in args.positional.iter().enumerate() {
            if let Some(parameter) = self.parameters.get(index) {
                values.insert(parameter.name.clone(), value.clone());
            }
        }

        for (name, value) in &args.named {
            values.insert(name.clone(), value.clone());
        }

        Arguments {
            function: self.name.clone(),
            values,
        }
    }
}

/// Builder for [`Signature`].
pub struct SignatureBuilder {
    name: String,
    module: Option<String>,
    doc: Option<String>,
    skip: bool,
    parameters: Vec<Parameter>,
    returns: Option<Annotation>,
}

impl SignatureBuilder {
    /// Create a builder for the named callable.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            doc: None,
            skip: false,
            parameters: Vec::new(),
            returns: None,
        }
    }

    /// Set the defining module.
    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }

    /// Set the documentation string.
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Mark the callable as exempt from decoration.
    pub fn skip(mut self) -> Self {
        self.skip = true;
        self
    }

    /// Add a parameter declaration.
    pub fn param(mut self, parameter: Parameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Set the return annotation.
    pub fn returns(mut self, annotation: Annotation) -> Self {
        self.returns = Some(annotation);
        self
    }

    /// Build the signature.
    pub fn build(self) -> Signature {
        Signature {
            name: self.name,
            module: self.module,
            doc: self.doc,
            skip: self.skip,
            parameters: self.parameters,
            returns: self.returns,
        }
    }
}

/// Arguments as supplied at a call site: positional left-to-right plus
/// named values.
#[derive(Debug, Clone, Default)]
pub struct CallArgs {
    positional: Vec<Value>,
    named: IndexMap<String, Value>,
}

impl CallArgs {
    /// Create an empty argument pack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an argument pack from positional values.
    pub fn positional(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            positional: values.into_iter().collect(),
            named: IndexMap::new(),
        }
    }

    /// Append a positional argument, builder style.
    pub fn arg(mut self, value: Value) -> Self {
        self.positional.push(value);
        self
    }

    /// Append a named argument, builder style.
    pub fn named(mut self, name: impl Into<String>, value: Value) -> Self {
        self.named.insert(name.into(), value);
        self
    }

    /// Number of positional arguments.
    pub fn positional_len(&self) -> usize {
        self.positional.len()
    }

    /// Check whether the pack is empty.
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.named.is_empty()
    }
}

/// Bound call locals: the name-to-value mapping a callable body reads from.
#[derive(Debug, Clone)]
pub struct Arguments {
    function: String,
    values: IndexMap<String, Value>,
}

impl Arguments {
    /// Name of the callable these arguments were bound for.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Get a bound value by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Check if a name was bound.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over all bound values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Get a bound value, failing if absent.
    pub fn require(&self, name: &str) -> CallResult<&Value> {
        self.values.get(name).ok_or_else(|| CallError::MissingArgument {
            function: self.function.clone(),
            name: name.to_string(),
        })
    }

    /// Get a bound value as an integer.
    pub fn integer(&self, name: &str) -> CallResult<i64> {
        self.require(name)?
            .as_integer()
            .ok_or_else(|| self.wrong_type(name, ValueType::Integer))
    }

    /// Get a bound value as a float. Integers are widened.
    pub fn float(&self, name: &str) -> CallResult<f64> {
        self.require(name)?
            .as_float()
            .ok_or_else(|| self.wrong_type(name, ValueType::Float))
    }

    /// Get a bound value as a string.
    pub fn string(&self, name: &str) -> CallResult<&str> {
        self.require(name)?
            .as_string()
            .ok_or_else(|| self.wrong_type(name, ValueType::String))
    }

    /// Get a bound value as a boolean.
    pub fn boolean(&self, name: &str) -> CallResult<bool> {
        self.require(name)?
            .as_bool()
            .ok_or_else(|| self.wrong_type(name, ValueType::Boolean))
    }

    /// Get a bound value as a list.
    pub fn list(&self, name: &str) -> CallResult<&Vec<Value>> {
        self.require(name)?
            .as_list()
            .ok_or_else(|| self.wrong_type(name, ValueType::List))
    }

    fn wrong_type(&self, name: &str, expected: ValueType) -> CallError {
        CallError::WrongArgumentType {
            function: self.function.clone(),
            name: name.to_string(),
            expected,
        }
    }
}

/// The core trait for callables subject to enforcement.
///
/// `call` receives the raw call-site arguments; each implementation binds
/// them against its own declared signature. A validating proxy reports the
/// wrapped callable's signature as its own, so name and doc survive
/// decoration.
pub trait Callable: Send + Sync {
    /// The declared signature of this callable.
    fn signature(&self) -> &Signature;

    /// Invoke the callable with call-site arguments.
    fn call(&self, args: &CallArgs) -> CallResult<Value>;

    /// The validator bound to this callable, if it is a validating proxy.
    fn validator(&self) -> Option<&crate::validate::Validator> {
        None
    }

    /// The callable this one decorates, if any.
    ///
    /// Any wrapper (validating or otherwise) can expose its wrapped callable
    /// here; the signature renderer follows this chain to find the original.
    fn decorated(&self) -> Option<&Arc<dyn Callable>> {
        None
    }
}

impl fmt::Debug for dyn Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callable")
            .field("name", &self.signature().name)
            .finish()
    }
}

/// Body of a native function: receives the bound locals, produces a value.
pub type FunctionBody = Arc<dyn Fn(&Arguments) -> anyhow::Result<Value> + Send + Sync>;

/// A plain function: a declared signature plus a body closure.
#[derive(Clone)]
pub struct FunctionDef {
    signature: Signature,
    body: FunctionBody,
}

impl FunctionDef {
    /// Create a function from a signature and a body.
    pub fn new(
        signature: Signature,
        body: impl Fn(&Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Self {
        Self {
            signature,
            body: Arc::new(body),
        }
    }

    /// Create a function and box it for registration.
    pub fn shared(
        signature: Signature,
        body: impl Fn(&Arguments) -> anyhow::Result<Value> + Send + Sync + 'static,
    ) -> Arc<dyn Callable> {
        Arc::new(Self::new(signature, body))
    }
}

impl Callable for FunctionDef {
    fn signature(&self) -> &Signature {
        &self.signature
    }

    fn call(&self, args: &CallArgs) -> CallResult<Value> {
        let bound = self.signature.bind(args);
        (self.body)(&bound).map_err(|source| CallError::Body {
            function: self.signature.name.clone(),
            source,
        })
    }
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("signature", &self.signature)
            .field("body", &"<closure>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ValueType;

    fn add_signature() -> Signature {
        Signature::builder("add")
            .module("math.basic")
            .param(Parameter::new("a").annotated(Annotation::Type(ValueType::Integer)))
            .param(
                Parameter::new("b")
                    .annotated(Annotation::Type(ValueType::Integer))
                    .with_default(Value::Integer(1)),
            )
            .returns(Annotation::Type(ValueType::Integer))
            .build()
    }

    #[test]
    fn test_signature_builder() {
        let sig = add_signature();
        assert_eq!(sig.name, "add");
        assert_eq!(sig.module.as_deref(), Some("math.basic"));
        assert_eq!(sig.parameter_names(), vec!["a", "b"]);
        assert!(!sig.skip);
        assert!(sig.returns.is_some());
    }

    #[test]
    fn test_bind_positional_and_defaults() {
        let sig = add_signature();
        let bound = sig.bind(&CallArgs::positional([Value::Integer(5)]));
        assert_eq!(bound.get("a"), Some(&Value::Integer(5)));
        // b backfilled from its declared default
        assert_eq!(bound.get("b"), Some(&Value::Integer(1)));
    }

    #[test]
    fn test_bind_named_overrides_default() {
        let sig = add_signature();
        let bound = sig.bind(
            &CallArgs::positional([Value::Integer(5)]).named("b", Value::Integer(7)),
        );
        assert_eq!(bound.get("b"), Some(&Value::Integer(7)));
    }

    #[test]
    fn test_bind_ignores_extra_positionals() {
        let sig = add_signature();
        let bound = sig.bind(&CallArgs::positional([
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
        ]));
        assert_eq!(bound.get("a"), Some(&Value::Integer(1)));
        assert_eq!(bound.get("b"), Some(&Value::Integer(2)));
    }

    #[test]
    fn test_bind_passes_unknown_named_through() {
        let sig = add_signature();
        let bound = sig.bind(&CallArgs::new().named("extra", Value::Boolean(true)));
        assert_eq!(bound.get("extra"), Some(&Value::Boolean(true)));
    }

    #[test]
    fn test_function_def_call() {
        let function = FunctionDef::new(add_signature(), |args| {
            Ok(Value::Integer(args.integer("a")? + args.integer("b")?))
        });

        let result = function
            .call(&CallArgs::positional([Value::Integer(2), Value::Integer(3)]))
            .unwrap();
        assert_eq!(result, Value::Integer(5));
    }

    #[test]
    fn test_function_def_missing_argument_surfaces_as_body_error() {
        let function = FunctionDef::new(add_signature(), |args| {
            Ok(Value::Integer(args.integer("a")? + args.integer("b")?))
        });

        // a has no default and no value: the body fails looking it up
        let err = function.call(&CallArgs::new()).unwrap_err();
        assert!(matches!(err, CallError::Body { .. }));
    }
}
