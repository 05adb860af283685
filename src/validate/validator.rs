//! The per-callable validator and its decoration entry points.
//!
//! A [`Validator`] wraps exactly one callable and enforces its annotation
//! plan on every invocation. The validator is itself a [`Callable`]: it is
//! the transparent proxy returned by [`Validator::decorate`], reporting the
//! wrapped callable's signature as its own so name and doc survive.

use crate::core::callable::{Arguments, CallArgs, Callable, Signature};
use crate::core::error::{CallResult, TypesafetyError};
use crate::core::types::Value;
use crate::validate::plan::AnnotationPlan;
use std::fmt;
use std::sync::Arc;

/// Argument and return value enforcement for one wrapped callable.
pub struct Validator {
    function: Arc<dyn Callable>,
    plan: AnnotationPlan,
}

impl Validator {
    /// Build a validator for a callable from its declared signature.
    pub fn new(function: Arc<dyn Callable>) -> Self {
        let plan = AnnotationPlan::build(function.signature());
        Self { function, plan }
    }

    /// The wrapped, undecorated callable.
    pub fn function(&self) -> &Arc<dyn Callable> {
        &self.function
    }

    /// The cached annotation plan.
    pub fn plan(&self) -> &AnnotationPlan {
        &self.plan
    }

    /// True if any of the arguments need to be checked.
    pub fn need_validate_arguments(&self) -> bool {
        self.plan.has_argument_rules()
    }

    /// True if the return value needs to be checked.
    pub fn need_validate_return_value(&self) -> bool {
        self.plan.has_return_rule()
    }

    /// Validate bound call locals against the argument rules.
    ///
    /// Every parameter with a rule must be present and must satisfy it.
    pub fn validate_arguments(&self, bound: &Arguments) -> Result<(), TypesafetyError> {
        for (name, rule) in self.plan.argument_rules() {
            let value = bound
                .get(name)
                .ok_or_else(|| TypesafetyError::MissingArgument {
                    parameter: name.clone(),
                })?;

            if !rule.matches(value) {
                return Err(TypesafetyError::InvalidArgument {
                    parameter: name.clone(),
                    function: self.function.signature().name.clone(),
                    expected: rule.expectation(),
                    got: value.type_name(),
                });
            }
        }

        Ok(())
    }

    /// Validate a return value against the return rule, if any.
    pub fn validate_return_value(&self, value: &Value) -> Result<(), TypesafetyError> {
        let Some(rule) = self.plan.return_rule() else {
            return Ok(());
        };

        if !rule.matches(value) {
            return Err(TypesafetyError::InvalidReturnValue {
                function: self.function.signature().name.clone(),
                expected: rule.expectation(),
                got: value.type_name(),
            });
        }

        Ok(())
    }

    // ========================================================================
    // Decoration entry points
    // ========================================================================

    /// Decorate a callable so every call is checked.
    ///
    /// Returns the callable itself when it is already decorated, carries the
    /// skip marker, or has nothing worth validating; otherwise returns a
    /// validating proxy.
    pub fn decorate(function: Arc<dyn Callable>) -> Arc<dyn Callable> {
        if function.validator().is_some() || function.signature().skip {
            return function;
        }

        let validator = Validator::new(function.clone());
        if !validator.need_validate_arguments() && !validator.need_validate_return_value() {
            return function;
        }

        Arc::new(validator)
    }

    /// Remove validator decoration from a callable.
    ///
    /// Safe on non-decorated input: the callable is returned unchanged.
    pub fn undecorate(function: Arc<dyn Callable>) -> Arc<dyn Callable> {
        match function.validator() {
            Some(validator) => validator.function().clone(),
            None => function,
        }
    }

    /// Check whether a callable carries a bound validator.
    pub fn is_function_validated(function: &Arc<dyn Callable>) -> bool {
        function.validator().is_some()
    }

    /// Get the validator bound to a callable, if any.
    pub fn get_function_validator(function: &Arc<dyn Callable>) -> Option<&Validator> {
        function.validator()
    }
}

impl Callable for Validator {
    fn signature(&self) -> &Signature {
        self.function.signature()
    }

    /// The composed operation: bind, validate arguments, invoke, validate
    /// the return value. A failing argument means the wrapped callable is
    /// never invoked.
    fn call(&self, args: &CallArgs) -> CallResult<Value> {
        let bound = self.signature().bind(args);
        self.validate_arguments(&bound)?;

        let return_value = self.function.call(args)?;

        self.validate_return_value(&return_value)?;
        Ok(return_value)
    }

    fn validator(&self) -> Option<&Validator> {
        Some(self)
    }

    fn decorated(&self) -> Option<&Arc<dyn Callable>> {
        Some(&self.function)
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Validator")
            .field("function", &self.function.signature().name)
            .field("plan", &self.plan)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::annotation::Annotation;
    use crate::core::callable::{FunctionDef, Parameter};
    use crate::core::error::CallError;
    use crate::core::types::ValueType;

    fn double() -> Arc<dyn Callable> {
        FunctionDef::shared(
            Signature::builder("double")
                .param(Parameter::new("x").annotated(Annotation::Type(ValueType::Integer)))
                .returns(Annotation::Type(ValueType::Integer))
                .build(),
            |args| Ok(Value::Integer(args.integer("x")? * 2)),
        )
    }

    fn unannotated() -> Arc<dyn Callable> {
        FunctionDef::shared(
            Signature::builder("plain").param(Parameter::new("x")).build(),
            |args| Ok(args.require("x")?.clone()),
        )
    }

    #[test]
    fn test_decorate_returns_identity_without_rules() {
        let function = unannotated();
        let decorated = Validator::decorate(function.clone());
        assert!(Arc::ptr_eq(&function, &decorated));
        assert!(!Validator::is_function_validated(&decorated));
    }

    #[test]
    fn test_decorate_wraps_annotated_function() {
        let function = double();
        let decorated = Validator::decorate(function.clone());
        assert!(!Arc::ptr_eq(&function, &decorated));
        assert!(Validator::is_function_validated(&decorated));
        // Identity survives decoration
        assert_eq!(decorated.signature().name, "double");
    }

    #[test]
    fn test_decorate_is_idempotent() {
        let decorated = Validator::decorate(double());
        let again = Validator::decorate(decorated.clone());
        assert!(Arc::ptr_eq(&decorated, &again));
    }

    #[test]
    fn test_decorate_honors_skip_marker() {
        let function = FunctionDef::shared(
            Signature::builder("skipped")
                .skip()
                .param(Parameter::new("x").annotated(Annotation::Type(ValueType::Integer)))
                .build(),
            |args| Ok(args.require("x")?.clone()),
        );
        let decorated = Validator::decorate(function.clone());
        assert!(Arc::ptr_eq(&function, &decorated));
    }

    #[test]
    fn test_undecorate_round_trip() {
        let function = double();
        let decorated = Validator::decorate(function.clone());
        let restored = Validator::undecorate(decorated);
        assert!(Arc::ptr_eq(&function, &restored));

        // Safe on non-decorated input
        let untouched = Validator::undecorate(function.clone());
        assert!(Arc::ptr_eq(&function, &untouched));
    }

    #[test]
    fn test_valid_call_passes_through() {
        let decorated = Validator::decorate(double());
        let result = decorated
            .call(&CallArgs::positional([Value::Integer(21)]))
            .unwrap();
        assert_eq!(result, Value::Integer(42));
    }

    #[test]
    fn test_invalid_argument_raises_typesafety_error() {
        let decorated = Validator::decorate(double());
        let err = decorated
            .call(&CallArgs::positional([Value::String("a".to_string())]))
            .unwrap_err();
        match err {
            CallError::Typesafety(TypesafetyError::InvalidArgument {
                parameter,
                function,
                expected,
                got,
            }) => {
                assert_eq!(parameter, "x");
                assert_eq!(function, "double");
                assert_eq!(expected, "int");
                assert_eq!(got, "str");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_argument_raises_typesafety_error() {
        let decorated = Validator::decorate(double());
        let err = decorated.call(&CallArgs::new()).unwrap_err();
        match err {
            CallError::Typesafety(TypesafetyError::MissingArgument { parameter }) => {
                assert_eq!(parameter, "x");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_argument_validation_precedes_invocation() {
        // The body always fails; an invalid argument must surface as the
        // enforcement error, never as the body's error.
        let function = FunctionDef::shared(
            Signature::builder("explosive")
                .param(Parameter::new("x").annotated(Annotation::Type(ValueType::Integer)))
                .build(),
            |_args| anyhow::bail!("body should not run"),
        );
        let decorated = Validator::decorate(function);

        let err = decorated
            .call(&CallArgs::positional([Value::String("bad".to_string())]))
            .unwrap_err();
        assert!(matches!(err, CallError::Typesafety(_)));

        // With a valid argument, the body error does surface.
        let err = decorated
            .call(&CallArgs::positional([Value::Integer(1)]))
            .unwrap_err();
        assert!(matches!(err, CallError::Body { .. }));
    }

    #[test]
    fn test_invalid_return_value() {
        let function = FunctionDef::shared(
            Signature::builder("lying")
                .returns(Annotation::Type(ValueType::Integer))
                .build(),
            |_args| Ok(Value::String("not an int".to_string())),
        );
        let decorated = Validator::decorate(function);
        let err = decorated.call(&CallArgs::new()).unwrap_err();
        assert!(matches!(
            err,
            CallError::Typesafety(TypesafetyError::InvalidReturnValue { .. })
        ));
    }

    #[test]
    fn test_union_error_message_names_members() {
        let function = FunctionDef::shared(
            Signature::builder("pick")
                .param(Parameter::new("key").annotated(Annotation::union([
                    Annotation::Type(ValueType::String),
                    Annotation::Type(ValueType::Integer),
                ])))
                .build(),
            |args| Ok(args.require("key")?.clone()),
        );
        let decorated = Validator::decorate(function);

        assert!(decorated
            .call(&CallArgs::positional([Value::String("str".to_string())]))
            .is_ok());
        assert!(decorated.call(&CallArgs::positional([Value::Integer(42)])).is_ok());

        let err = decorated
            .call(&CallArgs::positional([Value::Float(4.2)]))
            .unwrap_err();
        assert!(err.to_string().contains("(str, int)"));
        assert!(err.to_string().contains("got: float"));
    }

    #[test]
    fn test_optional_annotation() {
        let function = FunctionDef::shared(
            Signature::builder("opt")
                .param(Parameter::new("x").annotated(Annotation::optional(Annotation::Type(
                    ValueType::Integer,
                ))))
                .build(),
            |args| Ok(args.require("x")?.clone()),
        );
        let decorated = Validator::decorate(function);

        assert!(decorated.call(&CallArgs::positional([Value::Integer(1)])).is_ok());
        assert!(decorated.call(&CallArgs::positional([Value::None])).is_ok());
        let err = decorated
            .call(&CallArgs::positional([Value::List(Vec::new())]))
            .unwrap_err();
        assert!(matches!(err, CallError::Typesafety(_)));
    }

    #[test]
    fn test_default_backfills_before_validation() {
        let function = FunctionDef::shared(
            Signature::builder("with_default")
                .param(
                    Parameter::new("x")
                        .annotated(Annotation::Type(ValueType::Integer))
                        .with_default(Value::Integer(9)),
                )
                .build(),
            |args| Ok(args.require("x")?.clone()),
        );
        let decorated = Validator::decorate(function);
        assert_eq!(decorated.call(&CallArgs::new()).unwrap(), Value::Integer(9));
    }
}
