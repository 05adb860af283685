//! Error types for typefence.
//!
//! Uses thiserror for structured errors. The taxonomy keeps the enforcement
//! error ([`TypesafetyError`]) distinct from ordinary call failures so test
//! tooling can assert on enforcement without colliding with errors raised by
//! the code under test.

use crate::core::types::ValueType;
use thiserror::Error;

/// A type violation detected by the enforcement layer.
///
/// Deliberately separate from [`CallError::Body`] failures: an assertion on
/// a `TypesafetyError` can never accidentally match an error produced by the
/// wrapped callable itself.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypesafetyError {
    #[error("Argument '{parameter}' of function '{function}' is invalid (expected: {expected}; got: {got})")]
    InvalidArgument {
        parameter: String,
        function: String,
        expected: String,
        got: String,
    },

    #[error("Return value of function '{function}' is invalid (expected: {expected}; got: {got})")]
    InvalidReturnValue {
        function: String,
        expected: String,
        got: String,
    },

    #[error("Missing required argument '{parameter}'")]
    MissingArgument { parameter: String },
}

/// Errors from the activation lifecycle.
///
/// `AlreadyActive` is benign when two callers race to activate: the loser
/// should treat it as "someone else already enabled it".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("type safety check already active")]
    AlreadyActive,

    #[error("type safety check inactive")]
    NotActive,
}

/// Errors raised while invoking a callable.
#[derive(Error, Debug)]
pub enum CallError {
    /// A value failed its declared rule. Raised before the body runs for
    /// arguments, after it returns for return values.
    #[error(transparent)]
    Typesafety(#[from] TypesafetyError),

    /// The body asked for an argument the call did not supply.
    #[error("missing argument '{name}' in call to '{function}'")]
    MissingArgument { function: String, name: String },

    /// The body asked for an argument as the wrong shape.
    #[error("argument '{name}' of '{function}' is not {expected}")]
    WrongArgumentType {
        function: String,
        name: String,
        expected: ValueType,
    },

    /// The callable body itself failed.
    #[error("call to '{function}' failed: {source}")]
    Body {
        function: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Errors while loading a module from a source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("module '{0}' not found")]
    NotFound(String),

    #[error("loading module '{name}' failed: {reason}")]
    Failed { name: String, reason: String },
}

/// Errors from namespace attribute assignment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NamespaceError {
    #[error("attribute '{attribute}' of '{namespace}' is not assignable")]
    NotAssignable { namespace: String, attribute: String },

    #[error("attribute '{attribute}' not found on '{namespace}'")]
    NotFound { namespace: String, attribute: String },
}

/// Top-level error type for typefence.
#[derive(Error, Debug)]
pub enum TypefenceError {
    #[error("type safety error: {0}")]
    Typesafety(#[from] TypesafetyError),

    #[error("lifecycle error: {0}")]
    Lifecycle(#[from] LifecycleError),

    #[error("call error: {0}")]
    Call(#[from] CallError),

    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("namespace error: {0}")]
    Namespace(#[from] NamespaceError),
}

/// Result type alias for typefence operations.
pub type TypefenceResult<T> = Result<T, TypefenceError>;

/// Result type alias for call operations.
pub type CallResult<T> = Result<T, CallError>;

/// Result type alias for module loading.
pub type LoadResult<T> = Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argument_error_message() {
        let err = TypesafetyError::InvalidArgument {
            parameter: "x".to_string(),
            function: "f".to_string(),
            expected: "int".to_string(),
            got: "str".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Argument 'x' of function 'f' is invalid (expected: int; got: str)"
        );
    }

    #[test]
    fn test_return_error_message() {
        let err = TypesafetyError::InvalidReturnValue {
            function: "f".to_string(),
            expected: "(str, int)".to_string(),
            got: "float".to_string(),
        };
        assert!(err.to_string().contains("(str, int)"));
        assert!(err.to_string().starts_with("Return value of function 'f'"));
    }

    #[test]
    fn test_typesafety_error_is_distinguishable() {
        let err: CallError = TypesafetyError::MissingArgument {
            parameter: "x".to_string(),
        }
        .into();
        assert!(matches!(err, CallError::Typesafety(_)));

        let body: CallError = CallError::Body {
            function: "f".to_string(),
            source: anyhow::anyhow!("boom"),
        };
        assert!(!matches!(body, CallError::Typesafety(_)));
    }
}
