//! Annotation metadata attached to callable parameters and return positions.
//!
//! Annotations are a shared namespace: tooling other than the enforcement
//! layer may attach metadata of its own, so an annotation is only *raw*
//! declaration here. Whether it becomes an enforced rule is decided by the
//! recognition step in the validation plan; anything unrecognized is ignored
//! without error.

use crate::core::types::Value;
use std::fmt;
use std::sync::Arc;

/// A predicate annotation: called with the value, any truthy result means
/// the value is accepted.
pub type PredicateFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Raw annotation attached to a parameter or return position.
#[derive(Clone)]
pub enum Annotation {
    /// A class annotation: the value must be an instance of the type.
    Type(crate::core::types::ValueType),
    /// The literal-None annotation: the value must be None.
    None,
    /// Tuple of annotations, accepted if any member accepts.
    /// Deprecated form; prefer [`Annotation::Union`].
    Tuple(Vec<Annotation>),
    /// Structural union of annotations, accepted if any member accepts.
    Union(Vec<Annotation>),
    /// An arbitrary predicate callable. Deprecated surface, retained for
    /// compatibility.
    Predicate(PredicateFn),
    /// The universal "is it callable" check. Deprecated; use
    /// [`Annotation::CallableType`].
    CallableCheck,
    /// Structural callable type: a plain class-like check on function
    /// values, no deprecation warning.
    CallableType,
    /// Arbitrary non-callable metadata owned by unrelated tooling.
    /// Never recognized as a rule, never an error.
    Other(Value),
}

impl Annotation {
    /// Build a union annotation from members.
    pub fn union(members: impl IntoIterator<Item = Annotation>) -> Self {
        Annotation::Union(members.into_iter().collect())
    }

    /// Build an optional annotation: the inner annotation or None.
    pub fn optional(inner: Annotation) -> Self {
        Annotation::Union(vec![inner, Annotation::None])
    }

    /// Build a predicate annotation from a closure.
    pub fn predicate(f: impl Fn(&Value) -> Value + Send + Sync + 'static) -> Self {
        Annotation::Predicate(Arc::new(f))
    }

    /// Shorthand for a class annotation.
    pub fn of(value_type: crate::core::types::ValueType) -> Self {
        Annotation::Type(value_type)
    }

    /// Human-readable form used when rendering signatures.
    pub fn display_name(&self) -> String {
        match self {
            Annotation::Type(t) => t.display_name(),
            Annotation::None => "None".to_string(),
            Annotation::Tuple(members) | Annotation::Union(members) => {
                let inner: Vec<String> = members.iter().map(|m| m.display_name()).collect();
                format!("({})", inner.join(", "))
            }
            Annotation::Predicate(_) => "<predicate>".to_string(),
            Annotation::CallableCheck | Annotation::CallableType => "callable".to_string(),
            Annotation::Other(value) => value.to_string(),
        }
    }
}

// The Predicate variant holds a closure, so Debug is written by hand.
impl fmt::Debug for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Annotation::Type(t) => f.debug_tuple("Type").field(t).finish(),
            Annotation::None => write!(f, "None"),
            Annotation::Tuple(members) => f.debug_tuple("Tuple").field(members).finish(),
            Annotation::Union(members) => f.debug_tuple("Union").field(members).finish(),
            Annotation::Predicate(_) => f.debug_tuple("Predicate").field(&"<closure>").finish(),
            Annotation::CallableCheck => write!(f, "CallableCheck"),
            Annotation::CallableType => write!(f, "CallableType"),
            Annotation::Other(value) => f.debug_tuple("Other").field(value).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ValueType;

    #[test]
    fn test_optional_builds_union_with_none() {
        let ann = Annotation::optional(Annotation::Type(ValueType::Integer));
        match ann {
            Annotation::Union(members) => {
                assert_eq!(members.len(), 2);
                assert!(matches!(members[0], Annotation::Type(ValueType::Integer)));
                assert!(matches!(members[1], Annotation::None));
            }
            _ => panic!("expected union"),
        }
    }

    #[test]
    fn test_display_names() {
        assert_eq!(Annotation::Type(ValueType::Integer).display_name(), "int");
        assert_eq!(Annotation::None.display_name(), "None");
        assert_eq!(
            Annotation::Tuple(vec![
                Annotation::Type(ValueType::String),
                Annotation::Type(ValueType::Integer),
            ])
            .display_name(),
            "(str, int)"
        );
        assert_eq!(Annotation::CallableType.display_name(), "callable");
    }
}
