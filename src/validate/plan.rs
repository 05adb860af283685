//! Recognition of annotations into enforcement rules.
//!
//! A [`Rule`] is a closed tagged variant built once per callable and cached
//! in the [`AnnotationPlan`]; call-time checking is a walk over prebuilt
//! rules, never a re-inspection of raw annotations.

use crate::core::annotation::{Annotation, PredicateFn};
use crate::core::callable::Signature;
use crate::core::types::{Value, ValueType};
use indexmap::IndexMap;
use std::fmt;

/// A recognized validation rule.
#[derive(Clone)]
pub enum Rule {
    /// Satisfied iff the value is an instance of the type.
    Class(ValueType),
    /// Satisfied iff the predicate returns a truthy value.
    Predicate(PredicateFn),
    /// Satisfied iff any member rule is satisfied. Members are checked
    /// recursively; nesting in the source annotation is preserved.
    Union(Vec<Rule>),
    /// Satisfied iff the value is None.
    IsNone,
}

impl Rule {
    /// Check a value against this rule.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            Rule::Class(value_type) => value_type.matches(value),
            Rule::Predicate(predicate) => predicate(value).is_truthy(),
            Rule::Union(members) => members.iter().any(|member| member.matches(value)),
            Rule::IsNone => value.is_none(),
        }
    }

    /// The human-readable expected-type description used in error messages.
    pub fn expectation(&self) -> String {
        match self {
            Rule::Class(value_type) => value_type.display_name(),
            Rule::Predicate(_) => "<predicate>".to_string(),
            Rule::Union(members) => {
                let inner: Vec<String> = members.iter().map(|m| m.expectation()).collect();
                format!("({})", inner.join(", "))
            }
            Rule::IsNone => "None".to_string(),
        }
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Class(t) => f.debug_tuple("Class").field(t).finish(),
            Rule::Predicate(_) => f.debug_tuple("Predicate").field(&"<closure>").finish(),
            Rule::Union(members) => f.debug_tuple("Union").field(members).finish(),
            Rule::IsNone => write!(f, "IsNone"),
        }
    }
}

/// Deprecated annotation forms seen while building a plan.
///
/// Each kind warns at most once per plan construction, however many times
/// the form appears in the signature.
#[derive(Default)]
struct Deprecations {
    tuple_form: bool,
    callable_check: bool,
}

impl Deprecations {
    fn emit(&self, function: &str) {
        if self.tuple_form {
            log::warn!(
                "function '{}': tuple annotations are deprecated, use a union annotation",
                function
            );
        }
        if self.callable_check {
            log::warn!(
                "function '{}': the universal callable check is deprecated, use the callable type annotation",
                function
            );
        }
    }
}

/// The per-callable validation plan: recognized argument rules, the return
/// rule, and declared defaults. Built once at validator construction and
/// immutable thereafter.
#[derive(Debug)]
pub struct AnnotationPlan {
    argument_rules: IndexMap<String, Rule>,
    return_rule: Option<Rule>,
    defaults: IndexMap<String, Value>,
}

impl AnnotationPlan {
    /// Build a plan from a declared signature.
    ///
    /// Annotations that fail recognition are dropped silently; they may
    /// belong to unrelated tooling.
    pub fn build(signature: &Signature) -> Self {
        let mut deprecations = Deprecations::default();

        let mut argument_rules = IndexMap::new();
        let mut defaults = IndexMap::new();

        for parameter in &signature.parameters {
            if let Some(annotation) = &parameter.annotation {
                if let Some(rule) = recognize(annotation, &mut deprecations) {
                    argument_rules.insert(parameter.name.clone(), rule);
                }
            }
            if let Some(default) = &parameter.default {
                defaults.insert(parameter.name.clone(), default.clone());
            }
        }

        let return_rule = signature
            .returns
            .as_ref()
            .and_then(|annotation| recognize(annotation, &mut deprecations));

        deprecations.emit(&signature.name);

        Self {
            argument_rules,
            return_rule,
            defaults,
        }
    }

    /// Rules for annotated parameters, in declaration order.
    pub fn argument_rules(&self) -> &IndexMap<String, Rule> {
        &self.argument_rules
    }

    /// The rule for the return value, if any.
    pub fn return_rule(&self) -> Option<&Rule> {
        self.return_rule.as_ref()
    }

    /// Declared defaults by parameter name.
    pub fn defaults(&self) -> &IndexMap<String, Value> {
        &self.defaults
    }

    /// True if any parameter carries a rule.
    pub fn has_argument_rules(&self) -> bool {
        !self.argument_rules.is_empty()
    }

    /// True if the return value carries a rule.
    pub fn has_return_rule(&self) -> bool {
        self.return_rule.is_some()
    }
}

/// Turn a raw annotation into a rule, or None if it is not recognized.
fn recognize(annotation: &Annotation, deprecations: &mut Deprecations) -> Option<Rule> {
    match annotation {
        Annotation::Type(value_type) => Some(Rule::Class(value_type.clone())),
        Annotation::None => Some(Rule::IsNone),
        Annotation::Tuple(members) => {
            // All members must themselves be recognized, or the whole
            // annotation is dropped. The warning fires only for valid use.
            let rules: Option<Vec<Rule>> = members
                .iter()
                .map(|member| recognize(member, deprecations))
                .collect();
            let rules = rules?;
            deprecations.tuple_form = true;
            Some(Rule::Union(rules))
        }
        Annotation::Union(members) => {
            let rules: Option<Vec<Rule>> = members
                .iter()
                .map(|member| recognize(member, deprecations))
                .collect();
            Some(Rule::Union(rules?))
        }
        Annotation::Predicate(predicate) => Some(Rule::Predicate(predicate.clone())),
        Annotation::CallableCheck => {
            deprecations.callable_check = true;
            Some(Rule::Class(ValueType::Function))
        }
        Annotation::CallableType => Some(Rule::Class(ValueType::Function)),
        Annotation::Other(_) => None,
    }
}
