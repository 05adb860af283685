//! Core runtime value types.
//!
//! The value system uses an enum-based approach:
//! - Closed set of types: a validated call site deals with a finite set of shapes
//! - Zero-cost pattern matching: rules compile down to tag checks
//! - Serialization: serde handles enums natively
//!
//! A value's "class" is its [`ValueType`] tag; the instance-of check used by
//! class rules is a tag comparison, never a structural inspection.

use crate::core::callable::Callable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Runtime values passed into and returned from validated callables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "data")]
pub enum Value {
    /// 64-bit signed integer
    Integer(i64),
    /// 64-bit floating point number
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Boolean value
    Boolean(bool),
    /// Heterogeneous list of values
    List(Vec<Value>),
    /// Key-value map with string keys
    Map(IndexMap<String, Value>),
    /// A callable value (functions are first-class arguments)
    Function(FunctionValue),
    /// An instance of a named class
    Instance(InstanceValue),
    /// Represents absence of value
    None,
}

/// Callable wrapper with a serializable identity.
///
/// The live callable handle is skipped during serialization, the same way
/// heavyweight payloads are elsewhere; equality compares the identity only.
#[derive(Clone, Serialize, Deserialize)]
pub struct FunctionValue {
    /// Name of the callable, for display and equality.
    pub name: String,
    /// Live handle, present only for values built around an actual callable.
    #[serde(skip)]
    target: Option<Arc<dyn Callable>>,
}

impl FunctionValue {
    /// Create a function value carrying only a name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: None,
        }
    }

    /// Create a function value around a live callable.
    pub fn of(target: Arc<dyn Callable>) -> Self {
        Self {
            name: target.signature().name.clone(),
            target: Some(target),
        }
    }

    /// Get the live callable, if one is attached.
    pub fn target(&self) -> Option<&Arc<dyn Callable>> {
        self.target.as_ref()
    }
}

impl PartialEq for FunctionValue {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl fmt::Debug for FunctionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionValue")
            .field("name", &self.name)
            .field("target", &self.target.as_ref().map(|_| "<callable>"))
            .finish()
    }
}

/// An instance of a user-declared class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InstanceValue {
    /// Name of the class this value is an instance of.
    pub class: String,
    /// Instance fields.
    pub fields: IndexMap<String, Value>,
}

impl InstanceValue {
    /// Create an instance of the named class with no fields.
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            fields: IndexMap::new(),
        }
    }

    /// Set a field, builder style.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }
}

/// Type tags used by class rules to check values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "inner")]
pub enum ValueType {
    Integer,
    Float,
    String,
    Boolean,
    List,
    Map,
    Function,
    /// Instances of the named class
    Object(String),
    /// Accepts any value
    Any,
}

// ============================================================================
// Value Implementation
// ============================================================================

impl Value {
    /// Get the type tag of this value.
    pub fn get_type(&self) -> ValueType {
        match self {
            Value::Integer(_) => ValueType::Integer,
            Value::Float(_) => ValueType::Float,
            Value::String(_) => ValueType::String,
            Value::Boolean(_) => ValueType::Boolean,
            Value::List(_) => ValueType::List,
            Value::Map(_) => ValueType::Map,
            Value::Function(_) => ValueType::Function,
            Value::Instance(inst) => ValueType::Object(inst.class.clone()),
            Value::None => ValueType::Any,
        }
    }

    /// The runtime type name used in error messages.
    pub fn type_name(&self) -> String {
        match self {
            Value::None => "None".to_string(),
            Value::Instance(inst) => inst.class.clone(),
            other => other.get_type().display_name(),
        }
    }

    /// Truthiness of this value.
    ///
    /// Zero, the empty string, empty containers, and `None` are falsy;
    /// everything else is truthy. Predicate rules treat any truthy result
    /// as "valid".
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Integer(i) => *i != 0,
            Value::Float(f) => *f != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Boolean(b) => *b,
            Value::List(items) => !items.is_empty(),
            Value::Map(entries) => !entries.is_empty(),
            Value::Function(_) => true,
            Value::Instance(_) => true,
            Value::None => false,
        }
    }

    /// Try to get this value as an integer.
    pub fn as_integer(&self) -> Option<i64> {
        if let Value::Integer(i) = self {
            Some(*i)
        } else {
            None
        }
    }

    /// Try to get this value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Try to get this value as a string reference.
    pub fn as_string(&self) -> Option<&str> {
        if let Value::String(s) = self {
            Some(s)
        } else {
            None
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        if let Value::Boolean(b) = self {
            Some(*b)
        } else {
            None
        }
    }

    /// Try to get this value as a list reference.
    pub fn as_list(&self) -> Option<&Vec<Value>> {
        if let Value::List(items) = self {
            Some(items)
        } else {
            None
        }
    }

    /// Try to get this value as a map reference.
    pub fn as_map(&self) -> Option<&IndexMap<String, Value>> {
        if let Value::Map(entries) = self {
            Some(entries)
        } else {
            None
        }
    }

    /// Try to get this value as a function value.
    pub fn as_function(&self) -> Option<&FunctionValue> {
        if let Value::Function(func) = self {
            Some(func)
        } else {
            None
        }
    }

    /// Check if this value is None.
    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::List(items) => write!(f, "List[{}]", items.len()),
            Value::Map(entries) => write!(f, "Map{{{} entries}}", entries.len()),
            Value::Function(func) => write!(f, "<function {}>", func.name),
            Value::Instance(inst) => write!(f, "<{} instance>", inst.class),
            Value::None => write!(f, "None"),
        }
    }
}

// ============================================================================
// ValueType Implementation
// ============================================================================

impl ValueType {
    /// Check if a value is an instance of this type.
    ///
    /// This is a tag check: container element types are deliberately not
    /// inspected (a list is a list, whatever it holds).
    pub fn matches(&self, value: &Value) -> bool {
        match (self, value) {
            (ValueType::Any, _) => true,
            (ValueType::Integer, Value::Integer(_)) => true,
            (ValueType::Float, Value::Float(_)) => true,
            (ValueType::String, Value::String(_)) => true,
            (ValueType::Boolean, Value::Boolean(_)) => true,
            (ValueType::List, Value::List(_)) => true,
            (ValueType::Map, Value::Map(_)) => true,
            (ValueType::Function, Value::Function(_)) => true,
            (ValueType::Object(class), Value::Instance(inst)) => inst.class == *class,
            _ => false,
        }
    }

    /// Get a human-readable name for this type.
    pub fn display_name(&self) -> String {
        match self {
            ValueType::Integer => "int".to_string(),
            ValueType::Float => "float".to_string(),
            ValueType::String => "str".to_string(),
            ValueType::Boolean => "bool".to_string(),
            ValueType::List => "list".to_string(),
            ValueType::Map => "map".to_string(),
            ValueType::Function => "callable".to_string(),
            ValueType::Object(class) => class.clone(),
            ValueType::Any => "any".to_string(),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
