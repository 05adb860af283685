//! Explicit namespace objects: modules, classes, and their attributes.
//!
//! There is no ambient module system to rewrite in Rust, so a loaded module
//! is an explicit object: a named, ordered collection of attributes. A
//! namespace may declare a restricted attribute set (exactly the names that
//! may be reassigned) or be sealed outright; both are honored by the
//! decoration engine.

use crate::core::callable::Callable;
use crate::core::error::NamespaceError;
use crate::core::types::Value;
use indexmap::IndexMap;
use std::collections::BTreeSet;
use std::sync::Arc;

/// A single namespace member.
#[derive(Debug, Clone)]
pub enum Attribute {
    /// A plain callable.
    Function(Arc<dyn Callable>),
    /// A nested class.
    Class(ClassDef),
    /// A property with optional accessors.
    Property(PropertyDef),
    /// A static binding around a function.
    Static(Arc<dyn Callable>),
    /// A class-bound binding around a function.
    ClassMethod(Arc<dyn Callable>),
    /// Plain data.
    Data(Value),
}

impl Attribute {
    /// The callable inside this attribute, if it holds exactly one.
    pub fn as_function(&self) -> Option<&Arc<dyn Callable>> {
        match self {
            Attribute::Function(f) | Attribute::Static(f) | Attribute::ClassMethod(f) => Some(f),
            _ => None,
        }
    }
}

/// Property accessors. Each accessor present is wrapped individually by the
/// decoration engine; absent accessors stay absent.
#[derive(Debug, Clone, Default)]
pub struct PropertyDef {
    /// Getter accessor, if present.
    pub getter: Option<Arc<dyn Callable>>,
    /// Setter accessor, if present.
    pub setter: Option<Arc<dyn Callable>>,
    /// Deleter accessor, if present.
    pub deleter: Option<Arc<dyn Callable>>,
}

impl PropertyDef {
    /// Create a read-only property.
    pub fn readable(getter: Arc<dyn Callable>) -> Self {
        Self {
            getter: Some(getter),
            setter: None,
            deleter: None,
        }
    }

    /// Attach a setter.
    pub fn with_setter(mut self, setter: Arc<dyn Callable>) -> Self {
        self.setter = Some(setter);
        self
    }

    /// Attach a deleter.
    pub fn with_deleter(mut self, deleter: Arc<dyn Callable>) -> Self {
        self.deleter = Some(deleter);
        self
    }

    /// The accessor that defines this property's origin: the first of
    /// getter, setter, deleter that is present.
    pub fn defining_accessor(&self) -> Option<&Arc<dyn Callable>> {
        self.getter
            .as_ref()
            .or(self.setter.as_ref())
            .or(self.deleter.as_ref())
    }
}

/// Common interface over walkable namespaces (modules and classes).
pub trait Namespace {
    /// Name of the namespace.
    fn name(&self) -> &str;

    /// All attribute names, in declaration order.
    fn attribute_names(&self) -> Vec<String>;

    /// Look up an attribute.
    fn get(&self, name: &str) -> Option<&Attribute>;

    /// Reassign an attribute. Fails on sealed namespaces and on names
    /// outside a declared restricted set.
    fn set(&mut self, name: &str, attribute: Attribute) -> Result<(), NamespaceError>;

    /// Whether the attribute may be reassigned at all. Checked proactively
    /// by the decoration engine before it builds a replacement.
    fn is_assignable(&self, name: &str) -> bool;
}

/// A class namespace: methods, properties, bindings, nested classes.
#[derive(Debug, Clone)]
pub struct ClassDef {
    name: String,
    attributes: IndexMap<String, Attribute>,
    slots: Option<BTreeSet<String>>,
}

impl ClassDef {
    /// Create an empty class.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            slots: None,
        }
    }

    /// Declare the restricted attribute set: only these names may be
    /// reassigned afterwards.
    pub fn with_slots(mut self, slots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.slots = Some(slots.into_iter().map(Into::into).collect());
        self
    }

    /// Add a method, keyed by its signature name.
    pub fn method(mut self, function: Arc<dyn Callable>) -> Self {
        let name = function.signature().name.clone();
        self.attributes.insert(name, Attribute::Function(function));
        self
    }

    /// Add an arbitrary attribute.
    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Add a property.
    pub fn property(mut self, name: impl Into<String>, property: PropertyDef) -> Self {
        self.attributes.insert(name.into(), Attribute::Property(property));
        self
    }

    /// Add a static binding.
    pub fn static_method(mut self, function: Arc<dyn Callable>) -> Self {
        let name = function.signature().name.clone();
        self.attributes.insert(name, Attribute::Static(function));
        self
    }

    /// Add a class-bound binding.
    pub fn class_method(mut self, function: Arc<dyn Callable>) -> Self {
        let name = function.signature().name.clone();
        self.attributes.insert(name, Attribute::ClassMethod(function));
        self
    }

    /// Add a nested class.
    pub fn nested_class(mut self, class: ClassDef) -> Self {
        let name = class.name.clone();
        self.attributes.insert(name, Attribute::Class(class));
        self
    }
}

impl Namespace for ClassDef {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    fn set(&mut self, name: &str, attribute: Attribute) -> Result<(), NamespaceError> {
        if !self.is_assignable(name) {
            return Err(NamespaceError::NotAssignable {
                namespace: self.name.clone(),
                attribute: name.to_string(),
            });
        }
        self.attributes.insert(name.to_string(), attribute);
        Ok(())
    }

    fn is_assignable(&self, name: &str) -> bool {
        match &self.slots {
            Some(slots) => slots.contains(name),
            None => true,
        }
    }
}

/// A loaded module: the namespace the interception hook decorates.
#[derive(Debug, Clone)]
pub struct Module {
    name: String,
    attributes: IndexMap<String, Attribute>,
    slots: Option<BTreeSet<String>>,
    sealed: bool,
}

impl Module {
    /// Create an empty module with a fully-qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            slots: None,
            sealed: false,
        }
    }

    /// Declare the restricted attribute set.
    pub fn with_slots(mut self, slots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.slots = Some(slots.into_iter().map(Into::into).collect());
        self
    }

    /// Seal the module: every reassignment fails from here on.
    pub fn sealed(mut self) -> Self {
        self.sealed = true;
        self
    }

    /// Add a function, keyed by its signature name.
    pub fn function(mut self, function: Arc<dyn Callable>) -> Self {
        let name = function.signature().name.clone();
        self.attributes.insert(name, Attribute::Function(function));
        self
    }

    /// Add a class.
    pub fn class(mut self, class: ClassDef) -> Self {
        let name = class.name().to_string();
        self.attributes.insert(name, Attribute::Class(class));
        self
    }

    /// Add an arbitrary attribute.
    pub fn attribute(mut self, name: impl Into<String>, attribute: Attribute) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    /// Look up a function attribute by name.
    pub fn get_function(&self, name: &str) -> Option<&Arc<dyn Callable>> {
        match self.attributes.get(name) {
            Some(Attribute::Function(f)) => Some(f),
            _ => None,
        }
    }

    /// Look up a class attribute by name.
    pub fn get_class(&self, name: &str) -> Option<&ClassDef> {
        match self.attributes.get(name) {
            Some(Attribute::Class(c)) => Some(c),
            _ => None,
        }
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the module has no attributes.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl Namespace for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    fn set(&mut self, name: &str, attribute: Attribute) -> Result<(), NamespaceError> {
        if self.sealed || !self.is_assignable(name) {
            return Err(NamespaceError::NotAssignable {
                namespace: self.name.clone(),
                attribute: name.to_string(),
            });
        }
        self.attributes.insert(name.to_string(), attribute);
        Ok(())
    }

    // Sealing is deliberately invisible here: slots are a declared contract
    // checked proactively, a sealed namespace only fails at assignment time.
    fn is_assignable(&self, name: &str) -> bool {
        match &self.slots {
            Some(slots) => slots.contains(name),
            None => true,
        }
    }
}
