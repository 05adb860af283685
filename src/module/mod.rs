//! Module namespaces, sources, and the importer.

pub mod importer;
pub mod loader;
pub mod namespace;

pub use importer::{Importer, ModuleResolver};
pub use loader::{ModuleFactory, ModuleSource, SourceRegistry, SourceRegistryBuilder};
pub use namespace::{Attribute, ClassDef, Module, Namespace, PropertyDef};
