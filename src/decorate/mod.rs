//! Automatic decoration of namespace members.

pub mod engine;

pub use engine::{decorate_module, Decorator, ModuleDecorator};
