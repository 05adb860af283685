//! Annotation recognition and call-time enforcement.

pub mod plan;
pub mod validator;

pub use plan::{AnnotationPlan, Rule};
pub use validator::Validator;
