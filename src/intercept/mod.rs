//! Import-time interception: filter, hook, and lifecycle facade.

pub mod facade;
pub mod filter;
pub mod hook;

pub use facade::Typesafety;
pub use filter::{FilterFn, PrefixFilter};
pub use hook::InterceptHook;
