//! Rendering declared signatures and resolving decoration chains.
//!
//! Validating proxies report the wrapped callable's signature, so rendering
//! works the same before and after decoration. Resolution walks the
//! `decorated` chain to recover the original callable under any number of
//! wrappers.

use crate::core::callable::Callable;
use std::fmt::Write;
use std::sync::Arc;

/// Upper bound on decoration chain depth during resolution. A chain longer
/// than this is treated as cyclic.
pub const MAX_DECORATION_DEPTH: usize = 100;

/// Follow the decoration chain down to the original, undecorated callable.
///
/// Returns the callable itself when it decorates nothing.
pub fn resolve_original(function: &Arc<dyn Callable>) -> &Arc<dyn Callable> {
    resolve_original_bounded(function, MAX_DECORATION_DEPTH).unwrap_or(function)
}

/// Follow the decoration chain with an explicit depth bound.
///
/// Returns `None` when the chain is deeper than `depth` links.
pub fn resolve_original_bounded(
    function: &Arc<dyn Callable>,
    depth: usize,
) -> Option<&Arc<dyn Callable>> {
    let mut current = function;
    for _ in 0..=depth {
        match current.decorated() {
            Some(inner) => current = inner,
            None => return Some(current),
        }
    }
    None
}

/// Render a callable's declared signature in source-like form, for
/// diagnostics and error reports.
///
/// Produces e.g. `(a: int, b: str = "x") -> bool`. Unannotated parameters
/// render bare; a missing return annotation omits the arrow.
pub fn render_signature(function: &Arc<dyn Callable>) -> String {
    let signature = function.signature();
    let mut out = String::from("(");

    for (index, parameter) in signature.parameters.iter().enumerate() {
        if index > 0 {
            out.push_str(", ");
        }
        out.push_str(&parameter.name);
        if let Some(annotation) = &parameter.annotation {
            // A write to a String cannot fail.
            let _ = write!(out, ": {}", annotation.display_name());
        }
        if let Some(default) = &parameter.default {
            let _ = write!(out, " = {}", default);
        }
    }
    out.push(')');

    if let Some(returns) = &signature.returns {
        let _ = write!(out, " -> {}", returns.display_name());
    }
    out
}
