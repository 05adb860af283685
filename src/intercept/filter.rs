//! Module-name filtering for the interception hook.
//!
//! Consumers (test-runner integrations, mostly) enable enforcement for a set
//! of dotted module-name prefixes. Matching is component-wise on dot
//! segments, not plain string prefixing: `example` enables `example.sub`
//! but never `example2`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Predicate deciding whether a fully-qualified module name participates.
pub type FilterFn = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// A set of enabled dotted module-name prefixes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrefixFilter {
    prefixes: BTreeSet<String>,
}

impl PrefixFilter {
    /// Create a filter from a collection of prefixes.
    pub fn new(prefixes: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a comma- or whitespace-separated prefix list, as supplied on a
    /// command line.
    pub fn parse(spec: &str) -> Self {
        Self::new(
            spec.split(|c: char| c == ',' || c.is_whitespace())
                .map(str::trim)
                .filter(|part| !part.is_empty()),
        )
    }

    /// Enable an additional prefix.
    pub fn enable(&mut self, prefix: impl Into<String>) {
        self.prefixes.insert(prefix.into());
    }

    /// Check whether a fully-qualified module name is enabled: the name must
    /// equal a prefix or be a dotted descendant of one.
    pub fn enabled(&self, fullname: &str) -> bool {
        self.prefixes.iter().any(|prefix| {
            fullname == prefix
                || (fullname.len() > prefix.len()
                    && fullname.starts_with(prefix.as_str())
                    && fullname.as_bytes()[prefix.len()] == b'.')
        })
    }

    /// Check whether no prefixes are enabled.
    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }

    /// The enabled prefixes.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.prefixes.iter().map(|s| s.as_str())
    }

    /// Turn this filter into a hook-compatible predicate.
    pub fn into_filter_fn(self) -> FilterFn {
        Arc::new(move |fullname| self.enabled(fullname))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_and_descendant_match() {
        let filter = PrefixFilter::new(["example"]);
        assert!(filter.enabled("example"));
        assert!(filter.enabled("example.submodule"));
        assert!(filter.enabled("example.sub.deeper"));
    }

    #[test]
    fn test_component_wise_not_string_prefix() {
        let filter = PrefixFilter::new(["example"]);
        assert!(!filter.enabled("example2"));
        assert!(!filter.enabled("examples.mod"));
    }

    #[test]
    fn test_multiple_prefixes() {
        let filter = PrefixFilter::new(["pkg.sub", "other"]);
        assert!(filter.enabled("pkg.sub.mod"));
        assert!(filter.enabled("other"));
        assert!(!filter.enabled("pkg"));
        assert!(!filter.enabled("pkg.other"));
    }

    #[test]
    fn test_parse() {
        let filter = PrefixFilter::parse("pkg, other.sub  third");
        assert_eq!(
            filter.prefixes().collect::<Vec<_>>(),
            vec!["other.sub", "pkg", "third"]
        );
        assert!(PrefixFilter::parse("  ").is_empty());
    }

    #[test]
    fn test_filter_fn() {
        let filter_fn = PrefixFilter::new(["pkg"]).into_filter_fn();
        assert!(filter_fn("pkg.mod"));
        assert!(!filter_fn("other.mod"));
    }

    #[test]
    fn test_serde_roundtrip() {
        let filter = PrefixFilter::new(["pkg", "other"]);
        let json = serde_json::to_string(&filter).unwrap();
        assert_eq!(json, r#"["other","pkg"]"#);
        let back: PrefixFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter, back);
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        fn segment() -> impl Strategy<Value = String> {
            "[a-z][a-z0-9_]{0,8}"
        }

        proptest! {
            #[test]
            fn prefix_enables_itself_and_descendants(
                prefix in segment(),
                suffix in segment(),
            ) {
                let filter = PrefixFilter::new([prefix.clone()]);
                let descendant = format!("{}.{}", prefix, suffix);
                prop_assert!(filter.enabled(&prefix));
                prop_assert!(filter.enabled(&descendant));
            }

            #[test]
            fn longer_sibling_names_stay_disabled(
                prefix in segment(),
                extra in "[a-z0-9_]{1,4}",
            ) {
                let filter = PrefixFilter::new([prefix.clone()]);
                let sibling = format!("{}{}", prefix, extra);
                prop_assert!(!filter.enabled(&sibling));
            }

            #[test]
            fn parse_is_separator_insensitive(prefixes in prop::collection::btree_set(segment(), 1..5)) {
                let spec: Vec<String> = prefixes.iter().cloned().collect();
                let commas = PrefixFilter::parse(&spec.join(","));
                let spaces = PrefixFilter::parse(&spec.join(" "));
                prop_assert_eq!(commas, spaces);
            }
        }
    }
}
