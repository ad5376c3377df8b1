//! # Comparison Policies

use crate::endpoints::{MediaTypeSet, PathTemplate};
use serde::{Deserialize, Serialize};

/// How path parameter names take part in route identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathParameterPolicy {
    /// Names are part of the path: `/todos/{id}` and `/todos/{todoId}` are
    /// different routes.
    #[default]
    Strict,
    /// Routes match by shape; differing names are reported as a
    /// path parameter mismatch.
    Lenient,
}

impl PathParameterPolicy {
    /// Lookup key for `path`.
    pub fn key(self, path: &PathTemplate) -> String {
        match self {
            PathParameterPolicy::Strict => path.as_str().to_string(),
            PathParameterPolicy::Lenient => path.shape(),
        }
    }
}

/// How media type sets are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaTypePolicy {
    /// Plain set equality; `*/*` is a token like any other.
    #[default]
    Literal,
    /// A side declaring exactly `{*/*}` matches anything.
    WildcardMatchesAny,
}

impl MediaTypePolicy {
    /// Whether the two sets are considered equal.
    pub fn matches(self, specification: &MediaTypeSet, implementation: &MediaTypeSet) -> bool {
        if specification == implementation {
            return true;
        }
        match self {
            MediaTypePolicy::Literal => false,
            MediaTypePolicy::WildcardMatchesAny => {
                is_only_wildcard(specification) || is_only_wildcard(implementation)
            }
        }
    }
}

fn is_only_wildcard(set: &MediaTypeSet) -> bool {
    set.len() == 1 && set.iter().all(|m| m.is_wildcard())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::media_types;

    #[test]
    fn test_keys() {
        let path = PathTemplate::parse("/todos/{id}", "test").unwrap();
        assert_eq!(PathParameterPolicy::Strict.key(&path), "/todos/{id}");
        assert_eq!(PathParameterPolicy::Lenient.key(&path), "/todos/{}");
    }

    #[test]
    fn test_literal_wildcard() {
        let all = media_types(["*/*"]);
        let json = media_types(["application/json"]);
        assert!(!MediaTypePolicy::Literal.matches(&all, &json));
        assert!(MediaTypePolicy::WildcardMatchesAny.matches(&all, &json));
        assert!(MediaTypePolicy::WildcardMatchesAny.matches(&json, &all));
    }

    #[test]
    fn test_wildcard_must_stand_alone() {
        let mixed = media_types(["*/*", "text/plain"]);
        let json = media_types(["application/json"]);
        assert!(!MediaTypePolicy::WildcardMatchesAny.matches(&mixed, &json));
    }

    #[test]
    fn test_policy_serde() {
        let policy: MediaTypePolicy = serde_yaml::from_str("wildcard_matches_any").unwrap();
        assert_eq!(policy, MediaTypePolicy::WildcardMatchesAny);
        let policy: PathParameterPolicy = serde_yaml::from_str("lenient").unwrap();
        assert_eq!(policy, PathParameterPolicy::Lenient);
    }
}
