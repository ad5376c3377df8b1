//! # Match Result
//!
//! The diff between the specification and the implementation.

use crate::converters::traits::{Feature, SupportedFeatures};
use crate::endpoints::{Endpoint, HttpMethod, PathTemplate};
use serde::Serialize;
use std::fmt;

/// A route present on both sides whose compared field differs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct FieldMismatch {
    /// Path as declared by the specification.
    pub path: PathTemplate,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// The differing field.
    pub field: Feature,
    /// Values declared only by the specification.
    pub only_in_specification: Vec<String>,
    /// Values declared only by the implementation.
    pub only_in_implementation: Vec<String>,
}

impl fmt::Display for FieldMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: {} differ (specification only: [{}], implementation only: [{}])",
            self.http_method,
            self.path,
            self.field,
            self.only_in_specification.join(", "),
            self.only_in_implementation.join(", ")
        )
    }
}

/// Outcome of one comparison. Every list is sorted by path, then method.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Routes only the specification declares.
    pub only_in_specification: Vec<Endpoint>,
    /// Routes only the implementation exposes.
    pub only_in_implementation: Vec<Endpoint>,
    /// Routes on both sides with differing fields.
    pub field_mismatches: Vec<FieldMismatch>,
    /// Number of routes found on both sides.
    pub matched: usize,
    /// Features that were compared.
    pub supported_features: SupportedFeatures,
}

impl MatchResult {
    /// Whether anything differs.
    pub fn has_mismatches(&self) -> bool {
        !self.only_in_specification.is_empty()
            || !self.only_in_implementation.is_empty()
            || !self.field_mismatches.is_empty()
    }
}
