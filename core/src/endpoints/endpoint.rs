//! # Endpoint
//!
//! The normalized representation of one route.

use crate::endpoints::media_type::MediaTypeSet;
use crate::endpoints::method::HttpMethod;
use crate::endpoints::path::PathTemplate;
use serde::Serialize;
use std::fmt;

/// One route: path, method and the media types it accepts and returns.
///
/// Field order drives the derived ordering, so endpoints sort by path, then
/// method.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Endpoint {
    /// Canonical path template.
    pub path: PathTemplate,
    /// HTTP method.
    pub http_method: HttpMethod,
    /// Request media types; empty means none declared.
    pub consumes: MediaTypeSet,
    /// Response media types; empty means none declared.
    pub produces: MediaTypeSet,
    /// Informational only, never compared.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub deprecated: bool,
}

impl Endpoint {
    /// An endpoint with no media types.
    pub fn new(path: PathTemplate, http_method: HttpMethod) -> Self {
        Self {
            path,
            http_method,
            consumes: MediaTypeSet::new(),
            produces: MediaTypeSet::new(),
            deprecated: false,
        }
    }

    /// Sets `consumes`.
    pub fn with_consumes(mut self, consumes: MediaTypeSet) -> Self {
        self.consumes = consumes;
        self
    }

    /// Sets `produces`.
    pub fn with_produces(mut self, produces: MediaTypeSet) -> Self {
        self.produces = produces;
        self
    }

    /// Sets the deprecation flag.
    pub fn with_deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Path parameter names in order, as declared by the template.
    pub fn path_parameters(&self) -> Vec<&str> {
        self.path.parameter_names()
    }

    /// Whether two endpoints describe the same route shape.
    ///
    /// `deprecated` is ignored; everything else must be equal.
    pub fn same_shape(&self, other: &Endpoint) -> bool {
        self.path == other.path
            && self.http_method == other.http_method
            && self.consumes == other.consumes
            && self.produces == other.produces
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.http_method, self.path)
    }
}
