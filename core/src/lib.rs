#![deny(missing_docs)]

//! # Hikaku Core
//!
//! Compares the endpoints an API specification declares with the endpoints
//! an application exposes.
//!
//! ```no_run
//! use hikaku_core::{Hikaku, OpenApiConverter, RouteTableConverter};
//!
//! let specification = OpenApiConverter::from_path("openapi.yaml");
//! let implementation = RouteTableConverter::from_path("routes.yaml");
//! let result = Hikaku::new(&specification, &implementation).match_endpoints()?;
//! assert!(!result.has_mismatches());
//! # Ok::<(), hikaku_core::HikakuError>(())
//! ```

/// Shared error types.
pub mod error;

/// Endpoint model and normalization.
pub mod endpoints;

/// Endpoint sources.
pub mod converters;

/// Endpoint set diffing.
pub mod comparison;

/// Comparison settings.
pub mod config;

/// Run orchestration.
pub mod hikaku;

pub use comparison::{
    Comparator, FieldMismatch, MatchResult, MediaTypePolicy, PathParameterPolicy,
};
pub use config::{EndpointFilter, HikakuConfig};
pub use converters::{
    ActixSourceConverter, EndpointConverter, Feature, OpenApiConverter, RouteTable,
    RouteTableConverter, SupportedFeatures, TypeClassifier,
};
pub use endpoints::{
    media_types, resolve_media_types, Endpoint, EndpointSet, HttpMethod, MediaType,
    MediaTypeSet, PathTemplate,
};
pub use error::{HikakuError, HikakuResult, Side};
pub use hikaku::Hikaku;
