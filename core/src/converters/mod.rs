#![deny(missing_docs)]

//! # Converters
//!
//! Sources of endpoint sets.
//!
//! - **traits**: `EndpointConverter` and the feature flags.
//! - **openapi**: The specification side, from OpenAPI 3.x / Swagger 2.0.
//! - **routes**: The implementation side, from an explicit route table.
//! - **actix**: The implementation side, from actix-web handler sources.

pub mod actix;
pub mod openapi;
pub mod routes;
pub mod traits;

pub use actix::{ActixSourceConverter, TypeClassifier};
pub use openapi::OpenApiConverter;
pub use routes::{RouteTable, RouteTableConverter};
pub use traits::{EndpointConverter, Feature, SupportedFeatures};
