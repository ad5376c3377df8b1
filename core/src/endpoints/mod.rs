#![deny(missing_docs)]

//! # Endpoints Module
//!
//! - **method**: The fixed HTTP method enumeration.
//! - **path**: Path template parsing and canonicalization.
//! - **media_type**: Media type tokens and the precedence function.
//! - **endpoint**: The normalized `Endpoint` value.
//! - **set**: `EndpointSet`, the output of every converter.

pub mod endpoint;
pub mod media_type;
pub mod method;
pub mod path;
pub mod set;

pub use endpoint::Endpoint;
pub use media_type::{media_types, resolve_media_types, MediaType, MediaTypeSet};
pub use method::HttpMethod;
pub use path::{PathPart, PathSegment, PathTemplate};
pub use set::EndpointSet;
