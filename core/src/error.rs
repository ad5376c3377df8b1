//! # Error Handling
//!
//! Provides the unified `HikakuError` enum used across the workspace.
//!
//! Every variant aborts the whole comparison run. A partially extracted
//! endpoint set is indistinguishable from "these routes do not exist", so no
//! converter is allowed to swallow one of these and carry on.

use crate::endpoints::HttpMethod;
use derive_more::Display;
use std::fmt;

/// Which side of the comparison a converter was working for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// The API specification document.
    Specification,
    /// The running application / its route registrations.
    Implementation,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Specification => write!(f, "specification"),
            Side::Implementation => write!(f, "implementation"),
        }
    }
}

/// The Global Error Enum.
#[derive(Debug, Display)]
pub enum HikakuError {
    /// A path template could not be split into segments.
    #[display("Malformed path '{path}' in {location}")]
    MalformedPath {
        /// The raw path text.
        path: String,
        /// Where the path came from (file, document key, route table entry).
        location: String,
    },

    /// The converter met a source shape it has no rule for.
    #[display("Unsupported source '{source_name}': {reason}")]
    UnsupportedSource {
        /// The artifact being converted.
        source_name: String,
        /// What was not understood.
        reason: String,
    },

    /// The document or context could not be read at all.
    #[display("Source '{artifact}' unavailable: {reason}")]
    SourceUnavailable {
        /// The artifact that could not be read.
        artifact: String,
        /// Underlying cause.
        reason: String,
    },

    /// Two different endpoints were registered for the same route.
    #[display("Route {method} {path} registered twice with different shapes in {location}")]
    DuplicateRoute {
        /// Canonical path.
        path: String,
        /// HTTP method.
        method: HttpMethod,
        /// Where the second registration came from.
        location: String,
    },

    /// Invalid comparison settings.
    #[display("Invalid configuration: {_0}")]
    InvalidConfig(String),

    /// A converter failed; names the side and converter that failed.
    #[display("Failed to convert {side} using {converter}: {cause}")]
    Conversion {
        /// Side the converter was working for.
        side: Side,
        /// Converter name (usually includes the artifact).
        converter: String,
        /// Original failure.
        cause: Box<HikakuError>,
    },
}

impl HikakuError {
    /// Shorthand for [`HikakuError::UnsupportedSource`].
    pub fn unsupported(source_name: impl Into<String>, reason: impl Into<String>) -> Self {
        HikakuError::UnsupportedSource {
            source_name: source_name.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for [`HikakuError::SourceUnavailable`].
    pub fn unavailable(artifact: impl Into<String>, reason: impl fmt::Display) -> Self {
        HikakuError::SourceUnavailable {
            artifact: artifact.into(),
            reason: reason.to_string(),
        }
    }

    /// Tags this error with the side and converter it came from.
    ///
    /// Already tagged errors are returned unchanged.
    pub fn on_side(self, side: Side, converter: impl Into<String>) -> Self {
        match self {
            tagged @ HikakuError::Conversion { .. } => tagged,
            other => HikakuError::Conversion {
                side,
                converter: converter.into(),
                cause: Box::new(other),
            },
        }
    }
}

/// Manual implementation of the standard Error trait.
///
/// Only `Conversion` carries an underlying error; the other variants hold
/// plain strings.
impl std::error::Error for HikakuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            HikakuError::Conversion { cause, .. } => Some(cause.as_ref()),
            _ => None,
        }
    }
}

/// Helper type alias for Result using HikakuError.
pub type HikakuResult<T> = Result<T, HikakuError>;
