#![deny(missing_docs)]

//! # Converter Trait
//!
//! Defines the interface every endpoint source implements (an OpenAPI
//! document, an explicit route table, scanned handler sources, ...).

use crate::endpoints::EndpointSet;
use crate::error::HikakuResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// An optional endpoint field a converter may or may not be able to extract.
///
/// Path and method are always extracted and are not features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Request media types.
    Consumes,
    /// Response media types.
    Produces,
    /// Path parameter names.
    PathParameters,
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Feature::Consumes => write!(f, "consumes"),
            Feature::Produces => write!(f, "produces"),
            Feature::PathParameters => write!(f, "path parameters"),
        }
    }
}

/// The set of features a converter extracts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SupportedFeatures(BTreeSet<Feature>);

impl SupportedFeatures {
    /// Every feature.
    pub fn all() -> Self {
        Self::from_iter([Feature::Consumes, Feature::Produces, Feature::PathParameters])
    }

    /// No optional features, only path and method.
    pub fn none() -> Self {
        Self::default()
    }

    /// Whether `feature` is supported.
    pub fn supports(&self, feature: Feature) -> bool {
        self.0.contains(&feature)
    }

    /// Features supported by both sides. Only these are compared.
    pub fn intersection(&self, other: &SupportedFeatures) -> SupportedFeatures {
        SupportedFeatures(self.0.intersection(&other.0).copied().collect())
    }

    /// Iterates in a stable order.
    pub fn iter(&self) -> impl Iterator<Item = Feature> + '_ {
        self.0.iter().copied()
    }
}

impl FromIterator<Feature> for SupportedFeatures {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        SupportedFeatures(iter.into_iter().collect())
    }
}

/// A source of endpoints.
///
/// Implementors own whatever handle they read from and must:
/// - return the same set for the same source, every time
/// - fail rather than drop a route they cannot model
///
/// Converters are `Send + Sync` so the specification and implementation
/// sides can be extracted concurrently.
pub trait EndpointConverter: Send + Sync {
    /// Human readable name, usually including the artifact
    /// (e.g. `OpenApiConverter(openapi.yaml)`).
    fn name(&self) -> String;

    /// Fields this converter is able to extract.
    fn supported_features(&self) -> SupportedFeatures;

    /// Extracts the endpoint set.
    fn convert(&self) -> HikakuResult<EndpointSet>;
}
