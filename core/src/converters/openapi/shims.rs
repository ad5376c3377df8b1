#![deny(missing_docs)]

//! # Document Shims
//!
//! Intermediate deserialization layer for the parts of an OpenAPI 3.x /
//! Swagger 2.0 document that describe route shape. Everything else in the
//! document is ignored.
//!
//! Note: shims holding `utoipa::RefOr` do not derive `Debug`.

use crate::endpoints::{HttpMethod, MediaTypeSet};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::BTreeMap;
use utoipa::openapi::RefOr;

/// Root document.
#[derive(Deserialize)]
pub struct ShimOpenApi {
    /// OpenAPI version (e.g. "3.1.0").
    pub openapi: Option<Value>,

    /// Swagger version (e.g. "2.0"). Unquoted `2.0` arrives as a number.
    pub swagger: Option<Value>,

    /// Path items.
    #[serde(default)]
    pub paths: ShimPaths,

    /// Document-wide request media types (Swagger 2.0).
    #[serde(default)]
    pub consumes: Option<MediaTypeSet>,

    /// Document-wide response media types (Swagger 2.0).
    #[serde(default)]
    pub produces: Option<MediaTypeSet>,
}

impl ShimOpenApi {
    /// The declared `openapi` version as text.
    pub fn openapi_version(&self) -> Option<String> {
        self.openapi.as_ref().map(version_text)
    }

    /// The declared `swagger` version as text.
    pub fn swagger_version(&self) -> Option<String> {
        self.swagger.as_ref().map(version_text)
    }
}

fn version_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// The Paths Object. `x-` extension keys are dropped.
#[derive(Default)]
pub struct ShimPaths {
    /// Path items keyed by raw path template.
    pub items: BTreeMap<String, ShimPathItem>,
}

impl<'de> Deserialize<'de> for ShimPaths {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let mut items = BTreeMap::new();

        for (key, value) in raw {
            if key.starts_with("x-") {
                continue;
            }
            let path_item = serde_json::from_value::<ShimPathItem>(value).map_err(|e| {
                DeError::custom(format!("Failed to parse path item '{}': {}", key, e))
            })?;
            items.insert(key, path_item);
        }

        Ok(Self { items })
    }
}

/// A Path Item Object.
#[derive(Deserialize, Default)]
pub struct ShimPathItem {
    /// `$ref` to a path item defined elsewhere. When set, the referenced
    /// item replaces this one.
    #[serde(rename = "$ref", default)]
    pub reference: Option<String>,
    /// Parameters shared by every operation of the path.
    #[serde(default)]
    pub parameters: Option<Vec<RefOr<ShimParameter>>>,
    /// GET operation.
    pub get: Option<ShimOperation>,
    /// POST operation.
    pub post: Option<ShimOperation>,
    /// PUT operation.
    pub put: Option<ShimOperation>,
    /// PATCH operation.
    pub patch: Option<ShimOperation>,
    /// DELETE operation.
    pub delete: Option<ShimOperation>,
    /// HEAD operation.
    pub head: Option<ShimOperation>,
    /// OPTIONS operation.
    pub options: Option<ShimOperation>,
    /// TRACE operation.
    pub trace: Option<ShimOperation>,
}

impl ShimPathItem {
    /// Declared operations in method order.
    pub fn operations(&self) -> Vec<(HttpMethod, &ShimOperation)> {
        [
            (HttpMethod::Get, &self.get),
            (HttpMethod::Post, &self.post),
            (HttpMethod::Put, &self.put),
            (HttpMethod::Patch, &self.patch),
            (HttpMethod::Delete, &self.delete),
            (HttpMethod::Head, &self.head),
            (HttpMethod::Options, &self.options),
            (HttpMethod::Trace, &self.trace),
        ]
        .into_iter()
        .filter_map(|(method, op)| op.as_ref().map(|op| (method, op)))
        .collect()
    }
}

/// An Operation Object.
#[derive(Deserialize)]
pub struct ShimOperation {
    /// Operation parameters (override path-level ones with the same name/location).
    #[serde(default)]
    pub parameters: Option<Vec<RefOr<ShimParameter>>>,

    /// Request body (OAS 3.x).
    #[serde(rename = "requestBody")]
    pub request_body: Option<RefOr<ShimRequestBody>>,

    /// Responses keyed by status code or `default`.
    #[serde(default)]
    pub responses: BTreeMap<String, RefOr<ShimResponse>>,

    /// Operation-level request media types (Swagger 2.0).
    #[serde(default)]
    pub consumes: Option<MediaTypeSet>,

    /// Operation-level response media types (Swagger 2.0).
    #[serde(default)]
    pub produces: Option<MediaTypeSet>,

    /// Deprecation flag.
    #[serde(default)]
    pub deprecated: bool,
}

/// A Parameter Object, reduced to its identity.
#[derive(Deserialize, Debug, Clone)]
pub struct ShimParameter {
    /// Parameter name.
    pub name: String,
    /// Location: `path`, `query`, `header`, `cookie`, and in Swagger 2.0
    /// also `body` and `formData`.
    #[serde(rename = "in")]
    pub location: String,
}

impl ShimParameter {
    /// Whether this parameter carries the request body (Swagger 2.0).
    pub fn is_body(&self) -> bool {
        self.location == "body" || self.location == "formData"
    }
}

/// A Request Body Object (OAS 3.x).
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ShimRequestBody {
    /// Media type map; only the keys matter.
    #[serde(default)]
    pub content: BTreeMap<String, Value>,
}

/// A Response Object.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct ShimResponse {
    /// Media type map (OAS 3.x); only the keys matter.
    #[serde(default)]
    pub content: BTreeMap<String, Value>,
    /// Response schema (Swagger 2.0). A response without one has no body.
    #[serde(default)]
    pub schema: Option<Value>,
}
