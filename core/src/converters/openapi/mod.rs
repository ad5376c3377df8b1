#![deny(missing_docs)]

//! # OpenAPI Converter
//!
//! Extracts endpoints from an OpenAPI 3.x or Swagger 2.0 document.
//!
//! - **shims**: Deserialization layer for the route-shaped parts of a document.
//! - **refs**: Local `$ref` resolution.
//!
//! Media type rules:
//! - OAS 3.x: `consumes` are the keys of `requestBody.content`, `produces` the
//!   union of `content` keys over every response.
//! - Swagger 2.0: operation-level `consumes`/`produces` override the
//!   document-level ones. `consumes` only applies to operations with a
//!   `body`/`formData` parameter, `produces` only to operations with at
//!   least one response schema.

pub mod refs;
pub mod shims;

use crate::converters::traits::{EndpointConverter, SupportedFeatures};
use crate::endpoints::{
    resolve_media_types, Endpoint, EndpointSet, HttpMethod, MediaType, MediaTypeSet, PathTemplate,
};
use crate::error::{HikakuError, HikakuResult};
use serde_json::Value;
use shims::{ShimOpenApi, ShimOperation, ShimParameter, ShimPathItem};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Document dialect, decided from the version field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    OpenApi3,
    Swagger2,
}

/// Where the document text comes from.
#[derive(Debug, Clone)]
enum DocumentSource {
    File(PathBuf),
    Inline { name: String, content: String },
}

/// Converts an OpenAPI/Swagger document into an [`EndpointSet`].
#[derive(Debug, Clone)]
pub struct OpenApiConverter {
    source: DocumentSource,
}

impl OpenApiConverter {
    /// Reads the document from a `.yaml`, `.yml` or `.json` file at conversion time.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: DocumentSource::File(path.into()),
        }
    }

    /// Uses already loaded document text. `name` identifies it in errors.
    pub fn from_str(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            source: DocumentSource::Inline {
                name: name.into(),
                content: content.into(),
            },
        }
    }

    fn source_name(&self) -> String {
        match &self.source {
            DocumentSource::File(path) => path.display().to_string(),
            DocumentSource::Inline { name, .. } => name.clone(),
        }
    }

    fn load(&self) -> HikakuResult<Value> {
        match &self.source {
            DocumentSource::File(path) => {
                let content = std::fs::read_to_string(path)
                    .map_err(|e| HikakuError::unavailable(path.display().to_string(), e))?;
                let json = path
                    .extension()
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
                parse_document(&content, json, &path.display().to_string())
            }
            DocumentSource::Inline { name, content } => {
                let json = content.trim_start().starts_with('{');
                parse_document(content, json, name)
            }
        }
    }
}

fn parse_document(content: &str, json: bool, source_name: &str) -> HikakuResult<Value> {
    if json {
        serde_json::from_str(content).map_err(|e| {
            HikakuError::unavailable(source_name, format!("Failed to parse OpenAPI JSON: {}", e))
        })
    } else {
        serde_yaml::from_str(content).map_err(|e| {
            HikakuError::unavailable(source_name, format!("Failed to parse OpenAPI YAML: {}", e))
        })
    }
}

fn dialect(document: &ShimOpenApi, source_name: &str) -> HikakuResult<Dialect> {
    if let Some(version) = document.openapi_version() {
        if version.starts_with("3.") {
            return Ok(Dialect::OpenApi3);
        }
        return Err(HikakuError::unsupported(
            source_name,
            format!("Unsupported OpenAPI version: {}. Only 3.x is supported.", version),
        ));
    }
    if let Some(version) = document.swagger_version() {
        if version.starts_with("2.") {
            return Ok(Dialect::Swagger2);
        }
        return Err(HikakuError::unsupported(
            source_name,
            format!("Unsupported Swagger version: {}. Only 2.0 is supported.", version),
        ));
    }
    Err(HikakuError::unsupported(
        source_name,
        "missing 'openapi' or 'swagger' version field",
    ))
}

impl EndpointConverter for OpenApiConverter {
    fn name(&self) -> String {
        format!("OpenApiConverter({})", self.source_name())
    }

    fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::all()
    }

    fn convert(&self) -> HikakuResult<EndpointSet> {
        let source_name = self.source_name();
        let root = self.load()?;
        let document: ShimOpenApi = serde_json::from_value(root.clone()).map_err(|e| {
            HikakuError::unsupported(&source_name, format!("Invalid OpenAPI document: {}", e))
        })?;
        let dialect = dialect(&document, &source_name)?;

        let context = DocumentContext {
            root: &root,
            document: &document,
            dialect,
            source_name: &source_name,
        };

        let mut endpoints = EndpointSet::new();
        for (raw_path, item) in &document.paths.items {
            let location = format!("{} paths['{}']", source_name, raw_path);
            let path = PathTemplate::parse(raw_path, &location)?;
            let referenced;
            let item = match &item.reference {
                Some(reference) => {
                    referenced = context.referenced_path_item(reference)?;
                    &referenced
                }
                None => item,
            };
            for endpoint in context.path_item_endpoints(&path, item, &location)? {
                endpoints.insert(endpoint, &location)?;
            }
        }

        debug!(
            source = %source_name,
            endpoints = endpoints.len(),
            "extracted endpoints from OpenAPI document"
        );
        Ok(endpoints)
    }
}

/// Everything needed to turn operations into endpoints.
struct DocumentContext<'a> {
    root: &'a Value,
    document: &'a ShimOpenApi,
    dialect: Dialect,
    source_name: &'a str,
}

impl DocumentContext<'_> {
    /// Loads the path item a `$ref` points at. External references are
    /// rejected by `refs::follow`.
    fn referenced_path_item(&self, reference: &str) -> HikakuResult<ShimPathItem> {
        let target = refs::follow(reference, self.root, self.source_name)?;
        serde_json::from_value(target.clone()).map_err(|e| {
            HikakuError::unsupported(
                self.source_name,
                format!("'{}' does not point at a valid path item: {}", reference, e),
            )
        })
    }

    fn path_item_endpoints(
        &self,
        path: &PathTemplate,
        item: &ShimPathItem,
        location: &str,
    ) -> HikakuResult<Vec<Endpoint>> {
        let shared = self.parameters(item.parameters.as_deref())?;

        item.operations()
            .into_iter()
            .map(|(method, operation)| {
                let own = self.parameters(operation.parameters.as_deref())?;
                let parameters = merge_parameters(&shared, own);
                self.check_path_parameters(path, method, &parameters, location)?;

                Ok(Endpoint::new(path.clone(), method)
                    .with_consumes(self.consumes(operation, &parameters)?)
                    .with_produces(self.produces(operation)?)
                    .with_deprecated(operation.deprecated))
            })
            .collect()
    }

    fn parameters(
        &self,
        raw: Option<&[utoipa::openapi::RefOr<ShimParameter>]>,
    ) -> HikakuResult<Vec<ShimParameter>> {
        raw.unwrap_or_default()
            .iter()
            .map(|p| refs::resolve(p, self.root, self.source_name))
            .collect()
    }

    /// Declared `in: path` parameters must exist in the template, otherwise
    /// the document disagrees with itself.
    fn check_path_parameters(
        &self,
        path: &PathTemplate,
        method: HttpMethod,
        parameters: &[ShimParameter],
        location: &str,
    ) -> HikakuResult<()> {
        for parameter in parameters.iter().filter(|p| p.location == "path") {
            if !path.has_parameter(&parameter.name) {
                return Err(HikakuError::unsupported(
                    self.source_name,
                    format!(
                        "{} {}: path parameter '{}' does not appear in the template ({})",
                        method, path, parameter.name, location
                    ),
                ));
            }
        }
        Ok(())
    }

    fn consumes(
        &self,
        operation: &ShimOperation,
        parameters: &[ShimParameter],
    ) -> HikakuResult<MediaTypeSet> {
        match self.dialect {
            Dialect::OpenApi3 => match &operation.request_body {
                Some(body) => {
                    let body = refs::resolve(body, self.root, self.source_name)?;
                    Ok(keys_as_media_types(body.content.keys()))
                }
                None => Ok(MediaTypeSet::new()),
            },
            Dialect::Swagger2 => {
                if !parameters.iter().any(ShimParameter::is_body) {
                    return Ok(MediaTypeSet::new());
                }
                Ok(resolve_media_types(&[
                    operation.consumes.as_ref(),
                    self.document.consumes.as_ref(),
                ]))
            }
        }
    }

    fn produces(&self, operation: &ShimOperation) -> HikakuResult<MediaTypeSet> {
        let mut produces = MediaTypeSet::new();
        let mut has_schema = false;

        for response in operation.responses.values() {
            let response = refs::resolve(response, self.root, self.source_name)?;
            produces.extend(keys_as_media_types(response.content.keys()));
            has_schema |= response.schema.is_some();
        }

        match self.dialect {
            Dialect::OpenApi3 => Ok(produces),
            Dialect::Swagger2 if has_schema => Ok(resolve_media_types(&[
                operation.produces.as_ref(),
                self.document.produces.as_ref(),
            ])),
            Dialect::Swagger2 => Ok(MediaTypeSet::new()),
        }
    }
}

/// Operation parameters replace path-level ones with the same name and location.
fn merge_parameters(shared: &[ShimParameter], own: Vec<ShimParameter>) -> Vec<ShimParameter> {
    let mut merged = own;
    for parameter in shared {
        let overridden = merged
            .iter()
            .any(|p| p.name == parameter.name && p.location == parameter.location);
        if !overridden {
            merged.push(parameter.clone());
        }
    }
    merged
}

fn keys_as_media_types<'a>(keys: impl Iterator<Item = &'a String>) -> MediaTypeSet {
    keys.map(|k| MediaType::new(k)).collect()
}

/// Convenience wrapper for callers holding a [`Path`].
pub fn convert_file(path: &Path) -> HikakuResult<EndpointSet> {
    OpenApiConverter::from_path(path).convert()
}
