#![deny(missing_docs)]

//! # Route Table Converter
//!
//! Implementation-side converter fed by an explicit registration table.
//! The host describes its controllers and handlers (in code, or as a YAML or
//! JSON file) and this module applies the framework rules:
//!
//! - **policy**: `consumes`/`produces` branches.
//! - Handlers without methods register every method except TRACE.
//! - `implicit_head` mirrors each GET as HEAD, `implicit_options` registers
//!   OPTIONS for every path.
//! - Routes on `excluded_paths` (default `/error`) are dropped.

pub mod policy;

use crate::converters::traits::{EndpointConverter, SupportedFeatures};
use crate::endpoints::{Endpoint, EndpointSet, HttpMethod, MediaType, MediaTypeSet, PathTemplate};
use crate::error::{HikakuError, HikakuResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Global media type defaults of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteDefaults {
    /// Request media types for typed bodies without a declaration.
    pub consumes: Option<MediaTypeSet>,
    /// Response media types for typed returns without a declaration.
    pub produces: Option<MediaTypeSet>,
}

impl RouteDefaults {
    /// Declared default, or `application/json`.
    pub fn effective_consumes(&self) -> MediaTypeSet {
        self.consumes
            .clone()
            .unwrap_or_else(|| MediaTypeSet::from([MediaType::application_json()]))
    }

    /// Declared default, or `application/json`.
    pub fn effective_produces(&self) -> MediaTypeSet {
        self.produces
            .clone()
            .unwrap_or_else(|| MediaTypeSet::from([MediaType::application_json()]))
    }
}

/// How a handler receives its request body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestBody {
    /// No body.
    #[default]
    None,
    /// Raw text (`String`).
    Text,
    /// A deserialized value.
    Typed,
    /// Raw bytes.
    Bytes,
}

/// What a handler returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    /// Nothing.
    Unit,
    /// Plain text.
    Text,
    /// A redirect.
    Redirect,
    /// A serialized value.
    #[default]
    Typed,
}

/// A path variable bound by a handler argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PathVariable {
    /// Argument name in the handler.
    pub binding: String,
    /// Explicit template name, when it differs from the binding.
    #[serde(default)]
    pub name: Option<String>,
}

impl PathVariable {
    /// The template placeholder this variable refers to.
    pub fn effective_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.binding)
    }
}

/// One handler function.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Handler {
    /// Path relative to the controller's base path.
    pub path: String,
    /// Methods; empty means every method except TRACE.
    pub methods: Vec<HttpMethod>,
    /// Function-level request media types.
    pub consumes: Option<MediaTypeSet>,
    /// Function-level response media types.
    pub produces: Option<MediaTypeSet>,
    /// Overrides the controller's `response_body`.
    pub response_body: Option<bool>,
    /// Request body binding.
    pub request_body: RequestBody,
    /// Return kind.
    pub returns: ReturnKind,
    /// Whether the handler writes the response itself despite returning unit.
    pub raw_response_writer: bool,
    /// Path variables bound by arguments.
    pub path_variables: Vec<PathVariable>,
}

/// A group of handlers sharing a base path and class-level declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Controller {
    /// Prefix for every handler path.
    pub base_path: Option<String>,
    /// Class-level request media types.
    pub consumes: Option<MediaTypeSet>,
    /// Class-level response media types.
    pub produces: Option<MediaTypeSet>,
    /// Whether handlers write response bodies (REST controller).
    pub response_body: bool,
    /// Handlers.
    pub handlers: Vec<Handler>,
}

/// The full registration table of an application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteTable {
    /// Global media type defaults.
    pub defaults: RouteDefaults,
    /// Paths that are not part of the public API.
    pub excluded_paths: Vec<String>,
    /// Register HEAD next to every GET.
    pub implicit_head: bool,
    /// Register OPTIONS for every path.
    pub implicit_options: bool,
    /// Controllers.
    pub controllers: Vec<Controller>,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self {
            defaults: RouteDefaults::default(),
            excluded_paths: vec!["/error".to_string()],
            implicit_head: true,
            implicit_options: true,
            controllers: Vec::new(),
        }
    }
}

impl RouteTable {
    /// Loads a YAML or JSON table from disk.
    pub fn from_path(path: &Path) -> HikakuResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HikakuError::unavailable(path.display().to_string(), e))?;
        Self::from_str(&path.display().to_string(), &content)
    }

    /// Parses a YAML or JSON table. `source_name` identifies it in errors.
    pub fn from_str(source_name: &str, content: &str) -> HikakuResult<Self> {
        serde_yaml::from_str(content).map_err(|e| {
            HikakuError::unsupported(source_name, format!("Invalid route table: {}", e))
        })
    }
}

#[derive(Debug, Clone)]
enum TableSource {
    Loaded { name: String, table: RouteTable },
    File(PathBuf),
}

/// Converts a [`RouteTable`] into an [`EndpointSet`].
#[derive(Debug, Clone)]
pub struct RouteTableConverter {
    source: TableSource,
}

impl RouteTableConverter {
    /// Wraps an in-memory table. `name` identifies it in errors.
    pub fn new(name: impl Into<String>, table: RouteTable) -> Self {
        Self {
            source: TableSource::Loaded {
                name: name.into(),
                table,
            },
        }
    }

    /// Reads the table from a file at conversion time.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: TableSource::File(path.into()),
        }
    }

    fn source_name(&self) -> String {
        match &self.source {
            TableSource::Loaded { name, .. } => name.clone(),
            TableSource::File(path) => path.display().to_string(),
        }
    }
}

impl EndpointConverter for RouteTableConverter {
    fn name(&self) -> String {
        format!("RouteTableConverter({})", self.source_name())
    }

    fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::all()
    }

    fn convert(&self) -> HikakuResult<EndpointSet> {
        match &self.source {
            TableSource::Loaded { name, table } => convert_table(table, name),
            TableSource::File(path) => {
                let table = RouteTable::from_path(path)?;
                convert_table(&table, &path.display().to_string())
            }
        }
    }
}

/// Applies the registration rules to `table`.
pub fn convert_table(table: &RouteTable, source_name: &str) -> HikakuResult<EndpointSet> {
    let excluded = table
        .excluded_paths
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            PathTemplate::parse(raw, &format!("{} excluded_paths[{}]", source_name, i))
        })
        .collect::<HikakuResult<BTreeSet<_>>>()?;

    let mut endpoints = EndpointSet::new();

    for (c, controller) in table.controllers.iter().enumerate() {
        let base_location = format!("{} controllers[{}]", source_name, c);
        let base = match &controller.base_path {
            Some(raw) => PathTemplate::parse(raw, &base_location)?,
            None => PathTemplate::root(),
        };

        for (h, handler) in controller.handlers.iter().enumerate() {
            let location = format!("{}.handlers[{}]", base_location, h);
            let path = base.join(&PathTemplate::parse(&handler.path, &location)?);

            if excluded.contains(&path) {
                debug!(path = %path, location = %location, "skipping excluded route");
                continue;
            }
            check_path_variables(&path, handler, source_name, &location)?;

            let (_, consumes) = policy::consumes(handler, controller, &table.defaults);
            let (_, produces) = policy::produces(handler, controller, &table.defaults);

            for method in handler_methods(handler) {
                let endpoint = if method == HttpMethod::Options {
                    Endpoint::new(path.clone(), method)
                } else {
                    Endpoint::new(path.clone(), method)
                        .with_consumes(consumes.clone())
                        .with_produces(produces.clone())
                };
                endpoints.insert(endpoint, &location)?;
            }
        }
    }

    if table.implicit_head {
        add_implicit_head(&mut endpoints, source_name)?;
    }
    if table.implicit_options {
        add_implicit_options(&mut endpoints, source_name)?;
    }

    debug!(
        source = %source_name,
        endpoints = endpoints.len(),
        "extracted endpoints from route table"
    );
    Ok(endpoints)
}

fn handler_methods(handler: &Handler) -> Vec<HttpMethod> {
    if handler.methods.is_empty() {
        HttpMethod::ALL
            .into_iter()
            .filter(|m| *m != HttpMethod::Trace)
            .collect()
    } else {
        handler.methods.clone()
    }
}

fn check_path_variables(
    path: &PathTemplate,
    handler: &Handler,
    source_name: &str,
    location: &str,
) -> HikakuResult<()> {
    for variable in &handler.path_variables {
        let name = variable.effective_name();
        if !path.has_parameter(name) {
            return Err(HikakuError::unsupported(
                source_name,
                format!(
                    "path variable '{}' is not a placeholder of '{}' ({})",
                    name, path, location
                ),
            ));
        }
    }
    Ok(())
}

fn add_implicit_head(endpoints: &mut EndpointSet, source_name: &str) -> HikakuResult<()> {
    let heads: Vec<Endpoint> = endpoints
        .iter()
        .filter(|e| e.http_method == HttpMethod::Get)
        .filter(|e| !endpoints.contains_route(&e.path, HttpMethod::Head))
        .map(|get| Endpoint {
            http_method: HttpMethod::Head,
            ..get.clone()
        })
        .collect();

    let location = format!("{} implicit HEAD", source_name);
    for head in heads {
        endpoints.insert(head, &location)?;
    }
    Ok(())
}

fn add_implicit_options(endpoints: &mut EndpointSet, source_name: &str) -> HikakuResult<()> {
    let paths: BTreeSet<PathTemplate> = endpoints
        .iter()
        .filter(|e| !endpoints.contains_route(&e.path, HttpMethod::Options))
        .map(|e| e.path.clone())
        .collect();

    let location = format!("{} implicit OPTIONS", source_name);
    for path in paths {
        endpoints.insert(Endpoint::new(path, HttpMethod::Options), &location)?;
    }
    Ok(())
}
