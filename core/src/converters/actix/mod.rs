#![deny(missing_docs)]

//! # Actix Source Converter
//!
//! Implementation-side converter for actix-web applications. Handler sources
//! are scanned for route attributes once, at the boundary, and the result is
//! handed to the route table rules as a plain [`RouteTable`].
//!
//! - **classify**: Maps argument/return types to body and return kinds.
//! - **scan**: Attribute discovery with `ra_ap_syntax`.

pub mod classify;
pub mod scan;

pub use classify::TypeClassifier;

use crate::converters::routes::{convert_table, Controller, RouteTable};
use crate::converters::traits::{EndpointConverter, Feature, SupportedFeatures};
use crate::endpoints::EndpointSet;
use crate::error::{HikakuError, HikakuResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Scans actix-web handler sources.
#[derive(Debug, Clone)]
pub struct ActixSourceConverter {
    inputs: Vec<PathBuf>,
    classifier: TypeClassifier,
    excluded_paths: Vec<String>,
}

impl ActixSourceConverter {
    /// Scans the given files and directories (recursively, `*.rs` only).
    pub fn new(inputs: impl IntoIterator<Item = impl Into<PathBuf>>) -> Self {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            classifier: TypeClassifier::default(),
            excluded_paths: Vec::new(),
        }
    }

    /// Replaces the type classifier.
    pub fn with_classifier(mut self, classifier: TypeClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Paths that are registered but not part of the public API.
    pub fn with_excluded_paths(mut self, paths: impl IntoIterator<Item = String>) -> Self {
        self.excluded_paths = paths.into_iter().collect();
        self
    }

    /// Every `.rs` file under the inputs, each input sorted by file name.
    fn source_files(&self) -> HikakuResult<Vec<PathBuf>> {
        let mut files = Vec::new();

        for input in &self.inputs {
            if input.is_file() {
                files.push(input.clone());
                continue;
            }
            if !input.is_dir() {
                return Err(HikakuError::unavailable(
                    input.display().to_string(),
                    "no such file or directory",
                ));
            }

            for entry in WalkDir::new(input).sort_by_file_name() {
                let entry = entry
                    .map_err(|e| HikakuError::unavailable(input.display().to_string(), e))?;
                let path = entry.path();
                if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == "rs")
                {
                    files.push(path.to_path_buf());
                }
            }
        }

        Ok(files)
    }

    /// Builds the route table the scanned handlers describe.
    pub fn route_table(&self) -> HikakuResult<RouteTable> {
        let files = self.source_files()?;
        if files.is_empty() {
            warn!(inputs = ?self.inputs, "no Rust sources found");
        }

        let mut controllers = Vec::new();
        for file in &files {
            controllers.extend(scan_file(file, &self.classifier)?);
        }

        Ok(RouteTable {
            excluded_paths: self.excluded_paths.clone(),
            implicit_head: false,
            implicit_options: false,
            controllers,
            ..RouteTable::default()
        })
    }

    fn inputs_label(&self) -> String {
        self.inputs
            .iter()
            .map(|p| p.display().to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

fn scan_file(file: &Path, classifier: &TypeClassifier) -> HikakuResult<Vec<Controller>> {
    let label = file.display().to_string();
    let code = fs::read_to_string(file).map_err(|e| HikakuError::unavailable(&label, e))?;
    let controllers = scan::scan_source(&code, &label, classifier)?;
    debug!(
        file = %label,
        handlers = controllers.iter().map(|c| c.handlers.len()).sum::<usize>(),
        "scanned source file"
    );
    Ok(controllers)
}

impl EndpointConverter for ActixSourceConverter {
    fn name(&self) -> String {
        format!("ActixSourceConverter({})", self.inputs_label())
    }

    fn supported_features(&self) -> SupportedFeatures {
        SupportedFeatures::from_iter([
            Feature::Consumes,
            Feature::Produces,
            Feature::PathParameters,
        ])
    }

    fn convert(&self) -> HikakuResult<EndpointSet> {
        let table = self.route_table()?;
        convert_table(&table, &self.inputs_label())
    }
}
