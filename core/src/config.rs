#![deny(missing_docs)]

//! # Configuration
//!
//! Comparison settings, loadable from YAML.
//!
//! ```yaml
//! ignore_http_methods: [HEAD, OPTIONS]
//! ignore_paths: ['/actuator/.*']
//! path_parameter_policy: lenient
//! media_type_policy: wildcard_matches_any
//! ```

use crate::comparison::{Comparator, MediaTypePolicy, PathParameterPolicy};
use crate::endpoints::{Endpoint, HttpMethod};
use crate::error::{HikakuError, HikakuResult};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

/// Settings for one comparison run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HikakuConfig {
    /// Methods removed from both sides before comparing.
    pub ignore_http_methods: BTreeSet<HttpMethod>,
    /// Regular expressions; endpoints whose canonical path matches one of
    /// them as a whole are removed from both sides.
    pub ignore_paths: Vec<String>,
    /// How path parameter names take part in route identity.
    pub path_parameter_policy: PathParameterPolicy,
    /// How media type sets are compared.
    pub media_type_policy: MediaTypePolicy,
}

impl HikakuConfig {
    /// Loads a YAML file.
    pub fn from_path(path: &Path) -> HikakuResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| HikakuError::unavailable(path.display().to_string(), e))?;
        Self::from_yaml(&content)
    }

    /// Parses YAML text.
    pub fn from_yaml(content: &str) -> HikakuResult<Self> {
        serde_yaml::from_str(content).map_err(|e| HikakuError::InvalidConfig(e.to_string()))
    }

    /// Compiles the ignore rules.
    pub fn filter(&self) -> HikakuResult<EndpointFilter> {
        let ignore_paths = self
            .ignore_paths
            .iter()
            .map(|pattern| {
                Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                    HikakuError::InvalidConfig(format!(
                        "ignore_paths entry '{}' is not a valid regex: {}",
                        pattern, e
                    ))
                })
            })
            .collect::<HikakuResult<Vec<_>>>()?;

        Ok(EndpointFilter {
            ignore_http_methods: self.ignore_http_methods.clone(),
            ignore_paths,
        })
    }

    /// A comparator with this configuration's policies.
    pub fn comparator(&self) -> Comparator {
        Comparator::new(self.path_parameter_policy, self.media_type_policy)
    }
}

/// Compiled ignore rules.
#[derive(Debug, Clone, Default)]
pub struct EndpointFilter {
    ignore_http_methods: BTreeSet<HttpMethod>,
    ignore_paths: Vec<Regex>,
}

impl EndpointFilter {
    /// Whether `endpoint` takes part in the comparison.
    pub fn keeps(&self, endpoint: &Endpoint) -> bool {
        !self.ignore_http_methods.contains(&endpoint.http_method)
            && !self
                .ignore_paths
                .iter()
                .any(|re| re.is_match(endpoint.path.as_str()))
    }
}
