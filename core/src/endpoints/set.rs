//! # Endpoint Sets
//!
//! The output of every converter. Entries are keyed by (path, method), so a
//! set can never hold two endpoints for the same route, and iteration order
//! is always path, then method.

use crate::endpoints::endpoint::Endpoint;
use crate::endpoints::method::HttpMethod;
use crate::endpoints::path::PathTemplate;
use crate::error::{HikakuError, HikakuResult};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// A deterministic, duplicate-free collection of endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointSet {
    entries: BTreeMap<(PathTemplate, HttpMethod), Endpoint>,
}

impl EndpointSet {
    /// An empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts an endpoint.
    ///
    /// An endpoint with the same shape as an existing entry is deduplicated.
    /// A different endpoint for an already registered (path, method) fails
    /// with `DuplicateRoute`, naming `location`.
    pub fn insert(&mut self, endpoint: Endpoint, location: &str) -> HikakuResult<()> {
        let key = (endpoint.path.clone(), endpoint.http_method);
        match self.entries.get(&key) {
            Some(existing) if existing.same_shape(&endpoint) => Ok(()),
            Some(_) => Err(HikakuError::DuplicateRoute {
                path: endpoint.path.to_string(),
                method: endpoint.http_method,
                location: location.to_string(),
            }),
            None => {
                self.entries.insert(key, endpoint);
                Ok(())
            }
        }
    }

    /// Builds a set, failing on conflicting duplicates.
    pub fn try_from_endpoints(
        endpoints: impl IntoIterator<Item = Endpoint>,
        location: &str,
    ) -> HikakuResult<Self> {
        let mut set = Self::new();
        for endpoint in endpoints {
            set.insert(endpoint, location)?;
        }
        Ok(set)
    }

    /// Looks up a route.
    pub fn get(&self, path: &PathTemplate, method: HttpMethod) -> Option<&Endpoint> {
        self.entries.get(&(path.clone(), method))
    }

    /// Whether a route is present.
    pub fn contains_route(&self, path: &PathTemplate, method: HttpMethod) -> bool {
        self.get(path, method).is_some()
    }

    /// Number of endpoints.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Endpoints sorted by path, then method.
    pub fn iter(&self) -> impl Iterator<Item = &Endpoint> {
        self.entries.values()
    }

    /// Keeps only endpoints matching `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&Endpoint) -> bool) {
        self.entries.retain(|_, endpoint| keep(endpoint));
    }

    /// Applies `f` to every endpoint. `f` must not change path or method.
    pub(crate) fn map_fields(&mut self, mut f: impl FnMut(&mut Endpoint)) {
        for endpoint in self.entries.values_mut() {
            f(endpoint);
        }
    }
}

impl IntoIterator for EndpointSet {
    type Item = Endpoint;
    type IntoIter = std::collections::btree_map::IntoValues<(PathTemplate, HttpMethod), Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

impl<'a> IntoIterator for &'a EndpointSet {
    type Item = &'a Endpoint;
    type IntoIter = std::collections::btree_map::Values<'a, (PathTemplate, HttpMethod), Endpoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

impl Serialize for EndpointSet {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(self.entries.values())
    }
}
