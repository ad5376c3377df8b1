#![deny(missing_docs)]

//! # Comparison
//!
//! Diffs a specification endpoint set against an implementation endpoint
//! set.
//!
//! - **policy**: Path parameter and media type policies.
//! - **result**: `MatchResult` and `FieldMismatch`.
//!
//! Routes are looked up by (path key, method). Under the strict policy the
//! path key is the canonical path, under the lenient policy the parameter
//! anonymized shape. Fields the two converters do not both support are
//! cleared before anything is compared.

pub mod policy;
pub mod result;

pub use policy::{MediaTypePolicy, PathParameterPolicy};
pub use result::{FieldMismatch, MatchResult};

use crate::converters::traits::{Feature, SupportedFeatures};
use crate::endpoints::{Endpoint, EndpointSet, HttpMethod, MediaTypeSet};
use std::collections::BTreeMap;
use tracing::debug;

type RouteKey = (String, HttpMethod);

/// Endpoints of both sides sharing one route key.
#[derive(Default)]
struct Bucket<'a> {
    specification: Vec<&'a Endpoint>,
    implementation: Vec<&'a Endpoint>,
}

/// Compares endpoint sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Comparator {
    path_parameter_policy: PathParameterPolicy,
    media_type_policy: MediaTypePolicy,
}

impl Comparator {
    /// A comparator with the given policies.
    pub fn new(
        path_parameter_policy: PathParameterPolicy,
        media_type_policy: MediaTypePolicy,
    ) -> Self {
        Self {
            path_parameter_policy,
            media_type_policy,
        }
    }

    /// Diffs the two sets, comparing only `features`.
    pub fn compare(
        &self,
        specification: &EndpointSet,
        implementation: &EndpointSet,
        features: &SupportedFeatures,
    ) -> MatchResult {
        let specification = clear_unsupported(specification, features);
        let implementation = clear_unsupported(implementation, features);

        let mut buckets: BTreeMap<RouteKey, Bucket> = BTreeMap::new();
        for endpoint in &specification {
            buckets
                .entry(self.key(endpoint))
                .or_default()
                .specification
                .push(endpoint);
        }
        for endpoint in &implementation {
            buckets
                .entry(self.key(endpoint))
                .or_default()
                .implementation
                .push(endpoint);
        }

        let mut result = MatchResult {
            supported_features: features.clone(),
            ..MatchResult::default()
        };

        for bucket in buckets.into_values() {
            let (pairs, spec_only, impl_only) = pair_up(bucket);
            result.only_in_specification.extend(spec_only.into_iter().cloned());
            result.only_in_implementation.extend(impl_only.into_iter().cloned());

            for (spec, imp) in pairs {
                result.matched += 1;
                result
                    .field_mismatches
                    .extend(self.compare_fields(spec, imp, features));
            }
        }

        result.only_in_specification.sort();
        result.only_in_implementation.sort();
        result.field_mismatches.sort();

        debug!(
            matched = result.matched,
            only_in_specification = result.only_in_specification.len(),
            only_in_implementation = result.only_in_implementation.len(),
            field_mismatches = result.field_mismatches.len(),
            "compared endpoint sets"
        );
        result
    }

    fn key(&self, endpoint: &Endpoint) -> RouteKey {
        (
            self.path_parameter_policy.key(&endpoint.path),
            endpoint.http_method,
        )
    }

    fn compare_fields(
        &self,
        spec: &Endpoint,
        imp: &Endpoint,
        features: &SupportedFeatures,
    ) -> Vec<FieldMismatch> {
        let mut mismatches = Vec::new();

        if features.supports(Feature::Consumes)
            && !self.media_type_policy.matches(&spec.consumes, &imp.consumes)
        {
            mismatches.push(media_mismatch(spec, Feature::Consumes, &spec.consumes, &imp.consumes));
        }
        if features.supports(Feature::Produces)
            && !self.media_type_policy.matches(&spec.produces, &imp.produces)
        {
            mismatches.push(media_mismatch(spec, Feature::Produces, &spec.produces, &imp.produces));
        }
        if features.supports(Feature::PathParameters) && spec.path != imp.path {
            let (only_spec, only_impl) =
                positional_difference(&spec.path_parameters(), &imp.path_parameters());
            mismatches.push(FieldMismatch {
                path: spec.path.clone(),
                http_method: spec.http_method,
                field: Feature::PathParameters,
                only_in_specification: only_spec,
                only_in_implementation: only_impl,
            });
        }

        mismatches
    }
}

/// Pairs endpoints of one bucket: identical paths first, then the remaining
/// ones in order. Under the strict policy every bucket holds at most one
/// endpoint per side.
fn pair_up(bucket: Bucket<'_>) -> (Vec<(&Endpoint, &Endpoint)>, Vec<&Endpoint>, Vec<&Endpoint>) {
    let mut pairs = Vec::new();
    let mut spec_rest = Vec::new();
    let mut impl_rest = bucket.implementation;

    for spec in bucket.specification {
        match impl_rest.iter().position(|imp| imp.path == spec.path) {
            Some(i) => pairs.push((spec, impl_rest.remove(i))),
            None => spec_rest.push(spec),
        }
    }

    let paired = spec_rest.len().min(impl_rest.len());
    let spec_only = spec_rest.split_off(paired);
    let impl_only = impl_rest.split_off(paired);
    pairs.extend(spec_rest.into_iter().zip(impl_rest));

    (pairs, spec_only, impl_only)
}

fn clear_unsupported(endpoints: &EndpointSet, features: &SupportedFeatures) -> EndpointSet {
    let mut cleared = endpoints.clone();
    let consumes = features.supports(Feature::Consumes);
    let produces = features.supports(Feature::Produces);
    cleared.map_fields(|endpoint| {
        if !consumes {
            endpoint.consumes.clear();
        }
        if !produces {
            endpoint.produces.clear();
        }
    });
    cleared
}

fn media_mismatch(
    spec: &Endpoint,
    field: Feature,
    specification: &MediaTypeSet,
    implementation: &MediaTypeSet,
) -> FieldMismatch {
    FieldMismatch {
        path: spec.path.clone(),
        http_method: spec.http_method,
        field,
        only_in_specification: specification
            .difference(implementation)
            .map(|m| m.to_string())
            .collect(),
        only_in_implementation: implementation
            .difference(specification)
            .map(|m| m.to_string())
            .collect(),
    }
}

fn positional_difference(specification: &[&str], implementation: &[&str]) -> (Vec<String>, Vec<String>) {
    specification
        .iter()
        .zip(implementation)
        .filter(|(s, i)| s != i)
        .map(|(s, i)| (s.to_string(), i.to_string()))
        .unzip()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::{media_types, PathTemplate};
    use pretty_assertions::assert_eq;

    fn endpoint(path: &str, method: HttpMethod) -> Endpoint {
        Endpoint::new(PathTemplate::parse(path, "test").unwrap(), method)
    }

    fn set(endpoints: Vec<Endpoint>) -> EndpointSet {
        EndpointSet::try_from_endpoints(endpoints, "test").unwrap()
    }

    fn compare(spec: &EndpointSet, imp: &EndpointSet) -> MatchResult {
        Comparator::default().compare(spec, imp, &SupportedFeatures::all())
    }

    #[test]
    fn test_identical_sets_match() {
        let endpoints = set(vec![
            endpoint("/todos", HttpMethod::Get).with_produces(media_types(["application/json"])),
            endpoint("/todos/{id}", HttpMethod::Delete),
        ]);
        let result = compare(&endpoints, &endpoints.clone());
        assert!(!result.has_mismatches());
        assert_eq!(result.matched, 2);
    }

    #[test]
    fn test_route_only_in_implementation() {
        let spec = set(vec![endpoint("/todos", HttpMethod::Get)]);
        let imp = set(vec![
            endpoint("/todos", HttpMethod::Get),
            endpoint("/tags", HttpMethod::Get),
        ]);
        let result = compare(&spec, &imp);
        assert!(result.only_in_specification.is_empty());
        assert_eq!(result.only_in_implementation, vec![endpoint("/tags", HttpMethod::Get)]);
        assert!(result.field_mismatches.is_empty());
        assert!(result.has_mismatches());
    }

    #[test]
    fn test_consumes_mismatch() {
        let spec = set(vec![endpoint("/todos", HttpMethod::Post)
            .with_consumes(media_types(["application/xml"]))]);
        let imp = set(vec![endpoint("/todos", HttpMethod::Post)
            .with_consumes(media_types(["application/json"]))]);
        let result = compare(&spec, &imp);
        assert_eq!(
            result.field_mismatches,
            vec![FieldMismatch {
                path: PathTemplate::parse("/todos", "test").unwrap(),
                http_method: HttpMethod::Post,
                field: Feature::Consumes,
                only_in_specification: vec!["application/xml".into()],
                only_in_implementation: vec!["application/json".into()],
            }]
        );
        assert!(result.only_in_specification.is_empty());
        assert!(result.only_in_implementation.is_empty());
    }

    #[test]
    fn test_method_difference_is_two_routes() {
        let spec = set(vec![endpoint("/todos", HttpMethod::Put)]);
        let imp = set(vec![endpoint("/todos", HttpMethod::Patch)]);
        let result = compare(&spec, &imp);
        assert_eq!(result.only_in_specification.len(), 1);
        assert_eq!(result.only_in_implementation.len(), 1);
        assert_eq!(result.matched, 0);
    }

    #[test]
    fn test_strict_parameter_names() {
        let spec = set(vec![endpoint("/todos/{id}", HttpMethod::Get)]);
        let imp = set(vec![endpoint("/todos/{todoId}", HttpMethod::Get)]);
        let result = compare(&spec, &imp);
        assert_eq!(result.only_in_specification.len(), 1);
        assert_eq!(result.only_in_implementation.len(), 1);
        assert!(result.field_mismatches.is_empty());
    }

    #[test]
    fn test_lenient_parameter_names() {
        let spec = set(vec![endpoint("/todos/{id}", HttpMethod::Get)]);
        let imp = set(vec![endpoint("/todos/{todoId}", HttpMethod::Get)]);
        let result = Comparator::new(PathParameterPolicy::Lenient, MediaTypePolicy::Literal)
            .compare(&spec, &imp, &SupportedFeatures::all());

        assert!(result.only_in_specification.is_empty());
        assert!(result.only_in_implementation.is_empty());
        assert_eq!(result.field_mismatches.len(), 1);
        let mismatch = &result.field_mismatches[0];
        assert_eq!(mismatch.field, Feature::PathParameters);
        assert_eq!(mismatch.only_in_specification, vec!["id".to_string()]);
        assert_eq!(mismatch.only_in_implementation, vec!["todoId".to_string()]);
    }

    #[test]
    fn test_lenient_requires_same_structure() {
        let spec = set(vec![endpoint("/todos/{id}", HttpMethod::Get)]);
        let imp = set(vec![endpoint("/todos/{id}/tags", HttpMethod::Get)]);
        let result = Comparator::new(PathParameterPolicy::Lenient, MediaTypePolicy::Literal)
            .compare(&spec, &imp, &SupportedFeatures::all());
        assert_eq!(result.only_in_specification.len(), 1);
        assert_eq!(result.only_in_implementation.len(), 1);
    }

    #[test]
    fn test_lenient_prefers_exact_names() {
        let spec = set(vec![
            endpoint("/files/{name}", HttpMethod::Get),
            endpoint("/files/{id}", HttpMethod::Get),
        ]);
        let imp = set(vec![endpoint("/files/{name}", HttpMethod::Get)]);
        let result = Comparator::new(PathParameterPolicy::Lenient, MediaTypePolicy::Literal)
            .compare(&spec, &imp, &SupportedFeatures::all());
        assert!(result.field_mismatches.is_empty());
        assert_eq!(result.only_in_specification, vec![endpoint("/files/{id}", HttpMethod::Get)]);
    }

    #[test]
    fn test_unsupported_features_are_not_compared() {
        let spec = set(vec![endpoint("/todos", HttpMethod::Post)
            .with_consumes(media_types(["application/xml"]))
            .with_produces(media_types(["application/xml"]))]);
        let imp = set(vec![endpoint("/todos", HttpMethod::Post)]);

        let result = Comparator::default().compare(&spec, &imp, &SupportedFeatures::none());
        assert!(!result.has_mismatches());

        let consumes_only = SupportedFeatures::from_iter([Feature::Consumes]);
        let result = Comparator::default().compare(&spec, &imp, &consumes_only);
        assert_eq!(result.field_mismatches.len(), 1);
        assert_eq!(result.field_mismatches[0].field, Feature::Consumes);
    }

    #[test]
    fn test_wildcard_policy() {
        let spec = set(vec![endpoint("/notes", HttpMethod::Put)
            .with_consumes(media_types(["text/plain"]))]);
        let imp = set(vec![endpoint("/notes", HttpMethod::Put)
            .with_consumes(media_types(["*/*"]))]);

        assert_eq!(compare(&spec, &imp).field_mismatches.len(), 1);
        let lenient_media = Comparator::new(
            PathParameterPolicy::Strict,
            MediaTypePolicy::WildcardMatchesAny,
        );
        assert!(!lenient_media
            .compare(&spec, &imp, &SupportedFeatures::all())
            .has_mismatches());
    }

    #[test]
    fn test_results_are_sorted() {
        let spec = set(vec![
            endpoint("/z", HttpMethod::Get),
            endpoint("/a", HttpMethod::Delete),
            endpoint("/a", HttpMethod::Get),
        ]);
        let result = compare(&spec, &EndpointSet::new());
        let rendered: Vec<String> = result
            .only_in_specification
            .iter()
            .map(|e| e.to_string())
            .collect();
        assert_eq!(rendered, vec!["GET /a", "DELETE /a", "GET /z"]);
    }
}
