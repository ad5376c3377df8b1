#![deny(missing_docs)]

//! # Orchestration
//!
//! Runs both converters, applies the configured filters and compares.

use crate::comparison::MatchResult;
use crate::config::{EndpointFilter, HikakuConfig};
use crate::converters::traits::EndpointConverter;
use crate::endpoints::EndpointSet;
use crate::error::{HikakuError, HikakuResult, Side};
use std::thread;
use tracing::{debug, info};

/// One comparison between a specification and an implementation.
pub struct Hikaku<'a> {
    specification: &'a dyn EndpointConverter,
    implementation: &'a dyn EndpointConverter,
    config: HikakuConfig,
}

impl<'a> Hikaku<'a> {
    /// Pairs the two converters with default settings.
    pub fn new(
        specification: &'a dyn EndpointConverter,
        implementation: &'a dyn EndpointConverter,
    ) -> Self {
        Self {
            specification,
            implementation,
            config: HikakuConfig::default(),
        }
    }

    /// Replaces the settings.
    pub fn with_config(mut self, config: HikakuConfig) -> Self {
        self.config = config;
        self
    }

    /// Extracts both sides concurrently and diffs them.
    ///
    /// Any converter failure aborts the run and is tagged with its side.
    pub fn match_endpoints(&self) -> HikakuResult<MatchResult> {
        let filter = self.config.filter()?;

        let (specification, implementation) = thread::scope(|scope| {
            let spec = scope.spawn(|| extract(self.specification, Side::Specification));
            let imp = extract(self.implementation, Side::Implementation);
            (join(spec, self.specification, Side::Specification), imp)
        });
        let specification = apply_filter(specification?, &filter, Side::Specification);
        let implementation = apply_filter(implementation?, &filter, Side::Implementation);

        let features = self
            .specification
            .supported_features()
            .intersection(&self.implementation.supported_features());

        let result = self
            .config
            .comparator()
            .compare(&specification, &implementation, &features);

        info!(
            specification = %self.specification.name(),
            implementation = %self.implementation.name(),
            matched = result.matched,
            mismatches = result.has_mismatches(),
            "comparison finished"
        );
        Ok(result)
    }
}

fn extract(converter: &dyn EndpointConverter, side: Side) -> HikakuResult<EndpointSet> {
    let name = converter.name();
    debug!(%side, converter = %name, "converting");
    converter.convert().map_err(|e| e.on_side(side, name))
}

fn join(
    handle: thread::ScopedJoinHandle<'_, HikakuResult<EndpointSet>>,
    converter: &dyn EndpointConverter,
    side: Side,
) -> HikakuResult<EndpointSet> {
    handle.join().unwrap_or_else(|_| {
        Err(HikakuError::unsupported(converter.name(), "converter panicked")
            .on_side(side, converter.name()))
    })
}

fn apply_filter(mut endpoints: EndpointSet, filter: &EndpointFilter, side: Side) -> EndpointSet {
    let before = endpoints.len();
    endpoints.retain(|e| filter.keeps(e));
    if endpoints.len() != before {
        debug!(%side, ignored = before - endpoints.len(), "applied ignore filters");
    }
    endpoints
}
