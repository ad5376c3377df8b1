#![deny(missing_docs)]

//! # Check Command
//!
//! Builds the converters and settings from the command line, runs the
//! comparison and renders the report.

use crate::error::{CliError, CliResult};
use crate::report::{render, Format};
use hikaku_core::{
    ActixSourceConverter, EndpointConverter, Hikaku, HikakuConfig, HttpMethod, MatchResult,
    MediaTypePolicy, OpenApiConverter, PathParameterPolicy, RouteTableConverter,
};
use std::path::PathBuf;
use tracing::debug;

/// Arguments of a comparison run.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// OpenAPI 3.x / Swagger 2.0 document (YAML or JSON).
    #[clap(long, env = "HIKAKU_SPEC")]
    pub spec: PathBuf,

    /// Route table (YAML or JSON) describing the implementation.
    #[clap(
        long,
        env = "HIKAKU_ROUTES",
        conflicts_with = "actix_src",
        required_unless_present = "actix_src"
    )]
    pub routes: Option<PathBuf>,

    /// actix-web handler sources (files or directories) describing the implementation.
    #[clap(long = "actix-src", env = "HIKAKU_ACTIX_SRC", value_delimiter = ',')]
    pub actix_src: Vec<PathBuf>,

    /// YAML settings file; flags below are applied on top of it.
    #[clap(long, env = "HIKAKU_CONFIG")]
    pub config: Option<PathBuf>,

    /// Ignore HEAD endpoints on both sides.
    #[clap(long, env = "HIKAKU_IGNORE_HEAD")]
    pub ignore_head: bool,

    /// Ignore OPTIONS endpoints on both sides.
    #[clap(long, env = "HIKAKU_IGNORE_OPTIONS")]
    pub ignore_options: bool,

    /// Ignore endpoints whose whole path matches this regex (repeatable).
    #[clap(long = "ignore-path", env = "HIKAKU_IGNORE_PATHS", value_delimiter = ',')]
    pub ignore_paths: Vec<String>,

    /// Match `/todos/{id}` with `/todos/{todoId}` and report the names instead.
    #[clap(long, env = "HIKAKU_LENIENT_PATH_PARAMS")]
    pub lenient_path_params: bool,

    /// A side declaring exactly `*/*` matches any media types.
    #[clap(long, env = "HIKAKU_WILDCARD_MATCHES_ANY")]
    pub wildcard_matches_any: bool,

    /// Report format.
    #[clap(long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

impl CheckArgs {
    /// The configuration file, if any, with the flags layered on top.
    pub fn config(&self) -> CliResult<HikakuConfig> {
        let mut config = match &self.config {
            Some(path) => HikakuConfig::from_path(path)?,
            None => HikakuConfig::default(),
        };

        if self.ignore_head {
            config.ignore_http_methods.insert(HttpMethod::Head);
        }
        if self.ignore_options {
            config.ignore_http_methods.insert(HttpMethod::Options);
        }
        config.ignore_paths.extend(self.ignore_paths.iter().cloned());
        if self.lenient_path_params {
            config.path_parameter_policy = PathParameterPolicy::Lenient;
        }
        if self.wildcard_matches_any {
            config.media_type_policy = MediaTypePolicy::WildcardMatchesAny;
        }
        Ok(config)
    }

    fn implementation(&self) -> CliResult<Box<dyn EndpointConverter>> {
        match &self.routes {
            Some(routes) => Ok(Box::new(RouteTableConverter::from_path(routes))),
            None if !self.actix_src.is_empty() => {
                Ok(Box::new(ActixSourceConverter::new(&self.actix_src)))
            }
            None => Err(CliError::General(
                "either --routes or --actix-src is required".to_string(),
            )),
        }
    }
}

/// Runs the comparison and returns the result with its rendered report.
pub fn execute(args: &CheckArgs) -> CliResult<(MatchResult, String)> {
    let config = args.config()?;
    debug!(?config, "effective configuration");

    let specification = OpenApiConverter::from_path(&args.spec);
    let implementation = args.implementation()?;

    let result = Hikaku::new(&specification, implementation.as_ref())
        .with_config(config)
        .match_endpoints()?;
    let report = render(&result, args.format)?;
    Ok((result, report))
}
