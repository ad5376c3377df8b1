#![deny(missing_docs)]

//! # Hikaku CLI
//!
//! Compares an OpenAPI / Swagger document with the endpoints an application
//! implements, described either by a route table or by actix-web sources.
//!
//! Exit codes:
//! - `0`: both sides match.
//! - `1`: the comparison found differences.
//! - `2`: the comparison could not run.

use clap::Parser;
use error::CliResult;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod check;
mod error;
mod report;

#[derive(Parser, Debug)]
#[clap(
    author,
    version,
    about = "Compare an OpenAPI specification with an implementation"
)]
struct Cli {
    /// Log debug output to stderr (overridden by RUST_LOG).
    #[clap(short, long)]
    verbose: bool,

    #[clap(flatten)]
    check: check::CheckArgs,
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Writes the report; a closed stdout is an error, not a panic.
fn emit(report: &str, out: &mut impl Write) -> CliResult<()> {
    out.write_all(report.as_bytes())?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match check::execute(&cli.check) {
        Ok((result, report)) => {
            if let Err(e) = emit(&report, &mut std::io::stdout().lock()) {
                eprintln!("Error: {}", e);
                return ExitCode::from(2);
            }
            if result.has_mismatches() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli_structure() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::ErrorKind::BrokenPipe.into())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_emit_writes_report() {
        let mut out = Vec::new();
        emit("All 2 endpoints match.\n", &mut out).unwrap();
        assert_eq!(out, b"All 2 endpoints match.\n");
    }

    #[test]
    fn test_emit_surfaces_write_failure() {
        let err = emit("report", &mut ClosedPipe).unwrap_err();
        assert!(matches!(err, error::CliError::Io(_)));
        assert!(err.to_string().starts_with("IO Error:"));
    }

    #[test]
    fn test_actix_sources_parse() {
        let cli = Cli::try_parse_from([
            "hikaku",
            "-v",
            "--spec",
            "openapi.yaml",
            "--actix-src",
            "src/api,src/admin",
            "--format",
            "json",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.check.actix_src.len(), 2);
        assert!(cli.check.routes.is_none());
        assert_eq!(cli.check.format, report::Format::Json);
    }
}
