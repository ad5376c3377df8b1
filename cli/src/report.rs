#![deny(missing_docs)]

//! # Report
//!
//! Renders a `MatchResult` for humans or machines.

use crate::error::CliResult;
use hikaku_core::{Endpoint, MatchResult};

/// Output format.
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Plain text.
    #[default]
    Text,
    /// `MatchResult` as JSON.
    Json,
}

/// Renders `result` in `format`.
pub fn render(result: &MatchResult, format: Format) -> CliResult<String> {
    match format {
        Format::Text => Ok(render_text(result)),
        Format::Json => Ok(serde_json::to_string_pretty(result)?),
    }
}

fn render_text(result: &MatchResult) -> String {
    let mut out = String::new();

    let compared: Vec<String> = ["path".to_string(), "method".to_string()]
        .into_iter()
        .chain(result.supported_features.iter().map(|f| f.to_string()))
        .collect();
    out.push_str(&format!("Compared: {}\n", compared.join(", ")));

    if !result.has_mismatches() {
        out.push_str(&format!("All {} endpoints match.\n", result.matched));
        return out;
    }

    out.push_str(&format!("Matched endpoints: {}\n", result.matched));
    section(&mut out, "Only in specification", &result.only_in_specification);
    section(&mut out, "Only in implementation", &result.only_in_implementation);

    if !result.field_mismatches.is_empty() {
        out.push_str(&format!("\nField mismatches ({}):\n", result.field_mismatches.len()));
        for mismatch in &result.field_mismatches {
            out.push_str(&format!("  {}\n", mismatch));
        }
    }
    out
}

fn section(out: &mut String, title: &str, endpoints: &[Endpoint]) {
    if endpoints.is_empty() {
        return;
    }
    out.push_str(&format!("\n{} ({}):\n", title, endpoints.len()));
    for endpoint in endpoints {
        out.push_str(&format!("  {}\n", endpoint));
    }
}
