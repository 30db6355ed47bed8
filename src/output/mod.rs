//! Report rendering
//!
//! The finished page tree serializes to JSON or YAML. Rendering goes through
//! one entry point, [`render`], keyed by [`ReportFormat`]; [`write_report`]
//! sends the result to a file or stdout.

mod json;
mod yaml;

use std::io::Write;
use std::path::Path;

use clap::ValueEnum;
use thiserror::Error;

use crate::crawler::PageNode;

/// Serialization format for the crawl report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
}

/// Report serialization and delivery errors
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML serialization failed: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders the page tree in the requested format
pub fn render(page: &PageNode, format: ReportFormat) -> Result<String, ReportError> {
    match format {
        ReportFormat::Json => json::render(page),
        ReportFormat::Yaml => yaml::render(page),
    }
}

/// Writes a rendered report to `out`, or stdout when no path is given
pub fn write_report(
    page: &PageNode,
    format: ReportFormat,
    out: Option<&Path>,
) -> Result<(), ReportError> {
    let rendered = render(page, format)?;
    match out {
        Some(path) => std::fs::write(path, rendered)?,
        None => {
            let stdout = std::io::stdout();
            let mut handle = stdout.lock();
            writeln!(handle, "{}", rendered)?;
        }
    }
    Ok(())
}
