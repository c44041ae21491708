//! Output reporters for prlens analysis results
//!
//! Supports two output formats for the batch report:
//! - `text` - Terminal output with colors
//! - `json` - Machine-readable JSON
//!
//! The CSV artifact tables are a separate concern handled by `csv_export`.

pub mod csv_export;
mod json;
mod text;

use crate::calculators::ToolReport;
use anyhow::{anyhow, Result};
use std::str::FromStr;

/// Supported output formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "terminal" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            _ => Err(anyhow!("Unknown format '{}'. Valid formats: text, json", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Render the batch report in the specified format
pub fn report(reports: &[ToolReport], format: &str) -> Result<String> {
    report_with_format(reports, OutputFormat::from_str(format)?)
}

/// Render the batch report using an OutputFormat enum
pub fn report_with_format(reports: &[ToolReport], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => text::render(reports),
        OutputFormat::Json => json::render(reports),
    }
}
