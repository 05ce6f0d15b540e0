//! Report output for scan results.
//!
//! This module renders one file's imports, usages, and diagnostics in
//! machine-readable (JSON) or human-readable (Markdown) form.

pub mod json;
pub mod markdown;

use std::io::{self, Write};

use serde::Serialize;

use crate::scanner::types::{ImportRecord, Language, ScanResult};
use crate::usage::{UsageLocation, UsageRecord};

/// Report format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// JSON format - machine-readable, full data
    Json,
    /// Markdown format - documentation/reporting
    Markdown,
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(format!(
                "Unknown export format: '{}'. Valid formats: json, markdown",
                s
            )),
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExportFormat::Json => write!(f, "json"),
            ExportFormat::Markdown => write!(f, "markdown"),
        }
    }
}

/// Usages of one package, owned for serialization.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummary {
    /// Package whose bound identifiers were located.
    pub package_name: String,
    /// Occurrences in text order.
    pub locations: Vec<UsageLocation>,
}

impl UsageSummary {
    /// Detach a borrowed usage record into an owned summary.
    pub fn from_record(record: &UsageRecord<'_>) -> Self {
        Self {
            package_name: record.import.package_name.clone(),
            locations: record.locations.clone(),
        }
    }
}

/// Data container for report rendering: everything one scanned file
/// produced.
#[derive(Debug, Clone)]
pub struct ReportData {
    /// Display name of the source (file path or `<memory>`).
    pub source_name: String,
    /// Language the file was scanned as.
    pub language: Language,
    /// Imports in source order.
    pub imports: Vec<ImportRecord>,
    /// Usage summaries, present only when usage location ran.
    pub usages: Option<Vec<UsageSummary>>,
    /// Non-fatal diagnostics from the scan.
    pub errors: Vec<String>,
}

impl ReportData {
    /// Build report data from one scan result.
    pub fn from_scan(source_name: impl Into<String>, language: Language, scan: ScanResult) -> Self {
        Self {
            source_name: source_name.into(),
            language,
            imports: scan.imports,
            usages: None,
            errors: scan.errors,
        }
    }

    /// Attach located usages.
    pub fn with_usages(mut self, records: &[UsageRecord<'_>]) -> Self {
        self.usages = Some(records.iter().map(UsageSummary::from_record).collect());
        self
    }

    /// Total number of located usage occurrences.
    pub fn usage_count(&self) -> usize {
        self.usages
            .as_ref()
            .map_or(0, |u| u.iter().map(|s| s.locations.len()).sum())
    }
}

/// Trait for report exporters.
pub trait Exporter {
    /// Export the data to the given writer.
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()>;
}

/// Export data in the specified format.
pub fn export<W: Write>(format: ExportFormat, data: &ReportData, writer: &mut W) -> io::Result<()> {
    match format {
        ExportFormat::Json => json::JsonExporter.export(data, writer),
        ExportFormat::Markdown => markdown::MarkdownExporter.export(data, writer),
    }
}

/// Export data to a string.
pub fn export_to_string(format: ExportFormat, data: &ReportData) -> io::Result<String> {
    let mut buffer = Vec::new();
    export(format, data, &mut buffer)?;
    String::from_utf8(buffer).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
