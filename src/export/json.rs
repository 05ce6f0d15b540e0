//! JSON export implementation.
//!
//! Exports scan results in JSON format for machine-readable output. The
//! record shapes mirror the crate's data model, camelCase keys included.

use super::{Exporter, ReportData, UsageSummary};
use crate::scanner::types::ImportRecord;
use serde::Serialize;
use std::io::{self, Write};

/// JSON exporter implementation.
pub struct JsonExporter;

/// Summary statistics for JSON output.
#[derive(Serialize)]
struct JsonSummary {
    imports: usize,
    usages: usize,
    errors: usize,
}

/// Root JSON export structure.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    file: &'a str,
    language: &'a str,
    summary: JsonSummary,
    imports: &'a [ImportRecord],
    #[serde(skip_serializing_if = "Option::is_none")]
    usages: Option<&'a [UsageSummary]>,
    #[serde(skip_serializing_if = "slice_is_empty")]
    errors: &'a [String],
}

fn slice_is_empty(slice: &&[String]) -> bool {
    slice.is_empty()
}

impl Exporter for JsonExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        let report = JsonReport {
            file: &data.source_name,
            language: data.language.tag(),
            summary: JsonSummary {
                imports: data.imports.len(),
                usages: data.usage_count(),
                errors: data.errors.len(),
            },
            imports: &data.imports,
            usages: data.usages.as_deref(),
            errors: &data.errors,
        };

        let json = serde_json::to_string_pretty(&report)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        writeln!(writer, "{}", json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::{scan_source, Language};
    use crate::usage::locate_usages;

    fn report_for(source: &str) -> ReportData {
        let scan = scan_source(source, Language::Python);
        let usages = locate_usages(source, &scan.imports);
        ReportData::from_scan("test.py", Language::Python, scan.clone()).with_usages(&usages)
    }

    #[test]
    fn test_json_export_basic() {
        let data = report_for("import numpy as np\nv = np.zeros(3)\n");
        let mut output = Vec::new();
        JsonExporter.export(&data, &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["file"], "test.py");
        assert_eq!(parsed["language"], "python");
        assert_eq!(parsed["summary"]["imports"], 1);
        assert_eq!(parsed["summary"]["usages"], 1);
        assert_eq!(parsed["imports"][0]["packageName"], "numpy");
    }

    #[test]
    fn test_json_export_usage_shape() {
        let data = report_for("from flask import Flask\napp = Flask()\n");
        let mut output = Vec::new();
        JsonExporter.export(&data, &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let usage = &parsed["usages"][0];
        assert_eq!(usage["packageName"], "flask");
        assert_eq!(usage["locations"][0]["usageKind"], "classInstantiation");
        assert_eq!(usage["locations"][0]["identifier"], "Flask");
        assert_eq!(usage["locations"][0]["range"]["start"]["line"], 1);
    }

    #[test]
    fn test_json_export_omits_empty_sections() {
        let scan = scan_source("import os\n", Language::Python);
        let data = ReportData::from_scan("test.py", Language::Python, scan);
        let mut output = Vec::new();
        JsonExporter.export(&data, &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert!(parsed.get("usages").is_none());
        assert!(parsed.get("errors").is_none());
    }

    #[test]
    fn test_json_export_errors_included() {
        let scan = scan_source("import os\n", Language::Python);
        let mut data = ReportData::from_scan("test.py", Language::Python, scan);
        data.errors.push("line 3: no importable names".to_string());

        let mut output = Vec::new();
        JsonExporter.export(&data, &mut output).unwrap();

        let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(parsed["summary"]["errors"], 1);
        assert_eq!(parsed["errors"][0], "line 3: no importable names");
    }
}
