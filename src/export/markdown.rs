//! Markdown export implementation.
//!
//! Renders one file's scan as a Markdown report: an import table, an
//! optional usage section, and any diagnostics.

use super::{Exporter, ReportData};
use std::io::{self, Write};

/// Markdown exporter implementation.
pub struct MarkdownExporter;

impl Exporter for MarkdownExporter {
    fn export<W: Write>(&self, data: &ReportData, writer: &mut W) -> io::Result<()> {
        writeln!(writer, "# Import Report: {}", data.source_name)?;
        writeln!(writer)?;
        writeln!(writer, "Language: `{}`", data.language)?;
        writeln!(writer)?;

        if data.imports.is_empty() {
            writeln!(writer, "No package imports found.")?;
        } else {
            writeln!(writer, "## Imports ({})", data.imports.len())?;
            writeln!(writer)?;
            writeln!(writer, "| Package | Line | Bindings | Statement |")?;
            writeln!(writer, "|---------|------|----------|-----------|")?;
            for import in &data.imports {
                let bindings = import
                    .named_bindings
                    .as_ref()
                    .map(|b| b.join(", "))
                    .unwrap_or_else(|| "-".to_string());
                writeln!(
                    writer,
                    "| {} | {} | {} | `{}` |",
                    import.package_name,
                    import.source_range.start.line + 1,
                    bindings,
                    first_line(&import.raw_statement),
                )?;
            }
        }

        if let Some(usages) = &data.usages {
            writeln!(writer)?;
            writeln!(writer, "## Usages ({})", data.usage_count())?;
            writeln!(writer)?;
            if usages.is_empty() {
                writeln!(writer, "No imported names are used.")?;
            }
            for summary in usages {
                writeln!(writer, "### {}", summary.package_name)?;
                writeln!(writer)?;
                for location in &summary.locations {
                    writeln!(
                        writer,
                        "- `{}` at {}:{} ({:?})",
                        location.identifier,
                        location.range.start.line + 1,
                        location.range.start.column,
                        location.kind,
                    )?;
                }
                writeln!(writer)?;
            }
        }

        if !data.errors.is_empty() {
            writeln!(writer)?;
            writeln!(writer, "## Diagnostics ({})", data.errors.len())?;
            writeln!(writer)?;
            for error in &data.errors {
                writeln!(writer, "- {}", error)?;
            }
        }

        Ok(())
    }
}

/// Multi-line statements collapse to their first line in the table.
fn first_line(statement: &str) -> &str {
    statement.split('\n').next().unwrap_or(statement)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::export_to_string;
    use crate::export::ExportFormat;
    use crate::scanner::{scan_source, Language};
    use crate::usage::locate_usages;

    #[test]
    fn test_markdown_has_import_table() {
        let source = "import numpy as np\nv = np.zeros(3)\n";
        let scan = scan_source(source, Language::Python);
        let data = ReportData::from_scan("test.py", Language::Python, scan);

        let output = export_to_string(ExportFormat::Markdown, &data).unwrap();
        assert!(output.contains("# Import Report: test.py"));
        assert!(output.contains("| numpy | 1 |"));
    }

    #[test]
    fn test_markdown_usage_section() {
        let source = "from flask import Flask\napp = Flask()\n";
        let scan = scan_source(source, Language::Python);
        let usages = locate_usages(source, &scan.imports);
        let data =
            ReportData::from_scan("app.py", Language::Python, scan.clone()).with_usages(&usages);

        let output = export_to_string(ExportFormat::Markdown, &data).unwrap();
        assert!(output.contains("## Usages (1)"));
        assert!(output.contains("### flask"));
        assert!(output.contains("ClassInstantiation"));
    }

    #[test]
    fn test_markdown_no_imports() {
        let scan = scan_source("x = 1\n", Language::Python);
        let data = ReportData::from_scan("empty.py", Language::Python, scan);
        let output = export_to_string(ExportFormat::Markdown, &data).unwrap();
        assert!(output.contains("No package imports found."));
    }

    #[test]
    fn test_markdown_multiline_statement_collapsed() {
        let source = "from flask import (\n    Flask,\n)\n";
        let scan = scan_source(source, Language::Python);
        let data = ReportData::from_scan("app.py", Language::Python, scan);
        let output = export_to_string(ExportFormat::Markdown, &data).unwrap();
        assert!(output.contains("`from flask import (`"));
    }
}
