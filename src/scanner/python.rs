//! Python import extraction.
//!
//! Line-oriented scan over the full file text. The cursor normally advances
//! one line per iteration but a `from X import (...)` statement consumes
//! every line until its parentheses balance, and a trailing backslash forces
//! consumption of the next line regardless of parenthesis state.
//!
//! Relative imports (`from . import x`, `from .mod import y`) produce no
//! records. Lines that match no recognized shape are skipped silently;
//! statement-level failures are collected as line-tagged diagnostics and
//! never abort the scan.

use std::sync::OnceLock;

use regex::Regex;

use super::resolver::is_relative_path;
use super::types::{ImportRecord, Language, Position, ScanResult, SourceRange};

/// `from <dotted-path> import <content>` on a whitespace-stripped line.
fn regex_from_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^from\s+([\w.]+)\s+import\b\s*(.*)$").expect("valid from-import regex")
    })
}

/// `import <content>` with capture positions into the original line.
fn regex_import_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*import\s+(.+?)\s*$").expect("valid import regex"))
}

/// `import a.b.c [as alias]` exactly.
fn regex_simple_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^import\s+([\w.]+)(?:\s+as\s+(\w+))?$").expect("valid simple-import regex")
    })
}

/// What one cursor step produced: zero or more records plus the number of
/// lines consumed.
struct LineStep {
    records: Vec<ImportRecord>,
    consumed: usize,
}

/// Extractor for Python sources.
pub struct PythonExtractor;

impl PythonExtractor {
    /// Scan the full text and return every import declaration in order.
    pub fn extract(&self, source: &str) -> ScanResult {
        let lines: Vec<&str> = source.split('\n').collect();
        let mut imports = Vec::new();
        let mut errors = Vec::new();

        let mut cursor = 0;
        while cursor < lines.len() {
            let trimmed = lines[cursor].trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                cursor += 1;
                continue;
            }

            match self.interpret_line(&lines, cursor) {
                Ok(Some(step)) => {
                    imports.extend(step.records);
                    cursor += step.consumed.max(1);
                }
                Ok(None) => cursor += 1,
                Err(message) => {
                    // 1-based line numbers in diagnostics.
                    errors.push(format!("line {}: {}", cursor + 1, message));
                    cursor += 1;
                }
            }
        }

        ScanResult { imports, errors }
    }

    /// Try the three statement shapes against the line at `start`, in
    /// priority order: from-import, multi-import, simple import.
    fn interpret_line(&self, lines: &[&str], start: usize) -> Result<Option<LineStep>, String> {
        if let Some(step) = self.scan_from_import(lines, start)? {
            return Ok(Some(step));
        }
        if let Some(step) = self.scan_import_line(lines[start], start)? {
            return Ok(Some(step));
        }
        Ok(None)
    }

    /// Handle `from <path> import <content>`, merging continuation lines.
    fn scan_from_import(&self, lines: &[&str], start: usize) -> Result<Option<LineStep>, String> {
        let line = lines[start];
        let stripped = line.trim();
        let caps = match regex_from_import().captures(stripped) {
            Some(caps) => caps,
            None => return Ok(None),
        };

        let path = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        if is_relative_path(path) {
            return Ok(Some(LineStep {
                records: Vec::new(),
                consumed: 1,
            }));
        }

        // Consume continuation lines: unbalanced '(' keeps the statement
        // open, and a trailing '\' forces one more line regardless.
        let mut end = start;
        let mut open = count_char(line, '(');
        let mut close = count_char(line, ')');
        while end + 1 < lines.len() {
            let continues = open > close || lines[end].trim_end().ends_with('\\');
            if !continues {
                break;
            }
            end += 1;
            open += count_char(lines[end], '(');
            close += count_char(lines[end], ')');
        }

        let (raw, range) = merged_statement(lines, start, end);

        let mut content = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
        for continuation in &lines[start + 1..=end] {
            content.push('\n');
            content.push_str(continuation);
        }

        let bindings = parse_from_bindings(&content);
        if bindings.is_empty() && content.trim().trim_matches(['(', ')']).trim() != "*" {
            return Err(format!("no importable names after 'from {path} import'"));
        }

        let record = ImportRecord {
            package_name: path.to_string(),
            raw_statement: raw,
            language: Language::Python,
            source_range: range,
            named_bindings: if bindings.is_empty() {
                None
            } else {
                Some(bindings)
            },
            is_default_binding: false,
            is_require_form: false,
        };

        Ok(Some(LineStep {
            records: vec![record],
            consumed: end - start + 1,
        }))
    }

    /// Handle `import a, b as x, c` and `import a.b.c [as alias]`.
    fn scan_import_line(&self, line: &str, line_idx: usize) -> Result<Option<LineStep>, String> {
        // Trailing comments are not part of the statement.
        let line = line.split('#').next().unwrap_or(line);
        let caps = match regex_import_line().captures(line) {
            Some(caps) => caps,
            None => return Ok(None),
        };
        let content = caps.get(1).expect("import content group");

        if !content.as_str().contains(',') {
            return Ok(self
                .scan_simple_import(line, line_idx)
                .map(|record| LineStep {
                    records: vec![record],
                    consumed: 1,
                }));
        }

        // Multi-import: one record per comma segment, each ranged over its
        // own segment so records never overlap.
        let mut records = Vec::new();
        for (seg_start, seg_end, segment) in split_with_positions(content.as_str(), content.start())
        {
            if segment.is_empty() {
                return Err("empty segment in multi-import".to_string());
            }
            let package = segment.split_whitespace().next().unwrap_or_default();
            if package.is_empty() || is_relative_path(package) {
                continue;
            }

            records.push(ImportRecord {
                package_name: package.to_string(),
                raw_statement: segment.to_string(),
                language: Language::Python,
                source_range: SourceRange::new(
                    Position::new(line_idx, seg_start),
                    Position::new(line_idx, seg_end),
                ),
                named_bindings: None,
                is_default_binding: false,
                is_require_form: false,
            });
        }

        Ok(Some(LineStep {
            records,
            consumed: 1,
        }))
    }

    /// Handle `import a.b.c [as alias]`; the full dotted path is the
    /// package identity.
    fn scan_simple_import(&self, line: &str, line_idx: usize) -> Option<ImportRecord> {
        let stripped = line.trim();
        let caps = regex_simple_import().captures(stripped)?;
        let path = caps.get(1)?.as_str();
        if is_relative_path(path) {
            return None;
        }

        let indent = line.len() - line.trim_start().len();
        Some(ImportRecord {
            package_name: path.to_string(),
            raw_statement: stripped.to_string(),
            language: Language::Python,
            source_range: SourceRange::new(
                Position::new(line_idx, indent),
                Position::new(line_idx, indent + stripped.len()),
            ),
            named_bindings: None,
            is_default_binding: false,
            is_require_form: false,
        })
    }
}

/// Rebuild the exact statement text and its bounding range from the first
/// consumed line (minus indentation) through the last (minus trailing
/// whitespace).
fn merged_statement(lines: &[&str], start: usize, end: usize) -> (String, SourceRange) {
    let first = lines[start];
    let indent = first.len() - first.trim_start().len();
    let last_len = lines[end].trim_end().len();

    let mut raw = String::from(&first[indent..]);
    if start == end {
        raw.truncate(raw.trim_end().len());
    } else {
        for line in &lines[start + 1..end] {
            raw.push('\n');
            raw.push_str(line);
        }
        raw.push('\n');
        raw.push_str(&lines[end][..last_len]);
    }

    let range = SourceRange::new(
        Position::new(start, indent),
        Position::new(end, last_len),
    );
    (raw, range)
}

/// Split the merged import content into resolved local names.
///
/// Parentheses, backslashes, and per-line `#` comments are stripped, the
/// remainder is comma-split, and `a as b` resolves to `b`. The wildcard
/// `*` introduces no nameable binding and is dropped.
fn parse_from_bindings(content: &str) -> Vec<String> {
    let cleaned: String = content
        .split('\n')
        .map(|line| line.split('#').next().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(" ")
        .replace(['(', ')', '\\'], " ");

    let mut bindings = Vec::new();
    for entry in cleaned.split(',') {
        let entry = entry.trim();
        if entry.is_empty() || entry == "*" {
            continue;
        }
        let name = match entry.rsplit_once(" as ") {
            Some((_, alias)) => alias.trim(),
            None => entry,
        };
        if !name.is_empty() && !bindings.iter().any(|b| b == name) {
            bindings.push(name.to_string());
        }
    }
    bindings
}

/// Comma-split a slice of a line, yielding each trimmed segment with its
/// absolute start/end columns.
fn split_with_positions(content: &str, base: usize) -> Vec<(usize, usize, &str)> {
    let mut pieces = Vec::new();
    let mut offset = 0;
    for part in content.split(',') {
        let leading = part.len() - part.trim_start().len();
        let trimmed = part.trim();
        let start = base + offset + leading;
        pieces.push((start, start + trimmed.len(), trimmed));
        offset += part.len() + 1;
    }
    pieces
}

fn count_char(text: &str, needle: char) -> usize {
    text.chars().filter(|&c| c == needle).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extract(source: &str) -> ScanResult {
        PythonExtractor.extract(source)
    }

    #[test]
    fn test_simple_import() {
        let result = extract("import os\n");
        assert_eq!(result.imports.len(), 1);
        let record = &result.imports[0];
        assert_eq!(record.package_name, "os");
        assert_eq!(record.raw_statement, "import os");
        assert_eq!(record.language, Language::Python);
        assert!(record.named_bindings.is_none());
        assert!(!record.is_default_binding);
        assert!(!record.is_require_form);
    }

    #[test]
    fn test_simple_import_dotted_path_not_truncated() {
        let result = extract("import os.path\n");
        assert_eq!(result.imports[0].package_name, "os.path");
    }

    #[test]
    fn test_simple_import_with_alias() {
        let result = extract("import numpy as np\n");
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].package_name, "numpy");
        assert_eq!(result.imports[0].raw_statement, "import numpy as np");
    }

    #[test]
    fn test_from_import_named_bindings() {
        let result = extract("from google.generativeai import GenerativeModel\n");
        assert_eq!(result.imports.len(), 1);
        let record = &result.imports[0];
        assert_eq!(record.package_name, "google.generativeai");
        assert_eq!(
            record.named_bindings,
            Some(vec!["GenerativeModel".to_string()])
        );
    }

    #[test]
    fn test_from_import_alias_resolves_to_alias() {
        let result = extract("from collections import OrderedDict as OD, deque\n");
        let bindings = result.imports[0].named_bindings.clone().unwrap();
        assert_eq!(bindings, vec!["OD".to_string(), "deque".to_string()]);
    }

    #[test]
    fn test_relative_from_import_skipped() {
        let result = extract("from . import x\nfrom .utils import helper\n");
        assert!(result.imports.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_multi_import_one_record_per_package() {
        let result = extract("import os, sys, json\n");
        let names: Vec<_> = result
            .imports
            .iter()
            .map(|r| r.package_name.as_str())
            .collect();
        assert_eq!(names, vec!["os", "sys", "json"]);
    }

    #[test]
    fn test_multi_import_segment_ranges_do_not_overlap() {
        let source = "import os, sys as system\n";
        let result = extract(source);
        assert_eq!(result.imports.len(), 2);
        let first = &result.imports[0];
        let second = &result.imports[1];
        assert_eq!(first.raw_statement, "os");
        assert_eq!(second.raw_statement, "sys as system");
        assert!(first.source_range.end.column <= second.source_range.start.column);
        // Each range bounds exactly its raw statement text.
        let line = source.lines().next().unwrap();
        assert_eq!(
            &line[second.source_range.start.column..second.source_range.end.column],
            "sys as system"
        );
    }

    #[test]
    fn test_parenthesized_continuation_merges_lines() {
        let source = "from flask import (\n    Flask,\n    request,\n)\nx = 1\n";
        let result = extract(source);
        assert_eq!(result.imports.len(), 1);
        let record = &result.imports[0];
        assert_eq!(record.source_range.start.line, 0);
        assert_eq!(record.source_range.end.line, 3);
        assert_eq!(
            record.named_bindings,
            Some(vec!["Flask".to_string(), "request".to_string()])
        );
        assert!(record.raw_statement.contains("request,"));
        assert!(record.raw_statement.ends_with(')'));
    }

    #[test]
    fn test_unclosed_paren_consumes_to_end_of_file() {
        let source = "from pkg import (\n    a,\n    b";
        let result = extract(source);
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].source_range.end.line, 2);
        assert_eq!(
            result.imports[0].named_bindings,
            Some(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_backslash_continuation() {
        let source = "from os.path import join, \\\n    dirname\n";
        let result = extract(source);
        assert_eq!(result.imports.len(), 1);
        let record = &result.imports[0];
        assert_eq!(record.source_range.end.line, 1);
        assert_eq!(
            record.named_bindings,
            Some(vec!["join".to_string(), "dirname".to_string()])
        );
    }

    #[test]
    fn test_comment_line_yields_nothing() {
        let result = extract("# import requests\n");
        assert!(result.imports.is_empty());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_trailing_comment_stripped_from_import_line() {
        let result = extract("import os  # stdlib\n");
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].raw_statement, "import os");
    }

    #[test]
    fn test_unmatched_line_skipped_without_error() {
        let result = extract("x = compute()\nimport os\n");
        assert_eq!(result.imports.len(), 1);
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_empty_from_import_records_line_tagged_error() {
        let source = "x = 1\nfrom pkg import\nimport os\n";
        let result = extract(source);
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].package_name, "os");
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("line 2:"), "{}", result.errors[0]);
    }

    #[test]
    fn test_wildcard_import_has_no_named_bindings() {
        let result = extract("from os import *\n");
        assert_eq!(result.imports.len(), 1);
        assert!(result.imports[0].named_bindings.is_none());
        assert!(result.errors.is_empty());
    }

    #[test]
    fn test_range_bounds_raw_statement_exactly() {
        let source = "    import os   \n";
        let result = extract(source);
        let record = &result.imports[0];
        assert_eq!(record.source_range.start, Position::new(0, 4));
        assert_eq!(record.source_range.end, Position::new(0, 13));
        let line = source.lines().next().unwrap();
        assert_eq!(
            &line[record.source_range.start.column..record.source_range.end.column],
            record.raw_statement
        );
    }

    #[test]
    fn test_indented_import_inside_function() {
        let source = "def load():\n    import json\n    return json\n";
        let result = extract(source);
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].package_name, "json");
        assert_eq!(result.imports[0].source_range.start.line, 1);
    }
}
