//! Shared types for import scanning.
//!
//! This module defines the core data structures produced by the language
//! extractors: source positions, import records, and per-file scan results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Source language of a scanned file.
///
/// Editor-specific variant tags (e.g. `javascriptreact`) map onto one of
/// these three languages; anything else is unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    JavaScript,
    TypeScript,
}

impl Language {
    /// Resolve a language tag (as reported by an editor) to a language.
    ///
    /// Returns `None` for unknown tags; callers turn that into a
    /// descriptive error string rather than a failure.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "python" => Some(Language::Python),
            "javascript" | "javascriptreact" => Some(Language::JavaScript),
            "typescript" | "typescriptreact" => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// Determine language from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "py" => Some(Language::Python),
            "js" | "jsx" | "mjs" | "cjs" => Some(Language::JavaScript),
            "ts" | "tsx" | "mts" | "cts" => Some(Language::TypeScript),
            _ => None,
        }
    }

    /// The canonical tag for this language.
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A zero-based line/column position in source text.
///
/// Columns are byte offsets within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A half-open span of source text, bounded by start and end positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRange {
    pub start: Position,
    pub end: Position,
}

impl SourceRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// One parsed import/require declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    /// Canonical or full dotted/scoped package identity. Never empty and
    /// never a relative path.
    pub package_name: String,

    /// Exact source text of the declaration, including continuation lines.
    pub raw_statement: String,

    /// The language the declaration was parsed under.
    pub language: Language,

    /// Range exactly bounding `raw_statement` in the source text.
    pub source_range: SourceRange,

    /// Resolved local names introduced by a `from X import a, b as c` or
    /// destructured-require form. Aliases win over original names. `None`
    /// for forms that introduce no named binding list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub named_bindings: Option<Vec<String>>,

    /// True when an ES import carries a default or namespace binding.
    /// Always false for Python records.
    #[serde(default)]
    pub is_default_binding: bool,

    /// True only for the CommonJS `require(...)` form.
    /// Always false for Python records.
    #[serde(default)]
    pub is_require_form: bool,
}

impl ImportRecord {
    /// Returns true if this record carries a named-binding list.
    pub fn has_named_bindings(&self) -> bool {
        self.named_bindings.as_ref().is_some_and(|b| !b.is_empty())
    }
}

impl fmt::Display for ImportRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] at {}",
            self.package_name, self.language, self.source_range.start
        )
    }
}

/// Result of scanning one file's text for imports.
///
/// Statement-level parse failures are collected as human-readable strings
/// in `errors`; they never abort the scan. An unsupported language tag
/// yields empty `imports` plus one descriptive error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanResult {
    /// Imports in source order, already deduplicated by package name.
    pub imports: Vec<ImportRecord>,
    /// Non-fatal diagnostics encountered during the scan.
    pub errors: Vec<String>,
}

impl ScanResult {
    /// A result carrying no imports and a single diagnostic.
    pub fn with_error(message: impl Into<String>) -> Self {
        Self {
            imports: Vec::new(),
            errors: vec![message.into()],
        }
    }
}
