//! Import scanning for Python and JavaScript/TypeScript sources.
//!
//! The extractors are pure functions over one file's text: no state is
//! retained between calls and identical input yields identical output, so
//! concurrent scans of distinct files need no locking.
//!
//! # Example
//!
//! ```
//! use importscope::scanner::scan_tagged;
//!
//! let result = scan_tagged("import numpy as np\n", "python");
//! assert_eq!(result.imports.len(), 1);
//! assert_eq!(result.imports[0].package_name, "numpy");
//! ```

pub mod javascript;
pub mod python;
pub mod resolver;
pub mod types;

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use javascript::JsTsExtractor;
pub use python::PythonExtractor;
pub use types::{ImportRecord, Language, Position, ScanResult, SourceRange};

/// Errors that can occur when scanning a file from disk.
///
/// Problems inside a scan (malformed statements, unknown syntax) are not
/// errors at this level; they travel as diagnostic strings in
/// [`ScanResult::errors`].
#[derive(Debug, Error)]
pub enum ScanError {
    /// Failed to read the file from disk.
    #[error("Failed to read file: {0}")]
    FileRead(#[from] std::io::Error),

    /// The file extension maps to no supported language.
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),
}

/// Result type alias for file-level scan operations.
pub type FileScanResult<T> = Result<T, ScanError>;

/// A language-specific import extractor.
///
/// Two concrete implementations exist, selected by a pure lookup from the
/// language tag; they share no behavior beyond the identity resolver.
pub trait ImportExtractor: Sync {
    /// Extract every import declaration from the full source text.
    ///
    /// `language` tags the produced records; extractors that serve a
    /// single language may ignore it.
    fn extract(&self, source: &str, language: Language) -> ScanResult;
}

impl ImportExtractor for PythonExtractor {
    fn extract(&self, source: &str, _language: Language) -> ScanResult {
        PythonExtractor::extract(self, source)
    }
}

impl ImportExtractor for JsTsExtractor {
    fn extract(&self, source: &str, language: Language) -> ScanResult {
        JsTsExtractor::extract(self, source, language)
    }
}

static PYTHON_EXTRACTOR: PythonExtractor = PythonExtractor;
static JS_TS_EXTRACTOR: JsTsExtractor = JsTsExtractor;

/// Look up the extractor implementation for a language.
pub fn extractor_for(language: Language) -> &'static dyn ImportExtractor {
    match language {
        Language::Python => &PYTHON_EXTRACTOR,
        Language::JavaScript | Language::TypeScript => &JS_TS_EXTRACTOR,
    }
}

/// Collapse repeated imports of the same package, keeping the first
/// occurrence and dropping later duplicates.
pub fn dedupe_imports(records: Vec<ImportRecord>) -> Vec<ImportRecord> {
    let mut seen = HashSet::new();
    records
        .into_iter()
        .filter(|record| seen.insert(record.package_name.clone()))
        .collect()
}

/// Scan one file's text for the given language.
pub fn scan_source(source: &str, language: Language) -> ScanResult {
    let raw = extractor_for(language).extract(source, language);
    ScanResult {
        imports: dedupe_imports(raw.imports),
        errors: raw.errors,
    }
}

/// Scan one file's text under an editor language tag.
///
/// An unknown tag never fails: it yields an empty record list plus one
/// descriptive error string.
pub fn scan_tagged(source: &str, tag: &str) -> ScanResult {
    match Language::from_tag(tag) {
        Some(language) => scan_source(source, language),
        None => ScanResult::with_error(format!("unsupported language tag: '{tag}'")),
    }
}

/// The outcome of scanning one file from disk.
#[derive(Debug, Clone)]
pub struct FileScan {
    /// Path the source was read from.
    pub path: PathBuf,
    /// Language inferred from the file extension.
    pub language: Language,
    /// The file's text, kept for downstream usage location.
    pub source: String,
    /// Imports and diagnostics.
    pub result: ScanResult,
}

/// Read a file, infer its language from the extension, and scan it.
pub fn scan_file(path: &Path) -> FileScanResult<FileScan> {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let language = Language::from_extension(ext)
        .ok_or_else(|| ScanError::UnsupportedFileType(ext.to_string()))?;

    let source = fs::read_to_string(path)?;
    let result = scan_source(&source, language);
    Ok(FileScan {
        path: path.to_path_buf(),
        language,
        source,
        result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_import_collapsed_first_kept() {
        let source = "import os\nx = 1\nimport os\n";
        let result = scan_source(source, Language::Python);
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].source_range.start.line, 0);
    }

    #[test]
    fn test_dedupe_preserves_order_of_first_occurrences() {
        let source = "import b\nimport a\nimport b\nimport c\n";
        let result = scan_source(source, Language::Python);
        let names: Vec<_> = result
            .imports
            .iter()
            .map(|r| r.package_name.as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_js_duplicates_by_canonical_name() {
        let source = "import map from 'lodash/map';\nconst l = require('lodash');\n";
        let result = scan_source(source, Language::JavaScript);
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].package_name, "lodash");
        // First occurrence wins: the ES import, not the require.
        assert!(!result.imports[0].is_require_form);
    }

    #[test]
    fn test_scan_tagged_variant_tags() {
        let source = "import x from 'pkg';\n";
        let result = scan_tagged(source, "typescriptreact");
        assert_eq!(result.imports.len(), 1);
        assert_eq!(result.imports[0].language, Language::TypeScript);
    }

    #[test]
    fn test_scan_tagged_unknown_language() {
        let result = scan_tagged("import os\n", "ruby");
        assert!(result.imports.is_empty());
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("ruby"));
    }

    #[test]
    fn test_python_dotted_vs_from_not_conflated() {
        // `import os.path` and `from os import path` have different
        // package identities and both survive deduplication.
        let source = "import os.path\nfrom os import path\n";
        let result = scan_source(source, Language::Python);
        assert_eq!(result.imports.len(), 2);
    }

    #[test]
    fn test_scan_file_unsupported_extension() {
        let err = scan_file(Path::new("notes.txt")).unwrap_err();
        assert!(matches!(err, ScanError::UnsupportedFileType(_)));
    }
}
