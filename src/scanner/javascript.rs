//! JavaScript/TypeScript import extraction.
//!
//! Whole-text regex scan, not line-oriented. Four independent passes run
//! over the full source and their matches are merged in text order:
//!
//! 1. ES module imports (default, named, and namespace bindings)
//! 2. CommonJS `require(...)` declarations
//! 3. Dynamic `import(...)` expressions
//! 4. Re-exports (`export * from`, `export { ... } from`)
//!
//! Relative and local paths are discarded; everything else is resolved to
//! a canonical package name. Ranges are computed from absolute byte
//! offsets, so a statement that happens to span lines is still bounded
//! exactly.

use std::sync::OnceLock;

use regex::Regex;

use super::resolver::{is_relative_path, resolve_package_name};
use super::types::{ImportRecord, Language, ScanResult, SourceRange};
use crate::text::LineIndex;

/// ES module import: optional default binding, then a named block, a
/// namespace binding, or a lone default, then `from '<path>'`.
fn regex_es_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"import\s+(?:type\s+)?(?:([A-Za-z_$][\w$]*)\s*,\s*)?(?:\{([^}]*)\}|\*\s*as\s+([A-Za-z_$][\w$]*)|([A-Za-z_$][\w$]*))\s*from\s*['"]([^'"]+)['"]"#,
        )
        .expect("valid ES import regex")
    })
}

/// CommonJS require: `const|let|var <name> | { destructure } = require('<path>')`.
fn regex_require() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?:const|let|var)\s+(?:([A-Za-z_$][\w$]*)|\{([^}]*)\})\s*=\s*require\s*\(\s*['"]([^'"]+)['"]\s*\)"#,
        )
        .expect("valid require regex")
    })
}

/// Dynamic import expression: `import('<path>')`.
fn regex_dynamic_import() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"import\s*\(\s*['"]([^'"]+)['"]\s*\)"#).expect("valid dynamic import regex")
    })
}

/// Re-export: `export * [as ns] from '<path>'` or `export { ... } from '<path>'`.
fn regex_re_export() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"export\s+(?:\*(?:\s+as\s+[A-Za-z_$][\w$]*)?|\{([^}]*)\})\s*from\s*['"]([^'"]+)['"]"#,
        )
        .expect("valid re-export regex")
    })
}

/// Extractor shared by JavaScript and TypeScript sources.
pub struct JsTsExtractor;

impl JsTsExtractor {
    /// Scan the full text and return every package import in text order.
    ///
    /// `language` tags the produced records and must be JavaScript or
    /// TypeScript.
    pub fn extract(&self, source: &str, language: Language) -> ScanResult {
        let index = LineIndex::new(source);
        let mut matches: Vec<(usize, ImportRecord)> = Vec::new();

        self.scan_es_imports(source, language, &index, &mut matches);
        self.scan_requires(source, language, &index, &mut matches);
        self.scan_dynamic_imports(source, language, &index, &mut matches);
        self.scan_re_exports(source, language, &index, &mut matches);

        matches.sort_by_key(|(offset, _)| *offset);
        ScanResult {
            imports: matches.into_iter().map(|(_, record)| record).collect(),
            errors: Vec::new(),
        }
    }

    fn scan_es_imports(
        &self,
        source: &str,
        language: Language,
        index: &LineIndex,
        out: &mut Vec<(usize, ImportRecord)>,
    ) {
        for caps in regex_es_import().captures_iter(source) {
            let path = caps.get(5).map(|m| m.as_str()).unwrap_or_default();
            let Some(whole) = caps.get(0) else { continue };
            if is_relative_path(path) {
                continue;
            }

            let named = caps
                .get(2)
                .map(|block| parse_named_list(block.as_str(), " as "))
                .filter(|names| !names.is_empty());
            let has_default =
                caps.get(1).is_some() || caps.get(3).is_some() || caps.get(4).is_some();

            out.push((
                whole.start(),
                build_record(path, whole.as_str(), language, index, whole.start(), whole.end())
                    .with_bindings(named)
                    .with_flags(has_default, false),
            ));
        }
    }

    fn scan_requires(
        &self,
        source: &str,
        language: Language,
        index: &LineIndex,
        out: &mut Vec<(usize, ImportRecord)>,
    ) {
        for caps in regex_require().captures_iter(source) {
            let path = caps.get(3).map(|m| m.as_str()).unwrap_or_default();
            let Some(whole) = caps.get(0) else { continue };
            if is_relative_path(path) {
                continue;
            }

            // Destructured requires alias with ':' rather than 'as'.
            let named = caps
                .get(2)
                .map(|block| parse_named_list(block.as_str(), ":"))
                .filter(|names| !names.is_empty());

            out.push((
                whole.start(),
                build_record(path, whole.as_str(), language, index, whole.start(), whole.end())
                    .with_bindings(named)
                    .with_flags(false, true),
            ));
        }
    }

    fn scan_dynamic_imports(
        &self,
        source: &str,
        language: Language,
        index: &LineIndex,
        out: &mut Vec<(usize, ImportRecord)>,
    ) {
        for caps in regex_dynamic_import().captures_iter(source) {
            let path = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            let Some(whole) = caps.get(0) else { continue };
            if is_relative_path(path) {
                continue;
            }
            out.push((
                whole.start(),
                build_record(path, whole.as_str(), language, index, whole.start(), whole.end()),
            ));
        }
    }

    fn scan_re_exports(
        &self,
        source: &str,
        language: Language,
        index: &LineIndex,
        out: &mut Vec<(usize, ImportRecord)>,
    ) {
        for caps in regex_re_export().captures_iter(source) {
            let path = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
            let Some(whole) = caps.get(0) else { continue };
            if is_relative_path(path) {
                continue;
            }

            let named = caps
                .get(1)
                .map(|block| parse_named_list(block.as_str(), " as "))
                .filter(|names| !names.is_empty());

            out.push((
                whole.start(),
                build_record(path, whole.as_str(), language, index, whole.start(), whole.end())
                    .with_bindings(named),
            ));
        }
    }
}

/// Build a record for one matched statement, resolving the path to its
/// canonical package name and the offsets to a line/column range.
fn build_record(
    path: &str,
    raw: &str,
    language: Language,
    index: &LineIndex,
    start: usize,
    end: usize,
) -> ImportRecord {
    ImportRecord {
        package_name: resolve_package_name(path),
        raw_statement: raw.to_string(),
        language,
        source_range: SourceRange::new(index.position_of(start), index.position_of(end)),
        named_bindings: None,
        is_default_binding: false,
        is_require_form: false,
    }
}

trait RecordExt {
    fn with_bindings(self, bindings: Option<Vec<String>>) -> Self;
    fn with_flags(self, is_default: bool, is_require: bool) -> Self;
}

impl RecordExt for ImportRecord {
    fn with_bindings(mut self, bindings: Option<Vec<String>>) -> Self {
        self.named_bindings = bindings;
        self
    }

    fn with_flags(mut self, is_default: bool, is_require: bool) -> Self {
        self.is_default_binding = is_default;
        self.is_require_form = is_require;
        self
    }
}

/// Split a `{ ... }` binding block into resolved local names.
///
/// `alias_sep` is `" as "` for ES named imports/re-exports and `":"` for
/// destructured requires. A `type` modifier on a specifier is stripped.
fn parse_named_list(block: &str, alias_sep: &str) -> Vec<String> {
    let mut names = Vec::new();
    for entry in block.split(',') {
        let entry = entry.trim();
        let entry = entry.strip_prefix("type ").unwrap_or(entry).trim();
        if entry.is_empty() {
            continue;
        }
        let name = match entry.split_once(alias_sep) {
            Some((_, alias)) => alias.trim(),
            None => entry,
        };
        if !name.is_empty() && !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}
