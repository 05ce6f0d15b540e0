//! Usage location for imported names.
//!
//! Given the import records for a file and the same file text, finds every
//! later textual occurrence of each import's bound identifier and
//! classifies how it is used. The matcher is deliberately lexical: an
//! occurrence counts only when no word character precedes it and a
//! usage-context character follows it, and string/comment detection is
//! line-local. A bare identifier at end of line (nothing qualifying after
//! it) is not counted, and a match inside a triple-quoted string that
//! opened on an earlier line is not rejected; both behaviors are fixed
//! points of the heuristic, not defects.

use serde::Serialize;

use crate::scanner::types::{ImportRecord, SourceRange};
use crate::text::LineIndex;

/// How an imported identifier is used at one location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum UsageKind {
    /// Identifier immediately followed by `(`, lowercase-leading.
    FunctionCall,
    /// Identifier immediately followed by `.`.
    AttributeAccess,
    /// Identifier immediately followed by `(`, uppercase-leading.
    ClassInstantiation,
    /// Any other qualifying occurrence.
    Reference,
}

/// One occurrence of a bound identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageLocation {
    /// Range of the matched identifier text only.
    pub range: SourceRange,
    /// The text that matched.
    pub identifier: String,
    /// Classification of the occurrence.
    #[serde(rename = "usageKind")]
    pub kind: UsageKind,
}

/// All surviving occurrences of one import's bound identifiers.
///
/// Imports with zero surviving usages produce no record at all; absence,
/// not an empty list, is the signal.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord<'a> {
    /// The import that introduced the identifiers.
    pub import: &'a ImportRecord,
    /// Occurrences in text order; never empty.
    pub locations: Vec<UsageLocation>,
}

/// Characters that may immediately follow an identifier for the
/// occurrence to count as a usage. Newline is deliberately absent.
fn is_follow_char(c: char) -> bool {
    matches!(
        c,
        '(' | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | ','
            | ':'
            | ' '
            | '\t'
            | '='
            | '<'
            | '>'
            | '!'
            | '+'
            | '-'
            | '*'
            | '/'
            | '%'
            | '.'
    )
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Locate every usage of the given imports' bound identifiers in the file
/// text. Records come back in the order the imports were supplied.
pub fn locate_usages<'a>(source: &str, imports: &'a [ImportRecord]) -> Vec<UsageRecord<'a>> {
    let index = LineIndex::new(source);
    let mut records = Vec::new();

    for import in imports {
        let statement_start = index.offset_of(import.source_range.start);
        let statement_end = index.offset_of(import.source_range.end);

        let mut found: Vec<(usize, UsageLocation)> = Vec::new();
        for identifier in bound_identifiers(import) {
            collect_matches(
                source,
                &index,
                &identifier,
                statement_start..statement_end,
                &mut found,
            );
        }
        found.sort_by_key(|(offset, _)| *offset);

        let locations: Vec<UsageLocation> =
            found.into_iter().map(|(_, location)| location).collect();
        if !locations.is_empty() {
            records.push(UsageRecord { import, locations });
        }
    }

    records
}

/// Derive the local identifier(s) an import binds, which may differ from
/// its package name: an `as`-alias for a simple import, the resolved named
/// bindings for a from-import or destructured require, or the last dotted
/// segment of the package name.
pub fn bound_identifiers(import: &ImportRecord) -> Vec<String> {
    if let Some(bindings) = &import.named_bindings {
        if !bindings.is_empty() {
            return bindings.clone();
        }
    }

    if let Some(alias) = simple_import_alias(&import.raw_statement) {
        return vec![alias];
    }

    let last_segment = import
        .package_name
        .rsplit('.')
        .next()
        .unwrap_or(&import.package_name);
    vec![last_segment.to_string()]
}

/// Find `as <alias>` in a simple import's raw statement.
fn simple_import_alias(raw: &str) -> Option<String> {
    let (_, tail) = raw.rsplit_once(" as ")?;
    let alias: String = tail
        .chars()
        .take_while(|&c| is_word_char(c))
        .collect();
    if alias.is_empty() {
        None
    } else {
        Some(alias)
    }
}

fn collect_matches(
    source: &str,
    index: &LineIndex,
    identifier: &str,
    statement: std::ops::Range<usize>,
    out: &mut Vec<(usize, UsageLocation)>,
) {
    for (offset, matched) in source.match_indices(identifier) {
        let end = offset + matched.len();

        // Word boundary before, usage-context character after. An
        // occurrence with nothing qualifying after it is not a usage.
        if source[..offset].chars().next_back().is_some_and(is_word_char) {
            continue;
        }
        let follow = source[end..].chars().next();
        let Some(follow) = follow else { continue };
        if !is_follow_char(follow) {
            continue;
        }

        // The declaration itself is not a usage.
        if offset >= statement.start && end <= statement.end {
            continue;
        }

        // Line-local comment and string-literal rejection.
        let position = index.position_of(offset);
        let prefix = &source[index.line_start(position.line)..offset];
        if in_line_comment(prefix) || in_line_string(prefix) {
            continue;
        }

        let kind = classify(identifier, follow);
        out.push((
            offset,
            UsageLocation {
                range: SourceRange::new(position, index.position_of(end)),
                identifier: matched.to_string(),
                kind,
            },
        ));
    }
}

/// Classify an occurrence by the character immediately following it.
fn classify(identifier: &str, follow: char) -> UsageKind {
    match follow {
        '(' => {
            if leading_char_is_class_like(identifier) {
                UsageKind::ClassInstantiation
            } else {
                UsageKind::FunctionCall
            }
        }
        '.' => UsageKind::AttributeAccess,
        _ => UsageKind::Reference,
    }
}

/// True when the identifier starts with an uppercase character that has a
/// distinct lowercase form.
fn leading_char_is_class_like(identifier: &str) -> bool {
    identifier
        .chars()
        .next()
        .is_some_and(|c| c.is_uppercase() && c.to_lowercase().next() != Some(c))
}

/// Was an unescaped `#` seen earlier on this line, outside any string?
fn in_line_comment(prefix: &str) -> bool {
    let mut in_single = false;
    let mut in_double = false;
    let mut previous = '\0';
    for c in prefix.chars() {
        match c {
            '\'' if previous != '\\' && !in_double => in_single = !in_single,
            '"' if previous != '\\' && !in_single => in_double = !in_double,
            '#' if previous != '\\' && !in_single && !in_double => return true,
            _ => {}
        }
        previous = c;
    }
    false
}

/// Quote-parity check over the line prefix: an odd count of single or
/// double quotes (triple-quote runs subtracted out) means the match sits
/// inside a string literal opened on this line. Strings opened on earlier
/// lines are not tracked.
fn in_line_string(prefix: &str) -> bool {
    let singles = prefix
        .matches('\'')
        .count()
        .saturating_sub(3 * prefix.matches("'''").count());
    let doubles = prefix
        .matches('"')
        .count()
        .saturating_sub(3 * prefix.matches("\"\"\"").count());
    singles % 2 == 1 || doubles % 2 == 1
}
