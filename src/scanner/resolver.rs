//! Package identity resolution.
//!
//! Maps a module-path string as written in an import statement to the
//! canonical top-level package name. Scoped npm packages keep their first
//! two path segments (`@org/pkg/sub` -> `@org/pkg`); everything else is
//! truncated at the first slash (`lodash/map` -> `lodash`). Dotted Python
//! `from`-paths pass through whole: `google.generativeai` is already the
//! package identity and must not be truncated here.

/// Returns true when a module path refers to a relative or local file
/// rather than a distributable package.
///
/// Extractors call this before identity resolution and discard the
/// declaration entirely when it matches.
pub fn is_relative_path(path: &str) -> bool {
    path.starts_with('.') || path.starts_with('/')
}

/// Resolve a module path to its canonical package name.
///
/// Deterministic and idempotent: feeding the output back in yields the
/// same string for single-segment inputs.
///
/// # Example
///
/// ```
/// use importscope::scanner::resolver::resolve_package_name;
///
/// assert_eq!(resolve_package_name("@angular/core/testing"), "@angular/core");
/// assert_eq!(resolve_package_name("lodash/map"), "lodash");
/// assert_eq!(resolve_package_name("react"), "react");
/// ```
pub fn resolve_package_name(path: &str) -> String {
    if path.starts_with('@') {
        // Scoped package: keep @scope/name, drop any subpath.
        let mut segments = path.splitn(3, '/');
        let scope = segments.next().unwrap_or(path);
        return match segments.next() {
            Some(name) => format!("{}/{}", scope, name),
            None => path.to_string(),
        };
    }

    match path.find('/') {
        Some(idx) => path[..idx].to_string(),
        None => path.to_string(),
    }
}
