//! source_map.rs - Removes source-map comment references from CSS text.
//!
//! This is a pure text filter: no parsing, never fails, and every byte outside
//! a matched reference is left untouched.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use regex::Regex;
use std::borrow::Cow;

lazy_static! {
    /// `/*# sourceMappingURL=<url> */`, the legacy `/*@ ... */` form, and `//# sourceMappingURL=<url>`.
    static ref SOURCE_MAP_REF: Regex = Regex::new(
        r"/\*\s*[#@]\s*sourceMappingURL=[A-Za-z0-9\-._~:/?#\[\]@!$&'()+,;=%]*\s*\*/|//[#@]\s*sourceMappingURL=[A-Za-z0-9\-._~:/?#\[\]@!$&'()*+,;=%]*"
    )
    .unwrap();
}

/// Source-map references in `css`, in order of appearance.
pub fn find_source_map_refs(css: &str) -> Vec<&str> {
    SOURCE_MAP_REF.find_iter(css).map(|m| m.as_str()).collect()
}

/// Re-attaches the source-map references of `source` to `compiled`, one per line.
///
/// Reprinting through the CSS parser drops comments, so passes that reprint
/// call this to leave removal to [`strip_source_map_refs`] alone.
pub fn append_source_map_refs(mut compiled: String, source: &str) -> String {
    for reference in find_source_map_refs(source) {
        if compiled.contains(reference) {
            continue;
        }
        if !compiled.is_empty() && !compiled.ends_with('\n') {
            compiled.push('\n');
        }
        compiled.push_str(reference);
        compiled.push('\n');
    }
    compiled
}

/// Strips every source-map comment reference from `css`.
pub fn strip_source_map_refs(css: &str) -> String {
    match SOURCE_MAP_REF.replace_all(css, "") {
        Cow::Borrowed(unchanged) => unchanged.to_string(),
        Cow::Owned(stripped) => {
            log::debug!("Stripped source-map reference(s) from stylesheet");
            stripped
        }
    }
}
