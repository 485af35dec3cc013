//! Post-processing passes applied to compiled stylesheets.
//!
//! * `root_selectors`: parses the compiled CSS and removes `html`, `body` and
//!   `:root` segments that cannot match inside a scoping container.
//! * `source_map`: pattern-based removal of `sourceMappingURL` references.

pub mod root_selectors;
pub mod source_map;
