// isocss-core/src/lib.rs
//! # isocss Core Library
//!
//! `isocss-core` provides the platform-independent logic for isolating a
//! stylesheet under a single class. A stylesheet is wrapped in
//! `.prefix { ... }`, compiled back to flat CSS so that every selector is
//! scoped, and optionally cleaned of root selectors and source-map references.
//!
//! The library performs no directory walking and owns no application state;
//! file discovery, output placement and reporting live in the `isocss` binary.
//!
//! ## Modules
//!
//! * `prefix`: The validated `PrefixClass` and its derivation from a project name.
//! * `engine`: Defines the `NamespaceEngine` trait and the `EngineKind` selector.
//! * `engines`: Concrete backends (`LightningEngine`, `LesscEngine`) and their shared pre-check.
//! * `sanitizers`: Post-compilation passes over the emitted CSS.
//! * `options`: The `IsolateOptions` toggles handed to the pipeline.
//! * `config`: The `.isocss.yml` project configuration.
//! * `scratch`: The run-scoped temporary directory used by external backends.
//! * `headless`: One-call helpers that run the whole pipeline.
//! * `errors`: The `IsolateError` type.
//!
//! ## Usage Example
//!
//! ```rust
//! use isocss_core::{headless_isolate_string, IsolateOptions, PrefixClass};
//! use anyhow::Result;
//!
//! fn main() -> Result<()> {
//!     let prefix = PrefixClass::new("my-widget")?;
//!     let options = IsolateOptions { remove_root_from_selectors: true, ..Default::default() };
//!
//!     let css = headless_isolate_string("body { margin: 0 } .card { padding: 1em }", &prefix, &options)?;
//!     assert!(css.contains(".my-widget .card"));
//!     assert!(!css.contains("body"));
//!     Ok(())
//! }
//! ```
//!
//! ---
//! License: MIT OR APACHE 2.0

pub mod config;
pub mod engine;
pub mod engines;
pub mod errors;
pub mod headless;
pub mod options;
pub mod prefix;
pub mod sanitizers;
pub mod scratch;

/// Re-exports the project configuration model.
pub use config::{IsolateConfig, CONFIG_FILE_NAMES, DEFAULT_EXTENSIONS};

/// Re-exports the error type and its location information.
pub use errors::{IsolateError, SourceLocation};

/// Re-exports the backend trait and selector.
pub use engine::{EngineKind, NamespaceEngine};

/// Re-exports the concrete backends.
pub use engines::lessc_engine::LesscEngine;
pub use engines::lightning_engine::LightningEngine;

/// Re-exports the post-compilation passes.
pub use sanitizers::root_selectors::{sanitize, sanitize_with};
pub use sanitizers::source_map::strip_source_map_refs;

pub use options::{IsolateOptions, OutputStyle};
pub use prefix::PrefixClass;
pub use scratch::ScratchArea;

/// Re-exports the one-call pipeline helpers.
pub use headless::{build_engine, headless_isolate_string, isolate_css};
