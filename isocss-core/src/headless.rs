// File: isocss-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for running the isolation pipeline in one call:
//! namespace, then optionally remove root selectors, then optionally strip
//! source-map references.

use std::path::Path;
use std::sync::Arc;

use crate::engine::{EngineKind, NamespaceEngine};
use crate::engines::lessc_engine::LesscEngine;
use crate::engines::lightning_engine::LightningEngine;
use crate::errors::IsolateError;
use crate::options::IsolateOptions;
use crate::prefix::PrefixClass;
use crate::scratch::ScratchArea;
use crate::sanitizers::root_selectors::sanitize_with;
use crate::sanitizers::source_map::strip_source_map_refs;

/// Instantiates the selected backend behind the `NamespaceEngine` trait.
///
/// `lessc` overrides the executable used by the `Lessc` backend; the
/// in-process backend ignores it and never touches `scratch`.
pub fn build_engine(
    kind: EngineKind,
    options: &IsolateOptions,
    lessc: Option<&Path>,
    scratch: Arc<ScratchArea>,
) -> Box<dyn NamespaceEngine> {
    match kind {
        EngineKind::Lightning => Box::new(LightningEngine::with_style(options.output_style())),
        EngineKind::Lessc => match lessc {
            Some(program) => Box::new(LesscEngine::with_program(program, scratch)),
            None => Box::new(LesscEngine::new(scratch)),
        },
    }
}

/// Runs the full pipeline on one stylesheet with the given engine.
///
/// # Arguments
///
/// * `engine` - The namespacing backend.
/// * `source` - The raw stylesheet text.
/// * `prefix` - The class every rule is scoped under.
/// * `options` - Which optional passes to run and how to format the output.
pub fn isolate_css(
    engine: &dyn NamespaceEngine,
    source: &str,
    prefix: &PrefixClass,
    options: &IsolateOptions,
) -> Result<String, IsolateError> {
    let mut css = engine.namespace(source, prefix)?;

    if options.remove_root_from_selectors {
        css = sanitize_with(&css, options.output_style())?;
    }

    if options.remove_source_maps {
        css = strip_source_map_refs(&css);
    }

    Ok(css)
}

/// Isolates a stylesheet string with the default in-process engine.
pub fn headless_isolate_string(
    source: &str,
    prefix: &PrefixClass,
    options: &IsolateOptions,
) -> Result<String, IsolateError> {
    let engine = LightningEngine::with_style(options.output_style());
    isolate_css(&engine, source, prefix, options)
}
