// isocss-core/src/engine.rs
//! Defines the core NamespaceEngine trait.
//!
//! The `NamespaceEngine` trait provides a pluggable interface for the
//! compiler backend that wraps a stylesheet in `.prefix { ... }` and resolves
//! the nesting into flat selectors. The in-process lightningcss backend and
//! the external `lessc` backend both implement it, so the rest of the
//! pipeline never depends on which one is in use.
//!
//! License: MIT OR APACHE 2.0

use serde::{Deserialize, Serialize};

use crate::errors::IsolateError;
use crate::prefix::PrefixClass;

/// A trait that defines the namespacing step of the isolation pipeline.
pub trait NamespaceEngine: Send + Sync {
    /// A short, stable identifier used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Wraps `source` in a rule keyed by `prefix` and compiles it into flat CSS.
    ///
    /// Every top-level style rule of the result starts with the prefix class
    /// selector. Malformed input is reported as `IsolateError::Compile`, never
    /// as empty or partial output.
    ///
    /// # Arguments
    /// * `source` - The raw stylesheet text.
    /// * `prefix` - The class every rule is scoped under.
    fn namespace(&self, source: &str, prefix: &PrefixClass) -> Result<String, IsolateError>;
}

/// Selects a namespacing backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// In-process lightningcss compiler.
    #[default]
    Lightning,
    /// External `lessc` executable.
    Lessc,
}

impl EngineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EngineKind::Lightning => "lightning",
            EngineKind::Lessc => "lessc",
        }
    }
}
