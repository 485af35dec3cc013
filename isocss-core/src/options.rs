//! Toggles that alter how a stylesheet is isolated.
//!
//! License: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

/// The option set handed to the isolation pipeline. Every toggle is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct IsolateOptions {
    /// Strip `html`, `body` and `:root` segments from the compiled selectors.
    pub remove_root_from_selectors: bool,
    /// Remove `sourceMappingURL` comment references from the output.
    pub remove_source_maps: bool,
    /// Emit indented CSS instead of minified CSS.
    pub pretty: bool,
}

impl IsolateOptions {
    pub fn output_style(&self) -> OutputStyle {
        if self.pretty {
            OutputStyle::Pretty
        } else {
            OutputStyle::Minified
        }
    }
}

/// How rendered CSS is formatted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputStyle {
    #[default]
    Minified,
    Pretty,
}

impl OutputStyle {
    pub fn is_minified(self) -> bool {
        matches!(self, OutputStyle::Minified)
    }
}
