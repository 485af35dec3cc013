//! Configuration management for `isocss-core`.
//!
//! This module defines the project-level configuration file (`.isocss.yml`)
//! and handles loading and validating it. Every field is optional; the
//! command-line driver layers its flags on top.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::engine::EngineKind;
use crate::errors::IsolateError;
use crate::options::IsolateOptions;
use crate::prefix::PrefixClass;

/// File names probed by [`IsolateConfig::discover`], in order.
pub const CONFIG_FILE_NAMES: [&str; 2] = [".isocss.yml", ".isocss.yaml"];

/// Extensions processed when neither the file nor the command line names any.
pub const DEFAULT_EXTENSIONS: [&str; 1] = [".css"];

/// Represents the top-level configuration structure for isocss.
#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct IsolateConfig {
    /// Class every stylesheet is scoped under.
    pub prefix_class: Option<String>,
    /// Extensions (with leading dot) of the files to process.
    pub extensions: Option<Vec<String>>,
    /// Regular expression of paths to skip.
    pub ignore: Option<String>,
    /// Directory where processed files are written.
    pub out_dir: Option<PathBuf>,
    /// Number of leading path components removed from output paths.
    pub up: Option<usize>,
    /// Namespacing backend.
    pub engine: Option<EngineKind>,
    /// Path of the `lessc` executable for the `lessc` engine.
    pub lessc: Option<PathBuf>,
    pub options: IsolateOptions,
}

impl IsolateConfig {
    /// Loads a configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Failed to load config file {}", path.display()))?;
        Ok(config)
    }

    /// Parses and validates a configuration from YAML text. Empty text is the default configuration.
    pub fn from_yaml(text: &str) -> Result<Self, IsolateError> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: IsolateConfig =
            serde_yml::from_str(text).map_err(|e| IsolateError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Looks for a configuration file in `dir`. Returns `Ok(None)` when there is none.
    pub fn discover<P: AsRef<Path>>(dir: P) -> Result<Option<(PathBuf, Self)>> {
        for name in CONFIG_FILE_NAMES {
            let candidate = dir.as_ref().join(name);
            if candidate.is_file() {
                let config = Self::load_from_file(&candidate)?;
                return Ok(Some((candidate, config)));
            }
        }
        debug!("No configuration file found in {}", dir.as_ref().display());
        Ok(None)
    }

    /// Checks field values that serde cannot.
    pub fn validate(&self) -> Result<(), IsolateError> {
        if let Some(prefix) = &self.prefix_class {
            PrefixClass::new(prefix)?;
        }
        if let Some(pattern) = &self.ignore {
            Regex::new(pattern)
                .map_err(|e| IsolateError::Config(format!("invalid 'ignore' pattern: {}", e)))?;
        }
        if let Some(extensions) = &self.extensions {
            if extensions.is_empty() {
                return Err(IsolateError::Config("'extensions' cannot be an empty list".to_string()));
            }
            if let Some(bad) = extensions.iter().find(|ext| !ext.starts_with('.') || ext.len() < 2) {
                return Err(IsolateError::Config(format!(
                    "extension '{}' must start with '.', e.g. '.css'",
                    bad
                )));
            }
        }
        Ok(())
    }

    /// Extensions to process, falling back to [`DEFAULT_EXTENSIONS`].
    pub fn extensions_or_default(&self) -> Vec<String> {
        self.extensions
            .clone()
            .unwrap_or_else(|| DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_is_default() {
        assert_eq!(IsolateConfig::from_yaml("").unwrap(), IsolateConfig::default());
        assert_eq!(IsolateConfig::default().extensions_or_default(), vec![".css".to_string()]);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(matches!(
            IsolateConfig::from_yaml("prefix_class: \"1bad\"").unwrap_err(),
            IsolateError::InvalidPrefixClass(..)
        ));
        assert!(matches!(
            IsolateConfig::from_yaml("ignore: \"(unclosed\"").unwrap_err(),
            IsolateError::Config(_)
        ));
        assert!(matches!(
            IsolateConfig::from_yaml("extensions: [css]").unwrap_err(),
            IsolateError::Config(_)
        ));
        assert!(matches!(
            IsolateConfig::from_yaml("no_such_field: 1").unwrap_err(),
            IsolateError::Config(_)
        ));
    }
}
