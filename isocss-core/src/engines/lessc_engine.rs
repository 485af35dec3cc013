// isocss-core/src/engines/lessc_engine.rs
//! A `NamespaceEngine` implementation that shells out to the LESS compiler.
//!
//! The source is copied into the run's scratch area next to a wrapper that
//! imports it as LESS inside `.prefix { ... }`; `lessc` then resolves the
//! nesting. Compiler diagnostics are turned into `IsolateError::Compile`.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use uuid::Uuid;

use crate::engine::NamespaceEngine;
use crate::errors::{IsolateError, SourceLocation};
use crate::prefix::PrefixClass;
use crate::scratch::ScratchArea;

/// Executable looked up on `PATH` when no explicit program is configured.
pub const DEFAULT_LESSC: &str = "lessc";

lazy_static! {
    static ref LESSC_LOCATION: Regex = Regex::new(r"on line (\d+), column (\d+)").unwrap();
}

#[derive(Debug, Clone)]
pub struct LesscEngine {
    program: PathBuf,
    scratch: Arc<ScratchArea>,
}

/// Removes the staged files of one compilation when dropped.
struct Staged(Vec<PathBuf>);

impl Drop for Staged {
    fn drop(&mut self) {
        for path in &self.0 {
            let _ = fs::remove_file(path);
        }
    }
}

impl LesscEngine {
    pub fn new(scratch: Arc<ScratchArea>) -> Self {
        Self::with_program(DEFAULT_LESSC, scratch)
    }

    pub fn with_program(program: impl Into<PathBuf>, scratch: Arc<ScratchArea>) -> Self {
        Self { program: program.into(), scratch }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Checks that the configured program can be started.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("--version")
            .output()
            .map(|out| out.status.success())
            .unwrap_or(false)
    }

    fn unavailable(&self, err: io::Error) -> IsolateError {
        IsolateError::BackendUnavailable(
            self.name().to_string(),
            format!("failed to run '{}': {}", self.program.display(), err),
        )
    }
}

/// Extracts the message and location from `lessc` error output.
fn parse_diagnostic(stderr: &str) -> (String, Option<SourceLocation>) {
    let message = stderr
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("lessc exited with an error")
        .to_string();
    let location = LESSC_LOCATION.captures(stderr).and_then(|caps| {
        Some(SourceLocation {
            line: caps.get(1)?.as_str().parse().ok()?,
            column: caps.get(2)?.as_str().parse().ok()?,
        })
    });
    (message, location)
}

impl NamespaceEngine for LesscEngine {
    fn name(&self) -> &'static str {
        "lessc"
    }

    fn namespace(&self, source: &str, prefix: &PrefixClass) -> Result<String, IsolateError> {
        let dir = self.scratch.path()?;
        let stem = Uuid::new_v4().simple().to_string();
        let css_path = dir.join(format!("{}.css", stem));
        let less_path = dir.join(format!("{}.less", stem));
        let _staged = Staged(vec![css_path.clone(), less_path.clone()]);

        fs::write(&css_path, source)?;
        fs::write(
            &less_path,
            format!("{} {{\n  @import (less) '{}.css';\n}}\n", prefix.selector(), stem),
        )?;

        debug!("Running {} on {}", self.program.display(), less_path.display());
        let output = Command::new(&self.program)
            .arg("--no-color")
            .arg(&less_path)
            .current_dir(dir)
            .output()
            .map_err(|e| self.unavailable(e))?;

        if !output.status.success() {
            let (message, location) = parse_diagnostic(&String::from_utf8_lossy(&output.stderr));
            return Err(IsolateError::Compile { message, location });
        }

        String::from_utf8(output.stdout)
            .map_err(|e| IsolateError::Render(format!("lessc produced invalid UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lessc_diagnostics() {
        let stderr = "ParseError: Unrecognised input in /tmp/isocss-x/abc.css on line 3, column 1:\n2 .card {\n3 \n";
        let (message, location) = parse_diagnostic(stderr);
        assert!(message.starts_with("ParseError: Unrecognised input"));
        assert_eq!(location, Some(SourceLocation { line: 3, column: 1 }));
    }

    #[test]
    fn missing_program_is_reported_as_unavailable() {
        let engine = LesscEngine::with_program("isocss-no-such-lessc", Arc::new(ScratchArea::new()));
        assert!(!engine.is_available());
        let err = engine
            .namespace("h1 { color: red }", &PrefixClass::new("p").unwrap())
            .unwrap_err();
        assert!(matches!(err, IsolateError::BackendUnavailable(..)));
    }

    #[test]
    fn compiles_with_lessc_when_installed() {
        let engine = LesscEngine::new(Arc::new(ScratchArea::new()));
        if !engine.is_available() {
            eprintln!("lessc not installed, skipping");
            return;
        }
        let out = engine
            .namespace("h1 { color: red; }", &PrefixClass::new("p").unwrap())
            .unwrap();
        assert!(out.contains(".p h1"), "{out}");

        let err = engine
            .namespace("h1 { color: red;", &PrefixClass::new("p").unwrap())
            .unwrap_err();
        assert!(err.is_compile_error());
    }
}
