//! errors.rs - Custom error types for the isocss-core library.
//!
//! This module defines a structured error enum for the library, providing
//! specific, actionable error types that can be handled programmatically.
//!
//! License: MIT OR APACHE 2.0

use lightningcss::error::ErrorLocation;
use std::fmt;
use thiserror::Error;

/// A 1-based position inside a stylesheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    /// Converts a lightningcss location (0-based line, 1-based column).
    pub(crate) fn from_lightning(loc: &ErrorLocation) -> Self {
        Self { line: loc.line + 1, column: loc.column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// This enum represents all possible error types in the `isocss-core` library.
///
/// By using `#[non_exhaustive]`, we signal to consumers of this library that
/// new variants may be added in future versions.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum IsolateError {
    /// The input stylesheet was rejected by the namespacing compiler.
    #[error("Failed to compile stylesheet{}: {message}", at(.location))]
    Compile {
        message: String,
        location: Option<SourceLocation>,
    },

    /// The sanitizer could not parse the compiled stylesheet.
    #[error("Failed to parse compiled stylesheet{}: {message}", at(.location))]
    Parse {
        message: String,
        location: Option<SourceLocation>,
    },

    #[error("Invalid prefix class '{0}': {1}")]
    InvalidPrefixClass(String, String),

    #[error("Compiler backend '{0}' is unavailable: {1}")]
    BackendUnavailable(String, String),

    #[error("Failed to render stylesheet: {0}")]
    Render(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("An unexpected I/O error occurred: {0}")]
    IoError(#[from] std::io::Error),

    /// Any other error, tagged with the file it was raised for.
    #[error("{path}: {source}")]
    InFile {
        path: String,
        #[source]
        source: Box<IsolateError>,
    },
}

fn at(location: &Option<SourceLocation>) -> String {
    match location {
        Some(loc) => format!(" at {}", loc),
        None => String::new(),
    }
}

impl IsolateError {
    /// Attaches the offending file to this error. Already-tagged errors are
    /// returned unchanged.
    pub fn in_file(self, path: impl Into<String>) -> Self {
        match self {
            tagged @ IsolateError::InFile { .. } => tagged,
            other => IsolateError::InFile {
                path: path.into(),
                source: Box::new(other),
            },
        }
    }

    /// Returns the untagged error, looking through `InFile`.
    pub fn root(&self) -> &IsolateError {
        match self {
            IsolateError::InFile { source, .. } => source.root(),
            other => other,
        }
    }

    /// The position reported by the compiler or parser, if any.
    pub fn location(&self) -> Option<SourceLocation> {
        match self.root() {
            IsolateError::Compile { location, .. } | IsolateError::Parse { location, .. } => *location,
            _ => None,
        }
    }

    pub fn is_compile_error(&self) -> bool {
        matches!(self.root(), IsolateError::Compile { .. })
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self.root(), IsolateError::Parse { .. })
    }
}
