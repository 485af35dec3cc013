//! prefix.rs - The prefix class every isolated stylesheet is scoped under.
//!
//! A `PrefixClass` is always a valid CSS class identifier, so it can be
//! pasted verbatim into a selector. It is either supplied by the caller or
//! derived deterministically from a project name.
//!
//! License: MIT OR APACHE 2.0

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::errors::IsolateError;

/// Number of hex characters of the project-name digest appended to derived classes.
pub const DERIVED_SALT_LENGTH: usize = 10;

lazy_static! {
    static ref CLASS_IDENT: Regex = Regex::new(r"^-?[_a-zA-Z][_a-zA-Z0-9-]*$").unwrap();
    static ref INVALID_IDENT_CHARS: Regex = Regex::new(r"[^_a-zA-Z0-9-]+").unwrap();
}

/// A validated CSS class name, without the leading dot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PrefixClass(String);

impl PrefixClass {
    /// Validates `value` as a class identifier. A single leading `.` is accepted
    /// and dropped.
    pub fn new(value: &str) -> Result<Self, IsolateError> {
        let trimmed = value.trim();
        let ident = trimmed.strip_prefix('.').unwrap_or(trimmed);

        if ident.is_empty() {
            return Err(IsolateError::InvalidPrefixClass(
                value.to_string(),
                "prefix class cannot be empty".to_string(),
            ));
        }
        if !CLASS_IDENT.is_match(ident) {
            return Err(IsolateError::InvalidPrefixClass(
                value.to_string(),
                "expected letters, digits, '-' or '_', not starting with a digit".to_string(),
            ));
        }
        Ok(Self(ident.to_string()))
    }

    /// Derives a prefix class from a project identifier as
    /// `<name>-<first 10 hex chars of sha256(name)>`.
    ///
    /// The digest is computed over the raw project name; only the readable
    /// part is normalised into a valid identifier.
    pub fn derive(project_name: &str) -> Result<Self, IsolateError> {
        let raw = project_name.trim();
        if raw.is_empty() {
            return Err(IsolateError::InvalidPrefixClass(
                project_name.to_string(),
                "cannot derive a prefix class from an empty project name".to_string(),
            ));
        }

        let digest = hex::encode(Sha256::digest(raw.as_bytes()));
        let mut readable = INVALID_IDENT_CHARS.replace_all(raw, "-").trim_matches('-').to_string();
        if readable.is_empty() || readable.starts_with(|c: char| c.is_ascii_digit()) {
            readable.insert(0, '_');
        }

        let class = format!("{}-{}", readable, &digest[..DERIVED_SALT_LENGTH]);
        debug!("Derived prefix class '{}' from project name '{}'", class, raw);
        Self::new(&class)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The class as a selector, e.g. `.app-ab12cd34ef`.
    pub fn selector(&self) -> String {
        format!(".{}", self.0)
    }
}

impl fmt::Display for PrefixClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PrefixClass {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_and_dotted_classes() {
        assert_eq!(PrefixClass::new("app-ab12cd34ef").unwrap().as_str(), "app-ab12cd34ef");
        assert_eq!(PrefixClass::new(".p").unwrap().as_str(), "p");
        assert_eq!(PrefixClass::new("_x").unwrap().selector(), "._x");
        assert_eq!(PrefixClass::new("-x1").unwrap().as_str(), "-x1");
    }

    #[test]
    fn rejects_selector_breaking_values() {
        for bad in ["", "  ", ".", "1abc", "a b", "a>b", "a.b", "a{", "--"] {
            let err = PrefixClass::new(bad).unwrap_err();
            assert!(matches!(err, IsolateError::InvalidPrefixClass(..)), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn derive_is_deterministic() {
        let a = PrefixClass::derive("my-app").unwrap();
        let b = PrefixClass::derive("my-app").unwrap();
        assert_eq!(a, b);
        assert!(a.as_str().starts_with("my-app-"));
        assert_eq!(a.as_str().len(), "my-app-".len() + DERIVED_SALT_LENGTH);
        assert_ne!(a, PrefixClass::derive("my-other-app").unwrap());
    }

    #[test]
    fn derive_normalises_scoped_package_names() {
        let class = PrefixClass::derive("@acme/widgets").unwrap();
        assert!(class.as_str().starts_with("acme-widgets-"));

        let numeric = PrefixClass::derive("42things").unwrap();
        assert!(numeric.as_str().starts_with("_42things-"));
    }
}
