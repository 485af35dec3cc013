// isocss/src/utils/project.rs
//! Reads the project identity used to derive a default prefix class.

use anyhow::{Context, Result, bail};
use isocss_core::PrefixClass;
use serde::Deserialize;
use std::fs;
use std::path::Path;

pub const PACKAGE_MANIFEST: &str = "package.json";

#[derive(Debug, Deserialize)]
struct PackageManifest {
    name: Option<String>,
}

/// Returns the `name` of `dir/package.json`, or `None` if there is no manifest.
pub fn read_project_name(dir: &Path) -> Result<Option<String>> {
    let path = dir.join(PACKAGE_MANIFEST);
    if !path.is_file() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: PackageManifest = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(manifest.name.filter(|n| !n.trim().is_empty()))
}

/// Derives the default prefix class from the project manifest in `dir`.
pub fn default_prefix_class(dir: &Path) -> Result<PrefixClass> {
    let Some(name) = read_project_name(dir)? else {
        bail!(
            "No --prefix-class given and no project name found in {}; pass --prefix-class or set prefix_class in .isocss.yml",
            dir.join(PACKAGE_MANIFEST).display()
        );
    };
    Ok(PrefixClass::derive(&name)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn derives_from_package_name() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join(PACKAGE_MANIFEST), r#"{ "name": "my-app", "version": "1.0.0" }"#)?;
        assert_eq!(read_project_name(dir.path())?.as_deref(), Some("my-app"));
        let prefix = default_prefix_class(dir.path())?;
        assert!(prefix.as_str().starts_with("my-app-"));
        assert_eq!(prefix.as_str().len(), "my-app-".len() + 10);
        Ok(())
    }

    #[test]
    fn missing_manifest_or_name_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        assert!(read_project_name(dir.path())?.is_none());
        assert!(default_prefix_class(dir.path()).is_err());

        fs::write(dir.path().join(PACKAGE_MANIFEST), r#"{ "version": "1.0.0" }"#)?;
        assert!(default_prefix_class(dir.path()).is_err());

        fs::write(dir.path().join(PACKAGE_MANIFEST), "not json")?;
        assert!(read_project_name(dir.path()).is_err());
        Ok(())
    }
}
