// isocss/src/utils/discovery.rs
//! Finding the stylesheets to process.

use log::{debug, warn};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::paths::ISOLATED_MARKER;

/// Decides which files are eligible for isolation.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    ignore: Option<Regex>,
}

/// Why a file with a matching extension was not selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    WrongExtension,
    Ignored,
    IsolatedOutput,
}

impl FileFilter {
    pub fn new(extensions: Vec<String>, ignore: Option<Regex>) -> Self {
        Self { extensions, ignore }
    }

    /// The longest configured extension `path` ends with.
    pub fn extension_of(&self, path: &Path) -> Option<&str> {
        let name = path.file_name()?.to_str()?;
        self.extensions
            .iter()
            .filter(|ext| name.len() > ext.len() && name.ends_with(ext.as_str()))
            .max_by_key(|ext| ext.len())
            .map(String::as_str)
    }

    /// Checks a file given relative to the working directory.
    pub fn check(&self, relative: &Path) -> Result<&str, Rejection> {
        let ext = self.extension_of(relative).ok_or(Rejection::WrongExtension)?;
        if let Some(ignore) = &self.ignore {
            if ignore.is_match(&relative.to_string_lossy()) {
                return Err(Rejection::Ignored);
            }
        }
        let name = relative.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        if name.ends_with(&format!("{}{}", ISOLATED_MARKER, ext)) {
            return Err(Rejection::IsolatedOutput);
        }
        Ok(ext)
    }
}

/// A file selected for processing, relative to the working directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Candidate {
    pub relative: PathBuf,
    pub extension: String,
}

#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<Candidate>,
    /// Files with a matching extension that were ignored or are isolated outputs.
    pub skipped: usize,
}

/// Expands the (working-directory-relative) inputs into the set of files to process.
///
/// Directories are walked recursively; a file reached twice is listed once.
pub fn discover(cwd: &Path, inputs: &[PathBuf], filter: &FileFilter) -> Discovery {
    let mut seen = BTreeSet::new();
    let mut discovery = Discovery::default();

    for input in inputs {
        let root = cwd.join(input);
        for entry in WalkDir::new(&root).follow_links(false).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Ok(relative) = entry.path().strip_prefix(cwd) else {
                continue;
            };
            if !seen.insert(relative.to_path_buf()) {
                continue;
            }
            match filter.check(relative) {
                Ok(ext) => discovery.files.push(Candidate {
                    relative: relative.to_path_buf(),
                    extension: ext.to_string(),
                }),
                Err(Rejection::WrongExtension) => {}
                Err(reason) => {
                    debug!("Skipping {} ({:?})", relative.display(), reason);
                    discovery.skipped += 1;
                }
            }
        }
    }
    discovery
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn css_filter(ignore: Option<&str>) -> FileFilter {
        FileFilter::new(vec![".css".to_string()], ignore.map(|p| Regex::new(p).unwrap()))
    }

    #[test]
    fn check_applies_extension_ignore_and_output_rules() {
        let filter = css_filter(Some("vendor/"));
        assert_eq!(filter.check(Path::new("src/a.css")), Ok(".css"));
        assert_eq!(filter.check(Path::new("src/a.scss")), Err(Rejection::WrongExtension));
        assert_eq!(filter.check(Path::new("vendor/b.css")), Err(Rejection::Ignored));
        assert_eq!(filter.check(Path::new("src/a.iso.css")), Err(Rejection::IsolatedOutput));
        assert_eq!(filter.check(Path::new(".css")), Err(Rejection::WrongExtension));
    }

    #[test]
    fn longest_extension_wins() {
        let filter = FileFilter::new(vec![".css".into(), ".module.css".into()], None);
        assert_eq!(filter.extension_of(Path::new("x.module.css")), Some(".module.css"));
        assert_eq!(filter.extension_of(Path::new("x.css")), Some(".css"));
    }

    #[test]
    fn walks_directories_once_per_file() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("src/nested")).unwrap();
        fs::write(root.join("src/a.css"), "a{}").unwrap();
        fs::write(root.join("src/nested/b.css"), "b{}").unwrap();
        fs::write(root.join("src/nested/b.iso.css"), "b{}").unwrap();
        fs::write(root.join("src/readme.md"), "#").unwrap();

        let inputs = vec![PathBuf::from("src"), PathBuf::from("src/a.css")];
        let found = discover(root, &inputs, &css_filter(None));
        let files: Vec<_> = found.files.iter().map(|c| c.relative.clone()).collect();
        assert_eq!(files, vec![PathBuf::from("src/a.css"), PathBuf::from("src/nested/b.css")]);
        assert_eq!(found.skipped, 1);
    }
}
