// isocss/src/utils/paths.rs
//! Path arithmetic for inputs and outputs.
//!
//! All paths handed to these helpers are relative to the working directory
//! (see [`relative_to`]); outputs are `<stem>.iso<ext>` next to the input, or
//! re-rooted under the output directory after dropping `up` leading components.

use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Marker inserted between a file's stem and its extension.
pub const ISOLATED_MARKER: &str = ".iso";

#[derive(Debug, Error, PartialEq)]
pub enum PathError {
    #[error("'{0}' is outside the current working directory")]
    OutsideWorkingDir(PathBuf),

    #[error("--up {up} is too high for '{path}' ({components} path component(s))")]
    UpTooHigh {
        up: usize,
        path: PathBuf,
        components: usize,
    },

    #[error("'{0}' has no file name")]
    NoFileName(PathBuf),
}

/// Returns `path` relative to `base`. Both must already be canonical.
pub fn relative_to(base: &Path, path: &Path) -> Result<PathBuf, PathError> {
    path.strip_prefix(base)
        .map(Path::to_path_buf)
        .map_err(|_| PathError::OutsideWorkingDir(path.to_path_buf()))
}

/// Number of normal components of a relative path.
pub fn component_count(path: &Path) -> usize {
    path.components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .count()
}

/// `dir/name.css` -> `dir/name.iso.css` for the extension `.css`.
pub fn isolated_sibling(path: &Path, extension: &str) -> Result<PathBuf, PathError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| PathError::NoFileName(path.to_path_buf()))?;
    let stem = name.strip_suffix(extension).unwrap_or(name);
    Ok(path.with_file_name(format!("{}{}{}", stem, ISOLATED_MARKER, extension)))
}

/// Computes where the isolated version of `relative_input` is written.
///
/// Without an output directory the result is still relative to the working
/// directory. With one, the first `up` components are removed and the rest
/// is joined onto `out_dir`.
pub fn output_path(
    relative_input: &Path,
    extension: &str,
    out_dir: Option<&Path>,
    up: usize,
) -> Result<PathBuf, PathError> {
    let sibling = isolated_sibling(relative_input, extension)?;
    let Some(out_dir) = out_dir else {
        return Ok(sibling);
    };

    let parts: Vec<_> = sibling
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    if up >= parts.len() {
        return Err(PathError::UpTooHigh {
            up,
            path: relative_input.to_path_buf(),
            components: parts.len(),
        });
    }

    let mut out = out_dir.to_path_buf();
    out.extend(&parts[up..]);
    Ok(out)
}
