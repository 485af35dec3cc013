//! scratch.rs - Run-scoped working directory for compiler backends.
//!
//! Backends that need input on disk share one `ScratchArea` per run. The
//! directory is only created on first use and is removed when the area is
//! dropped, whether or not the files processed in it succeeded.
//!
//! License: MIT OR APACHE 2.0

use log::debug;
use once_cell::sync::OnceCell;
use std::io;
use std::path::Path;
use tempfile::TempDir;

const SCRATCH_PREFIX: &str = "isocss-";

#[derive(Debug, Default)]
pub struct ScratchArea {
    dir: OnceCell<TempDir>,
}

impl ScratchArea {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the scratch directory, creating it on first call.
    pub fn path(&self) -> io::Result<&Path> {
        let dir = self.dir.get_or_try_init(|| {
            let dir = tempfile::Builder::new().prefix(SCRATCH_PREFIX).tempdir()?;
            debug!("Created scratch area at {}", dir.path().display());
            Ok::<_, io::Error>(dir)
        })?;
        Ok(dir.path())
    }

    pub fn is_initialized(&self) -> bool {
        self.dir.get().is_some()
    }
}
