//! Shared scratch directory handed to every child as `TMPDIR`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tempfile::{Builder, TempDir};

const PREFIX: &str = "runtests.";

/// Removed recursively when dropped, on every exit path, unless kept.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create() -> Result<Self> {
        let dir = Builder::new()
            .prefix(PREFIX)
            .tempdir()
            .context("failed to create temporary directory")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Disarm cleanup and hand back the path.
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }
}
