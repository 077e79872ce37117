//! Extraction workspace.
//!
//! One scratch directory per detection run holding a `base/` and a `head/`
//! half. Each module gets its own numbered slot in both halves. The whole
//! directory is removed when the workspace is dropped, on every exit path.

use std::path::{Path, PathBuf};
use tempfile::TempDir;

const BASE_DIR: &str = "base";
const HEAD_DIR: &str = "head";

/// Which side of the comparison a directory belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Base,
    Head,
}

/// Scoped scratch area owned by exactly one detection run
#[derive(Debug)]
pub struct ExtractionWorkspace {
    root: TempDir,
}

impl ExtractionWorkspace {
    /// Create a fresh workspace under `parent`, or the system temp dir.
    pub fn create(parent: Option<&Path>) -> std::io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("detect-changes-");
        let root = match parent {
            Some(parent) => {
                std::fs::create_dir_all(parent)?;
                builder.tempdir_in(parent)?
            }
            None => builder.tempdir()?,
        };

        std::fs::create_dir(root.path().join(BASE_DIR))?;
        std::fs::create_dir(root.path().join(HEAD_DIR))?;

        Ok(Self { root })
    }

    pub fn path(&self) -> &Path {
        self.root.path()
    }

    /// Destination for the module at `index` on one side.
    ///
    /// Not created here; the extractor creates it.
    pub fn module_dir(&self, side: Side, index: usize) -> PathBuf {
        let half = match side {
            Side::Base => BASE_DIR,
            Side::Head => HEAD_DIR,
        };
        self.root.path().join(half).join(index.to_string())
    }

    /// Remove the workspace now, reporting any failure.
    pub fn close(self) -> std::io::Result<()> {
        self.root.close()
    }
}
