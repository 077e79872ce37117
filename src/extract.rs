//! Tree Extractor
//!
//! Materializes one module's files at one commit into an isolated directory.
//! Never fails loudly: every problem is logged and reported as `false`, and
//! callers treat a `false` destination as holding no usable content.

use crate::types::{CommitRef, Module};
use crate::vcs::VersionControl;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct TreeExtractor<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
}

impl<'a, V: VersionControl + ?Sized> TreeExtractor<'a, V> {
    pub fn new(vcs: &'a V) -> Self {
        Self { vcs }
    }

    /// Extract `module` at `commit` into `destination`.
    ///
    /// Returns `true` only when the module existed at `commit` and the
    /// export completed. With no commit nothing is attempted and the
    /// destination is left untouched.
    pub fn extract(&self, commit: Option<&CommitRef>, module: &Module, destination: &Path) -> bool {
        let Some(commit) = commit.filter(|c| !c.is_empty()) else {
            debug!(%module, "No commit to extract from");
            return false;
        };

        if let Err(e) = std::fs::create_dir_all(destination) {
            warn!(
                %module,
                %commit,
                destination = %destination.display(),
                error = %e,
                "Could not create extraction directory"
            );
            return false;
        }

        match self.vcs.path_exists(commit, module.path()) {
            Ok(true) => {}
            Ok(false) => {
                info!(%module, %commit, "Module not found in commit");
                return false;
            }
            Err(e) => {
                warn!(%module, %commit, error = %e, "Could not check module in commit");
                return false;
            }
        }

        match self.vcs.export_subtree(commit, module.path(), destination) {
            Ok(()) => {
                debug!(%module, %commit, destination = %destination.display(), "Extracted module");
                true
            }
            Err(e) => {
                warn!(%module, %commit, error = %e, "Error extracting module");
                false
            }
        }
    }
}
