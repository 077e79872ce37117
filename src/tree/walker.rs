//! Filesystem walker for enumerating the entries of an extracted tree

use std::path::{Component, Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// What a walked entry is on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    /// Symbolic link, recorded by its target and never followed
    Symlink,
}

/// A file or symlink found under a walk root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Path relative to the walk root, `/`-separated
    pub relative: String,
    /// Absolute path used for reading
    pub path: PathBuf,
    pub kind: EntryKind,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Collect every regular file and symlink under the root.
    ///
    /// Links are reported as entries of their own and never traversed, so a
    /// link to a directory contributes one entry and nothing outside the
    /// root is visited. Returns entries sorted lexicographically by relative
    /// path, independent of the order the filesystem reports directory
    /// entries. Entries that cannot be read are skipped with a warning.
    pub fn files(&self) -> Vec<FileEntry> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "Skipping unreadable entry");
                    continue;
                }
            };

            let file_type = entry.file_type();
            let kind = if file_type.is_symlink() {
                EntryKind::Symlink
            } else if file_type.is_file() {
                EntryKind::File
            } else {
                continue;
            };

            let path = entry.path().to_path_buf();
            let Some(relative) = relative_key(&self.root, &path) else {
                continue;
            };
            entries.push(FileEntry {
                relative,
                path,
                kind,
            });
        }

        entries.sort_by(|a, b| a.relative.cmp(&b.relative));
        entries
    }
}

/// `/`-joined path of `path` below `root`, so the key is platform neutral.
fn relative_key(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name.to_string_lossy()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}
