//! Content fingerprints for extracted trees using BLAKE3
//!
//! Fingerprint = hash over every regular file and symlink in sorted
//! relative-path order of (path_len || path || kind || body || body_len),
//! where the body is the file content or the link target. Length framing
//! keeps entry boundaries unambiguous, so renames, additions, deletions and
//! retargeted links all change the digest, not just edits to file bytes.

use crate::tree::walker::{EntryKind, FileEntry, Walker};
use blake3::Hasher;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;
use tracing::warn;

/// Read size for streaming file content into the hasher
const READ_CHUNK_SIZE: usize = 8192;

/// Digest of a tree's file set and contents
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Fingerprint {
    /// Nothing was hashed: the tree is missing, holds no files or links, or
    /// could not be extracted
    Empty,
    /// Hex-encoded BLAKE3 digest
    Digest(String),
}

impl Fingerprint {
    pub fn is_empty(&self) -> bool {
        matches!(self, Fingerprint::Empty)
    }

    /// Hex digest, or `""` for the empty sentinel.
    pub fn as_str(&self) -> &str {
        match self {
            Fingerprint::Empty => "",
            Fingerprint::Digest(hex) => hex,
        }
    }

    /// First eight hex characters, for log lines.
    pub fn short(&self) -> &str {
        let s = self.as_str();
        &s[..s.len().min(8)]
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fingerprint::Empty => f.write_str("<empty>"),
            Fingerprint::Digest(hex) => f.write_str(hex),
        }
    }
}

/// Compute the fingerprint of the tree rooted at `tree_root`.
///
/// A missing root returns [`Fingerprint::Empty`] without walking. Entries
/// that cannot be read are skipped with a warning and the remaining entries
/// still produce a digest; if nothing at all was hashed the result is `Empty`.
pub fn fingerprint(tree_root: &Path) -> Fingerprint {
    if !tree_root.exists() {
        return Fingerprint::Empty;
    }

    let mut hasher = Hasher::new();
    let mut hashed = 0usize;

    for entry in Walker::new(tree_root).files() {
        let hashed_entry = match entry.kind {
            EntryKind::File => hash_file(&mut hasher, &entry),
            EntryKind::Symlink => hash_symlink(&mut hasher, &entry),
        };
        match hashed_entry {
            Ok(()) => hashed += 1,
            Err(e) => {
                warn!(file = %entry.path.display(), error = %e, "Could not read file");
            }
        }
    }

    if hashed == 0 {
        return Fingerprint::Empty;
    }

    Fingerprint::Digest(hex::encode(hasher.finalize().as_bytes()))
}

/// Tag separating file bodies from link targets
fn kind_tag(kind: EntryKind) -> u8 {
    match kind {
        EntryKind::File => b'f',
        EntryKind::Symlink => b'l',
    }
}

fn hash_header(hasher: &mut Hasher, entry: &FileEntry) {
    let path_bytes = entry.relative.as_bytes();
    hasher.update(&(path_bytes.len() as u64).to_be_bytes());
    hasher.update(path_bytes);
    hasher.update(&[kind_tag(entry.kind)]);
}

/// Feed one file into `hasher`.
///
/// The file is opened before anything is written so an unreadable file
/// leaves the hasher untouched. A read error mid-stream still contributes
/// the bytes read so far.
fn hash_file(hasher: &mut Hasher, entry: &FileEntry) -> io::Result<()> {
    let mut file = File::open(&entry.path)?;
    hash_header(hasher, entry);

    let mut buf = [0u8; READ_CHUNK_SIZE];
    let mut total: u64 = 0;
    let result = loop {
        match file.read(&mut buf) {
            Ok(0) => break Ok(()),
            Ok(n) => {
                hasher.update(&buf[..n]);
                total += n as u64;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => break Err(e),
        }
    };

    hasher.update(&total.to_be_bytes());
    result
}

/// Feed one symlink into `hasher` by its target, without following it.
fn hash_symlink(hasher: &mut Hasher, entry: &FileEntry) -> io::Result<()> {
    let target = fs::read_link(&entry.path)?;
    let target = target.to_string_lossy();
    let target_bytes = target.as_bytes();

    hash_header(hasher, entry);
    hasher.update(target_bytes);
    hasher.update(&(target_bytes.len() as u64).to_be_bytes());
    Ok(())
}
