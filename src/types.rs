//! Core identifiers shared across the detection pipeline.

use std::fmt;

/// Revision identifier for a point in version history.
///
/// Opaque to this crate: it is handed to the version-control collaborator
/// verbatim. May be empty when the invoking environment is misconfigured.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitRef(String);

impl CommitRef {
    pub fn new(rev: impl Into<String>) -> Self {
        Self(rev.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True for the all-zero revision used to mean "no parent commit".
    pub fn is_null_sentinel(&self) -> bool {
        !self.0.is_empty() && self.0.chars().all(|c| c == '0')
    }
}

impl fmt::Display for CommitRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The two revisions being compared in one detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPair {
    pub base: Option<CommitRef>,
    pub head: CommitRef,
}

impl CommitPair {
    /// Head as an extractable revision; `None` when it is empty.
    pub fn head_ref(&self) -> Option<&CommitRef> {
        Some(&self.head).filter(|c| !c.is_empty())
    }
}

/// A named subdirectory of the repository tracked for change detection.
///
/// Identity is the path string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Module(String);

impl Module {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &str {
        &self.0
    }

    /// Output key for this module's verdict.
    ///
    /// Underscores and path separators become hyphens, then `-changed` is
    /// appended: `shared/lib_core` maps to `shared-lib-core-changed`.
    pub fn output_key(&self) -> String {
        let normalized: String = self
            .0
            .chars()
            .map(|c| match c {
                '_' | '/' | '\\' => '-',
                other => other,
            })
            .collect();
        format!("{}-changed", normalized)
    }
}

impl fmt::Display for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a whitespace-separated module list as passed by a CI step.
///
/// The whole list may be wrapped in single or double quotes. Empty entries
/// are dropped and duplicates keep their first position.
pub fn parse_module_list(raw: &str) -> Vec<Module> {
    let unquoted = raw.trim().trim_matches('"').trim_matches('\'');

    let mut modules: Vec<Module> = Vec::new();
    for name in unquoted.split_whitespace() {
        if !modules.iter().any(|m| m.path() == name) {
            modules.push(Module::new(name));
        }
    }
    modules
}
