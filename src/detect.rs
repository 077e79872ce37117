//! Change detection orchestration.
//!
//! For every module, extract the base and head trees into a per-run
//! workspace, fingerprint them, and compare. Modules are processed in the
//! order given and the report preserves that order.

use crate::error::DetectError;
use crate::extract::TreeExtractor;
use crate::tree::{fingerprint, Fingerprint};
use crate::types::{CommitPair, Module};
use crate::vcs::VersionControl;
use crate::workspace::{ExtractionWorkspace, Side};
use serde_json::{Map, Value};
use std::path::PathBuf;
use tracing::{info, warn};

/// Why a module received its verdict
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerdictBasis {
    /// Head extraction failed; reported as unchanged
    MissingAtHead,
    /// Both sides were fingerprinted and compared
    Compared { base: Fingerprint, head: Fingerprint },
}

/// Detection outcome for one module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleVerdict {
    pub module: Module,
    pub changed: bool,
    pub basis: VerdictBasis,
}

/// Ordered verdicts for every requested module
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeReport {
    verdicts: Vec<ModuleVerdict>,
}

impl ChangeReport {
    pub fn verdicts(&self) -> &[ModuleVerdict] {
        &self.verdicts
    }

    pub fn len(&self) -> usize {
        self.verdicts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verdicts.is_empty()
    }

    /// Verdict for a module by name.
    pub fn changed(&self, module: &str) -> Option<bool> {
        self.verdicts
            .iter()
            .find(|v| v.module.path() == module)
            .map(|v| v.changed)
    }

    pub fn any_changed(&self) -> bool {
        self.verdicts.iter().any(|v| v.changed)
    }

    /// Aggregate `{ "<module>": <changed>, ... }` in request order.
    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .verdicts
            .iter()
            .map(|v| (v.module.path().to_string(), Value::Bool(v.changed)))
            .collect();
        Value::Object(map)
    }
}

/// Runs detection for a list of modules against one version-control source
pub struct ChangeDetector<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    scratch_dir: Option<PathBuf>,
}

impl<'a, V: VersionControl + ?Sized> ChangeDetector<'a, V> {
    pub fn new(vcs: &'a V) -> Self {
        Self {
            vcs,
            scratch_dir: None,
        }
    }

    /// Create extraction workspaces under `dir` instead of the system temp dir.
    pub fn with_scratch_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.scratch_dir = dir;
        self
    }

    /// Detect changes for `modules` between the commits in `commits`.
    ///
    /// Only failing to create the extraction workspace is an error; every
    /// per-module failure degrades to a verdict. The workspace is removed
    /// before returning.
    pub fn detect(
        &self,
        commits: &CommitPair,
        modules: &[Module],
    ) -> Result<ChangeReport, DetectError> {
        info!(
            base = %commits.base.as_ref().map(|c| c.as_str()).unwrap_or("<none>"),
            head = %commits.head,
            "Resolved commits"
        );

        let workspace = ExtractionWorkspace::create(self.scratch_dir.as_deref())?;
        let extractor = TreeExtractor::new(self.vcs);

        let verdicts = modules
            .iter()
            .enumerate()
            .map(|(index, module)| self.detect_module(&extractor, &workspace, commits, index, module))
            .collect();

        if let Err(e) = workspace.close() {
            warn!(error = %e, "Could not remove extraction workspace");
        }

        Ok(ChangeReport { verdicts })
    }

    fn detect_module(
        &self,
        extractor: &TreeExtractor<'_, V>,
        workspace: &ExtractionWorkspace,
        commits: &CommitPair,
        index: usize,
        module: &Module,
    ) -> ModuleVerdict {
        let base_dir = workspace.module_dir(Side::Base, index);
        let head_dir = workspace.module_dir(Side::Head, index);

        let base_extracted = extractor.extract(commits.base.as_ref(), module, &base_dir);
        let head_extracted = extractor.extract(commits.head_ref(), module, &head_dir);

        if !head_extracted {
            info!(%module, "Module not found in head, marking as unchanged");
            return ModuleVerdict {
                module: module.clone(),
                changed: false,
                basis: VerdictBasis::MissingAtHead,
            };
        }

        let base = if base_extracted {
            fingerprint(&base_dir)
        } else {
            Fingerprint::Empty
        };
        let head = fingerprint(&head_dir);
        let changed = base != head;

        info!(
            %module,
            base_hash = base.short(),
            head_hash = head.short(),
            changed,
            "Compared module"
        );

        ModuleVerdict {
            module: module.clone(),
            changed,
            basis: VerdictBasis::Compared { base, head },
        }
    }
}
