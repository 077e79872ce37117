//! CLI route: wires configuration, commit resolution, detection and output.

use crate::cli::parse::Invocation;
use crate::config::{ConfigLoader, DetectConfig};
use crate::detect::{ChangeDetector, ChangeReport};
use crate::error::DetectError;
use crate::report::{render_entries, render_summary, OutputSink};
use crate::resolve::{CommitResolver, EventContext};
use crate::vcs::GitCli;
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

/// Everything one detection run needs besides its arguments
pub struct RunContext {
    repository: PathBuf,
    config: DetectConfig,
}

impl RunContext {
    /// Load configuration for `repository`, honoring an explicit config file.
    pub fn new(repository: PathBuf, config_path: Option<PathBuf>) -> Result<Self, DetectError> {
        let config = ConfigLoader::load(&repository, config_path.as_deref())?;
        Ok(Self::with_config(repository, config))
    }

    pub fn with_config(repository: PathBuf, config: DetectConfig) -> Self {
        Self { repository, config }
    }

    /// Run detection and deliver results to `sink`, then print the summary.
    pub fn execute(
        &self,
        invocation: &Invocation,
        event: &EventContext,
        sink: &OutputSink,
        stdout: &mut dyn Write,
    ) -> Result<ChangeReport, DetectError> {
        let modules: Vec<&str> = invocation.modules.iter().map(|m| m.path()).collect();
        info!(modules = ?modules, "Checking modules");
        info!(semantic_version = %invocation.semantic_version, "Semantic version");

        let git = GitCli::with_config(&self.repository, &self.config.vcs);
        let commits = CommitResolver::new(&git).resolve(event);

        let report = ChangeDetector::new(&git)
            .with_scratch_dir(self.config.scratch_dir.clone())
            .detect(&commits, &invocation.modules)?;

        let entries = render_entries(&report, &invocation.semantic_version);
        sink.write(&entries, stdout)?;

        writeln!(stdout)?;
        write!(stdout, "{}", render_summary(&report))?;
        stdout.flush()?;

        Ok(report)
    }
}
