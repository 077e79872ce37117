//! Version-control collaborator.
//!
//! [`VersionControl`] is the boundary between detection and the repository.
//! [`GitCli`] implements it by shelling out to `git`, piping `git archive`
//! into `tar` for subtree export.

use crate::config::VcsConfig;
use crate::error::VcsError;
use crate::pipeline::run_pipeline;
use crate::types::CommitRef;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Read-only access to historical repository state.
pub trait VersionControl {
    /// Resolve the immediate parent of `commit`.
    fn parent_of(&self, commit: &CommitRef) -> Result<CommitRef, VcsError>;

    /// Whether `path` exists in the tree of `commit`.
    fn path_exists(&self, commit: &CommitRef, path: &str) -> Result<bool, VcsError>;

    /// Materialize `path` as it exists at `commit` under `destination`.
    ///
    /// Entries keep their repository-relative paths, so the module's files
    /// land in `destination/<path>/...`. Must not touch the working tree.
    fn export_subtree(
        &self,
        commit: &CommitRef,
        path: &str,
        destination: &Path,
    ) -> Result<(), VcsError>;
}

/// `git` CLI backed implementation
#[derive(Debug, Clone)]
pub struct GitCli {
    repository: PathBuf,
    git_program: String,
    tar_program: String,
}

impl GitCli {
    pub fn new(repository: impl Into<PathBuf>) -> Self {
        Self::with_config(repository, &VcsConfig::default())
    }

    pub fn with_config(repository: impl Into<PathBuf>, config: &VcsConfig) -> Self {
        Self {
            repository: repository.into(),
            git_program: config.git_program.clone(),
            tar_program: config.tar_program.clone(),
        }
    }

    fn git(&self) -> Command {
        let mut cmd = Command::new(&self.git_program);
        cmd.arg("-C").arg(&self.repository);
        cmd
    }

    /// Run a git subcommand to completion, returning stdout on success.
    fn run_git(&self, args: &[&str]) -> Result<String, VcsError> {
        let rendered = format!("{} {}", self.git_program, args.join(" "));
        debug!(command = %rendered, repository = %self.repository.display(), "Running git");

        let output = self
            .git()
            .args(args)
            .output()
            .map_err(|source| VcsError::Spawn {
                program: self.git_program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: rendered,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl VersionControl for GitCli {
    fn parent_of(&self, commit: &CommitRef) -> Result<CommitRef, VcsError> {
        let parent = format!("{}^", commit);
        let stdout = self.run_git(&["rev-parse", "--verify", &parent])?;
        Ok(CommitRef::new(stdout.trim()))
    }

    fn path_exists(&self, commit: &CommitRef, path: &str) -> Result<bool, VcsError> {
        match self.run_git(&["ls-tree", commit.as_str(), "--", path]) {
            Ok(listing) => Ok(!listing.trim().is_empty()),
            Err(VcsError::CommandFailed { stderr, .. }) => {
                debug!(%commit, path, %stderr, "git ls-tree failed");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    fn export_subtree(
        &self,
        commit: &CommitRef,
        path: &str,
        destination: &Path,
    ) -> Result<(), VcsError> {
        let mut archive = self.git();
        archive.args(["archive", "--format=tar", commit.as_str(), "--", path]);

        let mut untar = Command::new(&self.tar_program);
        untar.arg("-x").arg("-C").arg(destination);

        debug!(
            %commit,
            path,
            destination = %destination.display(),
            "Streaming git archive into tar"
        );

        let outcome = run_pipeline(archive, untar)?;
        match outcome.failed_stage() {
            None => Ok(()),
            Some(stage) => Err(VcsError::PipelineFailed {
                stage: stage.program.clone(),
                status: stage.status,
                stderr: stage.stderr.trim().to_string(),
            }),
        }
    }
}
