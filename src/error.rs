//! Error types for change detection.

use std::process::ExitStatus;
use thiserror::Error;

/// Failures reported by the version-control and archive collaborators
#[derive(Debug, Error)]
pub enum VcsError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    CommandFailed {
        command: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Pipeline stage `{stage}` exited with {status}: {stderr}")]
    PipelineFailed {
        stage: String,
        status: ExitStatus,
        stderr: String,
    },

    #[error("Collaborator I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Top-level errors surfaced to the CLI
#[derive(Debug, Error)]
pub enum DetectError {
    #[error("No modules specified")]
    NoModules,

    #[error("Missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl DetectError {
    /// Usage errors abort before any detection or output happens.
    pub fn is_usage(&self) -> bool {
        matches!(self, DetectError::NoModules | DetectError::MissingArgument(_))
    }
}

impl From<config::ConfigError> for DetectError {
    fn from(err: config::ConfigError) -> Self {
        DetectError::ConfigError(err.to_string())
    }
}
