//! Configuration System
//!
//! Layered configuration built with the `config` crate. Sources, lowest to
//! highest precedence: built-in defaults, `<repository>/.detect-changes.toml`
//! (or an explicit `--config` file), then `DETECT_CHANGES_*` environment
//! variables with `__` separating nested keys.

use crate::error::DetectError;
use crate::logging::LoggingConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name looked up in the repository root when no explicit file is given
pub const REPOSITORY_CONFIG_FILE: &str = ".detect-changes.toml";

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectConfig {
    /// External programs used for extraction
    #[serde(default)]
    pub vcs: VcsConfig,

    /// Directory the extraction workspace is created in (system temp dir if unset)
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Version-control and archive collaborator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VcsConfig {
    #[serde(default = "default_git_program")]
    pub git_program: String,

    #[serde(default = "default_tar_program")]
    pub tar_program: String,
}

fn default_git_program() -> String {
    "git".to_string()
}

fn default_tar_program() -> String {
    "tar".to_string()
}

impl Default for VcsConfig {
    fn default() -> Self {
        Self {
            git_program: default_git_program(),
            tar_program: default_tar_program(),
        }
    }
}

impl DetectConfig {
    /// Reject settings that would make every extraction fail.
    pub fn validate(&self) -> Result<(), DetectError> {
        if self.vcs.git_program.trim().is_empty() {
            return Err(DetectError::ConfigError(
                "vcs.git_program cannot be empty".to_string(),
            ));
        }
        if self.vcs.tar_program.trim().is_empty() {
            return Err(DetectError::ConfigError(
                "vcs.tar_program cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Loads [`DetectConfig`] from files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a repository.
    ///
    /// An explicit file must exist; the repository file is optional.
    pub fn load(repository: &Path, explicit: Option<&Path>) -> Result<DetectConfig, DetectError> {
        let mut builder = Config::builder();

        builder = match explicit {
            Some(path) => add_file(builder, path, true),
            None => {
                let repo_file = repository.join(REPOSITORY_CONFIG_FILE);
                if repo_file.exists() {
                    add_file(builder, &repo_file, false)
                } else {
                    builder
                }
            }
        };

        builder = builder.add_source(
            Environment::with_prefix("DETECT_CHANGES")
                .prefix_separator("_")
                .separator("__"),
        );

        let config: DetectConfig = build(builder)?;
        config.validate()?;
        Ok(config)
    }
}

fn add_file(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).required(required))
}

fn build(builder: ConfigBuilder<DefaultState>) -> Result<DetectConfig, ConfigError> {
    builder.build()?.try_deserialize()
}
