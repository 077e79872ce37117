//! CLI parse: clap types and argument resolution. No detection behavior.

use crate::error::DetectError;
use crate::types::{parse_module_list, Module};
use clap::Parser;
use std::path::PathBuf;

/// Detect which mono-repository modules changed between two commits
#[derive(Parser, Debug)]
#[command(name = "detect-changes")]
#[command(about = "Detect which mono-repository modules changed between two commits")]
pub struct Cli {
    /// Positional form: <MODULES> <SEMANTIC_VERSION>
    #[arg(value_name = "ARGS", num_args = 0..=2)]
    pub args: Vec<String>,

    /// Space-separated list of modules to check (e.g. "service-a service-b")
    #[arg(long)]
    pub modules: Option<String>,

    /// Semantic version from a previous step, echoed to the outputs
    #[arg(long)]
    pub semantic_version: Option<String>,

    /// Repository the modules live in
    #[arg(long, default_value = ".")]
    pub repository: PathBuf,

    /// Configuration file path (overrides .detect-changes.toml lookup)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long)]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long)]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

/// Validated request derived from [`Cli`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub modules: Vec<Module>,
    pub semantic_version: String,
}

impl Cli {
    /// Resolve flags and positionals into an [`Invocation`].
    ///
    /// Flags win; positionals fill whatever the flags left unset, modules
    /// first. An empty module list is a usage error.
    pub fn invocation(&self) -> Result<Invocation, DetectError> {
        let mut positionals = self.args.iter();

        let modules_raw = match &self.modules {
            Some(raw) => Some(raw.as_str()),
            None => positionals.next().map(String::as_str),
        };
        let semantic_version = match &self.semantic_version {
            Some(version) => Some(version.clone()),
            None => positionals.next().cloned(),
        };

        let modules = parse_module_list(modules_raw.unwrap_or_default());
        if modules.is_empty() {
            return Err(DetectError::NoModules);
        }

        let semantic_version =
            semantic_version.ok_or(DetectError::MissingArgument("semantic-version"))?;

        Ok(Invocation {
            modules,
            semantic_version,
        })
    }
}
