//! CI output channel.
//!
//! Renders a [`ChangeReport`] as named results: one `<key>-changed` boolean
//! per module, a `changes` JSON object, and the pass-through
//! `semantic-version`. Delivered either by appending `name=value` lines to the
//! file named by `GITHUB_OUTPUT` or, when that is unset, as legacy
//! `::set-output` lines on stdout. Both carry the same entries.

use crate::detect::ChangeReport;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing::debug;

/// Name of the aggregate JSON result
pub const CHANGES_KEY: &str = "changes";
/// Name of the pass-through version result
pub const SEMANTIC_VERSION_KEY: &str = "semantic-version";

/// One named result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputEntry {
    pub name: String,
    pub value: String,
}

impl OutputEntry {
    fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Where results are delivered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputSink {
    /// Append-only structured output file
    File(PathBuf),
    /// `::set-output name=<name>::<value>` lines on stdout
    Legacy,
}

impl OutputSink {
    /// File sink when `GITHUB_OUTPUT` names a file, legacy otherwise.
    pub fn from_env() -> Self {
        match std::env::var_os("GITHUB_OUTPUT") {
            Some(path) if !path.is_empty() => OutputSink::File(PathBuf::from(path)),
            _ => OutputSink::Legacy,
        }
    }

    /// Deliver `entries`; legacy lines go to `stdout`.
    pub fn write(&self, entries: &[OutputEntry], stdout: &mut dyn Write) -> io::Result<()> {
        match self {
            OutputSink::File(path) => {
                debug!(path = %path.display(), count = entries.len(), "Appending outputs");
                let mut file = OpenOptions::new().create(true).append(true).open(path)?;
                let mut buf = String::new();
                for entry in entries {
                    buf.push_str(&format!("{}={}\n", entry.name, entry.value));
                }
                file.write_all(buf.as_bytes())?;
                file.flush()
            }
            OutputSink::Legacy => {
                for entry in entries {
                    writeln!(stdout, "::set-output name={}::{}", entry.name, entry.value)?;
                }
                stdout.flush()
            }
        }
    }
}

/// Named results for a finished run, in emission order.
pub fn render_entries(report: &ChangeReport, semantic_version: &str) -> Vec<OutputEntry> {
    let mut entries: Vec<OutputEntry> = report
        .verdicts()
        .iter()
        .map(|v| OutputEntry::new(v.module.output_key(), v.changed.to_string()))
        .collect();

    entries.push(OutputEntry::new(CHANGES_KEY, report.to_json().to_string()));
    entries.push(OutputEntry::new(SEMANTIC_VERSION_KEY, semantic_version));
    entries
}

/// Human-readable summary block printed after the outputs.
pub fn render_summary(report: &ChangeReport) -> String {
    let mut out = String::from("Change Detection Summary:\n");
    for verdict in report.verdicts() {
        let status = if verdict.changed { "CHANGED" } else { "UNCHANGED" };
        out.push_str(&format!("  {}: {}\n", verdict.module, status));
    }
    out
}
