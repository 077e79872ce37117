//! Commit Resolver
//!
//! Derives the base/head revision pair from the CI trigger context. Payload
//! problems and a failed parent lookup degrade to an absent base; nothing
//! here is fatal.

use crate::types::{CommitPair, CommitRef};
use crate::vcs::VersionControl;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Event kinds that carry explicit base/head revisions in their payload
const COMPARISON_EVENTS: &[&str] = &["pull_request", "pull_request_target"];

/// Trigger metadata supplied by the invoking CI environment
#[derive(Debug, Clone, Default)]
pub struct EventContext {
    /// Event kind, e.g. `push` or `pull_request`
    pub event_name: String,
    /// Path to the JSON event description, if any
    pub event_path: Option<PathBuf>,
    /// Revision before the push
    pub event_before: Option<String>,
    /// Revision that triggered the run
    pub sha: Option<String>,
}

impl EventContext {
    /// Read `GITHUB_EVENT_NAME`, `GITHUB_EVENT_PATH`, `GITHUB_EVENT_BEFORE` and `GITHUB_SHA`.
    pub fn from_env() -> Self {
        Self {
            event_name: std::env::var("GITHUB_EVENT_NAME").unwrap_or_default(),
            event_path: std::env::var_os("GITHUB_EVENT_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            event_before: std::env::var("GITHUB_EVENT_BEFORE").ok(),
            sha: std::env::var("GITHUB_SHA").ok(),
        }
    }

    pub fn is_comparison_event(&self) -> bool {
        COMPARISON_EVENTS.contains(&self.event_name.as_str())
    }
}

/// The subset of an event payload this tool reads.
///
/// Every level is optional so a payload of any shape deserializes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventPayload {
    #[serde(default)]
    pub pull_request: Option<PullRequest>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PullRequest {
    #[serde(default)]
    pub base: Option<GitPointer>,
    #[serde(default)]
    pub head: Option<GitPointer>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GitPointer {
    #[serde(default)]
    pub sha: Option<String>,
}

impl EventPayload {
    /// Load a payload file. Missing, unreadable, or malformed files yield an
    /// empty payload and a warning.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Could not read event file");
                return Self::default();
            }
        };

        Self::parse(&content).unwrap_or_else(|e| {
            warn!(path = %path.display(), error = %e, "Could not parse event JSON file");
            Self::default()
        })
    }

    pub fn parse(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    pub fn pull_request_base(&self) -> Option<&str> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.base.as_ref())
            .and_then(|base| base.sha.as_deref())
    }

    pub fn pull_request_head(&self) -> Option<&str> {
        self.pull_request
            .as_ref()
            .and_then(|pr| pr.head.as_ref())
            .and_then(|head| head.sha.as_deref())
    }
}

/// Resolves the commits to compare for one run
pub struct CommitResolver<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
}

impl<'a, V: VersionControl + ?Sized> CommitResolver<'a, V> {
    pub fn new(vcs: &'a V) -> Self {
        Self { vcs }
    }

    /// Resolve the pair, loading the payload from `event.event_path` when needed.
    pub fn resolve(&self, event: &EventContext) -> CommitPair {
        let payload = if event.is_comparison_event() {
            event
                .event_path
                .as_deref()
                .map(EventPayload::load)
                .unwrap_or_default()
        } else {
            EventPayload::default()
        };
        self.resolve_with_payload(event, &payload)
    }

    /// Resolve the pair from an already-parsed payload.
    pub fn resolve_with_payload(&self, event: &EventContext, payload: &EventPayload) -> CommitPair {
        let (base, head) = if event.is_comparison_event() {
            info!(event = %event.event_name, "Resolving commits from pull request payload");
            (
                payload.pull_request_base().map(str::to_string),
                payload.pull_request_head().map(str::to_string),
            )
        } else {
            info!(event = %event.event_name, "Resolving commits from push environment");
            (event.event_before.clone(), event.sha.clone())
        };

        let head = CommitRef::new(head.unwrap_or_default());
        let base = base.filter(|b| !b.is_empty()).map(CommitRef::new);

        let base = match base {
            Some(b) if b.is_null_sentinel() => self.parent_of_head(&head),
            other => other,
        };

        CommitPair { base, head }
    }

    fn parent_of_head(&self, head: &CommitRef) -> Option<CommitRef> {
        match self.vcs.parent_of(head) {
            Ok(parent) if !parent.is_empty() => {
                info!(%head, %parent, "Base is the null revision; using parent of head");
                Some(parent)
            }
            Ok(_) => None,
            Err(e) => {
                warn!(%head, error = %e, "Could not get parent commit");
                None
            }
        }
    }
}
