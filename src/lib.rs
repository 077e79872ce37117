//! Detect Changes: per-module change detection for mono-repository CI
//!
//! Resolves the base/head commits of a CI trigger, extracts each module's
//! tree at both commits without touching the working copy, and compares
//! content fingerprints to decide which modules changed.

pub mod cli;
pub mod config;
pub mod detect;
pub mod error;
pub mod extract;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod tree;
pub mod types;
pub mod vcs;
pub mod workspace;
