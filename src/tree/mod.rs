//! Extracted tree traversal and fingerprinting
//!
//! Walks a module's extracted files in a filesystem-independent order and
//! reduces them to a single content fingerprint.

pub mod hasher;
pub mod walker;

pub use hasher::{fingerprint, Fingerprint};
