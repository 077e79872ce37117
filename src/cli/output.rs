//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::DetectError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &DetectError) -> String {
    match e {
        DetectError::NoModules => "Error: No modules specified".to_string(),
        DetectError::MissingArgument(name) => {
            format!("Error: Missing required argument --{}", name)
        }
        other => format!("Error: {}", other),
    }
}
