//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::SetupError;

/// `[code] message`, followed by one line per validation error.
pub fn map_error(e: &SetupError) -> String {
    let mut out = format!("[{}] {}", e.code(), e);
    if let SetupError::Validation { errors, .. } = e {
        for error in errors {
            out.push_str(&format!("\n  [{}] {}", error.code(), error));
        }
    }
    out
}
