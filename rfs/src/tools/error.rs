//! Tool error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during tool execution
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(
        "Access denied - path outside allowed directories: {} not in {}",
        .path.display(),
        display_roots(.allowed)
    )]
    AccessDenied { path: PathBuf, allowed: Vec<PathBuf> },

    #[error("Parent directory does not exist: {}", .parent.display())]
    ParentNotFound { parent: PathBuf },

    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Path is a directory. Use recursive=true to count lines in all files: {}", .path.display())]
    NotRecursive { path: PathBuf },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("Path is neither a file nor a directory: {}", .path.display())]
    NotFileOrDirectory { path: PathBuf },

    #[error("At least one allowed directory is required")]
    NoAllowedRoots,

    #[error("Tool not found: {name}")]
    UnknownTool { name: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskFailed(String),
}

impl ToolError {
    /// Whether this error is a sandbox boundary violation
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

fn display_roots(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|r| r.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
