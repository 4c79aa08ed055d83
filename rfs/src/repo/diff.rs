//! Unified diffs of text blobs and files

use similar::TextDiff;
use std::path::Path;
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

/// Context lines around each hunk
pub const CONTEXT_LINES: usize = 3;

pub const DEFAULT_LABEL_ORIGINAL: &str = "original";
pub const DEFAULT_LABEL_MODIFIED: &str = "modified";

/// Result of comparing two texts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffOutcome {
    Identical,
    Changed(String),
}

impl DiffOutcome {
    pub fn is_identical(&self) -> bool {
        matches!(self, Self::Identical)
    }
}

/// Convert CRLF line endings to LF
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
}

/// Unified diff of two texts after line-ending normalization
pub fn unified_diff(original: &str, modified: &str, label_original: &str, label_modified: &str) -> DiffOutcome {
    let original = normalize_line_endings(original);
    let modified = normalize_line_endings(modified);
    if original == modified {
        return DiffOutcome::Identical;
    }

    let diff = TextDiff::from_lines(&original, &modified)
        .unified_diff()
        .context_radius(CONTEXT_LINES)
        .header(label_original, label_modified)
        .to_string();

    DiffOutcome::Changed(diff)
}

/// Shortest backtick fence (at least three) that does not occur in `text`
pub fn code_fence(text: &str) -> String {
    let mut fence = "```".to_string();
    while text.contains(&fence) {
        fence.push('`');
    }
    fence
}

/// Wrap a diff in a `diff` code block that its own contents cannot close
pub fn fenced(diff: &str) -> String {
    let fence = code_fence(diff);
    let newline = if diff.ends_with('\n') { "" } else { "\n" };
    format!("{fence}diff\n{diff}{newline}{fence}")
}

/// Diff two files inside the allowed roots, labelled with the paths as given
pub async fn file_diff(file1: &Path, file2: &Path, roots: &AllowedRoots) -> Result<DiffOutcome, ToolError> {
    debug!(?file1, ?file2, "file_diff: called");
    let (valid1, valid2) = tokio::try_join!(roots.validate_async(file1), roots.validate_async(file2))?;

    let (content1, content2) = tokio::try_join!(tokio::fs::read_to_string(&valid1), tokio::fs::read_to_string(&valid2))?;

    Ok(unified_diff(
        &content1,
        &content2,
        &file1.display().to_string(),
        &file2.display().to_string(),
    ))
}
