//! content_diff and file_diff tools - unified diffs in a markdown fence

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::diff::{DEFAULT_LABEL_MODIFIED, DEFAULT_LABEL_ORIGINAL, DiffOutcome, fenced, file_diff, unified_diff};
use crate::tools::args::{optional_str, required_str};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

/// Diff two pieces of text
pub struct ContentDiffTool;

#[async_trait]
impl Tool for ContentDiffTool {
    fn name(&self) -> &'static str {
        "content_diff"
    }

    fn description(&self) -> &'static str {
        "Compare two pieces of text and return a unified diff in a ```diff code block."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "content1": {
                    "type": "string",
                    "description": "Original text"
                },
                "content2": {
                    "type": "string",
                    "description": "Modified text"
                },
                "label1": {
                    "type": "string",
                    "description": "Label for the original text (default: original)"
                },
                "label2": {
                    "type": "string",
                    "description": "Label for the modified text (default: modified)"
                }
            },
            "required": ["content1", "content2"]
        })
    }

    async fn execute(&self, input: Value, _ctx: &ToolContext) -> ToolResult {
        debug!("ContentDiffTool::execute: called");
        content_diff(&input).into()
    }
}

fn content_diff(input: &Value) -> Result<String, ToolError> {
    let content1 = required_str(input, "content1")?;
    let content2 = required_str(input, "content2")?;
    let label1 = optional_str(input, "label1")?.unwrap_or(DEFAULT_LABEL_ORIGINAL);
    let label2 = optional_str(input, "label2")?.unwrap_or(DEFAULT_LABEL_MODIFIED);

    Ok(match unified_diff(content1, content2, label1, label2) {
        DiffOutcome::Identical => "Contents are identical.".to_string(),
        DiffOutcome::Changed(diff) => fenced(&diff),
    })
}

/// Diff two files inside the repository
pub struct FileDiffTool;

#[async_trait]
impl Tool for FileDiffTool {
    fn name(&self) -> &'static str {
        "file_diff"
    }

    fn description(&self) -> &'static str {
        "Compare two files and return a unified diff in a ```diff code block."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file1": {
                    "type": "string",
                    "description": "Original file"
                },
                "file2": {
                    "type": "string",
                    "description": "Modified file"
                }
            },
            "required": ["file1", "file2"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "FileDiffTool::execute: called");
        let (file1, file2) = match (required_str(&input, "file1"), required_str(&input, "file2")) {
            (Ok(a), Ok(b)) => (PathBuf::from(a), PathBuf::from(b)),
            (Err(e), _) | (_, Err(e)) => return ToolResult::error(e.to_string()),
        };

        match file_diff(&file1, &file2, ctx.roots()).await {
            Ok(DiffOutcome::Identical) => ToolResult::success("Files are identical."),
            Ok(DiffOutcome::Changed(diff)) => ToolResult::success(fenced(&diff)),
            Err(e) => {
                debug!(%e, "FileDiffTool::execute: failed");
                ToolResult::error(format!("Error comparing files: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_context;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_content_diff() {
        let temp = tempdir().unwrap();
        let ctx = test_context(temp.path());

        let result = ContentDiffTool
            .execute(serde_json::json!({"content1": "a\nb\n", "content2": "a\nc\n"}), &ctx)
            .await;

        assert!(!result.is_error);
        assert!(result.content.starts_with("```diff\n--- original\n+++ modified\n"));
        assert!(result.content.contains("-b\n+c\n"));
        assert!(result.content.ends_with("```"));
    }

    #[tokio::test]
    async fn test_content_diff_identical_and_labels() {
        let temp = tempdir().unwrap();
        let ctx = test_context(temp.path());

        let result = ContentDiffTool
            .execute(serde_json::json!({"content1": "same\r\n", "content2": "same\n"}), &ctx)
            .await;
        assert_eq!(result.content, "Contents are identical.");

        let result = ContentDiffTool
            .execute(
                serde_json::json!({"content1": "x", "content2": "y", "label1": "before.md", "label2": "after.md"}),
                &ctx,
            )
            .await;
        assert!(result.content.contains("--- before.md\n+++ after.md\n"));
    }

    #[tokio::test]
    async fn test_content_diff_fence_longer_than_backticks_inside() {
        let temp = tempdir().unwrap();
        let ctx = test_context(temp.path());

        let result = ContentDiffTool
            .execute(serde_json::json!({"content1": "```rust\n", "content2": "```\n"}), &ctx)
            .await;

        assert!(result.content.starts_with("````diff\n"));
        assert!(result.content.ends_with("\n````"));
    }

    #[tokio::test]
    async fn test_file_diff() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("v1.txt"), "one\ntwo\n").unwrap();
        fs::write(temp.path().join("v2.txt"), "one\nthree\n").unwrap();
        fs::write(temp.path().join("copy.txt"), "one\ntwo\n").unwrap();

        let ctx = test_context(temp.path());
        let result = FileDiffTool
            .execute(serde_json::json!({"file1": "v1.txt", "file2": "v2.txt"}), &ctx)
            .await;
        assert!(result.content.contains("--- v1.txt\n+++ v2.txt\n"));

        let result = FileDiffTool
            .execute(serde_json::json!({"file1": "v1.txt", "file2": "copy.txt"}), &ctx)
            .await;
        assert_eq!(result.content, "Files are identical.");
    }

    #[tokio::test]
    async fn test_file_diff_outside_root() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("v1.txt"), "one\n").unwrap();

        let ctx = test_context(temp.path());
        let result = FileDiffTool
            .execute(serde_json::json!({"file1": "v1.txt", "file2": "/etc/hosts"}), &ctx)
            .await;

        assert!(result.is_error);
        assert!(result.content.contains("Access denied"));
    }
}
