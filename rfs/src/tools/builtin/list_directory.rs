//! list_directory tool - one level of a directory

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::files::list_directory;
use crate::tools::args::required_str;
use crate::tools::{Tool, ToolContext, ToolResult, run_blocking};

/// List the entries of a single directory
pub struct ListDirectoryTool;

#[async_trait]
impl Tool for ListDirectoryTool {
    fn name(&self) -> &'static str {
        "list_directory"
    }

    fn description(&self) -> &'static str {
        "List files and directories directly inside a path, marked [DIR] or [FILE]."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory path, relative to the repository root or absolute"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ListDirectoryTool::execute: called");
        let path = match required_str(&input, "path") {
            Ok(p) => PathBuf::from(p),
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let roots = ctx.roots().clone();
        let entries = match run_blocking(move || list_directory(&path, &roots)).await {
            Ok(entries) => {
                debug!(count = entries.len(), "ListDirectoryTool::execute: entries collected");
                entries
            }
            Err(e) => {
                debug!(%e, "ListDirectoryTool::execute: failed");
                return ToolResult::error(e.to_string());
            }
        };

        if entries.is_empty() {
            return ToolResult::success("Directory is empty");
        }

        let lines: Vec<String> = entries
            .iter()
            .map(|e| format!("{} {}", if e.is_dir { "[DIR]" } else { "[FILE]" }, e.name))
            .collect();
        ToolResult::success(lines.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_context;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_list_directory() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("Cargo.toml"), "").unwrap();

        let ctx = test_context(temp.path());
        let result = ListDirectoryTool.execute(serde_json::json!({"path": "."}), &ctx).await;

        assert!(!result.is_error);
        assert_eq!(result.content, "[FILE] Cargo.toml\n[DIR] src");
    }

    #[tokio::test]
    async fn test_list_empty_directory() {
        let temp = tempdir().unwrap();
        let ctx = test_context(temp.path());

        let result = ListDirectoryTool.execute(serde_json::json!({"path": "."}), &ctx).await;
        assert_eq!(result.content, "Directory is empty");
    }

    #[tokio::test]
    async fn test_list_outside_root() {
        let temp = tempdir().unwrap();
        let ctx = test_context(temp.path());

        let result = ListDirectoryTool.execute(serde_json::json!({"path": "/etc"}), &ctx).await;
        assert!(result.is_error);
        assert!(result.content.starts_with("Access denied"));
    }
}
