//! search_files tool - find entries by name

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::search::search_files;
use crate::tools::args::{required_str, string_list};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, run_blocking};

/// Case-insensitive substring search on file and directory names
pub struct SearchFilesTool;

#[async_trait]
impl Tool for SearchFilesTool {
    fn name(&self) -> &'static str {
        "search_files"
    }

    fn description(&self) -> &'static str {
        "Recursively find files and directories whose name contains a string (case-insensitive). \
         Returns full paths."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Directory to search from"
                },
                "pattern": {
                    "type": "string",
                    "description": "Text to look for in entry names"
                },
                "excludePatterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Glob patterns to exclude; a bare name excludes any path segment containing it"
                }
            },
            "required": ["path", "pattern"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "SearchFilesTool::execute: called");
        run(&input, ctx).await.into()
    }
}

async fn run(input: &Value, ctx: &ToolContext) -> Result<String, ToolError> {
    let path = PathBuf::from(required_str(input, "path")?);
    let pattern = required_str(input, "pattern")?.to_string();
    let excludes = ctx.excludes(&string_list(input, "excludePatterns")?)?;

    let roots = ctx.roots().clone();
    let results = run_blocking(move || search_files(&path, &pattern, &excludes, &roots)).await?;
    debug!(count = results.len(), "SearchFilesTool::execute: search complete");

    if results.is_empty() {
        return Ok("No matches found".to_string());
    }
    Ok(results
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_context;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_search_files() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("src/Config.ts"), "").unwrap();
        fs::write(temp.path().join("src/app.ts"), "").unwrap();

        let ctx = test_context(temp.path());
        let result = SearchFilesTool
            .execute(serde_json::json!({"path": ".", "pattern": "config"}), &ctx)
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content.lines().count(), 1);
        assert!(result.content.ends_with("Config.ts"));
    }

    #[tokio::test]
    async fn test_search_files_skips_default_excludes() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("node_modules/config")).unwrap();
        fs::write(temp.path().join("node_modules/config/index.js"), "").unwrap();

        let ctx = test_context(temp.path());
        let result = SearchFilesTool
            .execute(serde_json::json!({"path": ".", "pattern": "config"}), &ctx)
            .await;

        assert_eq!(result.content, "No matches found");
    }

    #[tokio::test]
    async fn test_search_files_missing_pattern() {
        let temp = tempdir().unwrap();
        let ctx = test_context(temp.path());

        let result = SearchFilesTool.execute(serde_json::json!({"path": "."}), &ctx).await;
        assert!(result.is_error);
        assert!(result.content.contains("pattern is required"));
    }
}
