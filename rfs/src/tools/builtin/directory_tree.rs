//! directory_tree tool - recursive JSON tree

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::tree::build_tree;
use crate::tools::args::{required_str, string_list};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, run_blocking};

/// Recursive tree of a directory as JSON
pub struct DirectoryTreeTool;

#[async_trait]
impl Tool for DirectoryTreeTool {
    fn name(&self) -> &'static str {
        "directory_tree"
    }

    fn description(&self) -> &'static str {
        "Get a recursive tree of files and directories as JSON. Each entry has a name, a type \
         (file or directory) and, for directories, children. Directories left empty after \
         exclusions are omitted."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Root directory of the tree"
                },
                "excludePatterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Glob patterns to exclude, matched against paths relative to the root"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "DirectoryTreeTool::execute: called");
        run(&input, ctx).await.into()
    }
}

async fn run(input: &Value, ctx: &ToolContext) -> Result<String, ToolError> {
    let path = PathBuf::from(required_str(input, "path")?);
    let excludes = ctx.excludes(&string_list(input, "excludePatterns")?)?;

    let roots = ctx.roots().clone();
    let tree = run_blocking(move || build_tree(&path, &excludes, &roots)).await?;
    debug!(top_level = tree.len(), "DirectoryTreeTool::execute: tree built");

    Ok(serde_json::to_string_pretty(&tree)?)
}
