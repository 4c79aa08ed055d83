//! file_info tool - size, type, timestamps and permissions

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::files::file_info;
use crate::tools::args::required_str;
use crate::tools::{Tool, ToolContext, ToolResult, run_blocking};

pub struct FileInfoTool;

#[async_trait]
impl Tool for FileInfoTool {
    fn name(&self) -> &'static str {
        "file_info"
    }

    fn description(&self) -> &'static str {
        "Get metadata for a file or directory: size, type, created/modified/accessed times and permissions."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Path to inspect"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "FileInfoTool::execute: called");
        let path = match required_str(&input, "path") {
            Ok(p) => PathBuf::from(p),
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let roots = ctx.roots().clone();
        match run_blocking(move || file_info(&path, &roots)).await {
            Ok(info) => ToolResult::success(info.to_lines()),
            Err(e) => {
                debug!(%e, "FileInfoTool::execute: failed");
                ToolResult::error(e.to_string())
            }
        }
    }
}
