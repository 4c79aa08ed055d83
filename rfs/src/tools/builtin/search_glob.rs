//! search_glob tool - find paths matching a glob

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::search::search_glob;
use crate::tools::args::{optional_u64, required_str, string_list};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, run_blocking};

/// Find files matching a glob pattern
pub struct SearchGlobTool;

#[async_trait]
impl Tool for SearchGlobTool {
    fn name(&self) -> &'static str {
        "search_glob"
    }

    fn description(&self) -> &'static str {
        "Find files matching a glob pattern (e.g., **/*.rs, src/**/*.test.ts) relative to the search path. \
         Results are sorted and capped at maxResults."
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
                    "description": "Glob pattern; * stays within one directory, ** crosses directories"
                },
                "excludePatterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Glob patterns to exclude"
                },
                "maxResults": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of results (default: 500)"
                }
            },
            "required": ["path", "pattern"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "SearchGlobTool::execute: called");
        run(&input, ctx).await.into()
    }
}

async fn run(input: &Value, ctx: &ToolContext) -> Result<String, ToolError> {
    let path = PathBuf::from(required_str(input, "path")?);
    let pattern = required_str(input, "pattern")?.to_string();
    let excludes = ctx.excludes(&string_list(input, "excludePatterns")?)?;
    let max_results = ctx
        .limits
        .clamp_results(optional_u64(input, "maxResults")?, ctx.limits.glob_max_results);

    let roots = ctx.roots().clone();
    let glob_pattern = pattern.clone();
    let search = run_blocking(move || search_glob(&path, &glob_pattern, max_results, &excludes, &roots)).await?;
    debug!(count = search.matches.len(), truncated = search.truncated, "SearchGlobTool::execute: search complete");

    if search.matches.is_empty() {
        return Ok(format!("No files matching pattern: {pattern}"));
    }

    let mut output = format!("Found {} files matching pattern: {}", search.matches.len(), pattern);
    if search.truncated {
        output.push_str(&format!(" (limited to {max_results} results)"));
    }
    output.push_str("\n\n");
    for path in &search.matches {
        output.push_str(&path.display().to_string());
        output.push('\n');
    }
    Ok(output)
}
