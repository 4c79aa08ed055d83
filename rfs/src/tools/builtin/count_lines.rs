//! count_lines tool - line counts for a file or tree

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::lines::{CountOptions, LineCountReport, count_lines};
use crate::tools::args::{optional_bool, optional_str, required_str, string_list};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, run_blocking};

/// Count lines in a file, or in every matching file below a directory
pub struct CountLinesTool;

#[async_trait]
impl Tool for CountLinesTool {
    fn name(&self) -> &'static str {
        "count_lines"
    }

    fn description(&self) -> &'static str {
        "Count lines in a file, or in all matching files of a directory (requires recursive=true). \
         Optionally also count lines matching a regex."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "path": {
                    "type": "string",
                    "description": "File or directory to count"
                },
                "recursive": {
                    "type": "boolean",
                    "description": "Count all files below a directory (default: false)"
                },
                "pattern": {
                    "type": "string",
                    "description": "Also count lines matching this regex (case-sensitive)"
                },
                "filePattern": {
                    "type": "string",
                    "description": "Glob for files to include when counting a directory (default: **)"
                },
                "excludePatterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Glob patterns to exclude"
                },
                "ignoreEmptyLines": {
                    "type": "boolean",
                    "description": "Do not count whitespace-only lines (default: false)"
                }
            },
            "required": ["path"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "CountLinesTool::execute: called");
        run(&input, ctx).await.into()
    }
}

async fn run(input: &Value, ctx: &ToolContext) -> Result<String, ToolError> {
    let path = PathBuf::from(required_str(input, "path")?);
    let excludes = ctx.excludes(&string_list(input, "excludePatterns")?)?;
    let options = CountOptions {
        recursive: optional_bool(input, "recursive")?.unwrap_or(false),
        line_pattern: optional_str(input, "pattern")?.map(str::to_string),
        file_glob: optional_str(input, "filePattern")?.unwrap_or("**").to_string(),
        ignore_empty_lines: optional_bool(input, "ignoreEmptyLines")?.unwrap_or(false),
    };

    let roots = ctx.roots().clone();
    let report = run_blocking(move || count_lines(&path, &options, &excludes, &roots)).await?;
    debug!(files = report.files.len(), "CountLinesTool::execute: counted");

    Ok(format_report(&report))
}

fn format_report(report: &LineCountReport) -> String {
    if report.files.is_empty() {
        return "No files found matching the criteria.".to_string();
    }

    let mut output = String::from("Line counts:\n\n");
    for file in &report.files {
        match file.matching_lines {
            Some(matching) => output.push_str(&format!(
                "{}: {} lines total, {} matching lines\n",
                file.file.display(),
                file.total_lines,
                matching
            )),
            None => output.push_str(&format!("{}: {} lines\n", file.file.display(), file.total_lines)),
        }
    }

    output.push_str(&format!("\nTotal: {} files, {} lines", report.files.len(), report.total_lines));
    if let Some(matching) = report.total_matching {
        output.push_str(&format!(", {matching} matching lines"));
    }
    output
}
