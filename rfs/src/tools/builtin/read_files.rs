//! read_files tool - read several files with line numbers

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::files::read_files;
use crate::tools::args::required_string_list;
use crate::tools::{Tool, ToolContext, ToolResult};

/// Read one or more files, each shown with line numbers
pub struct ReadFilesTool;

#[async_trait]
impl Tool for ReadFilesTool {
    fn name(&self) -> &'static str {
        "read_files"
    }

    fn description(&self) -> &'static str {
        "Read the contents of one or more files with line numbers. \
         A file that cannot be read is reported inline without failing the others."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "paths": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "File paths, relative to the repository root or absolute"
                }
            },
            "required": ["paths"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ReadFilesTool::execute: called");
        let paths = match required_string_list(&input, "paths") {
            Ok(p) if p.is_empty() => return ToolResult::error("paths must not be empty"),
            Ok(p) => p,
            Err(e) => {
                debug!(%e, "ReadFilesTool::execute: bad paths parameter");
                return ToolResult::error(e.to_string());
            }
        };

        let paths: Vec<PathBuf> = paths.into_iter().map(PathBuf::from).collect();
        let reads = read_files(&paths, ctx.roots()).await;
        debug!(count = reads.len(), "ReadFilesTool::execute: files read");

        let sections: Vec<String> = reads
            .iter()
            .map(|read| match &read.result {
                Ok(content) => format!(
                    "{}:\n{}\n",
                    read.path.display(),
                    number_lines(content, ctx.limits.max_line_length)
                ),
                Err(e) => format!("{}: Error - {}", read.path.display(), e),
            })
            .collect();

        ToolResult::success(sections.join("\n---\n"))
    }
}

/// Prefix each line with its number (cat -n style), cutting very long lines
fn number_lines(content: &str, max_line_length: usize) -> String {
    content
        .lines()
        .enumerate()
        .map(|(i, line)| {
            let shown = if line.chars().count() > max_line_length {
                let cut: String = line.chars().take(max_line_length).collect();
                format!("{cut}...")
            } else {
                line.to_string()
            };
            format!("{:>6}│{}", i + 1, shown)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
