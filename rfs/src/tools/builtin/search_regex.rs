//! search_regex tool - regex search over file contents

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::grep::{RegexSearch, RegexSearchOptions, search_regex};
use crate::tools::args::{optional_bool, optional_u64, required_str, string_list};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult, run_blocking};

/// Search file contents with a regular expression
pub struct SearchRegexTool;

#[async_trait]
impl Tool for SearchRegexTool {
    fn name(&self) -> &'static str {
        "search_regex"
    }

    fn description(&self) -> &'static str {
        "Search file contents with a regular expression. ^ and $ match at line boundaries. \
         Results are grouped by file with line numbers; case-insensitive unless caseSensitive is set."
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
                    "description": "Regular expression to search for"
                },
                "filePatterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Only search files whose name matches one of these globs (e.g., *.ts)"
                },
                "excludePatterns": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Glob patterns to exclude"
                },
                "maxResults": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Maximum number of matches (default: 100)"
                },
                "caseSensitive": {
                    "type": "boolean",
                    "description": "Match case exactly (default: false)"
                }
            },
            "required": ["path", "pattern"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "SearchRegexTool::execute: called");
        run(&input, ctx).await.into()
    }
}

async fn run(input: &Value, ctx: &ToolContext) -> Result<String, ToolError> {
    let path = PathBuf::from(required_str(input, "path")?);
    let pattern = required_str(input, "pattern")?.to_string();
    let excludes = ctx.excludes(&string_list(input, "excludePatterns")?)?;
    let options = RegexSearchOptions {
        file_patterns: string_list(input, "filePatterns")?,
        max_results: ctx
            .limits
            .clamp_results(optional_u64(input, "maxResults")?, ctx.limits.regex_max_results),
        case_sensitive: optional_bool(input, "caseSensitive")?.unwrap_or(false),
    };

    let roots = ctx.roots().clone();
    let regex = pattern.clone();
    let max_results = options.max_results;
    let search = run_blocking(move || search_regex(&path, &regex, &options, &excludes, &roots)).await?;

    Ok(format_search(&search, &pattern, max_results))
}

fn format_search(search: &RegexSearch, pattern: &str, max_results: usize) -> String {
    if search.matches.is_empty() {
        return format!(
            "No matches found for regex: {}\nFound 0 matches in 0 files\nSearched {} files",
            pattern, search.files_searched
        );
    }

    let groups = search.by_file();
    let mut output = format!("Found {} matches in {} files", search.total_matches(), groups.len());
    if search.truncated {
        output.push_str(&format!(" (limited to {max_results} results)"));
    }
    output.push_str("\n\n");

    for (file, matches) in groups {
        output.push_str(&format!("File: {}\n", file.display()));
        for m in matches {
            output.push_str(&format!("  Line {}: {}\n", m.line, m.context));
        }
        output.push('\n');
    }

    output.push_str(&format!("Searched {} files", search.files_searched));
    output
}
