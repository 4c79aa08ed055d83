//! checksum_files and checksum_verify tools

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

use crate::repo::hash::{HashAlgorithm, HashResult, VerificationReport, VerifyRequest, checksum_files, verify_checksums};
use crate::tools::args::{optional_str, required_string_list};
use crate::tools::{Tool, ToolContext, ToolError, ToolResult};

fn algorithm_schema() -> Value {
    serde_json::json!({
        "type": "string",
        "enum": ["md5", "sha1", "sha256", "sha512"],
        "description": "Hash algorithm to use (default: sha256)"
    })
}

fn algorithm_arg(input: &Value, ctx: &ToolContext) -> Result<HashAlgorithm, ToolError> {
    match optional_str(input, "algorithm")? {
        Some(name) => name.parse(),
        None => Ok(ctx.default_algorithm),
    }
}

/// Hash a batch of files
pub struct ChecksumFilesTool;

#[async_trait]
impl Tool for ChecksumFilesTool {
    fn name(&self) -> &'static str {
        "checksum_files"
    }

    fn description(&self) -> &'static str {
        "Calculate checksums for one or more files (md5, sha1, sha256 or sha512). \
         Output uses the sha256sum format: digest, two spaces, path."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "paths": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Files to hash"
                },
                "algorithm": algorithm_schema()
            },
            "required": ["paths"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ChecksumFilesTool::execute: called");
        let (paths, algorithm) = match (required_string_list(&input, "paths"), algorithm_arg(&input, ctx)) {
            (Ok(paths), Ok(algorithm)) => (paths.into_iter().map(PathBuf::from).collect::<Vec<_>>(), algorithm),
            (Err(e), _) | (_, Err(e)) => return ToolResult::error(e.to_string()),
        };

        let results = checksum_files(&paths, algorithm, ctx.roots()).await;
        ToolResult::success(format_checksums(&results, algorithm))
    }
}

fn format_checksums(results: &[HashResult], algorithm: HashAlgorithm) -> String {
    let mut output = format!("Checksums ({algorithm}):\n\n");
    let mut errors = Vec::new();

    for result in results {
        match &result.result {
            Ok(digest) => output.push_str(&format!("{}  {}\n", digest, result.path.display())),
            Err(e) => errors.push(format!("{}: {}", result.path.display(), e)),
        }
    }

    if !errors.is_empty() {
        output.push_str("\nErrors:\n");
        for error in errors {
            output.push_str(&error);
            output.push('\n');
        }
    }
    output
}

/// Compare files against expected digests
pub struct ChecksumVerifyTool;

#[async_trait]
impl Tool for ChecksumVerifyTool {
    fn name(&self) -> &'static str {
        "checksum_verify"
    }

    fn description(&self) -> &'static str {
        "Verify files against expected checksums. Reports valid, invalid and unreadable files separately."
    }

    fn input_schema(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "files": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "path": { "type": "string" },
                            "expectedHash": { "type": "string" }
                        },
                        "required": ["path", "expectedHash"]
                    },
                    "description": "Files with the digest each is expected to have"
                },
                "algorithm": algorithm_schema()
            },
            "required": ["files"]
        })
    }

    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult {
        debug!(?input, "ChecksumVerifyTool::execute: called");
        let requests = match verify_requests(&input) {
            Ok(r) => r,
            Err(e) => return ToolResult::error(e.to_string()),
        };
        let algorithm = match algorithm_arg(&input, ctx) {
            Ok(a) => a,
            Err(e) => return ToolResult::error(e.to_string()),
        };

        let report = verify_checksums(&requests, algorithm, ctx.roots()).await;
        ToolResult::success(format_report(&report))
    }
}

fn verify_requests(input: &Value) -> Result<Vec<VerifyRequest>, ToolError> {
    match input.get("files") {
        None | Some(Value::Null) => Err(ToolError::InvalidArgument("files is required".to_string())),
        Some(files) => serde_json::from_value(files.clone())
            .map_err(|e| ToolError::InvalidArgument(format!("files must be an array of {{path, expectedHash}}: {e}"))),
    }
}

fn format_report(report: &VerificationReport) -> String {
    let mut output = format!("Checksum Verification Results ({}):\n", report.algorithm);
    output.push_str(&format!("✅ Valid: {}\n", report.valid.len()));
    output.push_str(&format!("❌ Invalid: {}\n", report.invalid.len()));
    output.push_str(&format!("⚠️ Errors: {}\n\n", report.errors.len()));

    if !report.valid.is_empty() {
        output.push_str("Valid Files:\n");
        for path in &report.valid {
            output.push_str(&format!("✓ {}\n", path.display()));
        }
        output.push('\n');
    }

    if !report.invalid.is_empty() {
        output.push_str("Invalid Files:\n");
        for mismatch in &report.invalid {
            output.push_str(&format!("✗ {}\n", mismatch.path.display()));
            output.push_str(&format!("  Expected: {}\n", mismatch.expected));
            output.push_str(&format!("  Actual:   {}\n", mismatch.actual));
        }
        output.push('\n');
    }

    if !report.errors.is_empty() {
        output.push_str("Errors:\n");
        for (path, e) in &report.errors {
            output.push_str(&format!("! {}: {}\n", path.display(), e));
        }
    }

    output
}
