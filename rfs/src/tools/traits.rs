//! Tool trait definition

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use super::ToolError;
use super::context::ToolContext;

/// A read-only tool the analyzer agent can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (matches the model's tool_use name)
    fn name(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn execute(&self, input: Value, ctx: &ToolContext) -> ToolResult;
}

/// Result of a tool execution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub content: String,
    pub is_error: bool,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(content: impl Into<String>) -> Self {
        debug!("ToolResult::success: called");
        Self {
            content: content.into(),
            is_error: false,
        }
    }

    /// Create an error result
    pub fn error(content: impl Into<String>) -> Self {
        debug!("ToolResult::error: called");
        Self {
            content: content.into(),
            is_error: true,
        }
    }
}

impl From<Result<String, ToolError>> for ToolResult {
    fn from(result: Result<String, ToolError>) -> Self {
        match result {
            Ok(content) => Self::success(content),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

/// Run a filesystem walk on the blocking pool
pub(crate) async fn run_blocking<T, F>(f: F) -> Result<T, ToolError>
where
    F: FnOnce() -> Result<T, ToolError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ToolError::TaskFailed(e.to_string()))?
}
