//! FilesystemTools - the catalog bundled with its session context

use std::path::PathBuf;
use tracing::debug;

use crate::config::ToolsConfig;

use super::{AllowedRoots, ToolCall, ToolContext, ToolDefinition, ToolError, ToolExecutor, ToolResult};

/// Entry point for the orchestration layer
///
/// Construct one per cloned repository with the clone directory as the
/// allowed root, advertise [`definitions`](Self::definitions) to the model and
/// route its tool calls through [`call`](Self::call).
pub struct FilesystemTools {
    executor: ToolExecutor,
    ctx: ToolContext,
}

impl FilesystemTools {
    pub fn new(allowed_dirs: Vec<PathBuf>, config: &ToolsConfig) -> Result<Self, ToolError> {
        debug!(?allowed_dirs, "FilesystemTools::new: called");
        let roots = AllowedRoots::new(allowed_dirs)?;
        Ok(Self {
            executor: ToolExecutor::standard(),
            ctx: ToolContext::with_config(roots, config),
        })
    }

    /// Name, description and input schema of every tool
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.executor.definitions()
    }

    pub async fn call(&self, call: &ToolCall) -> ToolResult {
        self.executor.execute(call, &self.ctx).await
    }

    /// Run a batch of calls concurrently, returning `(call id, result)` in call order
    pub async fn call_all(&self, calls: &[ToolCall]) -> Vec<(String, ToolResult)> {
        self.executor.execute_all(calls, &self.ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_requires_a_root() {
        let result = FilesystemTools::new(vec![], &ToolsConfig::default());
        assert!(matches!(result, Err(ToolError::NoAllowedRoots)));
    }

    #[tokio::test]
    async fn test_call_uses_configured_excludes() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("vendor")).unwrap();
        fs::write(temp.path().join("vendor/lib.rs"), "").unwrap();
        fs::write(temp.path().join("main.rs"), "").unwrap();

        let config = ToolsConfig {
            default_excludes: vec!["vendor".to_string()],
            ..Default::default()
        };
        let tools = FilesystemTools::new(vec![temp.path().to_path_buf()], &config).unwrap();

        let result = tools
            .call(&ToolCall::new("1", "search_glob", serde_json::json!({"path": ".", "pattern": "**/*.rs"})))
            .await;

        assert!(!result.is_error, "{}", result.content);
        assert!(result.content.contains("Found 1 files"));
        assert!(!result.content.contains("vendor"));
    }
}
