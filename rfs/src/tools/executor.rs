//! ToolExecutor - dispatches tool calls by name

use futures::future::join_all;
use std::collections::HashMap;
use tracing::debug;

use super::builtin::{
    ChecksumFilesTool, ChecksumVerifyTool, ContentDiffTool, CountLinesTool, DirectoryTreeTool, FileDiffTool,
    FileInfoTool, ListDirectoryTool, ReadFilesTool, SearchFilesTool, SearchGlobTool, SearchRegexTool,
};
use super::{Tool, ToolCall, ToolContext, ToolDefinition, ToolResult};

/// Manages tool execution for a session
pub struct ToolExecutor {
    tools: HashMap<String, Box<dyn Tool>>,
}

impl ToolExecutor {
    /// Create executor with the read-only filesystem catalog
    pub fn standard() -> Self {
        let mut executor = Self::empty();

        // Reading
        executor.add_tool(Box::new(ReadFilesTool));
        executor.add_tool(Box::new(ListDirectoryTool));
        executor.add_tool(Box::new(DirectoryTreeTool));
        executor.add_tool(Box::new(FileInfoTool));

        // Searching
        executor.add_tool(Box::new(SearchFilesTool));
        executor.add_tool(Box::new(SearchGlobTool));
        executor.add_tool(Box::new(SearchRegexTool));
        executor.add_tool(Box::new(CountLinesTool));

        // Comparing
        executor.add_tool(Box::new(ContentDiffTool));
        executor.add_tool(Box::new(FileDiffTool));
        executor.add_tool(Box::new(ChecksumFilesTool));
        executor.add_tool(Box::new(ChecksumVerifyTool));

        executor
    }

    /// Create an empty executor (for testing)
    pub fn empty() -> Self {
        Self { tools: HashMap::new() }
    }

    /// Add a tool to the executor
    pub fn add_tool(&mut self, tool: Box<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    fn definition(tool: &dyn Tool) -> ToolDefinition {
        ToolDefinition::new(tool.name(), tool.description(), tool.input_schema())
    }

    /// Get tool definitions for the model, sorted by name
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        let mut defs: Vec<ToolDefinition> = self.tools.values().map(|t| Self::definition(t.as_ref())).collect();
        defs.sort_by(|a, b| a.name.cmp(&b.name));
        defs
    }

    /// Get definitions for a subset of tools by name
    pub fn definitions_for(&self, tool_names: &[String]) -> Vec<ToolDefinition> {
        tool_names
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|t| Self::definition(t.as_ref()))
            .collect()
    }

    /// Execute a tool call
    pub async fn execute(&self, tool_call: &ToolCall, ctx: &ToolContext) -> ToolResult {
        debug!(id = %tool_call.id, name = %tool_call.name, "ToolExecutor::execute: called");
        match self.tools.get(&tool_call.name) {
            Some(tool) => tool.execute(tool_call.input.clone(), ctx).await,
            None => {
                debug!(name = %tool_call.name, "ToolExecutor::execute: unknown tool");
                ToolResult::error(format!("Unknown tool: {}", tool_call.name))
            }
        }
    }

    /// Execute multiple tool calls concurrently; results keep call order
    pub async fn execute_all(&self, tool_calls: &[ToolCall], ctx: &ToolContext) -> Vec<(String, ToolResult)> {
        debug!(count = tool_calls.len(), "ToolExecutor::execute_all: called");
        join_all(
            tool_calls
                .iter()
                .map(|call| async move { (call.id.clone(), self.execute(call, ctx).await) }),
        )
        .await
    }

    /// Check if a tool exists
    pub fn has_tool(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    /// Get tool names, sorted
    pub fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for ToolExecutor {
    fn default() -> Self {
        Self::standard()
    }
}
