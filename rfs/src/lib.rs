//! repofs - sandboxed read-only filesystem tools for repository analysis
//!
//! An analyzer agent explores a freshly cloned, untrusted repository through
//! a fixed catalog of tools. Every path an agent hands us goes through the
//! path guard before the filesystem is touched, so a symlink planted in the
//! clone cannot be used to read the host.
//!
//! # Modules
//!
//! - [`tools`] - tool catalog, path guard, executor and error types
//! - [`repo`] - the structured operations behind the tools (tree, search,
//!   line counts, hashes, diffs)
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line harness for running tools by hand
//!
//! # Example
//!
//! ```ignore
//! use repofs::{FilesystemTools, ToolCall, config::ToolsConfig};
//!
//! let tools = FilesystemTools::new(vec!["/tmp/clone-1234".into()], &ToolsConfig::default())?;
//! let result = tools
//!     .call(&ToolCall {
//!         id: "call_1".into(),
//!         name: "search_regex".into(),
//!         input: serde_json::json!({"path": ".", "pattern": "TODO"}),
//!     })
//!     .await;
//! println!("{}", result.content);
//! ```

pub mod cli;
pub mod config;
pub mod repo;
pub mod tools;

pub use config::{Config, ToolsConfig};
pub use tools::{AllowedRoots, FilesystemTools, Tool, ToolCall, ToolContext, ToolDefinition, ToolError, ToolExecutor, ToolResult};

/// Default cap for glob search results
pub const DEFAULT_GLOB_MAX_RESULTS: usize = 500;

/// Default cap for regex content search matches
pub const DEFAULT_REGEX_MAX_RESULTS: usize = 100;
