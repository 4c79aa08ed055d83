//! Tool system for the repository analyzer
//!
//! Tools give the analyzer agent read-only access to one cloned repository.
//! Each session gets a `ToolContext` scoped to its allowed roots - every path
//! a tool touches is validated against them first, so tools cannot escape the
//! clone, not even through symlinks planted in it.

mod args;
mod context;
mod error;
mod executor;
mod filesystem;
mod traits;
mod types;

pub mod builtin;

pub use context::{AllowedRoots, ToolContext, expand_home, normalize_lexically};
pub use error::ToolError;
pub use executor::ToolExecutor;
pub use filesystem::FilesystemTools;
pub use traits::{Tool, ToolResult};
pub use types::{ToolCall, ToolDefinition};

pub(crate) use traits::run_blocking;
