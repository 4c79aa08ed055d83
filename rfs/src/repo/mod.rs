//! Structured repository operations behind the tool catalog
//!
//! Every function here takes the session's [`AllowedRoots`](crate::tools::AllowedRoots)
//! explicitly and returns typed results. Flattening to text happens in the
//! tools layer.

pub mod diff;
pub mod exclude;
pub mod files;
pub mod grep;
pub mod hash;
pub mod lines;
pub mod search;
pub mod tree;
pub mod walk;

use glob::MatchOptions;
use std::path::Path;

pub use exclude::ExcludeSet;

/// Options for caller globs: case-sensitive, `*` stays within a segment, dot-files match
pub(crate) const GLOB_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Render a relative path with `/` separators for glob matching
pub fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Compile a caller-supplied glob
pub(crate) fn compile_glob(pattern: &str) -> Result<glob::Pattern, crate::tools::ToolError> {
    glob::Pattern::new(pattern).map_err(|e| crate::tools::ToolError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
