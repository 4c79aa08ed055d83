//! Name and glob search over a repository walk

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

use super::walk::{Flow, RepoWalker};
use super::{ExcludeSet, GLOB_OPTIONS, compile_glob, to_slash};

/// Find entries whose base name contains `pattern`, ignoring case
///
/// Every non-excluded directory is descended into whether or not its own name
/// matches. Paths are returned in walk order.
pub fn search_files(
    path: &Path,
    pattern: &str,
    excludes: &ExcludeSet,
    roots: &AllowedRoots,
) -> Result<Vec<PathBuf>, ToolError> {
    debug!(?path, %pattern, "search_files: called");
    let root = roots.validate(path)?;
    let needle = pattern.to_lowercase();

    let mut results = Vec::new();
    RepoWalker::new(&root, roots, excludes).walk(|entry| {
        if entry.name().to_lowercase().contains(&needle) {
            results.push(entry.path.clone());
        }
        Flow::Continue
    });

    debug!(count = results.len(), "search_files: returning");
    Ok(results)
}

/// Paths matched by a glob search
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobSearch {
    /// Sorted full paths
    pub matches: Vec<PathBuf>,
    /// More paths matched than `max_results`
    pub truncated: bool,
}

/// Find entries whose root-relative path matches `pattern`
///
/// The walk stops at the first match beyond `max_results`.
pub fn search_glob(
    path: &Path,
    pattern: &str,
    max_results: usize,
    excludes: &ExcludeSet,
    roots: &AllowedRoots,
) -> Result<GlobSearch, ToolError> {
    debug!(?path, %pattern, max_results, "search_glob: called");
    let glob = compile_glob(pattern)?;
    let root = roots.validate(path)?;
    let max_results = max_results.max(1);

    let mut matches = Vec::new();
    let truncated = RepoWalker::new(&root, roots, excludes).walk(|entry| {
        if glob.matches_with(&to_slash(&entry.relative), GLOB_OPTIONS) {
            // One match past the cap proves the results were cut short
            if matches.len() >= max_results {
                return Flow::Stop;
            }
            matches.push(entry.path.clone());
        }
        Flow::Continue
    });

    matches.sort();
    debug!(count = matches.len(), truncated, "search_glob: returning");
    Ok(GlobSearch { matches, truncated })
}
