//! Recursive directory tree with exclusions and empty-directory pruning

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

use super::ExcludeSet;
use super::walk::{Flow, RepoWalker, WalkEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeEntryKind {
    File,
    Directory,
}

/// One node of a directory tree
///
/// Directories always carry `children` and are never empty: a directory with
/// nothing left after filtering is dropped from its parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: TreeEntryKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<TreeEntry>>,
}

impl TreeEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: TreeEntryKind::File,
            children: None,
        }
    }

    pub fn directory(name: impl Into<String>, children: Vec<TreeEntry>) -> Self {
        Self {
            name: name.into(),
            kind: TreeEntryKind::Directory,
            children: Some(children),
        }
    }

    /// Count files in this subtree
    pub fn file_count(&self) -> usize {
        match &self.children {
            Some(children) => children.iter().map(TreeEntry::file_count).sum(),
            None => 1,
        }
    }
}

/// Build the tree below `path`
///
/// Errors validating the starting directory are returned. Below it the shared
/// walk applies validation and exclusions, and symlinks are listed as files
/// without being followed.
pub fn build_tree(path: &Path, excludes: &ExcludeSet, roots: &AllowedRoots) -> Result<Vec<TreeEntry>, ToolError> {
    debug!(?path, "build_tree: called");
    let root = roots.validate(path)?;
    if !root.is_dir() {
        return Err(ToolError::NotADirectory { path: path.to_path_buf() });
    }

    let mut builder = TreeBuilder::default();
    RepoWalker::new(&root, roots, excludes).walk(|entry| {
        builder.push(entry);
        Flow::Continue
    });
    let entries = builder.finish();

    debug!(
        top_level = entries.len(),
        files = entries.iter().map(TreeEntry::file_count).sum::<usize>(),
        "build_tree: returning"
    );
    Ok(entries)
}

/// Assembles nested entries from a depth-first, pre-order walk
///
/// `open[0]` holds the top-level entries; each deeper slot is a directory
/// whose children are still arriving.
struct TreeBuilder {
    open: Vec<(String, Vec<TreeEntry>)>,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self {
            open: vec![(String::new(), Vec::new())],
        }
    }
}

impl TreeBuilder {
    fn push(&mut self, entry: &WalkEntry) {
        let depth = entry.relative.components().count();
        self.close_to(depth);

        if entry.is_dir() {
            self.open.push((entry.name(), Vec::new()));
        } else if let Some((_, children)) = self.open.last_mut() {
            children.push(TreeEntry::file(entry.name()));
        }
    }

    /// Close open directories until the one at `depth - 1` is on top
    fn close_to(&mut self, depth: usize) {
        while self.open.len() > depth.max(1) {
            let Some((name, children)) = self.open.pop() else {
                return;
            };
            if children.is_empty() {
                continue;
            }
            if let Some((_, parent)) = self.open.last_mut() {
                parent.push(TreeEntry::directory(name, children));
            }
        }
    }

    fn finish(mut self) -> Vec<TreeEntry> {
        self.close_to(1);
        self.open.pop().map(|(_, entries)| entries).unwrap_or_default()
    }
}
