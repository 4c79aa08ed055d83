//! Shared recursive walk used by the tree, the search tools and the line counter

use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::tools::AllowedRoots;

use super::ExcludeSet;

/// What kind of filesystem object an entry is
///
/// Symlinks are never followed by the walk; they only show up as entries
/// when their target resolves inside the allowed roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    Symlink,
    Other,
}

/// One validated, non-excluded entry of a walk
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Full path as reached from the walk root
    pub path: PathBuf,
    /// Path relative to the walk root
    pub relative: PathBuf,
    pub kind: EntryKind,
}

impl WalkEntry {
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }

    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Tells the walker whether to keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Stop,
}

/// Depth-first walk below a validated root
///
/// Every candidate goes through the path guard; entries that fail validation
/// or match an exclusion are skipped, and skipped directories are not
/// descended into. Unreadable entries are skipped as well. Entries come in
/// file-name order within each directory.
pub struct RepoWalker<'a> {
    root: &'a Path,
    roots: &'a AllowedRoots,
    excludes: &'a ExcludeSet,
}

impl<'a> RepoWalker<'a> {
    /// `root` must already be validated (canonical)
    pub fn new(root: &'a Path, roots: &'a AllowedRoots, excludes: &'a ExcludeSet) -> Self {
        Self { root, roots, excludes }
    }

    /// Visit every entry until the visitor says stop. Returns true if stopped early.
    pub fn walk<F>(&self, mut visit: F) -> bool
    where
        F: FnMut(&WalkEntry) -> Flow,
    {
        debug!(root = ?self.root, "RepoWalker::walk: called");
        let mut it = WalkDir::new(self.root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter();

        loop {
            let entry = match it.next() {
                None => return false,
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    debug!(%e, "RepoWalker::walk: skipping unreadable entry");
                    continue;
                }
            };

            let file_type = entry.file_type();
            let is_dir = file_type.is_dir();

            if let Err(e) = self.roots.validate(entry.path()) {
                debug!(path = ?entry.path(), %e, "RepoWalker::walk: skipping invalid path");
                if is_dir {
                    it.skip_current_dir();
                }
                continue;
            }

            let relative = entry.path().strip_prefix(self.root).unwrap_or(entry.path()).to_path_buf();
            if self.excludes.is_excluded(&relative, is_dir) {
                debug!(?relative, "RepoWalker::walk: excluded");
                if is_dir {
                    it.skip_current_dir();
                }
                continue;
            }

            let kind = if is_dir {
                EntryKind::Directory
            } else if file_type.is_file() {
                EntryKind::File
            } else if file_type.is_symlink() {
                EntryKind::Symlink
            } else {
                EntryKind::Other
            };

            let item = WalkEntry {
                path: entry.path().to_path_buf(),
                relative,
                kind,
            };

            if visit(&item) == Flow::Stop {
                debug!("RepoWalker::walk: stopped early");
                return true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repo::to_slash;
    use std::fs;
    use tempfile::tempdir;

    fn collect(root: &Path, excludes: &ExcludeSet) -> Vec<String> {
        let root = root.canonicalize().unwrap();
        let roots = AllowedRoots::new([root.clone()]).unwrap();
        let mut seen = Vec::new();
        RepoWalker::new(&root, &roots, excludes).walk(|e| {
            seen.push(to_slash(&e.relative));
            Flow::Continue
        });
        seen
    }

    #[test]
    fn test_walk_in_name_order() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("b")).unwrap();
        fs::write(temp.path().join("b/inner.txt"), "").unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();
        fs::write(temp.path().join("c.txt"), "").unwrap();

        let seen = collect(temp.path(), &ExcludeSet::empty());
        assert_eq!(seen, vec!["a.txt", "b", "b/inner.txt", "c.txt"]);
    }

    #[test]
    fn test_excluded_directories_are_not_entered() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join(".git/objects")).unwrap();
        fs::write(temp.path().join(".git/objects/abc"), "").unwrap();
        fs::write(temp.path().join("main.rs"), "").unwrap();

        let excludes = ExcludeSet::new(&["**/.git/**"]).unwrap();
        let seen = collect(temp.path(), &excludes);
        assert_eq!(seen, vec!["main.rs"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_escaping_symlinks_are_skipped() {
        let outside = tempdir().unwrap();
        fs::write(outside.path().join("host.txt"), "").unwrap();
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("real.txt"), "").unwrap();
        std::os::unix::fs::symlink(outside.path(), temp.path().join("escape")).unwrap();
        std::os::unix::fs::symlink(temp.path().join("real.txt"), temp.path().join("alias.txt")).unwrap();

        let seen = collect(temp.path(), &ExcludeSet::empty());
        assert_eq!(seen, vec!["alias.txt", "real.txt"]);
    }

    #[test]
    fn test_stop_early() {
        let temp = tempdir().unwrap();
        for i in 0..10 {
            fs::write(temp.path().join(format!("f{i}.txt")), "").unwrap();
        }
        let root = temp.path().canonicalize().unwrap();
        let roots = AllowedRoots::new([root.clone()]).unwrap();
        let excludes = ExcludeSet::empty();

        let mut visited = 0;
        let stopped = RepoWalker::new(&root, &roots, &excludes).walk(|_| {
            visited += 1;
            if visited == 3 { Flow::Stop } else { Flow::Continue }
        });

        assert!(stopped);
        assert_eq!(visited, 3);
    }
}
