//! ToolContext - execution context for tools, and the path guard behind it

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::config::{LimitsConfig, ToolsConfig};
use crate::repo::exclude::ExcludeSet;
use crate::repo::hash::HashAlgorithm;

use super::ToolError;

/// The directories a session may touch
///
/// Built once from the directories the orchestration layer hands us (usually
/// just the clone root) and shared read-only afterwards. Each root is kept in
/// canonical form; a root that cannot be canonicalized falls back to its
/// literal absolute path instead of failing the whole session.
#[derive(Clone)]
pub struct AllowedRoots {
    roots: Arc<[PathBuf]>,
}

impl AllowedRoots {
    /// Resolve the allowed directories. The first one is the base for relative paths.
    pub fn new<I, P>(dirs: I) -> Result<Self, ToolError>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let roots: Vec<PathBuf> = dirs
            .into_iter()
            .map(|dir| {
                let dir: PathBuf = dir.into();
                let dir = expand_home(&dir);
                match dir.canonicalize() {
                    Ok(canonical) => canonical,
                    Err(e) => {
                        debug!(?dir, %e, "AllowedRoots::new: cannot canonicalize root, keeping literal path");
                        std::path::absolute(&dir)
                            .map(|abs| normalize_lexically(&abs))
                            .unwrap_or(dir)
                    }
                }
            })
            .collect();

        if roots.is_empty() {
            return Err(ToolError::NoAllowedRoots);
        }

        debug!(?roots, "AllowedRoots::new: resolved");
        Ok(Self { roots: roots.into() })
    }

    /// Canonical roots in the order they were supplied
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Base directory for relative paths (the first root)
    pub fn base(&self) -> &Path {
        &self.roots[0]
    }

    /// Segment-aware containment check against every root
    pub fn contains(&self, path: &Path) -> bool {
        self.roots.iter().any(|root| path.starts_with(root))
    }

    /// Validate a caller-supplied path and return its canonical form
    ///
    /// Containment is always checked on the symlink-resolved path. A path that
    /// does not exist yet is accepted when its canonical parent is contained.
    pub fn validate(&self, requested: &Path) -> Result<PathBuf, ToolError> {
        debug!(?requested, "AllowedRoots::validate: called");
        let expanded = expand_home(requested);
        let absolute = if expanded.is_absolute() {
            normalize_lexically(&expanded)
        } else {
            normalize_lexically(&self.base().join(&expanded))
        };

        match absolute.canonicalize() {
            Ok(real) => {
                if self.contains(&real) {
                    debug!(?real, "AllowedRoots::validate: path is within allowed roots");
                    Ok(real)
                } else {
                    debug!(?real, "AllowedRoots::validate: sandbox violation detected");
                    Err(self.denied(real))
                }
            }
            Err(e) => match absolute.symlink_metadata() {
                // The link exists but its target does not resolve, so there is nothing to check
                Ok(meta) if meta.file_type().is_symlink() => {
                    debug!(?absolute, "AllowedRoots::validate: dangling symlink");
                    Err(self.denied(absolute))
                }
                Ok(_) => Err(ToolError::Io(e)),
                Err(_) => self.validate_new_path(&absolute),
            },
        }
    }

    /// [`validate`](Self::validate) on the blocking pool, for async callers
    pub async fn validate_async(&self, requested: &Path) -> Result<PathBuf, ToolError> {
        let roots = self.clone();
        let requested = requested.to_path_buf();
        super::run_blocking(move || roots.validate(&requested)).await
    }

    fn validate_new_path(&self, absolute: &Path) -> Result<PathBuf, ToolError> {
        debug!(?absolute, "AllowedRoots::validate_new_path: path does not exist, checking parent");
        let parent = match absolute.parent() {
            Some(parent) => parent,
            None => {
                return Err(ToolError::ParentNotFound {
                    parent: absolute.to_path_buf(),
                });
            }
        };

        let real_parent = parent.canonicalize().map_err(|_| ToolError::ParentNotFound {
            parent: parent.to_path_buf(),
        })?;

        if !self.contains(&real_parent) {
            debug!(?real_parent, "AllowedRoots::validate_new_path: parent outside allowed roots");
            return Err(self.denied(real_parent));
        }

        Ok(match absolute.file_name() {
            Some(name) => real_parent.join(name),
            None => real_parent,
        })
    }

    fn denied(&self, path: PathBuf) -> ToolError {
        ToolError::AccessDenied {
            path,
            allowed: self.roots.to_vec(),
        }
    }
}

impl std::fmt::Debug for AllowedRoots {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.roots.iter()).finish()
    }
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) if rest.as_os_str().is_empty() => home,
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

/// Resolve `.` and `..` without touching the filesystem
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(name) => out.push(name),
        }
    }
    out
}

/// Execution context for tools - scoped to one analysis session
///
/// Each session (one cloned repository) gets its own `ToolContext`. Sessions
/// for different clones can run side by side in one process because nothing
/// here is global.
#[derive(Clone)]
pub struct ToolContext {
    roots: AllowedRoots,

    /// Exclusion globs merged into every walk
    pub default_excludes: Vec<String>,

    /// Algorithm for checksum tools when the call names none
    pub default_algorithm: HashAlgorithm,

    /// Result limits
    pub limits: LimitsConfig,
}

impl ToolContext {
    /// Create a new tool context with default settings
    pub fn new(roots: AllowedRoots) -> Self {
        Self::with_config(roots, &ToolsConfig::default())
    }

    /// Create a tool context from configuration
    pub fn with_config(roots: AllowedRoots, config: &ToolsConfig) -> Self {
        debug!(?roots, "ToolContext::with_config: called");
        Self {
            roots,
            default_excludes: config.default_excludes.clone(),
            default_algorithm: config.default_algorithm,
            limits: config.limits.clone(),
        }
    }

    /// The allowed roots for this session
    pub fn roots(&self) -> &AllowedRoots {
        &self.roots
    }

    /// Validate path is within the allowed roots (sandbox enforcement)
    pub fn validate_path(&self, path: &Path) -> Result<PathBuf, ToolError> {
        self.roots.validate(path)
    }

    /// Build the exclusion set for a call: defaults first, then the caller's patterns
    pub fn excludes(&self, caller: &[String]) -> Result<ExcludeSet, ToolError> {
        let patterns: Vec<String> = self.default_excludes.iter().chain(caller).cloned().collect();
        ExcludeSet::new(&patterns)
    }
}

impl std::fmt::Debug for ToolContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolContext")
            .field("roots", &self.roots)
            .field("default_excludes", &self.default_excludes)
            .finish()
    }
}
