//! Exclusion globs shared by every directory walk

use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::debug;

use crate::tools::ToolError;

use super::to_slash;

/// Exclusions ignore case and match dot-files like any other name
const EXCLUDE_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// A compiled set of exclusion patterns
///
/// Patterns are matched against the path relative to the walk root. A bare
/// word (no `*` or `?`) is rewritten so it excludes matching path segments
/// anywhere in the tree: `name` becomes `**/*name*/**` and `some/path`
/// becomes `**/some/path/**`. Patterns without a `/` after rewriting match the
/// base name only.
#[derive(Debug, Clone, Default)]
pub struct ExcludeSet {
    patterns: Vec<ExcludePattern>,
}

#[derive(Debug, Clone)]
struct ExcludePattern {
    full: Pattern,
    /// `foo/**` minus the trailing `/**`, so the directory `foo` itself is excluded too
    dir_form: Option<Pattern>,
    base_name_only: bool,
}

impl ExcludeSet {
    /// Compile exclusion patterns; empty patterns are ignored
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self, ToolError> {
        let mut compiled = Vec::with_capacity(patterns.len());

        for raw in patterns {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }

            let rewritten = rewrite_bare_pattern(raw);
            debug!(%raw, %rewritten, "ExcludeSet::new: compiling pattern");

            let full = compile(&rewritten)?;
            let dir_form = match rewritten.strip_suffix("/**") {
                Some(prefix) if !prefix.is_empty() => Some(compile(prefix)?),
                _ => None,
            };

            compiled.push(ExcludePattern {
                full,
                dir_form,
                base_name_only: !rewritten.contains('/'),
            });
        }

        Ok(Self { patterns: compiled })
    }

    /// An exclusion set that excludes nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether an entry (given relative to the walk root) is excluded
    pub fn is_excluded(&self, relative: &Path, is_dir: bool) -> bool {
        let rel = to_slash(relative);
        if rel.is_empty() {
            return false;
        }
        let name = relative
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| rel.clone());

        self.patterns.iter().any(|p| {
            let target = if p.base_name_only { name.as_str() } else { rel.as_str() };
            p.full.matches_with(target, EXCLUDE_OPTIONS)
                || (is_dir && p.dir_form.as_ref().is_some_and(|d| d.matches_with(target, EXCLUDE_OPTIONS)))
        })
    }
}

/// Rewrite a bare word into a match-anywhere directory pattern
///
/// This is a heuristic: `git` also excludes `.github/`, and a bare file name
/// only excludes things underneath a directory of that name.
pub fn rewrite_bare_pattern(pattern: &str) -> String {
    if pattern.contains('*') || pattern.contains('?') {
        return pattern.to_string();
    }

    let body = pattern.trim_matches('/');
    if pattern.contains('/') {
        format!("**/{body}/**")
    } else {
        format!("**/*{body}*/**")
    }
}

fn compile(pattern: &str) -> Result<Pattern, ToolError> {
    Pattern::new(pattern).map_err(|e| ToolError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })
}
