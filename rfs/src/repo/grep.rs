//! Regex content search across a repository walk

use glob::{MatchOptions, Pattern};
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

use super::walk::{Flow, RepoWalker};
use super::{ExcludeSet, compile_glob};

/// File-name allowlist globs ignore case
const FILE_PATTERN_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
pub struct RegexSearchOptions {
    /// Only search files whose base name matches one of these globs (all files if empty)
    pub file_patterns: Vec<String>,
    pub max_results: usize,
    pub case_sensitive: bool,
}

impl Default for RegexSearchOptions {
    fn default() -> Self {
        Self {
            file_patterns: Vec::new(),
            max_results: crate::DEFAULT_REGEX_MAX_RESULTS,
            case_sensitive: false,
        }
    }
}

/// One regex hit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchMatch {
    pub file: PathBuf,
    /// 1-based line of the match start
    pub line: usize,
    pub matched_text: String,
    /// The whole line containing the match start, trimmed
    pub context: String,
}

#[derive(Debug, Clone, Default)]
pub struct RegexSearch {
    /// Matches in discovery order
    pub matches: Vec<SearchMatch>,
    pub files_searched: usize,
    /// More matches existed than `max_results`
    pub truncated: bool,
}

impl RegexSearch {
    pub fn total_matches(&self) -> usize {
        self.matches.len()
    }

    /// Matches grouped by file, keeping discovery order
    pub fn by_file(&self) -> Vec<(&Path, Vec<&SearchMatch>)> {
        let mut groups: Vec<(&Path, Vec<&SearchMatch>)> = Vec::new();
        for m in &self.matches {
            match groups.last_mut() {
                Some((file, group)) if *file == m.file.as_path() => group.push(m),
                _ => groups.push((m.file.as_path(), vec![m])),
            }
        }
        groups
    }
}

/// Compile a content pattern with multi-line semantics
///
/// `^` and `$` treat `\r\n` as a line break, so anchored patterns work on
/// CRLF files too.
pub fn compile_regex(pattern: &str, case_sensitive: bool) -> Result<Regex, ToolError> {
    RegexBuilder::new(pattern)
        .multi_line(true)
        .crlf(true)
        .case_insensitive(!case_sensitive)
        .build()
        .map_err(|e| ToolError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })
}

/// Search file contents below `path`
///
/// The pattern is compiled before anything is read, so a bad pattern never
/// starts a walk. Files that cannot be read as UTF-8 are counted as searched
/// and otherwise skipped.
pub fn search_regex(
    path: &Path,
    pattern: &str,
    options: &RegexSearchOptions,
    excludes: &ExcludeSet,
    roots: &AllowedRoots,
) -> Result<RegexSearch, ToolError> {
    debug!(?path, %pattern, ?options, "search_regex: called");
    let regex = compile_regex(pattern, options.case_sensitive)?;
    let file_patterns = options
        .file_patterns
        .iter()
        .filter(|p| !p.trim().is_empty())
        .map(|p| compile_glob(p))
        .collect::<Result<Vec<Pattern>, _>>()?;
    let root = roots.validate(path)?;
    let max_results = options.max_results.max(1);

    let mut search = RegexSearch::default();
    let truncated = RepoWalker::new(&root, roots, excludes).walk(|entry| {
        if !entry.is_file() {
            return Flow::Continue;
        }

        let name = entry.name();
        if !file_patterns.is_empty() && !file_patterns.iter().any(|p| p.matches_with(&name, FILE_PATTERN_OPTIONS)) {
            return Flow::Continue;
        }

        search.files_searched += 1;
        let content = match fs::read_to_string(&entry.path) {
            Ok(c) => c,
            Err(e) => {
                debug!(path = ?entry.path, %e, "search_regex: skipping unreadable file");
                return Flow::Continue;
            }
        };

        let mut lines = LineLocator::new(&content);
        for m in regex.find_iter(&content) {
            // One match past the cap proves the results were cut short
            if search.matches.len() >= max_results {
                return Flow::Stop;
            }
            let (line, context) = lines.locate(m.start());
            search.matches.push(SearchMatch {
                file: entry.path.clone(),
                line,
                matched_text: m.as_str().to_string(),
                context: context.trim().to_string(),
            });
        }

        Flow::Continue
    });
    search.truncated = truncated;

    debug!(
        matches = search.matches.len(),
        files_searched = search.files_searched,
        truncated = search.truncated,
        "search_regex: returning"
    );
    Ok(search)
}

/// Maps byte offsets to lines, for offsets given in increasing order
struct LineLocator<'a> {
    content: &'a str,
    line: usize,
    line_start: usize,
}

impl<'a> LineLocator<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            content,
            line: 1,
            line_start: 0,
        }
    }

    /// 1-based line number and text of the line containing `offset`
    fn locate(&mut self, offset: usize) -> (usize, &'a str) {
        let content = self.content;
        while let Some(nl) = content[self.line_start..].find('\n') {
            let line_end = self.line_start + nl;
            if line_end >= offset {
                break;
            }
            self.line += 1;
            self.line_start = line_end + 1;
        }

        let rest = &content[self.line_start..];
        let text = rest.split('\n').next().unwrap_or_default();
        (self.line, text)
    }
}
