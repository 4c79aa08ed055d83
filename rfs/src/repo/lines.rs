//! Line counting for single files and directory trees

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

use super::walk::{Flow, RepoWalker};
use super::{ExcludeSet, GLOB_OPTIONS, compile_glob, to_slash};

#[derive(Debug, Clone)]
pub struct CountOptions {
    /// Required to count a directory
    pub recursive: bool,
    /// Also count lines matching this regex (case-sensitive)
    pub line_pattern: Option<String>,
    /// Files in a directory count when their base name or relative path matches
    pub file_glob: String,
    /// Skip whitespace-only lines in both counts
    pub ignore_empty_lines: bool,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            recursive: false,
            line_pattern: None,
            file_glob: "**".to_string(),
            ignore_empty_lines: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCountResult {
    pub file: PathBuf,
    pub total_lines: usize,
    /// Present when a line pattern was given
    pub matching_lines: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineCountReport {
    /// Sorted by descending line count, then path
    pub files: Vec<LineCountResult>,
    pub total_lines: usize,
    pub total_matching: Option<usize>,
}

impl LineCountReport {
    fn from_results(mut files: Vec<LineCountResult>, with_pattern: bool) -> Self {
        files.sort_by(|a, b| b.total_lines.cmp(&a.total_lines).then_with(|| a.file.cmp(&b.file)));
        let total_lines = files.iter().map(|f| f.total_lines).sum();
        let total_matching = with_pattern.then(|| files.iter().filter_map(|f| f.matching_lines).sum());
        Self {
            files,
            total_lines,
            total_matching,
        }
    }
}

/// Count lines in a file, or in every matching file below a directory
pub fn count_lines(
    path: &Path,
    options: &CountOptions,
    excludes: &ExcludeSet,
    roots: &AllowedRoots,
) -> Result<LineCountReport, ToolError> {
    debug!(?path, ?options, "count_lines: called");
    let valid = roots.validate(path)?;

    let line_regex = options
        .line_pattern
        .as_deref()
        .filter(|p| !p.is_empty())
        .map(|p| {
            Regex::new(p).map_err(|e| ToolError::InvalidPattern {
                pattern: p.to_string(),
                reason: e.to_string(),
            })
        })
        .transpose()?;
    let with_pattern = line_regex.is_some();

    let metadata = fs::metadata(&valid)?;
    let results = if metadata.is_file() {
        let content = fs::read_to_string(&valid)?;
        vec![count_content(&valid, &content, line_regex.as_ref(), options.ignore_empty_lines)]
    } else if metadata.is_dir() {
        if !options.recursive {
            return Err(ToolError::NotRecursive { path: path.to_path_buf() });
        }
        count_directory(&valid, options, line_regex.as_ref(), excludes, roots)?
    } else {
        return Err(ToolError::NotFileOrDirectory { path: path.to_path_buf() });
    };

    let report = LineCountReport::from_results(results, with_pattern);
    debug!(files = report.files.len(), total_lines = report.total_lines, "count_lines: returning");
    Ok(report)
}

fn count_directory(
    root: &Path,
    options: &CountOptions,
    line_regex: Option<&Regex>,
    excludes: &ExcludeSet,
    roots: &AllowedRoots,
) -> Result<Vec<LineCountResult>, ToolError> {
    let file_glob = compile_glob(&options.file_glob)?;

    let mut results = Vec::new();
    RepoWalker::new(root, roots, excludes).walk(|entry| {
        if !entry.is_file() {
            return Flow::Continue;
        }
        if !file_glob.matches_with(&entry.name(), GLOB_OPTIONS)
            && !file_glob.matches_with(&to_slash(&entry.relative), GLOB_OPTIONS)
        {
            return Flow::Continue;
        }

        match fs::read_to_string(&entry.path) {
            Ok(content) => results.push(count_content(&entry.path, &content, line_regex, options.ignore_empty_lines)),
            Err(e) => debug!(path = ?entry.path, %e, "count_directory: skipping unreadable file"),
        }
        Flow::Continue
    });

    Ok(results)
}

/// Count the lines of `content`; a trailing newline does not start a new line
pub fn count_content(file: &Path, content: &str, line_regex: Option<&Regex>, ignore_empty_lines: bool) -> LineCountResult {
    LineCountResult {
        file: file.to_path_buf(),
        total_lines: counted_lines(content, ignore_empty_lines).count(),
        matching_lines: line_regex.map(|re| {
            counted_lines(content, ignore_empty_lines)
                .filter(|line| re.is_match(line))
                .count()
        }),
    }
}

fn counted_lines(content: &str, ignore_empty_lines: bool) -> impl Iterator<Item = &str> {
    content
        .lines()
        .filter(move |line| !ignore_empty_lines || !line.trim().is_empty())
}
