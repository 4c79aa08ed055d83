//! Built-in read-only filesystem tools

mod checksum;
mod count_lines;
mod diff;
mod directory_tree;
mod file_info;
mod list_directory;
mod read_files;
mod search_files;
mod search_glob;
mod search_regex;

pub use checksum::{ChecksumFilesTool, ChecksumVerifyTool};
pub use count_lines::CountLinesTool;
pub use diff::{ContentDiffTool, FileDiffTool};
pub use directory_tree::DirectoryTreeTool;
pub use file_info::FileInfoTool;
pub use list_directory::ListDirectoryTool;
pub use read_files::ReadFilesTool;
pub use search_files::SearchFilesTool;
pub use search_glob::SearchGlobTool;
pub use search_regex::SearchRegexTool;

#[cfg(test)]
pub(crate) fn test_context(root: &std::path::Path) -> crate::tools::ToolContext {
    crate::tools::ToolContext::new(crate::tools::AllowedRoots::new([root]).expect("root"))
}
