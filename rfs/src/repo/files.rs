//! Plain file access: batch reads, directory listings and metadata

use chrono::{DateTime, SecondsFormat, Utc};
use futures::future::join_all;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

/// Content (or failure) for one requested file
#[derive(Debug)]
pub struct FileRead {
    /// The path as the caller gave it
    pub path: PathBuf,
    pub result: Result<String, ToolError>,
}

/// Read several files concurrently; results come back in input order
pub async fn read_files(paths: &[PathBuf], roots: &AllowedRoots) -> Vec<FileRead> {
    debug!(count = paths.len(), "read_files: called");
    join_all(paths.iter().map(|path| async move {
        let result = match roots.validate_async(path).await {
            Ok(valid) => tokio::fs::read_to_string(&valid).await.map_err(ToolError::from),
            Err(e) => Err(e),
        };
        FileRead {
            path: path.clone(),
            result,
        }
    }))
    .await
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntryInfo {
    pub name: String,
    pub is_dir: bool,
}

/// Entries of one directory, sorted by name
pub fn list_directory(path: &Path, roots: &AllowedRoots) -> Result<Vec<DirEntryInfo>, ToolError> {
    debug!(?path, "list_directory: called");
    let valid = roots.validate(path)?;
    if !valid.is_dir() {
        return Err(ToolError::NotADirectory { path: path.to_path_buf() });
    }

    let mut entries = Vec::new();
    for entry in fs::read_dir(&valid)? {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                debug!(%e, "list_directory: skipping unreadable entry");
                continue;
            }
        };
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        entries.push(DirEntryInfo {
            name: entry.file_name().to_string_lossy().to_string(),
            is_dir,
        });
    }

    entries.sort_by(|a, b| a.name.cmp(&b.name));
    debug!(count = entries.len(), "list_directory: returning");
    Ok(entries)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    File,
    Directory,
    Other,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
            Self::Other => "other",
        }
    }
}

/// Metadata for one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileInfo {
    /// The path as the caller gave it
    pub path: PathBuf,
    pub size: u64,
    pub kind: FileKind,
    /// Not every filesystem records creation time
    pub created: Option<DateTime<Utc>>,
    pub modified: Option<DateTime<Utc>>,
    pub accessed: Option<DateTime<Utc>>,
    /// Permission bits as three octal digits, e.g. `644`
    pub permissions: String,
}

impl FileInfo {
    /// `key: value` lines
    pub fn to_lines(&self) -> String {
        [
            ("path", self.path.display().to_string()),
            ("size", format!("{} bytes", self.size)),
            ("type", self.kind.as_str().to_string()),
            ("created", format_time(self.created)),
            ("modified", format_time(self.modified)),
            ("accessed", format_time(self.accessed)),
            ("permissions", self.permissions.clone()),
        ]
        .iter()
        .map(|(key, value)| format!("{key}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
    }
}

fn format_time(time: Option<DateTime<Utc>>) -> String {
    time.map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_else(|| "unknown".to_string())
}

fn to_utc(time: std::io::Result<SystemTime>) -> Option<DateTime<Utc>> {
    time.ok().map(DateTime::<Utc>::from)
}

/// Stat a validated path
pub fn file_info(path: &Path, roots: &AllowedRoots) -> Result<FileInfo, ToolError> {
    debug!(?path, "file_info: called");
    let valid = roots.validate(path)?;
    let metadata = fs::metadata(&valid)?;

    let kind = if metadata.is_dir() {
        FileKind::Directory
    } else if metadata.is_file() {
        FileKind::File
    } else {
        FileKind::Other
    };

    Ok(FileInfo {
        path: path.to_path_buf(),
        size: metadata.len(),
        kind,
        created: to_utc(metadata.created()),
        modified: to_utc(metadata.modified()),
        accessed: to_utc(metadata.accessed()),
        permissions: permission_bits(&metadata),
    })
}

#[cfg(unix)]
fn permission_bits(metadata: &fs::Metadata) -> String {
    use std::os::unix::fs::PermissionsExt;
    format!("{:03o}", metadata.permissions().mode() & 0o777)
}

#[cfg(not(unix))]
fn permission_bits(metadata: &fs::Metadata) -> String {
    if metadata.permissions().readonly() { "444" } else { "666" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn roots_for(path: &Path) -> AllowedRoots {
        AllowedRoots::new([path.to_path_buf()]).unwrap()
    }

    #[tokio::test]
    async fn test_read_files_in_order_with_errors() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "alpha").unwrap();
        fs::write(temp.path().join("b.txt"), "beta").unwrap();

        let paths = vec![
            PathBuf::from("b.txt"),
            PathBuf::from("/etc/passwd"),
            PathBuf::from("a.txt"),
            PathBuf::from("missing.txt"),
        ];
        let reads = read_files(&paths, &roots_for(temp.path())).await;

        assert_eq!(reads.len(), 4);
        assert_eq!(reads[0].result.as_ref().unwrap(), "beta");
        assert!(reads[1].result.as_ref().unwrap_err().is_access_denied());
        assert_eq!(reads[2].result.as_ref().unwrap(), "alpha");
        assert!(matches!(reads[3].result, Err(ToolError::Io(_))));
        assert_eq!(reads[3].path, PathBuf::from("missing.txt"));
    }

    #[test]
    fn test_list_directory_sorted() {
        let temp = tempdir().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();
        fs::write(temp.path().join(".gitignore"), "").unwrap();

        let entries = list_directory(Path::new("."), &roots_for(temp.path())).unwrap();

        assert_eq!(
            entries,
            vec![
                DirEntryInfo {
                    name: ".gitignore".into(),
                    is_dir: false
                },
                DirEntryInfo {
                    name: "README.md".into(),
                    is_dir: false
                },
                DirEntryInfo {
                    name: "src".into(),
                    is_dir: true
                },
            ]
        );
    }

    #[test]
    fn test_list_directory_on_file() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "").unwrap();

        let result = list_directory(Path::new("a.txt"), &roots_for(temp.path()));
        assert!(matches!(result, Err(ToolError::NotADirectory { .. })));
    }

    #[test]
    fn test_file_info() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("a.txt"), "12345").unwrap();

        let info = file_info(Path::new("a.txt"), &roots_for(temp.path())).unwrap();

        assert_eq!(info.size, 5);
        assert_eq!(info.kind, FileKind::File);
        assert!(info.modified.is_some());
        assert_eq!(info.permissions.len(), 3);

        let text = info.to_lines();
        assert!(text.starts_with("path: a.txt\nsize: 5 bytes\ntype: file\n"));
        assert!(text.contains("\nmodified: "));
        assert!(text.contains("\npermissions: "));
    }

    #[cfg(unix)]
    #[test]
    fn test_file_info_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp = tempdir().unwrap();
        let path = temp.path().join("script.sh");
        fs::write(&path, "").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o754)).unwrap();

        let info = file_info(Path::new("script.sh"), &roots_for(temp.path())).unwrap();
        assert_eq!(info.permissions, "754");
    }

    #[test]
    fn test_file_info_directory() {
        let temp = tempdir().unwrap();

        let info = file_info(Path::new("."), &roots_for(temp.path())).unwrap();
        assert_eq!(info.kind, FileKind::Directory);
    }

    #[test]
    fn test_format_time_iso() {
        let time = DateTime::parse_from_rfc3339("2024-05-01T12:30:00Z").unwrap().with_timezone(&Utc);
        assert_eq!(format_time(Some(time)), "2024-05-01T12:30:00.000Z");
        assert_eq!(format_time(None), "unknown");
    }
}
