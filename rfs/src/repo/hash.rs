//! File digests, batch checksums and checksum verification

use futures::future::join_all;
use md5::Md5;
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha256, Sha512};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::tools::{AllowedRoots, ToolError};

/// Supported digest algorithms
///
/// md5 and sha1 are kept for comparing against published checksums, not for
/// anything security related.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    Md5,
    Sha1,
    #[default]
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [Self::Md5, Self::Sha1, Self::Sha256, Self::Sha512];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
            Self::Sha512 => "sha512",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HashAlgorithm {
    type Err = ToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                ToolError::InvalidArgument(format!("unknown hash algorithm '{s}', expected one of md5, sha1, sha256, sha512"))
            })
    }
}

/// Lowercase hex digest of `data`
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> String {
    fn hex<D: Digest>(data: &[u8]) -> String {
        D::digest(data).iter().map(|b| format!("{b:02x}")).collect()
    }

    match algorithm {
        HashAlgorithm::Md5 => hex::<Md5>(data),
        HashAlgorithm::Sha1 => hex::<Sha1>(data),
        HashAlgorithm::Sha256 => hex::<Sha256>(data),
        HashAlgorithm::Sha512 => hex::<Sha512>(data),
    }
}

/// Validate `path` and hash its contents
pub async fn hash_file(path: &Path, algorithm: HashAlgorithm, roots: &AllowedRoots) -> Result<String, ToolError> {
    let valid = roots.validate_async(path).await?;
    let data = tokio::fs::read(&valid).await?;
    Ok(hash_bytes(&data, algorithm))
}

/// Compare two hex digests ignoring surrounding whitespace and case
pub fn hashes_match(actual: &str, expected: &str) -> bool {
    actual.trim().eq_ignore_ascii_case(expected.trim())
}

/// Digest (or failure) for one requested path
#[derive(Debug)]
pub struct HashResult {
    pub path: PathBuf,
    pub algorithm: HashAlgorithm,
    pub result: Result<String, ToolError>,
}

/// Hash every path concurrently; results come back in input order
pub async fn checksum_files(paths: &[PathBuf], algorithm: HashAlgorithm, roots: &AllowedRoots) -> Vec<HashResult> {
    debug!(count = paths.len(), %algorithm, "checksum_files: called");
    join_all(paths.iter().map(|path| async move {
        HashResult {
            path: path.clone(),
            algorithm,
            result: hash_file(path, algorithm, roots).await,
        }
    }))
    .await
}

/// One file and the digest it is expected to have
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub path: PathBuf,
    pub expected_hash: String,
}

/// A file whose digest did not match
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub expected: String,
    pub actual: String,
}

/// Outcome of verifying a batch of checksums
#[derive(Debug, Default)]
pub struct VerificationReport {
    pub algorithm: HashAlgorithm,
    pub valid: Vec<PathBuf>,
    pub invalid: Vec<Mismatch>,
    pub errors: Vec<(PathBuf, ToolError)>,
}

impl VerificationReport {
    pub fn total(&self) -> usize {
        self.valid.len() + self.invalid.len() + self.errors.len()
    }

    pub fn all_valid(&self) -> bool {
        self.invalid.is_empty() && self.errors.is_empty()
    }
}

/// Hash each file concurrently and sort it into valid, invalid or errors
pub async fn verify_checksums(
    requests: &[VerifyRequest],
    algorithm: HashAlgorithm,
    roots: &AllowedRoots,
) -> VerificationReport {
    debug!(count = requests.len(), %algorithm, "verify_checksums: called");
    let results = join_all(requests.iter().map(|req| hash_file(&req.path, algorithm, roots))).await;

    let mut report = VerificationReport {
        algorithm,
        ..Default::default()
    };
    for (req, result) in requests.iter().zip(results) {
        match result {
            Ok(actual) if hashes_match(&actual, &req.expected_hash) => report.valid.push(req.path.clone()),
            Ok(actual) => report.invalid.push(Mismatch {
                path: req.path.clone(),
                expected: req.expected_hash.clone(),
                actual,
            }),
            Err(e) => report.errors.push((req.path.clone(), e)),
        }
    }

    debug!(
        total = report.total(),
        valid = report.valid.len(),
        invalid = report.invalid.len(),
        errors = report.errors.len(),
        all_valid = report.all_valid(),
        "verify_checksums: returning"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_known_digests() {
        assert_eq!(hash_bytes(b"abc", HashAlgorithm::Md5), "900150983cd24fb0d6963f7d28e17f72");
        assert_eq!(
            hash_bytes(b"abc", HashAlgorithm::Sha1),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hash_bytes(b"abc", HashAlgorithm::Sha256),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(
            hash_bytes(b"abc", HashAlgorithm::Sha512),
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f"
        );
    }

    #[test]
    fn test_digest_bytes_are_zero_padded() {
        assert_eq!(hash_bytes(b"", HashAlgorithm::Md5), "d41d8cd98f00b204e9800998ecf8427e");
        for algorithm in HashAlgorithm::ALL {
            let digest = hash_bytes(b"", algorithm);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
        assert_eq!(hash_bytes(b"", HashAlgorithm::Sha1).len(), 40);
        assert_eq!(hash_bytes(b"", HashAlgorithm::Sha256).len(), 64);
    }

    #[test]
    fn test_algorithm_parsing() {
        assert_eq!("md5".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Md5);
        assert_eq!("SHA512".parse::<HashAlgorithm>().unwrap(), HashAlgorithm::Sha512);
        assert!("crc32".parse::<HashAlgorithm>().is_err());
        assert_eq!(HashAlgorithm::default(), HashAlgorithm::Sha256);
        assert_eq!(HashAlgorithm::Sha1.to_string(), "sha1");
    }

    #[test]
    fn test_hashes_match_ignores_case_and_whitespace() {
        assert!(hashes_match("abcdef", "  ABCDEF\n"));
        assert!(!hashes_match("abcdef", "abcdee"));
    }

    #[tokio::test]
    async fn test_one_byte_change_detected() {
        let temp = tempdir().unwrap();
        let roots = AllowedRoots::new([temp.path().to_path_buf()]).unwrap();
        let path = temp.path().join("data.bin");

        fs::write(&path, b"hello world").unwrap();
        let before = hash_file(&path, HashAlgorithm::Sha256, &roots).await.unwrap();
        assert_eq!(before, hash_bytes(b"hello world", HashAlgorithm::Sha256));

        fs::write(&path, b"hello worle").unwrap();
        let after = hash_file(&path, HashAlgorithm::Sha256, &roots).await.unwrap();
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_checksum_files_keeps_order_and_errors() {
        let temp = tempdir().unwrap();
        let roots = AllowedRoots::new([temp.path().to_path_buf()]).unwrap();
        fs::write(temp.path().join("a.txt"), "a").unwrap();
        fs::write(temp.path().join("b.txt"), "b").unwrap();

        let paths = vec![
            PathBuf::from("b.txt"),
            PathBuf::from("missing.txt"),
            PathBuf::from("a.txt"),
            PathBuf::from("/etc/hostname"),
        ];
        let results = checksum_files(&paths, HashAlgorithm::Md5, &roots).await;

        assert_eq!(results.len(), 4);
        assert_eq!(results[0].path, PathBuf::from("b.txt"));
        assert_eq!(results[0].result.as_ref().unwrap(), &hash_bytes(b"b", HashAlgorithm::Md5));
        assert!(results[1].result.is_err());
        assert_eq!(results[2].result.as_ref().unwrap(), &hash_bytes(b"a", HashAlgorithm::Md5));
        assert!(results[3].result.as_ref().unwrap_err().is_access_denied());
    }

    #[tokio::test]
    async fn test_verify_partitions() {
        let temp = tempdir().unwrap();
        let roots = AllowedRoots::new([temp.path().to_path_buf()]).unwrap();
        fs::write(temp.path().join("good.txt"), "good").unwrap();
        fs::write(temp.path().join("bad.txt"), "bad").unwrap();

        let requests = vec![
            VerifyRequest {
                path: "good.txt".into(),
                expected_hash: hash_bytes(b"good", HashAlgorithm::Sha1).to_uppercase(),
            },
            VerifyRequest {
                path: "bad.txt".into(),
                expected_hash: "0000".into(),
            },
            VerifyRequest {
                path: "gone.txt".into(),
                expected_hash: "0000".into(),
            },
        ];
        let report = verify_checksums(&requests, HashAlgorithm::Sha1, &roots).await;

        assert_eq!(report.valid, vec![PathBuf::from("good.txt")]);
        assert_eq!(report.invalid.len(), 1);
        assert_eq!(report.invalid[0].actual, hash_bytes(b"bad", HashAlgorithm::Sha1));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.total(), 3);
        assert!(!report.all_valid());
    }

    #[test]
    fn test_verify_request_json() {
        let req: VerifyRequest = serde_json::from_str(r#"{"path": "a.txt", "expectedHash": "abc"}"#).unwrap();
        assert_eq!(req.expected_hash, "abc");
    }
}
