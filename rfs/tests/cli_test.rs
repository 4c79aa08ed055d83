//! CLI tests for the rfs binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rfs(cwd: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rfs").expect("rfs binary");
    cmd.current_dir(cwd.path());
    cmd
}

#[test]
fn test_tools_lists_catalog() {
    let temp = TempDir::new().unwrap();

    rfs(&temp)
        .arg("tools")
        .assert()
        .success()
        .stdout(predicate::str::contains("search_regex"))
        .stdout(predicate::str::contains("checksum_verify"));
}

#[test]
fn test_schema_prints_input_schema() {
    let temp = TempDir::new().unwrap();

    rfs(&temp)
        .args(["schema", "search_glob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"maxResults\""));
}

#[test]
fn test_schema_unknown_tool_fails() {
    let temp = TempDir::new().unwrap();

    rfs(&temp)
        .args(["schema", "delete_everything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Tool not found"));
}

#[test]
fn test_call_with_json_argument() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("hello.txt"), "hi").unwrap();

    rfs(&temp)
        .args(["--root", ".", "call", "list_directory", r#"{"path": "."}"#])
        .assert()
        .success()
        .stdout(predicate::str::contains("[FILE] hello.txt"));
}

#[test]
fn test_call_reads_input_from_stdin() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("hello.txt"), "hi").unwrap();

    rfs(&temp)
        .args(["--root", ".", "call", "read_files"])
        .write_stdin(r#"{"paths": ["hello.txt"]}"#)
        .assert()
        .success()
        .stdout(predicate::str::contains("hello.txt:\n     1│hi"));
}

#[test]
fn test_call_error_result_exits_nonzero() {
    let temp = TempDir::new().unwrap();

    rfs(&temp)
        .args(["--root", ".", "call", "file_info", r#"{"path": "/etc/passwd"}"#])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Access denied"));
}

#[test]
fn test_call_requires_root() {
    let temp = TempDir::new().unwrap();

    rfs(&temp)
        .args(["call", "list_directory", r#"{"path": "."}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("allowed directory"));
}

#[test]
fn test_call_rejects_bad_json() {
    let temp = TempDir::new().unwrap();

    rfs(&temp)
        .args(["--root", ".", "call", "list_directory", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not valid JSON"));
}
