//! CLI diff integration tests
//!
//! Run the built binary against documents written to a temp dir and check
//! stdout and the exit code contract (0 same, 1 different, 2 error).

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn crashdiff(args: &[&str]) -> Output {
    let cli_bin = env!("CARGO_BIN_EXE_crashdiff");
    Command::new(cli_bin)
        .args(["--log-profile", "test"])
        .args(args)
        .output()
        .expect("Failed to execute CLI")
}

#[test]
fn test_identical_documents_exit_zero() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.json", r#"{"status": "OK"}"#);
    let right = write(&dir, "right.json", r#"{"status": "OK"}"#);

    let output = crashdiff(&["diff", left.to_str().unwrap(), right.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(stdout.starts_with("diffing "));
    assert!(stdout.contains("no differences"));
}

#[test]
fn test_differences_exit_one() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.json", r#"{"a": 1, "b": 2}"#);
    let right = write(&dir, "right.json", r#"{"a": 1, "b": 3}"#);

    let output = crashdiff(&[
        "diff",
        left.to_str().unwrap(),
        right.to_str().unwrap(),
        "--summary-json",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(1), "stdout: {}", stdout);
    assert!(stdout.contains("== b =="));
    let summary_start = stdout.find('{').unwrap();
    let summary: serde_json::Value = serde_json::from_str(&stdout[summary_start..]).unwrap();
    assert_eq!(summary["total_changes"], 1);
    assert_eq!(summary["changed"], 1);
}

#[test]
fn test_malformed_document_exits_two() {
    let dir = TempDir::new().unwrap();
    let left = write(&dir, "left.json", "{");
    let right = write(&dir, "right.json", "{}");

    let output = crashdiff(&["diff", left.to_str().unwrap(), right.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("ERR_MALFORMED_INPUT"), "stderr: {}", stderr);
}

#[test]
fn test_missing_file_exits_two() {
    let dir = TempDir::new().unwrap();
    let right = write(&dir, "right.json", "{}");
    let missing = dir.path().join("nope.json");

    let output = crashdiff(&["diff", missing.to_str().unwrap(), right.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("cannot read"));
}

#[test]
fn test_config_file_suppresses_noise() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "rules.yaml", "ignore: [stackwalk_version]\n");
    let left = write(&dir, "left.json", r#"{"stackwalk_version": "a"}"#);
    let right = write(&dir, "right.json", r#"{"stackwalk_version": "b"}"#);

    let output = crashdiff(&[
        "diff",
        left.to_str().unwrap(),
        right.to_str().unwrap(),
        "--config",
        config.to_str().unwrap(),
        "--show-suppressed",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0), "stdout: {}", stdout);
    assert!(stdout.contains("== suppressed =="));
    assert!(stdout.contains("[stackwalk_version]"));
}

#[test]
fn test_stackwalk_preset_unwraps_processed_crash() {
    let dir = TempDir::new().unwrap();
    let left = write(
        &dir,
        "processed.json",
        r#"{"uuid": "x", "json_dump": {"status": "OK", "stackwalk_version": "rust"}}"#,
    );
    let right = write(
        &dir,
        "raw.json",
        r#"{"status": "OK", "stackwalk_version": "breakpad"}"#,
    );

    let output = crashdiff(&[
        "diff",
        left.to_str().unwrap(),
        right.to_str().unwrap(),
        "--preset",
        "stackwalk",
    ]);
    assert_eq!(
        output.status.code(),
        Some(0),
        "stdout: {}",
        String::from_utf8_lossy(&output.stdout)
    );
}

#[test]
fn test_check_config_reports_counts() {
    let dir = TempDir::new().unwrap();
    let config = write(
        &dir,
        "rules.json",
        r#"{"ignore": ["a", "b"], "comparators": [{"path": "**.offset", "compare": {"kind": "hex"}}]}"#,
    );

    let output = crashdiff(&["check-config", config.to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout.contains("ignore rules:        2"), "stdout: {}", stdout);
    assert!(stdout.contains("comparators:         1"));
}

#[test]
fn test_check_config_rejects_bad_pattern() {
    let dir = TempDir::new().unwrap();
    let config = write(&dir, "rules.yaml", "ignore: [\"threads[\"]\n");

    let output = crashdiff(&["check-config", config.to_str().unwrap()]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr.contains("ERR_INVALID_RULE"), "stderr: {}", stderr);
}
