//! Integration tests for the setgen binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const MODEL: &str = r#"package models

import (
	"log"
	"time"
)

//gen:setters
type user struct {
	Name      string
	CreatedAt time.Time
	UpdatedAt time.Time
}

func debug(u user) {
	log.Println(u.Name)
}
"#;

fn run_setgen(root: &Path, args: &[&str]) -> Output {
    let bin = env!("CARGO_BIN_EXE_setgen");
    Command::new(bin)
        .arg("--root")
        .arg(root)
        .arg("--no-color")
        .args(args)
        .env_remove("SETGEN_ROOT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run setgen binary")
}

fn scratch_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("user.go"), MODEL).unwrap();
    dir
}

#[test]
fn generate_writes_companion_file() {
    let dir = scratch_tree();

    let output = run_setgen(dir.path(), &["generate"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Generated 1 files with 2 setters"));

    let generated = fs::read_to_string(dir.path().join("user_setters.go")).unwrap();
    assert!(generated.starts_with("// Code generated by setgen. DO NOT EDIT.\n\npackage models\n"));
    assert!(generated.contains("func (s *user) SetCreatedAt(v time.Time) {\n\ts.CreatedAt = v\n}"));
}

#[test]
fn generate_json_report_is_parseable() {
    let dir = scratch_tree();

    let output = run_setgen(dir.path(), &["--output", "json", "generate"]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["mode"], "write");
    assert_eq!(report["files"][0]["status"], "generated");
    assert_eq!(report["files"][0]["setters"], 2);
}

#[test]
fn failures_exit_zero_unless_requested() {
    let dir = scratch_tree();
    fs::write(dir.path().join("broken.go"), "package models\n\ntype broken struct {\n").unwrap();

    let output = run_setgen(dir.path(), &["generate"]);
    assert!(output.status.success());
    assert!(dir.path().join("user_setters.go").exists());

    let output = run_setgen(dir.path(), &["generate", "--fail-on-error"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("1 files failed"));
}

#[test]
fn check_detects_stale_companion() {
    let dir = scratch_tree();

    let output = run_setgen(dir.path(), &["check"]);
    assert!(!output.status.success());
    assert!(!dir.path().join("user_setters.go").exists());

    assert!(run_setgen(dir.path(), &["generate"]).status.success());

    let output = run_setgen(dir.path(), &["--output", "compact", "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("up_to_date=1 stale=0"));
}

#[test]
fn config_limits_scan_paths() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("models")).unwrap();
    fs::create_dir(dir.path().join("vendor")).unwrap();
    fs::write(dir.path().join("models/user.go"), MODEL).unwrap();
    fs::write(dir.path().join("vendor/user.go"), MODEL).unwrap();
    fs::write(dir.path().join("setgen.toml"), "[generator]\nscan_paths = [\"models\"]\n").unwrap();

    let output = run_setgen(dir.path(), &["generate"]);
    assert!(output.status.success());
    assert!(dir.path().join("models/user_setters.go").exists());
    assert!(!dir.path().join("vendor/user_setters.go").exists());
}

#[test]
fn missing_root_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_setgen(&dir.path().join("nope"), &["generate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("is not a directory"));
}

#[test]
fn invalid_subcommand_exits_with_error() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_setgen(dir.path(), &["nonsense"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!output.status.success());
    assert!(stderr.contains("unrecognized subcommand"));
}

#[test]
fn verbose_logs_pipeline_details() {
    let dir = scratch_tree();

    let output = run_setgen(dir.path(), &["--verbose", "generate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success());
    assert!(stderr.contains("no setgen.toml found, using defaults"), "stderr: {stderr}");

    let output = run_setgen(dir.path(), &["generate"]);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("using defaults"));
}

#[test]
fn command_help_lists_examples() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_setgen(dir.path(), &["generate", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("Examples:"));
    assert!(stdout.contains("setgen generate --fail-on-error"));
}
