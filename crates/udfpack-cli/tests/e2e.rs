//! End-to-end tests for udfpack CLI commands.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin for tests

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// =============================================================================
// Test Helpers
// =============================================================================

/// Temporary workspace holding sources, settings and the work directory.
struct Workspace {
    temp_dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    fn source(&self, filename: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(filename);
        fs::write(&path, contents).expect("Failed to write source");
        path
    }

    fn work_dir(&self) -> PathBuf {
        self.temp_dir.path().join("work")
    }

    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("udfpack").expect("Failed to find binary");
        cmd.env("XDG_CONFIG_HOME", self.temp_dir.path().join("config"))
            .arg("--work-dir")
            .arg(self.work_dir());
        cmd
    }
}

fn entry_names(archive: &Path) -> Vec<String> {
    let mut archive = zip::ZipArchive::new(File::open(archive).expect("Failed to open archive"))
        .expect("Failed to read archive");
    (0..archive.len())
        .map(|i| archive.by_index(i).expect("Failed to read entry").name().to_string())
        .collect()
}

// =============================================================================
// Package
// =============================================================================

#[test]
fn test_package_single_udf() {
    let ws = Workspace::new();
    let source = ws.source("foo.py", "def foo(): pass");

    let output = ws
        .command()
        .args(["package", "--job", "42", "--udf"])
        .arg(format!("a.b.Foo={}", source.display()))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let archive = PathBuf::from(stdout.trim());
    assert!(archive.ends_with("udf/42/package/python-udf.zip"));
    assert_eq!(entry_names(&archive), vec!["a.py"]);
}

#[test]
fn test_package_multiple_udfs() {
    let ws = Workspace::new();
    let upper = ws.source("upper.py", "def Upper(s): return s.upper()");
    let lower = ws.source("lower.py", "def Lower(s): return s.lower()");

    let output = ws
        .command()
        .args(["package", "--job", "7"])
        .arg("--udf")
        .arg(format!("upper.Upper={}", upper.display()))
        .arg("--udf")
        .arg(format!("lower.Lower={}", lower.display()))
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let stdout = String::from_utf8(output).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 1);
    assert_eq!(entry_names(Path::new(lines[0])), vec!["upper.py", "lower.py"]);
}

#[test]
fn test_package_rejects_malformed_udf_arg() {
    let ws = Workspace::new();

    ws.command()
        .args(["package", "--job", "1", "--udf", "a.b.Foo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<qualified-name>=<source-file>"));
}

#[test]
fn test_package_rejects_escaping_job_id() {
    let ws = Workspace::new();
    let source = ws.source("foo.py", "def Foo(): pass");

    ws.command()
        .args(["package", "--job", "../../escaped", "--udf"])
        .arg(format!("a.b.Foo={}", source.display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid job id"));

    assert!(!ws.work_dir().exists());
    assert!(!ws.temp_dir.path().join("escaped").exists());
}

// =============================================================================
// Compile
// =============================================================================

#[test]
fn test_compile_reports_failure_reason() {
    let ws = Workspace::new();
    let source = ws.source("foo.py", "def foo(): pass");

    ws.command()
        .arg("--python-home")
        .arg(ws.temp_dir.path().join("no-such-python"))
        .args(["compile", "--name", "a.foo", "--source"])
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("compilation failed"));

    // Intermediate files are removed even though resolution failed.
    let compiler_dir = ws.work_dir().join("udf/compiler/python");
    let leftovers = fs::read_dir(&compiler_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
}

#[test]
fn test_compile_unsupported_language() {
    let ws = Workspace::new();
    let source = ws.source("Upper.java", "class Upper {}");

    ws.command()
        .args(["compile", "--name", "com.acme.Upper", "--language", "java", "--source"])
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported function language: java"));
}

#[test]
fn test_settings_file_is_used() {
    let ws = Workspace::new();
    let source = ws.source("foo.py", "def foo(): pass");
    let settings = ws.source(
        "settings.json",
        r#"{ "python_home": "/nonexistent/udfpack/python" }"#,
    );

    ws.command()
        .arg("--config")
        .arg(&settings)
        .args(["compile", "--name", "a.foo", "--source"])
        .arg(&source)
        .assert()
        .failure()
        .stderr(predicate::str::contains("compilation failed"));
}
