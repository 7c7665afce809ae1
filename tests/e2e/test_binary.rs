//! Integration tests for the dependency-diagram binary.
//!
//! These tests run the compiled binary against the declaration files in demos/.

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_dependency-diagram"))
}

fn demo(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("demos");
    path.push(name);
    path
}

/// Run the binary with the given stdin input and CLI args.
fn run(input: &str, args: &[&str]) -> Output {
    let mut child = Command::new(binary_path())
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");
    if let Some(ref mut stdin) = child.stdin {
        stdin.write_all(input.as_bytes()).ok();
    }
    child.wait_with_output().expect("Failed to wait for binary")
}

fn run_ok(input: &str, args: &[&str]) -> String {
    let output = run(input, args);
    assert!(
        output.status.success(),
        "Binary exited with {:?}:\nstderr: {}",
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("Non-UTF8 output")
}

fn run_err(input: &str, args: &[&str]) -> String {
    let output = run(input, args);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    String::from_utf8(output.stderr).expect("Non-UTF8 output")
}

// ── Diagrams ──────────────────────────────────────────────────────────────

#[test]
fn test_stdin_to_stdout() {
    let svg = run_ok("a\nb <- a\nc <- b\n", &["--no-optimize"]);
    assert!(svg.starts_with("<svg"));
    assert!(svg.ends_with("</svg>\n"));
    assert_eq!(svg.matches("<rect").count(), 3);
    assert_eq!(svg.matches("<line").count(), 2);
}

#[test]
fn test_demo_file_optimised() {
    let path = demo("jobs.deps");
    let svg = run_ok("", &[path.to_str().unwrap(), "-t", "5000", "-j", "2"]);
    for name in [
        "parent",
        "commons",
        "commons-test",
        "storage",
        "storage-test",
        "api",
        "batch",
        "web",
        "release",
    ] {
        assert!(svg.contains(&format!(">{name}</text>")), "missing {name}");
    }
}

#[test]
fn test_search_is_deterministic_for_single_worker() {
    let path = demo("fan.deps");
    let first = run_ok("", &[path.to_str().unwrap()]);
    let second = run_ok("", &[path.to_str().unwrap(), "-t", "-1"]);
    assert_eq!(first, second);
}

#[test]
fn test_zero_deadline_matches_no_optimize() {
    let path = demo("fan.deps");
    let zero = run_ok("", &[path.to_str().unwrap(), "-t", "0"]);
    let off = run_ok("", &[path.to_str().unwrap(), "--no-optimize"]);
    assert_eq!(zero, off);
}

#[test]
fn test_output_file() {
    let out = std::env::temp_dir().join(format!("dependency-diagram-e2e-{}.svg", std::process::id()));
    let stdout = run_ok("a\n", &["-o", out.to_str().unwrap()]);
    assert!(stdout.is_empty());
    let svg = fs::read_to_string(&out).unwrap();
    fs::remove_file(&out).unwrap();
    assert!(svg.contains(">a</text>"));
}

// ── Diagnostics ───────────────────────────────────────────────────────────

#[test]
fn test_verbose_logs_layout_metrics_to_stderr() {
    let path = demo("chain.deps");
    let output = Command::new(binary_path())
        .args([path.to_str().unwrap(), "--no-optimize", "-v"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run binary");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("heuristic layout"), "stderr: {stderr}");
    assert!(!stderr.contains("cannot install log subscriber"));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("<svg"));
}

#[test]
fn test_quiet_by_default() {
    let path = demo("chain.deps");
    let output = Command::new(binary_path())
        .args([path.to_str().unwrap(), "--no-optimize"])
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run binary");
    assert!(output.status.success());
    assert!(output.stderr.is_empty());
}

// ── Level report ──────────────────────────────────────────────────────────

#[test]
fn test_levels_report() {
    let path = demo("chain.deps");
    let report = run_ok("", &["--levels", path.to_str().unwrap()]);
    let rule = "-".repeat(45);
    assert_eq!(
        report,
        format!("{rule}\na\n{rule}\nb -> a\n{rule}\nc -> b\n{rule}\n")
    );
}

// ── Errors ────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_reference() {
    let stderr = run_err("a <- missing\n", &[]);
    assert!(stderr.contains("error:"));
    assert!(stderr.contains("missing"));
}

#[test]
fn test_cycle() {
    let stderr = run_err("a <- b\nb <- a\n", &[]);
    assert!(stderr.contains("cycle"));
}

#[test]
fn test_parse_error_names_line() {
    let stderr = run_err("a\nthis is not a declaration\n", &[]);
    assert!(stderr.contains("line 2"));
}

#[test]
fn test_missing_input_file() {
    let stderr = run_err("", &["demos/no-such-file.deps"]);
    assert!(stderr.contains("cannot read"));
}

#[test]
fn test_version_flag() {
    let output = run_ok("", &["--version"]);
    assert!(output.starts_with("dependency-diagram "));
}
