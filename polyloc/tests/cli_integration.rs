//! Integration tests for the polyloc CLI

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::{tempdir, TempDir};

fn run_polyloc(args: &[&str]) -> (String, String, bool) {
    let output = Command::new(env!("CARGO_BIN_EXE_polyloc"))
        .args(args)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

/// A Go file with 10 code lines, a C file and a Markdown file.
fn sample_tree() -> TempDir {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("cmd")).unwrap();
    fs::create_dir_all(root.join("vendor/dep")).unwrap();

    let go: String = (0..10).map(|i| format!("var x{} = {}\n", i, i)).collect();
    fs::write(root.join("cmd/main.go"), go).unwrap();
    fs::write(
        root.join("util.c"),
        "// header comment\nint main() { return 0; } // trailing\n",
    )
    .unwrap();
    fs::write(root.join("README.md"), "# Title\n\nSome text.\n").unwrap();
    fs::write(root.join("vendor/dep/dep.go"), "package dep\n").unwrap();
    dir
}

fn read_json(path: &Path) -> serde_json::Value {
    let body = fs::read_to_string(path).expect("report written");
    serde_json::from_str(&body).expect("Invalid JSON report")
}

fn languages(report: &serde_json::Value) -> Vec<String> {
    report["Results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["Language"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_polyloc(&["--help"]);

    assert!(success);
    assert!(stdout.contains("polyloc"));
    assert!(stdout.contains("--by-file"));
    assert!(stdout.contains("--exclude-path"));
    assert!(stdout.contains("--include-ext"));
    assert!(stdout.contains("--order-by-lang"));
    assert!(stdout.contains("--report-formats"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_polyloc(&["--version"]);

    assert!(success);
    assert!(stdout.contains("polyloc"));
}

#[test]
fn test_table_output_and_json_artifact() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (stdout, stderr, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--exclude-path",
        "vendor",
    ]);

    assert!(success, "stderr: {}", stderr);
    assert!(stdout.contains("Language"));
    assert!(stdout.contains("Total (3 files)"));

    let report = read_json(&out.path().join("polyloc.json"));
    assert_eq!(report["TotalFiles"], 3);
    assert_eq!(languages(&report), vec!["Go", "Markdown", "C"]);

    let go = &report["Results"][0];
    assert_eq!(go["Files"], 1);
    assert_eq!(go["CodeLines"], 10);

    let c = &report["Results"][2];
    assert_eq!(c["Lines"], 2);
    assert_eq!(c["Comments"], 1);
    assert_eq!(c["CodeLines"], 1);
    assert_eq!(c["BlankLines"], 0);
}

#[test]
fn test_totals_match_rows() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (_, _, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--print",
        "none",
    ]);
    assert!(success);

    let report = read_json(&out.path().join("polyloc.json"));
    let rows = report["Results"].as_array().unwrap();
    for (total, field) in [
        ("TotalLines", "Lines"),
        ("TotalBlankLines", "BlankLines"),
        ("TotalComments", "Comments"),
        ("TotalCodeLines", "CodeLines"),
        ("TotalFiles", "Files"),
    ] {
        let sum: u64 = rows.iter().map(|r| r[field].as_u64().unwrap()).sum();
        assert_eq!(report[total].as_u64().unwrap(), sum, "{}", total);
    }
}

#[test]
fn test_include_extension() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (_, _, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--include-ext",
        ".go",
        "--exclude-path",
        "vendor",
    ]);
    assert!(success);

    let report = read_json(&out.path().join("polyloc.json"));
    assert_eq!(languages(&report), vec!["Go"]);
    assert_eq!(report["Results"][0]["CodeLines"], 10);
}

#[test]
fn test_order_by_language_ascending() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (_, _, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--include-ext",
        "go,c",
        "--exclude-path",
        "vendor",
        "--order-by-lang",
        "--order",
        "ASC",
    ]);
    assert!(success);

    let report = read_json(&out.path().join("polyloc.json"));
    assert_eq!(languages(&report), vec!["C", "Go"]);
}

#[test]
fn test_by_file_rows() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (stdout, _, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--by-file",
        "--print",
        "csv",
    ]);
    assert!(success);
    assert!(stdout.starts_with("file,language,lines,blank,comment,code"));
    assert!(stdout.contains("vendor/dep/dep.go,Go,1,0,0,1"));

    let report = read_json(&out.path().join("polyloc.json"));
    let files: Vec<&str> = report["Results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["File"].as_str().unwrap())
        .collect();
    assert_eq!(files.len(), 4);
    assert_eq!(files[0], "cmd/main.go");
}

#[test]
fn test_exclude_from_file() {
    let tree = sample_tree();
    let out = tempdir().unwrap();
    let ignore = out.path().join(".clocignore");
    fs::write(&ignore, "# vendored\nvendor\n*.md\n").unwrap();

    let (_, stderr, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--exclude-from",
        path_str(&ignore),
    ]);
    assert!(success, "stderr: {}", stderr);

    let report = read_json(&out.path().join("polyloc.json"));
    assert_eq!(report["TotalFiles"], 2);
    assert_eq!(languages(&report), vec!["Go", "C"]);
}

#[test]
fn test_multiple_report_formats() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (_, _, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--output-name",
        "Result_demo_main",
        "--report-formats",
        "json,csv,md,table",
    ]);
    assert!(success);

    for ext in ["json", "csv", "md", "txt"] {
        let path = out.path().join(format!("Result_demo_main.{}", ext));
        assert!(path.is_file(), "missing {}", path.display());
    }
}

#[test]
fn test_empty_root() {
    let tree = tempdir().unwrap();
    let out = tempdir().unwrap();

    let (_, _, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
    ]);
    assert!(success);

    let report = read_json(&out.path().join("polyloc.json"));
    assert_eq!(report["TotalFiles"], 0);
    assert_eq!(report["TotalLines"], 0);
    assert_eq!(report["TotalCodeLines"], 0);
    assert_eq!(report["Results"], serde_json::json!([]));
}

#[test]
fn test_repeated_runs_are_identical() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    for name in ["first", "second"] {
        let (_, _, success) = run_polyloc(&[
            path_str(tree.path()),
            "--output-path",
            path_str(out.path()),
            "--output-name",
            name,
            "--by-file",
        ]);
        assert!(success);
    }

    let first = fs::read(out.path().join("first.json")).unwrap();
    let second = fs::read(out.path().join("second.json")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_conflicting_sort_keys() {
    let tree = sample_tree();
    let out = tempdir().unwrap();

    let (_, stderr, success) = run_polyloc(&[
        path_str(tree.path()),
        "--output-path",
        path_str(out.path()),
        "--order-by-lang",
        "--order-by-code",
    ]);

    assert!(!success);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("conflicting sort keys"));
    assert!(!out.path().join("polyloc.json").exists());
}

#[test]
fn test_invalid_sort_direction() {
    let tree = sample_tree();
    let (_, stderr, success) =
        run_polyloc(&[path_str(tree.path()), "--no-report", "--order", "UP"]);

    assert!(!success);
    assert!(stderr.contains("invalid sort direction"));
}

#[test]
fn test_missing_root_fails() {
    let out = tempdir().unwrap();
    let missing = out.path().join("does-not-exist");

    let (stdout, stderr, success) = run_polyloc(&[
        path_str(&missing),
        "--output-path",
        path_str(out.path()),
    ]);

    assert!(!success);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("path does not exist"));
    assert!(!out.path().join("polyloc.json").exists());
}
