//! End-to-end tests for the `mdseries` binary — exit codes and output.
//!
//! Each test builds a small content tree in a temp directory and runs the
//! compiled binary against it.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ===========================================================================
// Helpers
// ===========================================================================

fn mdseries(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mdseries"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).unwrap()
}

/// Two series, one translation pair, one lone translation, no broken links.
fn clean_tree() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        tmp.path(),
        "README.md",
        "# Notes\n\n- [Topic](basics/01_Topic.md)\n- [Site](https://example.com)\n",
    );
    write(
        tmp.path(),
        "basics/01_Topic.md",
        "# Topic\n\n[中文](01_Topic_CN.md) [next](../advanced/02_Deep.md#intro)\n",
    );
    write(tmp.path(), "basics/01_Topic_CN.md", "# 主题\n\n[English](01_Topic.md)\n");
    write(tmp.path(), "basics/02_Other_CN.md", "# 其他\n");
    write(tmp.path(), "advanced/02_Deep.md", "# Deep\n\n[top](#intro)\n");
    tmp
}

// ===========================================================================
// Exit codes
// ===========================================================================

#[test]
fn clean_tree_exits_zero() {
    let tmp = clean_tree();
    let output = mdseries(&["scan", tmp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("Broken links (0)"));
    assert!(text.contains("basics/02_Other_CN.md (cn, missing basics/02_Other.md)"));
}

#[test]
fn broken_link_exits_one() {
    let tmp = clean_tree();
    write(tmp.path(), "advanced/03_Broken.md", "# Broken\n\n[gone](04_Gone.md)\n");

    let output = mdseries(&["scan", tmp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).contains("advanced/03_Broken.md \u{2192} 04_Gone.md"));
}

#[test]
fn missing_root_exits_two_without_report() {
    let tmp = TempDir::new().unwrap();
    let missing = tmp.path().join("missing");

    let output = mdseries(&["scan", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("error:"));
}

#[test]
fn invalid_config_exits_two() {
    let tmp = clean_tree();
    write(tmp.path(), "mdseries.toml", "no_such_key = true\n");

    let output = mdseries(&["scan", tmp.path().to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
}

// ===========================================================================
// Output
// ===========================================================================

#[test]
fn repeated_runs_are_byte_identical() {
    let tmp = clean_tree();
    let root = tmp.path().to_str().unwrap();

    let first = mdseries(&["scan", root]);
    let second = mdseries(&["scan", root]);
    assert_eq!(first.stdout, second.stdout);

    let first = mdseries(&["scan", root, "--format", "json"]);
    let second = mdseries(&["scan", root, "--format", "json"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn json_report_parses() {
    let tmp = clean_tree();
    let output = mdseries(&["scan", tmp.path().to_str().unwrap(), "--format", "json"]);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["documents_scanned"], 5);
    assert_eq!(value["broken_links"].as_array().map(Vec::len), Some(0));
    assert_eq!(value["unpaired_variants"].as_array().map(Vec::len), Some(3));
}

#[test]
fn unpaired_variant_logged_at_default_level() {
    let tmp = clean_tree();
    let output = mdseries(&["scan", tmp.path().to_str().unwrap()]);

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unpaired variant"));
    assert!(stderr.contains("basics/02_Other_CN.md"));
    assert!(!stdout(&output).contains("WARN"));
}

#[test]
fn variant_suffix_flag_changes_pairing() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "s/01_A.md", "# A\n");
    write(tmp.path(), "s/01_A.zh.md", "# 甲\n");

    let output = mdseries(&[
        "scan",
        tmp.path().to_str().unwrap(),
        "--variant-suffix",
        ".zh",
        "--format",
        "json",
    ]);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["paired_variants"], 2);
}

#[test]
fn ext_flag_accepts_leading_dot() {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), "s/01_A.markdown", "# A\n");
    write(tmp.path(), "s/02_B.md", "# B\n");

    let output = mdseries(&[
        "scan",
        tmp.path().to_str().unwrap(),
        "--ext=.markdown",
        "--format",
        "json",
    ]);

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["documents_scanned"], 1);
}

#[test]
fn index_prints_markdown_toc() {
    let tmp = clean_tree();
    let root = tmp.path().to_str().unwrap();

    let base = stdout(&mdseries(&["index", root]));
    assert_eq!(
        base,
        "- [Notes](README.md)\n\n## advanced\n\n- [Deep](advanced/02_Deep.md)\n\n## basics\n\n- [Topic](basics/01_Topic.md)\n"
    );

    let cn = stdout(&mdseries(&["index", root, "--variant", "cn"]));
    assert_eq!(
        cn,
        "## basics\n\n- [主题](basics/01_Topic_CN.md)\n- [其他](basics/02_Other_CN.md)\n"
    );
}

#[test]
fn gen_config_prints_stock_file() {
    let output = mdseries(&["gen-config"]);
    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains("variant_suffix = \"_CN\""));
}
