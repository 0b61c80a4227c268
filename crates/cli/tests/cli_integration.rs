//! CLI integration tests for all subcommands.
//!
//! Uses `assert_cmd` to spawn the `unitspec` binary and verify
//! exit codes, stdout content, and stderr content. Fixtures are written
//! into a fresh temp directory per test.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn unitspec() -> Command {
    let mut cmd = cargo_bin_cmd!("unitspec");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Write `content` to `name` inside `dir` and return the full path.
fn fixture(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("write fixture");
    path
}

const DIRECTORY: &str = r#"{
  "urn:github:1": { "num": "java.lang.Long(1L)" },
  "urn:github:2": { "loop": "urn:github:2:loop()" }
}"#;

// ──────────────────────────────────────────────
// 1. Help and version
// ──────────────────────────────────────────────

#[test]
fn help_exits_0_with_description() {
    unitspec()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Unit spec toolchain"));
}

#[test]
fn version_exits_0() {
    unitspec()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("unitspec"));
}

#[test]
fn unknown_subcommand_fails() {
    unitspec().arg("frobnicate").assert().failure();
}

// ──────────────────────────────────────────────
// 2. parse / render / overrides
// ──────────────────────────────────────────────

#[test]
fn parse_prints_tree_json() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "a.spec", "java.lang.Long(5L)");
    let out = unitspec().arg("parse").arg(&file).assert().success();
    let stdout = String::from_utf8(out.get_output().stdout.clone()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(json["kind"], "composite");
    assert_eq!(json["type_name"], "java.lang.Long");
}

#[test]
fn parse_records_owner_as_caller() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "a.spec", "urn:github:1:num()");
    unitspec()
        .args(["parse", "--owner", "urn:github:77"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"caller\": \"urn:github:77\""));
}

#[test]
fn parse_rejects_bad_owner() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "a.spec", "1L");
    unitspec()
        .args(["parse", "--owner", "github"])
        .arg(&file)
        .assert()
        .failure();
}

#[test]
fn render_prints_canonical_text() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "a.spec", "com.example.Outer( 10L ,com.example.Inner())");
    unitspec()
        .arg("render")
        .arg(&file)
        .assert()
        .success()
        .stdout("com.example.Outer(\n  10L,\n  com.example.Inner()\n)\n");
}

#[test]
fn render_json_wraps_text() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "a.spec", "\"hello\"");
    let out = unitspec()
        .args(["--output", "json", "render"])
        .arg(&file)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(json["text"], "\"hello\"");
    assert_eq!(json["owner"], "urn:local:0");
}

#[test]
fn overrides_prints_last_wins_map() {
    let dir = TempDir::new().unwrap();
    let file = fixture(
        &dir,
        "a.spec",
        "java.lang.Long(#arg(0,'test'), #arg(0,'another test'))",
    );
    let out = unitspec()
        .args(["--output", "json", "overrides"])
        .arg(&file)
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(json, serde_json::json!({ "0": "another test" }));
}

#[test]
fn syntax_error_exits_1_with_line() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "bad.spec", "com.example.A(\n  1L,\n");
    unitspec()
        .arg("parse")
        .arg(&file)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("syntax error at line"));
}

#[test]
fn syntax_error_json_has_line_field() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "bad.spec", "${bogus}");
    let out = unitspec()
        .args(["--output", "json", "parse"])
        .arg(&file)
        .assert()
        .failure();
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stderr).unwrap();
    assert_eq!(json["error"]["line"], 1);
}

#[test]
fn missing_file_exits_1() {
    unitspec()
        .args(["render", "/nonexistent/nowhere.spec"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error reading file"));
}

#[test]
fn quiet_suppresses_error_text() {
    unitspec()
        .args(["--quiet", "render", "/nonexistent/nowhere.spec"])
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

// ──────────────────────────────────────────────
// 3. instantiate
// ──────────────────────────────────────────────

#[test]
fn instantiate_resolves_reference() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(&dir, "users.json", DIRECTORY);
    let file = fixture(&dir, "a.spec", "urn:github:1:num(#arg(0,'42'))");
    unitspec()
        .arg("instantiate")
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .success()
        .stdout("42L\n");
}

#[test]
fn instantiate_work_uses_owner_and_rule() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(&dir, "users.json", "{}");
    let file = fixture(&dir, "a.spec", "${work}");
    let out = unitspec()
        .args(["--output", "json", "instantiate"])
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .args(["--owner", "urn:github:5", "--rule", "nightly"])
        .assert()
        .success();
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stdout).unwrap();
    assert_eq!(json["kind"], "coordinates");
    assert_eq!(json["owner"], "urn:github:5");
    assert_eq!(json["rule"], "nightly");
}

#[test]
fn instantiate_cycle_exits_1() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(&dir, "users.json", DIRECTORY);
    let file = fixture(&dir, "a.spec", "urn:github:2:loop()");
    unitspec()
        .arg("instantiate")
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("cycle"));
}

#[test]
fn instantiate_error_json_has_kind() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(&dir, "users.json", "{}");
    let file = fixture(&dir, "a.spec", "com.example.Missing()");
    let out = unitspec()
        .args(["--output", "json", "instantiate"])
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .failure();
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stderr).unwrap();
    assert_eq!(json["error"]["kind"], "unknown_capability");
}

#[test]
fn instantiate_honours_depth_config() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(
        &dir,
        "users.json",
        r#"{ "urn:github:1": { "a": "urn:github:1:b()", "b": "urn:github:1:c()", "c": "1L" } }"#,
    );
    let file = fixture(&dir, "a.spec", "urn:github:1:a()");
    let shallow = fixture(&dir, "engine.toml", "max_reference_depth = 2\n");
    let roomy = fixture(&dir, "roomy.toml", "max_reference_depth = 8\n");

    unitspec()
        .arg("--config")
        .arg(&shallow)
        .arg("instantiate")
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .failure()
        .stderr(predicate::str::contains("deeper than 2"));

    unitspec()
        .arg("--config")
        .arg(&roomy)
        .arg("instantiate")
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .success()
        .stdout("1L\n");
}

#[test]
fn bad_config_exits_1() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(&dir, "users.json", "{}");
    let file = fixture(&dir, "a.spec", "1L");
    let config = fixture(&dir, "engine.toml", "max_reference_depth = 0\n");
    unitspec()
        .arg("--config")
        .arg(&config)
        .arg("instantiate")
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn malformed_directory_exits_1() {
    let dir = TempDir::new().unwrap();
    let directory = fixture(&dir, "users.json", "[]");
    let file = fixture(&dir, "a.spec", "1L");
    unitspec()
        .arg("instantiate")
        .arg(&file)
        .arg("--directory")
        .arg(&directory)
        .assert()
        .failure()
        .stderr(predicate::str::contains("error loading directory"));
}

// ──────────────────────────────────────────────
// 4. --quiet and --owner across subcommands
// ──────────────────────────────────────────────

#[test]
fn quiet_still_reports_json_errors() {
    let dir = TempDir::new().unwrap();
    let bad = fixture(&dir, "bad.spec", "com.example.A(");
    let out = unitspec()
        .args(["--quiet", "--output", "json", "parse"])
        .arg(&bad)
        .assert()
        .failure()
        .code(1);
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stderr).unwrap();
    assert!(json["error"]["message"].is_string());

    let out = unitspec()
        .args(["--quiet", "--output", "json", "render", "/nonexistent/nowhere.spec"])
        .assert()
        .failure()
        .code(1);
    let json: serde_json::Value = serde_json::from_slice(&out.get_output().stderr).unwrap();
    assert!(json["error"].as_str().unwrap().contains("error reading file"));
}

#[test]
fn quiet_silences_text_syntax_errors() {
    let dir = TempDir::new().unwrap();
    let bad = fixture(&dir, "bad.spec", "com.example.A(");
    unitspec()
        .args(["--quiet", "parse"])
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::is_empty());
}

#[test]
fn overrides_accepts_owner() {
    let dir = TempDir::new().unwrap();
    let file = fixture(&dir, "a.spec", "urn:github:1:num(#arg(1,'x'))");
    unitspec()
        .args(["overrides", "--owner", "urn:github:9"])
        .arg(&file)
        .assert()
        .success()
        .stdout("1\tx\n");
    unitspec()
        .args(["overrides", "--owner", "github"])
        .arg(&file)
        .assert()
        .failure();
}
