mod common;

use common::data_path;
use hanzi_grader::scorer::LegacyReport;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

struct TestContext {
    _dir: TempDir,
    bad_rules: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let bad_rules = dir.path().join("bad_rules.json");
        fs::write(&bad_rules, r#"{ "metrics": { "stroke_size": { "full_score": 0.1 } } }"#).unwrap();
        Self { _dir: dir, bad_rules }
    }
}

fn run(subcommand: &str, sample: &str, extra: &[&str]) -> Output {
    let rules = data_path("rules/default.json");
    let request = data_path(&format!("samples/{}.json", sample));
    let standard = data_path(&format!("samples/{}_standard.jsonl", sample));
    let evaluate = data_path(&format!("samples/{}_evaluate.jsonl", sample));

    let mut args = vec![
        subcommand.to_string(),
        "--rules".to_string(),
        rules.display().to_string(),
        "--request".to_string(),
        request.display().to_string(),
        "--standard".to_string(),
        standard.display().to_string(),
        "--evaluate".to_string(),
        evaluate.display().to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));

    Command::new(env!("CARGO_BIN_EXE_hanzi-grader"))
        .args(&args)
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_cli_grade_json_report() {
    let output = run("grade", "shi", &["--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: LegacyReport = serde_json::from_str(&stdout).expect("stdout is a legacy report");
    assert!(report.status);
    assert_eq!(report.stroke_count_diff, 0);
    assert!((0..=100).contains(&report.score));

    let raw: Value = serde_json::from_str(&stdout).unwrap();
    for key in ["centerOfGravityType", "z101structionScore", "z108incorrectCharacterSound"] {
        assert!(raw.get(key).is_some(), "missing key {}", key);
    }
}

#[test]
fn test_cli_grade_table_output() {
    let output = run("grade", "chuan", &[]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("川"));
    assert!(stdout.contains("struction 2"));
    assert!(stdout.contains("ComponentLevel"));
}

#[test]
fn test_cli_flag_overrides_rule_file_settings() {
    let output = run("grade", "chuan", &["--is-struction", "false"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("StrokeLevel"));
}

#[test]
fn test_cli_holistic_json() {
    let output = run("holistic", "chuan", &["--json"]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let score: Value = serde_json::from_slice(&output.stdout).unwrap();
    let total = score["total"].as_f64().unwrap();
    assert!((30.0..=100.0).contains(&total));
    assert!(score["componentOverlap"].is_number());
}

#[test]
fn test_cli_rejects_invalid_rules() {
    let ctx = TestContext::new();
    let output = Command::new(env!("CARGO_BIN_EXE_hanzi-grader"))
        .args([
            "grade",
            "--rules",
            ctx.bad_rules.to_str().unwrap(),
            "--request",
            data_path("samples/shi.json").to_str().unwrap(),
            "--standard",
            data_path("samples/shi_standard.jsonl").to_str().unwrap(),
            "--evaluate",
            data_path("samples/shi_evaluate.jsonl").to_str().unwrap(),
        ])
        .output()
        .expect("Failed to execute binary");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("missing"));
}

#[test]
fn test_cli_rejects_invalid_highlight_mode() {
    let output = run("grade", "shi", &["--red-component", "4"]);
    assert!(!output.status.success());
}
