mod common;

use common::data_path;
use hanzi_grader::config::EngineSettings;
use hanzi_grader::rules::{Lookup, LookupArgs, Metric, RuleTable};
use hanzi_grader::GradeError;
use rstest::rstest;
use serde_json::{json, Value};
use std::fs;
use strum::IntoEnumIterator;
use tempfile::TempDir;

fn default_json() -> Value {
    let content = fs::read_to_string(data_path("rules/default.json")).unwrap();
    serde_json::from_str(&content).unwrap()
}

fn load_mutated(doc: &Value) -> Result<RuleTable, GradeError> {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rules.json");
    fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    RuleTable::load_from_file(&path)
}

#[test]
fn test_default_table_prices_every_metric() {
    let table = common::rule_table();
    for metric in Metric::iter() {
        assert!(table.full_score(metric) > 0.0, "{} has no weight", metric);
        assert!(!table.rules(metric).is_empty(), "{} has no rules", metric);
    }
    assert_eq!(table.settings.width, 256);
    assert_eq!(table.settings.red_component, 1);
}

#[rstest]
#[case("/metrics/stroke_size/rules/0/code", json!(9))]
#[case("/metrics/stroke_size/rules/0/min", json!(0.5))]
#[case("/metrics/stroke_size/rules/0/deduction", json!(0.5))]
#[case("/metrics/stroke_size/rules/0/deduction", json!(-0.01))]
#[case("/metrics/stroke_size/full_score", json!(-1.0))]
#[case("/settings/red_component", json!(3))]
#[case("/settings/width", json!(0))]
fn test_inconsistent_table_is_rejected(#[case] pointer: &str, #[case] value: Value) {
    let mut doc = default_json();
    *doc.pointer_mut(pointer).expect("pointer exists in default table") = value;
    let err = load_mutated(&doc).unwrap_err();
    assert!(matches!(err, GradeError::Config(_)), "got {:?}", err);
}

#[test]
fn test_missing_metric_is_rejected() {
    let mut doc = default_json();
    doc["metrics"].as_object_mut().unwrap().remove("stroke_order");
    match load_mutated(&doc) {
        Err(GradeError::Config(msg)) => assert!(msg.contains("stroke_order"), "{}", msg),
        other => panic!("expected a config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_metric_is_rejected() {
    let mut doc = default_json();
    doc["metrics"]["stroke_speed"] = json!({ "full_score": 0.1, "rules": [] });
    match load_mutated(&doc) {
        Err(GradeError::Config(msg)) => assert!(msg.contains("stroke_speed"), "{}", msg),
        other => panic!("expected a config error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_malformed_json_is_a_parse_error() {
    let err = RuleTable::from_json_str("{ \"metrics\": [").unwrap_err();
    assert!(matches!(err, GradeError::Json(_)));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = RuleTable::load_from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, GradeError::Io(_)));
}

#[test]
fn test_settings_block_is_optional() {
    let mut doc = default_json();
    doc.as_object_mut().unwrap().remove("settings");
    let table = load_mutated(&doc).unwrap();
    assert_eq!(table.settings, EngineSettings::default());
}

#[rstest]
#[case(0.05, None)]
#[case(0.2, Some(0.02))]
#[case(-0.2, Some(0.02))]
#[case(0.3, Some(0.05))]
#[case(5.0, Some(0.05))]
fn test_lookup_bands_by_magnitude(#[case] magnitude: f64, #[case] expected: Option<f64>) {
    let table = common::rule_table();
    let got = match table.lookup(Metric::CharacterSize, magnitude, 1, LookupArgs::default()) {
        Lookup::Deviation(d) => Some(d.amount),
        Lookup::NoDeviation => None,
    };
    assert_eq!(got, expected);
}

#[test]
fn test_lookup_in_unpriced_bucket_is_no_deviation() {
    let table = common::rule_table();
    let got = table.lookup(Metric::StrokeSize, 0.9, 7, LookupArgs::default());
    assert_eq!(got, Lookup::NoDeviation);
}

#[test]
fn test_lookup_fills_comment_and_sounds() {
    let table = common::rule_table();
    let Lookup::Deviation(d) = table.lookup(Metric::StrokeSize, 0.5, 2, LookupArgs::stroke(3, "竖")) else {
        panic!("expected a deviation");
    };
    assert_eq!(d.comment, "第3笔竖写短了");
    assert_eq!(d.sounds, vec!["stroke_short".to_string()]);
    assert_eq!(d.code, 2);
    assert_eq!(d.amount, 0.1);
}

#[test]
fn test_count_rules_have_no_upper_bound() {
    let table = common::rule_table();
    let Lookup::Deviation(d) = table.lookup(Metric::StrokeCount, 40.0, 1, LookupArgs::count(40)) else {
        panic!("expected a deviation");
    };
    assert_eq!(d.amount, table.full_score(Metric::StrokeCount));
    assert_eq!(d.comment, "多写了40笔");
}
