use std::fs;
use std::path::Path;

use crowdscan_core::{Report, decode_uplink_file};

fn load_expected_report(dir: &str) -> Report {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let expected_path = root.join(dir).join("expected_report.json");

    let expected_json = fs::read_to_string(&expected_path).expect("read expected_report.json");
    serde_json::from_str(&expected_json).expect("parse expected report")
}

fn run_golden(dir: &str) {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join("..").join("..");
    let input = root.join(dir).join("input.jsonl");
    let expected = load_expected_report(dir);

    let mut actual = decode_uplink_file(&input).expect("decode uplink file");
    actual.input.path = expected.input.path.clone();

    let actual_value = serde_json::to_value(actual).expect("serialize actual");
    let expected_value = serde_json::to_value(expected).expect("serialize expected");

    assert_eq!(actual_value, expected_value, "golden mismatch in {dir}");
}

#[test]
fn golden_counter_full() {
    run_golden("tests/golden/counter_full");
}

#[test]
fn golden_counter_short() {
    run_golden("tests/golden/counter_short");
}

#[test]
fn golden_counter_empty() {
    run_golden("tests/golden/counter_empty");
}

#[test]
fn golden_counter_mixed() {
    run_golden("tests/golden/counter_mixed");
}

#[test]
fn golden_counter_short_carries_warning() {
    let report = load_expected_report("tests/golden/counter_short");
    let summary = report.summary.expect("summary");
    assert_eq!(summary.uplinks_total, 1);
    assert_eq!(summary.warnings_total, 1);
    assert_eq!(report.uplinks[0].warnings.len(), 1);
}

#[test]
fn golden_counter_mixed_orders_uplinks_by_file_position() {
    let report = load_expected_report("tests/golden/counter_mixed");
    let summary = report.summary.expect("summary");
    assert_eq!(summary.uplinks_total, 3);
    assert_eq!(report.uplinks[0].data.crowd_level, 5);
    assert_eq!(report.uplinks[0].data.crowd_level_text, "UNKNOWN");
    assert_eq!(report.uplinks[1].payload_hex, "ff");
    assert_eq!(report.uplinks[2].port, Some(10));
}

#[test]
fn golden_counter_empty_uses_default_generated_at() {
    let report = load_expected_report("tests/golden/counter_empty");
    assert_eq!(report.generated_at, crowdscan_core::DEFAULT_GENERATED_AT);
}
