use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn triband() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("triband"))
}

#[test]
fn create_settings_json_outputs_defaults() {
    triband()
        .args(["create", "settings-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"low_cut_freq\": 20.0"))
        .stdout(predicate::str::contains("\"peak_freq\": 750.0"))
        .stdout(predicate::str::contains("\"high_cut_slope\": 12"))
        .stdout(predicate::str::contains("\"peak_bypassed\": false"));
}

#[test]
fn create_analyzer_json_outputs_defaults() {
    triband()
        .args(["create", "analyzer-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"fft_order\": 11"))
        .stdout(predicate::str::contains("\"floor_db\": -48.0"));
}

#[test]
fn curve_reads_host_parameter_names() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    fs::write(&path, r#"{"Peak Freq": 1000.0, "Peak Gain": 24.0, "LowCut Slope": 48}"#)
        .expect("write settings");

    triband()
        .args(["-q", "curve", "--width", "8", "--json", "--settings"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[[0,"))
        .stdout(predicate::str::contains("[7,"));
}

#[test]
fn curve_rejects_malformed_settings() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ not json").expect("write settings");

    triband()
        .args(["curve", "--settings"])
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse settings"));
}

#[test]
fn analyze_reports_the_tone_bin() {
    triband()
        .args(["-q", "analyze", "--freq", "1000", "--blocks", "8"])
        .assert()
        .success()
        .stdout(predicate::str::is_match(r"peak bin 4[234] ").expect("regex"))
        .stdout(predicate::str::contains("fft size 2048"));
}

#[test]
fn create_state_emits_named_parameters() {
    triband()
        .args(["create", "state"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"Analyzer Enabled\":1.0"))
        .stdout(predicate::str::contains("\"LowCut Freq\":20.0"));
}
