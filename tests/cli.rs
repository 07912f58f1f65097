//! End-to-end tests for the hl7pump binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn synthetic_run_stops_after_count_and_persists() {
    let out_dir = tempfile::tempdir().unwrap();

    let mut cmd = Command::cargo_bin("hl7pump").unwrap();
    cmd.args([
        "--rate",
        "10.0",
        "--stop-count",
        "3",
        "--out-dir",
        out_dir.path().to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MSH|^~\\&|SendingApp"))
        .stdout(predicate::str::contains("SENT #3"));

    let files: Vec<_> = std::fs::read_dir(out_dir.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 3);
    for file in &files {
        let name = file.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("hl7_message_"));
        assert!(name.ends_with(".hl7"));
    }
}

#[test]
fn replay_run_emits_corpus_content_verbatim() {
    let corpus_dir = tempfile::tempdir().unwrap();
    let sample = corpus_dir.path().join("fileA.hl7");
    std::fs::write(&sample, "MSH|^~\\&|ReplayApp|FacA").unwrap();

    let mut cmd = Command::cargo_bin("hl7pump").unwrap();
    cmd.args([
        "--rate",
        "10.0",
        "--stop-count",
        "2",
        "--corpus",
        sample.to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("MSH|^~\\&|ReplayApp|FacA"));
}

#[test]
fn ndjson_mode_emits_structured_log() {
    let mut cmd = Command::cargo_bin("hl7pump").unwrap();
    cmd.args(["--rate", "10.0", "--stop-count", "1", "--ndjson"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"sent\""))
        .stdout(predicate::str::contains("\"type\":\"stopped\""));
}

#[test]
fn out_of_range_rate_is_rejected() {
    let mut cmd = Command::cargo_bin("hl7pump").unwrap();
    cmd.args(["--rate", "50.0", "--stop-count", "1"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Rate out of range"));
}

#[test]
fn list_patients_prints_catalog() {
    let mut cmd = Command::cargo_bin("hl7pump").unwrap();
    cmd.arg("--list-patients");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("TEST^PATIENT"))
        .stdout(predicate::str::contains("TEST^JOHN"))
        .stdout(predicate::str::contains("TEST^EMILY"));
}

#[test]
fn unknown_patient_fails_fast() {
    let mut cmd = Command::cargo_bin("hl7pump").unwrap();
    cmd.args(["--stop-count", "1", "--patient", "TEST^NOBODY"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown test patient"));
}
