//! End-to-end checks for the overlay figure binary.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn paper_figs() -> Command {
    Command::cargo_bin("paper-figs").expect("binary builds")
}

/// Audit-shaped input: a "report" list of dt / tail_median / runs records.
fn write_audit(dir: &Path, name: &str, rows: &[(f64, f64, u64)]) -> PathBuf {
    let series: Vec<String> = rows
        .iter()
        .map(|(dt, tail, runs)| format!(r#"{{"dt": {dt}, "tail_median": {tail}, "runs": {runs}}}"#))
        .collect();
    let path = dir.join(name);
    fs::write(&path, format!(r#"{{"report": [{}]}}"#, series.join(", "))).unwrap();
    path
}

fn square_law_rows() -> Vec<(f64, f64, u64)> {
    [1e-3, 2e-3, 5e-3, 1e-2, 2e-2]
        .iter()
        .map(|&dt| (dt, 3.0 * dt * dt, 5))
        .collect()
}

#[test]
fn renders_default_only_overlay() {
    let dir = TempDir::new().unwrap();
    let input = write_audit(dir.path(), "default.json", &square_law_rows());
    let out = dir.path().join("figs/sub/fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("caption suggestion:"))
        .stdout(predicate::str::contains("LF-default: m=+2.000"))
        .stderr(predicate::str::contains("input hashes (sha256[:10])"));

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn missing_input_fails_before_any_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(dir.path().join("absent.json"))
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing input"));

    assert!(!out.exists());
}

#[test]
fn sentinel_companions_are_skipped() {
    let dir = TempDir::new().unwrap();
    let input = write_audit(dir.path(), "default.json", &square_law_rows());
    let out = dir.path().join("fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(&input)
        .arg("--thrash")
        .arg("none")
        .arg("--scramble")
        .arg("-")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("LF-thrash").not());
}

#[test]
fn identical_inputs_are_flagged() {
    let dir = TempDir::new().unwrap();
    let input = write_audit(dir.path(), "default.json", &square_law_rows());
    let out = dir.path().join("fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(&input)
        .arg("--thrash")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stderr(predicate::str::contains("byte-identical"))
        .stderr(predicate::str::contains("appear numerically identical"))
        .stdout(predicate::str::contains("LF-default: m="))
        .stdout(predicate::str::contains("LF-thrash: m="));
}

#[test]
fn sparse_summary_gets_fit_na_caption() {
    let dir = TempDir::new().unwrap();
    let default = write_audit(dir.path(), "default.json", &square_law_rows());
    let scramble = dir.path().join("scramble.json");
    fs::write(&scramble, r#"{"points": [[0.001, 2e-4], [0.01, 3e-4]], "n": 2}"#).unwrap();
    let out = dir.path().join("fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(&default)
        .arg("--scramble")
        .arg(&scramble)
        .arg("--show-fit")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("LF-scramble: fit n/a"));
}

#[test]
fn malformed_points_are_skipped_not_fatal() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("summary.json");
    fs::write(
        &input,
        r#"{"points": [[0.001, 3e-6], ["x", 2], [0.002, 1.2e-5], [0.005, 7.5e-5], [0.01, 3e-4]]}"#,
    )
    .unwrap();
    let out = dir.path().join("fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("LF-default: m=+2.000"));
}

#[test]
fn paper_style_renders_without_caption_block() {
    let dir = TempDir::new().unwrap();
    let input = write_audit(dir.path(), "default.json", &square_law_rows());
    let out = dir.path().join("fig1.svg");

    paper_figs()
        .arg("--default")
        .arg(&input)
        .arg("--style")
        .arg("paper")
        .arg("--thrash-jitter")
        .arg("1.5")
        .arg("--out")
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("caption suggestion:"));

    assert!(out.exists());
}
