//! End-to-end checks for the reversibility demo companion binary.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn reversibility() -> Command {
    Command::cargo_bin("reversibility").expect("binary builds")
}

#[test]
fn renders_two_bars_with_value_annotations() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reversibility_demo.json");
    fs::write(
        &input,
        r#"{
            "k": 4,
            "dt": 0.01,
            "normalized_rt_error_leapfrog": 3.0e-7,
            "normalized_rt_error_euler": 0.18
        }"#,
    )
    .unwrap();
    let out = dir.path().join("figs/reversibility.svg");

    reversibility()
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("Reversibility Test (k=4, dt=0.01)"));
    assert!(svg.contains("Leapfrog (LF-precond)"));
    assert!(svg.contains("Euler (SGD-like)"));
    // one annotation per bar
    assert!(svg.contains("3.00e-7"));
    assert!(svg.contains("1.80e-1"));
    // the bars themselves are the only series-colored fills
    assert!(svg.matches("fill=\"#2563EB\"").count() >= 2);
}

#[test]
fn missing_json_names_the_path() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("absent.json");

    reversibility()
        .arg("--input")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing input"))
        .stderr(predicate::str::contains("absent.json"));
}

#[test]
fn malformed_json_is_fatal_with_context() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reversibility_demo.json");
    fs::write(&input, "{ not json").unwrap();

    reversibility()
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(dir.path().join("reversibility.svg"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing"));
}

#[test]
fn absent_fields_fall_back_to_placeholders() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("reversibility_demo.json");
    fs::write(&input, "{}").unwrap();
    let out = dir.path().join("reversibility.svg");

    reversibility()
        .arg("--input")
        .arg(&input)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.contains("Reversibility Test (k=?, dt=?)"));
    assert!(svg.contains("0.00e0"));
}
