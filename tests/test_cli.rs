//! Tests for the wellcast binary

use assert_cmd::Command;
use predicates::prelude::*;

#[path = "common/mod.rs"]
mod common;

use common::{create_temp_csv, create_temp_file, create_well_dataframe};

fn wellcast() -> Command {
    Command::cargo_bin("wellcast").unwrap()
}

#[test]
fn test_help_lists_options() {
    wellcast()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--test-fraction"))
        .stdout(predicate::str::contains("--n-iter"))
        .stdout(predicate::str::contains("--workers"));
}

#[test]
fn test_missing_input_file_exits_non_zero() {
    wellcast()
        .args(["-i", "/nonexistent/wells.csv", "-t", "oil_180", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn test_target_required_without_prompts() {
    let mut df = create_well_dataframe(10, 1);
    let (_dir, path) = create_temp_csv(&mut df);

    wellcast()
        .args(["-i", path.to_str().unwrap(), "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Target column is required"));
}

#[test]
fn test_missing_target_column_exits_before_fitting() {
    let mut df = create_well_dataframe(30, 2);
    let (_dir, path) = create_temp_csv(&mut df);

    wellcast()
        .args(["-i", path.to_str().unwrap(), "-t", "gas_180", "--no-confirm"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'gas_180' not found"))
        .stdout(predicate::str::contains("Baseline fitted").not());
}

#[test]
fn test_zero_production_exits_with_division_by_zero() {
    let (_dir, path) = create_temp_file(
        "wells.csv",
        "depth,oil_180\n1,100\n2,0\n3,300\n4,400\n5,500\n6,600\n",
    );

    wellcast()
        .args([
            "-i",
            path.to_str().unwrap(),
            "-t",
            "oil_180",
            "--no-confirm",
            "--test-fraction",
            "0",
            "--baseline-trees",
            "2",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("actual value at row"));
}

#[test]
fn test_full_run_writes_report() {
    let mut df = create_well_dataframe(60, 3);
    let (dir, path) = create_temp_csv(&mut df);
    let report = dir.path().join("run.json");

    wellcast()
        .args([
            "-i",
            path.to_str().unwrap(),
            "-t",
            "oil_180",
            "--drop-columns",
            "api_number",
            "--n-iter",
            "2",
            "--cv",
            "2",
            "--workers",
            "2",
            "--test-fraction",
            "0.05",
            "--no-confirm",
            "--report",
            report.to_str().unwrap(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("BEST HYPERPARAMETERS"))
        .stdout(predicate::str::contains("FEATURE IMPORTANCES"))
        .stdout(predicate::str::contains("lateral_length"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(json["metadata"]["target_column"], "oil_180");
    assert_eq!(json["dataset"]["test_rows"], 3);
    assert_eq!(json["search"]["candidates"].as_array().unwrap().len(), 2);
    assert_eq!(json["search"]["fits"], 5);
    assert!(json["evaluation"]["tuned_test"]["accuracy"].is_number());
}
