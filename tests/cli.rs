use std::fs;

use assert_cmd::Command;
use csv::Reader;
use predicates::prelude::*;

fn descent() -> Command {
    Command::cargo_bin("descent").expect("descent binary")
}

#[test]
fn default_report_uses_first_scenario() {
    descent()
        .assert()
        .success()
        .stdout(predicate::str::contains("=== Descent Profile: cargo_drop ==="))
        .stdout(predicate::str::contains("Touchdown"))
        .stdout(predicate::str::contains("Oscillation"));
}

#[test]
fn report_marks_horizon_when_still_airborne() {
    descent()
        .args(["--name", "cubesat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CubeSat-Alpha"))
        .stdout(predicate::str::contains("Horizon"))
        .stdout(predicate::str::contains("[4 g cap]").not());
}

#[test]
fn state_query_prints_nearest_sample() {
    descent()
        .args(["--name", "cubesat", "--at", "1.9"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Altitude [m]: 982.29"))
        .stdout(predicate::str::contains("[WARNING]").not());
}

#[test]
fn state_query_past_horizon_warns() {
    descent()
        .args(["--name", "cubesat", "--at", "10000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[WARNING]"))
        .stdout(predicate::str::contains("Time [s]: 60.000"));
}

#[test]
fn csv_trajectory_output() {
    let output = descent()
        .args(["--name", "cubesat", "--format", "csv", "--max-time", "5"])
        .output()
        .expect("run descent");
    assert!(output.status.success());

    let mut reader = Reader::from_reader(output.stdout.as_slice());
    let headers = reader.headers().unwrap().clone();
    assert_eq!(&headers[0], "time_s");
    assert_eq!(&headers[5], "phase");
    let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 51);
    assert_eq!(&rows[0][0], "0.000");
    assert_eq!(&rows[0][1], "1000.000");
    assert_eq!(&rows[0][5], "free_fall");
    assert_eq!(&rows[50][5], "terminal_descent");
}

#[test]
fn csv_oscillation_output_without_configured_parameters() {
    descent()
        .args([
            "--scenario",
            "data/scenarios/catalog.yaml",
            "--name",
            "square_canopy",
            "--format",
            "csv",
            "--series",
            "oscillation",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("time_s,angle_of_attack_deg,altitude_m"));
}

#[test]
fn json_report_contains_profile_fields() {
    descent()
        .args(["--name", "cubesat", "--format", "json", "--max-time", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"terminal_velocity_m_s\""))
        .stdout(predicate::str::contains("\"phase\": \"inflation\""));
}

#[test]
fn overrides_switch_inflation_model() {
    descent()
        .args([
            "--scenario",
            "data/scenarios/catalog.yaml",
            "--name",
            "high_speed_flat",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[4 g cap]"));

    descent()
        .args([
            "--scenario",
            "data/scenarios/catalog.yaml",
            "--name",
            "high_speed_flat",
            "--inflation-model",
            "uncapped",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("[4 g cap]").not());
}

#[test]
fn invalid_overrides_fail_before_generation() {
    descent()
        .args(["--name", "cubesat", "--deploy-time=-1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("deployment time cannot be negative"));

    descent()
        .args(["--name", "cubesat", "--time-step", "0.00001", "--max-time", "600"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("step budget"));
}

#[test]
fn unknown_scenario_fails() {
    descent()
        .args(["--name", "apollo"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("scenario 'apollo' not found"));
}

#[test]
fn unknown_canopy_shape_in_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("odd.toml");
    fs::write(
        &path,
        r#"
name = "odd"

[payload]
name = "Box"
mass_kg = 10.0
shape = "cuboid"
width_m = 0.4
height_m = 0.4

[parachute]
diameter_m = 3.0
drag_coefficient = 1.0
shape = "parasail"

[environment]
altitude_m = 500.0
"#,
    )
    .unwrap();

    descent()
        .arg("--scenario")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown canopy shape `parasail`"));
}

#[test]
fn sweep_tabulates_every_cell() {
    let output = Command::cargo_bin("sweep")
        .unwrap()
        .args(["--name", "cargo_drop", "--diameters", "6,8", "--deploy-times", "0,2"])
        .output()
        .expect("run sweep");
    assert!(output.status.success());

    let mut reader = Reader::from_reader(output.stdout.as_slice());
    assert_eq!(&reader.headers().unwrap()[0], "diameter_m");
    let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 4);
    assert_eq!(&rows[0][0], "6.00");
    assert_eq!(&rows[3][1], "2.00");
}

#[test]
fn sweep_skips_invalid_cells() {
    let output = Command::cargo_bin("sweep")
        .unwrap()
        .args(["--diameters", "0,6", "--deploy-times", "1"])
        .output()
        .expect("run sweep");
    assert!(output.status.success());
    let mut reader = Reader::from_reader(output.stdout.as_slice());
    let rows: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "6.00");
}
