//! Integration tests running the `airballoon` binary.

use std::process::{Command, Output};

fn airballoon(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_airballoon"))
        .args(args)
        .env_remove("AIRBALLOON_REL_TOLERANCE")
        .env_remove("AIRBALLOON_MAX_SUBDIVISIONS")
        .env_remove("AIRBALLOON_STRICT_ALTITUDE")
        .output()
        .expect("Failed to execute airballoon")
}

#[test]
fn test_query_zenith() {
    let output = airballoon(&["query", "--altitude", "90"]);
    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "1.0000");
}

#[test]
fn test_query_json() {
    let output = airballoon(&["query", "--altitude", "30", "--elevation", "2000", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["altitude"], 30.0);
    assert_eq!(value["elevation"], 2000.0);
    assert_eq!(value["zenith_angle"], 60.0);
    let airmass = value["airmass"].as_f64().unwrap();
    assert!(airmass > 1.0 && airmass < 2.0);
}

#[test]
fn test_query_rejects_sequence() {
    let output = airballoon(&["query", "--altitude", "10,20"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("sequence"));
}

#[test]
fn test_query_rejects_negative_altitude() {
    let output = airballoon(&["query", "--altitude", "-1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("greater than or equal to zero"));
}

#[test]
fn test_query_rejects_space_elevation() {
    let output = airballoon(&["query", "--altitude", "45", "--elevation", "100000"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("less than 100km"));
}

#[test]
fn test_strict_altitude_flag() {
    assert!(airballoon(&["query", "--altitude", "120"]).status.success());
    assert!(!airballoon(&["--strict-altitude", "query", "--altitude", "120"])
        .status
        .success());
}

#[test]
fn test_table_csv() {
    let output = airballoon(&["table", "--from", "60", "--to", "90", "--step", "10"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "altitude,zenith_angle,airmass");
    assert_eq!(lines.len(), 5);
    assert!(lines[4].starts_with("90,0,1.0000"));
}

#[test]
fn test_table_rejects_bad_step() {
    let output = airballoon(&["table", "--step", "0"]);
    assert!(!output.status.success());
}

#[test]
fn test_table_rejects_tiny_step() {
    let output = airballoon(&["table", "--step", "1e-300"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("rows"));
}

#[test]
fn test_table_full_range() {
    let output = airballoon(&["table", "--elevation", "2000", "--progress"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 20);
    assert!(lines[1].starts_with("0,90,"));
    assert!(lines[19].starts_with("90,0,"));
}

#[test]
fn test_density() {
    let output = airballoon(&["density", "--elevation", "0", "--json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["density"], 1.16);
}

#[test]
fn test_info() {
    let output = airballoon(&["info"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("CIRA-2012"));
    assert!(stdout.contains("Zenith column"));
}
