use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use tempfile::tempdir;

fn gsc() -> Command {
    let mut cmd = Command::cargo_bin("gsc").unwrap();
    // Keep the user's own config file out of the tests.
    cmd.env("XDG_CONFIG_HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd.env("HOME", env!("CARGO_TARGET_TMPDIR"));
    cmd
}

#[test]
fn gsc_generate_writes_instance_json() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("instance.json");
    gsc()
        .args(["generate", "-m", "3", "-n", "7", "--seed", "42", "-o"])
        .arg(&out)
        .assert()
        .success();

    let value: Value = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(value["centres"].as_array().unwrap().len(), 3);
    assert_eq!(value["nodes"].as_array().unwrap().len(), 7);
}

#[test]
fn gsc_generate_is_reproducible() {
    let run = || {
        gsc()
            .args(["generate", "-m", "2", "-n", "4", "--seed", "9"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn gsc_generate_rejects_zero_centres() {
    gsc()
        .args(["generate", "-m", "0", "-n", "4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid parameter"));
}

#[test]
fn gsc_solve_prints_json_result() {
    let dir = tempdir().unwrap();
    let csv = dir.path().join("routes.csv");
    let output = gsc()
        .args(["solve", "-m", "3", "-n", "12", "--seed", "5", "--format", "json", "--csv"])
        .arg(&csv)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["status"], "optimal");
    assert!(value["total_cost"].as_f64().unwrap() > 0.0);
    assert_eq!(value["utilization"].as_array().unwrap().len(), 3);

    let table = fs::read_to_string(&csv).unwrap();
    assert!(table.starts_with("centre,node,origin_lat"));
}

#[test]
fn gsc_solve_saved_instance() {
    let dir = tempdir().unwrap();
    let instance = dir.path().join("instance.json");
    gsc()
        .args(["generate", "-m", "2", "-n", "5", "--seed", "1", "-o"])
        .arg(&instance)
        .assert()
        .success();

    gsc()
        .args(["solve", "--instance"])
        .arg(&instance)
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: optimal"))
        .stdout(predicate::str::contains("Centre Utilization"));
}

#[test]
fn gsc_solve_reports_capacity_shortfall() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("gsc.toml");
    fs::write(
        &config,
        "[generator]\ncapacity = [0.1, 0.2]\ndemand = [5.0, 10.0]\n",
    )
    .unwrap();

    gsc()
        .arg("--config")
        .arg(&config)
        .args(["solve", "-m", "2", "-n", "6", "--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Status: infeasible"))
        .stdout(predicate::str::contains("below total demand"));
}

#[test]
fn gsc_solve_unknown_backend_fails() {
    gsc()
        .args(["solve", "-m", "2", "-n", "3", "--backend", "no-such-engine"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-engine"));
}

#[test]
fn gsc_export_lp_text() {
    gsc()
        .args(["export", "-m", "2", "-n", "3", "--seed", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Minimize"))
        .stdout(predicate::str::contains("Subject To"))
        .stdout(predicate::str::contains("demand_2:"));
}

#[test]
fn gsc_export_standard_form() {
    let output = gsc()
        .args(["export", "-m", "2", "-n", "3", "--seed", "4", "--format", "standard"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["c"].as_array().unwrap().len(), 6);
    assert_eq!(value["b"].as_array().unwrap().len(), 5);
}

#[test]
fn gsc_batch_writes_manifest() {
    let dir = tempdir().unwrap();
    gsc()
        .args(["batch", "-m", "2", "-n", "6", "--runs", "3", "--threads", "2", "--out"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("3 optimal"));

    let manifest: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("batch_manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["num_runs"], 3);
    assert_eq!(manifest["runs"][2]["seed"], 2);
}

#[test]
fn gsc_solvers_lists_clarabel() {
    gsc()
        .arg("solvers")
        .assert()
        .success()
        .stdout(predicate::str::contains("clarabel"));
}

#[test]
fn gsc_bad_config_fails() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("gsc.toml");
    fs::write(&config, "[solver]\ntolerance = \"tight\"\n").unwrap();
    gsc()
        .arg("--config")
        .arg(&config)
        .arg("solvers")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing config file"));
}
