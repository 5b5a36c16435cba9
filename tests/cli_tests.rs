use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const OVERRIDES: [&str; 5] = [
    "MAX_PAIR_COST",
    "MAX_TRADE_AMOUNT",
    "MAX_TOTAL_EXPOSURE",
    "MIN_PROFIT_TARGET",
    "LOG_LEVEL",
];

/// Binary invocation isolated in an empty working directory.
fn pairlock(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pairlock").expect("binary");
    cmd.current_dir(dir.path()).env("RUST_LOG", "error");
    for key in OVERRIDES {
        cmd.env_remove(key);
    }
    cmd
}

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("pairlock.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn json_stdout(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout is one JSON document")
}

#[test]
fn check_config_accepts_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[strategy]\nmax_trade_amount = 20\n");

    pairlock(&dir)
        .args(["check", "config", "--color", "never", "--config"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration file is valid"));
}

#[test]
fn check_config_rejects_pair_cost_at_one() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[strategy]\nmax_pair_cost = 1.0\n");

    pairlock(&dir)
        .args(["check", "config", "--config"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("max_pair_cost"));
}

#[test]
fn check_config_reports_missing_file() {
    let dir = TempDir::new().unwrap();
    pairlock(&dir)
        .args(["check", "config"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn check_config_json_reports_limits() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[risk]\ninitial_capital = 400\n");

    let output = pairlock(&dir)
        .args(["check", "config", "--json", "--config"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["valid"], true);
    assert_eq!(value["initial_capital"], "400");
}

#[test]
fn seeded_simulation_is_reproducible() {
    let dir = TempDir::new().unwrap();
    let run = || {
        pairlock(&dir)
            .args(["simulate", "--json", "--seed", "7", "--ticks", "60"])
            .output()
            .unwrap()
    };

    let first = run();
    let second = run();
    assert!(first.status.success());
    assert_eq!(first.stdout, second.stdout);

    let value = json_stdout(&first);
    assert_eq!(value["command"], "simulate");
    assert_eq!(value["seed"], 7);
    assert!(value["outcome"]["ticks"].as_u64().unwrap() <= 60);
}

#[test]
fn batch_json_counts_runs() {
    let dir = TempDir::new().unwrap();
    let output = pairlock(&dir)
        .args(["batch", "--json", "--runs", "5", "--ticks", "20", "--seed", "3"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = json_stdout(&output);
    assert_eq!(value["report"]["runs"], 5);
    assert_eq!(value["report"]["profits"].as_array().unwrap().len(), 5);
}

#[test]
fn env_override_is_validated() {
    let dir = TempDir::new().unwrap();
    pairlock(&dir)
        .env("MAX_TRADE_AMOUNT", "-5")
        .args(["simulate", "--seed", "1", "--no-banner"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_trade_amount"));
}
