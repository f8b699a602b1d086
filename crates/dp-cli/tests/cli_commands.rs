//! Integration tests for the `dp` CLI commands.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn dp() -> Command {
    let mut cmd = Command::cargo_bin("dp").unwrap();
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Create a temp directory with a configuration file.
fn config_dir(json: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("dicepool.json"), json).unwrap();
    dir
}

#[test]
fn roll_with_script_succeeds() {
    dp().args([
        "roll",
        "--dice",
        "Strength=3",
        "--bonus",
        "2",
        "--obstacle",
        "1",
        "--script",
        "5,3,1,2,6",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Strength +3 / Bonus +2 = 5"))
    .stdout(predicate::str::contains("5, 6"))
    .stdout(predicate::str::contains("3, 1, 2"))
    .stdout(predicate::str::contains("Success (degree 1)"));
}

#[test]
fn roll_json_output() {
    let output = dp()
        .args([
            "roll", "--dice", "strength=3", "--obstacle", "0", "--script", "5,3,1", "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["outcome"], "None");
    assert_eq!(json["hits"], serde_json::json!([5]));
    assert_eq!(json["misses"], serde_json::json!([3, 1]));
    assert_eq!(json["degree"], 0);
}

#[test]
fn roll_with_negative_bonus_ignores_it() {
    let output = dp()
        .args([
            "roll", "--dice", "strength=2", "--bonus", "-1", "--script", "6,6", "--json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["effective_dice_count"], 2);
    assert_eq!(
        json["total_dice_expression"]["components"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn roll_with_modifier() {
    dp().args([
        "roll",
        "--dice",
        "strength=5",
        "--modifier",
        "half-down",
        "--obstacle",
        "3",
        "--script",
        "5,1",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("half-down (2 dice rolled)"))
    .stdout(predicate::str::contains("Partial Success (degree 1)"));
}

#[test]
fn unresolved_reference_fails_with_hint() {
    dp().args(["roll", "--dice", "strength=3", "--obstacle", "@will + 1", "--seed", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("@will"))
        .stderr(predicate::str::contains("--ref will=<value>"));
}

#[test]
fn reference_from_flag() {
    dp().args([
        "roll", "--dice", "strength=2", "--obstacle", "@will", "--ref", "will=1", "--script",
        "5,5",
    ])
    .assert()
    .success()
    .stdout(predicate::str::contains("Ob 2"))
    .stdout(predicate::str::contains("Success"));
}

#[test]
fn reference_from_config_file() {
    let dir = config_dir(r#"{"die_faces": 10, "hit_threshold": 8, "references": {"will": "2"}}"#);
    let config = dir.path().join("dicepool.json");
    let output = dp()
        .args(["roll", "--dice", "will=2", "--obstacle", "@will", "--script", "8,7", "--json"])
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["obstacle"], 3);
    assert_eq!(json["hits"], serde_json::json!([8]));
    assert_eq!(json["misses"], serde_json::json!([7]));
    assert_eq!(json["outcome"], "Partial");
}

#[test]
fn invalid_config_fails() {
    let dir = config_dir(r#"{"die_faces": 6, "hit_threshold": 9}"#);
    dp().args(["roll", "--dice", "strength=1"])
        .arg("--config")
        .arg(dir.path().join("dicepool.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

#[test]
fn invalid_threshold_fails() {
    dp().args(["roll", "--dice", "strength=1", "--faces", "6", "--threshold", "7"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("hit threshold 7 is outside 1..=6"));
}

#[test]
fn malformed_obstacle_is_rendered() {
    dp().args(["roll", "--dice", "strength=1", "--obstacle", "2 * 3"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("operator '*' is not supported"))
        .stderr(predicate::str::contains("formula could not be evaluated"));
}

#[test]
fn formula_shows_terms_and_obstacle() {
    dp().args(["formula", "2D6", "--script", "3,4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2D6 → [3] [4] = 7"))
        .stdout(predicate::str::contains("Ob 8"));
}

#[test]
fn formula_plain_integer() {
    dp().args(["formula", "5"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Ob 5"));
}

#[test]
fn formula_json() {
    let output = dp()
        .args(["formula", "@str d6 + 1", "--ref", "str=2", "--script", "1,6", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["resolved_formula"], "2d6 + 1");
    assert_eq!(json["raw_total"], 8);
    assert_eq!(json["terms"].as_array().unwrap().len(), 3);
}

#[test]
fn seeded_rolls_repeat() {
    let run = || {
        dp().args(["roll", "--dice", "strength=6", "--obstacle", "2", "--seed", "42", "--json"])
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn refs_lists_tokens() {
    dp().args(["refs", "@Will + @strength d6 + @will"])
        .assert()
        .success()
        .stdout(predicate::str::contains("@strength"))
        .stdout(predicate::str::contains("@will"));
}

#[test]
fn refs_without_tokens() {
    dp().args(["refs", "2d6 + 1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No references."));
}

#[test]
fn script_and_seed_conflict() {
    dp().args(["roll", "--seed", "1", "--script", "1"])
        .assert()
        .failure();
}
