//! Integration tests for the oathquest CLI commands.
#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn oathquest(store: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("oathquest").unwrap();
    cmd.env("NO_COLOR", "1")
        .arg("--store")
        .arg(store.path());
    cmd
}

/// A store holding one save produced by a short autopilot run.
fn simulated_store(oath: &str) -> TempDir {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["simulate", "--oath", oath, "--seconds", "20", "--willpower", "150"])
        .assert()
        .success();
    store
}

// ---------------------------------------------------------------------------
// simulate
// ---------------------------------------------------------------------------

#[test]
fn simulate_runs_and_saves() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["simulate", "--oath", "run", "--seconds", "20", "--verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Simulation 'run'"))
        .stdout(predicate::str::contains("Event Log"))
        .stdout(predicate::str::contains("enemies appear"))
        .stdout(predicate::str::contains("Enemies defeated"));

    assert!(store.path().join("oathquest_game_run_hero.json").exists());
}

#[test]
fn simulate_is_deterministic_per_seed() {
    let run = |store: &TempDir| {
        let output = oathquest(store)
            .args(["simulate", "--oath", "det", "--seconds", "15", "--seed", "9"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    assert_eq!(run(&a), run(&b));
}

#[test]
fn simulate_rejects_bad_oath_id() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["simulate", "--oath", "two words", "--seconds", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

// ---------------------------------------------------------------------------
// status
// ---------------------------------------------------------------------------

#[test]
fn status_fresh_hero_is_level_one() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["status", "--oath", "fresh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level 1"))
        .stdout(predicate::str::contains("no save yet"))
        .stdout(predicate::str::contains("Town Center"))
        .stdout(predicate::str::contains("power_strike"));
}

#[test]
fn status_levels_from_willpower() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["status", "--oath", "keen", "--willpower", "350"])
        .assert()
        .success()
        .stdout(predicate::str::contains("level 4"))
        .stdout(predicate::str::contains("350/400 xp, 4 skill points"));
}

#[test]
fn status_after_simulate_reports_save() {
    let store = simulated_store("hero");
    oathquest(&store)
        .args(["status", "--oath", "hero"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(version 1)"));
}

// ---------------------------------------------------------------------------
// travel
// ---------------------------------------------------------------------------

#[test]
fn travel_to_open_node() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["travel", "--oath", "walker", "whispering_woods"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Traveled to"));

    oathquest(&store)
        .args(["status", "--oath", "walker"])
        .assert()
        .success()
        .stdout(predicate::str::contains("whispering_woods"));
}

#[test]
fn travel_to_locked_node_fails() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["travel", "--oath", "walker", "storm_peaks"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("storm_peaks is locked"));
}

#[test]
fn travel_to_unknown_node_fails() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["travel", "--oath", "walker", "atlantis"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("node not found: atlantis"));
}

// ---------------------------------------------------------------------------
// unlock
// ---------------------------------------------------------------------------

#[test]
fn unlock_below_level_fails() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["unlock", "--oath", "novice", "power_strike"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("requires hero level 2"));
}

#[test]
fn unlock_after_progress_spends_points() {
    let store = simulated_store("adept");
    oathquest(&store)
        .args(["unlock", "--oath", "adept", "power_strike"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unlocked power_strike"));

    oathquest(&store)
        .args(["unlock", "--oath", "adept", "power_strike"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already unlocked"));
}

// ---------------------------------------------------------------------------
// export / import / reset / saves
// ---------------------------------------------------------------------------

#[test]
fn export_without_save_fails() {
    let store = TempDir::new().unwrap();
    oathquest(&store)
        .args(["export", "--oath", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no save for oath ghost"));
}

#[test]
fn export_reset_import_round_trip() {
    let store = simulated_store("mover");
    let out = TempDir::new().unwrap();
    let file = out.path().join("mover.json");

    oathquest(&store)
        .args(["export", "--oath", "mover", "-o"])
        .arg(&file)
        .assert()
        .success();
    let exported = fs::read_to_string(&file).unwrap();
    assert!(exported.contains("\"heroLevel\""));

    oathquest(&store)
        .args(["reset", "--oath", "mover"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted save for mover"));
    oathquest(&store)
        .args(["saves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No saves found."));

    oathquest(&store)
        .args(["import", "--oath", "mover"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported save for mover"));
    oathquest(&store)
        .args(["saves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("mover"))
        .stdout(predicate::str::contains("1 saves"));
}

#[test]
fn import_rejects_wrong_version() {
    let store = simulated_store("keep");
    let out = TempDir::new().unwrap();
    let file = out.path().join("old.json");
    fs::write(
        &file,
        r#"{"heroLevel": 9, "experience": 0, "skillPoints": 0, "skills": [],
            "equippedWeapon": null, "equippedArmor": [], "enemiesDefeated": 0,
            "lastSaved": "2024-01-01T00:00:00Z", "version": "1.0.0"}"#,
    )
    .unwrap();

    oathquest(&store)
        .args(["import", "--oath", "keep"])
        .arg(&file)
        .assert()
        .failure()
        .stderr(predicate::str::contains("rejected import"));

    oathquest(&store)
        .args(["status", "--oath", "keep"])
        .assert()
        .success()
        .stdout(predicate::str::contains("(version 1)"));
}

#[test]
fn reset_all_clears_store() {
    let store = simulated_store("one");
    oathquest(&store)
        .args(["simulate", "--oath", "two", "--seconds", "5"])
        .assert()
        .success();
    oathquest(&store)
        .args(["saves"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2 saves"));

    oathquest(&store)
        .args(["reset", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted 2 saves"));
}

#[test]
fn reset_needs_a_target() {
    let store = TempDir::new().unwrap();
    oathquest(&store).args(["reset"]).assert().failure();
}
