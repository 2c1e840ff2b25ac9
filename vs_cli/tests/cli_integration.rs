//! Integration tests for the command-line driver.
//!
//! Runs the built binary against snapshot files in a scratch directory.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use vgc_swiss::{MatchResultData, Phase, TournamentSnapshot};

/// Scratch directory unique to one test
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("vs_cli_{name}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn vs_cli(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_vs_cli"))
        .args(args)
        .env("RUST_LOG", "warn")
        .env_remove("VS_SEED")
        .env_remove("VS_OUTPUT")
        .env_remove("VS_BEST_OF")
        .output()
        .unwrap()
}

fn write_roster(dir: &PathBuf, n: usize) -> PathBuf {
    let roster: Vec<serde_json::Value> = (1..=n)
        .map(|i| serde_json::json!({ "id": format!("p{i:02}"), "name": format!("Player {i}") }))
        .collect();
    let path = dir.join("roster.json");
    fs::write(&path, serde_json::to_string(&roster).unwrap()).unwrap();
    path
}

fn read_snapshot(path: &PathBuf) -> TournamentSnapshot {
    TournamentSnapshot::from_json(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_help() {
    let output = vs_cli(&["--help"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("USAGE"));
}

#[test]
fn test_unknown_command_fails() {
    let output = vs_cli(&["shuffle"]);
    assert!(!output.status.success());
}

#[test]
fn test_init_pair_report_standings() {
    let dir = scratch_dir("round");
    let roster = write_roster(&dir, 6);
    let snapshot = dir.join("snapshot.json");
    let snap = snapshot.to_str().unwrap();

    let init = vs_cli(&[
        "init",
        "--roster",
        roster.to_str().unwrap(),
        "--id",
        "league-cup",
        "--format",
        "swiss_only",
        "--out",
        snap,
    ]);
    assert!(init.status.success(), "{}", String::from_utf8_lossy(&init.stderr));
    let created = read_snapshot(&snapshot);
    assert_eq!(created.state.players.len(), 6);
    assert_eq!(created.settings.swiss_rounds, 3);

    let paired = vs_cli(&["pair", snap, "--seed", "11", "--out", snap]);
    assert!(paired.status.success(), "{}", String::from_utf8_lossy(&paired.stderr));
    let state = read_snapshot(&snapshot).state;
    assert_eq!(state.current_round, 1);
    let first = state.current_round_matches()[0].clone();

    let reported = vs_cli(&[
        "report",
        snap,
        "--match",
        &first.id,
        "--winner",
        &first.player1_id,
        "--score",
        "2-1",
        "--out",
        snap,
    ]);
    assert!(reported.status.success(), "{}", String::from_utf8_lossy(&reported.stderr));
    let state = read_snapshot(&snapshot).state;
    assert!(state.match_by_id(&first.id).unwrap().is_complete);
    assert_eq!(state.phase, Phase::Swiss);

    let standings = vs_cli(&["standings", snap]);
    assert!(standings.status.success());
    let table = String::from_utf8_lossy(&standings.stdout);
    assert_eq!(table.lines().count(), 7);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn test_validate_result_exit_code() {
    let dir = scratch_dir("validate");
    let path = dir.join("result.json");

    let mut result = MatchResultData::decided("alice", "bob", "alice", 2, 1);
    fs::write(&path, serde_json::to_string(&result).unwrap()).unwrap();
    let ok = vs_cli(&["validate-result", path.to_str().unwrap(), "--output", "compact"]);
    assert!(ok.status.success());
    assert!(String::from_utf8_lossy(&ok.stdout).contains("\"is_valid\":true"));

    result.winner_id = Some("bob".to_string());
    fs::write(&path, serde_json::to_string(&result).unwrap()).unwrap();
    let bad = vs_cli(&["validate-result", path.to_str().unwrap()]);
    assert!(!bad.status.success());
    assert!(
        String::from_utf8_lossy(&bad.stdout)
            .contains("Winner must be the player with higher match points")
    );

    let _ = fs::remove_dir_all(&dir);
}
