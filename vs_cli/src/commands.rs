//! Subcommand implementations over tournament snapshots.
//!
//! Each command takes a snapshot, applies one engine operation and returns
//! the next snapshot (or a report). Reading and writing files is left to
//! `main`.

use anyhow::{Context, Result, anyhow, bail};
use chrono::{DateTime, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use vgc_swiss::drops::{DropRequest, DropTiming};
use vgc_swiss::flow::GeneratedRound;
use vgc_swiss::schedule::RoundTiming;
use vgc_swiss::{
    IdGenerator, MatchResultData, PhaseConfig, PlayerRecord, TournamentFlow, TournamentFormat,
    TournamentSchedule, TournamentScheduleData, TournamentSnapshot, TournamentState,
    ValidationResult, calculate_standings, estimate_schedule, validate_match_result,
};

use crate::config::CliConfig;
use crate::logging::log_transition;

/// A registered player as listed in a roster file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    pub name: String,
}

/// Start a tournament sized for the roster.
pub fn init(
    tournament_id: &str,
    roster: &[PlayerEntry],
    format: TournamentFormat,
    config: &CliConfig,
    ids: &mut dyn IdGenerator,
) -> Result<TournamentSnapshot> {
    if roster.is_empty() {
        bail!("Roster is empty");
    }

    let settings = PhaseConfig {
        best_of: config.best_of,
        round_time_minutes: config.round_minutes,
        ..PhaseConfig::for_player_count(roster.len(), format)
    };
    settings
        .validate()
        .map_err(|e| anyhow!("Invalid tournament settings: {e}"))?;

    let players = roster
        .iter()
        .map(|entry| PlayerRecord::new(entry.id.clone(), entry.name.clone()))
        .collect();

    let state = TournamentState::new(tournament_id, players, ids);
    log_transition(tournament_id, "swiss", 0, "Tournament created");

    Ok(TournamentSnapshot { settings, state })
}

/// Current standings as a plain-text table.
pub fn standings_table(snapshot: &TournamentSnapshot) -> String {
    let standings = calculate_standings(&snapshot.state.players, &snapshot.state.matches);
    let mut out = format!(
        "{:>4}  {:<24} {:>5} {:>6} {:>7} {:>7} {:>7}\n",
        "Rank", "Player", "Pts", "W-L", "OMW%", "GW%", "OGW%"
    );
    for player in &standings {
        let name = if player.is_dropped {
            format!("{} (dropped)", player.name)
        } else {
            player.name.clone()
        };
        out.push_str(&format!(
            "{:>4}  {:<24} {:>5} {:>6} {:>6.2}% {:>6.2}% {:>6.2}%\n",
            player.rank.unwrap_or_default(),
            name,
            player.match_points,
            player.record(),
            player.opponent_match_win_percentage * 100.0,
            player.game_win_percentage * 100.0,
            player.opponent_game_win_percentage * 100.0,
        ));
    }
    out
}

/// Pair the next round.
pub fn pair(snapshot: &TournamentSnapshot, seed: u64) -> Result<(TournamentSnapshot, GeneratedRound)> {
    let flow = TournamentFlow::new(snapshot.settings.clone());
    let mut rng = StdRng::seed_from_u64(seed);
    let round = flow
        .generate_next_round(&snapshot.state, &mut rng)
        .context("Failed to pair the next round")?;

    for warning in &round.warnings {
        tracing::warn!(round = round.round_number, "{}", warning);
    }
    log_transition(
        &snapshot.state.tournament_id,
        &round.state.phase.to_string(),
        round.round_number,
        &format!("Round paired with seed {seed}"),
    );

    let next = TournamentSnapshot {
        settings: snapshot.settings.clone(),
        state: round.state.clone(),
    };
    Ok((next, round))
}

/// Parse a game score such as `2-1`.
pub fn parse_score(score: &str) -> Result<(u32, u32)> {
    let (left, right) = score
        .split_once('-')
        .ok_or_else(|| anyhow!("Score must look like 2-1, got {score}"))?;
    let left = left.trim().parse().with_context(|| format!("Bad score {score}"))?;
    let right = right.trim().parse().with_context(|| format!("Bad score {score}"))?;
    Ok((left, right))
}

/// Record the result of a pending match. `score` is player 1's games
/// first.
pub fn report(
    snapshot: &TournamentSnapshot,
    match_id: &str,
    winner_id: &str,
    score: (u32, u32),
) -> Result<TournamentSnapshot> {
    let pending = snapshot
        .state
        .match_by_id(match_id)
        .ok_or_else(|| anyhow!("Match {match_id} not found"))?;
    let player2 = pending
        .player2_id
        .clone()
        .ok_or_else(|| anyhow!("Match {match_id} is a bye and takes no result"))?;

    let result = MatchResultData::decided(
        pending.player1_id.clone(),
        player2,
        winner_id,
        score.0,
        score.1,
    );

    let flow = TournamentFlow::new(snapshot.settings.clone());
    let state = flow
        .record_match_result(&snapshot.state, match_id, &result)
        .with_context(|| format!("Failed to record {match_id}"))?;

    if flow.is_tournament_complete(&state) {
        log_transition(
            &state.tournament_id,
            &state.phase.to_string(),
            state.current_round,
            "End condition reached",
        );
    }

    Ok(TournamentSnapshot {
        settings: snapshot.settings.clone(),
        state,
    })
}

/// Drop a player at `now`.
pub fn drop_player(
    snapshot: &TournamentSnapshot,
    player_id: &str,
    timing: DropTiming,
    reason: Option<String>,
    now: DateTime<Utc>,
    ids: &mut dyn IdGenerator,
) -> Result<TournamentSnapshot> {
    let state = &snapshot.state;
    let flow = TournamentFlow::new(snapshot.settings.clone());

    // A drop mid-round belongs to that round, otherwise to the next one.
    let round_number = if flow.can_start_next_round(state) {
        state.current_round + 1
    } else {
        state.current_round
    };
    let mut request = DropRequest::new(player_id, state.tournament_id.clone(), round_number, now);
    if let Some(reason) = reason {
        request = request.with_reason(reason);
    }

    let recorded = flow
        .record_drop(state, &request, timing, ids)
        .with_context(|| format!("Failed to drop {player_id}"))?;

    if let Some(match_id) = &recorded.forfeited_match_id {
        tracing::info!(player = player_id, "{} awarded to the opponent", match_id);
    }
    if let Some(bye) = &recorded.drop.bye_assignment {
        tracing::info!(
            player = bye.player_id.as_str(),
            round = bye.round_number,
            "Odd field: bye expected"
        );
    }

    Ok(TournamentSnapshot {
        settings: snapshot.settings.clone(),
        state: recorded.state,
    })
}

/// Hand Swiss over to the top cut.
pub fn advance(snapshot: &TournamentSnapshot, ids: &mut dyn IdGenerator) -> Result<TournamentSnapshot> {
    let flow = TournamentFlow::new(snapshot.settings.clone());
    let state = flow
        .advance_to_top_cut(&snapshot.state, ids)
        .context("Failed to advance to the top cut")?;
    log_transition(&state.tournament_id, "top_cut", 0, "Top cut seeded");
    Ok(TournamentSnapshot {
        settings: snapshot.settings.clone(),
        state,
    })
}

/// Close a finished Swiss-only event.
pub fn finalize(snapshot: &TournamentSnapshot) -> Result<TournamentSnapshot> {
    let flow = TournamentFlow::new(snapshot.settings.clone());
    let state = flow
        .finalize(&snapshot.state)
        .context("Failed to finalize the tournament")?;
    log_transition(&state.tournament_id, "completed", state.current_round, "Tournament finalized");
    Ok(TournamentSnapshot {
        settings: snapshot.settings.clone(),
        state,
    })
}

pub fn validate_result(result: &MatchResultData, best_of: u32) -> ValidationResult {
    validate_match_result(result, best_of)
}

/// Project the schedule from the snapshot's settings.
pub fn schedule(
    snapshot: &TournamentSnapshot,
    start_time: DateTime<Utc>,
    timings: Vec<RoundTiming>,
    now: DateTime<Utc>,
) -> TournamentSchedule {
    let mut data = TournamentScheduleData::from_config(&snapshot.settings, start_time);
    data.rounds = timings;
    estimate_schedule(&data, now)
}
