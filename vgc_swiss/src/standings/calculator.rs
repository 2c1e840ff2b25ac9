//! Standings and tiebreakers derived from Swiss match history.

use log::debug;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::models::{MatchRecord, MatchStage, PlayerRecord};
use crate::constants::{BYE_MATCH_POINTS, WIN_MATCH_POINTS, WIN_PERCENTAGE_FLOOR};

/// Ratio floored at [`WIN_PERCENTAGE_FLOOR`]; an empty denominator yields the floor.
fn floored_ratio(numerator: u32, denominator: u32) -> f64 {
    if denominator == 0 {
        return WIN_PERCENTAGE_FLOOR;
    }
    (f64::from(numerator) / f64::from(denominator)).max(WIN_PERCENTAGE_FLOOR)
}

fn mean_or_floor(values: &[f64]) -> f64 {
    if values.is_empty() {
        return WIN_PERCENTAGE_FLOOR;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    mean.max(WIN_PERCENTAGE_FLOOR)
}

/// Canonical standings order: match points, then opponent MWP, GWP and
/// opponent GWP, all descending. Full ties fall back to player id.
pub fn compare_standings(a: &PlayerRecord, b: &PlayerRecord) -> Ordering {
    b.match_points
        .cmp(&a.match_points)
        .then_with(|| {
            b.opponent_match_win_percentage
                .total_cmp(&a.opponent_match_win_percentage)
        })
        .then_with(|| b.game_win_percentage.total_cmp(&a.game_win_percentage))
        .then_with(|| {
            b.opponent_game_win_percentage
                .total_cmp(&a.opponent_game_win_percentage)
        })
        .then_with(|| a.id.cmp(&b.id))
}

/// Sort in place by [`compare_standings`].
pub fn sort_standings(players: &mut [PlayerRecord]) {
    players.sort_by(compare_standings);
}

/// Recompute every player's record and tiebreakers.
///
/// Identity fields (`id`, `name`, `is_dropped`) are kept from `players`;
/// everything else is rebuilt from completed Swiss matches so the result
/// does not depend on whatever stale numbers the caller passed in. Dropped
/// players stay in the output because their results still count toward
/// their opponents' resistance. The returned list is sorted and ranked.
pub fn calculate_standings(players: &[PlayerRecord], matches: &[MatchRecord]) -> Vec<PlayerRecord> {
    let mut records: Vec<PlayerRecord> = players
        .iter()
        .map(|p| {
            let mut fresh = PlayerRecord::new(p.id.clone(), p.name.clone());
            fresh.is_dropped = p.is_dropped;
            fresh
        })
        .collect();

    let index: HashMap<String, usize> = records
        .iter()
        .enumerate()
        .map(|(idx, p)| (p.id.clone(), idx))
        .collect();

    for m in matches
        .iter()
        .filter(|m| m.stage == MatchStage::Swiss && m.is_complete)
    {
        apply_match(&mut records, &index, m);
    }

    for record in &mut records {
        record.has_received_bye = record.bye_count > 0;
        record.match_win_percentage = floored_ratio(record.match_points, record.rounds_played);
        record.game_win_percentage =
            floored_ratio(record.game_wins, record.game_wins + record.game_losses);
    }

    // Resistance reads the opponents' current percentages, so it runs as a
    // second pass over the already-updated snapshot.
    let resistance: Vec<(f64, f64)> = records
        .iter()
        .map(|record| {
            let (mwps, gwps): (Vec<f64>, Vec<f64>) = record
                .previous_opponents
                .iter()
                .filter_map(|opp| index.get(opp))
                .map(|&idx| {
                    (
                        records[idx].match_win_percentage,
                        records[idx].game_win_percentage,
                    )
                })
                .unzip();
            (mean_or_floor(&mwps), mean_or_floor(&gwps))
        })
        .collect();

    for (record, (omw, ogw)) in records.iter_mut().zip(resistance) {
        record.opponent_match_win_percentage = omw;
        record.opponent_game_win_percentage = ogw;
    }

    sort_standings(&mut records);
    for (position, record) in records.iter_mut().enumerate() {
        record.rank = Some(position as u32 + 1);
    }

    debug!(
        "Calculated standings for {} players from {} matches",
        records.len(),
        matches.len()
    );

    records
}

fn apply_match(records: &mut [PlayerRecord], index: &HashMap<String, usize>, m: &MatchRecord) {
    let Some(&p1) = index.get(&m.player1_id) else {
        debug!("Skipping match {}: unknown player {}", m.id, m.player1_id);
        return;
    };

    if m.is_bye {
        let player = &mut records[p1];
        player.match_points += BYE_MATCH_POINTS;
        player.wins += 1;
        player.bye_count += 1;
        player.rounds_played += 1;
        return;
    }

    let Some(&p2) = m.player2_id.as_ref().and_then(|id| index.get(id)) else {
        debug!("Skipping match {}: unknown or missing second player", m.id);
        return;
    };

    for (me, them, my_games, their_games) in [
        (p1, p2, m.player1_game_wins, m.player2_game_wins),
        (p2, p1, m.player2_game_wins, m.player1_game_wins),
    ] {
        let opponent_id = records[them].id.clone();
        let won = m.winner_id.as_deref() == Some(records[me].id.as_str());
        let player = &mut records[me];
        player.rounds_played += 1;
        player.game_wins += my_games;
        player.game_losses += their_games;
        if won {
            player.match_points += WIN_MATCH_POINTS;
            player.wins += 1;
        } else {
            player.losses += 1;
        }
        player.previous_opponents.insert(opponent_id);
    }
}
