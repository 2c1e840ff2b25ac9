//! Top-cut bracket creation and advancement.

use log::{debug, info};
use thiserror::Error;

use super::models::{BracketMatch, BracketRound, BracketSeed, BracketStructure, PhaseFormat};
use crate::constants::VALID_BRACKET_SIZES;
use crate::pairing::active_standings;
use crate::standings::{MatchRecord, PlayerRecord};

/// Bracket errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketError {
    #[error("Invalid bracket size {0}: must be one of 4, 8, 16, 32, 64, 128, 256")]
    InvalidSize(u32),

    #[error("Not enough active players for a top {needed}: have {available}")]
    NotEnoughPlayers { needed: u32, available: usize },

    #[error("Bracket match not found: {0}")]
    MatchNotFound(String),

    #[error("Bracket match {0} is already complete")]
    MatchAlreadyComplete(String),

    #[error("Bracket match {0} does not have both players yet")]
    MatchNotReady(String),

    #[error("Player {winner} is not in bracket match {match_id}")]
    InvalidWinner { match_id: String, winner: String },
}

pub type BracketResult<T> = Result<T, BracketError>;

pub fn is_valid_bracket_size(size: u32) -> bool {
    VALID_BRACKET_SIZES.contains(&size)
}

/// Display name for a round given how many rounds remain including it.
pub fn round_name(rounds_remaining: u32) -> String {
    match rounds_remaining {
        1 => "Finals".to_string(),
        2 => "Semifinals".to_string(),
        3 => "Quarterfinals".to_string(),
        4 => "Round of 16".to_string(),
        n => match 1u64.checked_shl(n) {
            Some(players) => format!("Top {players}"),
            None => format!("Round {n} from the final"),
        },
    }
}

/// Seed numbers in bracket slot order, so seeds 1 and 2 can only meet in
/// the final (8 → 1,8,4,5,2,7,3,6).
fn seeding_order(size: u32) -> Vec<u32> {
    let mut order = vec![1u32];
    while (order.len() as u32) < size {
        let mirror = order.len() as u32 * 2 + 1;
        order = order.iter().flat_map(|&seed| [seed, mirror - seed]).collect();
    }
    order
}

/// Seed a bracket from the top `size` active players by standings.
///
/// Dropped players never qualify, whatever their record.
pub fn create_bracket(players: &[PlayerRecord], size: u32) -> BracketResult<BracketStructure> {
    if !is_valid_bracket_size(size) {
        return Err(BracketError::InvalidSize(size));
    }

    let standings = active_standings(players);
    if standings.len() < size as usize {
        return Err(BracketError::NotEnoughPlayers {
            needed: size,
            available: standings.len(),
        });
    }

    let seeds: Vec<BracketSeed> = standings
        .iter()
        .take(size as usize)
        .zip(1u32..)
        .map(|(player, seed)| BracketSeed {
            seed,
            player_id: player.id.clone(),
        })
        .collect();

    let total_rounds = size.trailing_zeros();
    let order = seeding_order(size);

    let rounds = (1..=total_rounds)
        .map(|round_number| {
            let match_count = size >> round_number;
            let matches = (0..match_count)
                .map(|slot| {
                    let mut m = BracketMatch {
                        id: MatchRecord::top_cut_id(round_number, slot),
                        round_number,
                        slot,
                        player1_id: None,
                        player2_id: None,
                        player1_seed: None,
                        player2_seed: None,
                        winner_id: None,
                        is_complete: false,
                    };
                    if round_number == 1 {
                        let high = order[(slot * 2) as usize];
                        let low = order[(slot * 2 + 1) as usize];
                        m.player1_seed = Some(high);
                        m.player2_seed = Some(low);
                        m.player1_id = Some(seeds[(high - 1) as usize].player_id.clone());
                        m.player2_id = Some(seeds[(low - 1) as usize].player_id.clone());
                    }
                    m
                })
                .collect();
            BracketRound {
                round_number,
                name: round_name(total_rounds - round_number + 1),
                matches,
            }
        })
        .collect();

    info!("Created top {size} bracket with {total_rounds} rounds");

    Ok(BracketStructure {
        format: PhaseFormat::SingleElimination,
        size,
        total_rounds,
        seeds,
        rounds,
    })
}

/// Record a winner and return the advanced bracket.
///
/// The winner moves into the parent slot of the next round; the loser is
/// eliminated. Completed matches are never rewritten.
pub fn record_result(
    bracket: &BracketStructure,
    match_id: &str,
    winner_id: &str,
) -> BracketResult<BracketStructure> {
    let current = bracket
        .match_by_id(match_id)
        .ok_or_else(|| BracketError::MatchNotFound(match_id.to_string()))?;

    if current.is_complete {
        return Err(BracketError::MatchAlreadyComplete(match_id.to_string()));
    }
    if !current.is_ready() {
        return Err(BracketError::MatchNotReady(match_id.to_string()));
    }

    let winner_seed = if current.player1_id.as_deref() == Some(winner_id) {
        current.player1_seed
    } else if current.player2_id.as_deref() == Some(winner_id) {
        current.player2_seed
    } else {
        return Err(BracketError::InvalidWinner {
            match_id: match_id.to_string(),
            winner: winner_id.to_string(),
        });
    };

    let (round_number, slot) = (current.round_number, current.slot);
    let mut next = bracket.clone();

    for round in &mut next.rounds {
        if round.round_number == round_number {
            if let Some(m) = round.matches.iter_mut().find(|m| m.slot == slot) {
                m.winner_id = Some(winner_id.to_string());
                m.is_complete = true;
            }
        } else if round.round_number == round_number + 1 {
            if let Some(parent) = round.matches.iter_mut().find(|m| m.slot == slot / 2) {
                if slot % 2 == 0 {
                    parent.player1_id = Some(winner_id.to_string());
                    parent.player1_seed = winner_seed;
                } else {
                    parent.player2_id = Some(winner_id.to_string());
                    parent.player2_seed = winner_seed;
                }
            }
        }
    }

    debug!("Bracket match {match_id} won by {winner_id}");
    if next.is_complete() {
        info!("Top cut complete: {winner_id} is champion");
    }

    Ok(next)
}
