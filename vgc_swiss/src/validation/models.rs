//! Validation inputs and the shared report type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::TournamentFormat;
use crate::standings::PlayerId;

/// Errors block the action; warnings are advisory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub(crate) fn from_parts(errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
            warnings,
        }
    }

    pub fn has_error_containing(&self, needle: &str) -> bool {
        self.errors.iter().any(|e| e.contains(needle))
    }
}

/// Setup-time settings to sanity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentValidationSettings {
    pub name: String,
    pub format: TournamentFormat,
    pub min_participants: u32,
    pub max_participants: u32,
    pub top_cut_size: Option<u32>,
    pub swiss_rounds: u32,
    pub round_time_minutes: u32,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    /// Expected turnout; `max_participants` is used when unknown
    pub expected_participants: Option<u32>,
}

/// Preconditions for starting a round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundStartContext {
    pub round_number: u32,
    pub previous_round_complete: bool,
    pub planned_rounds: u32,
    pub participant_count: u32,
    pub min_participants: u32,
    pub round_time_minutes: u32,
}

/// A reported match result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchResultData {
    pub player1_id: PlayerId,
    pub player2_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub player1_match_points: u32,
    pub player2_match_points: u32,
    pub player1_game_wins: u32,
    pub player2_game_wins: u32,
    pub is_bye: bool,
}

impl MatchResultData {
    /// A decided match; match points follow the winner.
    pub fn decided(
        player1_id: impl Into<PlayerId>,
        player2_id: impl Into<PlayerId>,
        winner_id: impl Into<PlayerId>,
        player1_game_wins: u32,
        player2_game_wins: u32,
    ) -> Self {
        let player1_id = player1_id.into();
        let winner_id = winner_id.into();
        let player1_won = winner_id == player1_id;
        Self {
            player1_id,
            player2_id: Some(player2_id.into()),
            winner_id: Some(winner_id),
            player1_match_points: u32::from(player1_won),
            player2_match_points: u32::from(!player1_won),
            player1_game_wins,
            player2_game_wins,
            is_bye: false,
        }
    }

    pub fn bye(player_id: impl Into<PlayerId>) -> Self {
        let player_id = player_id.into();
        Self {
            winner_id: Some(player_id.clone()),
            player1_id: player_id,
            player2_id: None,
            player1_match_points: 1,
            player2_match_points: 0,
            player1_game_wins: 0,
            player2_game_wins: 0,
            is_bye: true,
        }
    }
}
