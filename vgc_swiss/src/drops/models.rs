//! Drop and bye data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::BYE_MATCH_POINTS;
use crate::standings::{PlayerId, PlayerRecord};

/// Where in the round cycle a drop is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropTiming {
    /// Pairings posted, round not started yet
    Pairing,
    /// No round in progress
    BetweenRounds,
    /// The player's own match is being played
    DuringMatch,
    /// The round is live but the player's match is not in play
    DuringRound,
}

impl DropTiming {
    pub fn allows_drop(&self) -> bool {
        match self {
            DropTiming::Pairing | DropTiming::BetweenRounds | DropTiming::DuringMatch => true,
            DropTiming::DuringRound => false,
        }
    }
}

impl std::fmt::Display for DropTiming {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DropTiming::Pairing => write!(f, "pairing"),
            DropTiming::BetweenRounds => write!(f, "between_rounds"),
            DropTiming::DuringMatch => write!(f, "during_match"),
            DropTiming::DuringRound => write!(f, "during_round"),
        }
    }
}

/// Lifecycle status of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    Pending,
    Active,
    Completed,
}

/// Status and timestamps of the round a drop request falls into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundWindow {
    pub round_number: u32,
    pub status: RoundStatus,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

/// A player's request to withdraw. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRequest {
    pub player_id: PlayerId,
    pub tournament_id: String,
    pub round_number: u32,
    pub reason: Option<String>,
    pub dropped_at: DateTime<Utc>,
}

impl DropRequest {
    pub fn new(
        player_id: impl Into<PlayerId>,
        tournament_id: impl Into<String>,
        round_number: u32,
        dropped_at: DateTime<Utc>,
    ) -> Self {
        Self {
            player_id: player_id.into(),
            tournament_id: tournament_id.into(),
            round_number,
            reason: None,
            dropped_at,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

/// An accepted drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DropRecord {
    pub player_id: PlayerId,
    pub tournament_id: String,
    pub round_number: u32,
    pub reason: Option<String>,
    pub dropped_at: DateTime<Utc>,
    pub timing: DropTiming,
}

impl DropRecord {
    pub(crate) fn accept(request: &DropRequest, timing: DropTiming) -> Self {
        Self {
            player_id: request.player_id.clone(),
            tournament_id: request.tournament_id.clone(),
            round_number: request.round_number,
            reason: request.reason.clone(),
            dropped_at: request.dropped_at,
            timing,
        }
    }
}

/// A bye handed out after a drop. Always exactly one match point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByeAssignment {
    pub id: String,
    pub player_id: PlayerId,
    pub round_number: u32,
    pub match_points: u32,
}

impl ByeAssignment {
    pub fn new(id: String, player_id: PlayerId, round_number: u32) -> Self {
        Self {
            id,
            player_id,
            round_number,
            match_points: BYE_MATCH_POINTS,
        }
    }
}

/// Outcome of a single drop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropHandlingResult {
    pub success: bool,
    pub updated_players: Vec<PlayerRecord>,
    pub drop_record: Option<DropRecord>,
    pub bye_assignment: Option<ByeAssignment>,
    /// The dropping player's live opponent takes the match
    pub opponent_auto_win: bool,
    pub error: Option<String>,
}

impl DropHandlingResult {
    pub(crate) fn rejected(players: &[PlayerRecord], error: String) -> Self {
        Self {
            success: false,
            updated_players: players.to_vec(),
            drop_record: None,
            bye_assignment: None,
            opponent_auto_win: false,
            error: Some(error),
        }
    }
}

/// Outcome of an all-or-nothing batch of drops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDropsResult {
    pub success: bool,
    pub updated_players: Vec<PlayerRecord>,
    pub drop_records: Vec<DropRecord>,
    pub bye_assignment: Option<ByeAssignment>,
    /// Players whose live opponents receive an automatic win
    pub opponent_auto_wins: Vec<PlayerId>,
    pub errors: Vec<String>,
}
