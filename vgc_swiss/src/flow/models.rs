//! Tournament state carried between flow transitions.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::bracket::{BracketError, BracketStructure};
use crate::config::PhaseConfig;
use crate::drops::{DropHandlingResult, DropRecord};
use crate::ids::{IdGenerator, PhaseId};
use crate::pairing::PairingStrategy;
use crate::standings::{MatchRecord, MatchStage, PlayerRecord};

/// Flow errors
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("Tournament is already completed")]
    TournamentCompleted,

    #[error("Round {0} still has unfinished matches")]
    RoundInProgress(u32),

    #[error("Cannot advance: {0}")]
    CannotAdvance(String),

    #[error("Format {0} is not supported by the round generator")]
    UnsupportedFormat(String),

    #[error("Pairing failed: {}", .0.join("; "))]
    Pairing(Vec<String>),

    #[error("Invalid match result: {}", .0.join("; "))]
    InvalidResult(Vec<String>),

    #[error("Match not found: {0}")]
    MatchNotFound(String),

    #[error("Match {0} is already complete")]
    MatchAlreadyComplete(String),

    #[error("Drop rejected: {0}")]
    DropRejected(String),

    #[error("Bracket error: {0}")]
    Bracket(#[from] BracketError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type FlowResult<T> = Result<T, FlowError>;

/// Current stage of the event. `Completed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Swiss,
    TopCut,
    Completed,
}

impl Phase {
    /// Match stage played in this phase
    pub fn stage(&self) -> Option<MatchStage> {
        match self {
            Phase::Swiss => Some(MatchStage::Swiss),
            Phase::TopCut => Some(MatchStage::TopCut),
            Phase::Completed => None,
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Phase::Swiss => write!(f, "swiss"),
            Phase::TopCut => write!(f, "top_cut"),
            Phase::Completed => write!(f, "completed"),
        }
    }
}

/// Everything the flow reads and rewrites on each transition.
///
/// `matches` is append-only across the whole event; a completed match is
/// never rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentState {
    pub tournament_id: String,
    pub phase_id: PhaseId,
    /// Round within the current phase; 0 before the phase's first round
    pub current_round: u32,
    pub phase: Phase,
    pub players: Vec<PlayerRecord>,
    pub matches: Vec<MatchRecord>,
    pub drops: Vec<DropRecord>,
    pub bracket: Option<BracketStructure>,
}

impl TournamentState {
    /// Registration closed, Swiss not yet paired.
    pub fn new(
        tournament_id: impl Into<String>,
        players: Vec<PlayerRecord>,
        ids: &mut dyn IdGenerator,
    ) -> Self {
        Self {
            tournament_id: tournament_id.into(),
            phase_id: PhaseId::generate(ids),
            current_round: 0,
            phase: Phase::Swiss,
            players,
            matches: Vec::new(),
            drops: Vec::new(),
            bracket: None,
        }
    }

    pub fn active_player_count(&self) -> usize {
        self.players.iter().filter(|p| p.is_active()).count()
    }

    /// Matches of `stage` in `round_number`
    pub fn round_matches(
        &self,
        stage: MatchStage,
        round_number: u32,
    ) -> impl Iterator<Item = &MatchRecord> {
        self.matches
            .iter()
            .filter(move |m| m.stage == stage && m.round_number == round_number)
    }

    /// Matches of the current phase and round
    pub fn current_round_matches(&self) -> Vec<&MatchRecord> {
        match self.phase.stage() {
            Some(stage) => self.round_matches(stage, self.current_round).collect(),
            None => Vec::new(),
        }
    }

    pub fn match_by_id(&self, match_id: &str) -> Option<&MatchRecord> {
        self.matches.iter().find(|m| m.id == match_id)
    }

    pub fn player(&self, player_id: &str) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == player_id)
    }
}

/// Settings plus state: the JSON document exchanged with storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSnapshot {
    pub settings: PhaseConfig,
    pub state: TournamentState,
}

impl TournamentSnapshot {
    pub fn from_json(json: &str) -> FlowResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> FlowResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> FlowResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// A freshly generated round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedRound {
    pub state: TournamentState,
    pub stage: MatchStage,
    pub round_number: u32,
    /// Matches created for this round, byes included
    pub matches: Vec<MatchRecord>,
    pub strategy: Option<PairingStrategy>,
    pub warnings: Vec<String>,
}

/// State after an accepted drop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedDrop {
    pub state: TournamentState,
    pub drop: DropHandlingResult,
    /// Unfinished match handed to the dropped player's opponent, if any
    pub forfeited_match_id: Option<String>,
}
