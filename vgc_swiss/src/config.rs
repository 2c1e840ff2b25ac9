//! Tournament organizer settings.

use serde::{Deserialize, Serialize};

use crate::bracket::is_valid_bracket_size;
use crate::constants::{
    DEFAULT_BEST_OF, DEFAULT_CHECK_IN_MINUTES, DEFAULT_ROUND_TIME_MINUTES, DEFAULT_SWISS_ROUNDS,
    DEFAULT_TOP_CUT_SIZE, MAX_ROUND_TIME_MINUTES, MIN_ROUND_TIME_MINUTES,
};
use crate::flow::calculate_required_rounds;

/// Overall event format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentFormat {
    SwissOnly,
    SwissWithCut,
    SingleElimination,
}

impl TournamentFormat {
    pub fn has_swiss(&self) -> bool {
        match self {
            TournamentFormat::SwissOnly | TournamentFormat::SwissWithCut => true,
            TournamentFormat::SingleElimination => false,
        }
    }

    pub fn has_top_cut(&self) -> bool {
        match self {
            TournamentFormat::SwissWithCut => true,
            TournamentFormat::SwissOnly | TournamentFormat::SingleElimination => false,
        }
    }
}

impl std::fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentFormat::SwissOnly => write!(f, "swiss_only"),
            TournamentFormat::SwissWithCut => write!(f, "swiss_with_cut"),
            TournamentFormat::SingleElimination => write!(f, "single_elimination"),
        }
    }
}

/// Settings fixed at setup. Only an administrative override changes them
/// during play.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseConfig {
    pub format: TournamentFormat,

    /// Games per match (odd)
    pub best_of: u32,

    pub round_time_minutes: u32,

    pub check_in_time_minutes: u32,

    /// Planned Swiss rounds
    pub swiss_rounds: u32,

    /// Bracket size for the cut; `None` when the format has no cut
    pub top_cut_size: Option<u32>,
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            format: TournamentFormat::SwissWithCut,
            best_of: DEFAULT_BEST_OF,
            round_time_minutes: DEFAULT_ROUND_TIME_MINUTES,
            check_in_time_minutes: DEFAULT_CHECK_IN_MINUTES,
            swiss_rounds: DEFAULT_SWISS_ROUNDS,
            top_cut_size: Some(DEFAULT_TOP_CUT_SIZE),
        }
    }
}

/// Recommended cut for a field size; `None` below 9 players.
pub fn recommended_top_cut_size(player_count: usize) -> Option<u32> {
    match player_count {
        0..=8 => None,
        9..=20 => Some(4),
        21..=128 => Some(8),
        129..=226 => Some(16),
        227..=409 => Some(32),
        _ => Some(64),
    }
}

impl PhaseConfig {
    /// Settings sized for `player_count` entrants. A cut format falls back
    /// to Swiss only when the field is too small for a cut.
    pub fn for_player_count(player_count: usize, format: TournamentFormat) -> Self {
        let top_cut_size = if format.has_top_cut() {
            recommended_top_cut_size(player_count)
        } else {
            None
        };
        let format = if format.has_top_cut() && top_cut_size.is_none() {
            TournamentFormat::SwissOnly
        } else {
            format
        };

        Self {
            format,
            swiss_rounds: calculate_required_rounds(player_count),
            top_cut_size,
            ..Self::default()
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.best_of == 0 || self.best_of % 2 == 0 {
            return Err("Best-of must be a positive odd number".to_string());
        }

        if !(MIN_ROUND_TIME_MINUTES..=MAX_ROUND_TIME_MINUTES).contains(&self.round_time_minutes) {
            return Err(format!(
                "Round time must be between {MIN_ROUND_TIME_MINUTES} and {MAX_ROUND_TIME_MINUTES} minutes"
            ));
        }

        if self.format.has_swiss() && self.swiss_rounds == 0 {
            return Err("Swiss rounds must be at least 1".to_string());
        }

        if self.format.has_top_cut() {
            match self.top_cut_size {
                None => return Err("Top cut size is required for this format".to_string()),
                Some(size) if !is_valid_bracket_size(size) => {
                    return Err(format!("Top cut size {size} is not a power of two between 4 and 256"));
                }
                Some(_) => {}
            }
        }

        Ok(())
    }

    /// Rounds in the top cut bracket, if the format has one.
    pub fn top_cut_rounds(&self) -> Option<u32> {
        self.top_cut_size
            .filter(|_| self.format.has_top_cut())
            .map(u32::trailing_zeros)
    }
}
