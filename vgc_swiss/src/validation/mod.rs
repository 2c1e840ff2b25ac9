//! Input validation for settings, round starts and reported results.
//!
//! Every check collects all of its errors rather than stopping at the first,
//! so an organizer sees the whole list at once.

pub mod engine;
pub mod models;

pub use engine::{
    games_to_win, validate_match_result, validate_round_start, validate_tournament_settings,
};
pub use models::{
    MatchResultData, RoundStartContext, TournamentValidationSettings, ValidationResult,
};
