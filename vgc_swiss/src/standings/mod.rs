//! Standings: match points, win percentages and opponent-strength tiebreakers.
//!
//! Standings are always recomputed from the match history rather than
//! updated incrementally:
//! - Match win % = match points / rounds played, floored at 33%
//! - Game win % = game wins / games played, floored at 33%
//! - Resistance (OMW%, OGW%) = mean of each real opponent's floored percentages
//!
//! The resulting order (see [`compare_standings`]) is reused by pairing and
//! bracket seeding.

pub mod calculator;
pub mod models;

pub use calculator::{calculate_standings, compare_standings, sort_standings};
pub use models::{MatchRecord, MatchStage, PlayerId, PlayerRecord};
