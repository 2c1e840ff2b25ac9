//! Player drops and the byes they can force.
//!
//! Drops are accepted while pairings are posted, between rounds, or during
//! the player's own match; a drop while the round is live but the player's
//! table is not in play is refused. Batches of drops are all-or-nothing.

pub mod manager;
pub mod models;

pub use manager::{
    classify_drop_timing, handle_bracket_drop, handle_drop, process_drops_for_round,
};
pub use models::{
    ByeAssignment, DropHandlingResult, DropRecord, DropRequest, DropTiming, ProcessDropsResult,
    RoundStatus, RoundWindow,
};
