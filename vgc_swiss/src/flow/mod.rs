//! Tournament flow: the `swiss` → `top_cut` → `completed` state machine.
//!
//! [`TournamentFlow`] decides when a round may start, pairs it through the
//! Swiss or bracket engine, applies reported results and drops, and hands
//! the event from Swiss to the top cut. Every transition returns a new
//! [`TournamentState`]; persisting it is the caller's job.

pub mod models;
pub mod state_machine;

pub use models::{
    FlowError, FlowResult, GeneratedRound, Phase, RecordedDrop, TournamentSnapshot,
    TournamentState,
};
pub use state_machine::{TournamentFlow, calculate_required_rounds};
