//! Single-elimination top cut.
//!
//! The top N active players by Swiss standings are seeded into a bracket of
//! N = 4, 8, ..., 256 slots (`log2(N)` rounds). Each recorded result moves
//! the winner into its parent slot; the bracket is done when one player is
//! left.

pub mod engine;
pub mod models;

pub use engine::{
    BracketError, BracketResult, create_bracket, is_valid_bracket_size, record_result, round_name,
};
pub use models::{BracketMatch, BracketRound, BracketSeed, BracketStructure, PhaseFormat};
