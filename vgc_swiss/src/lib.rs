//! # VGC Swiss
//!
//! A Swiss-system tournament engine with a single-elimination top cut,
//! following the Pokémon VGC conventions: best-of-three matches, one match
//! point per win, byes for odd fields, and opponent-strength tiebreakers
//! floored at 33%.
//!
//! Every engine is a pure function over in-memory snapshots. Callers load
//! players and matches from their own storage, pass them in together with
//! an explicit random source, id generator or current time, and persist
//! whatever comes back.
//!
//! ## Core Modules
//!
//! - [`standings`]: records, win percentages and resistance tiebreakers
//! - [`pairing`]: Swiss pairing with byes and rematch avoidance
//! - [`drops`]: player withdrawals and the byes they force
//! - [`bracket`]: seeded top cut brackets
//! - [`flow`]: the `swiss` → `top_cut` → `completed` state machine
//! - [`validation`]: settings, round start and match result checks
//! - [`schedule`]: projected round times
//!
//! ## Example
//!
//! ```
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//! use vgc_swiss::{PhaseConfig, PlayerRecord, SequentialIds, TournamentFlow, TournamentState};
//!
//! let players = (1..=8)
//!     .map(|i| PlayerRecord::new(format!("p{i}"), format!("Player {i}")))
//!     .collect();
//! let mut ids = SequentialIds::new();
//! let state = TournamentState::new("regional", players, &mut ids);
//!
//! let flow = TournamentFlow::new(PhaseConfig::default());
//! let round = flow
//!     .generate_next_round(&state, &mut StdRng::seed_from_u64(2025))
//!     .unwrap();
//! assert_eq!(round.matches.len(), 4);
//! ```

pub mod bracket;
pub mod config;
pub mod constants;
pub mod drops;
pub mod flow;
pub mod ids;
pub mod pairing;
pub mod schedule;
pub mod standings;
pub mod validation;

pub use bracket::{BracketError, BracketResult, BracketStructure, create_bracket, record_result};
pub use config::{PhaseConfig, TournamentFormat};
pub use drops::{DropRequest, DropTiming, handle_drop, process_drops_for_round};
pub use flow::{
    FlowError, FlowResult, Phase, TournamentFlow, TournamentSnapshot, TournamentState,
    calculate_required_rounds,
};
pub use ids::{IdError, IdGenerator, PhaseId, SequentialIds, UuidIds};
pub use pairing::{SwissPairingResult, generate_pairings, generate_seeded_pairings};
pub use schedule::{TournamentSchedule, TournamentScheduleData, estimate_schedule};
pub use standings::{MatchRecord, MatchStage, PlayerId, PlayerRecord, calculate_standings};
pub use validation::{
    MatchResultData, ValidationResult, validate_match_result, validate_round_start,
    validate_tournament_settings,
};
