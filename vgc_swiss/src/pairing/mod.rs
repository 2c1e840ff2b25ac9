//! Swiss pairing.
//!
//! Round 1 is a seeded shuffle. From round 2 on, players are sorted by
//! standings, an odd field hands the bye to the lowest-standing player with
//! the fewest byes, and the rest are paired point group by point group while
//! avoiding rematches. Pairing is a best-effort heuristic rather than an
//! optimal matching: a field with many prior-opponent constraints can be
//! forced into a rematch that a full backtracking search would avoid. Every
//! forced rematch is reported in the result's warnings.

pub mod models;
pub mod swiss;

pub use models::{Pairing, PairingStrategy, SwissPairingResult};
pub use swiss::{active_standings, generate_pairings, generate_seeded_pairings, select_bye_player};
