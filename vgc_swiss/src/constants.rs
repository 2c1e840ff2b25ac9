//! Numeric rules shared by the engine.

/// Match points awarded for a win or a bye. Losses score zero; there are no ties.
pub const WIN_MATCH_POINTS: u32 = 1;

/// A bye is always worth exactly one match point and never any game wins.
pub const BYE_MATCH_POINTS: u32 = 1;

/// Floor applied to match/game win percentages and to resistance.
pub const WIN_PERCENTAGE_FLOOR: f64 = 0.33;

/// Bracket sizes accepted for a top cut.
pub const VALID_BRACKET_SIZES: [u32; 7] = [4, 8, 16, 32, 64, 128, 256];

/// Fields this size or smaller always play three Swiss rounds.
pub const SMALL_FIELD_MAX_PLAYERS: usize = 8;
pub const SMALL_FIELD_ROUNDS: u32 = 3;

pub const MIN_PARTICIPANTS: u32 = 4;
pub const MAX_TOURNAMENT_NAME_LEN: usize = 100;

pub const MIN_ROUND_TIME_MINUTES: u32 = 15;
pub const MAX_ROUND_TIME_MINUTES: u32 = 120;

/// Swiss round counts above this trigger a warning, not an error.
pub const SWISS_ROUNDS_WARNING_THRESHOLD: u32 = 20;

pub const DEFAULT_BEST_OF: u32 = 3;
pub const DEFAULT_ROUND_TIME_MINUTES: u32 = 50;
pub const DEFAULT_CHECK_IN_MINUTES: u32 = 15;
pub const DEFAULT_SWISS_ROUNDS: u32 = 5;
pub const DEFAULT_TOP_CUT_SIZE: u32 = 8;

/// Prefix used when a phase has been written to storage (`db-<id>`).
pub const PERSISTED_PHASE_PREFIX: &str = "db-";

/// Fewest active players that can still be paired.
pub const MIN_PAIRING_PLAYERS: u32 = 2;
