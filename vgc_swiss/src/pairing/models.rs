//! Pairing output types.

use serde::{Deserialize, Serialize};

use crate::standings::PlayerId;

/// One table assignment for a round. Ephemeral: produced fresh each round
/// and persisted by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub table_number: u32,
    pub player1_id: PlayerId,
    /// `None` when `is_bye`
    pub player2_id: Option<PlayerId>,
    pub is_bye: bool,
}

impl Pairing {
    pub fn matchup(table_number: u32, player1_id: PlayerId, player2_id: PlayerId) -> Self {
        Self {
            table_number,
            player1_id,
            player2_id: Some(player2_id),
            is_bye: false,
        }
    }

    pub fn bye(table_number: u32, player_id: PlayerId) -> Self {
        Self {
            table_number,
            player1_id: player_id,
            player2_id: None,
            is_bye: true,
        }
    }

    /// Ids of everyone seated at this table.
    pub fn player_ids(&self) -> impl Iterator<Item = &PlayerId> {
        std::iter::once(&self.player1_id).chain(self.player2_id.iter())
    }
}

/// How a round's pairings were produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingStrategy {
    /// Round 1: seeded shuffle, no standings signal yet
    Random,
    /// Every player paired inside a point group (with float-downs), no rematches
    PointGroups,
    /// The cross-group fallback had to force at least one rematch
    BestEffort,
}

/// Result of generating one Swiss round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwissPairingResult {
    pub success: bool,
    pub pairings: Vec<Pairing>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub strategy: Option<PairingStrategy>,
    pub rematch_count: usize,
}

impl SwissPairingResult {
    pub(crate) fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            pairings: Vec::new(),
            errors: vec![error.into()],
            warnings: Vec::new(),
            strategy: None,
            rematch_count: 0,
        }
    }

    pub fn bye(&self) -> Option<&Pairing> {
        self.pairings.iter().find(|p| p.is_bye)
    }

    pub fn matches(&self) -> impl Iterator<Item = &Pairing> {
        self.pairings.iter().filter(|p| !p.is_bye)
    }
}
