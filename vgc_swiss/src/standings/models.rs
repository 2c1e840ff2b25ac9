//! Player and match records consumed by every engine.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::constants::WIN_PERCENTAGE_FLOOR;

/// Player identifier (profile id from the caller's storage)
pub type PlayerId = String;

/// Which stage of the event a match belongs to.
///
/// Round numbers are local to the stage: round 1 of the top cut is not
/// round 1 of Swiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStage {
    Swiss,
    TopCut,
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchStage::Swiss => write!(f, "swiss"),
            MatchStage::TopCut => write!(f, "top_cut"),
        }
    }
}

/// A player's standing in the event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,

    /// 1 per win or bye, 0 per loss
    pub match_points: u32,
    pub wins: u32,
    pub losses: u32,
    pub game_wins: u32,
    pub game_losses: u32,

    pub match_win_percentage: f64,
    pub game_win_percentage: f64,
    pub opponent_match_win_percentage: f64,
    pub opponent_game_win_percentage: f64,

    pub has_received_bye: bool,
    pub bye_count: u32,

    /// One-way: once dropped, a player never returns.
    pub is_dropped: bool,

    /// Append-only set of real opponents (byes are not opponents).
    pub previous_opponents: BTreeSet<PlayerId>,
    pub rounds_played: u32,

    /// 1-based position after the last standings calculation
    pub rank: Option<u32>,
}

impl PlayerRecord {
    /// Fresh entrant with no results.
    pub fn new(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            match_points: 0,
            wins: 0,
            losses: 0,
            game_wins: 0,
            game_losses: 0,
            match_win_percentage: WIN_PERCENTAGE_FLOOR,
            game_win_percentage: WIN_PERCENTAGE_FLOOR,
            opponent_match_win_percentage: WIN_PERCENTAGE_FLOOR,
            opponent_game_win_percentage: WIN_PERCENTAGE_FLOOR,
            has_received_bye: false,
            bye_count: 0,
            is_dropped: false,
            previous_opponents: BTreeSet::new(),
            rounds_played: 0,
            rank: None,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_dropped
    }

    /// Number of byes, treating a bare `has_received_bye` flag as one.
    pub fn byes_received(&self) -> u32 {
        self.bye_count.max(u32::from(self.has_received_bye))
    }

    pub fn has_played(&self, opponent: &str) -> bool {
        self.previous_opponents.contains(opponent)
    }

    /// Win-loss record, e.g. `"4-1"`
    pub fn record(&self) -> String {
        format!("{}-{}", self.wins, self.losses)
    }
}

/// One reported (or pending) match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Encodes stage and round, see [`MatchRecord::swiss_id`] / [`MatchRecord::top_cut_id`]
    pub id: String,
    pub stage: MatchStage,
    pub round_number: u32,
    pub table_number: u32,
    pub player1_id: PlayerId,
    /// `None` for a bye
    pub player2_id: Option<PlayerId>,
    pub winner_id: Option<PlayerId>,
    pub player1_game_wins: u32,
    pub player2_game_wins: u32,
    pub is_bye: bool,
    pub is_complete: bool,
}

impl MatchRecord {
    pub fn swiss_id(round_number: u32, table_number: u32) -> String {
        format!("swiss-r{round_number}-t{table_number}")
    }

    pub fn top_cut_id(round_number: u32, slot: u32) -> String {
        format!("top_cut-r{round_number}-m{slot}")
    }

    /// Match waiting for a result.
    pub fn pending(
        id: String,
        stage: MatchStage,
        round_number: u32,
        table_number: u32,
        player1_id: PlayerId,
        player2_id: PlayerId,
    ) -> Self {
        Self {
            id,
            stage,
            round_number,
            table_number,
            player1_id,
            player2_id: Some(player2_id),
            winner_id: None,
            player1_game_wins: 0,
            player2_game_wins: 0,
            is_bye: false,
            is_complete: false,
        }
    }

    /// Swiss bye, complete on creation: one match point, no games.
    pub fn bye(round_number: u32, table_number: u32, player_id: PlayerId) -> Self {
        Self {
            id: Self::swiss_id(round_number, table_number),
            stage: MatchStage::Swiss,
            round_number,
            table_number,
            winner_id: Some(player_id.clone()),
            player1_id: player_id,
            player2_id: None,
            player1_game_wins: 0,
            player2_game_wins: 0,
            is_bye: true,
            is_complete: true,
        }
    }

    /// Copy of this match with a final result applied.
    pub fn completed(&self, winner_id: PlayerId, player1_game_wins: u32, player2_game_wins: u32) -> Self {
        Self {
            winner_id: Some(winner_id),
            player1_game_wins,
            player2_game_wins,
            is_complete: true,
            ..self.clone()
        }
    }

    pub fn involves(&self, player_id: &str) -> bool {
        self.player1_id == player_id || self.player2_id.as_deref() == Some(player_id)
    }

    pub fn opponent_of(&self, player_id: &str) -> Option<&PlayerId> {
        if self.player1_id == player_id {
            self.player2_id.as_ref()
        } else if self.player2_id.as_deref() == Some(player_id) {
            Some(&self.player1_id)
        } else {
            None
        }
    }

    pub fn loser_id(&self) -> Option<&PlayerId> {
        let winner = self.winner_id.as_deref()?;
        self.opponent_of(winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_starts_at_floor() {
        let player = PlayerRecord::new("p1", "Ash");
        assert_eq!(player.match_points, 0);
        assert_eq!(player.match_win_percentage, WIN_PERCENTAGE_FLOOR);
        assert!(player.is_active());
        assert_eq!(player.record(), "0-0");
    }

    #[test]
    fn test_byes_received_honours_flag() {
        let mut player = PlayerRecord::new("p1", "Ash");
        assert_eq!(player.byes_received(), 0);
        player.has_received_bye = true;
        assert_eq!(player.byes_received(), 1);
        player.bye_count = 2;
        assert_eq!(player.byes_received(), 2);
    }

    #[test]
    fn test_match_ids_encode_stage_and_round() {
        assert_eq!(MatchRecord::swiss_id(1, 4), "swiss-r1-t4");
        assert_eq!(MatchRecord::top_cut_id(1, 0), "top_cut-r1-m0");
        assert_ne!(MatchRecord::swiss_id(1, 1), MatchRecord::top_cut_id(1, 1));
    }

    #[test]
    fn test_opponent_and_loser() {
        let pending = MatchRecord::pending(
            MatchRecord::swiss_id(2, 1),
            MatchStage::Swiss,
            2,
            1,
            "a".to_string(),
            "b".to_string(),
        );
        assert_eq!(pending.opponent_of("a"), Some(&"b".to_string()));
        assert_eq!(pending.opponent_of("z"), None);
        assert_eq!(pending.loser_id(), None);

        let done = pending.completed("b".to_string(), 1, 2);
        assert!(done.is_complete);
        assert_eq!(done.loser_id(), Some(&"a".to_string()));
    }

    #[test]
    fn test_bye_is_complete() {
        let bye = MatchRecord::bye(3, 5, "p9".to_string());
        assert!(bye.is_bye && bye.is_complete);
        assert_eq!(bye.winner_id.as_deref(), Some("p9"));
        assert_eq!(bye.player2_id, None);
        assert_eq!(bye.opponent_of("p9"), None);
    }
}
