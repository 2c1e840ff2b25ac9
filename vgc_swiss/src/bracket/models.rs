//! Bracket data models.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::standings::PlayerId;

/// Format of a tournament phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseFormat {
    Swiss,
    SingleElimination,
}

/// A qualified player and their seed (1 = best Swiss finish)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSeed {
    pub seed: u32,
    pub player_id: PlayerId,
}

/// One slot-pair in the bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: String,
    pub round_number: u32,
    /// Position within the round; feeds slot `slot / 2` of the next round
    pub slot: u32,
    pub player1_id: Option<PlayerId>,
    pub player2_id: Option<PlayerId>,
    pub player1_seed: Option<u32>,
    pub player2_seed: Option<u32>,
    pub winner_id: Option<PlayerId>,
    pub is_complete: bool,
}

impl BracketMatch {
    /// Both players known and no result yet.
    pub fn is_ready(&self) -> bool {
        self.player1_id.is_some() && self.player2_id.is_some() && !self.is_complete
    }

    pub fn loser_id(&self) -> Option<&PlayerId> {
        let winner = self.winner_id.as_ref()?;
        if self.player1_id.as_ref() == Some(winner) {
            self.player2_id.as_ref()
        } else {
            self.player1_id.as_ref()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketRound {
    pub round_number: u32,
    pub name: String,
    pub matches: Vec<BracketMatch>,
}

/// A single-elimination bracket. `size` is a power of two and
/// `total_rounds = log2(size)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketStructure {
    pub format: PhaseFormat,
    pub size: u32,
    pub total_rounds: u32,
    pub seeds: Vec<BracketSeed>,
    pub rounds: Vec<BracketRound>,
}

impl BracketStructure {
    pub fn round(&self, round_number: u32) -> Option<&BracketRound> {
        self.rounds.iter().find(|r| r.round_number == round_number)
    }

    pub fn match_by_id(&self, match_id: &str) -> Option<&BracketMatch> {
        self.rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .find(|m| m.id == match_id)
    }

    /// Earliest round that still has unfinished matches.
    pub fn current_round(&self) -> Option<u32> {
        self.rounds
            .iter()
            .find(|r| r.matches.iter().any(|m| !m.is_complete))
            .map(|r| r.round_number)
    }

    /// Matches of the current round that are ready to be played.
    pub fn next_round_matchups(&self) -> Vec<&BracketMatch> {
        self.current_round()
            .and_then(|n| self.round(n))
            .map(|r| r.matches.iter().filter(|m| m.is_ready()).collect())
            .unwrap_or_default()
    }

    pub fn champion(&self) -> Option<&PlayerId> {
        let final_round = self.round(self.total_rounds)?;
        final_round.matches.first()?.winner_id.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.champion().is_some()
    }

    fn eliminated(&self) -> HashSet<&PlayerId> {
        self.rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .filter(|m| m.is_complete)
            .filter_map(BracketMatch::loser_id)
            .collect()
    }

    /// Seeded players not yet knocked out, in seed order.
    pub fn remaining_players(&self) -> Vec<&PlayerId> {
        let eliminated = self.eliminated();
        self.seeds
            .iter()
            .map(|s| &s.player_id)
            .filter(|id| !eliminated.contains(id))
            .collect()
    }

    /// Finishing position for every player knocked out so far, plus the
    /// champion. A loser in round `r` places `2^(total_rounds - r) + 1`, so
    /// both semifinal losers share 3rd, quarterfinal losers share 5th, ...
    pub fn final_placements(&self) -> Vec<(PlayerId, u32)> {
        let mut placements: Vec<(PlayerId, u32)> = self
            .rounds
            .iter()
            .flat_map(|r| r.matches.iter())
            .filter(|m| m.is_complete)
            .filter_map(|m| {
                let loser = m.loser_id()?;
                let place = (1u32 << (self.total_rounds - m.round_number)) + 1;
                Some((loser.clone(), place))
            })
            .collect();

        if let Some(champion) = self.champion() {
            placements.push((champion.clone(), 1));
        }

        placements.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        placements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(id: &str, p1: Option<&str>, p2: Option<&str>, winner: Option<&str>) -> BracketMatch {
        BracketMatch {
            id: id.to_string(),
            round_number: 1,
            slot: 0,
            player1_id: p1.map(str::to_string),
            player2_id: p2.map(str::to_string),
            player1_seed: None,
            player2_seed: None,
            winner_id: winner.map(str::to_string),
            is_complete: winner.is_some(),
        }
    }

    #[test]
    fn test_match_readiness() {
        assert!(slot("m", Some("a"), Some("b"), None).is_ready());
        assert!(!slot("m", Some("a"), None, None).is_ready());
        assert!(!slot("m", Some("a"), Some("b"), Some("a")).is_ready());
    }

    #[test]
    fn test_loser() {
        assert_eq!(
            slot("m", Some("a"), Some("b"), Some("b")).loser_id(),
            Some(&"a".to_string())
        );
        assert_eq!(slot("m", Some("a"), Some("b"), None).loser_id(), None);
    }
}
