//! Schedule inputs and projected rounds.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::PhaseConfig;
use crate::standings::MatchStage;

/// Recorded start/end of a round that has begun.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundTiming {
    pub stage: MatchStage,
    /// Round number within the stage
    pub round_number: u32,
    pub started_at: Option<DateTime<Utc>>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentScheduleData {
    pub start_time: DateTime<Utc>,
    /// Check-in window before round 1
    pub check_in_minutes: u32,
    pub round_duration_minutes: u32,
    /// Top cut round length; falls back to `round_duration_minutes`
    pub top_cut_round_minutes: Option<u32>,
    pub swiss_rounds: u32,
    pub top_cut_rounds: Option<u32>,
    /// Actual timings recorded so far
    pub rounds: Vec<RoundTiming>,
}

impl TournamentScheduleData {
    /// Schedule inputs for an event configured with `config`, nothing played yet.
    pub fn from_config(config: &PhaseConfig, start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            check_in_minutes: config.check_in_time_minutes,
            round_duration_minutes: config.round_time_minutes,
            top_cut_round_minutes: None,
            swiss_rounds: if config.format.has_swiss() {
                config.swiss_rounds
            } else {
                0
            },
            top_cut_rounds: config.top_cut_rounds(),
            rounds: Vec::new(),
        }
    }

    pub fn timing(&self, stage: MatchStage, round_number: u32) -> Option<&RoundTiming> {
        self.rounds
            .iter()
            .find(|r| r.stage == stage && r.round_number == round_number)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundScheduleStatus {
    Completed,
    InProgress,
    Upcoming,
}

impl std::fmt::Display for RoundScheduleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoundScheduleStatus::Completed => write!(f, "completed"),
            RoundScheduleStatus::InProgress => write!(f, "in_progress"),
            RoundScheduleStatus::Upcoming => write!(f, "upcoming"),
        }
    }
}

/// Projected timing for one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSchedule {
    /// Absolute position across the whole event (top cut continues after Swiss)
    pub round_number: u32,
    /// Position within its stage
    pub phase_round: u32,
    pub stage: MatchStage,
    pub name: String,
    pub estimated_start: DateTime<Utc>,
    pub estimated_end: DateTime<Utc>,
    pub status: RoundScheduleStatus,
    /// In progress past its estimated end
    pub is_overdue: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TournamentSchedule {
    pub rounds: Vec<RoundSchedule>,
    pub estimated_end: DateTime<Utc>,
}

impl TournamentSchedule {
    /// First round not yet finished
    pub fn next_round(&self) -> Option<&RoundSchedule> {
        self.rounds
            .iter()
            .find(|r| r.status != RoundScheduleStatus::Completed)
    }
}
