//! Schedule projection.

use chrono::{DateTime, Duration, Utc};

use super::models::{
    RoundSchedule, RoundScheduleStatus, RoundTiming, TournamentSchedule, TournamentScheduleData,
};
use crate::bracket::round_name;
use crate::standings::MatchStage;

/// Project start and end times for every round.
///
/// Rounds are walked in order. A recorded end time becomes the next round's
/// start; a round that started without ending is estimated as start plus
/// duration; anything later is stacked at the nominal duration.
pub fn estimate_schedule(data: &TournamentScheduleData, now: DateTime<Utc>) -> TournamentSchedule {
    let mut cursor = data.start_time + minutes(data.check_in_minutes);
    let mut rounds = Vec::new();

    let swiss_length = minutes(data.round_duration_minutes);
    for phase_round in 1..=data.swiss_rounds {
        let round = project_round(
            data.timing(MatchStage::Swiss, phase_round),
            &mut cursor,
            swiss_length,
            now,
        );
        rounds.push(RoundSchedule {
            round_number: phase_round,
            phase_round,
            stage: MatchStage::Swiss,
            name: format!("Swiss Round {phase_round}"),
            ..round
        });
    }

    let top_cut_rounds = data.top_cut_rounds.unwrap_or(0);
    let top_cut_length = minutes(
        data.top_cut_round_minutes
            .unwrap_or(data.round_duration_minutes),
    );
    for phase_round in 1..=top_cut_rounds {
        let round = project_round(
            data.timing(MatchStage::TopCut, phase_round),
            &mut cursor,
            top_cut_length,
            now,
        );
        rounds.push(RoundSchedule {
            round_number: data.swiss_rounds + phase_round,
            phase_round,
            stage: MatchStage::TopCut,
            name: round_name(top_cut_rounds - phase_round + 1),
            ..round
        });
    }

    TournamentSchedule {
        rounds,
        estimated_end: cursor,
    }
}

fn minutes(count: u32) -> Duration {
    Duration::minutes(i64::from(count))
}

/// Timing and status for one round; numbering and name are filled in by
/// the caller. Moves `cursor` to the round's end.
fn project_round(
    timing: Option<&RoundTiming>,
    cursor: &mut DateTime<Utc>,
    length: Duration,
    now: DateTime<Utc>,
) -> RoundSchedule {
    let started_at = timing.and_then(|t| t.started_at);
    let ended_at = timing.and_then(|t| t.ended_at);

    let (estimated_start, estimated_end, status) = match (started_at, ended_at) {
        (started, Some(ended)) => (
            started.unwrap_or(*cursor),
            ended,
            RoundScheduleStatus::Completed,
        ),
        (Some(started), None) => (started, started + length, RoundScheduleStatus::InProgress),
        (None, None) => (*cursor, *cursor + length, RoundScheduleStatus::Upcoming),
    };

    *cursor = estimated_end;

    RoundSchedule {
        round_number: 0,
        phase_round: 0,
        stage: MatchStage::Swiss,
        name: String::new(),
        estimated_start,
        estimated_end,
        status,
        is_overdue: status == RoundScheduleStatus::InProgress && now > estimated_end,
    }
}
