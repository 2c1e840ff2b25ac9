//! Drop handling and bye re-evaluation.

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashSet;

use super::models::{
    ByeAssignment, DropHandlingResult, DropRecord, DropRequest, DropTiming, ProcessDropsResult,
    RoundStatus, RoundWindow,
};
use crate::ids::IdGenerator;
use crate::pairing::{active_standings, select_bye_player};
use crate::standings::PlayerRecord;

/// Work out where in the round cycle a drop at `now` lands.
///
/// `player_match_live` says whether the dropping player's own match is being
/// played right now.
pub fn classify_drop_timing(
    now: DateTime<Utc>,
    round: Option<&RoundWindow>,
    player_match_live: bool,
) -> DropTiming {
    let Some(round) = round else {
        return DropTiming::BetweenRounds;
    };

    if round.ended_at.is_some_and(|ended| ended <= now) {
        return DropTiming::BetweenRounds;
    }

    match round.status {
        RoundStatus::Completed => DropTiming::BetweenRounds,
        RoundStatus::Pending => DropTiming::Pairing,
        RoundStatus::Active if round.started_at.is_some_and(|started| started > now) => {
            DropTiming::Pairing
        }
        RoundStatus::Active if player_match_live => DropTiming::DuringMatch,
        RoundStatus::Active => DropTiming::DuringRound,
    }
}

/// Check a request against the current player set and return the index of
/// the player to drop.
fn check_drop(
    request: &DropRequest,
    players: &[PlayerRecord],
    timing: DropTiming,
) -> Result<usize, String> {
    if !timing.allows_drop() {
        return Err(format!(
            "Cannot drop player {} while the round is in progress ({timing})",
            request.player_id
        ));
    }

    let idx = players
        .iter()
        .position(|p| p.id == request.player_id)
        .ok_or_else(|| format!("Player {} is not registered in this tournament", request.player_id))?;

    if players[idx].is_dropped {
        return Err(format!("Player {} has already dropped", request.player_id));
    }

    Ok(idx)
}

/// If the active field is odd, pick who receives the bye for `round_number`.
fn assign_bye_if_needed(
    players: &[PlayerRecord],
    round_number: u32,
    ids: &mut dyn IdGenerator,
) -> Option<ByeAssignment> {
    let standings = active_standings(players);
    if standings.len() % 2 == 0 {
        return None;
    }

    let player = select_bye_player(&standings)?;
    debug!("Odd field after drop: bye for round {round_number} goes to {}", player.id);
    Some(ByeAssignment::new(
        ids.next_id("bye"),
        player.id.clone(),
        round_number,
    ))
}

/// Mark the requested player dropped, or explain why the drop is refused.
fn apply_drop(
    request: &DropRequest,
    players: &[PlayerRecord],
    timing: DropTiming,
) -> Result<Vec<PlayerRecord>, DropHandlingResult> {
    let idx = check_drop(request, players, timing).map_err(|error| {
        warn!("Rejected drop: {error}");
        DropHandlingResult::rejected(players, error)
    })?;

    let mut updated_players = players.to_vec();
    updated_players[idx].is_dropped = true;
    info!(
        "Player {} dropped in round {} ({timing})",
        request.player_id, request.round_number
    );
    Ok(updated_players)
}

/// Drop one player.
///
/// A drop during the player's own live match hands that match to the
/// opponent and skips the bye check. Any other accepted drop re-checks
/// parity against the post-drop field and assigns a bye if it turned odd.
pub fn handle_drop(
    request: &DropRequest,
    players: &[PlayerRecord],
    timing: DropTiming,
    ids: &mut dyn IdGenerator,
) -> DropHandlingResult {
    let updated_players = match apply_drop(request, players, timing) {
        Ok(updated) => updated,
        Err(rejected) => return rejected,
    };

    let opponent_auto_win = timing == DropTiming::DuringMatch;
    let bye_assignment = if opponent_auto_win {
        None
    } else {
        assign_bye_if_needed(&updated_players, request.round_number, ids)
    };

    DropHandlingResult {
        success: true,
        updated_players,
        drop_record: Some(DropRecord::accept(request, timing)),
        bye_assignment,
        opponent_auto_win,
        error: None,
    }
}

/// Drop one player from a single-elimination phase.
///
/// Elimination rounds have no byes, so field parity is never re-checked.
/// Whatever bracket match the player still has goes to their opponent.
pub fn handle_bracket_drop(
    request: &DropRequest,
    players: &[PlayerRecord],
    timing: DropTiming,
) -> DropHandlingResult {
    let updated_players = match apply_drop(request, players, timing) {
        Ok(updated) => updated,
        Err(rejected) => return rejected,
    };

    DropHandlingResult {
        success: true,
        updated_players,
        drop_record: Some(DropRecord::accept(request, timing)),
        bye_assignment: None,
        opponent_auto_win: true,
        error: None,
    }
}

/// Apply several drops as one unit.
///
/// Every request is checked against the field as it would look after the
/// earlier requests in the batch; one bad request rejects the whole batch
/// and returns the original players untouched. On success the bye check
/// runs once, after all drops.
pub fn process_drops_for_round(
    requests: &[DropRequest],
    players: &[PlayerRecord],
    round_number: u32,
    timing: DropTiming,
    ids: &mut dyn IdGenerator,
) -> ProcessDropsResult {
    let mut updated_players = players.to_vec();
    let mut drop_records = Vec::with_capacity(requests.len());
    let mut errors = Vec::new();

    for request in requests {
        match check_drop(request, &updated_players, timing) {
            Ok(idx) => {
                updated_players[idx].is_dropped = true;
                drop_records.push(DropRecord::accept(request, timing));
            }
            Err(error) => errors.push(error),
        }
    }

    if !errors.is_empty() {
        warn!(
            "Rejected batch of {} drops for round {round_number}: {}",
            requests.len(),
            errors.join("; ")
        );
        return ProcessDropsResult {
            success: false,
            updated_players: players.to_vec(),
            drop_records: Vec::new(),
            bye_assignment: None,
            opponent_auto_wins: Vec::new(),
            errors,
        };
    }

    let (opponent_auto_wins, bye_assignment) = if timing == DropTiming::DuringMatch {
        let dropped: HashSet<&str> = requests.iter().map(|r| r.player_id.as_str()).collect();
        let auto_wins = updated_players
            .iter()
            .filter(|p| dropped.contains(p.id.as_str()))
            .map(|p| p.id.clone())
            .collect();
        (auto_wins, None)
    } else {
        (
            Vec::new(),
            assign_bye_if_needed(&updated_players, round_number, ids),
        )
    };

    info!(
        "Processed {} drops for round {round_number}",
        drop_records.len()
    );

    ProcessDropsResult {
        success: true,
        updated_players,
        drop_records,
        bye_assignment,
        opponent_auto_wins,
        errors: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    fn field(n: usize) -> Vec<PlayerRecord> {
        (1..=n)
            .map(|i| PlayerRecord::new(format!("p{i}"), format!("Player {i}")))
            .collect()
    }

    fn request(id: &str) -> DropRequest {
        DropRequest::new(id, "t1", 2, now())
    }

    #[test]
    fn test_drop_unknown_player_rejected() {
        let mut ids = SequentialIds::new();
        let result = handle_drop(&request("ghost"), &field(4), DropTiming::BetweenRounds, &mut ids);
        assert!(!result.success);
        assert!(result.error.unwrap().contains("not registered"));
    }

    #[test]
    fn test_drop_twice_rejected() {
        let mut ids = SequentialIds::new();
        let mut players = field(4);
        players[0].is_dropped = true;
        let result = handle_drop(&request("p1"), &players, DropTiming::BetweenRounds, &mut ids);
        assert!(!result.success);
        assert!(result.error.unwrap().contains("already dropped"));
    }

    #[test]
    fn test_drop_during_round_rejected() {
        let mut ids = SequentialIds::new();
        let result = handle_drop(&request("p1"), &field(4), DropTiming::DuringRound, &mut ids);
        assert!(!result.success);
        assert!(!result.updated_players[0].is_dropped);
    }

    #[test]
    fn test_drop_between_rounds_assigns_bye() {
        let mut ids = SequentialIds::new();
        let result = handle_drop(&request("p2"), &field(4), DropTiming::BetweenRounds, &mut ids);
        assert!(result.success);
        assert!(result.updated_players[1].is_dropped);
        let bye = result.bye_assignment.unwrap();
        assert_eq!(bye.id, "bye-1");
        assert_eq!(bye.round_number, 2);
        assert_eq!(bye.match_points, 1);
        assert_ne!(bye.player_id, "p2");
        assert!(!result.opponent_auto_win);
    }

    #[test]
    fn test_drop_to_even_field_no_bye() {
        let mut ids = SequentialIds::new();
        let result = handle_drop(&request("p1"), &field(5), DropTiming::Pairing, &mut ids);
        assert!(result.success);
        assert!(result.bye_assignment.is_none());
    }

    #[test]
    fn test_drop_during_match_gives_auto_win_without_bye() {
        let mut ids = SequentialIds::new();
        let result = handle_drop(&request("p1"), &field(4), DropTiming::DuringMatch, &mut ids);
        assert!(result.success);
        assert!(result.opponent_auto_win);
        assert!(result.bye_assignment.is_none());
        assert_eq!(result.drop_record.unwrap().timing, DropTiming::DuringMatch);
    }

    #[test]
    fn test_bracket_drop_never_assigns_bye() {
        let result = handle_bracket_drop(&request("p2"), &field(8), DropTiming::BetweenRounds);
        assert!(result.success);
        assert!(result.updated_players[1].is_dropped);
        assert!(result.bye_assignment.is_none());
        assert!(result.opponent_auto_win);

        let refused = handle_bracket_drop(&request("p2"), &field(8), DropTiming::DuringRound);
        assert!(!refused.success);
    }

    #[test]
    fn test_batch_is_all_or_nothing() {
        let mut ids = SequentialIds::new();
        let players = field(6);
        let requests = vec![request("p1"), request("ghost")];
        let result =
            process_drops_for_round(&requests, &players, 2, DropTiming::BetweenRounds, &mut ids);
        assert!(!result.success);
        assert_eq!(result.updated_players, players);
        assert!(result.drop_records.is_empty());
        assert_eq!(result.errors.len(), 1);
    }

    #[test]
    fn test_batch_duplicate_request_rejected() {
        let mut ids = SequentialIds::new();
        let requests = vec![request("p1"), request("p1")];
        let result =
            process_drops_for_round(&requests, &field(6), 2, DropTiming::BetweenRounds, &mut ids);
        assert!(!result.success);
    }

    #[test]
    fn test_batch_single_bye_check() {
        let mut ids = SequentialIds::new();
        let requests = vec![request("p1"), request("p2"), request("p3")];
        let result =
            process_drops_for_round(&requests, &field(8), 2, DropTiming::BetweenRounds, &mut ids);
        assert!(result.success);
        assert_eq!(result.drop_records.len(), 3);
        assert_eq!(result.updated_players.iter().filter(|p| p.is_dropped).count(), 3);
        // 5 remain: exactly one bye, one id minted
        assert_eq!(result.bye_assignment.unwrap().id, "bye-1");
    }

    #[test]
    fn test_batch_during_match_lists_auto_wins() {
        let mut ids = SequentialIds::new();
        let requests = vec![request("p1")];
        let result =
            process_drops_for_round(&requests, &field(4), 2, DropTiming::DuringMatch, &mut ids);
        assert!(result.success);
        assert_eq!(result.opponent_auto_wins, vec!["p1".to_string()]);
        assert!(result.bye_assignment.is_none());
    }

    #[test]
    fn test_classify_drop_timing() {
        let window = |status, started: Option<i64>, ended: Option<i64>| RoundWindow {
            round_number: 2,
            status,
            started_at: started.map(|m| now() + Duration::minutes(m)),
            ended_at: ended.map(|m| now() + Duration::minutes(m)),
        };

        assert_eq!(classify_drop_timing(now(), None, false), DropTiming::BetweenRounds);
        assert_eq!(
            classify_drop_timing(now(), Some(&window(RoundStatus::Pending, None, None)), false),
            DropTiming::Pairing
        );
        assert_eq!(
            classify_drop_timing(now(), Some(&window(RoundStatus::Active, Some(5), None)), true),
            DropTiming::Pairing
        );
        assert_eq!(
            classify_drop_timing(now(), Some(&window(RoundStatus::Active, Some(-5), None)), true),
            DropTiming::DuringMatch
        );
        assert_eq!(
            classify_drop_timing(now(), Some(&window(RoundStatus::Active, Some(-5), None)), false),
            DropTiming::DuringRound
        );
        assert_eq!(
            classify_drop_timing(
                now(),
                Some(&window(RoundStatus::Active, Some(-60), Some(-1))),
                false
            ),
            DropTiming::BetweenRounds
        );
        assert_eq!(
            classify_drop_timing(now(), Some(&window(RoundStatus::Completed, None, None)), false),
            DropTiming::BetweenRounds
        );
    }
}
