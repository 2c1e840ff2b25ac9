/// Integration tests for complete tournament scenarios
///
/// These tests drive the engines together the way an organizer's backend
/// would: pair, report, drop, advance to the top cut and crown a champion.
use chrono::{Duration, TimeZone, Utc};
use rand::SeedableRng;
use rand::rngs::StdRng;

use vgc_swiss::bracket::PhaseFormat;
use vgc_swiss::drops::{DropTiming, RoundStatus, RoundWindow, classify_drop_timing};
use vgc_swiss::flow::GeneratedRound;
use vgc_swiss::schedule::{RoundScheduleStatus, RoundTiming};
use vgc_swiss::{
    DropRequest, MatchRecord, MatchResultData, MatchStage, Phase, PhaseConfig, PlayerRecord,
    SequentialIds, TournamentFlow, TournamentFormat, TournamentScheduleData, TournamentSnapshot,
    TournamentState, estimate_schedule, generate_seeded_pairings, handle_drop,
    validate_match_result,
};

fn field(n: usize) -> Vec<PlayerRecord> {
    (1..=n)
        .map(|i| PlayerRecord::new(format!("p{i:02}"), format!("Player {i}")))
        .collect()
}

/// The lower player id wins every match 2-1, giving a stable pecking order.
fn report(m: &MatchRecord) -> MatchResultData {
    let player2 = m.player2_id.clone().unwrap();
    let winner = if m.player1_id < player2 {
        m.player1_id.clone()
    } else {
        player2.clone()
    };
    let (g1, g2) = if winner == m.player1_id { (2, 1) } else { (1, 2) };
    MatchResultData::decided(m.player1_id.clone(), player2, winner, g1, g2)
}

fn play(flow: &TournamentFlow, round: GeneratedRound) -> TournamentState {
    round
        .matches
        .iter()
        .filter(|m| !m.is_complete)
        .fold(round.state.clone(), |state, m| {
            flow.record_match_result(&state, &m.id, &report(m)).unwrap()
        })
}

#[test]
fn test_eight_players_round_one_has_no_bye() {
    let result = generate_seeded_pairings(&field(8), 1, 2025);
    assert!(result.success);
    assert_eq!(result.pairings.len(), 4);
    assert!(result.pairings.iter().all(|p| !p.is_bye));
}

#[test]
fn test_seven_players_round_one_has_one_bye() {
    let result = generate_seeded_pairings(&field(7), 1, 2025);
    assert!(result.success);
    assert_eq!(result.matches().count(), 3);
    let byes: Vec<_> = result.pairings.iter().filter(|p| p.is_bye).collect();
    assert_eq!(byes.len(), 1);
    assert_eq!(byes[0].player2_id, None);
}

#[test]
fn test_drop_to_odd_field_assigns_one_bye() {
    let mut ids = SequentialIds::new();
    let now = Utc.with_ymd_and_hms(2025, 3, 1, 11, 0, 0).unwrap();
    let window = RoundWindow {
        round_number: 1,
        status: RoundStatus::Completed,
        started_at: Some(now - Duration::minutes(60)),
        ended_at: Some(now - Duration::minutes(5)),
    };
    let timing = classify_drop_timing(now, Some(&window), false);
    assert_eq!(timing, DropTiming::BetweenRounds);

    let request = DropRequest::new("p02", "cup", 2, now).with_reason("Family emergency");
    let result = handle_drop(&request, &field(4), timing, &mut ids);

    assert!(result.success);
    assert_eq!(result.updated_players.iter().filter(|p| p.is_active()).count(), 3);
    let bye = result.bye_assignment.expect("three active players need a bye");
    assert_eq!(bye.round_number, 2);
    assert_eq!(bye.match_points, 1);
    assert_ne!(bye.player_id, "p02");
}

#[test]
fn test_winner_must_hold_match_points() {
    let mut result = MatchResultData::decided("alice", "bob", "alice", 2, 1);
    assert!(validate_match_result(&result, 3).is_valid);

    result.winner_id = Some("bob".to_string());
    let validation = validate_match_result(&result, 3);
    assert!(!validation.is_valid);
    assert!(
        validation
            .errors
            .contains(&"Winner must be the player with higher match points".to_string())
    );
}

#[test]
fn test_sixteen_players_advance_to_top_eight() {
    let flow = TournamentFlow::new(PhaseConfig {
        format: TournamentFormat::SwissWithCut,
        swiss_rounds: 5,
        top_cut_size: Some(8),
        ..PhaseConfig::default()
    });
    let mut ids = SequentialIds::new();
    let mut rng = StdRng::seed_from_u64(16);
    let mut state = TournamentState::new("regional", field(16), &mut ids);

    for _ in 0..5 {
        let round = flow.generate_next_round(&state, &mut rng).unwrap();
        assert_eq!(round.matches.len(), 8);
        state = play(&flow, round);
    }
    assert_eq!(state.current_round, 5);

    let state = flow.advance_to_top_cut(&state, &mut ids).unwrap();
    let bracket = state.bracket.as_ref().unwrap();
    assert_eq!(bracket.seeds.len(), 8);
    assert_eq!(bracket.total_rounds, 3);
    assert_eq!(bracket.format, PhaseFormat::SingleElimination);
    assert_eq!(state.matches.len(), 40);
}

#[test]
fn test_full_event_with_drop_and_cut() {
    let flow = TournamentFlow::new(PhaseConfig::for_player_count(
        12,
        TournamentFormat::SwissWithCut,
    ));
    assert_eq!(flow.settings().swiss_rounds, 4);
    assert_eq!(flow.settings().top_cut_size, Some(4));

    let mut ids = SequentialIds::new();
    let mut rng = StdRng::seed_from_u64(99);
    let mut state = TournamentState::new("league-cup", field(12), &mut ids);
    let now = Utc.with_ymd_and_hms(2025, 6, 7, 13, 0, 0).unwrap();

    state = play(&flow, flow.generate_next_round(&state, &mut rng).unwrap());

    let request = DropRequest::new("p12", "league-cup", 2, now);
    let dropped = flow
        .record_drop(&state, &request, DropTiming::BetweenRounds, &mut ids)
        .unwrap();
    assert!(dropped.forfeited_match_id.is_none());
    assert!(dropped.drop.bye_assignment.is_some());
    state = dropped.state;

    let round_two = flow.generate_next_round(&state, &mut rng).unwrap();
    assert_eq!(round_two.matches.iter().filter(|m| m.is_bye).count(), 1);
    assert!(round_two.matches.iter().all(|m| !m.involves("p12")));
    state = play(&flow, round_two);

    while flow.next_round_number(&state).unwrap() <= flow.settings().swiss_rounds {
        state = play(&flow, flow.generate_next_round(&state, &mut rng).unwrap());
    }

    let snapshot = TournamentSnapshot {
        settings: flow.settings().clone(),
        state: state.clone(),
    };
    let restored = TournamentSnapshot::from_json(&snapshot.to_json().unwrap()).unwrap();
    assert_eq!(restored.state.matches, state.matches);
    assert_eq!(restored.state.phase_id, state.phase_id);

    state = flow.advance_to_top_cut(&state, &mut ids).unwrap();
    assert!(state.bracket.as_ref().unwrap().seeds.iter().all(|s| s.player_id != "p12"));

    while state.phase == Phase::TopCut {
        state = play(&flow, flow.generate_next_round(&state, &mut rng).unwrap());
    }

    assert_eq!(state.phase, Phase::Completed);
    assert!(flow.is_tournament_complete(&state));
    let bracket = state.bracket.as_ref().unwrap();
    let placements = bracket.final_placements();
    assert_eq!(placements.len(), 4);
    assert_eq!(placements[0].1, 1);

    let swiss_matches = state
        .matches
        .iter()
        .filter(|m| m.stage == MatchStage::Swiss)
        .count();
    let top_cut_matches = state.matches.len() - swiss_matches;
    assert_eq!(top_cut_matches, 3);
}

#[test]
fn test_schedule_follows_recorded_rounds() {
    let config = PhaseConfig {
        swiss_rounds: 4,
        top_cut_size: Some(4),
        ..PhaseConfig::default()
    };
    let start = Utc.with_ymd_and_hms(2025, 6, 7, 9, 0, 0).unwrap();
    let mut data = TournamentScheduleData::from_config(&config, start);
    data.rounds.push(RoundTiming {
        stage: MatchStage::Swiss,
        round_number: 1,
        started_at: Some(start + Duration::minutes(15)),
        ended_at: Some(start + Duration::minutes(75)),
    });

    let schedule = estimate_schedule(&data, start + Duration::minutes(80));
    assert_eq!(schedule.rounds.len(), 6);
    assert_eq!(schedule.rounds[0].status, RoundScheduleStatus::Completed);
    assert_eq!(schedule.rounds[1].estimated_start, start + Duration::minutes(75));
    assert_eq!(schedule.rounds[4].round_number, 5);
    assert_eq!(schedule.rounds[4].name, "Semifinals");
    assert_eq!(schedule.estimated_end, start + Duration::minutes(75 + 50 * 5));
}

fn top_four_after_swiss(ids: &mut SequentialIds) -> (TournamentFlow, TournamentState) {
    let flow = TournamentFlow::new(PhaseConfig {
        swiss_rounds: 3,
        top_cut_size: Some(4),
        ..PhaseConfig::default()
    });
    let mut rng = StdRng::seed_from_u64(8);
    let mut state = TournamentState::new("regional", field(8), ids);
    for _ in 0..3 {
        let round = flow.generate_next_round(&state, &mut rng).unwrap();
        state = play(&flow, round);
    }
    let state = flow.advance_to_top_cut(&state, ids).unwrap();
    (flow, state)
}

#[test]
fn test_top_cut_drop_between_rounds_forfeits_final() {
    let mut ids = SequentialIds::new();
    let mut rng = StdRng::seed_from_u64(8);
    let (flow, state) = top_four_after_swiss(&mut ids);

    let semis = flow.generate_next_round(&state, &mut rng).unwrap();
    let state = play(&flow, semis);
    let final_match = state.bracket.as_ref().unwrap().next_round_matchups()[0].clone();
    let leaving = final_match.player1_id.clone().unwrap();
    let staying = final_match.player2_id.clone().unwrap();

    let now = Utc.with_ymd_and_hms(2025, 3, 1, 16, 0, 0).unwrap();
    let request = DropRequest::new(leaving.clone(), "regional", 2, now);
    let recorded = flow
        .record_drop(&state, &request, DropTiming::BetweenRounds, &mut ids)
        .unwrap();

    assert!(recorded.drop.bye_assignment.is_none());
    let state = recorded.state;
    assert_eq!(state.phase, Phase::Completed);
    assert_eq!(state.bracket.as_ref().unwrap().champion(), Some(&staying));

    let settled = state.match_by_id(&final_match.id).unwrap();
    assert!(settled.is_complete);
    assert_eq!(settled.winner_id.as_ref(), Some(&staying));
    assert!(matches!(
        flow.generate_next_round(&state, &mut rng),
        Err(vgc_swiss::FlowError::TournamentCompleted)
    ));
}

#[test]
fn test_top_cut_drop_waits_for_opponent() {
    let mut ids = SequentialIds::new();
    let mut rng = StdRng::seed_from_u64(8);
    let (flow, state) = top_four_after_swiss(&mut ids);

    let semis = flow.generate_next_round(&state, &mut rng).unwrap();
    let (first, second) = (semis.matches[0].clone(), semis.matches[1].clone());
    let state = flow
        .record_match_result(&semis.state, &first.id, &report(&first))
        .unwrap();
    let leaving = report(&first).winner_id.unwrap();

    let now = Utc.with_ymd_and_hms(2025, 3, 1, 15, 30, 0).unwrap();
    let request = DropRequest::new(leaving.clone(), "regional", 1, now);
    let recorded = flow
        .record_drop(&state, &request, DropTiming::Pairing, &mut ids)
        .unwrap();
    assert!(recorded.drop.bye_assignment.is_none());
    assert!(recorded.forfeited_match_id.is_none());
    assert_eq!(recorded.state.phase, Phase::TopCut);

    let state = flow
        .record_match_result(&recorded.state, &second.id, &report(&second))
        .unwrap();
    let other_finalist = report(&second).winner_id.unwrap();
    assert_eq!(state.phase, Phase::Completed);
    assert_eq!(
        state.bracket.as_ref().unwrap().champion(),
        Some(&other_finalist)
    );
    let final_record = state
        .round_matches(MatchStage::TopCut, 2)
        .next()
        .unwrap();
    assert!(final_record.involves(&leaving));
    assert_eq!(final_record.winner_id.as_ref(), Some(&other_finalist));
}
