//! Phase transitions: Swiss rounds, the hand-off to the top cut, and
//! completion.

use log::{debug, info, warn};
use rand::Rng;

use super::models::{
    FlowError, FlowResult, GeneratedRound, Phase, RecordedDrop, TournamentState,
};
use crate::bracket::{create_bracket, record_result};
use crate::config::{PhaseConfig, TournamentFormat};
use crate::constants::{MIN_PAIRING_PLAYERS, SMALL_FIELD_MAX_PLAYERS, SMALL_FIELD_ROUNDS};
use crate::drops::{DropRequest, DropTiming, handle_bracket_drop, handle_drop};
use crate::ids::{IdGenerator, PhaseId};
use crate::pairing::generate_pairings;
use crate::standings::{MatchRecord, MatchStage, calculate_standings};
use crate::validation::{MatchResultData, RoundStartContext, games_to_win, validate_match_result};

/// Swiss rounds for a field of `player_count`: 3 up to 8 players, otherwise
/// `ceil(log2(player_count))`.
pub fn calculate_required_rounds(player_count: usize) -> u32 {
    if player_count <= SMALL_FIELD_MAX_PLAYERS {
        return SMALL_FIELD_ROUNDS;
    }
    usize::BITS - (player_count - 1).leading_zeros()
}

/// Drives one tournament through `swiss` → `top_cut` → `completed`.
///
/// Every transition takes the current [`TournamentState`] by reference and
/// returns the next one; nothing is kept between calls.
#[derive(Debug, Clone)]
pub struct TournamentFlow {
    settings: PhaseConfig,
}

impl TournamentFlow {
    pub fn new(settings: PhaseConfig) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &PhaseConfig {
        &self.settings
    }

    /// True when the current round of the active phase is fully reported
    /// (or has not been paired yet).
    pub fn can_start_next_round(&self, state: &TournamentState) -> bool {
        if state.phase == Phase::Completed {
            return false;
        }
        state
            .current_round_matches()
            .iter()
            .all(|m| m.is_complete)
    }

    pub fn can_advance_to_top_cut(&self, state: &TournamentState) -> bool {
        state.phase == Phase::Swiss
            && self.settings.format.has_top_cut()
            && state.current_round >= self.settings.swiss_rounds
    }

    pub fn next_round_number(&self, state: &TournamentState) -> FlowResult<u32> {
        match state.phase {
            Phase::Completed => Err(FlowError::TournamentCompleted),
            Phase::Swiss | Phase::TopCut => Ok(state.current_round + 1),
        }
    }

    /// Inputs for [`crate::validation::validate_round_start`] describing the
    /// round that would be generated next.
    pub fn round_start_context(&self, state: &TournamentState) -> RoundStartContext {
        let planned_rounds = match state.phase {
            Phase::Swiss => self.settings.swiss_rounds,
            Phase::TopCut => state.bracket.as_ref().map_or(0, |b| b.total_rounds),
            Phase::Completed => state.current_round,
        };

        RoundStartContext {
            round_number: state.current_round + 1,
            previous_round_complete: self.can_start_next_round(state),
            planned_rounds,
            participant_count: state.active_player_count() as u32,
            min_participants: MIN_PAIRING_PLAYERS,
            round_time_minutes: self.settings.round_time_minutes,
        }
    }

    /// Pair the next round of the active phase.
    ///
    /// Swiss rounds come from the pairing engine; top cut rounds come from
    /// the bracket's ready matchups. Byes are recorded complete on creation.
    pub fn generate_next_round<R: Rng + ?Sized>(
        &self,
        state: &TournamentState,
        rng: &mut R,
    ) -> FlowResult<GeneratedRound> {
        let round_number = self.next_round_number(state)?;
        if !self.can_start_next_round(state) {
            return Err(FlowError::RoundInProgress(state.current_round));
        }

        match state.phase {
            Phase::Swiss => self.generate_swiss_round(state, round_number, rng),
            Phase::TopCut => self.generate_top_cut_round(state),
            Phase::Completed => Err(FlowError::TournamentCompleted),
        }
    }

    fn generate_swiss_round<R: Rng + ?Sized>(
        &self,
        state: &TournamentState,
        round_number: u32,
        rng: &mut R,
    ) -> FlowResult<GeneratedRound> {
        if !self.settings.format.has_swiss() {
            return Err(FlowError::UnsupportedFormat(self.settings.format.to_string()));
        }
        if round_number > self.settings.swiss_rounds {
            return Err(FlowError::CannotAdvance(format!(
                "all {} Swiss rounds have been played",
                self.settings.swiss_rounds
            )));
        }

        let standings = calculate_standings(&state.players, &state.matches);
        let result = generate_pairings(&standings, round_number, rng);
        if !result.success {
            return Err(FlowError::Pairing(result.errors));
        }

        let matches: Vec<MatchRecord> = result
            .pairings
            .iter()
            .map(|p| match (&p.player2_id, p.is_bye) {
                (Some(opponent), false) => MatchRecord::pending(
                    MatchRecord::swiss_id(round_number, p.table_number),
                    MatchStage::Swiss,
                    round_number,
                    p.table_number,
                    p.player1_id.clone(),
                    opponent.clone(),
                ),
                _ => MatchRecord::bye(round_number, p.table_number, p.player1_id.clone()),
            })
            .collect();

        let mut next = state.clone();
        next.current_round = round_number;
        next.matches.extend(matches.iter().cloned());
        next.players = calculate_standings(&next.players, &next.matches);

        info!(
            "Tournament {}: Swiss round {round_number} paired ({} matches)",
            state.tournament_id,
            matches.len()
        );

        Ok(GeneratedRound {
            state: next,
            stage: MatchStage::Swiss,
            round_number,
            matches,
            strategy: result.strategy,
            warnings: result.warnings,
        })
    }

    /// Pair the bracket's earliest unfinished round. That can skip ahead of
    /// `current_round + 1` when a whole round was settled by forfeits.
    fn generate_top_cut_round(&self, state: &TournamentState) -> FlowResult<GeneratedRound> {
        let bracket = state
            .bracket
            .as_ref()
            .ok_or_else(|| FlowError::CannotAdvance("no top cut bracket installed".to_string()))?;
        let round_number = bracket
            .current_round()
            .ok_or(FlowError::TournamentCompleted)?;

        let matches: Vec<MatchRecord> = bracket
            .next_round_matchups()
            .into_iter()
            .filter(|m| m.round_number == round_number)
            .filter_map(|m| {
                Some(MatchRecord::pending(
                    m.id.clone(),
                    MatchStage::TopCut,
                    round_number,
                    m.slot + 1,
                    m.player1_id.clone()?,
                    m.player2_id.clone()?,
                ))
            })
            .collect();

        if matches.is_empty() {
            return Err(FlowError::CannotAdvance(format!(
                "no top cut matches are ready for round {round_number}"
            )));
        }

        let mut next = state.clone();
        next.current_round = round_number;
        next.matches.extend(matches.iter().cloned());

        let name = bracket
            .round(round_number)
            .map_or_else(|| format!("round {round_number}"), |r| r.name.clone());
        info!(
            "Tournament {}: top cut {name} paired ({} matches)",
            state.tournament_id,
            matches.len()
        );

        Ok(GeneratedRound {
            state: next,
            stage: MatchStage::TopCut,
            round_number,
            matches,
            strategy: None,
            warnings: Vec::new(),
        })
    }

    /// Seed the top cut from final Swiss standings and open a new phase.
    ///
    /// Prior matches and drops are kept; the round counter restarts at 0.
    pub fn advance_to_top_cut(
        &self,
        state: &TournamentState,
        ids: &mut dyn IdGenerator,
    ) -> FlowResult<TournamentState> {
        if state.phase == Phase::Completed {
            return Err(FlowError::TournamentCompleted);
        }
        if !self.can_advance_to_top_cut(state) {
            return Err(FlowError::CannotAdvance(self.top_cut_blocker(state)));
        }
        if !self.can_start_next_round(state) {
            return Err(FlowError::RoundInProgress(state.current_round));
        }

        let size = self
            .settings
            .top_cut_size
            .ok_or_else(|| FlowError::CannotAdvance("no top cut size configured".to_string()))?;

        let standings = calculate_standings(&state.players, &state.matches);
        let bracket = create_bracket(&standings, size)?;

        let mut next = state.clone();
        next.phase = Phase::TopCut;
        next.phase_id = PhaseId::generate(ids);
        next.current_round = 0;
        next.players = standings;
        next.bracket = Some(bracket);

        info!(
            "Tournament {}: advanced to top {size} after {} Swiss rounds",
            state.tournament_id, state.current_round
        );

        Ok(next)
    }

    fn top_cut_blocker(&self, state: &TournamentState) -> String {
        if state.phase != Phase::Swiss {
            format!("tournament is in the {} phase", state.phase)
        } else if !self.settings.format.has_top_cut() {
            format!("format {} has no top cut", self.settings.format)
        } else {
            format!(
                "{} of {} Swiss rounds played",
                state.current_round, self.settings.swiss_rounds
            )
        }
    }

    /// Whether the event has reached its end condition.
    ///
    /// A pure `single_elimination` event has no completion rule and always
    /// reports false.
    pub fn is_tournament_complete(&self, state: &TournamentState) -> bool {
        if state.phase == Phase::Completed {
            return true;
        }

        match self.settings.format {
            TournamentFormat::SwissOnly => state.current_round >= self.settings.swiss_rounds,
            TournamentFormat::SwissWithCut => {
                state.phase == Phase::TopCut
                    && state
                        .bracket
                        .as_ref()
                        .is_some_and(|b| b.remaining_players().len() == 1)
            }
            TournamentFormat::SingleElimination => false,
        }
    }

    /// Apply a reported result to a pending match.
    ///
    /// Swiss results recompute standings; top cut results advance the
    /// bracket and close the event once the final is decided.
    pub fn record_match_result(
        &self,
        state: &TournamentState,
        match_id: &str,
        result: &MatchResultData,
    ) -> FlowResult<TournamentState> {
        if state.phase == Phase::Completed {
            return Err(FlowError::TournamentCompleted);
        }

        let existing = state
            .match_by_id(match_id)
            .ok_or_else(|| FlowError::MatchNotFound(match_id.to_string()))?;
        if existing.is_complete {
            return Err(FlowError::MatchAlreadyComplete(match_id.to_string()));
        }
        if result.player1_id != existing.player1_id || result.player2_id != existing.player2_id {
            return Err(FlowError::InvalidResult(vec![format!(
                "Reported players do not match the players of {match_id}"
            )]));
        }

        let validation = validate_match_result(result, self.settings.best_of);
        if !validation.is_valid {
            return Err(FlowError::InvalidResult(validation.errors));
        }
        let winner = result
            .winner_id
            .clone()
            .ok_or_else(|| FlowError::InvalidResult(vec!["A winner must be reported".to_string()]))?;

        let completed =
            existing.completed(winner.clone(), result.player1_game_wins, result.player2_game_wins);

        let mut next = state.clone();
        if let Some(slot) = next.matches.iter_mut().find(|m| m.id == match_id) {
            *slot = completed;
        }

        match existing.stage {
            MatchStage::Swiss => {
                next.players = calculate_standings(&next.players, &next.matches);
            }
            MatchStage::TopCut => {
                let bracket = next.bracket.as_ref().ok_or_else(|| {
                    FlowError::CannotAdvance("no top cut bracket installed".to_string())
                })?;
                let advanced = record_result(bracket, match_id, &winner)?;
                if advanced.is_complete() {
                    next.phase = Phase::Completed;
                    info!("Tournament {} completed: {winner} wins", state.tournament_id);
                }
                next.bracket = Some(advanced);
                next = self.settle_bracket_forfeits(next)?;
            }
        }

        debug!("Recorded {match_id}: {winner} wins");
        Ok(next)
    }

    /// Drop a player and settle any unfinished match of theirs in the
    /// current round as a win for the opponent.
    ///
    /// In the top cut no bye is considered; the player's next bracket match
    /// is awarded to the opponent as soon as that opponent is known.
    pub fn record_drop(
        &self,
        state: &TournamentState,
        request: &DropRequest,
        timing: DropTiming,
        ids: &mut dyn IdGenerator,
    ) -> FlowResult<RecordedDrop> {
        if state.phase == Phase::Completed {
            return Err(FlowError::TournamentCompleted);
        }

        let outcome = match state.phase {
            Phase::TopCut => handle_bracket_drop(request, &state.players, timing),
            Phase::Swiss | Phase::Completed => handle_drop(request, &state.players, timing, ids),
        };
        if !outcome.success {
            let reason = outcome.error.clone().unwrap_or_default();
            return Err(FlowError::DropRejected(reason));
        }

        let mut next = state.clone();
        next.players = outcome.updated_players.clone();
        next.drops.extend(outcome.drop_record.iter().cloned());

        let live = next
            .current_round_matches()
            .into_iter()
            .find(|m| !m.is_complete && m.involves(&request.player_id))
            .cloned();

        let mut forfeited_match_id = None;
        if let Some(live) = live {
            if let (Some(opponent), Some(player2)) =
                (live.opponent_of(&request.player_id), live.player2_id.as_ref())
            {
                let need = games_to_win(self.settings.best_of);
                let (g1, g2) = if live.player1_id == *opponent {
                    (need, 0)
                } else {
                    (0, need)
                };
                let report = MatchResultData::decided(
                    live.player1_id.clone(),
                    player2.clone(),
                    opponent.clone(),
                    g1,
                    g2,
                );
                warn!(
                    "Player {} dropped with {} unfinished; awarding it to {opponent}",
                    request.player_id, live.id
                );
                next = self.record_match_result(&next, &live.id, &report)?;
                forfeited_match_id = Some(live.id.clone());
            }
        }

        if next.phase == Phase::TopCut {
            next = self.settle_bracket_forfeits(next)?;
        }

        Ok(RecordedDrop {
            state: next,
            drop: outcome,
            forfeited_match_id,
        })
    }

    /// Award every ready bracket match that involves a dropped player to
    /// the other player, including matches not paired yet.
    ///
    /// Advancing a forfeit can fill the next slot, so this repeats until no
    /// such match is left. When both players have dropped the higher seed
    /// advances.
    fn settle_bracket_forfeits(&self, mut state: TournamentState) -> FlowResult<TournamentState> {
        let need = games_to_win(self.settings.best_of);

        loop {
            let Some(bracket) = state.bracket.as_ref() else {
                return Ok(state);
            };
            let dropped = |id: &String| state.player(id).is_some_and(|p| p.is_dropped);

            let forfeit = bracket
                .rounds
                .iter()
                .flat_map(|r| r.matches.iter())
                .filter(|m| m.is_ready())
                .find_map(|m| {
                    let (p1, p2) = (m.player1_id.as_ref()?, m.player2_id.as_ref()?);
                    if !dropped(p1) && !dropped(p2) {
                        return None;
                    }
                    let winner = if dropped(p1) && !dropped(p2) { p2 } else { p1 };
                    Some((m.clone(), p1.clone(), p2.clone(), winner.clone()))
                });

            let Some((bracket_match, p1, p2, winner)) = forfeit else {
                return Ok(state);
            };

            let advanced = record_result(bracket, &bracket_match.id, &winner)?;
            let (g1, g2) = if winner == p1 { (need, 0) } else { (0, need) };

            match state.matches.iter_mut().find(|m| m.id == bracket_match.id) {
                Some(paired) => *paired = paired.completed(winner.clone(), g1, g2),
                None => state.matches.push(
                    MatchRecord::pending(
                        bracket_match.id.clone(),
                        MatchStage::TopCut,
                        bracket_match.round_number,
                        bracket_match.slot + 1,
                        p1,
                        p2,
                    )
                    .completed(winner.clone(), g1, g2),
                ),
            }

            warn!(
                "Tournament {}: {} forfeited to {winner}",
                state.tournament_id, bracket_match.id
            );
            if advanced.is_complete() {
                state.phase = Phase::Completed;
                info!("Tournament {} completed: {winner} wins", state.tournament_id);
            }
            state.bracket = Some(advanced);
        }
    }

    /// Close a finished event that has no further transition of its own.
    pub fn finalize(&self, state: &TournamentState) -> FlowResult<TournamentState> {
        if state.phase == Phase::Completed {
            return Err(FlowError::TournamentCompleted);
        }
        if !self.can_start_next_round(state) {
            return Err(FlowError::RoundInProgress(state.current_round));
        }
        if !self.is_tournament_complete(state) {
            return Err(FlowError::CannotAdvance(format!(
                "tournament {} has not reached its end condition",
                state.tournament_id
            )));
        }

        let mut next = state.clone();
        next.phase = Phase::Completed;
        next.players = calculate_standings(&next.players, &next.matches);
        info!("Tournament {} finalized", state.tournament_id);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::standings::PlayerRecord;
    use chrono::{TimeZone, Utc};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn field(n: usize) -> Vec<PlayerRecord> {
        (1..=n)
            .map(|i| PlayerRecord::new(format!("p{i:02}"), format!("Player {i}")))
            .collect()
    }

    fn player1_wins(m: &MatchRecord) -> MatchResultData {
        MatchResultData::decided(
            m.player1_id.clone(),
            m.player2_id.clone().unwrap(),
            m.player1_id.clone(),
            2,
            1,
        )
    }

    fn play_round(flow: &TournamentFlow, state: TournamentState) -> TournamentState {
        let pending: Vec<MatchRecord> = state
            .current_round_matches()
            .into_iter()
            .filter(|m| !m.is_complete)
            .cloned()
            .collect();
        pending.iter().fold(state, |s, m| {
            flow.record_match_result(&s, &m.id, &player1_wins(m)).unwrap()
        })
    }

    fn swiss_only(rounds: u32) -> TournamentFlow {
        TournamentFlow::new(PhaseConfig {
            format: TournamentFormat::SwissOnly,
            swiss_rounds: rounds,
            top_cut_size: None,
            ..PhaseConfig::default()
        })
    }

    #[test]
    fn test_required_rounds() {
        assert_eq!(calculate_required_rounds(0), 3);
        assert_eq!(calculate_required_rounds(8), 3);
        assert_eq!(calculate_required_rounds(9), 4);
        assert_eq!(calculate_required_rounds(16), 4);
        assert_eq!(calculate_required_rounds(17), 5);
        assert_eq!(calculate_required_rounds(100), 7);
        assert_eq!(calculate_required_rounds(512), 9);
    }

    #[test]
    fn test_swiss_only_lifecycle() {
        let flow = swiss_only(3);
        let mut ids = SequentialIds::new();
        let mut rng = StdRng::seed_from_u64(7);
        let mut state = TournamentState::new("t1", field(4), &mut ids);
        assert_eq!(state.phase_id.to_string(), "phase-1");
        assert!(flow.can_start_next_round(&state));

        for round in 1..=3 {
            assert_eq!(flow.next_round_number(&state).unwrap(), round);
            let generated = flow.generate_next_round(&state, &mut rng).unwrap();
            assert_eq!(generated.matches.len(), 2);
            state = generated.state;
            assert!(!flow.can_start_next_round(&state));
            assert!(matches!(
                flow.generate_next_round(&state, &mut rng),
                Err(FlowError::RoundInProgress(r)) if r == round
            ));
            state = play_round(&flow, state);
        }

        assert!(flow.is_tournament_complete(&state));
        assert!(!flow.can_advance_to_top_cut(&state));
        assert!(matches!(
            flow.generate_next_round(&state, &mut rng),
            Err(FlowError::CannotAdvance(_))
        ));

        let done = flow.finalize(&state).unwrap();
        assert_eq!(done.phase, Phase::Completed);
        assert!(!flow.can_start_next_round(&done));
        assert!(matches!(
            flow.next_round_number(&done),
            Err(FlowError::TournamentCompleted)
        ));
        assert_eq!(done.matches.len(), 6);
    }

    #[test]
    fn test_odd_field_records_bye_complete() {
        let flow = swiss_only(3);
        let mut ids = SequentialIds::new();
        let state = TournamentState::new("t1", field(5), &mut ids);
        let generated = flow
            .generate_next_round(&state, &mut StdRng::seed_from_u64(1))
            .unwrap();

        let byes: Vec<&MatchRecord> = generated.matches.iter().filter(|m| m.is_bye).collect();
        assert_eq!(byes.len(), 1);
        assert!(byes[0].is_complete);
        let bye_player = generated.state.player(&byes[0].player1_id).unwrap();
        assert_eq!(bye_player.match_points, 1);
        assert_eq!(bye_player.bye_count, 1);
    }

    #[test]
    fn test_swiss_with_cut_to_champion() {
        let flow = TournamentFlow::new(PhaseConfig {
            swiss_rounds: 3,
            top_cut_size: Some(4),
            ..PhaseConfig::default()
        });
        let mut ids = SequentialIds::new();
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = TournamentState::new("t2", field(8), &mut ids);

        assert!(matches!(
            flow.advance_to_top_cut(&state, &mut ids),
            Err(FlowError::CannotAdvance(_))
        ));

        for _ in 0..3 {
            state = flow.generate_next_round(&state, &mut rng).unwrap().state;
            state = play_round(&flow, state);
        }
        assert!(flow.can_advance_to_top_cut(&state));
        assert!(!flow.is_tournament_complete(&state));

        state = flow.advance_to_top_cut(&state, &mut ids).unwrap();
        assert_eq!(state.phase, Phase::TopCut);
        assert_eq!(state.current_round, 0);
        assert_eq!(state.phase_id.to_string(), "phase-2");
        assert_eq!(state.matches.len(), 12);
        let bracket = state.bracket.as_ref().unwrap();
        assert_eq!(bracket.size, 4);
        assert_eq!(bracket.total_rounds, 2);

        let semis = flow.generate_next_round(&state, &mut rng).unwrap();
        assert_eq!(semis.stage, MatchStage::TopCut);
        assert_eq!(semis.matches.len(), 2);
        assert_eq!(semis.matches[0].id, "top_cut-r1-m0");
        state = play_round(&flow, semis.state);

        let finals = flow.generate_next_round(&state, &mut rng).unwrap();
        assert_eq!(finals.matches.len(), 1);
        assert_eq!(finals.round_number, 2);
        state = play_round(&flow, finals.state);

        assert_eq!(state.phase, Phase::Completed);
        assert!(flow.is_tournament_complete(&state));
        assert!(state.bracket.as_ref().unwrap().champion().is_some());
    }

    #[test]
    fn test_record_match_result_rejections() {
        let flow = swiss_only(3);
        let mut ids = SequentialIds::new();
        let state = flow
            .generate_next_round(
                &TournamentState::new("t3", field(4), &mut ids),
                &mut StdRng::seed_from_u64(3),
            )
            .unwrap()
            .state;
        let m = state.current_round_matches()[0].clone();

        let mut bad = player1_wins(&m);
        bad.winner_id = m.player2_id.clone();
        match flow.record_match_result(&state, &m.id, &bad) {
            Err(FlowError::InvalidResult(errors)) => assert!(
                errors
                    .iter()
                    .any(|e| e == "Winner must be the player with higher match points")
            ),
            other => panic!("unexpected {other:?}"),
        }

        assert!(matches!(
            flow.record_match_result(&state, "swiss-r9-t9", &player1_wins(&m)),
            Err(FlowError::MatchNotFound(_))
        ));

        let done = flow.record_match_result(&state, &m.id, &player1_wins(&m)).unwrap();
        assert!(matches!(
            flow.record_match_result(&done, &m.id, &player1_wins(&m)),
            Err(FlowError::MatchAlreadyComplete(_))
        ));
    }

    #[test]
    fn test_drop_forfeits_unfinished_match() {
        let flow = swiss_only(3);
        let mut ids = SequentialIds::new();
        let state = flow
            .generate_next_round(
                &TournamentState::new("t4", field(4), &mut ids),
                &mut StdRng::seed_from_u64(11),
            )
            .unwrap()
            .state;
        let m = state.current_round_matches()[0].clone();
        let dropping = m.player1_id.clone();
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 10, 0, 0).unwrap();
        let request = DropRequest::new(dropping.clone(), "t4", 1, now);

        let recorded = flow
            .record_drop(&state, &request, DropTiming::DuringMatch, &mut ids)
            .unwrap();
        assert_eq!(recorded.forfeited_match_id.as_deref(), Some(m.id.as_str()));
        assert_eq!(recorded.state.drops.len(), 1);
        assert!(recorded.drop.opponent_auto_win);

        let forfeited = recorded.state.match_by_id(&m.id).unwrap();
        assert!(forfeited.is_complete);
        assert_eq!(forfeited.winner_id, m.player2_id);
        assert!(recorded.state.player(&dropping).unwrap().is_dropped);

        assert!(matches!(
            flow.record_drop(&recorded.state, &request, DropTiming::BetweenRounds, &mut ids),
            Err(FlowError::DropRejected(_))
        ));
    }

    #[test]
    fn test_round_start_context() {
        let flow = swiss_only(5);
        let mut ids = SequentialIds::new();
        let state = TournamentState::new("t5", field(6), &mut ids);
        let ctx = flow.round_start_context(&state);
        assert_eq!(ctx.round_number, 1);
        assert_eq!(ctx.planned_rounds, 5);
        assert_eq!(ctx.participant_count, 6);
        assert!(ctx.previous_round_complete);
    }

    #[test]
    fn test_single_elimination_is_never_complete() {
        let flow = TournamentFlow::new(PhaseConfig {
            format: TournamentFormat::SingleElimination,
            ..PhaseConfig::default()
        });
        let mut ids = SequentialIds::new();
        let state = TournamentState::new("t6", field(8), &mut ids);
        assert!(!flow.is_tournament_complete(&state));
        assert!(matches!(
            flow.generate_next_round(&state, &mut StdRng::seed_from_u64(0)),
            Err(FlowError::UnsupportedFormat(_))
        ));
    }
}
