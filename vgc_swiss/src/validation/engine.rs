//! Settings, round-start and match-result checks.

use super::models::{MatchResultData, RoundStartContext, TournamentValidationSettings, ValidationResult};
use crate::bracket::is_valid_bracket_size;
use crate::constants::{
    MAX_ROUND_TIME_MINUTES, MAX_TOURNAMENT_NAME_LEN, MIN_PARTICIPANTS, MIN_ROUND_TIME_MINUTES,
    SWISS_ROUNDS_WARNING_THRESHOLD,
};
use crate::flow::calculate_required_rounds;

/// Games needed to take a best-of-`best_of` match
pub fn games_to_win(best_of: u32) -> u32 {
    best_of.div_ceil(2)
}

pub fn validate_tournament_settings(settings: &TournamentValidationSettings) -> ValidationResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let name = settings.name.trim();
    if name.is_empty() {
        errors.push("Tournament name is required".to_string());
    } else if name.chars().count() > MAX_TOURNAMENT_NAME_LEN {
        errors.push(format!(
            "Tournament name must be {MAX_TOURNAMENT_NAME_LEN} characters or fewer"
        ));
    }

    if settings.min_participants < MIN_PARTICIPANTS {
        errors.push(format!(
            "Minimum participants must be at least {MIN_PARTICIPANTS}"
        ));
    }

    if settings.max_participants < settings.min_participants {
        errors.push(
            "Maximum participants must be greater than or equal to minimum participants"
                .to_string(),
        );
    }

    if settings.format.has_top_cut() {
        match settings.top_cut_size {
            None => errors.push("Top cut size is required when the format includes a cut".to_string()),
            Some(size) if !is_valid_bracket_size(size) => errors.push(format!(
                "Top cut size must be a power of two between 4 and 256 (got {size})"
            )),
            Some(size) if size > settings.max_participants => errors.push(format!(
                "Top cut size ({size}) cannot exceed maximum participants ({})",
                settings.max_participants
            )),
            Some(_) => {}
        }
    }

    if settings.format.has_swiss() {
        if settings.swiss_rounds < 1 {
            errors.push("Swiss rounds must be at least 1".to_string());
        } else {
            if settings.swiss_rounds > SWISS_ROUNDS_WARNING_THRESHOLD {
                warnings.push(format!(
                    "{} Swiss rounds is unusually long (more than {SWISS_ROUNDS_WARNING_THRESHOLD})",
                    settings.swiss_rounds
                ));
            }

            let field = settings
                .expected_participants
                .unwrap_or(settings.max_participants);
            let recommended = calculate_required_rounds(field as usize);
            if settings.swiss_rounds.abs_diff(recommended) > 1 {
                warnings.push(format!(
                    "{} Swiss rounds differs from the recommended {recommended} for {field} players",
                    settings.swiss_rounds
                ));
            }
        }
    }

    if !(MIN_ROUND_TIME_MINUTES..=MAX_ROUND_TIME_MINUTES).contains(&settings.round_time_minutes) {
        errors.push(format!(
            "Round time must be between {MIN_ROUND_TIME_MINUTES} and {MAX_ROUND_TIME_MINUTES} minutes"
        ));
    }

    if settings.end_date <= settings.start_date {
        errors.push("End date must be after start date".to_string());
    }

    ValidationResult::from_parts(errors, warnings)
}

pub fn validate_round_start(context: &RoundStartContext) -> ValidationResult {
    let mut errors = Vec::new();

    if context.round_number > 1 && !context.previous_round_complete {
        errors.push(format!(
            "Previous round must be complete before starting round {}",
            context.round_number
        ));
    }

    if context.planned_rounds > 0 && context.round_number > context.planned_rounds {
        errors.push(format!(
            "Round {} exceeds the planned total of {} rounds",
            context.round_number, context.planned_rounds
        ));
    }

    if context.participant_count < context.min_participants {
        errors.push(format!(
            "At least {} participants are required to start a round (found {})",
            context.min_participants, context.participant_count
        ));
    }

    if context.round_time_minutes < MIN_ROUND_TIME_MINUTES {
        errors.push(format!(
            "Round time must be at least {MIN_ROUND_TIME_MINUTES} minutes"
        ));
    }

    ValidationResult::from_parts(errors, Vec::new())
}

/// Check a reported result against the best-of format.
pub fn validate_match_result(result: &MatchResultData, best_of: u32) -> ValidationResult {
    let mut errors = Vec::new();

    if result.is_bye {
        validate_bye(result, &mut errors);
        return ValidationResult::from_parts(errors, Vec::new());
    }

    if best_of == 0 || best_of % 2 == 0 {
        errors.push(format!("Best-of must be a positive odd number (got {best_of})"));
        return ValidationResult::from_parts(errors, Vec::new());
    }

    let Some(player2_id) = result.player2_id.as_deref() else {
        errors.push("Non-bye matches require two players".to_string());
        return ValidationResult::from_parts(errors, Vec::new());
    };

    let (mp1, mp2) = (result.player1_match_points, result.player2_match_points);
    if mp1 > 1 || mp2 > 1 {
        errors.push("Match points must be 0 or 1".to_string());
    }
    if mp1 == mp2 {
        errors.push("Matches cannot end in a tie".to_string());
    }

    let need = games_to_win(best_of);
    let (g1, g2) = (result.player1_game_wins, result.player2_game_wins);
    let total = u64::from(g1) + u64::from(g2);
    if total < u64::from(need) || total > u64::from(best_of) {
        errors.push(format!(
            "Total games ({total}) must be between {need} and {best_of} for a best-of-{best_of} match"
        ));
    }

    let winner_is_player1 = match result.winner_id.as_deref() {
        None => {
            errors.push("A winner must be reported".to_string());
            return ValidationResult::from_parts(errors, Vec::new());
        }
        Some(winner) if winner == result.player1_id => true,
        Some(winner) if winner == player2_id => false,
        Some(winner) => {
            errors.push(format!("Winner {winner} is not a player in this match"));
            return ValidationResult::from_parts(errors, Vec::new());
        }
    };

    let (winner_mp, loser_mp, winner_games, loser_games) = if winner_is_player1 {
        (mp1, mp2, g1, g2)
    } else {
        (mp2, mp1, g2, g1)
    };

    if winner_mp <= loser_mp {
        errors.push("Winner must be the player with higher match points".to_string());
    }
    if winner_games < need {
        errors.push(format!("Winner must have at least {need} game wins"));
    }
    if loser_games >= winner_games {
        errors.push("Loser must have fewer game wins than the winner".to_string());
    }

    ValidationResult::from_parts(errors, Vec::new())
}

fn validate_bye(result: &MatchResultData, errors: &mut Vec<String>) {
    if result.player2_id.is_some() {
        errors.push("Bye matches cannot have a second player".to_string());
    }
    if result.player1_match_points != 1 || result.player2_match_points != 0 {
        errors.push("Bye must award exactly 1 match point to the player and 0 to the opponent".to_string());
    }
    if result.player1_game_wins != 0 || result.player2_game_wins != 0 {
        errors.push("Bye matches must not record game wins".to_string());
    }
    if let Some(winner) = result.winner_id.as_deref() {
        if winner != result.player1_id {
            errors.push("Bye winner must be the player receiving the bye".to_string());
        }
    }
}
