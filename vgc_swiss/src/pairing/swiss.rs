//! Swiss pairing engine.

use log::{debug, warn};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashSet};

use super::models::{Pairing, PairingStrategy, SwissPairingResult};
use crate::constants::MIN_PAIRING_PLAYERS;
use crate::standings::{PlayerRecord, compare_standings};

type Matchup<'a> = (&'a PlayerRecord, &'a PlayerRecord);

/// Choose the bye recipient from players already in standings order.
///
/// The candidate pool is everyone with the fewest byes so far; the
/// lowest-standing player in that pool gets the bye. When nobody has had a
/// bye yet this is simply the last player in the standings.
pub fn select_bye_player<'a>(standings: &[&'a PlayerRecord]) -> Option<&'a PlayerRecord> {
    let fewest = standings.iter().map(|p| p.byes_received()).min()?;
    standings
        .iter()
        .rev()
        .find(|p| p.byes_received() == fewest)
        .copied()
}

/// Active players sorted by the standings comparator.
pub fn active_standings(players: &[PlayerRecord]) -> Vec<&PlayerRecord> {
    let mut active: Vec<&PlayerRecord> = players.iter().filter(|p| p.is_active()).collect();
    active.sort_by(|a, b| compare_standings(a, b));
    active
}

/// Generate pairings for `round_number` using an explicit random source.
///
/// Only round 1 consumes randomness; later rounds are fully determined by
/// the standings.
pub fn generate_pairings<R: Rng + ?Sized>(
    players: &[PlayerRecord],
    round_number: u32,
    rng: &mut R,
) -> SwissPairingResult {
    let active_count = players.iter().filter(|p| p.is_active()).count();
    if active_count < MIN_PAIRING_PLAYERS as usize {
        return SwissPairingResult::failure(format!(
            "At least 2 active players are required to generate pairings (found {active_count})"
        ));
    }

    let mut result = if round_number <= 1 {
        pair_first_round(players, rng)
    } else {
        pair_by_standings(players)
    };

    if result.success {
        if let Err(error) = verify_coverage(players, &result.pairings) {
            result.success = false;
            result.errors.push(error);
        }
    }

    debug!(
        "Round {round_number}: {} pairings for {active_count} active players ({:?})",
        result.pairings.len(),
        result.strategy
    );

    result
}

/// Same as [`generate_pairings`] with a reproducible seed.
pub fn generate_seeded_pairings(
    players: &[PlayerRecord],
    round_number: u32,
    seed: u64,
) -> SwissPairingResult {
    let mut rng = StdRng::seed_from_u64(seed);
    generate_pairings(players, round_number, &mut rng)
}

fn pair_first_round<R: Rng + ?Sized>(players: &[PlayerRecord], rng: &mut R) -> SwissPairingResult {
    let mut order: Vec<&PlayerRecord> = players.iter().filter(|p| p.is_active()).collect();
    order.shuffle(rng);

    let mut pairings: Vec<Pairing> = order
        .chunks_exact(2)
        .zip(1u32..)
        .map(|(pair, table)| Pairing::matchup(table, pair[0].id.clone(), pair[1].id.clone()))
        .collect();

    if order.len() % 2 == 1 {
        if let Some(last) = order.last() {
            let table = pairings.len() as u32 + 1;
            pairings.push(Pairing::bye(table, last.id.clone()));
        }
    }

    SwissPairingResult {
        success: true,
        pairings,
        errors: Vec::new(),
        warnings: Vec::new(),
        strategy: Some(PairingStrategy::Random),
        rematch_count: 0,
    }
}

fn pair_by_standings(players: &[PlayerRecord]) -> SwissPairingResult {
    let mut standings = active_standings(players);
    let mut warnings = Vec::new();

    let bye_player = if standings.len() % 2 == 1 {
        let chosen = select_bye_player(&standings);
        if let Some(bye) = chosen {
            debug!("Bye goes to {} ({} byes so far)", bye.id, bye.byes_received());
            if bye.byes_received() > 0 {
                warnings.push(format!(
                    "Every active player has already received a bye; {} receives another",
                    bye.id
                ));
            }
            standings.retain(|p| p.id != bye.id);
        }
        chosen
    } else {
        None
    };

    let (matchups, leftover, rematch_count) = pair_point_groups(&standings, &mut warnings);

    if !leftover.is_empty() {
        let ids: Vec<&str> = leftover.iter().map(|p| p.id.as_str()).collect();
        let mut failure =
            SwissPairingResult::failure(format!("Unable to pair players: {}", ids.join(", ")));
        failure.warnings = warnings;
        return failure;
    }

    let mut pairings: Vec<Pairing> = matchups
        .iter()
        .zip(1u32..)
        .map(|((a, b), table)| Pairing::matchup(table, a.id.clone(), b.id.clone()))
        .collect();

    if let Some(bye) = bye_player {
        let table = pairings.len() as u32 + 1;
        pairings.push(Pairing::bye(table, bye.id.clone()));
    }

    SwissPairingResult {
        success: true,
        pairings,
        errors: Vec::new(),
        warnings,
        strategy: Some(if rematch_count > 0 {
            PairingStrategy::BestEffort
        } else {
            PairingStrategy::PointGroups
        }),
        rematch_count,
    }
}

fn is_rematch(a: &PlayerRecord, b: &PlayerRecord) -> bool {
    a.has_played(&b.id) || b.has_played(&a.id)
}

/// Pair highest point group first. Players a group cannot place without a
/// rematch (or the odd one out) float down into the next group. Whatever is
/// left after the lowest group goes through the best-effort pass, which
/// accepts rematches only when nothing else is available.
fn pair_point_groups<'a>(
    standings: &[&'a PlayerRecord],
    warnings: &mut Vec<String>,
) -> (Vec<Matchup<'a>>, Vec<&'a PlayerRecord>, usize) {
    let mut groups: BTreeMap<u32, Vec<&'a PlayerRecord>> = BTreeMap::new();
    for &player in standings {
        groups.entry(player.match_points).or_default().push(player);
    }

    let mut matchups = Vec::new();
    let mut carried: Vec<&'a PlayerRecord> = Vec::new();

    for (points, group) in groups.into_iter().rev() {
        if !carried.is_empty() {
            debug!("{} player(s) float down into the {points}-point group", carried.len());
        }
        let mut pool = std::mem::take(&mut carried);
        pool.extend(group);

        let (paired, leftover) = pair_sequentially(pool);
        matchups.extend(paired);
        carried = leftover;
    }

    if carried.is_empty() {
        return (matchups, carried, 0);
    }

    let (paired, leftover, rematches) = pair_best_effort(carried, warnings);
    matchups.extend(paired);
    (matchups, leftover, rematches)
}

/// Walk the pool in order, pairing each player with the first remaining
/// player they have not met.
fn pair_sequentially<'a>(mut remaining: Vec<&'a PlayerRecord>) -> (Vec<Matchup<'a>>, Vec<&'a PlayerRecord>) {
    let mut paired = Vec::new();
    let mut leftover = Vec::new();

    while !remaining.is_empty() {
        let player = remaining.remove(0);
        match remaining.iter().position(|c| !is_rematch(player, c)) {
            Some(pos) => {
                let opponent = remaining.remove(pos);
                paired.push((player, opponent));
            }
            None => leftover.push(player),
        }
    }

    (paired, leftover)
}

fn pair_best_effort<'a>(
    mut remaining: Vec<&'a PlayerRecord>,
    warnings: &mut Vec<String>,
) -> (Vec<Matchup<'a>>, Vec<&'a PlayerRecord>, usize) {
    let mut paired = Vec::new();
    let mut rematches = 0;

    while remaining.len() >= 2 {
        let player = remaining.remove(0);
        let pos = match remaining.iter().position(|c| !is_rematch(player, c)) {
            Some(pos) => pos,
            None => {
                rematches += 1;
                warn!("Forced rematch for {} against {}", player.id, remaining[0].id);
                warnings.push(format!(
                    "Rematch between {} and {}: no rematch-free opponent remained",
                    player.id, remaining[0].id
                ));
                0
            }
        };
        let opponent = remaining.remove(pos);
        paired.push((player, opponent));
    }

    (paired, remaining, rematches)
}

/// Every active player must appear exactly once; nobody else may appear.
fn verify_coverage(players: &[PlayerRecord], pairings: &[Pairing]) -> Result<(), String> {
    let active: HashSet<&str> = players
        .iter()
        .filter(|p| p.is_active())
        .map(|p| p.id.as_str())
        .collect();

    let mut seen = HashSet::new();
    for id in pairings.iter().flat_map(Pairing::player_ids) {
        if !active.contains(id.as_str()) {
            return Err(format!("Pairing includes inactive or unknown player {id}"));
        }
        if !seen.insert(id.as_str()) {
            return Err(format!("Player {id} was paired more than once"));
        }
    }

    if seen.len() != active.len() {
        let missing: Vec<&str> = active.difference(&seen).copied().collect();
        return Err(format!("Players left unpaired: {}", missing.join(", ")));
    }

    Ok(())
}
