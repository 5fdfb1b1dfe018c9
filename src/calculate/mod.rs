//! Standings and pairing calculation.
//!
//! Pure functions over a store snapshot:
//! - Win/match tallies from a single pass over the match records
//! - Standings as a left join of every player against those tallies
//! - Swiss pairings from adjacent standings entries

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{Match, Pairing, Player, PlayerId, StandingEntry, StandingsOrder};

/// Errors raised while pairing players for the next round.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PairingError {
    #[error("Cannot pair an odd number of players ({0})")]
    OddPlayerCount(usize),
}

/// Per-player aggregate over the match records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub wins: u32,
    pub matches: u32,
}

/// Count wins and matches played per player in one pass.
///
/// Players who never appear in a match are absent from the map.
pub fn tally_matches(matches: &[Match]) -> HashMap<PlayerId, Tally> {
    let mut tallies: HashMap<PlayerId, Tally> = HashMap::new();

    for record in matches {
        tallies.entry(record.player1).or_default().matches += 1;
        if record.player2 != record.player1 {
            tallies.entry(record.player2).or_default().matches += 1;
        }
        tallies.entry(record.winner).or_default().wins += 1;
    }

    tallies
}

/// Build the standings for every registered player.
///
/// Players with no matches appear with zero wins and zero matches. Entries
/// are sorted by wins only; the sort is stable, so ties keep the order in
/// which players were registered.
pub fn compute_standings(
    players: &[Player],
    matches: &[Match],
    order: StandingsOrder,
) -> Vec<StandingEntry> {
    let tallies = tally_matches(matches);

    let mut standings: Vec<StandingEntry> = players
        .iter()
        .map(|player| {
            let tally = tallies.get(&player.id).copied().unwrap_or_default();
            StandingEntry {
                id: player.id,
                name: player.name.clone(),
                wins: tally.wins,
                matches: tally.matches,
            }
        })
        .collect();

    match order {
        StandingsOrder::Descending => standings.sort_by(|a, b| b.wins.cmp(&a.wins)),
        StandingsOrder::Ascending => standings.sort_by_key(|entry| entry.wins),
    }

    standings
}

/// Pair standings entries `2k` and `2k + 1` for every `k`.
///
/// An odd number of entries has no valid pairing and is rejected outright;
/// byes are not supported.
pub fn pair_adjacent(standings: &[StandingEntry]) -> Result<Vec<Pairing>, PairingError> {
    if standings.len() % 2 != 0 {
        return Err(PairingError::OddPlayerCount(standings.len()));
    }

    Ok(standings
        .chunks_exact(2)
        .map(|pair| Pairing::new(&pair[0], &pair[1]))
        .collect())
}
