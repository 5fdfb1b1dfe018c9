//! Tournament operations over a record store.
//!
//! `Tournament` is stateless apart from its store handle and standings
//! order: every call derives its result fresh from the store, so repeated
//! calls observe whatever writes happened in between.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::calculate::{compute_standings, pair_adjacent, PairingError};
use crate::models::{Match, Pairing, Player, PlayerId, StandingEntry, StandingsOrder};
use crate::storage::{StoreError, Table, TournamentStore};

/// Errors surfaced by tournament operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Pairing(#[from] PairingError),

    #[error("Invalid player name: {0:?}")]
    InvalidName(String),
}

/// Swiss-system tournament: registration, results, standings and pairings.
#[derive(Clone)]
pub struct Tournament {
    store: Arc<dyn TournamentStore>,
    order: StandingsOrder,
}

impl Tournament {
    pub fn new(store: Arc<dyn TournamentStore>) -> Self {
        Self {
            store,
            order: StandingsOrder::default(),
        }
    }

    /// Use the given standings order instead of the default.
    pub fn with_order(mut self, order: StandingsOrder) -> Self {
        self.order = order;
        self
    }

    pub fn order(&self) -> StandingsOrder {
        self.order
    }

    /// Remove all match records.
    pub fn delete_matches(&self) -> Result<(), TournamentError> {
        self.store.clear(Table::Matches)?;
        info!("Deleted all matches");
        Ok(())
    }

    /// Remove all players. Fails while match records still reference them.
    pub fn delete_players(&self) -> Result<(), TournamentError> {
        self.store.clear(Table::Players)?;
        info!("Deleted all players");
        Ok(())
    }

    /// Number of registered players.
    pub fn count_players(&self) -> Result<usize, TournamentError> {
        Ok(self.store.count(Table::Players)?)
    }

    /// Register a player. Names need not be unique but must not be blank;
    /// surrounding whitespace is dropped.
    pub fn register_player(&self, name: &str) -> Result<PlayerId, TournamentError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::InvalidName(name.to_string()));
        }
        Ok(self.store.insert_player(trimmed)?)
    }

    /// All registered players in registration order.
    pub fn players(&self) -> Result<Vec<Player>, TournamentError> {
        Ok(self.store.players()?)
    }

    /// Record that `winner` beat `loser`.
    pub fn report_match(&self, winner: PlayerId, loser: PlayerId) -> Result<(), TournamentError> {
        self.store.insert_match(Match::new(winner, loser))?;
        Ok(())
    }

    /// All reported matches in reporting order.
    pub fn matches(&self) -> Result<Vec<Match>, TournamentError> {
        Ok(self.store.matches()?)
    }

    /// Every player with their win and match counts, sorted by wins.
    pub fn player_standings(&self) -> Result<Vec<StandingEntry>, TournamentError> {
        let snapshot = self.store.snapshot()?;
        let standings = compute_standings(&snapshot.players, &snapshot.matches, self.order);

        debug!(
            "Computed standings for {} players from {} matches ({})",
            standings.len(),
            snapshot.matches.len(),
            self.order
        );
        Ok(standings)
    }

    /// Pairings for the next round: each player meets their neighbour in the
    /// standings. Requires an even number of players.
    pub fn swiss_pairings(&self) -> Result<Vec<Pairing>, TournamentError> {
        let standings = self.player_standings()?;
        let pairings = pair_adjacent(&standings)?;

        info!("Generated {} pairings", pairings.len());
        Ok(pairings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{JsonlStore, MemoryStore, StorageConfig};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use tempfile::TempDir;

    fn memory_tournament() -> Tournament {
        Tournament::new(Arc::new(MemoryStore::new()))
    }

    fn register_all(tournament: &Tournament, names: &[&str]) -> Vec<PlayerId> {
        names
            .iter()
            .map(|name| tournament.register_player(name).unwrap())
            .collect()
    }

    #[test]
    fn test_count_after_register_and_delete() {
        let t = memory_tournament();
        assert_eq!(t.count_players().unwrap(), 0);

        register_all(&t, &["Markov Chaney", "Joe Malik", "Mao Tsu-hsi", "Atlanta Hope"]);
        assert_eq!(t.count_players().unwrap(), 4);

        t.delete_players().unwrap();
        assert_eq!(t.count_players().unwrap(), 0);
    }

    #[test]
    fn test_delete_players_requires_deleting_matches_first() {
        let t = memory_tournament();
        let ids = register_all(&t, &["A", "B"]);
        t.report_match(ids[0], ids[1]).unwrap();

        assert!(matches!(
            t.delete_players(),
            Err(TournamentError::Store(StoreError::PlayersReferenced { .. }))
        ));

        t.delete_matches().unwrap();
        t.delete_players().unwrap();
        assert_eq!(t.count_players().unwrap(), 0);
    }

    #[test]
    fn test_standings_before_matches() {
        let t = memory_tournament();
        register_all(&t, &["Melpomene Murray", "Randy Schwartz"]);

        let standings = t.player_standings().unwrap();
        assert_eq!(standings.len(), 2);
        assert!(standings.iter().all(|e| e.wins == 0 && e.matches == 0));
        let names: HashSet<&str> = standings.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, HashSet::from(["Melpomene Murray", "Randy Schwartz"]));
    }

    #[test]
    fn test_report_matches() {
        let t = memory_tournament();
        let ids = register_all(&t, &["Bruno Walton", "Boots O'Neal", "Cathy Burton", "Diane Grant"]);
        t.report_match(ids[0], ids[1]).unwrap();
        t.report_match(ids[2], ids[3]).unwrap();

        let standings = t.player_standings().unwrap();
        assert_eq!(standings.len(), 4);
        for entry in &standings {
            assert_eq!(entry.matches, 1);
            if entry.id == ids[0] || entry.id == ids[2] {
                assert_eq!(entry.wins, 1);
            } else {
                assert_eq!(entry.wins, 0);
            }
        }
    }

    #[test]
    fn test_report_match_only_touches_participants() {
        let t = memory_tournament();
        let ids = register_all(&t, &["A", "B", "C", "D"]);
        t.report_match(ids[0], ids[1]).unwrap();
        let before = t.player_standings().unwrap();

        t.report_match(ids[2], ids[0]).unwrap();
        let after = t.player_standings().unwrap();

        let find = |standings: &[StandingEntry], id: PlayerId| {
            standings.iter().find(|e| e.id == id).cloned().unwrap()
        };
        assert_eq!(find(&after, ids[2]).wins, find(&before, ids[2]).wins + 1);
        assert_eq!(find(&after, ids[2]).matches, find(&before, ids[2]).matches + 1);
        assert_eq!(find(&after, ids[0]).wins, find(&before, ids[0]).wins);
        assert_eq!(find(&after, ids[0]).matches, find(&before, ids[0]).matches + 1);
        assert_eq!(find(&after, ids[1]), find(&before, ids[1]));
        assert_eq!(find(&after, ids[3]), find(&before, ids[3]));
    }

    #[test]
    fn test_report_match_unknown_player() {
        let t = memory_tournament();
        let ids = register_all(&t, &["A"]);

        let err = t.report_match(ids[0], PlayerId::new(404)).unwrap_err();
        assert!(matches!(
            err,
            TournamentError::Store(StoreError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_register_player_rejects_blank_name() {
        let t = memory_tournament();

        for name in ["", "   ", "\t\n"] {
            assert!(matches!(
                t.register_player(name),
                Err(TournamentError::InvalidName(_))
            ));
        }
        assert_eq!(t.count_players().unwrap(), 0);
    }

    #[test]
    fn test_register_player_trims_name() {
        let t = memory_tournament();
        let id = t.register_player("  Joe Malik ").unwrap();

        let players = t.players().unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, id);
        assert_eq!(players[0].name, "Joe Malik");
    }

    #[test]
    fn test_matches_lists_reported_results() {
        let t = memory_tournament();
        let ids = register_all(&t, &["A", "B", "C"]);
        t.report_match(ids[0], ids[1]).unwrap();
        t.report_match(ids[2], ids[0]).unwrap();

        let matches = t.matches().unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].winner, ids[0]);
        assert_eq!(matches[0].loser(), ids[1]);
        assert_eq!(matches[1].winner, ids[2]);

        t.delete_matches().unwrap();
        assert!(t.matches().unwrap().is_empty());
    }

    #[test]
    fn test_standings_idempotent() {
        let t = memory_tournament();
        let ids = register_all(&t, &["A", "B", "C", "D"]);
        t.report_match(ids[3], ids[0]).unwrap();

        assert_eq!(t.player_standings().unwrap(), t.player_standings().unwrap());
    }

    #[test]
    fn test_pairings_cover_every_player_once() {
        let t = memory_tournament();
        let ids = register_all(&t, &["Twilight Sparkle", "Fluttershy", "Applejack", "Pinkie Pie"]);
        t.report_match(ids[0], ids[1]).unwrap();
        t.report_match(ids[2], ids[3]).unwrap();

        let pairings = t.swiss_pairings().unwrap();
        assert_eq!(pairings.len(), 2);

        let paired: Vec<PlayerId> = pairings.iter().flat_map(|p| p.ids()).collect();
        let unique: HashSet<PlayerId> = paired.iter().copied().collect();
        assert_eq!(paired.len(), 4);
        assert_eq!(unique, ids.iter().copied().collect::<HashSet<_>>());

        let pairs: HashSet<[PlayerId; 2]> = pairings
            .iter()
            .map(|p| {
                let mut ids = p.ids();
                ids.sort();
                ids
            })
            .collect();
        assert!(pairs.contains(&[ids[0], ids[2]]));
        assert!(pairs.contains(&[ids[1], ids[3]]));
    }

    #[test]
    fn test_pairings_follow_descending_standings() {
        let t = memory_tournament();
        let ids = register_all(&t, &["A", "B", "C", "D"]);
        t.report_match(ids[0], ids[1]).unwrap();
        t.report_match(ids[2], ids[3]).unwrap();

        let pairings = t.swiss_pairings().unwrap();
        assert_eq!(pairings[0].ids(), [ids[0], ids[2]]);
        assert_eq!(pairings[1].ids(), [ids[1], ids[3]]);
    }

    #[test]
    fn test_pairings_follow_ascending_standings() {
        let t = memory_tournament().with_order(StandingsOrder::Ascending);
        let ids = register_all(&t, &["A", "B", "C", "D"]);
        t.report_match(ids[0], ids[1]).unwrap();
        t.report_match(ids[2], ids[3]).unwrap();

        let pairings = t.swiss_pairings().unwrap();
        assert_eq!(pairings[0].ids(), [ids[1], ids[3]]);
        assert_eq!(pairings[1].ids(), [ids[0], ids[2]]);
    }

    #[test]
    fn test_pairings_odd_player_count() {
        let t = memory_tournament();
        register_all(&t, &["A", "B", "C"]);

        let err = t.swiss_pairings().unwrap_err();
        assert!(matches!(
            err,
            TournamentError::Pairing(PairingError::OddPlayerCount(3))
        ));
    }

    #[test]
    fn test_full_round_on_jsonl_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonlStore::new(StorageConfig::new(temp_dir.path().to_path_buf()));
        let t = Tournament::new(Arc::new(store));

        let ids = register_all(&t, &["A", "B", "C", "D", "E", "F"]);
        for pairing in t.swiss_pairings().unwrap() {
            t.report_match(pairing.id1, pairing.id2).unwrap();
        }

        let standings = t.player_standings().unwrap();
        assert_eq!(standings.len(), 6);
        let total_matches: u32 = standings.iter().map(|e| e.matches).sum();
        assert_eq!(total_matches, 6);
        assert_eq!(standings[0].id, ids[0]);
        assert_eq!(standings[0].wins, 1);
        assert_eq!(standings[5].wins, 0);

        let round_two = t.swiss_pairings().unwrap();
        assert_eq!(round_two.len(), 3);
    }
}
