//! In-memory tournament store.

use std::sync::RwLock;

use tracing::debug;

use super::{check_match, Snapshot, StoreError, Table, TournamentStore};
use crate::models::{Match, Player, PlayerId};

#[derive(Debug)]
struct Tables {
    players: Vec<Player>,
    matches: Vec<Match>,
    next_id: PlayerId,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            players: Vec::new(),
            matches: Vec::new(),
            next_id: PlayerId::new(1),
        }
    }
}

/// Store that keeps both tables in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TournamentStore for MemoryStore {
    fn clear(&self, table: Table) -> Result<(), StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::LockPoisoned("clear"))?;

        match table {
            Table::Players => {
                if !tables.matches.is_empty() {
                    return Err(StoreError::PlayersReferenced {
                        matches: tables.matches.len(),
                    });
                }
                tables.players.clear();
            }
            Table::Matches => tables.matches.clear(),
        }

        debug!("Cleared {} table", table);
        Ok(())
    }

    fn count(&self, table: Table) -> Result<usize, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::LockPoisoned("count"))?;

        Ok(match table {
            Table::Players => tables.players.len(),
            Table::Matches => tables.matches.len(),
        })
    }

    fn insert_player(&self, name: &str) -> Result<PlayerId, StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_player"))?;

        let id = tables.next_id;
        tables.next_id = id.next();
        tables.players.push(Player::new(id, name));

        debug!("Registered player {} ({})", id, name);
        Ok(id)
    }

    fn insert_match(&self, record: Match) -> Result<(), StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::LockPoisoned("insert_match"))?;

        check_match(&record, &tables.players)?;
        tables.matches.push(record);
        Ok(())
    }

    fn players(&self) -> Result<Vec<Player>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::LockPoisoned("players"))?;
        Ok(tables.players.clone())
    }

    fn matches(&self) -> Result<Vec<Match>, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::LockPoisoned("matches"))?;
        Ok(tables.matches.clone())
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::LockPoisoned("snapshot"))?;
        Ok(Snapshot {
            players: tables.players.clone(),
            matches: tables.matches.clone(),
        })
    }
}
