//! Record store boundary.
//!
//! The tournament core consumes a store that owns player and match records:
//! - `TournamentStore`: clear/count/insert/scan operations over both tables
//! - `JsonlStore`: durable JSON Lines files under a data directory
//! - `MemoryStore`: in-process tables for tests and throwaway runs

mod jsonl;
mod memory;

pub use jsonl::*;
pub use memory::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{Match, Player, PlayerId};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Cannot delete players: {matches} match record(s) still reference them")]
    PlayersReferenced { matches: usize },

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    #[error("Store lock poisoned during {0}")]
    LockPoisoned(&'static str),
}

/// The two record tables a store owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Players,
    Matches,
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Table::Players => write!(f, "players"),
            Table::Matches => write!(f, "matches"),
        }
    }
}

/// Both tables as read within a single store session.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub players: Vec<Player>,
    pub matches: Vec<Match>,
}

/// Storage operations the tournament core relies on.
///
/// Every call is a self-contained session: implementations acquire whatever
/// lock or file handle they need on entry and release it before returning,
/// on success and failure alike.
pub trait TournamentStore: Send + Sync {
    /// Remove every record from `table`.
    ///
    /// Clearing players while match records remain fails with
    /// [`StoreError::PlayersReferenced`].
    fn clear(&self, table: Table) -> Result<(), StoreError>;

    /// Number of records in `table`.
    fn count(&self, table: Table) -> Result<usize, StoreError>;

    /// Insert a player and return its newly assigned id.
    fn insert_player(&self, name: &str) -> Result<PlayerId, StoreError>;

    /// Append a match record. Both participants must exist and differ.
    fn insert_match(&self, record: Match) -> Result<(), StoreError>;

    /// All players in insertion order.
    fn players(&self) -> Result<Vec<Player>, StoreError>;

    /// All match records in insertion order.
    fn matches(&self) -> Result<Vec<Match>, StoreError>;

    /// Read both tables within one session.
    fn snapshot(&self) -> Result<Snapshot, StoreError>;
}

/// Referential checks shared by store implementations before a match insert.
pub(crate) fn check_match(record: &Match, players: &[Player]) -> Result<(), StoreError> {
    if record.player1 == record.player2 {
        return Err(StoreError::ConstraintViolation(format!(
            "player {} cannot play against themselves",
            record.player1
        )));
    }
    if record.winner != record.player1 && record.winner != record.player2 {
        return Err(StoreError::ConstraintViolation(format!(
            "winner {} is not a participant",
            record.winner
        )));
    }
    for id in [record.player1, record.player2] {
        if !players.iter().any(|p| p.id == id) {
            return Err(StoreError::UnknownPlayer(id));
        }
    }
    Ok(())
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join("players.jsonl")
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join("matches.jsonl")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.data_dir.join("state")
    }

    /// File holding the next player id to hand out.
    pub fn sequence_path(&self) -> PathBuf {
        self.state_dir().join("player_sequence.json")
    }

    /// Advisory lock file guarding store sessions across processes.
    pub fn lock_path(&self) -> PathBuf {
        self.state_dir().join("store.lock")
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}
