//! JSONL (JSON Lines) storage.
//!
//! Players and matches each live in their own JSONL file under the data
//! directory. Each line is a valid JSON object representing one record.
//! Appends are used for inserts; clears rewrite the file through a temporary
//! sibling and a rename so readers never see a half-written table.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::{check_match, Snapshot, StorageConfig, StoreError, Table, TournamentStore};
use crate::models::{Match, Player, PlayerId};

/// JSONL file writer.
pub struct JsonlWriter<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize> JsonlWriter<T> {
    /// Create a new JSONL writer for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Append a single record to the file.
    ///
    /// If the last line was left unterminated, it is closed first so the new
    /// record always starts on its own line.
    pub fn append(&self, record: &T) -> Result<(), StoreError> {
        ensure_parent(&self.path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&self.path)?;

        let terminated = ends_with_newline(&mut file)?;
        let mut writer = BufWriter::new(file);
        if !terminated {
            warn!("Closing unterminated last line in {:?}", self.path);
            writeln!(writer)?;
        }
        let json = serde_json::to_string(record)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended record to {:?}", self.path);
        Ok(())
    }

    /// Replace the entire file with `records`.
    ///
    /// The new content is written to a temporary file first and renamed over
    /// the target, so the replacement is all-or-nothing.
    pub fn write_all(&self, records: &[T]) -> Result<usize, StoreError> {
        ensure_parent(&self.path)?;

        let tmp_path = self.path.with_extension("jsonl.tmp");
        let file = File::create(&tmp_path)?;
        let mut writer = BufWriter::new(file);

        for record in records {
            let json = serde_json::to_string(record)?;
            writeln!(writer, "{}", json)?;
        }

        writer.flush()?;
        drop(writer);
        fs::rename(&tmp_path, &self.path)?;

        info!("Wrote {} records to {:?}", records.len(), self.path);
        Ok(records.len())
    }
}

/// JSONL file reader.
pub struct JsonlReader<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: DeserializeOwned> JsonlReader<T> {
    /// Create a new JSONL reader for the given path.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    /// Read all records from the file. A missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);
        let mut records = Vec::new();

        for (index, line) in reader.lines().enumerate() {
            let line = line?;

            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(
                        "Failed to parse line {} in {:?}: {}",
                        index + 1,
                        self.path,
                        e
                    );
                }
            }
        }

        debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    /// Count the records `read_all` would return.
    pub fn count(&self) -> Result<usize, StoreError> {
        Ok(self.read_all()?.len())
    }
}

/// Whether the file is empty or its last byte is a newline.
fn ends_with_newline(file: &mut File) -> Result<bool, StoreError> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(true);
    }

    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn ensure_parent(path: &Path) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Persisted id sequence for players.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct PlayerSequence {
    next_id: PlayerId,
}

/// An open store session: the in-process guard plus an exclusive lock on
/// the data directory's lock file. Both are released on drop.
struct Session<'a> {
    _lock_file: File,
    _guard: MutexGuard<'a, ()>,
}

/// Tournament store backed by JSONL files.
///
/// Sessions hold an advisory lock on `state/store.lock`, so separate
/// processes sharing a data directory (a CLI call next to a running server)
/// serialize their reads and writes.
pub struct JsonlStore {
    config: StorageConfig,
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    /// Acquire the store session. Released when the session drops.
    fn session(&self, operation: &'static str) -> Result<Session<'_>, StoreError> {
        let guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::LockPoisoned(operation))?;

        let path = self.config.lock_path();
        ensure_parent(&path)?;
        let lock_file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;
        lock_file.lock()?;

        debug!("Opened store session for {}", operation);
        Ok(Session {
            _lock_file: lock_file,
            _guard: guard,
        })
    }

    fn players_reader(&self) -> JsonlReader<Player> {
        JsonlReader::new(self.config.players_path())
    }

    fn matches_reader(&self) -> JsonlReader<Match> {
        JsonlReader::new(self.config.matches_path())
    }

    /// Next id to assign. Falls back to one past the highest stored id when
    /// no sequence file has been written yet.
    fn next_player_id(&self, players: &[Player]) -> Result<PlayerId, StoreError> {
        let path = self.config.sequence_path();
        if path.exists() {
            let contents = fs::read_to_string(&path)?;
            let sequence: PlayerSequence = serde_json::from_str(&contents)?;
            return Ok(sequence.next_id);
        }

        Ok(players
            .iter()
            .map(|p| p.id)
            .max()
            .map(|id| id.next())
            .unwrap_or(PlayerId::new(1)))
    }

    fn write_sequence(&self, next_id: PlayerId) -> Result<(), StoreError> {
        let path = self.config.sequence_path();
        ensure_parent(&path)?;
        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, serde_json::to_string(&PlayerSequence { next_id })?)?;
        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

impl TournamentStore for JsonlStore {
    fn clear(&self, table: Table) -> Result<(), StoreError> {
        let _session = self.session("clear")?;

        match table {
            Table::Players => {
                let matches = self.matches_reader().count()?;
                if matches > 0 {
                    return Err(StoreError::PlayersReferenced { matches });
                }
                JsonlWriter::<Player>::new(self.config.players_path()).write_all(&[])?;
            }
            Table::Matches => {
                JsonlWriter::<Match>::new(self.config.matches_path()).write_all(&[])?;
            }
        }

        info!("Cleared {} table", table);
        Ok(())
    }

    fn count(&self, table: Table) -> Result<usize, StoreError> {
        let _session = self.session("count")?;

        match table {
            Table::Players => self.players_reader().count(),
            Table::Matches => self.matches_reader().count(),
        }
    }

    fn insert_player(&self, name: &str) -> Result<PlayerId, StoreError> {
        let _session = self.session("insert_player")?;

        let players = self.players_reader().read_all()?;
        let id = self.next_player_id(&players)?;

        // Sequence advances first; a failed append burns the id.
        self.write_sequence(id.next())?;
        JsonlWriter::new(self.config.players_path()).append(&Player::new(id, name))?;

        info!("Registered player {} ({})", id, name);
        Ok(id)
    }

    fn insert_match(&self, record: Match) -> Result<(), StoreError> {
        let _session = self.session("insert_match")?;

        let players = self.players_reader().read_all()?;
        check_match(&record, &players)?;
        JsonlWriter::new(self.config.matches_path()).append(&record)?;

        info!(
            "Recorded match: {} beat {}",
            record.winner,
            record.loser()
        );
        Ok(())
    }

    fn players(&self) -> Result<Vec<Player>, StoreError> {
        let _session = self.session("players")?;
        self.players_reader().read_all()
    }

    fn matches(&self) -> Result<Vec<Match>, StoreError> {
        let _session = self.session("matches")?;
        self.matches_reader().read_all()
    }

    fn snapshot(&self) -> Result<Snapshot, StoreError> {
        let _session = self.session("snapshot")?;
        Ok(Snapshot {
            players: self.players_reader().read_all()?,
            matches: self.matches_reader().read_all()?,
        })
    }
}
