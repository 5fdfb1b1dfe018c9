//! Registered tournament players.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A registered player. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Store-assigned identifier
    pub id: PlayerId,

    /// Full name as registered (need not be unique)
    pub name: String,

    /// When this player was registered
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            registered_at: Utc::now(),
        }
    }
}
