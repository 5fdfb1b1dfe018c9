//! Pairing model: two players matched up for the next round.

use serde::{Deserialize, Serialize};

use super::{PlayerId, StandingEntry};

/// Two players adjacent in the standings, paired for the next round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id1: PlayerId,
    pub name1: String,
    pub id2: PlayerId,
    pub name2: String,
}

impl Pairing {
    /// Pair two standings entries, keeping their standings order.
    pub fn new(first: &StandingEntry, second: &StandingEntry) -> Self {
        Self {
            id1: first.id,
            name1: first.name.clone(),
            id2: second.id,
            name2: second.name.clone(),
        }
    }

    /// Both player ids, in standings order.
    pub fn ids(&self) -> [PlayerId; 2] {
        [self.id1, self.id2]
    }
}
