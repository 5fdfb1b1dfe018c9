//! Derived standings models.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// One player's row in the standings. Derived on demand, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingEntry {
    pub id: PlayerId,
    pub name: String,

    /// Matches this player won
    pub wins: u32,

    /// Matches this player took part in
    pub matches: u32,
}

/// Direction in which standings are sorted by wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StandingsOrder {
    /// Most wins first: index 0 is first place.
    #[default]
    Descending,

    /// Fewest wins first.
    Ascending,
}

impl std::fmt::Display for StandingsOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandingsOrder::Descending => write!(f, "descending"),
            StandingsOrder::Ascending => write!(f, "ascending"),
        }
    }
}

impl std::str::FromStr for StandingsOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "desc" | "descending" => Ok(StandingsOrder::Descending),
            "asc" | "ascending" => Ok(StandingsOrder::Ascending),
            other => Err(format!(
                "unknown standings order '{}': expected 'asc' or 'desc'",
                other
            )),
        }
    }
}
