//! Reported match results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A single reported match between two players.
///
/// The reporting convention stores the winner as `player1` and the loser as
/// `player2`, so `winner` is always one of the two participants. Draws are
/// not modelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub player1: PlayerId,
    pub player2: PlayerId,
    pub winner: PlayerId,

    /// When the result was reported
    pub reported_at: DateTime<Utc>,
}

impl Match {
    /// Record a result with `winner` beating `loser`.
    pub fn new(winner: PlayerId, loser: PlayerId) -> Self {
        Self {
            player1: winner,
            player2: loser,
            winner,
            reported_at: Utc::now(),
        }
    }

    /// The participant who did not win.
    pub fn loser(&self) -> PlayerId {
        if self.winner == self.player1 {
            self.player2
        } else {
            self.player1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_new_orders_winner_first() {
        let m = Match::new(PlayerId::new(3), PlayerId::new(9));
        assert_eq!(m.player1, PlayerId::new(3));
        assert_eq!(m.player2, PlayerId::new(9));
        assert_eq!(m.winner, PlayerId::new(3));
        assert_eq!(m.loser(), PlayerId::new(9));
    }

    #[test]
    fn test_match_loser_when_winner_is_player2() {
        let m = Match {
            player1: PlayerId::new(1),
            player2: PlayerId::new(2),
            winner: PlayerId::new(2),
            reported_at: Utc::now(),
        };
        assert_eq!(m.loser(), PlayerId::new(1));
    }
}
