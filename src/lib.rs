//! # Swiss Tournament
//!
//! Tracks players and match results for a Swiss-system tournament and pairs
//! players for the next round.
//!
//! ## Architecture
//!
//! - **models**: Players, match records, standings entries, pairings
//! - **storage**: Record store boundary with JSONL and in-memory stores
//! - **calculate**: Standings aggregation and adjacent pairing
//! - **tournament**: Operations facade over a store
//! - **api**: REST API endpoints
//! - **config**: Configuration loading and validation

pub mod api;
pub mod calculate;
pub mod config;
pub mod models;
pub mod storage;
pub mod tournament;

pub use models::*;
pub use tournament::{Tournament, TournamentError};
