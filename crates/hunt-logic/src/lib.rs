//! Hunt Logic
//!
//! Core engine for design hunt tournaments. Two players each pick an
//! upper-level strategy (work independently or collaborate) together with
//! a lower-level design that fixes their private payoffs, and a round-robin
//! tournament aggregates the outcomes of repeated plays.
//! This crate is compiled to:
//! - Native (for simulations and analysis)
//! - WASM (for running tournaments in the browser)

mod config;
mod error;
mod expected_utility;
mod game;
mod pairing;
mod player;
mod random;
mod risk_dominance;
mod tournament;
mod utility;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::TournamentConfig;
pub use error::{ConfigError, HuntError};
pub use expected_utility::ExpectedUtilityPlayer;
pub use game::{Decision, DesignGame, PayoffMatrix, PlayResult};
pub use pairing::{generate_all_pairings, match_count, match_index, pairing_for_match};
pub use player::{
    FnFactory, MirrorPlayer, NullPlayer, Player, PlayerFactory, PlayerSpec, RandomPlayer,
};
pub use random::SeededRng;
pub use risk_dominance::RiskDominancePlayer;
pub use tournament::{
    ErrorRecord, GameRecord, MatchRecord, ReplicateRecord, Replication, ScoreRecord, SideRecord,
    Tournament, TournamentReport,
};
pub use utility::{argmax, cara_utility, nan_argmax, nan_min};

/// Strategy index for working alone
pub const INDEPENDENT: u8 = 0;

/// Strategy index for collaborating
pub const COLLABORATIVE: u8 = 1;
