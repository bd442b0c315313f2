//! Error types for play and configuration

use thiserror::Error;

use crate::game::Decision;

/// Errors raised while playing a single round.
///
/// The tournament catches both kinds at replicate granularity; neither
/// escapes [`Tournament::run`](crate::Tournament::run).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HuntError {
    /// A player returned a strategy or design outside the game's domain.
    #[error(
        "player {player} made an invalid decision (strategy {}, design {})",
        decision.strategy,
        decision.design
    )]
    InvalidDecision { player: String, decision: Decision },

    /// Any other fault while deciding, reporting, or scoring.
    #[error("{message}")]
    Failure { message: String },
}

impl HuntError {
    pub fn failure(message: impl Into<String>) -> Self {
        HuntError::Failure { message: message.into() }
    }
}

/// Errors in tournament configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("game {game} has no designs")]
    EmptyDesigns { game: usize },

    #[error("end probability {0} must be in (0, 1]")]
    InvalidEndProbability(f64),

    #[error("player {player}: prior pseudo-counts must be positive and finite")]
    InvalidPrior { player: String },

    #[error("player {player}: risk aversion must be finite")]
    NonFiniteRiskAversion { player: String },
}
