//! JSON tournament configuration

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::{DesignGame, PayoffMatrix};
use crate::player::PlayerSpec;
use crate::tournament::{Replication, Tournament};

/// Everything needed to build a [`Tournament`]
///
/// ```json
/// {
///   "players": [{"Null": {}}, {"RiskDominance": {"name": "RD_neutral", "risk_aversion": 0.0}}],
///   "games": [[[[3, 0], [5, 1]]]],
///   "replication": {"Geometric": {"end_probability": 0.1}},
///   "seed": 7
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TournamentConfig {
    pub players: Vec<PlayerSpec>,
    /// Each game is a list of designs
    pub games: Vec<Vec<PayoffMatrix>>,
    #[serde(default)]
    pub replication: Replication,
    #[serde(default)]
    pub seed: u64,
}

impl TournamentConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: TournamentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.replication.validate()?;
        if let Some(game) = self.games.iter().position(|designs| designs.is_empty()) {
            return Err(ConfigError::EmptyDesigns { game });
        }
        self.players.iter().try_for_each(|p| p.validate())
    }

    pub fn into_tournament(self) -> Result<Tournament, ConfigError> {
        let games = self.games.into_iter().map(DesignGame::new).collect();
        Tournament::from_specs(self.players, games, self.replication, self.seed)
    }
}
