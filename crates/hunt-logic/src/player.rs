//! Player capability, baseline players, and player constructors

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HuntError};
use crate::expected_utility::ExpectedUtilityPlayer;
use crate::game::{Decision, DesignGame, PlayResult};
use crate::random::SeededRng;
use crate::risk_dominance::RiskDominancePlayer;

/// A participant in a design game
///
/// The tournament creates a fresh instance for every match and game, so
/// any memory a player keeps lives only as long as one game's replicates.
pub trait Player {
    /// Display name; tournament scores are bucketed by it
    fn name(&self) -> &str;

    /// Choose the next decision
    fn decide(&mut self) -> Result<Decision, HuntError>;

    /// Learn the outcome of the most recent play
    fn report_result(&mut self, _result: &PlayResult) -> Result<(), HuntError> {
        Ok(())
    }
}

/// Always plays `Decision(0, 0)` and ignores results
#[derive(Clone, Debug)]
pub struct NullPlayer {
    name: String,
}

impl NullPlayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for NullPlayer {
    fn default() -> Self {
        Self::new("null")
    }
}

impl Player for NullPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self) -> Result<Decision, HuntError> {
        Ok(Decision::default())
    }
}

/// Uniformly random strategy and design
fn random_decision(rng: &mut SeededRng, num_designs: usize) -> Decision {
    let strategy = rng.next_bool() as u8;
    let design = if num_designs > 1 { rng.next_range(num_designs) } else { 0 };
    Decision::new(strategy, design)
}

/// Makes an independent uniformly random decision every round
#[derive(Clone, Debug)]
pub struct RandomPlayer {
    name: String,
    game: DesignGame,
    rng: SeededRng,
}

impl RandomPlayer {
    pub fn new(game: DesignGame, name: impl Into<String>, seed: u64) -> Self {
        Self {
            name: name.into(),
            game,
            rng: SeededRng::from_u64(seed),
        }
    }
}

impl Player for RandomPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self) -> Result<Decision, HuntError> {
        Ok(random_decision(&mut self.rng, self.game.num_designs()))
    }
}

/// Opens with a random decision, then repeats the opponent's last one
#[derive(Clone, Debug)]
pub struct MirrorPlayer {
    name: String,
    next_decision: Decision,
}

impl MirrorPlayer {
    pub fn new(game: DesignGame, name: impl Into<String>, seed: u64) -> Self {
        let mut rng = SeededRng::from_u64(seed);
        Self {
            name: name.into(),
            next_decision: random_decision(&mut rng, game.num_designs()),
        }
    }
}

impl Player for MirrorPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self) -> Result<Decision, HuntError> {
        Ok(self.next_decision)
    }

    fn report_result(&mut self, result: &PlayResult) -> Result<(), HuntError> {
        self.next_decision = result.their_decision;
        Ok(())
    }
}

/// Builds fresh players for the tournament
///
/// Every match and game gets new instances, each bound to its own copy
/// of the game's payoff data.
pub trait PlayerFactory {
    /// Display name of the players this factory builds
    fn name(&self) -> &str;

    fn build(&self, game: DesignGame) -> Box<dyn Player>;

    fn validate(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Factory backed by a closure, for players outside [`PlayerSpec`]
pub struct FnFactory<F> {
    name: String,
    build: F,
}

impl<F> FnFactory<F>
where
    F: Fn(DesignGame) -> Box<dyn Player>,
{
    pub fn new(name: impl Into<String>, build: F) -> Self {
        Self { name: name.into(), build }
    }
}

impl<F> PlayerFactory for FnFactory<F>
where
    F: Fn(DesignGame) -> Box<dyn Player>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn build(&self, game: DesignGame) -> Box<dyn Player> {
        (self.build)(game)
    }
}

fn default_null_name() -> String {
    "null".to_string()
}

fn default_random_name() -> String {
    "random".to_string()
}

fn default_mirror_name() -> String {
    "mirror".to_string()
}

fn default_prior() -> f64 {
    1.0
}

/// Recipe for a player, used by the tournament to build fresh instances
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PlayerSpec {
    /// Always independent with design 0.
    Null {
        #[serde(default = "default_null_name")]
        name: String,
    },
    /// Uniformly random decisions from a seeded stream.
    Random {
        #[serde(default = "default_random_name")]
        name: String,
        #[serde(default)]
        seed: u64,
    },
    /// Echoes the opponent's previous decision.
    Mirror {
        #[serde(default = "default_mirror_name")]
        name: String,
        #[serde(default)]
        seed: u64,
    },
    /// Collaborates when collaboration is risk dominant for some design.
    RiskDominance { name: String, risk_aversion: f64 },
    /// Maximizes expected utility under a Beta belief on the opponent.
    ExpectedUtility {
        name: String,
        risk_aversion: f64,
        #[serde(default = "default_prior")]
        prior_collab: f64,
        #[serde(default = "default_prior")]
        prior_no_collab: f64,
    },
}

impl PlayerSpec {
    pub fn null() -> Self {
        PlayerSpec::Null { name: default_null_name() }
    }

    pub fn random(seed: u64) -> Self {
        PlayerSpec::Random { name: default_random_name(), seed }
    }

    pub fn mirror(seed: u64) -> Self {
        PlayerSpec::Mirror { name: default_mirror_name(), seed }
    }

    pub fn risk_dominance(name: impl Into<String>, risk_aversion: f64) -> Self {
        PlayerSpec::RiskDominance { name: name.into(), risk_aversion }
    }

    pub fn expected_utility(name: impl Into<String>, risk_aversion: f64) -> Self {
        PlayerSpec::ExpectedUtility {
            name: name.into(),
            risk_aversion,
            prior_collab: default_prior(),
            prior_no_collab: default_prior(),
        }
    }

    /// Named risk-attitude presets for both decision policies
    pub fn presets() -> Vec<PlayerSpec> {
        vec![
            Self::risk_dominance("RD_neutral", 0.0),
            Self::risk_dominance("RD_averse1", 0.1),
            Self::risk_dominance("RD_averse2", 0.2),
            Self::risk_dominance("RD_seeker1", -0.03),
            Self::risk_dominance("RD_seeker2", -0.065),
            Self::expected_utility("EU_neutral", 0.0),
            Self::expected_utility("EU_averse1", 0.2),
            Self::expected_utility("EU_averse2", 0.1),
            Self::expected_utility("EU_seeker1", -0.2),
            Self::expected_utility("EU_seeker2", -0.1),
        ]
    }

    /// Look up a preset or baseline by display name
    pub fn preset(name: &str) -> Option<PlayerSpec> {
        match name {
            "null" => Some(Self::null()),
            "random" => Some(Self::random(0)),
            "mirror" => Some(Self::mirror(0)),
            _ => Self::presets().into_iter().find(|p| p.name() == name),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlayerSpec::Null { name }
            | PlayerSpec::Random { name, .. }
            | PlayerSpec::Mirror { name, .. }
            | PlayerSpec::RiskDominance { name, .. }
            | PlayerSpec::ExpectedUtility { name, .. } => name,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            PlayerSpec::Null { .. } | PlayerSpec::Random { .. } | PlayerSpec::Mirror { .. } => {
                Ok(())
            }
            PlayerSpec::RiskDominance { name, risk_aversion } => {
                check_risk_aversion(name, *risk_aversion)
            }
            PlayerSpec::ExpectedUtility { name, risk_aversion, prior_collab, prior_no_collab } => {
                check_risk_aversion(name, *risk_aversion)?;
                let valid = |p: f64| p.is_finite() && p > 0.0;
                if !valid(*prior_collab) || !valid(*prior_no_collab) {
                    return Err(ConfigError::InvalidPrior { player: name.clone() });
                }
                Ok(())
            }
        }
    }

    /// Build a fresh player bound to its own copy of `game`
    pub fn build(&self, game: DesignGame) -> Box<dyn Player> {
        match self {
            PlayerSpec::Null { name } => Box::new(NullPlayer::new(name.clone())),
            PlayerSpec::Random { name, seed } => {
                Box::new(RandomPlayer::new(game, name.clone(), *seed))
            }
            PlayerSpec::Mirror { name, seed } => {
                Box::new(MirrorPlayer::new(game, name.clone(), *seed))
            }
            PlayerSpec::RiskDominance { name, risk_aversion } => {
                Box::new(RiskDominancePlayer::new(game, name.clone(), *risk_aversion))
            }
            PlayerSpec::ExpectedUtility { name, risk_aversion, prior_collab, prior_no_collab } => {
                Box::new(ExpectedUtilityPlayer::with_priors(
                    game,
                    name.clone(),
                    *risk_aversion,
                    *prior_collab,
                    *prior_no_collab,
                ))
            }
        }
    }

    /// Human-readable description of the policy
    pub fn describe(&self) -> String {
        let attitude = |lambda: f64| {
            if lambda > 0.0 {
                format!("risk averse (lambda = {})", lambda)
            } else if lambda < 0.0 {
                format!("risk seeking (lambda = {})", lambda)
            } else {
                "risk neutral".to_string()
            }
        };
        match self {
            PlayerSpec::Null { .. } => {
                "Always works independently with the first design.".to_string()
            }
            PlayerSpec::Random { .. } => {
                "Picks strategy and design uniformly at random.".to_string()
            }
            PlayerSpec::Mirror { .. } => {
                "Starts randomly, then repeats the opponent's previous decision.".to_string()
            }
            PlayerSpec::RiskDominance { risk_aversion, .. } => format!(
                "Collaborates when collaboration is risk dominant for some design; {}.",
                attitude(*risk_aversion)
            ),
            PlayerSpec::ExpectedUtility {
                risk_aversion,
                prior_collab,
                prior_no_collab,
                ..
            } => format!(
                "Maximizes expected utility with a Beta({}, {}) belief on collaboration; {}.",
                prior_collab,
                prior_no_collab,
                attitude(*risk_aversion)
            ),
        }
    }
}

impl PlayerFactory for PlayerSpec {
    fn name(&self) -> &str {
        PlayerSpec::name(self)
    }

    fn build(&self, game: DesignGame) -> Box<dyn Player> {
        PlayerSpec::build(self, game)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        PlayerSpec::validate(self)
    }
}

fn check_risk_aversion(name: &str, risk_aversion: f64) -> Result<(), ConfigError> {
    if risk_aversion.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteRiskAversion { player: name.to_string() })
    }
}
