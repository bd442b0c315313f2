//! Payoff model and round execution

use serde::{Deserialize, Serialize};

use crate::error::HuntError;
use crate::player::Player;
use crate::{COLLABORATIVE, INDEPENDENT};

/// 2x2 payoff table indexed by `[own strategy][opponent strategy]`
pub type PayoffMatrix = [[f64; 2]; 2];

/// An upper-level strategy paired with a lower-level design
///
/// Fields are unchecked so that a misbehaving player can be reported;
/// [`DesignGame::is_valid`] decides whether a decision is playable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decision {
    pub strategy: u8,
    pub design: usize,
}

impl Decision {
    pub fn new(strategy: u8, design: usize) -> Self {
        Self { strategy, design }
    }

    pub fn independent(design: usize) -> Self {
        Self::new(INDEPENDENT, design)
    }

    pub fn collaborative(design: usize) -> Self {
        Self::new(COLLABORATIVE, design)
    }

    pub fn is_collaborative(&self) -> bool {
        self.strategy == COLLABORATIVE
    }
}

/// Outcome of one play, seen from the focal player
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayResult {
    pub my_decision: Decision,
    pub my_payoff: f64,
    pub their_decision: Decision,
    pub their_payoff: f64,
}

impl PlayResult {
    /// Same play from the other player's side
    pub fn swapped(&self) -> Self {
        Self {
            my_decision: self.their_decision,
            my_payoff: self.their_payoff,
            their_decision: self.my_decision,
            their_payoff: self.my_payoff,
        }
    }
}

/// Symmetric two-player game over a list of alternative designs.
///
/// A player's payoff depends on its own design and strategy and on the
/// opponent's strategy only. The opponent's design never enters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DesignGame {
    designs: Vec<PayoffMatrix>,
}

impl Default for DesignGame {
    /// A single design paying zero in every cell
    fn default() -> Self {
        Self {
            designs: vec![[[0.0; 2]; 2]],
        }
    }
}

impl DesignGame {
    pub fn new(designs: Vec<PayoffMatrix>) -> Self {
        Self { designs }
    }

    pub fn designs(&self) -> &[PayoffMatrix] {
        &self.designs
    }

    pub fn num_designs(&self) -> usize {
        self.designs.len()
    }

    /// Whether `decision` names a known strategy and an existing design
    pub fn is_valid(&self, decision: &Decision) -> bool {
        decision.strategy <= COLLABORATIVE && decision.design < self.designs.len()
    }

    /// Focal player's payoff for a pair of decisions
    ///
    /// # Panics
    /// If `mine` or `theirs` is not valid for this game.
    pub fn get_payoff(&self, mine: &Decision, theirs: &Decision) -> f64 {
        self.designs[mine.design][mine.strategy as usize][theirs.strategy as usize]
    }

    /// Payoff for playing `strategy` with `design` against an opponent
    /// playing `their_strategy`
    pub(crate) fn payoff_for(&self, strategy: u8, design: usize, their_strategy: u8) -> f64 {
        self.get_payoff(&Decision::new(strategy, design), &Decision::new(their_strategy, 0))
    }

    /// Play one round between two players.
    ///
    /// Both decisions are collected and validated before anything is scored.
    /// On success each player receives its own view of the result, and the
    /// result from `player_1`'s side is returned.
    pub fn play(
        &self,
        player_1: &mut dyn Player,
        player_2: &mut dyn Player,
    ) -> Result<PlayResult, HuntError> {
        let decision_1 = player_1.decide()?;
        if !self.is_valid(&decision_1) {
            return Err(HuntError::InvalidDecision {
                player: player_1.name().to_string(),
                decision: decision_1,
            });
        }
        let decision_2 = player_2.decide()?;
        if !self.is_valid(&decision_2) {
            return Err(HuntError::InvalidDecision {
                player: player_2.name().to_string(),
                decision: decision_2,
            });
        }

        let result = PlayResult {
            my_decision: decision_1,
            my_payoff: self.get_payoff(&decision_1, &decision_2),
            their_decision: decision_2,
            their_payoff: self.get_payoff(&decision_2, &decision_1),
        };

        player_1.report_result(&result)?;
        player_2.report_result(&result.swapped())?;

        Ok(result)
    }
}
