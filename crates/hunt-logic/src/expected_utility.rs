//! Expected-utility decision policy with a Beta-Bernoulli belief about
//! the opponent's propensity to collaborate.

use log::trace;

use crate::error::HuntError;
use crate::game::{Decision, DesignGame, PlayResult};
use crate::player::Player;
use crate::utility::{argmax, cara_utility, nan_argmax};
use crate::{COLLABORATIVE, INDEPENDENT};

#[derive(Clone, Debug)]
pub struct ExpectedUtilityPlayer {
    name: String,
    game: DesignGame,
    risk_aversion: f64,
    /// Beta pseudo-counts indexed by opponent strategy: `[no collab, collab]`
    strategy_prior: [f64; 2],
}

impl ExpectedUtilityPlayer {
    /// Player with a uniform Beta(1, 1) prior
    pub fn new(game: DesignGame, name: impl Into<String>, risk_aversion: f64) -> Self {
        Self::with_priors(game, name, risk_aversion, 1.0, 1.0)
    }

    pub fn with_priors(
        game: DesignGame,
        name: impl Into<String>,
        risk_aversion: f64,
        prior_collab: f64,
        prior_no_collab: f64,
    ) -> Self {
        Self {
            name: name.into(),
            game,
            risk_aversion,
            strategy_prior: [prior_no_collab, prior_collab],
        }
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Posterior mean probability that the opponent collaborates
    pub fn p_collab(&self) -> f64 {
        let [no_collab, collab] = self.strategy_prior;
        collab / (collab + no_collab)
    }

    fn expected_utility(&self, strategy: u8, design: usize, p_collab: f64) -> f64 {
        let u = |their_strategy| {
            cara_utility(self.risk_aversion, self.game.payoff_for(strategy, design, their_strategy))
        };
        u(COLLABORATIVE) * p_collab + u(INDEPENDENT) * (1.0 - p_collab)
    }
}

impl Player for ExpectedUtilityPlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self) -> Result<Decision, HuntError> {
        let p_collab = self.p_collab();
        let designs = 0..self.game.num_designs();

        let independent_value: Vec<f64> = designs
            .clone()
            .map(|d| self.expected_utility(INDEPENDENT, d, p_collab))
            .collect();
        let independent_design = nan_argmax(&independent_value).ok_or_else(|| {
            HuntError::failure(format!("{}: no comparable independent design", self.name))
        })?;
        let best_independent = independent_value[independent_design];

        // Plain arg-max here: a NaN collaborative value wins the selection
        let collaborative_value: Vec<f64> = designs
            .map(|d| self.expected_utility(COLLABORATIVE, d, p_collab))
            .collect();
        let collaborative_design = argmax(&collaborative_value).unwrap_or(0);

        trace!(
            "{}: p_collab {:.4}, independent {:?}, collaborative {:?}",
            self.name,
            p_collab,
            independent_value,
            collaborative_value
        );

        if collaborative_value.iter().all(|v| *v < best_independent) {
            Ok(Decision::independent(independent_design))
        } else {
            Ok(Decision::collaborative(collaborative_design))
        }
    }

    fn report_result(&mut self, result: &PlayResult) -> Result<(), HuntError> {
        let strategy = result.their_decision.strategy;
        match self.strategy_prior.get_mut(strategy as usize) {
            Some(count) => {
                *count += 1.0;
                Ok(())
            }
            None => Err(HuntError::failure(format!(
                "{}: opponent reported unknown strategy {}",
                self.name, strategy
            ))),
        }
    }
}
