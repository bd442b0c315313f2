//! Risk-dominance decision policy
//!
//! Each round the player finds its best independent design, then asks for
//! every design whether collaborating with it risk-dominates staying
//! independent. The index is the log of the ratio of deviation losses;
//! a negative value means collaboration is the risk-dominant equilibrium.
//!
//! Ratios that leave the domain of the logarithm produce NaN, which is an
//! accepted outcome: NaN indices never count as risk dominant.

use log::trace;

use crate::error::HuntError;
use crate::game::{Decision, DesignGame, PlayResult};
use crate::player::Player;
use crate::utility::{argmax, cara_utility, nan_argmax, nan_min};
use crate::{COLLABORATIVE, INDEPENDENT};

#[derive(Clone, Debug)]
pub struct RiskDominancePlayer {
    name: String,
    game: DesignGame,
    risk_aversion: f64,
    their_prior_decision: Option<Decision>,
}

impl RiskDominancePlayer {
    pub fn new(game: DesignGame, name: impl Into<String>, risk_aversion: f64) -> Self {
        Self {
            name: name.into(),
            game,
            risk_aversion,
            their_prior_decision: None,
        }
    }

    pub fn risk_aversion(&self) -> f64 {
        self.risk_aversion
    }

    /// Opponent decision remembered from the last reported result
    pub fn their_prior_decision(&self) -> Option<Decision> {
        self.their_prior_decision
    }

    fn utility(&self, value: f64) -> f64 {
        cara_utility(self.risk_aversion, value)
    }

    fn utility_of(&self, strategy: u8, design: usize, their_strategy: u8) -> f64 {
        self.utility(self.game.payoff_for(strategy, design, their_strategy))
    }

    /// `ln[(u(I,0) - u(C,0)) / (u(C,1) - u(I,1))]` for independent design
    /// `I` and collaborative design `C`
    fn log_ratio(&self, independent_design: usize, collaborative_design: usize) -> f64 {
        let loss_if_alone = self.utility_of(INDEPENDENT, independent_design, INDEPENDENT)
            - self.utility_of(COLLABORATIVE, collaborative_design, INDEPENDENT);
        let loss_if_together = self.utility_of(COLLABORATIVE, collaborative_design, COLLABORATIVE)
            - self.utility_of(INDEPENDENT, independent_design, COLLABORATIVE);
        (loss_if_alone / loss_if_together).ln()
    }

    /// Risk-dominance index of collaborating with `design`.
    ///
    /// Averages the index assuming the partner also picks `design` with the
    /// index assuming the partner repeats its last reported design (or
    /// `design` before any report).
    pub fn risk_dominance(
        &self,
        design: usize,
        independent_design: usize,
    ) -> Result<f64, HuntError> {
        let partner_design = match self.their_prior_decision {
            Some(prior) if prior.design < self.game.num_designs() => prior.design,
            Some(prior) => {
                return Err(HuntError::failure(format!(
                    "{}: remembered partner design {} is not in this game",
                    self.name, prior.design
                )))
            }
            None => design,
        };
        Ok(0.5 * self.log_ratio(independent_design, design)
            + 0.5 * self.log_ratio(independent_design, partner_design))
    }
}

impl Player for RiskDominancePlayer {
    fn name(&self) -> &str {
        &self.name
    }

    fn decide(&mut self) -> Result<Decision, HuntError> {
        let designs = 0..self.game.num_designs();

        let independent_value: Vec<f64> = designs
            .clone()
            .map(|d| self.utility_of(INDEPENDENT, d, INDEPENDENT))
            .collect();
        let independent_design = nan_argmax(&independent_value).ok_or_else(|| {
            HuntError::failure(format!("{}: no comparable independent design", self.name))
        })?;

        let risk_dominance = designs
            .clone()
            .map(|d| self.risk_dominance(d, independent_design))
            .collect::<Result<Vec<f64>, HuntError>>()?;

        // Designs that are not risk dominant are zeroed rather than removed,
        // so a lone qualifying design with negative value loses to index 0.
        let collaborative_value: Vec<f64> = designs
            .map(|d| {
                let value = self.utility_of(COLLABORATIVE, d, COLLABORATIVE);
                let mask = if risk_dominance[d] < 0.0 { 1.0 } else { 0.0 };
                value * mask
            })
            .collect();
        let collaborative_design = argmax(&collaborative_value).unwrap_or(0);

        trace!(
            "{}: independent {:?}, risk dominance {:?}, collaborative {:?}",
            self.name,
            independent_value,
            risk_dominance,
            collaborative_value
        );

        if nan_min(&risk_dominance) < 0.0 {
            Ok(Decision::collaborative(collaborative_design))
        } else {
            Ok(Decision::independent(independent_design))
        }
    }

    fn report_result(&mut self, result: &PlayResult) -> Result<(), HuntError> {
        self.their_prior_decision = Some(result.their_decision);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(player: &mut RiskDominancePlayer, theirs: Decision) {
        let result = PlayResult {
            my_decision: Decision::default(),
            my_payoff: 0.0,
            their_decision: theirs,
            their_payoff: 0.0,
        };
        player.report_result(&result).unwrap();
    }

    /// Three designs against a best independent design 0 paying 3
    fn three_design_game() -> DesignGame {
        DesignGame::new(vec![
            [[3.0, 3.0], [0.0, 4.0]],
            [[1.0, 1.0], [-1.0, 8.0]],
            [[2.0, 2.0], [0.0, 6.0]],
        ])
    }

    /// Same rule evaluated straight from raw payoffs, first round only
    fn closed_form_decision(designs: &[[[f64; 2]; 2]]) -> Decision {
        let best_independent = (0..designs.len())
            .fold(0, |best, d| if designs[d][0][0] > designs[best][0][0] { d } else { best });
        let alone = designs[best_independent][0][0];
        let together = designs[best_independent][0][1];
        let mut choice: Option<(usize, f64)> = None;
        for (d, m) in designs.iter().enumerate() {
            let ratio = (alone - m[1][0]) / (m[1][1] - together);
            if ratio > 0.0 && ratio < 1.0 && choice.map_or(true, |(_, v)| m[1][1] > v) {
                choice = Some((d, m[1][1]));
            }
        }
        match choice {
            Some((d, _)) => Decision::collaborative(d),
            None => Decision::independent(best_independent),
        }
    }

    #[test]
    fn test_stag_hunt_payoff_dominant_but_risky() {
        // Collaboration pays more but losing the partner costs more
        let game = DesignGame::new(vec![[[3.0, 3.0], [0.0, 5.0]]]);
        let mut player = RiskDominancePlayer::new(game, "rd", 0.0);
        assert_eq!(player.decide().unwrap(), Decision::independent(0));
    }

    #[test]
    fn test_stag_hunt_risk_dominant_collaboration() {
        let game = DesignGame::new(vec![[[2.0, 2.0], [0.0, 5.0]]]);
        let mut player = RiskDominancePlayer::new(game, "rd", 0.0);
        assert_eq!(player.decide().unwrap(), Decision::collaborative(0));
    }

    #[test]
    fn test_neutral_matches_closed_form() {
        let game = three_design_game();
        let mut player = RiskDominancePlayer::new(game.clone(), "rd", 0.0);
        let expected = closed_form_decision(game.designs());
        assert_eq!(expected, Decision::collaborative(1));
        assert_eq!(player.decide().unwrap(), expected);
    }

    #[test]
    fn test_neutral_index_values() {
        let player = RiskDominancePlayer::new(three_design_game(), "rd", 0.0);
        let eps = 1e-12;
        assert!((player.risk_dominance(0, 0).unwrap() - 3.0f64.ln()).abs() < eps);
        assert!((player.risk_dominance(1, 0).unwrap() - 0.8f64.ln()).abs() < eps);
        assert!(player.risk_dominance(2, 0).unwrap().abs() < eps);
    }

    #[test]
    fn test_partner_design_shifts_index() {
        let mut player = RiskDominancePlayer::new(three_design_game(), "rd", 0.0);

        // Partner last used design 2: design 1 stays risk dominant
        report(&mut player, Decision::collaborative(2));
        let expected = 0.5 * 0.8f64.ln();
        assert!((player.risk_dominance(1, 0).unwrap() - expected).abs() < 1e-12);
        assert_eq!(player.decide().unwrap(), Decision::collaborative(1));

        // Partner last used design 0: no design is risk dominant any more
        report(&mut player, Decision::independent(0));
        assert_eq!(player.their_prior_decision(), Some(Decision::independent(0)));
        assert_eq!(player.decide().unwrap(), Decision::independent(0));
    }

    #[test]
    fn test_undefined_index_is_not_risk_dominant() {
        // 0 / 0 ratio: index is NaN, player stays independent
        let game = DesignGame::new(vec![[[1.0, 1.0], [1.0, 1.0]]]);
        let mut player = RiskDominancePlayer::new(game, "rd", 0.0);
        assert!(player.risk_dominance(0, 0).unwrap().is_nan());
        assert_eq!(player.decide().unwrap(), Decision::independent(0));
    }

    #[test]
    fn test_masked_designs_compete_at_zero() {
        // Design 1 is the only risk-dominant one but its value is negative,
        // so the zeroed design 0 wins the arg-max.
        let game = DesignGame::new(vec![
            [[1.0, -10.0], [5.0, -2.0]],
            [[0.0, 0.0], [-3.0, -1.0]],
        ]);
        let mut player = RiskDominancePlayer::new(game, "rd", 0.0);
        assert!(player.risk_dominance(0, 0).unwrap().is_nan());
        assert!(player.risk_dominance(1, 0).unwrap() < 0.0);
        assert_eq!(player.decide().unwrap(), Decision::collaborative(0));
    }

    #[test]
    fn test_risk_aversion_discourages_collaboration() {
        // Marginal for a neutral player, rejected by a strongly averse one
        let game = DesignGame::new(vec![[[2.0, 2.0], [0.0, 4.5]]]);
        let mut neutral = RiskDominancePlayer::new(game.clone(), "rd", 0.0);
        let mut averse = RiskDominancePlayer::new(game, "rd", 1.0);
        assert_eq!(neutral.decide().unwrap(), Decision::collaborative(0));
        assert_eq!(averse.decide().unwrap(), Decision::independent(0));
    }

    #[test]
    fn test_foreign_partner_design_is_failure() {
        let mut player = RiskDominancePlayer::new(three_design_game(), "rd", 0.0);
        report(&mut player, Decision::collaborative(7));
        assert!(matches!(player.decide(), Err(HuntError::Failure { .. })));
    }

    #[test]
    fn test_all_nan_independent_values_is_failure() {
        let game = DesignGame::new(vec![[[f64::NAN, 0.0], [1.0, 1.0]]]);
        let mut player = RiskDominancePlayer::new(game, "rd", 0.0);
        assert!(matches!(player.decide(), Err(HuntError::Failure { .. })));
    }
}
