//! Round-robin tournament execution
//!
//! Every unordered pair of players, including each player with itself,
//! plays every game. A game is replicated a fixed or geometrically drawn
//! number of times. Scores are averaged replicate → game → match and then
//! accumulated per display name.

use std::collections::BTreeMap;

use log::{debug, info, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, HuntError};
use crate::game::DesignGame;
use crate::pairing::{generate_all_pairings, match_count};
use crate::player::{PlayerFactory, PlayerSpec};
use crate::random::SeededRng;

/// How many replicates each game runs for
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum Replication {
    /// Exactly `reps` replicates per game
    Fixed { reps: usize },
    /// Draw from a geometric distribution: after each replicate the game
    /// ends with `end_probability`. Always at least one replicate.
    Geometric { end_probability: f64 },
}

impl Replication {
    pub fn fixed(reps: usize) -> Self {
        Replication::Fixed { reps }
    }

    pub fn geometric(end_probability: f64) -> Self {
        Replication::Geometric { end_probability }
    }

    /// Geometric replication where each replicate is followed by another
    /// with probability `continuation`
    pub fn continuation(continuation: f64) -> Self {
        Replication::Geometric { end_probability: 1.0 - continuation }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            Replication::Fixed { .. } => Ok(()),
            Replication::Geometric { end_probability: p } => {
                if p > 0.0 && p <= 1.0 {
                    Ok(())
                } else {
                    Err(ConfigError::InvalidEndProbability(p))
                }
            }
        }
    }

    /// Replicate count for one game. Only geometric replication consumes
    /// the stream.
    fn draw(&self, rng: &mut SeededRng) -> usize {
        match *self {
            Replication::Fixed { reps } => reps,
            Replication::Geometric { end_probability } => rng.next_geometric(end_probability),
        }
    }

    /// Mean replicates per game
    pub fn expected_reps(&self) -> f64 {
        match *self {
            Replication::Fixed { reps } => reps as f64,
            Replication::Geometric { end_probability } => 1.0 / end_probability,
        }
    }
}

impl Default for Replication {
    fn default() -> Self {
        Replication::Fixed { reps: 1 }
    }
}

/// One side of a successful replicate
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SideRecord {
    pub name: String,
    pub design: usize,
    pub strategy: u8,
    pub payoff: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReplicateRecord {
    pub match_index: usize,
    pub game: usize,
    pub rep: usize,
    pub player_1: SideRecord,
    pub player_2: SideRecord,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub name: String,
    pub score: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub match_index: usize,
    pub game: usize,
    pub reps: usize,
    pub players: [ScoreRecord; 2],
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub match_index: usize,
    pub players: [ScoreRecord; 2],
}

/// A replicate that was skipped
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ErrorRecord {
    InvalidDecision {
        match_index: usize,
        game: usize,
        rep: usize,
        player: String,
        design: usize,
        strategy: u8,
        error: String,
    },
    Failure {
        match_index: usize,
        game: usize,
        rep: usize,
        player_1: String,
        player_2: String,
        error: String,
    },
}

impl ErrorRecord {
    pub fn game(&self) -> usize {
        match self {
            ErrorRecord::InvalidDecision { game, .. } | ErrorRecord::Failure { game, .. } => *game,
        }
    }

    pub fn rep(&self) -> usize {
        match self {
            ErrorRecord::InvalidDecision { rep, .. } | ErrorRecord::Failure { rep, .. } => *rep,
        }
    }
}

/// Final scores together with every log collected during a run
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TournamentReport {
    pub results: BTreeMap<String, f64>,
    pub rep_results: Vec<ReplicateRecord>,
    pub game_results: Vec<GameRecord>,
    pub match_results: Vec<MatchRecord>,
    pub error_results: Vec<ErrorRecord>,
}

pub struct Tournament {
    players: Vec<Box<dyn PlayerFactory>>,
    games: Vec<DesignGame>,
    replication: Replication,
    seed: u64,
    rep_results: Vec<ReplicateRecord>,
    game_results: Vec<GameRecord>,
    match_results: Vec<MatchRecord>,
    error_results: Vec<ErrorRecord>,
    results: BTreeMap<String, f64>,
}

impl Tournament {
    /// Create a tournament over arbitrary player factories.
    ///
    /// `seed` drives the geometric replicate draws; it is replayed from the
    /// start on every [`run`](Self::run).
    pub fn new(
        players: Vec<Box<dyn PlayerFactory>>,
        games: Vec<DesignGame>,
        replication: Replication,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        replication.validate()?;
        for (game, g) in games.iter().enumerate() {
            if g.num_designs() == 0 {
                return Err(ConfigError::EmptyDesigns { game });
            }
        }
        for player in &players {
            player.validate()?;
        }

        Ok(Self {
            players,
            games,
            replication,
            seed,
            rep_results: Vec::new(),
            game_results: Vec::new(),
            match_results: Vec::new(),
            error_results: Vec::new(),
            results: BTreeMap::new(),
        })
    }

    /// Create a tournament from player recipes
    pub fn from_specs(
        players: Vec<PlayerSpec>,
        games: Vec<DesignGame>,
        replication: Replication,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        let players = players
            .into_iter()
            .map(|p| Box::new(p) as Box<dyn PlayerFactory>)
            .collect();
        Self::new(players, games, replication, seed)
    }

    pub fn games(&self) -> &[DesignGame] {
        &self.games
    }

    pub fn replication(&self) -> Replication {
        self.replication
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn rep_results(&self) -> &[ReplicateRecord] {
        &self.rep_results
    }

    pub fn game_results(&self) -> &[GameRecord] {
        &self.game_results
    }

    pub fn match_results(&self) -> &[MatchRecord] {
        &self.match_results
    }

    pub fn error_results(&self) -> &[ErrorRecord] {
        &self.error_results
    }

    pub fn results(&self) -> &BTreeMap<String, f64> {
        &self.results
    }

    /// Snapshot of the latest run
    pub fn report(&self) -> TournamentReport {
        TournamentReport {
            results: self.results.clone(),
            rep_results: self.rep_results.clone(),
            game_results: self.game_results.clone(),
            match_results: self.match_results.clone(),
            error_results: self.error_results.clone(),
        }
    }

    /// Run the full round robin and return the score for each name.
    ///
    /// Previous logs and results are discarded. Failed replicates are
    /// logged and skipped; the run itself never fails.
    ///
    /// Scores are keyed by display name. A match whose two sides share a name
    /// counts at half weight, and players that share a name land in one
    /// bucket, so N null players all named alike score `3(N+1)/2` on
    /// `[[3,0],[5,1]]` rather than 3.
    pub fn run(&mut self) -> BTreeMap<String, f64> {
        self.rep_results.clear();
        self.game_results.clear();
        self.match_results.clear();
        self.error_results.clear();
        self.results.clear();

        let mut rng = SeededRng::from_u64(self.seed);
        let player_count = self.players.len() as f64;
        let game_count = self.games.len() as f64;

        info!(
            "tournament: {} players, {} games, {} matches, {:?} (~{:.1} replicates per game)",
            self.players.len(),
            self.games.len(),
            match_count(self.players.len()),
            self.replication,
            self.replication.expected_reps()
        );

        let pairings = generate_all_pairings(self.players.len());
        for (match_index, (a, b)) in pairings.into_iter().enumerate() {
            let mut names = [
                self.players[a].name().to_string(),
                self.players[b].name().to_string(),
            ];
            let mut match_scores = [0.0f64; 2];

            for game_index in 0..self.games.len() {
                let (game_names, game_scores) =
                    self.play_game(match_index, game_index, (a, b), &mut rng);
                names = game_names;
                match_scores[0] += game_scores[0] / game_count;
                match_scores[1] += game_scores[1] / game_count;
            }

            debug!(
                "match {}: {} {:.4} vs {} {:.4}",
                match_index, names[0], match_scores[0], names[1], match_scores[1]
            );
            self.match_results.push(MatchRecord {
                match_index,
                players: [
                    ScoreRecord { name: names[0].clone(), score: match_scores[0] },
                    ScoreRecord { name: names[1].clone(), score: match_scores[1] },
                ],
            });

            // A name meeting itself fills both roles of a single entry
            let weight = if names[0] == names[1] { 0.5 } else { 1.0 };
            for (name, score) in names.into_iter().zip(match_scores) {
                *self.results.entry(name).or_insert(0.0) += score * weight / player_count;
            }
        }

        info!(
            "tournament finished: {} replicates, {} errors",
            self.rep_results.len(),
            self.error_results.len()
        );

        self.results.clone()
    }

    /// Play all replicates of one game for one pairing.
    ///
    /// Returns the instantiated players' names and their mean payoffs over
    /// the drawn replicate count.
    fn play_game(
        &mut self,
        match_index: usize,
        game_index: usize,
        (a, b): (usize, usize),
        rng: &mut SeededRng,
    ) -> ([String; 2], [f64; 2]) {
        let game = self.games[game_index].clone();
        let mut player_1 = self.players[a].build(game.clone());
        let mut player_2 = self.players[b].build(game.clone());
        let names = [player_1.name().to_string(), player_2.name().to_string()];

        let reps = self.replication.draw(rng);
        debug!(
            "match {} game {}: {} vs {} for {} replicates",
            match_index, game_index, names[0], names[1], reps
        );

        let mut scores = [0.0f64; 2];
        for rep in 0..reps {
            match game.play(player_1.as_mut(), player_2.as_mut()) {
                Ok(result) => {
                    trace!(
                        "match {} game {} rep {}: {:?} -> {}, {:?} -> {}",
                        match_index,
                        game_index,
                        rep,
                        result.my_decision,
                        result.my_payoff,
                        result.their_decision,
                        result.their_payoff
                    );
                    self.rep_results.push(ReplicateRecord {
                        match_index,
                        game: game_index,
                        rep,
                        player_1: SideRecord {
                            name: names[0].clone(),
                            design: result.my_decision.design,
                            strategy: result.my_decision.strategy,
                            payoff: result.my_payoff,
                        },
                        player_2: SideRecord {
                            name: names[1].clone(),
                            design: result.their_decision.design,
                            strategy: result.their_decision.strategy,
                            payoff: result.their_payoff,
                        },
                    });
                    scores[0] += result.my_payoff / reps as f64;
                    scores[1] += result.their_payoff / reps as f64;
                }
                Err(err) => {
                    warn!("match {} game {} rep {}: {}", match_index, game_index, rep, err);
                    let error = err.to_string();
                    self.error_results.push(match err {
                        HuntError::InvalidDecision { player, decision } => {
                            ErrorRecord::InvalidDecision {
                                match_index,
                                game: game_index,
                                rep,
                                player,
                                design: decision.design,
                                strategy: decision.strategy,
                                error,
                            }
                        }
                        HuntError::Failure { .. } => ErrorRecord::Failure {
                            match_index,
                            game: game_index,
                            rep,
                            player_1: names[0].clone(),
                            player_2: names[1].clone(),
                            error,
                        },
                    });
                }
            }
        }

        self.game_results.push(GameRecord {
            match_index,
            game: game_index,
            reps,
            players: [
                ScoreRecord { name: names[0].clone(), score: scores[0] },
                ScoreRecord { name: names[1].clone(), score: scores[1] },
            ],
        });

        (names, scores)
    }
}
