use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::bracket::Bracket;
use crate::constants::DEFAULT_TRIALS;
use crate::error::SimError;
use crate::rating::RatingTable;
use crate::win_prob::pick_winner;

/// Options for a multi-trial simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Number of independent bracket trials.
    pub trials: usize,
    /// Seed for the trial RNG stream. Unseeded runs draw from entropy and
    /// are not reproducible call-to-call.
    pub seed: Option<u64>,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl SimConfig {
    fn validate(&self) -> Result<(), SimError> {
        if self.trials == 0 {
            return Err(SimError::InvalidConfiguration(
                "trial count must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Championship win counts accumulated over a batch of trials.
///
/// Every participant of the closed set starts at zero; exactly one count is
/// added per trial, so the counts always sum to the number of trials.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    counts: HashMap<String, u64>,
    trials: u64,
}

impl Tally {
    pub fn new<I>(roster: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        Tally {
            counts: roster.into_iter().map(|team| (team.into(), 0)).collect(),
            trials: 0,
        }
    }

    /// Credit one trial's championship to `champion`.
    pub fn record(&mut self, champion: &str) {
        *self.counts.entry(champion.to_string()).or_insert(0) += 1;
        self.trials += 1;
    }

    pub fn counts(&self) -> &HashMap<String, u64> {
        &self.counts
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// Sum two partial tallies. Commutative and associative, so partial
    /// tallies from parallel workers can be merged in any order.
    pub fn merge(mut self, other: Tally) -> Tally {
        for (team, count) in other.counts {
            *self.counts.entry(team).or_insert(0) += count;
        }
        self.trials += other.trials;
        self
    }

    /// Championship probabilities sorted descending, name as tie-break.
    pub fn probabilities(&self) -> Vec<(String, f64)> {
        let total = self.trials as f64;
        let mut probs: Vec<(String, f64)> = self
            .counts
            .iter()
            .map(|(team, &count)| (team.clone(), if total > 0.0 { count as f64 / total } else { 0.0 }))
            .collect();
        probs.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap().then_with(|| a.0.cmp(&b.0)));
        probs
    }

    /// Final report for display collaborators. `None` until at least one
    /// trial has been recorded.
    pub fn to_prediction(&self) -> Option<Prediction> {
        if self.trials == 0 {
            return None;
        }
        let standings: Vec<TeamProbability> = self
            .probabilities()
            .into_iter()
            .map(|(team, probability)| TeamProbability { team, probability })
            .collect();
        let champion = standings.first()?.team.clone();
        Some(Prediction {
            trials: self.trials,
            standings,
            champion,
        })
    }
}

/// One line of the ranked championship table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamProbability {
    pub team: String,
    pub probability: f64,
}

/// Ranked championship probabilities plus the single most likely champion.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub trials: u64,
    pub standings: Vec<TeamProbability>,
    pub champion: String,
}

/// A validated bracket plus ratings, ready to simulate.
///
/// Construction checks the bracket shape and that every bracket participant
/// has a rating; after that, trials cannot fail and rating lookups index
/// directly.
#[derive(Clone, Debug)]
pub struct TournamentSim {
    bracket: Bracket,
    ratings: RatingTable,
}

impl TournamentSim {
    pub fn new(bracket: Bracket, ratings: RatingTable) -> Result<Self, SimError> {
        for team in bracket.participants() {
            if !ratings.contains_key(team) {
                return Err(SimError::UnknownParticipant(team.to_string()));
            }
        }
        Ok(TournamentSim { bracket, ratings })
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn ratings(&self) -> &RatingTable {
        &self.ratings
    }

    /// Play the whole bracket once and return the champion.
    ///
    /// Rounds resolve in order and matchups within a round in index order,
    /// one RNG draw per matchup, so a seeded RNG reproduces the trial.
    pub fn run_trial<R: Rng>(&self, rng: &mut R) -> &str {
        let mut winners: Vec<&str> = Vec::with_capacity(self.bracket.entry_pairs().len());
        for (a, b) in self.bracket.entry_pairs() {
            winners.push(pick_winner(a, self.ratings[a.as_str()], b, self.ratings[b.as_str()], rng));
        }

        for waiting in self.bracket.waiting_rounds() {
            winners = winners
                .iter()
                .zip(waiting)
                .map(|(&winner, team)| {
                    pick_winner(winner, self.ratings[winner], team, self.ratings[team.as_str()], rng)
                })
                .collect();
        }

        while winners.len() > 1 {
            winners = winners
                .chunks(2)
                .map(|pair| pick_winner(pair[0], self.ratings[pair[0]], pair[1], self.ratings[pair[1]], rng))
                .collect();
        }

        winners[0]
    }

    /// Run `config.trials` independent trials on a single long-lived RNG
    /// stream advanced monotonically across trials.
    pub fn run_many(&self, config: &SimConfig) -> Result<Tally, SimError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let mut tally = Tally::new(self.bracket.participants());
        for _ in 0..config.trials {
            let champion = self.run_trial(&mut rng);
            tally.record(champion);
        }
        Ok(tally)
    }

    /// Parallel form of [`run_many`](Self::run_many): trials fan out over the
    /// rayon pool, each on its own counter-keyed ChaCha stream, and the
    /// partial tallies merge by summation. A given seed produces the same
    /// tally regardless of worker count (though not the same tally as the
    /// sequential form, which consumes one continuous stream).
    pub fn run_many_parallel(&self, config: &SimConfig) -> Result<Tally, SimError> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(rand::random);
        let tally = (0..config.trials as u64)
            .into_par_iter()
            .fold(
                || Tally::new(self.bracket.participants()),
                |mut tally, trial| {
                    let mut rng = ChaCha8Rng::seed_from_u64(seed);
                    rng.set_stream(trial);
                    let champion = self.run_trial(&mut rng);
                    tally.record(champion);
                    tally
                },
            )
            .reduce(|| Tally::new(self.bracket.participants()), Tally::merge);
        Ok(tally)
    }
}
