use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SimError;
use crate::rating::RatingTable;
use crate::win_prob::pick_winner;

/// Shape of a single-elimination bracket.
///
/// Round 0 is a list of explicit matchups. Each subsequent "waiting" round
/// holds teams that join the bracket there: the winner of matchup `i` in the
/// previous round faces `waiting_rounds[r][i]`. After the last waiting round
/// the remaining winners are paired off (adjacent indices) until a single
/// champion remains.
///
/// The 2025 SEC tournament instance is 4 entry pairs, two waiting rounds of
/// 4 teams each, then semifinals and a final — 16 teams, 15 games.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    entry_pairs: Vec<(String, String)>,
    waiting_rounds: Vec<Vec<String>>,
}

impl Bracket {
    /// Build and validate a bracket shape.
    ///
    /// Rejected shapes: no entry matchups, an entry-round size that is not a
    /// power of two (the knockout phase could not pair off evenly), a waiting
    /// round whose size differs from the advancing-winner count, and any
    /// participant appearing twice.
    pub fn new(
        entry_pairs: Vec<(String, String)>,
        waiting_rounds: Vec<Vec<String>>,
    ) -> Result<Self, SimError> {
        if entry_pairs.is_empty() {
            return Err(SimError::InvalidConfiguration(
                "bracket has no entry matchups".to_string(),
            ));
        }
        if !entry_pairs.len().is_power_of_two() {
            return Err(SimError::InvalidConfiguration(format!(
                "entry round has {} matchups, expected a power of two",
                entry_pairs.len()
            )));
        }
        for (round, waiting) in waiting_rounds.iter().enumerate() {
            if waiting.len() != entry_pairs.len() {
                return Err(SimError::InvalidConfiguration(format!(
                    "waiting round {} has {} teams for {} advancing winners",
                    round + 1,
                    waiting.len(),
                    entry_pairs.len()
                )));
            }
        }

        let bracket = Bracket {
            entry_pairs,
            waiting_rounds,
        };
        let mut seen = HashSet::new();
        for team in bracket.participants() {
            if !seen.insert(team) {
                return Err(SimError::InvalidConfiguration(format!(
                    "participant `{team}` appears more than once"
                )));
            }
        }
        Ok(bracket)
    }

    pub fn entry_pairs(&self) -> &[(String, String)] {
        &self.entry_pairs
    }

    pub fn waiting_rounds(&self) -> &[Vec<String>] {
        &self.waiting_rounds
    }

    /// Every participant, in bracket order.
    pub fn participants(&self) -> Vec<&str> {
        let mut teams = Vec::new();
        for (a, b) in &self.entry_pairs {
            teams.push(a.as_str());
            teams.push(b.as_str());
        }
        for waiting in &self.waiting_rounds {
            for team in waiting {
                teams.push(team.as_str());
            }
        }
        teams
    }

    /// Number of games per round, entry round first.
    pub fn round_sizes(&self) -> Vec<usize> {
        let pairs = self.entry_pairs.len();
        let mut sizes = vec![pairs; 1 + self.waiting_rounds.len()];
        let mut remaining = pairs / 2;
        while remaining >= 1 {
            sizes.push(remaining);
            remaining /= 2;
        }
        sizes
    }

    /// Total games played from entry round to champion.
    pub fn game_count(&self) -> usize {
        self.round_sizes().iter().sum()
    }
}

/// Which slot of a matchup a propagated winner fills.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    A,
    B,
}

/// One matchup in a partially-played bracket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub round: usize,
    pub team_a: Option<String>,
    pub team_b: Option<String>,
    pub winner: Option<String>,
    /// Where this game's winner advances to, if it is not the final.
    feeds: Option<(usize, Slot)>,
}

impl Game {
    fn is_ready(&self) -> bool {
        self.winner.is_none() && self.team_a.is_some() && self.team_b.is_some()
    }
}

/// A bracket in progress: every game with its known participants, recorded
/// winners, and an explicit propagation table.
///
/// This is the resume form used when real-world results arrive one round at
/// a time: record what actually happened with [`BracketState::record_winner`],
/// then let [`BracketState::advance_round`] simulate whatever is currently
/// resolvable. The whole state is serializable so callers can persist it
/// between rounds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BracketState {
    games: Vec<Game>,
}

impl BracketState {
    /// Expand a bracket shape into its per-game state.
    ///
    /// The propagation table is derived from the round sizes: a next round of
    /// equal size is a waiting round (winner takes slot A against the waiting
    /// team), a next round of half size pairs adjacent winners.
    pub fn from_bracket(bracket: &Bracket) -> Self {
        let sizes = bracket.round_sizes();
        let offsets: Vec<usize> = sizes
            .iter()
            .scan(0, |acc, size| {
                let offset = *acc;
                *acc += size;
                Some(offset)
            })
            .collect();

        let feeds_for = |round: usize, index: usize| -> Option<(usize, Slot)> {
            let next = round + 1;
            if next >= sizes.len() {
                return None;
            }
            if sizes[next] == sizes[round] {
                Some((offsets[next] + index, Slot::A))
            } else {
                let slot = if index % 2 == 0 { Slot::A } else { Slot::B };
                Some((offsets[next] + index / 2, slot))
            }
        };

        let mut games = Vec::with_capacity(bracket.game_count());
        for (i, (a, b)) in bracket.entry_pairs().iter().enumerate() {
            games.push(Game {
                round: 0,
                team_a: Some(a.clone()),
                team_b: Some(b.clone()),
                winner: None,
                feeds: feeds_for(0, i),
            });
        }
        for (w, waiting) in bracket.waiting_rounds().iter().enumerate() {
            let round = w + 1;
            for (i, team) in waiting.iter().enumerate() {
                games.push(Game {
                    round,
                    team_a: None,
                    team_b: Some(team.clone()),
                    winner: None,
                    feeds: feeds_for(round, i),
                });
            }
        }
        for (round, &size) in sizes
            .iter()
            .enumerate()
            .skip(1 + bracket.waiting_rounds().len())
        {
            for i in 0..size {
                games.push(Game {
                    round,
                    team_a: None,
                    team_b: None,
                    winner: None,
                    feeds: feeds_for(round, i),
                });
            }
        }

        BracketState { games }
    }

    pub fn games(&self) -> &[Game] {
        &self.games
    }

    /// Resolve every matchup whose participants are both known and whose
    /// winner has not been recorded yet. Matchups made resolvable by this
    /// call's own propagation are left for the next call, so repeated calls
    /// walk the bracket one round at a time. Returns the number of games
    /// resolved; zero when nothing was resolvable (safe to re-invoke).
    pub fn advance_round<R: Rng>(
        &mut self,
        ratings: &RatingTable,
        rng: &mut R,
    ) -> Result<usize, SimError> {
        let ready: Vec<usize> = (0..self.games.len())
            .filter(|&i| self.games[i].is_ready())
            .collect();

        // Validate every lookup before consuming any randomness, so a bad
        // ratings table cannot leave the state half-advanced.
        for &idx in &ready {
            for team in [&self.games[idx].team_a, &self.games[idx].team_b] {
                let name = team.as_deref().unwrap_or_default();
                if !ratings.contains_key(name) {
                    return Err(SimError::UnknownParticipant(name.to_string()));
                }
            }
        }

        for &idx in &ready {
            let a = self.games[idx].team_a.clone().unwrap_or_default();
            let b = self.games[idx].team_b.clone().unwrap_or_default();
            let winner = pick_winner(&a, ratings[&a], &b, ratings[&b], rng).to_string();
            self.resolve(idx, winner);
        }
        Ok(ready.len())
    }

    /// Record a real-world result for one game and propagate the winner.
    ///
    /// The winner must be one of the game's two known participants, and the
    /// game must not already have a recorded winner.
    pub fn record_winner(&mut self, game: usize, winner: &str) -> Result<(), SimError> {
        let entry = self.games.get(game).ok_or_else(|| {
            SimError::InvalidConfiguration(format!("no game with index {game}"))
        })?;
        if entry.winner.is_some() {
            return Err(SimError::InvalidConfiguration(format!(
                "game {game} already has a recorded winner"
            )));
        }
        let in_slot_a = entry.team_a.as_deref() == Some(winner);
        let in_slot_b = entry.team_b.as_deref() == Some(winner);
        if !in_slot_a && !in_slot_b {
            return Err(SimError::UnknownParticipant(winner.to_string()));
        }

        self.resolve(game, winner.to_string());
        Ok(())
    }

    /// The tournament winner, once the final has been resolved.
    pub fn champion(&self) -> Option<&str> {
        self.games.last().and_then(|game| game.winner.as_deref())
    }

    pub fn is_complete(&self) -> bool {
        self.games.iter().all(|game| game.winner.is_some())
    }

    fn resolve(&mut self, idx: usize, winner: String) {
        if let Some((next, slot)) = self.games[idx].feeds {
            match slot {
                Slot::A => self.games[next].team_a = Some(winner.clone()),
                Slot::B => self.games[next].team_b = Some(winner.clone()),
            }
        }
        self.games[idx].winner = Some(winner);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn pair(a: &str, b: &str) -> (String, String) {
        (a.to_string(), b.to_string())
    }

    fn names(teams: &[&str]) -> Vec<String> {
        teams.iter().map(|t| t.to_string()).collect()
    }

    fn sec_bracket() -> Bracket {
        Bracket::new(
            vec![
                pair("South Carolina", "Arkansas"),
                pair("Texas", "Vanderbilt"),
                pair("LSU", "Mississippi State"),
                pair("Oklahoma", "Georgia"),
            ],
            vec![
                names(&["Ole Miss", "Texas A&M", "Missouri", "Kentucky"]),
                names(&["Auburn", "Tennessee", "Florida", "Alabama"]),
            ],
        )
        .unwrap()
    }

    fn flat_ratings(bracket: &Bracket, rating: f64) -> RatingTable {
        bracket
            .participants()
            .into_iter()
            .map(|t| (t.to_string(), rating))
            .collect()
    }

    #[test]
    fn sec_shape() {
        let bracket = sec_bracket();
        assert_eq!(bracket.participants().len(), 16);
        assert_eq!(bracket.round_sizes(), vec![4, 4, 4, 2, 1]);
        assert_eq!(bracket.game_count(), 15);
    }

    #[test]
    fn empty_bracket_rejected() {
        let err = Bracket::new(vec![], vec![]).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn non_power_of_two_entry_rejected() {
        let err = Bracket::new(
            vec![pair("A", "B"), pair("C", "D"), pair("E", "F")],
            vec![],
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn mismatched_waiting_round_rejected() {
        let err = Bracket::new(
            vec![pair("A", "B"), pair("C", "D")],
            vec![names(&["E"])],
        )
        .unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn duplicate_participant_rejected() {
        let err = Bracket::new(vec![pair("A", "B"), pair("A", "C")], vec![]).unwrap_err();
        assert!(matches!(err, SimError::InvalidConfiguration(_)));
    }

    #[test]
    fn waiting_teams_occupy_slot_b() {
        let state = BracketState::from_bracket(&sec_bracket());
        let round_1: Vec<&Game> = state.games().iter().filter(|g| g.round == 1).collect();
        assert_eq!(round_1.len(), 4);
        for game in &round_1 {
            assert!(game.team_a.is_none());
            assert!(game.team_b.is_some());
        }
        assert_eq!(round_1[0].team_b.as_deref(), Some("Ole Miss"));
    }

    #[test]
    fn advance_round_walks_one_round_per_call() {
        let bracket = sec_bracket();
        let ratings = flat_ratings(&bracket, 1500.0);
        let mut state = BracketState::from_bracket(&bracket);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        for expected in [4, 4, 4, 2, 1] {
            assert_eq!(state.advance_round(&ratings, &mut rng).unwrap(), expected);
        }
        assert!(state.is_complete());
        let champion = state.champion().unwrap().to_string();
        assert!(bracket.participants().contains(&champion.as_str()));
    }

    #[test]
    fn advance_round_idempotent_when_complete() {
        let bracket = sec_bracket();
        let ratings = flat_ratings(&bracket, 1500.0);
        let mut state = BracketState::from_bracket(&bracket);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        while state.advance_round(&ratings, &mut rng).unwrap() > 0 {}
        let snapshot = state.clone();
        assert_eq!(state.advance_round(&ratings, &mut rng).unwrap(), 0);
        assert_eq!(state, snapshot);
    }

    #[test]
    fn recorded_winner_propagates_and_is_skipped() {
        let bracket = sec_bracket();
        let ratings = flat_ratings(&bracket, 1500.0);
        let mut state = BracketState::from_bracket(&bracket);

        state.record_winner(0, "Arkansas").unwrap();
        assert_eq!(state.games()[4].team_a.as_deref(), Some("Arkansas"));

        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // The other three entry games resolve, plus the Arkansas/Ole Miss
        // matchup the recorded result made resolvable. Game 0 keeps its result.
        assert_eq!(state.advance_round(&ratings, &mut rng).unwrap(), 4);
        assert_eq!(state.games()[0].winner.as_deref(), Some("Arkansas"));
    }

    #[test]
    fn record_winner_rejects_outsiders_and_replays() {
        let mut state = BracketState::from_bracket(&sec_bracket());

        assert_eq!(
            state.record_winner(0, "Duke").unwrap_err(),
            SimError::UnknownParticipant("Duke".to_string())
        );
        state.record_winner(0, "South Carolina").unwrap();
        assert!(matches!(
            state.record_winner(0, "Arkansas").unwrap_err(),
            SimError::InvalidConfiguration(_)
        ));
    }

    #[test]
    fn advance_round_fails_fast_on_missing_rating() {
        let bracket = sec_bracket();
        let mut ratings = flat_ratings(&bracket, 1500.0);
        ratings.remove("Texas");

        let mut state = BracketState::from_bracket(&bracket);
        let before = state.clone();
        let mut rng = ChaCha8Rng::seed_from_u64(5);

        let err = state.advance_round(&ratings, &mut rng).unwrap_err();
        assert_eq!(err, SimError::UnknownParticipant("Texas".to_string()));
        // No partial mutation.
        assert_eq!(state, before);
    }

    #[test]
    fn two_team_bracket_is_a_single_game() {
        let bracket = Bracket::new(vec![pair("A", "B")], vec![]).unwrap();
        assert_eq!(bracket.round_sizes(), vec![1]);

        let ratings = flat_ratings(&bracket, 1500.0);
        let mut state = BracketState::from_bracket(&bracket);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(state.advance_round(&ratings, &mut rng).unwrap(), 1);
        assert!(state.is_complete());
    }
}
