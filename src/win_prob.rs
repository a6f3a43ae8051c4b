use rand::Rng;

use crate::constants::ELO_SCALE;
use crate::error::SimError;
use crate::rating::RatingTable;

/// Probability that a participant rated `rating_a` beats one rated `rating_b`.
///
/// Logistic Elo curve: `1 / (1 + 10^((rating_b - rating_a) / 400))`.
/// Equal ratings give exactly 0.5, and `p(a, b) + p(b, a) == 1` for any
/// finite pair.
pub fn win_probability(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / ELO_SCALE))
}

/// Draw one match outcome between two named participants.
///
/// Consumes exactly one uniform sample in `[0, 1)` from the supplied RNG, so
/// a fixed seed and a fixed match order reproduce identical results. A name
/// absent from `ratings` is a fatal error, never a silent default rating.
pub fn simulate_match<'a, R: Rng>(
    team_a: &'a str,
    team_b: &'a str,
    ratings: &RatingTable,
    rng: &mut R,
) -> Result<&'a str, SimError> {
    let rating_a = *ratings
        .get(team_a)
        .ok_or_else(|| SimError::UnknownParticipant(team_a.to_string()))?;
    let rating_b = *ratings
        .get(team_b)
        .ok_or_else(|| SimError::UnknownParticipant(team_b.to_string()))?;

    Ok(pick_winner(team_a, rating_a, team_b, rating_b, rng))
}

/// One draw, pre-validated ratings. Internal fast path for the simulator.
pub(crate) fn pick_winner<'a, R: Rng>(
    team_a: &'a str,
    rating_a: f64,
    team_b: &'a str,
    rating_b: f64,
    rng: &mut R,
) -> &'a str {
    if rng.gen::<f64>() < win_probability(rating_a, rating_b) {
        team_a
    } else {
        team_b
    }
}
