use std::collections::HashMap;
use tracing::warn;

use crate::constants::{
    ASSIST_WEIGHT, BASE_RATING, BLOCK_WEIGHT, DEFENSE_WEIGHT, FIELD_GOAL_WEIGHT, FREE_THROW_WEIGHT,
    OFFENSE_WEIGHT, RATING_CEILING, RATING_FLOOR, REBOUND_WEIGHT, THREE_PT_WEIGHT, TURNOVER_WEIGHT,
};
use crate::stats::TeamStats;

/// Final scalar ratings keyed by team name.
pub type RatingTable = HashMap<String, f64>;

/// Weighted linear combination of a team's statistics.
///
/// Positive contributions for scoring, shooting, rebounding, assists and
/// blocks; negative for points allowed and turnovers.
pub fn composite_score(stats: &TeamStats) -> f64 {
    OFFENSE_WEIGHT * stats.scoring_offense - DEFENSE_WEIGHT * stats.scoring_defense
        + FIELD_GOAL_WEIGHT * stats.field_goal_pct
        + THREE_PT_WEIGHT * stats.three_pt_pct
        + FREE_THROW_WEIGHT * stats.free_throw_pct
        + REBOUND_WEIGHT * stats.rebounds
        + ASSIST_WEIGHT * stats.assists
        - TURNOVER_WEIGHT * stats.turnovers
        + BLOCK_WEIGHT * stats.blocks
}

/// Derive a rating for every team from its resolved statistics.
///
/// Each team gets `BASE_RATING + composite_score`, and the whole table is
/// then rescaled into `[RATING_FLOOR, RATING_CEILING]`. The result is a pure
/// function of the input; simulated outcomes never feed back into it.
pub fn derive_ratings(stats: &HashMap<String, TeamStats>) -> RatingTable {
    let mut ratings: RatingTable = stats
        .iter()
        .map(|(team, s)| (team.clone(), BASE_RATING + composite_score(s)))
        .collect();
    rescale_ratings(&mut ratings);
    ratings
}

/// Affinely map the minimum rating to `RATING_FLOOR` and the maximum to
/// `RATING_CEILING`, preserving the relative order of all teams.
///
/// When every rating is identical there is no spread to map; the table is
/// left untouched and a warning is emitted.
pub fn rescale_ratings(ratings: &mut RatingTable) {
    let lo = ratings.values().copied().fold(f64::INFINITY, f64::min);
    let hi = ratings.values().copied().fold(f64::NEG_INFINITY, f64::max);
    if ratings.is_empty() || hi == lo {
        warn!("ratings have no spread, skipping rescale");
        return;
    }

    let span = RATING_CEILING - RATING_FLOOR;
    for rating in ratings.values_mut() {
        *rating = RATING_FLOOR + (*rating - lo) * span / (hi - lo);
    }
}
