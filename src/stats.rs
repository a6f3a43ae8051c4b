use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::error::SimError;

/// Names of every statistic the rating model consumes, in backfill order.
pub const STAT_FIELDS: [&str; 10] = [
    "scoring_offense",
    "scoring_defense",
    "field_goal_pct",
    "three_pt_made",
    "three_pt_pct",
    "free_throw_pct",
    "rebounds",
    "assists",
    "turnovers",
    "blocks",
];

/// Per-team statistics as scraped from a data source.
///
/// Any field may still be missing at this stage; [`backfill_stats`] turns a
/// table of these into fully-populated [`TeamStats`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialStats {
    pub scoring_offense: Option<f64>,
    pub scoring_defense: Option<f64>,
    pub field_goal_pct: Option<f64>,
    pub three_pt_made: Option<f64>,
    pub three_pt_pct: Option<f64>,
    pub free_throw_pct: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub turnovers: Option<f64>,
    pub blocks: Option<f64>,
}

impl PartialStats {
    fn field(&self, name: &str) -> Option<f64> {
        match name {
            "scoring_offense" => self.scoring_offense,
            "scoring_defense" => self.scoring_defense,
            "field_goal_pct" => self.field_goal_pct,
            "three_pt_made" => self.three_pt_made,
            "three_pt_pct" => self.three_pt_pct,
            "free_throw_pct" => self.free_throw_pct,
            "rebounds" => self.rebounds,
            "assists" => self.assists,
            "turnovers" => self.turnovers,
            "blocks" => self.blocks,
            _ => None,
        }
    }
}

/// Fully-populated team statistics, ready for rating derivation.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    pub scoring_offense: f64,
    pub scoring_defense: f64,
    pub field_goal_pct: f64,
    /// Tracked for completeness; not used by the rating formula.
    pub three_pt_made: f64,
    pub three_pt_pct: f64,
    pub free_throw_pct: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub turnovers: f64,
    pub blocks: f64,
}

impl TeamStats {
    fn set_field(&mut self, name: &str, value: f64) {
        match name {
            "scoring_offense" => self.scoring_offense = value,
            "scoring_defense" => self.scoring_defense = value,
            "field_goal_pct" => self.field_goal_pct = value,
            "three_pt_made" => self.three_pt_made = value,
            "three_pt_pct" => self.three_pt_pct = value,
            "free_throw_pct" => self.free_throw_pct = value,
            "rebounds" => self.rebounds = value,
            "assists" => self.assists = value,
            "turnovers" => self.turnovers = value,
            "blocks" => self.blocks = value,
            _ => {}
        }
    }

    fn zeroed() -> Self {
        TeamStats {
            scoring_offense: 0.0,
            scoring_defense: 0.0,
            field_goal_pct: 0.0,
            three_pt_made: 0.0,
            three_pt_pct: 0.0,
            free_throw_pct: 0.0,
            rebounds: 0.0,
            assists: 0.0,
            turnovers: 0.0,
            blocks: 0.0,
        }
    }
}

/// Raw statistics keyed by team name.
pub type StatTable = HashMap<String, PartialStats>;

/// Resolve every statistic for every team on the roster.
///
/// For each missing field the substitution order is:
/// 1. the same team's value in `fallback`, when a fallback table is supplied;
/// 2. the arithmetic mean of the field over teams in `observed` that have it;
/// 3. zero, logged as a data-quality warning (no source has the field at all).
///
/// A field that resolves to a non-finite or negative value is reported as
/// [`SimError::DataIncomplete`] — the simulation must never run on garbage
/// ratings.
pub fn backfill_stats(
    roster: &[String],
    observed: &StatTable,
    fallback: Option<&StatTable>,
) -> Result<HashMap<String, TeamStats>, SimError> {
    // Field means over whatever was actually observed.
    let mut means: HashMap<&str, f64> = HashMap::new();
    for field in STAT_FIELDS {
        let values: Vec<f64> = observed
            .values()
            .filter_map(|stats| stats.field(field))
            .collect();
        if !values.is_empty() {
            means.insert(field, values.iter().sum::<f64>() / values.len() as f64);
        }
    }

    let mut resolved = HashMap::with_capacity(roster.len());
    for team in roster {
        let scraped = observed.get(team);
        let reserve = fallback.and_then(|table| table.get(team));

        let mut stats = TeamStats::zeroed();
        for field in STAT_FIELDS {
            let value = scraped
                .and_then(|s| s.field(field))
                .or_else(|| reserve.and_then(|s| s.field(field)))
                .or_else(|| means.get(field).copied());

            let value = match value {
                Some(v) => v,
                None => {
                    warn!(team = %team, field, "no source for statistic, defaulting to zero");
                    0.0
                }
            };

            if !value.is_finite() || value < 0.0 {
                return Err(SimError::DataIncomplete {
                    team: team.clone(),
                    field,
                });
            }
            stats.set_field(field, value);
        }
        resolved.insert(team.clone(), stats);
    }

    Ok(resolved)
}
