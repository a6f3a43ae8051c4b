/// Baseline rating before the composite stat adjustment is applied
pub const BASE_RATING: f64 = 1500.0;

/// Weight on points scored per game
pub const OFFENSE_WEIGHT: f64 = 3.0;

/// Weight on points allowed per game (subtracted; lower is better)
pub const DEFENSE_WEIGHT: f64 = 2.0;

/// Weight on field goal percentage
pub const FIELD_GOAL_WEIGHT: f64 = 100.0;

/// Weight on three-point percentage
pub const THREE_PT_WEIGHT: f64 = 50.0;

/// Weight on free throw percentage
pub const FREE_THROW_WEIGHT: f64 = 30.0;

/// Weight on rebounds per game
pub const REBOUND_WEIGHT: f64 = 1.5;

/// Weight on assists per game
pub const ASSIST_WEIGHT: f64 = 1.0;

/// Weight on turnovers per game (subtracted)
pub const TURNOVER_WEIGHT: f64 = 2.0;

/// Weight on blocked shots per game
pub const BLOCK_WEIGHT: f64 = 1.0;

/// Minimum rating after rescaling
pub const RATING_FLOOR: f64 = 1400.0;

/// Maximum rating after rescaling
pub const RATING_CEILING: f64 = 2000.0;

/// Rating-difference scale of the logistic win-probability curve
pub const ELO_SCALE: f64 = 400.0;

/// Default number of Monte Carlo trials per run
pub const DEFAULT_TRIALS: usize = 10_000;
