//! Monte Carlo championship prediction for single-elimination brackets.
//!
//! Three layers, in dependency order: a rating model that turns raw
//! per-team statistics into bounded scalar ratings, a logistic Elo
//! win-probability model for any pair of ratings, and a bracket simulator
//! that plays out a fixed tournament shape many times and tallies how often
//! each team wins it all.
//!
//! Data acquisition (OCR scraping, CSV files) and presentation (charts,
//! CLIs) live outside this crate; callers hand in a [`stats::StatTable`] or
//! a ready-made [`rating::RatingTable`] plus a [`Bracket`], and get back a
//! [`Tally`] or ranked [`Prediction`].

pub mod bracket;
pub mod constants;
pub mod error;
pub mod rating;
pub mod stats;
pub mod tournament;
pub mod win_prob;

pub use bracket::{Bracket, BracketState, Game, Slot};
pub use error::SimError;
pub use rating::{composite_score, derive_ratings, rescale_ratings, RatingTable};
pub use stats::{backfill_stats, PartialStats, StatTable, TeamStats, STAT_FIELDS};
pub use tournament::{Prediction, SimConfig, Tally, TeamProbability, TournamentSim};
pub use win_prob::{simulate_match, win_probability};
