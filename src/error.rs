use thiserror::Error;

/// Errors surfaced while preparing or running a simulation.
///
/// All variants are boundary errors: once a [`crate::TournamentSim`] has been
/// constructed, individual trials cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    /// A required statistic could not be resolved to a usable value,
    /// even after the backfill pass.
    #[error("statistic `{field}` for {team} is missing or invalid after backfill")]
    DataIncomplete { team: String, field: &'static str },

    /// A rating or match lookup referenced a participant outside the
    /// closed set the simulation was configured with.
    #[error("unknown participant `{0}`")]
    UnknownParticipant(String),

    /// Bad trial count or malformed bracket shape.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}
