use oq_overworld::TravelError;
use oq_persistence::PersistError;
use thiserror::Error;

/// Result type for manager operations that touch storage.
pub type HeroResult<T> = Result<T, HeroError>;

/// Errors raised by the hero game manager.
#[derive(Debug, Error)]
pub enum HeroError {
    /// Saving or loading failed.
    #[error("persistence failed: {0}")]
    Persist(#[from] PersistError),
}

/// Why the hero could not travel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TravelRejection {
    /// Travel is only possible from overworld mode.
    #[error("cannot travel while in combat")]
    InCombat,

    /// The overworld refused the trip.
    #[error(transparent)]
    Overworld(#[from] TravelError),
}
