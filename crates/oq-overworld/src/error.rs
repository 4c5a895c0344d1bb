use oq_core::NodeId;
use thiserror::Error;

/// Result of a travel request.
pub type TravelResult<T> = Result<T, TravelError>;

/// Why a travel request was refused. Checked in declaration order.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TravelError {
    /// No node has this id.
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// The node has not been unlocked yet.
    #[error("{0} is locked")]
    Locked(NodeId),

    /// The hero is below the node's required level.
    #[error("requires hero level {required}")]
    LevelTooLow {
        /// Level the node asks for.
        required: u32,
    },

    /// The previous travel was too recent.
    #[error("traveling too quickly, wait {remaining_ms:.0} ms")]
    Throttled {
        /// Time left on the cooldown.
        remaining_ms: f64,
    },
}
