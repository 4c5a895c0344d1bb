use thiserror::Error;

/// Result type for persistence operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Errors raised while reading or writing saves.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The backing store failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not a valid save record.
    #[error("malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),

    /// The payload was written by an incompatible schema version.
    #[error("save version {found} is not supported (expected {expected})")]
    VersionMismatch {
        /// Version found in the payload, as written.
        found: String,
        /// Version this build reads and writes.
        expected: u32,
    },

    /// A key that the store cannot represent.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}
