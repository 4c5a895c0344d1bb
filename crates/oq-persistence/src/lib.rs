//! Persistence gateway for OathQuest games.
//!
//! Progress is stored as one versioned JSON record per oath and game kind in
//! a [`KeyValueStore`]. A record whose version differs from
//! [`CURRENT_VERSION`] is discarded on load, never patched.

/// Error types for the persistence crate.
pub mod error;
/// The per-oath save gateway and store-wide helpers.
pub mod gateway;
/// The persisted record.
pub mod record;
/// Key-value storage backends.
pub mod store;

/// Re-exports of error types.
pub use error::{PersistError, PersistResult};
/// Re-exports of gateway types.
pub use gateway::{
    GameKind, GamePersistence, STORAGE_KEY_PREFIX, SaveInfo, SaveSummary, all_save_keys,
    delete_all_saves, save_summary,
};
/// Re-exports of record types.
pub use record::{CURRENT_VERSION, SavedProgress};
/// Re-exports of storage backends.
pub use store::{FileStore, KeyValueStore, MemoryStore, SharedStore};
