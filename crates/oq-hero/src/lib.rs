//! Hero game manager for OathQuest.
//!
//! [`HeroGameManager`] is the single owner and mutator of a
//! [`HeroGameState`](oq_core::HeroGameState). It seeds the hero from an
//! oath's accrued currency merged with saved progress, resolves combat and
//! movement, drives the overworld, and reports every mutation to its
//! subscribers as a [`Snapshot`]. [`HeroSession`] wires a manager to its own
//! fixed-timestep [`Scheduler`](oq_engine::Scheduler).

/// Combat formulas, roster spawning, and loot.
pub mod combat;
/// Manager configuration.
pub mod config;
/// Error types for the hero crate.
pub mod error;
/// Input events, change descriptors, and snapshots.
pub mod event;
/// The hero game manager.
pub mod manager;
/// Snapshot subscribers.
pub mod observer;
/// A manager driven by its own scheduler.
pub mod session;

/// Re-exports of combat types.
pub use combat::{AttackOutcome, Drops};
/// Re-export of [`config::HeroConfig`].
pub use config::HeroConfig;
/// Re-exports of error types.
pub use error::{HeroError, HeroResult, TravelRejection};
/// Re-exports of event types.
pub use event::{InputEvent, Snapshot, StateChange};
/// Re-export of [`manager::HeroGameManager`].
pub use manager::HeroGameManager;
/// Re-export of [`observer::SubscriptionId`].
pub use observer::SubscriptionId;
/// Re-export of [`session::HeroSession`].
pub use session::HeroSession;
