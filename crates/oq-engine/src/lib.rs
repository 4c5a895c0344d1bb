//! Fixed-timestep scheduler for OathQuest games.
//!
//! A [`Scheduler`] decouples simulation from display refresh: each call to
//! [`Scheduler::frame`] measures elapsed wall time, drains it in constant
//! steps through the registered update callbacks, then runs every render
//! callback once with an interpolation fraction. There is no process-wide
//! instance; each game session owns its own scheduler.

/// Ordered callback storage with cancellable registrations.
pub mod callbacks;
/// Scheduler configuration.
pub mod config;
/// Error types for the engine crate.
pub mod error;
/// The fixed-timestep loop.
pub mod scheduler;

/// Re-export of [`callbacks::Registration`].
pub use callbacks::Registration;
/// Re-export of [`config::SchedulerConfig`].
pub use config::SchedulerConfig;
/// Re-exports of [`error::CallbackError`] and [`error::CallbackResult`].
pub use error::{CallbackError, CallbackResult};
/// Re-exports of the scheduler types.
pub use scheduler::{FrameStats, Scheduler, SchedulerState};
