//! Overworld navigation for OathQuest games.
//!
//! A small graph of [`NavigationNode`](oq_core::NavigationNode)s gated by
//! hero level. Travelling to a node materializes its
//! [`Area`](oq_core::Area) on first visit with a procedurally chosen size
//! and enemy count.

/// Overworld configuration.
pub mod config;
/// Travel rejections.
pub mod error;
/// The built-in node graph and area generation.
pub mod graph;
/// The overworld state machine.
pub mod manager;

/// Re-export of [`config::OverworldConfig`].
pub use config::OverworldConfig;
/// Re-exports of error types.
pub use error::{TravelError, TravelResult};
/// Re-exports of graph helpers.
pub use graph::{TOWN_ID, area_from_node, default_nodes, town_area};
/// Re-exports of manager types.
pub use manager::{ExplorationStats, OverworldManager};
