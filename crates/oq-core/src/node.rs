use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::NodeId;
use crate::position::MapPoint;

/// Terrain of a node and of the area materialized from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Biome {
    /// Safe hub, no enemies.
    Town,
    /// Woodland.
    Forest,
    /// Underground.
    Dungeon,
    /// Highlands.
    Mountain,
    /// Shoreline.
    Lake,
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Town => write!(f, "town"),
            Self::Forest => write!(f, "forest"),
            Self::Dungeon => write!(f, "dungeon"),
            Self::Mountain => write!(f, "mountain"),
            Self::Lake => write!(f, "lake"),
        }
    }
}

/// A travel destination and its unlock gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationNode {
    /// Stable id, shared with the node's area.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Position on the overworld map.
    pub position: MapPoint,
    /// Terrain.
    #[serde(rename = "type")]
    pub biome: Biome,
    /// Whether travel is allowed at all.
    pub is_unlocked: bool,
    /// Minimum hero level to unlock and to enter.
    pub required_level: u32,
    /// Difficulty, 1-5 (0 for the town hub).
    pub danger_level: u32,
    /// Whether the hero has visited.
    pub is_explored: bool,
    /// Reward tags.
    pub rewards: Vec<String>,
}

/// Width and height of an area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AreaSize {
    /// Extent along x.
    pub width: u32,
    /// Extent along z.
    pub height: u32,
}

impl AreaSize {
    /// Create a size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The materialized, stateful instance of a node. At most one per node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    /// Equal to the originating node's id.
    pub id: NodeId,
    /// Display name.
    pub name: String,
    /// Terrain.
    #[serde(rename = "type")]
    pub biome: Biome,
    /// Extent.
    pub size: AreaSize,
    /// Enemies spawned on entry.
    pub enemy_count: u32,
    /// Copied from the node's danger level.
    pub difficulty: u32,
    /// False for the hand-built town.
    pub is_procedural: bool,
    /// Clock time (ms) of the first visit.
    pub discovered_at: f64,
    /// Clock time (ms) of the latest visit.
    pub last_visited: f64,
    /// Times every enemy here was defeated.
    pub clear_count: u32,
}

impl Area {
    /// Whether this is a safe zone.
    pub fn is_town(&self) -> bool {
        self.biome == Biome::Town
    }
}
