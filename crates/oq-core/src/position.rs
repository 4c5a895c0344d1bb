use serde::{Deserialize, Serialize};

/// A point on the combat ground plane (x/z, as seen by the renderer).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal axis.
    pub x: f64,
    /// Depth axis.
    pub z: f64,
}

impl Position {
    /// The area origin.
    pub const ORIGIN: Self = Self { x: 0.0, z: 0.0 };

    /// Create a position.
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Euclidean distance to another position.
    pub fn distance(&self, other: &Position) -> f64 {
        let dx = other.x - self.x;
        let dz = other.z - self.z;
        (dx * dx + dz * dz).sqrt()
    }

    /// Linear interpolation toward `target` by `t` (0.0 stays, 1.0 arrives).
    pub fn lerp(&self, target: &Position, t: f64) -> Position {
        Position {
            x: self.x + (target.x - self.x) * t,
            z: self.z + (target.z - self.z) * t,
        }
    }
}

/// A point on the overworld map.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    /// Map x coordinate.
    pub x: f64,
    /// Map y coordinate.
    pub y: f64,
}

impl MapPoint {
    /// Create a map point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
