use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::EnemyId;
use crate::position::Position;

/// Enemy health at level 0; each level adds [`HEALTH_PER_LEVEL`].
pub const BASE_HEALTH: u32 = 30;
/// Enemy health gained per level.
pub const HEALTH_PER_LEVEL: u32 = 10;

/// Enemy species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnemyKind {
    /// Small and numerous.
    Goblin,
    /// Big and slow.
    Orc,
    /// Undead.
    Skeleton,
    /// Wild beast.
    Wolf,
}

impl EnemyKind {
    /// Kinds that appear in generated rosters.
    pub const SPAWNABLE: [EnemyKind; 3] = [Self::Goblin, Self::Orc, Self::Skeleton];
}

impl fmt::Display for EnemyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Goblin => write!(f, "goblin"),
            Self::Orc => write!(f, "orc"),
            Self::Skeleton => write!(f, "skeleton"),
            Self::Wolf => write!(f, "wolf"),
        }
    }
}

/// An enemy in the active roster. Death is terminal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    /// Roster-unique id.
    pub id: EnemyId,
    /// Position on the ground plane.
    pub position: Position,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Level, at least 1.
    pub level: u32,
    /// Species.
    #[serde(rename = "type")]
    pub kind: EnemyKind,
    /// False once health reaches 0.
    pub is_alive: bool,
}

impl Enemy {
    /// Create a living enemy at full health.
    pub fn new(id: EnemyId, kind: EnemyKind, level: u32, position: Position) -> Self {
        let level = level.max(1);
        let max_health = Self::health_for(level);
        Self {
            id,
            position,
            health: max_health,
            max_health,
            level,
            kind,
            is_alive: true,
        }
    }

    /// `30 + level * 10`.
    pub fn health_for(level: u32) -> u32 {
        level.saturating_mul(HEALTH_PER_LEVEL).saturating_add(BASE_HEALTH)
    }

    /// Apply damage, clamping health at 0. Returns true if this hit killed
    /// the enemy. Dead enemies ignore further damage.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.is_alive {
            return false;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 {
            self.is_alive = false;
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_one_enemy_has_forty_health() {
        let e = Enemy::new(EnemyId(0), EnemyKind::Goblin, 1, Position::ORIGIN);
        assert_eq!(e.health, 40);
        assert_eq!(e.max_health, 40);
        assert!(e.is_alive);
    }

    #[test]
    fn overkill_clamps_and_kills_once() {
        let mut e = Enemy::new(EnemyId(1), EnemyKind::Orc, 2, Position::ORIGIN);
        assert!(e.take_damage(999));
        assert_eq!(e.health, 0);
        assert!(!e.is_alive);
        assert!(!e.take_damage(5));
    }

    #[test]
    fn health_saturates_at_huge_levels() {
        assert_eq!(Enemy::health_for(u32::MAX), u32::MAX);
        let e = Enemy::new(EnemyId(2), EnemyKind::Wolf, u32::MAX, Position::ORIGIN);
        assert_eq!(e.max_health, u32::MAX);
    }
}
