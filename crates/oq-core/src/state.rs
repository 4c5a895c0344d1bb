use std::fmt;

use serde::{Deserialize, Serialize};

use crate::enemy::Enemy;
use crate::hero::HeroState;
use crate::id::{EnemyId, NodeId};
use crate::node::AreaSize;
use crate::position::Position;

/// Which roster is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Navigation nodes are active.
    #[default]
    Overworld,
    /// The enemy roster is active.
    Combat,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overworld => write!(f, "overworld"),
            Self::Combat => write!(f, "combat"),
        }
    }
}

/// Area sub-state of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaState {
    /// Node id of the area the hero stands in.
    pub current: NodeId,
    /// Extent of the current area.
    pub size: AreaSize,
    /// Lifetime kill counter.
    pub enemies_defeated: u64,
}

/// Combat sub-state of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombatState {
    /// Whether the hero is engaged with a target.
    pub is_in_combat: bool,
    /// The enemy last attacked.
    pub target_enemy: Option<EnemyId>,
    /// Clock time (ms) of the last landed attack; `None` before the first.
    pub last_attack_time: Option<f64>,
    /// Minimum milliseconds between attacks.
    pub attack_cooldown: f64,
}

impl CombatState {
    /// Idle combat state with the given cooldown.
    pub fn new(attack_cooldown: f64) -> Self {
        Self {
            is_in_combat: false,
            target_enemy: None,
            last_attack_time: None,
            attack_cooldown,
        }
    }

    /// Milliseconds until the next attack is allowed (0 when ready).
    pub fn cooldown_remaining(&self, now: f64) -> f64 {
        match self.last_attack_time {
            Some(last) => (self.attack_cooldown - (now - last)).max(0.0),
            None => 0.0,
        }
    }

    /// Whether an attack issued at `now` would land.
    pub fn can_attack(&self, now: f64) -> bool {
        self.cooldown_remaining(now) <= 0.0
    }

    /// Drop the current target.
    pub fn disengage(&mut self) {
        self.is_in_combat = false;
        self.target_enemy = None;
    }
}

/// Movement sub-state of the aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationState {
    /// Where the hero is walking to.
    pub target_position: Option<Position>,
    /// Whether a move is in progress.
    pub is_moving: bool,
    /// Units per second.
    pub move_speed: f64,
}

impl NavigationState {
    /// Standing still at the given speed.
    pub fn new(move_speed: f64) -> Self {
        Self {
            target_position: None,
            is_moving: false,
            move_speed,
        }
    }

    /// Cancel any movement.
    pub fn halt(&mut self) {
        self.target_position = None;
        self.is_moving = false;
    }
}

/// The aggregate root owned by the hero game manager. Consumers only ever
/// see clones of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroGameState {
    /// The hero.
    pub hero: HeroState,
    /// The enemy roster.
    pub enemies: Vec<Enemy>,
    /// Area sub-state.
    pub area: AreaState,
    /// Combat sub-state.
    pub combat: CombatState,
    /// Movement sub-state.
    pub navigation: NavigationState,
    /// Active mode.
    pub mode: GameMode,
}

impl HeroGameState {
    /// An overworld state with an empty roster.
    pub fn new(
        hero: HeroState,
        area: AreaState,
        combat: CombatState,
        navigation: NavigationState,
    ) -> Self {
        Self {
            hero,
            enemies: Vec::new(),
            area,
            combat,
            navigation,
            mode: GameMode::Overworld,
        }
    }

    /// Look up an enemy by id.
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    /// Look up an enemy mutably by id.
    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    /// Enemies still alive.
    pub fn living_enemies(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|e| e.is_alive)
    }

    /// The living enemy closest to `from`.
    pub fn nearest_living_enemy(&self, from: &Position) -> Option<&Enemy> {
        self.living_enemies().min_by(|a, b| {
            from.distance(&a.position)
                .total_cmp(&from.distance(&b.position))
        })
    }

    /// Whether a non-empty roster has been fully defeated.
    pub fn roster_cleared(&self) -> bool {
        !self.enemies.is_empty() && self.enemies.iter().all(|e| !e.is_alive)
    }
}
