use serde::{Deserialize, Serialize};

use oq_core::{
    Area, ArmorSlot, EnemyId, GameMode, HeroGameState, NavigationNode, NodeId, Position, SkillId,
};

/// Abstract input delivered by the host (renderer, CLI, test).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    /// Attack an enemy by id.
    Attack {
        /// Target.
        enemy: EnemyId,
    },
    /// Walk toward a ground-plane point.
    MoveTo {
        /// Target x.
        x: f64,
        /// Target z.
        z: f64,
    },
    /// Travel to an overworld node.
    Travel {
        /// Destination.
        node: NodeId,
    },
}

/// One thing that changed during a manager operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "change", rename_all = "snake_case")]
pub enum StateChange {
    /// A movement target was set.
    TargetSet {
        /// Where the hero is heading.
        target: Position,
    },
    /// The hero moved during a tick.
    Moved {
        /// New position.
        position: Position,
    },
    /// The hero reached its movement target.
    Arrived,
    /// An attack landed.
    Attacked {
        /// Target.
        enemy: EnemyId,
        /// Damage dealt.
        damage: u32,
        /// Enemy health afterwards.
        remaining_health: u32,
    },
    /// An enemy died.
    EnemyDefeated {
        /// The dead enemy.
        enemy: EnemyId,
        /// Experience granted.
        experience: u64,
    },
    /// The hero gained a level.
    LevelUp {
        /// New level.
        level: u32,
    },
    /// A dropped weapon was equipped.
    WeaponEquipped {
        /// Weapon name.
        name: String,
        /// Weapon damage.
        damage: u32,
    },
    /// A dropped armor piece was equipped.
    ArmorEquipped {
        /// Armor name.
        name: String,
        /// Slot it went into.
        slot: ArmorSlot,
    },
    /// A skill was unlocked.
    SkillUnlocked {
        /// The skill.
        skill: SkillId,
        /// Points spent.
        cost: u32,
    },
    /// Overworld nodes became available.
    NodesUnlocked {
        /// The unlocked nodes.
        nodes: Vec<NodeId>,
    },
    /// Every enemy of the current area was defeated.
    AreaCleared {
        /// The area.
        area: NodeId,
    },
    /// The hero traveled.
    Traveled {
        /// Destination.
        area: NodeId,
    },
    /// A fresh enemy roster was spawned.
    RosterSpawned {
        /// Roster size.
        count: usize,
    },
    /// The combat target was dropped because it is gone or dead.
    CombatReset,
    /// The active mode changed.
    ModeChanged {
        /// New mode.
        mode: GameMode,
    },
}

/// Immutable view of the game emitted after each mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// The aggregate.
    pub state: HeroGameState,
    /// Overworld nodes.
    pub nodes: Vec<NavigationNode>,
    /// The area the hero stands in.
    pub current_area: Option<Area>,
    /// What the mutation changed.
    pub changes: Vec<StateChange>,
}

impl Snapshot {
    /// Whether the snapshot records a change matching `pred`.
    pub fn has_change(&self, pred: impl Fn(&StateChange) -> bool) -> bool {
        self.changes.iter().any(pred)
    }
}
