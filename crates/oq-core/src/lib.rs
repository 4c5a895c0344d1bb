//! Core types for the OathQuest hero game.
//!
//! This crate defines the data model shared by the scheduler, the overworld,
//! the persistence gateway, and the hero game manager. It holds no behavior
//! beyond the derived-stat formulas and small invariant-keeping helpers, so
//! every other crate can agree on one shape of the game state.

/// Enemy roster entries.
pub mod enemy;
/// Error types used throughout the crate.
pub mod error;
/// Hero stats, equipment slots, and level formulas.
pub mod hero;
/// Identifier newtypes.
pub mod id;
/// Weapons and armor.
pub mod item;
/// Overworld navigation nodes and materialized areas.
pub mod node;
/// The externally owned oath record that seeds the hero.
pub mod oath;
/// Ground-plane and map coordinates.
pub mod position;
/// Skill tree definitions and unlock rules.
pub mod skill;
/// The aggregate game state.
pub mod state;
/// Clock abstraction for deterministic timing.
pub mod time;

/// Re-export enemy types.
pub use enemy::{Enemy, EnemyKind};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export hero types.
pub use hero::{HeroState, HeroStats, base_hero_level};
/// Re-export identifier types.
pub use id::{EnemyId, ItemId, NodeId, SkillId};
/// Re-export item types.
pub use item::{Armor, ArmorSlot, Weapon, WeaponKind};
/// Re-export node types.
pub use node::{Area, AreaSize, Biome, NavigationNode};
/// Re-export oath types.
pub use oath::{Currencies, Oath, OathLength, OathRecord};
/// Re-export coordinate types.
pub use position::{MapPoint, Position};
/// Re-export skill types.
pub use skill::{Skill, SkillEffect, SkillEffectKind, SkillRejection};
/// Re-export aggregate state types.
pub use state::{AreaState, CombatState, GameMode, HeroGameState, NavigationState};
/// Re-export clock types.
pub use time::{Clock, ManualClock, SharedClock, SystemClock};
