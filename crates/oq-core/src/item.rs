use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::ItemId;

/// Mastery level every new weapon starts with.
pub const STARTING_MASTERY: u32 = 25;
/// Kills needed to fully master a weapon.
pub const MAX_MASTERY_KILLS: u32 = 100;

/// The family a weapon belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeaponKind {
    /// One-handed blade.
    Sword,
    /// Heavy chopping weapon.
    Axe,
    /// Ranged weapon.
    Bow,
    /// Focus for spellcasting.
    Staff,
}

impl fmt::Display for WeaponKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sword => write!(f, "sword"),
            Self::Axe => write!(f, "axe"),
            Self::Bow => write!(f, "bow"),
            Self::Staff => write!(f, "staff"),
        }
    }
}

/// A weapon. The hero holds at most one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    /// Unique item id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Weapon family.
    #[serde(rename = "type")]
    pub kind: WeaponKind,
    /// Flat damage added to the hero's attack.
    pub damage: u32,
    /// Mastery percentage, 0-100.
    pub mastery_level: u32,
    /// Kills made with this weapon, capped at `max_mastery_kills`.
    pub kills: u32,
    /// Kills needed for full mastery.
    pub max_mastery_kills: u32,
}

impl Weapon {
    /// Create an unmastered weapon.
    pub fn new(id: ItemId, name: impl Into<String>, kind: WeaponKind, damage: u32) -> Self {
        Self {
            id,
            name: name.into(),
            kind,
            damage,
            mastery_level: STARTING_MASTERY,
            kills: 0,
            max_mastery_kills: MAX_MASTERY_KILLS,
        }
    }

    /// Count a kill toward mastery. Returns false once the counter is full.
    pub fn record_kill(&mut self) -> bool {
        if self.kills >= self.max_mastery_kills {
            return false;
        }
        self.kills += 1;
        true
    }
}

/// The body slot an armor piece occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArmorSlot {
    /// Head.
    Helmet,
    /// Torso.
    Chest,
    /// Feet.
    Boots,
    /// Hands.
    Gloves,
}

impl ArmorSlot {
    /// Every slot, in display order.
    pub const ALL: [ArmorSlot; 4] = [Self::Helmet, Self::Chest, Self::Boots, Self::Gloves];
}

impl fmt::Display for ArmorSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Helmet => write!(f, "helmet"),
            Self::Chest => write!(f, "chest"),
            Self::Boots => write!(f, "boots"),
            Self::Gloves => write!(f, "gloves"),
        }
    }
}

/// An armor piece.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    /// Unique item id.
    pub id: ItemId,
    /// Display name.
    pub name: String,
    /// Slot occupied when equipped.
    #[serde(rename = "type")]
    pub slot: ArmorSlot,
    /// Defense bonus.
    pub defense: u32,
}

impl Armor {
    /// Create an armor piece.
    pub fn new(id: ItemId, name: impl Into<String>, slot: ArmorSlot, defense: u32) -> Self {
        Self {
            id,
            name: name.into(),
            slot,
            defense,
        }
    }
}
