//! Hero stats, equipment slots, and level formulas.
//!
//! All combat stats are pure functions of the hero's level. They are stored
//! on [`HeroStats`] for snapshot consumers but always recomputed through
//! [`HeroStats::set_level`], never edited piecemeal.

use serde::{Deserialize, Serialize};

use crate::id::SkillId;
use crate::item::{Armor, ArmorSlot, Weapon};
use crate::position::Position;
use crate::skill::Skill;

/// Maximum health at level 1.
pub const BASE_MAX_HEALTH: u32 = 100;
/// Maximum health gained per level.
pub const HEALTH_PER_LEVEL: u32 = 20;
/// Attack at level 1.
pub const BASE_ATTACK: u32 = 10;
/// Attack gained per level.
pub const ATTACK_PER_LEVEL: u32 = 2;
/// Defense at level 1.
pub const BASE_DEFENSE: u32 = 5;
/// Defense gained per level.
pub const DEFENSE_PER_LEVEL: u32 = 1;
/// Stamina pool (not level dependent).
pub const BASE_STAMINA: u32 = 100;
/// Experience threshold per level: reaching level `n + 1` needs `n * 100`.
pub const EXPERIENCE_PER_LEVEL: u64 = 100;
/// Oath currency that buys one base level.
pub const CURRENCY_PER_LEVEL: f64 = 100.0;

/// Level seeded by externally accrued oath currency: one level per 100
/// currency, starting at 1. Negative or non-finite input yields level 1.
pub fn base_hero_level(currency: f64) -> u32 {
    if !currency.is_finite() || currency <= 0.0 {
        return 1;
    }
    let levels = (currency / CURRENCY_PER_LEVEL).floor();
    if levels >= f64::from(u32::MAX - 1) {
        return u32::MAX;
    }
    levels as u32 + 1
}

/// Numeric hero stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroStats {
    /// Current level, always at least 1.
    pub level: u32,
    /// Cumulative experience.
    pub experience: u64,
    /// Experience needed for the next level (`level * 100`).
    pub experience_to_next: u64,
    /// Unspent skill points.
    pub skill_points: u32,
    /// Current health, never above `max_health`.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Current stamina.
    pub stamina: u32,
    /// Maximum stamina.
    pub max_stamina: u32,
    /// Attack power before weapon bonus.
    pub attack: u32,
    /// Defense before armor bonus.
    pub defense: u32,
}

impl HeroStats {
    /// Fresh stats for `level` with full health, no experience, and no
    /// skill points.
    pub fn for_level(level: u32) -> Self {
        let mut stats = Self {
            level: 1,
            experience: 0,
            experience_to_next: EXPERIENCE_PER_LEVEL,
            skill_points: 0,
            health: BASE_MAX_HEALTH,
            max_health: BASE_MAX_HEALTH,
            stamina: BASE_STAMINA,
            max_stamina: BASE_STAMINA,
            attack: BASE_ATTACK,
            defense: BASE_DEFENSE,
        };
        stats.set_level(level);
        stats
    }

    /// Set experience (builder style).
    pub fn with_experience(mut self, experience: u64) -> Self {
        self.experience = experience;
        self
    }

    /// Set unspent skill points (builder style).
    pub fn with_skill_points(mut self, points: u32) -> Self {
        self.skill_points = points;
        self
    }

    /// `100 + (level - 1) * 20`.
    pub fn max_health_for(level: u32) -> u32 {
        level
            .max(1)
            .saturating_sub(1)
            .saturating_mul(HEALTH_PER_LEVEL)
            .saturating_add(BASE_MAX_HEALTH)
    }

    /// `10 + (level - 1) * 2`.
    pub fn attack_for(level: u32) -> u32 {
        level
            .max(1)
            .saturating_sub(1)
            .saturating_mul(ATTACK_PER_LEVEL)
            .saturating_add(BASE_ATTACK)
    }

    /// `5 + (level - 1)`.
    pub fn defense_for(level: u32) -> u32 {
        level
            .max(1)
            .saturating_sub(1)
            .saturating_mul(DEFENSE_PER_LEVEL)
            .saturating_add(BASE_DEFENSE)
    }

    /// `level * 100`.
    pub fn experience_threshold(level: u32) -> u64 {
        u64::from(level.max(1)) * EXPERIENCE_PER_LEVEL
    }

    /// Move to `level` (clamped to at least 1), recompute every derived stat
    /// and restore health to the new maximum.
    pub fn set_level(&mut self, level: u32) {
        let level = level.max(1);
        self.level = level;
        self.experience_to_next = Self::experience_threshold(level);
        self.max_health = Self::max_health_for(level);
        self.health = self.max_health;
        self.attack = Self::attack_for(level);
        self.defense = Self::defense_for(level);
    }

    /// Add experience. Crossing the threshold grants exactly one level and
    /// one skill point, however large the gain. Returns whether a level was
    /// gained.
    pub fn gain_experience(&mut self, amount: u64) -> bool {
        self.experience = self.experience.saturating_add(amount);
        if self.experience < self.experience_to_next {
            return false;
        }
        self.set_level(self.level.saturating_add(1));
        self.skill_points = self.skill_points.saturating_add(1);
        true
    }
}

impl Default for HeroStats {
    fn default() -> Self {
        Self::for_level(1)
    }
}

/// The hero: position, stats, equipment, and skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeroState {
    /// Position in the current area.
    pub position: Position,
    /// Numeric stats.
    pub stats: HeroStats,
    /// The single equipped weapon.
    pub equipped_weapon: Option<Weapon>,
    /// Equipped armor, at most one per slot.
    pub equipped_armor: Vec<Armor>,
    /// The full skill tree with unlock flags.
    pub skills: Vec<Skill>,
}

impl HeroState {
    /// A hero at the origin with the given stats and skills, unequipped.
    pub fn new(stats: HeroStats, skills: Vec<Skill>) -> Self {
        Self {
            position: Position::ORIGIN,
            stats,
            equipped_weapon: None,
            equipped_armor: Vec::new(),
            skills,
        }
    }

    /// Attack plus weapon damage.
    pub fn attack_power(&self) -> u32 {
        self.stats
            .attack
            .saturating_add(self.equipped_weapon.as_ref().map_or(0, |w| w.damage))
    }

    /// Defense plus every armor bonus.
    pub fn total_defense(&self) -> u32 {
        self.equipped_armor
            .iter()
            .fold(self.stats.defense, |total, a| total.saturating_add(a.defense))
    }

    /// Equip a weapon unconditionally. Returns the replaced weapon.
    pub fn equip_weapon(&mut self, weapon: Weapon) -> Option<Weapon> {
        self.equipped_weapon.replace(weapon)
    }

    /// Equip armor into its slot, replacing only the piece in that slot.
    /// Returns the replaced piece.
    pub fn equip_armor(&mut self, armor: Armor) -> Option<Armor> {
        match self.equipped_armor.iter_mut().find(|a| a.slot == armor.slot) {
            Some(existing) => Some(std::mem::replace(existing, armor)),
            None => {
                self.equipped_armor.push(armor);
                None
            }
        }
    }

    /// The armor in `slot`, if any.
    pub fn armor_in(&self, slot: ArmorSlot) -> Option<&Armor> {
        self.equipped_armor.iter().find(|a| a.slot == slot)
    }

    /// Look up a skill by id.
    pub fn skill(&self, id: &SkillId) -> Option<&Skill> {
        self.skills.iter().find(|s| &s.id == id)
    }

    /// Whether the skill is owned.
    pub fn has_skill(&self, id: &SkillId) -> bool {
        self.skill(id).is_some_and(|s| s.is_unlocked)
    }
}
