use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use oq_core::{Armor, ArmorSlot, Enemy, EnemyId, EnemyKind, ItemId, Position, Weapon, WeaponKind};

/// Damage mitigated per enemy level.
pub const MITIGATION_PER_LEVEL: u32 = 2;
/// Experience granted per enemy level on a kill.
pub const EXPERIENCE_PER_ENEMY_LEVEL: u64 = 10;
/// Chance that a kill drops a weapon.
pub const WEAPON_DROP_CHANCE: f64 = 0.3;
/// Chance that a kill drops armor.
pub const ARMOR_DROP_CHANCE: f64 = 0.2;
/// Smallest combat roster.
pub const ROSTER_MIN: usize = 5;
/// Largest combat roster.
pub const ROSTER_MAX: usize = 10;
/// Half-extent of the square enemies spawn in.
pub const SPAWN_SPREAD: f64 = 20.0;

const DROPPABLE_ARMOR: [ArmorSlot; 3] = [ArmorSlot::Helmet, ArmorSlot::Chest, ArmorSlot::Boots];

/// What an attack request did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttackOutcome {
    /// No enemy with that id. Nothing changed.
    UnknownTarget,
    /// The enemy was already dead. Nothing changed.
    AlreadyDead,
    /// The attack cooldown had not elapsed. Nothing changed.
    OnCooldown {
        /// Time left on the cooldown.
        remaining_ms: f64,
    },
    /// The hit landed and the enemy survived.
    Hit {
        /// Damage dealt.
        damage: u32,
        /// Enemy health after the hit.
        remaining_health: u32,
    },
    /// The hit killed the enemy.
    Killed {
        /// Damage dealt.
        damage: u32,
        /// Experience granted.
        experience: u64,
        /// Whether the kill raised the hero's level.
        leveled_up: bool,
    },
}

impl AttackOutcome {
    /// Whether the attack changed any state.
    pub fn landed(&self) -> bool {
        matches!(self, Self::Hit { .. } | Self::Killed { .. })
    }
}

/// Loot rolled for one kill.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Drops {
    /// Dropped weapon.
    pub weapon: Option<Weapon>,
    /// Dropped armor.
    pub armor: Option<Armor>,
}

/// `max(1, attack_power - 2 * enemy_level)`.
pub fn damage(attack_power: u32, enemy_level: u32) -> u32 {
    attack_power
        .saturating_sub(enemy_level.saturating_mul(MITIGATION_PER_LEVEL))
        .max(1)
}

/// Experience for killing an enemy of `level`.
pub fn experience_for(level: u32) -> u64 {
    u64::from(level) * EXPERIENCE_PER_ENEMY_LEVEL
}

/// Spawn `count` enemies around the area origin, each within one level of
/// `hero_level` (never below 1). Ids are taken from `next_id`, which is
/// advanced so ids stay unique across rosters.
pub fn spawn_enemies(
    count: usize,
    hero_level: u32,
    rng: &mut StdRng,
    next_id: &mut u32,
) -> Vec<Enemy> {
    (0..count)
        .map(|_| {
            let kind = EnemyKind::SPAWNABLE[rng.random_range(0..EnemyKind::SPAWNABLE.len())];
            let offset: i64 = rng.random_range(-1..=1);
            let level = u32::try_from((i64::from(hero_level) + offset).max(1)).unwrap_or(u32::MAX);
            let position = Position::new(
                rng.random_range(-SPAWN_SPREAD..SPAWN_SPREAD),
                rng.random_range(-SPAWN_SPREAD..SPAWN_SPREAD),
            );
            let id = EnemyId(*next_id);
            *next_id = next_id.wrapping_add(1);
            Enemy::new(id, kind, level, position)
        })
        .collect()
}

/// A combat roster of 5 to 10 enemies.
pub fn spawn_roster(hero_level: u32, rng: &mut StdRng, next_id: &mut u32) -> Vec<Enemy> {
    let count = rng.random_range(ROSTER_MIN..=ROSTER_MAX);
    spawn_enemies(count, hero_level, rng, next_id)
}

/// Roll independent weapon and armor drops for a kill.
pub fn roll_drops(kind: EnemyKind, level: u32, rng: &mut StdRng) -> Drops {
    let mut drops = Drops::default();
    if rng.random_bool(WEAPON_DROP_CHANCE) {
        let metal = if kind == EnemyKind::Skeleton { "Bone" } else { "Iron" };
        drops.weapon = Some(Weapon::new(
            ItemId::from_random_bytes(rng.random()),
            format!("{kind} {metal} Sword"),
            WeaponKind::Sword,
            level.saturating_mul(2).saturating_add(5),
        ));
    }
    if rng.random_bool(ARMOR_DROP_CHANCE) {
        let slot = DROPPABLE_ARMOR[rng.random_range(0..DROPPABLE_ARMOR.len())];
        drops.armor = Some(Armor::new(
            ItemId::from_random_bytes(rng.random()),
            format!("{kind} {slot}"),
            slot,
            level.saturating_add(2),
        ));
    }
    drops
}
