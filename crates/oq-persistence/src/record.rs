use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use oq_core::{Armor, HeroGameState, HeroStats, NodeId, Skill, Weapon};

use crate::error::{PersistError, PersistResult};

/// Schema version written by this build.
pub const CURRENT_VERSION: u32 = 1;

/// The derived subset of the game state that survives a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedProgress {
    /// Hero level at save time.
    pub hero_level: u32,
    /// Cumulative experience.
    pub experience: u64,
    /// Unspent skill points.
    pub skill_points: u32,
    /// The skill tree with unlock flags.
    pub skills: Vec<Skill>,
    /// Equipped weapon, if any.
    pub equipped_weapon: Option<Weapon>,
    /// Equipped armor, at most one per slot.
    pub equipped_armor: Vec<Armor>,
    /// Lifetime kill counter.
    pub enemies_defeated: u64,
    /// Nodes the hero has visited.
    #[serde(default)]
    pub areas_explored: Vec<NodeId>,
    /// When the record was written.
    pub last_saved: DateTime<Utc>,
    /// Schema version.
    pub version: u32,
}

/// Just enough of a record to check compatibility, whatever its version.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RecordHeader {
    pub(crate) version: serde_json::Value,
    #[serde(default)]
    pub(crate) last_saved: Option<serde_json::Value>,
}

impl SavedProgress {
    /// Capture the persisted subset of `state`.
    pub fn capture(
        state: &HeroGameState,
        areas_explored: Vec<NodeId>,
        saved_at: DateTime<Utc>,
    ) -> Self {
        let hero = &state.hero;
        Self {
            hero_level: hero.stats.level,
            experience: hero.stats.experience,
            skill_points: hero.stats.skill_points,
            skills: hero.skills.clone(),
            equipped_weapon: hero.equipped_weapon.clone(),
            equipped_armor: hero.equipped_armor.clone(),
            enemies_defeated: state.area.enemies_defeated,
            areas_explored,
            last_saved: saved_at,
            version: CURRENT_VERSION,
        }
    }

    /// Rebuild full hero stats from the saved level. Health starts full.
    pub fn hero_stats(&self) -> HeroStats {
        HeroStats::for_level(self.hero_level)
            .with_experience(self.experience)
            .with_skill_points(self.skill_points)
    }

    /// Serialize to the stored JSON form.
    pub fn to_json(&self) -> PersistResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse a stored payload. A version other than [`CURRENT_VERSION`] is
    /// rejected before the body is interpreted.
    pub fn from_json(payload: &str) -> PersistResult<Self> {
        let header: RecordHeader = serde_json::from_str(payload)?;
        if header.version != serde_json::Value::from(CURRENT_VERSION) {
            return Err(PersistError::VersionMismatch {
                found: header.version.to_string(),
                expected: CURRENT_VERSION,
            });
        }
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use oq_core::skill::default_skills;
    use oq_core::{
        AreaSize, AreaState, ArmorSlot, CombatState, HeroState, ItemId, NavigationState,
        WeaponKind,
    };

    use super::*;

    fn state() -> HeroGameState {
        let stats = HeroStats::for_level(3).with_experience(250).with_skill_points(2);
        let mut hero = HeroState::new(stats, default_skills());
        hero.equip_weapon(Weapon::new(
            ItemId::from_random_bytes([1; 16]),
            "Goblin Iron Sword",
            WeaponKind::Sword,
            9,
        ));
        hero.equip_armor(Armor::new(
            ItemId::from_random_bytes([2; 16]),
            "Orc boots",
            ArmorSlot::Boots,
            4,
        ));
        let area = AreaState {
            current: NodeId::new("town_center"),
            size: AreaSize::new(30, 30),
            enemies_defeated: 17,
        };
        HeroGameState::new(
            hero,
            area,
            CombatState::new(1000.0),
            NavigationState::new(5.0),
        )
    }

    #[test]
    fn capture_takes_the_persisted_subset() {
        let saved = SavedProgress::capture(&state(), vec![NodeId::new("town_center")], Utc::now());
        assert_eq!(saved.hero_level, 3);
        assert_eq!(saved.experience, 250);
        assert_eq!(saved.skill_points, 2);
        assert_eq!(saved.enemies_defeated, 17);
        assert_eq!(saved.equipped_armor.len(), 1);
        assert_eq!(saved.version, CURRENT_VERSION);
    }

    #[test]
    fn json_uses_camel_case_fields() {
        let saved = SavedProgress::capture(&state(), Vec::new(), Utc::now());
        let json = saved.to_json().unwrap();
        for field in [
            "\"heroLevel\"",
            "\"skillPoints\"",
            "\"equippedWeapon\"",
            "\"equippedArmor\"",
            "\"enemiesDefeated\"",
            "\"lastSaved\"",
            "\"version\":1",
        ] {
            assert!(json.contains(field), "missing {field} in {json}");
        }
        assert_eq!(SavedProgress::from_json(&json).unwrap(), saved);
    }

    #[test]
    fn hero_stats_recomputes_derived_values() {
        let saved = SavedProgress::capture(&state(), Vec::new(), Utc::now());
        let stats = saved.hero_stats();
        assert_eq!(stats.max_health, 140);
        assert_eq!(stats.health, 140);
        assert_eq!(stats.attack, 14);
        assert_eq!(stats.defense, 7);
        assert_eq!(stats.experience_to_next, 300);
    }

    #[test]
    fn legacy_string_version_is_a_mismatch() {
        let payload = r#"{"hero":{"heroLevel":4},"lastSaved":1700000000000,"version":"1.0.0"}"#;
        match SavedProgress::from_json(payload) {
            Err(PersistError::VersionMismatch { found, expected }) => {
                assert_eq!(found, "\"1.0.0\"");
                assert_eq!(expected, CURRENT_VERSION);
            }
            other => panic!("expected version mismatch, got {other:?}"),
        }
    }

    #[test]
    fn areas_explored_defaults_when_missing() {
        let saved = SavedProgress::capture(&state(), vec![NodeId::new("x")], Utc::now());
        let mut value = serde_json::to_value(&saved).unwrap();
        value.as_object_mut().unwrap().remove("areasExplored");
        let parsed = SavedProgress::from_json(&value.to_string()).unwrap();
        assert!(parsed.areas_explored.is_empty());
    }

    #[test]
    fn garbage_is_malformed() {
        assert!(matches!(
            SavedProgress::from_json("not json"),
            Err(PersistError::Malformed(_))
        ));
    }
}
