//! Skill tree definitions and unlock rules.
//!
//! Skills form a directed acyclic graph through their prerequisite lists. A
//! skill can be unlocked only once its level gate, point cost, and every
//! prerequisite are satisfied. Effects are carried as data; nothing in the
//! core consumes them yet.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::SkillId;

/// What a skill effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillEffectKind {
    /// Outgoing damage.
    Damage,
    /// Defense.
    Defense,
    /// Maximum health.
    Health,
    /// Maximum stamina.
    Stamina,
    /// Attack cooldown.
    AttackSpeed,
}

/// A single modifier granted by a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillEffect {
    /// The modified quantity.
    #[serde(rename = "type")]
    pub kind: SkillEffectKind,
    /// Magnitude of the modifier.
    pub value: f64,
    /// Whether `value` is a percentage rather than a flat amount.
    pub is_percentage: bool,
}

impl SkillEffect {
    /// Flat modifier.
    pub fn flat(kind: SkillEffectKind, value: f64) -> Self {
        Self {
            kind,
            value,
            is_percentage: false,
        }
    }

    /// Percentage modifier.
    pub fn percent(kind: SkillEffectKind, value: f64) -> Self {
        Self {
            kind,
            value,
            is_percentage: true,
        }
    }
}

/// A node in the skill tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    /// Stable id.
    pub id: SkillId,
    /// Display name.
    pub name: String,
    /// Flavor text.
    pub description: String,
    /// Minimum hero level.
    pub required_level: u32,
    /// Skill points deducted on unlock.
    pub required_skill_points: u32,
    /// Skills that must already be unlocked.
    pub prerequisites: Vec<SkillId>,
    /// Modifiers granted once unlocked.
    pub effects: Vec<SkillEffect>,
    /// Whether the hero owns this skill.
    pub is_unlocked: bool,
}

/// Why a skill could not be unlocked.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkillRejection {
    /// No skill with this id exists.
    #[error("unknown skill: {0}")]
    UnknownSkill(SkillId),

    /// The skill is already owned.
    #[error("skill already unlocked: {0}")]
    AlreadyUnlocked(SkillId),

    /// The hero's level is below the skill's gate.
    #[error("requires hero level {required}")]
    LevelTooLow {
        /// The skill's level gate.
        required: u32,
    },

    /// Not enough unspent skill points.
    #[error("requires {required} skill points, {available} available")]
    InsufficientPoints {
        /// Point cost.
        required: u32,
        /// Points the hero has.
        available: u32,
    },

    /// A prerequisite is still locked.
    #[error("prerequisite not unlocked: {0}")]
    MissingPrerequisite(SkillId),
}

/// Check whether `id` can be unlocked. Returns the point cost on success.
///
/// Checks run in a fixed order: existence, ownership, level gate, point
/// cost, then prerequisites.
pub fn check_unlock(
    skills: &[Skill],
    id: &SkillId,
    level: u32,
    skill_points: u32,
) -> Result<u32, SkillRejection> {
    let skill = skills
        .iter()
        .find(|s| &s.id == id)
        .ok_or_else(|| SkillRejection::UnknownSkill(id.clone()))?;

    if skill.is_unlocked {
        return Err(SkillRejection::AlreadyUnlocked(id.clone()));
    }
    if level < skill.required_level {
        return Err(SkillRejection::LevelTooLow {
            required: skill.required_level,
        });
    }
    if skill_points < skill.required_skill_points {
        return Err(SkillRejection::InsufficientPoints {
            required: skill.required_skill_points,
            available: skill_points,
        });
    }
    for prereq in &skill.prerequisites {
        let unlocked = skills
            .iter()
            .find(|s| &s.id == prereq)
            .is_some_and(|s| s.is_unlocked);
        if !unlocked {
            return Err(SkillRejection::MissingPrerequisite(prereq.clone()));
        }
    }
    Ok(skill.required_skill_points)
}

/// The built-in skill tree.
pub fn default_skills() -> Vec<Skill> {
    vec![
        Skill {
            id: SkillId::from("basic_attack"),
            name: "Basic Attack".into(),
            description: "Basic melee attack".into(),
            required_level: 1,
            required_skill_points: 0,
            prerequisites: Vec::new(),
            effects: vec![SkillEffect::flat(SkillEffectKind::Damage, 10.0)],
            is_unlocked: true,
        },
        Skill {
            id: SkillId::from("power_strike"),
            name: "Power Strike".into(),
            description: "Stronger attack with higher damage".into(),
            required_level: 2,
            required_skill_points: 1,
            prerequisites: vec![SkillId::from("basic_attack")],
            effects: vec![SkillEffect::flat(SkillEffectKind::Damage, 25.0)],
            is_unlocked: false,
        },
        Skill {
            id: SkillId::from("defensive_stance"),
            name: "Defensive Stance".into(),
            description: "Increase defense temporarily".into(),
            required_level: 3,
            required_skill_points: 1,
            prerequisites: Vec::new(),
            effects: vec![SkillEffect::percent(SkillEffectKind::Defense, 20.0)],
            is_unlocked: false,
        },
    ]
}

/// Overlay saved skills onto the built-in tree by id.
///
/// Only the unlock flag is taken from the save, so renamed or rebalanced
/// skills keep their current definition. Saved skills that no longer exist
/// are dropped.
pub fn merge_saved(defaults: Vec<Skill>, saved: &[Skill]) -> Vec<Skill> {
    defaults
        .into_iter()
        .map(|mut skill| {
            if let Some(s) = saved.iter().find(|s| s.id == skill.id) {
                skill.is_unlocked = s.is_unlocked;
            }
            skill
        })
        .collect()
}

impl fmt::Display for Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_unlocked { "x" } else { " " };
        write!(
            f,
            "[{mark}] {} (lvl {}, {} pt)",
            self.name, self.required_level, self.required_skill_points
        )
    }
}
