use std::path::Path;

use colored::Colorize;

use oq_core::{SkillId, SystemClock};
use oq_hero::HeroConfig;

pub fn run(store: &Path, oath: &str, skill: &str) -> Result<(), String> {
    let mut manager =
        super::load_hero(store, oath, 0.0, SystemClock::shared(), HeroConfig::default())?;
    let cost = manager
        .try_unlock_skill(&SkillId::from(skill))
        .map_err(|e| format!("cannot unlock {skill}: {e}"))?;
    manager
        .save_now()
        .map_err(|e| format!("failed to save: {e}"))?;

    println!(
        "  {} {skill}  {}",
        "Unlocked".green().bold(),
        format!(
            "({cost} points spent, {} left)",
            manager.state().hero.stats.skill_points
        )
        .dimmed()
    );
    Ok(())
}
