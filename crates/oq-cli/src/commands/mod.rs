pub mod reset;
pub mod saves;
pub mod simulate;
pub mod status;
pub mod transfer;
pub mod travel;
pub mod unlock;

use std::path::Path;
use std::rc::Rc;

use chrono::Utc;
use colored::Colorize;

use oq_core::{HeroState, Oath, SharedClock};
use oq_hero::{HeroConfig, HeroGameManager};
use oq_persistence::{FileStore, GameKind, GamePersistence, SharedStore};

/// Open the save directory, creating it when missing.
fn open_store(dir: &Path) -> Result<SharedStore, String> {
    let store =
        FileStore::open(dir).map_err(|e| format!("cannot open store {}: {e}", dir.display()))?;
    Ok(Rc::new(store))
}

/// Stand-in for the habit tracker's oath record.
fn oath(id: &str, willpower: f64) -> Result<Oath, String> {
    Oath::new(id, "cli", Utc::now())
        .and_then(|o| o.with_willpower(willpower))
        .map_err(|e| e.to_string())
}

/// Build a manager for `oath_id` backed by the store at `dir`.
fn load_hero(
    dir: &Path,
    oath_id: &str,
    willpower: f64,
    clock: SharedClock,
    config: HeroConfig,
) -> Result<HeroGameManager, String> {
    let store = open_store(dir)?;
    let oath = oath(oath_id, willpower)?;
    Ok(HeroGameManager::new(&oath, store, clock, config))
}

/// Save gateway for the hero game of `oath_id`.
fn gateway(dir: &Path, oath_id: &str) -> Result<GamePersistence, String> {
    Ok(GamePersistence::new(open_store(dir)?, oath_id, GameKind::Hero))
}

fn print_hero_line(hero: &HeroState) {
    let stats = &hero.stats;
    println!(
        "  {} {}  {}",
        "Hero".bold(),
        format!("level {}", stats.level).green().bold(),
        format!(
            "({}/{} xp, {} skill points)",
            stats.experience, stats.experience_to_next, stats.skill_points
        )
        .dimmed()
    );
}
