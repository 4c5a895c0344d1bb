use std::path::Path;

use colored::Colorize;

use oq_core::{NodeId, SystemClock};
use oq_hero::HeroConfig;

pub fn run(store: &Path, oath: &str, node: &str) -> Result<(), String> {
    let mut manager =
        super::load_hero(store, oath, 0.0, SystemClock::shared(), HeroConfig::default())?;
    let arrived = manager
        .travel(&NodeId::from(node))
        .map_err(|e| format!("cannot travel to {node}: {e}"))?;
    manager
        .save_now()
        .map_err(|e| format!("failed to save: {e}"))?;

    let name = manager
        .overworld()
        .node(&arrived)
        .map_or_else(|| arrived.to_string(), |n| n.name.clone());
    println!(
        "  {} {}  {}",
        "Traveled to".green().bold(),
        name,
        format!("({} enemies about)", manager.state().enemies.len()).dimmed()
    );
    Ok(())
}
