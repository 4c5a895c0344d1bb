use std::path::Path;

use colored::Colorize;
use comfy_table::{ContentArrangement, Table};

use oq_core::SystemClock;
use oq_hero::HeroConfig;

pub fn run(store: &Path, oath: &str, willpower: f64) -> Result<(), String> {
    let manager = super::load_hero(
        store,
        oath,
        willpower,
        SystemClock::shared(),
        HeroConfig::default(),
    )?;
    let state = manager.state();
    let hero = &state.hero;
    let stats = &hero.stats;

    super::print_hero_line(hero);
    match manager.persistence().save_info() {
        Some(info) => println!(
            "  {}",
            format!(
                "saved {} (version {})",
                info.last_saved.as_deref().unwrap_or("?"),
                info.version
            )
            .dimmed()
        ),
        None => println!("  {}", "no save yet".dimmed()),
    }
    println!();

    let mut sheet = Table::new();
    sheet.set_content_arrangement(ContentArrangement::Dynamic);
    sheet.set_header(vec!["Stat", "Value"]);
    sheet.add_row(vec![
        "Health".to_string(),
        format!("{}/{}", stats.health, stats.max_health),
    ]);
    sheet.add_row(vec![
        "Attack".to_string(),
        format!("{} ({} with weapon)", stats.attack, hero.attack_power()),
    ]);
    sheet.add_row(vec![
        "Defense".to_string(),
        format!("{} ({} with armor)", stats.defense, hero.total_defense()),
    ]);
    sheet.add_row(vec![
        "Weapon".to_string(),
        hero.equipped_weapon.as_ref().map_or_else(
            || "--".to_string(),
            |w| format!("{} (+{}, mastery {}, {} kills)", w.name, w.damage, w.mastery_level, w.kills),
        ),
    ]);
    for armor in &hero.equipped_armor {
        sheet.add_row(vec![
            format!("Armor ({})", armor.slot),
            format!("{} (+{})", armor.name, armor.defense),
        ]);
    }
    sheet.add_row(vec![
        "Enemies defeated".to_string(),
        state.area.enemies_defeated.to_string(),
    ]);
    sheet.add_row(vec!["Area".to_string(), state.area.current.to_string()]);
    println!("{sheet}");
    println!();

    println!("  {}", "Skills".bold().underline());
    let mut skills = Table::new();
    skills.set_content_arrangement(ContentArrangement::Dynamic);
    skills.set_header(vec!["Skill", "Level", "Cost", "Status"]);
    for skill in &hero.skills {
        let status = if skill.is_unlocked {
            "unlocked".green()
        } else if stats.level < skill.required_level {
            "locked".dimmed()
        } else {
            "available".yellow()
        };
        skills.add_row(vec![
            format!("{} ({})", skill.name, skill.id),
            skill.required_level.to_string(),
            skill.required_skill_points.to_string(),
            status.to_string(),
        ]);
    }
    println!("{skills}");
    println!();

    let overworld = manager.overworld();
    let exploration = overworld.exploration_stats();
    println!("  {}", "Overworld".bold().underline());
    let mut nodes = Table::new();
    nodes.set_content_arrangement(ContentArrangement::Dynamic);
    nodes.set_header(vec!["Node", "Biome", "Level", "Danger", "Status", "Cleared"]);
    for node in overworld.nodes() {
        let status = if &node.id == overworld.current_area_id() {
            "here".cyan().bold()
        } else if !node.is_unlocked {
            "locked".dimmed()
        } else if node.is_explored {
            "explored".green()
        } else {
            "open".yellow()
        };
        let cleared = overworld
            .area(&node.id)
            .map_or_else(|| "--".to_string(), |a| a.clear_count.to_string());
        nodes.add_row(vec![
            format!("{} ({})", node.name, node.id),
            node.biome.to_string(),
            node.required_level.to_string(),
            node.danger_level.to_string(),
            status.to_string(),
            cleared,
        ]);
    }
    println!("{nodes}");
    println!();
    println!(
        "  {} discovered, {} cleared, {} available",
        exploration.discovered_areas, exploration.cleared_areas, exploration.available_nodes
    );

    Ok(())
}
