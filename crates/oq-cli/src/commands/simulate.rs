use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use colored::{ColoredString, Colorize};
use comfy_table::{ContentArrangement, Table};

use oq_core::{Clock, GameMode, ManualClock};
use oq_engine::SchedulerConfig;
use oq_hero::{HeroConfig, HeroGameManager, HeroSession, StateChange};

/// Distance at which the autopilot stops walking and swings.
const STRIKE_RANGE: f64 = 1.5;

pub fn run(
    store: &Path,
    oath: &str,
    willpower: f64,
    seconds: u64,
    seed: u64,
    verbose: bool,
) -> Result<(), String> {
    let clock = ManualClock::new();
    let config = HeroConfig::default().with_seed(seed);
    let mut manager = super::load_hero(store, oath, willpower, clock.shared(), config)?;
    let start_level = manager.state().hero.stats.level;
    let start_defeated = manager.state().area.enemies_defeated;

    // Notable changes, stamped with simulated seconds.
    let log: Rc<RefCell<Vec<(f64, StateChange)>>> = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    let stamp = clock.clone();
    manager.subscribe(move |snapshot| {
        let at = stamp.now_ms() / 1000.0;
        let mut sink = sink.borrow_mut();
        for change in snapshot.changes.iter().filter(|c| is_notable(c)) {
            sink.push((at, change.clone()));
        }
    });

    let scheduler = SchedulerConfig::default();
    let frame_ms = 1000.0 / scheduler.target_fps();
    let frames = seconds.saturating_mul(scheduler.target_fps().round() as u64);

    let mut session = HeroSession::new(manager, scheduler, clock.shared());
    session.on_update("autopilot", |manager, _| {
        autopilot(manager);
        Ok(())
    });
    session.start();
    for _ in 0..frames {
        clock.advance(frame_ms);
        session.frame();
    }
    session
        .dispose()
        .map_err(|e| format!("failed to save: {e}"))?;

    let manager = session.manager();
    let state = manager.state();
    tracing::info!(
        oath,
        frames,
        steps = session.scheduler().total_steps(),
        level = state.hero.stats.level,
        "simulation finished"
    );
    let hero = &state.hero;
    let log = log.borrow();

    println!(
        "  {} '{}' {}",
        "Simulation".bold(),
        oath,
        format!("({seconds}s, seed={seed}, {} frames)", session.scheduler().frames()).dimmed()
    );
    println!(
        "  {} updates run, {} notable events",
        session.scheduler().total_steps(),
        log.len()
    );
    println!();

    if verbose {
        println!("  {}", "Event Log".bold().underline());
        println!();
        for (at, change) in log.iter() {
            let label = format!("[{at:>7.2}s]").dimmed();
            println!("  {label} {}", describe(change));
        }
        if log.is_empty() {
            println!("  {}", "(no events)".dimmed());
        }
        println!();
    }

    println!("  {}", "Hero".bold().underline());
    println!();

    let stats = &hero.stats;
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Stat", "Value"]);
    table.add_row(vec![
        "Level".to_string(),
        if stats.level > start_level {
            format!("{start_level} -> {}", stats.level)
        } else {
            stats.level.to_string()
        },
    ]);
    table.add_row(vec![
        "Experience".to_string(),
        format!("{}/{}", stats.experience, stats.experience_to_next),
    ]);
    table.add_row(vec![
        "Skill points".to_string(),
        stats.skill_points.to_string(),
    ]);
    table.add_row(vec![
        "Enemies defeated".to_string(),
        format!(
            "{} (+{})",
            state.area.enemies_defeated,
            state.area.enemies_defeated - start_defeated
        ),
    ]);
    table.add_row(vec![
        "Weapon".to_string(),
        hero.equipped_weapon
            .as_ref()
            .map_or_else(|| "--".to_string(), |w| format!("{} (+{})", w.name, w.damage)),
    ]);
    table.add_row(vec![
        "Armor".to_string(),
        if hero.equipped_armor.is_empty() {
            "--".to_string()
        } else {
            hero.equipped_armor
                .iter()
                .map(|a| a.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        },
    ]);
    println!("{table}");
    println!();
    println!("  {}", "Progress saved.".dimmed());

    Ok(())
}

/// Keep a combat roster up, walk to the nearest living enemy and hit it.
fn autopilot(manager: &mut HeroGameManager) {
    if manager.state().mode != GameMode::Combat {
        manager.enter_combat();
    } else if manager.state().roster_cleared() {
        manager.leave_combat();
        manager.enter_combat();
    }

    let hero = manager.state().hero.position;
    let Some((id, target)) = manager
        .state()
        .nearest_living_enemy(&hero)
        .map(|e| (e.id, e.position))
    else {
        return;
    };
    if hero.distance(&target) > STRIKE_RANGE {
        if manager.state().navigation.target_position != Some(target) {
            manager.set_target_position(target);
        }
    } else {
        manager.attack_enemy(id);
    }
}

fn is_notable(change: &StateChange) -> bool {
    matches!(
        change,
        StateChange::EnemyDefeated { .. }
            | StateChange::LevelUp { .. }
            | StateChange::WeaponEquipped { .. }
            | StateChange::ArmorEquipped { .. }
            | StateChange::NodesUnlocked { .. }
            | StateChange::AreaCleared { .. }
            | StateChange::RosterSpawned { .. }
    )
}

fn describe(change: &StateChange) -> ColoredString {
    match change {
        StateChange::EnemyDefeated { enemy, experience } => {
            format!("enemy {enemy} defeated (+{experience} xp)").normal()
        }
        StateChange::LevelUp { level } => format!("reached level {level}").green().bold(),
        StateChange::WeaponEquipped { name, damage } => {
            format!("equipped {name} (+{damage})").cyan()
        }
        StateChange::ArmorEquipped { name, slot } => format!("equipped {name} ({slot})").cyan(),
        StateChange::NodesUnlocked { nodes } => {
            let names: Vec<String> = nodes.iter().map(ToString::to_string).collect();
            format!("unlocked {}", names.join(", ")).yellow()
        }
        StateChange::AreaCleared { area } => format!("cleared {area}").yellow().bold(),
        StateChange::RosterSpawned { count } => format!("{count} enemies appear").blue(),
        other => format!("{other:?}").dimmed(),
    }
}
