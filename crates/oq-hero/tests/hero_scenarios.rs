//! Integration tests for hero scenarios.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use chrono::{DateTime, Utc};
use oq_core::skill::default_skills;
use oq_core::{
    Armor, ArmorSlot, Enemy, EnemyId, EnemyKind, GameMode, ItemId, ManualClock, NodeId, Oath,
    Position, SkillId, SkillRejection,
};
use oq_engine::SchedulerConfig;
use oq_hero::{
    AttackOutcome, HeroConfig, HeroGameManager, HeroSession, InputEvent, Snapshot, StateChange,
    TravelRejection,
};
use oq_overworld::TravelError;
use oq_persistence::{
    CURRENT_VERSION, GameKind, GamePersistence, KeyValueStore, MemoryStore, PersistError,
    PersistResult, SavedProgress,
};

fn oath(willpower: f64) -> Oath {
    let start = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    Oath::new("oath-1", "morning run", start)
        .unwrap()
        .with_willpower(willpower)
        .unwrap()
}

fn manager_with(willpower: f64, store: &MemoryStore, clock: &ManualClock) -> HeroGameManager {
    HeroGameManager::new(
        &oath(willpower),
        store.shared(),
        clock.shared(),
        HeroConfig::default().with_seed(7),
    )
}

fn record(snapshots: &Rc<RefCell<Vec<Snapshot>>>) -> impl FnMut(&Snapshot) + 'static {
    let sink = Rc::clone(snapshots);
    move |s: &Snapshot| sink.borrow_mut().push(s.clone())
}

fn goblin(id: u32, level: u32) -> Enemy {
    Enemy::new(EnemyId(id), EnemyKind::Goblin, level, Position::new(1.0, 1.0))
}

fn seed_save(store: &MemoryStore, progress: SavedProgress) {
    GamePersistence::new(store.shared(), "oath-1", GameKind::Hero)
        .save_progress(&progress)
        .unwrap();
}

fn progress(level: u32, experience: u64, skill_points: u32) -> SavedProgress {
    SavedProgress {
        hero_level: level,
        experience,
        skill_points,
        skills: default_skills(),
        equipped_weapon: None,
        equipped_armor: Vec::new(),
        enemies_defeated: 0,
        areas_explored: Vec::new(),
        last_saved: Utc::now(),
        version: CURRENT_VERSION,
    }
}

#[test]
fn fresh_oath_starts_at_level_one() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let m = manager_with(0.0, &store, &clock);
    let stats = &m.state().hero.stats;
    assert_eq!(stats.level, 1);
    assert_eq!(stats.skill_points, 1);
    assert_eq!(stats.experience, 0);
    assert_eq!(stats.attack, 10);
    assert_eq!(stats.defense, 5);
    assert_eq!(stats.max_health, 100);
    assert!(m.state().hero.has_skill(&SkillId::from("basic_attack")));
}

#[test]
fn five_hits_kill_a_level_one_enemy() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    m.replace_roster(vec![goblin(0, 1)]);
    assert_eq!(m.state().enemies[0].health, 40);

    for expected in [32, 24, 16, 8] {
        let outcome = m.attack_enemy(EnemyId(0));
        assert_eq!(
            outcome,
            AttackOutcome::Hit {
                damage: 8,
                remaining_health: expected,
            }
        );
        clock.advance(1_000.0);
    }
    match m.attack_enemy(EnemyId(0)) {
        AttackOutcome::Killed {
            damage, experience, ..
        } => {
            assert_eq!(damage, 8);
            assert_eq!(experience, 10);
        }
        other => panic!("expected a kill, got {other:?}"),
    }
    let enemy = &m.state().enemies[0];
    assert_eq!(enemy.health, 0);
    assert!(!enemy.is_alive);
    assert_eq!(m.state().hero.stats.experience, 10);
    assert_eq!(m.state().area.enemies_defeated, 1);
}

#[test]
fn attacks_inside_cooldown_are_dropped() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    m.replace_roster(vec![goblin(0, 1)]);
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    m.subscribe(record(&snapshots));

    assert!(m.attack_enemy(EnemyId(0)).landed());
    clock.advance(999.0);
    match m.attack_enemy(EnemyId(0)) {
        AttackOutcome::OnCooldown { remaining_ms } => assert!((remaining_ms - 1.0).abs() < 1e-9),
        other => panic!("expected cooldown, got {other:?}"),
    }
    assert_eq!(m.state().enemies[0].health, 32);
    assert_eq!(snapshots.borrow().len(), 1);

    clock.advance(1.0);
    assert!(m.attack_enemy(EnemyId(0)).landed());
    assert_eq!(m.state().enemies[0].health, 24);
}

#[test]
fn dead_or_unknown_targets_change_nothing() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    let mut corpse = goblin(3, 1);
    corpse.take_damage(1_000);
    m.replace_roster(vec![corpse]);

    let snapshots = Rc::new(RefCell::new(Vec::new()));
    m.subscribe(record(&snapshots));
    let before = m.state().clone();

    assert_eq!(m.attack_enemy(EnemyId(3)), AttackOutcome::AlreadyDead);
    assert_eq!(m.attack_enemy(EnemyId(99)), AttackOutcome::UnknownTarget);
    assert!(!m.handle(InputEvent::Attack {
        enemy: EnemyId(99)
    }));
    assert_eq!(m.state(), &before);
    assert!(snapshots.borrow().is_empty());
}

#[test]
fn damage_never_drops_below_one() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    m.replace_roster(vec![goblin(0, 60)]);
    assert!(matches!(
        m.attack_enemy(EnemyId(0)),
        AttackOutcome::Hit { damage: 1, .. }
    ));
}

#[test]
fn kill_crossing_threshold_levels_up_once() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    // 95 willpower: level 1 with 95 experience.
    let mut m = manager_with(95.0, &store, &clock);
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    m.subscribe(record(&snapshots));

    let mut weak = goblin(0, 1);
    weak.health = 1;
    m.replace_roster(vec![weak]);
    let outcome = m.attack_enemy(EnemyId(0));
    assert!(matches!(
        outcome,
        AttackOutcome::Killed {
            leveled_up: true,
            ..
        }
    ));

    let stats = &m.state().hero.stats;
    assert_eq!(stats.level, 2);
    assert_eq!(stats.skill_points, 2);
    assert_eq!(stats.experience, 105);
    assert_eq!(stats.experience_to_next, 200);
    assert_eq!(stats.max_health, 120);
    assert_eq!(stats.health, 120);

    let last = snapshots.borrow().last().cloned().unwrap();
    assert!(last.has_change(|c| *c == StateChange::LevelUp { level: 2 }));
    assert!(last.has_change(|c| matches!(
        c,
        StateChange::NodesUnlocked { nodes } if nodes == &vec![NodeId::from("crystal_lake")]
    )));
    assert!(
        m.overworld()
            .node(&NodeId::from("crystal_lake"))
            .unwrap()
            .is_unlocked
    );
}

#[test]
fn large_experience_gain_grants_a_single_level() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    let mut brute = goblin(0, 50);
    brute.health = 1;
    m.replace_roster(vec![brute]);
    m.attack_enemy(EnemyId(0));
    let stats = &m.state().hero.stats;
    assert_eq!(stats.experience, 500);
    assert_eq!(stats.level, 2);
}

#[test]
fn prerequisite_blocks_unlock() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut saved = progress(3, 300, 2);
    saved.skills[0].is_unlocked = false;
    seed_save(&store, saved);

    let mut m = manager_with(0.0, &store, &clock);
    let power_strike = SkillId::from("power_strike");
    assert_eq!(
        m.try_unlock_skill(&power_strike),
        Err(SkillRejection::MissingPrerequisite(SkillId::from("basic_attack")))
    );
    assert!(!m.unlock_skill(&power_strike));
    assert_eq!(m.state().hero.stats.skill_points, 2);

    assert!(m.unlock_skill(&SkillId::from("basic_attack")));
    assert!(m.unlock_skill(&power_strike));
    assert_eq!(m.state().hero.stats.skill_points, 1);
    assert_eq!(
        m.try_unlock_skill(&power_strike),
        Err(SkillRejection::AlreadyUnlocked(power_strike.clone()))
    );
}

#[test]
fn unlock_gates_on_level_and_points() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    assert_eq!(
        m.try_unlock_skill(&SkillId::from("power_strike")),
        Err(SkillRejection::LevelTooLow { required: 2 })
    );
    assert_eq!(
        m.try_unlock_skill(&SkillId::from("fireball")),
        Err(SkillRejection::UnknownSkill(SkillId::from("fireball")))
    );

    seed_save(&store, progress(3, 300, 0));
    let mut m = manager_with(0.0, &store, &clock);
    assert_eq!(
        m.try_unlock_skill(&SkillId::from("defensive_stance")),
        Err(SkillRejection::InsufficientPoints {
            required: 1,
            available: 0,
        })
    );
}

#[test]
fn locked_travel_keeps_current_area() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    let before = m.state().area.current.clone();
    assert_eq!(
        m.travel(&NodeId::from("storm_peaks")),
        Err(TravelRejection::Overworld(TravelError::Locked(NodeId::from(
            "storm_peaks"
        ))))
    );
    assert_eq!(m.state().area.current, before);
    assert_eq!(m.overworld().current_area_id(), &before);
}

#[test]
fn travel_is_refused_in_combat() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    m.enter_combat();
    assert_eq!(m.state().mode, GameMode::Combat);
    assert_eq!(
        m.travel(&NodeId::from("whispering_woods")),
        Err(TravelRejection::InCombat)
    );
    m.leave_combat();
    assert!(m.state().combat.target_enemy.is_none());
    assert!(m.travel(&NodeId::from("whispering_woods")).is_ok());
}

#[test]
fn clearing_an_area_is_recorded() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    m.set_target_position(Position::new(5.0, 5.0));
    let woods = NodeId::from("whispering_woods");
    assert!(m.handle(InputEvent::Travel { node: woods.clone() }));

    assert_eq!(m.state().area.current, woods);
    assert_eq!(m.state().hero.position, Position::ORIGIN);
    assert!(!m.state().navigation.is_moving);
    let area = m.overworld().current_area().unwrap().clone();
    assert_eq!(m.state().area.size, area.size);
    assert_eq!(m.state().enemies.len(), area.enemy_count as usize);

    let snapshots = Rc::new(RefCell::new(Vec::new()));
    m.subscribe(record(&snapshots));
    let ids: Vec<EnemyId> = m.state().enemies.iter().map(|e| e.id).collect();
    for id in ids {
        while m.state().enemy(id).is_some_and(|e| e.is_alive) {
            clock.advance(1_000.0);
            assert!(m.attack_enemy(id).landed());
        }
    }

    assert_eq!(m.overworld().area(&woods).unwrap().clear_count, 1);
    let last = snapshots.borrow().last().cloned().unwrap();
    assert!(last.has_change(|c| *c == StateChange::AreaCleared { area: woods.clone() }));
    assert_eq!(last.current_area.unwrap().clear_count, 1);
}

#[test]
fn saved_level_beats_lower_currency_and_currency_raises_floor() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    seed_save(&store, progress(5, 480, 0));

    let m = manager_with(120.0, &store, &clock);
    assert_eq!(m.state().hero.stats.level, 5);
    assert_eq!(m.state().hero.stats.experience, 480);
    assert_eq!(m.state().hero.stats.skill_points, 0);

    let m = manager_with(1_050.0, &store, &clock);
    assert_eq!(m.state().hero.stats.level, 11);
    assert_eq!(m.state().hero.stats.skill_points, 0);
}

#[test]
fn mismatched_save_version_starts_fresh() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut saved = progress(9, 900, 4);
    saved.version = CURRENT_VERSION + 1;
    seed_save(&store, saved);

    let m = manager_with(0.0, &store, &clock);
    assert_eq!(m.state().hero.stats.level, 1);
    assert_eq!(m.state().hero.stats.skill_points, 1);
}

#[test]
fn enormous_willpower_caps_the_level_and_keeps_playing() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(1e12, &store, &clock);
    let hero = &m.state().hero;
    assert_eq!(hero.stats.level, u32::MAX);
    assert_eq!(hero.stats.attack, u32::MAX);
    assert_eq!(hero.attack_power(), u32::MAX);
    assert_eq!(hero.total_defense(), u32::MAX);

    m.enter_combat();
    assert!(!m.state().enemies.is_empty());
    assert!(m.state().enemies.iter().all(|e| e.level >= u32::MAX - 1));
    let first = m.state().enemies[0].id;
    assert!(matches!(
        m.attack_enemy(first),
        AttackOutcome::Hit { damage: 1, .. }
    ));

    m.replace_roster(vec![goblin(900, 1)]);
    clock.advance(1_000.0);
    match m.attack_enemy(EnemyId(900)) {
        AttackOutcome::Killed { leveled_up, .. } => assert!(leveled_up),
        other => panic!("expected a kill, got {other:?}"),
    }
    assert_eq!(m.state().hero.stats.level, u32::MAX);
    m.save_now().unwrap();
}

#[test]
fn restored_armor_keeps_one_piece_per_slot() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut saved = progress(1, 0, 1);
    saved.equipped_armor = vec![
        Armor::new(ItemId::from_random_bytes([1; 16]), "Leather Cap", ArmorSlot::Helmet, 3),
        Armor::new(ItemId::from_random_bytes([2; 16]), "Iron Helm", ArmorSlot::Helmet, 9),
    ];
    seed_save(&store, saved);

    let m = manager_with(0.0, &store, &clock);
    let hero = &m.state().hero;
    assert_eq!(hero.equipped_armor.len(), 1);
    assert_eq!(hero.armor_in(ArmorSlot::Helmet).map(|a| a.defense), Some(9));
    assert_eq!(hero.total_defense(), 5 + 9);
}

#[test]
fn save_and_reload_round_trips_progress() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(250.0, &store, &clock);
    m.travel(&NodeId::from("whispering_woods")).unwrap();
    let first = m.state().enemies[0].id;
    while m.state().enemy(first).is_some_and(|e| e.is_alive) {
        clock.advance(1_000.0);
        m.attack_enemy(first);
    }
    m.unlock_skill(&SkillId::from("power_strike"));
    m.save_now().unwrap();

    let before = m.state().hero.clone();
    let defeated = m.state().area.enemies_defeated;
    let reloaded = manager_with(0.0, &store, &clock);
    let hero = &reloaded.state().hero;
    assert_eq!(hero.stats.level, before.stats.level);
    assert_eq!(hero.stats.experience, before.stats.experience);
    assert_eq!(hero.stats.skill_points, before.stats.skill_points);
    assert_eq!(hero.equipped_weapon, before.equipped_weapon);
    assert_eq!(hero.equipped_armor, before.equipped_armor);
    assert_eq!(hero.skills, before.skills);
    assert_eq!(reloaded.state().area.enemies_defeated, defeated);
    assert!(
        reloaded
            .overworld()
            .discovered()
            .contains(&NodeId::from("whispering_woods"))
    );
}

#[test]
fn autosave_waits_for_interval() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    clock.advance(29_999.0);
    assert!(!m.poll_autosave());
    assert!(!m.persistence().has_save());
    clock.advance(1.0);
    assert!(m.poll_autosave());
    assert!(m.persistence().has_save());
    assert!(!m.poll_autosave());
}

#[derive(Debug, Default)]
struct FlakyStore {
    inner: MemoryStore,
    failing: Cell<bool>,
    writes: Cell<u32>,
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> PersistResult<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> PersistResult<()> {
        self.writes.set(self.writes.get() + 1);
        if self.failing.get() {
            return Err(PersistError::Io(std::io::Error::other("disk full")));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> PersistResult<()> {
        self.inner.remove(key)
    }

    fn keys(&self) -> PersistResult<Vec<String>> {
        self.inner.keys()
    }
}

#[test]
fn failed_autosave_is_retried_and_play_continues() {
    let store = Rc::new(FlakyStore::default());
    store.failing.set(true);
    let clock = ManualClock::new();
    let mut m = HeroGameManager::new(
        &oath(0.0),
        store.clone(),
        clock.shared(),
        HeroConfig::default(),
    );
    m.replace_roster(vec![goblin(0, 1)]);

    clock.advance(30_000.0);
    assert!(!m.poll_autosave());
    assert!(m.attack_enemy(EnemyId(0)).landed());
    assert!(!m.poll_autosave());
    assert_eq!(store.writes.get(), 2);

    store.failing.set(false);
    assert!(m.poll_autosave());
    assert!(store.inner.get("oathquest_game_oath-1_hero").unwrap().is_some());
}

#[test]
fn dispose_forces_a_final_save_once() {
    let store = Rc::new(FlakyStore::default());
    let clock = ManualClock::new();
    let mut m = HeroGameManager::new(
        &oath(0.0),
        store.clone(),
        clock.shared(),
        HeroConfig::default(),
    );
    m.dispose().unwrap();
    assert!(m.is_disposed());
    assert_eq!(store.writes.get(), 1);

    m.dispose().unwrap();
    clock.advance(60_000.0);
    assert!(!m.poll_autosave());
    assert_eq!(store.writes.get(), 1);
}

#[test]
fn unsubscribed_listener_hears_nothing() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let mut m = manager_with(0.0, &store, &clock);
    let snapshots = Rc::new(RefCell::new(Vec::new()));
    let id = m.subscribe(record(&snapshots));
    m.set_target_position(Position::new(1.0, 0.0));
    assert!(m.unsubscribe(id));
    m.set_target_position(Position::new(2.0, 0.0));
    assert_eq!(snapshots.borrow().len(), 1);
    assert!(
        snapshots.borrow()[0]
            .has_change(|c| matches!(c, StateChange::TargetSet { .. }))
    );
}

#[test]
fn snapshot_serializes_to_camel_case_json() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let m = manager_with(0.0, &store, &clock);
    let json = serde_json::to_string(&m.snapshot()).unwrap();
    assert!(json.contains("\"currentArea\""));
    assert!(json.contains("\"enemiesDefeated\""));
    assert!(json.contains("\"mode\":\"overworld\""));
}

#[test]
fn session_ticks_movement_and_autosaves() {
    let store = MemoryStore::new();
    let clock = ManualClock::new();
    let manager = HeroGameManager::new(
        &oath(0.0),
        store.shared(),
        clock.shared(),
        HeroConfig::default().with_autosave_interval(1_000.0),
    );
    let mut session = HeroSession::new(manager, SchedulerConfig::default(), clock.shared());
    let ticks = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&ticks);
    session.on_update("watcher", move |_, _| {
        counter.set(counter.get() + 1);
        Ok(())
    });

    session.start();
    session
        .manager_mut()
        .handle(InputEvent::MoveTo { x: 3.0, z: 4.0 });
    for _ in 0..120 {
        clock.advance(1000.0 / 60.0);
        session.frame();
    }
    let m = session.manager();
    assert_eq!(m.state().hero.position, Position::new(3.0, 4.0));
    assert!(!m.state().navigation.is_moving);
    assert!((118..=120).contains(&ticks.get()));
    assert!(m.persistence().has_save());

    session.manager_mut().set_target_position(Position::new(-3.0, 0.0));
    session.pause();
    for _ in 0..30 {
        clock.advance(1000.0 / 60.0);
        assert_eq!(session.frame().unwrap().steps, 0);
    }
    assert_eq!(session.manager().state().hero.position, Position::new(3.0, 4.0));

    session.dispose().unwrap();
    assert!(session.manager().is_disposed());
    assert!(!session.scheduler().is_running());
}
