use std::fmt;

use rand::SeedableRng;
use rand::rngs::StdRng;

use oq_core::skill::{self, SkillRejection};
use oq_core::{
    AreaSize, AreaState, CombatState, Enemy, EnemyId, EnemyKind, GameMode, HeroGameState,
    HeroState, HeroStats, NavigationNode, NavigationState, NodeId, OathRecord, Position,
    SharedClock, SkillId, base_hero_level,
};
use oq_overworld::OverworldManager;
use oq_persistence::{GamePersistence, SharedStore};

use crate::combat::{self, AttackOutcome};
use crate::config::HeroConfig;
use crate::error::{HeroResult, TravelRejection};
use crate::event::{InputEvent, Snapshot, StateChange};
use crate::observer::{Observers, SubscriptionId};

/// Distance under which the hero counts as arrived.
pub const ARRIVAL_EPSILON: f64 = 0.1;

/// Sole owner and mutator of one hero's game state.
///
/// Every public operation either mutates the state and notifies subscribers
/// with a [`Snapshot`], or rejects the request and leaves state untouched
/// with no notification.
pub struct HeroGameManager {
    config: HeroConfig,
    clock: SharedClock,
    rng: StdRng,
    state: HeroGameState,
    overworld: OverworldManager,
    persistence: GamePersistence,
    observers: Observers,
    next_enemy_id: u32,
    last_save_time: f64,
    disposed: bool,
}

impl fmt::Debug for HeroGameManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeroGameManager")
            .field("save_key", &self.persistence.key())
            .field("level", &self.state.hero.stats.level)
            .field("mode", &self.state.mode)
            .field("area", &self.state.area.current)
            .field("enemies", &self.state.enemies.len())
            .field("disposed", &self.disposed)
            .finish()
    }
}

impl HeroGameManager {
    /// Build the hero for `oath`, merging its accrued currency with any
    /// saved progress in `store`.
    ///
    /// The level is the higher of the currency-derived base level and the
    /// saved level, so elapsed real time never regresses earned progress.
    /// Without a save, skill points equal the level and experience equals
    /// the floored currency.
    pub fn new(
        oath: &impl OathRecord,
        store: SharedStore,
        clock: SharedClock,
        config: HeroConfig,
    ) -> Self {
        let persistence = GamePersistence::new(store, oath.id(), config.game_kind);
        let saved = persistence.load();
        let currency = oath.currency();

        let base_level = base_hero_level(currency);
        let level = saved
            .as_ref()
            .map_or(base_level, |s| base_level.max(s.hero_level));
        let skill_points = saved.as_ref().map_or(level, |s| s.skill_points);
        let experience = saved
            .as_ref()
            .map_or_else(|| floored_currency(currency), |s| s.experience);
        let stats = HeroStats::for_level(level)
            .with_experience(experience)
            .with_skill_points(skill_points);

        let saved_skills = saved.as_ref().map_or(&[][..], |s| s.skills.as_slice());
        let mut hero = HeroState::new(stats, skill::merge_saved(skill::default_skills(), saved_skills));
        if let Some(s) = &saved {
            hero.equipped_weapon = s.equipped_weapon.clone();
            for armor in &s.equipped_armor {
                hero.equip_armor(armor.clone());
            }
        }

        let mut overworld = OverworldManager::new(config.overworld.clone(), clock.clone());
        if let Some(s) = &saved {
            overworld.restore_discovered(&s.areas_explored);
        }
        overworld.check_node_unlocks(level);

        let area = AreaState {
            current: overworld.current_area_id().clone(),
            size: overworld
                .current_area()
                .map_or(AreaSize::new(0, 0), |a| a.size),
            enemies_defeated: saved.as_ref().map_or(0, |s| s.enemies_defeated),
        };
        let state = HeroGameState::new(
            hero,
            area,
            CombatState::new(config.attack_cooldown_ms),
            NavigationState::new(config.move_speed),
        );

        tracing::info!(
            oath = oath.id(),
            level,
            base_level,
            restored = saved.is_some(),
            "hero ready"
        );

        let last_save_time = clock.now_ms();
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            clock,
            state,
            overworld,
            persistence,
            observers: Observers::default(),
            next_enemy_id: 0,
            last_save_time,
            disposed: false,
        }
    }

    // -- Queries --

    /// The aggregate.
    pub fn state(&self) -> &HeroGameState {
        &self.state
    }

    /// The overworld.
    pub fn overworld(&self) -> &OverworldManager {
        &self.overworld
    }

    /// The save gateway.
    pub fn persistence(&self) -> &GamePersistence {
        &self.persistence
    }

    /// The active configuration.
    pub fn config(&self) -> &HeroConfig {
        &self.config
    }

    /// Whether [`dispose`](Self::dispose) has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// A snapshot of the current state with no changes attached.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshot_with(Vec::new())
    }

    fn snapshot_with(&self, changes: Vec<StateChange>) -> Snapshot {
        Snapshot {
            state: self.state.clone(),
            nodes: self.overworld.nodes().to_vec(),
            current_area: self.overworld.current_area().cloned(),
            changes,
        }
    }

    // -- Observers --

    /// Register a snapshot listener.
    pub fn subscribe(&mut self, listener: impl FnMut(&Snapshot) + 'static) -> SubscriptionId {
        self.observers.subscribe(listener)
    }

    /// Remove a snapshot listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn emit(&mut self, changes: Vec<StateChange>) {
        if changes.is_empty() || self.observers.is_empty() {
            return;
        }
        let snapshot = self.snapshot_with(changes);
        self.observers.notify(&snapshot);
    }

    // -- Movement --

    /// Head toward `target`. Movement happens in [`update`](Self::update).
    pub fn set_target_position(&mut self, target: Position) {
        self.state.navigation.target_position = Some(target);
        self.state.navigation.is_moving = true;
        self.emit(vec![StateChange::TargetSet { target }]);
    }

    // -- Combat --

    /// Attack an enemy.
    ///
    /// Unknown or dead targets and attacks inside the cooldown window are
    /// dropped without mutation or notification. A killing blow is resolved
    /// within the same call.
    pub fn attack_enemy(&mut self, id: EnemyId) -> AttackOutcome {
        let now = self.clock.now_ms();
        let Some(enemy) = self.state.enemy(id) else {
            return AttackOutcome::UnknownTarget;
        };
        if !enemy.is_alive {
            return AttackOutcome::AlreadyDead;
        }
        if !self.state.combat.can_attack(now) {
            return AttackOutcome::OnCooldown {
                remaining_ms: self.state.combat.cooldown_remaining(now),
            };
        }

        let damage = combat::damage(self.state.hero.attack_power(), enemy.level);
        let Some(enemy) = self.state.enemy_mut(id) else {
            return AttackOutcome::UnknownTarget;
        };
        let killed = enemy.take_damage(damage);
        let (kind, level, remaining_health) = (enemy.kind, enemy.level, enemy.health);

        let combat = &mut self.state.combat;
        combat.last_attack_time = Some(now);
        combat.is_in_combat = true;
        combat.target_enemy = Some(id);

        let mut changes = vec![StateChange::Attacked {
            enemy: id,
            damage,
            remaining_health,
        }];
        let outcome = if killed {
            let (experience, leveled_up) = self.resolve_kill(id, kind, level, &mut changes);
            AttackOutcome::Killed {
                damage,
                experience,
                leveled_up,
            }
        } else {
            AttackOutcome::Hit {
                damage,
                remaining_health,
            }
        };
        self.emit(changes);
        outcome
    }

    fn resolve_kill(
        &mut self,
        id: EnemyId,
        kind: EnemyKind,
        level: u32,
        changes: &mut Vec<StateChange>,
    ) -> (u64, bool) {
        self.state.area.enemies_defeated = self.state.area.enemies_defeated.saturating_add(1);
        let experience = combat::experience_for(level);
        let leveled_up = self.state.hero.stats.gain_experience(experience);
        changes.push(StateChange::EnemyDefeated {
            enemy: id,
            experience,
        });

        if let Some(weapon) = self.state.hero.equipped_weapon.as_mut() {
            weapon.record_kill();
        }

        let drops = combat::roll_drops(kind, level, &mut self.rng);
        if let Some(weapon) = drops.weapon {
            changes.push(StateChange::WeaponEquipped {
                name: weapon.name.clone(),
                damage: weapon.damage,
            });
            tracing::debug!(weapon = %weapon.name, "equipped dropped weapon");
            self.state.hero.equip_weapon(weapon);
        }
        if let Some(armor) = drops.armor {
            changes.push(StateChange::ArmorEquipped {
                name: armor.name.clone(),
                slot: armor.slot,
            });
            tracing::debug!(armor = %armor.name, "equipped dropped armor");
            self.state.hero.equip_armor(armor);
        }

        let hero_level = self.state.hero.stats.level;
        if leveled_up {
            tracing::info!(level = hero_level, "level up");
            changes.push(StateChange::LevelUp { level: hero_level });
            push_unlocks(changes, self.overworld.check_node_unlocks(hero_level));
        }

        let area = self.state.area.current.clone();
        if self.state.roster_cleared() && !OverworldManager::is_town_id(&area) {
            let unlocked = self.overworld.mark_area_cleared(&area, hero_level);
            changes.push(StateChange::AreaCleared { area });
            push_unlocks(changes, unlocked);
        }

        (experience, leveled_up)
    }

    /// Replace the roster with `enemies`, e.g. from a scripted encounter.
    pub fn replace_roster(&mut self, enemies: Vec<Enemy>) {
        if let Some(max) = enemies.iter().map(|e| e.id.0).max() {
            self.next_enemy_id = self.next_enemy_id.max(max.saturating_add(1));
        }
        let count = enemies.len();
        self.state.enemies = enemies;
        self.state.combat.disengage();
        self.emit(vec![StateChange::RosterSpawned { count }]);
    }

    // -- Skills --

    /// Unlock a skill. Returns false, leaving state untouched, when the
    /// skill is unknown, already owned, gated by level or points, or missing
    /// a prerequisite.
    pub fn unlock_skill(&mut self, id: &SkillId) -> bool {
        self.try_unlock_skill(id).is_ok()
    }

    /// Unlock a skill, reporting why it was refused. Returns the points
    /// spent.
    pub fn try_unlock_skill(&mut self, id: &SkillId) -> Result<u32, SkillRejection> {
        let stats = &self.state.hero.stats;
        let cost = skill::check_unlock(&self.state.hero.skills, id, stats.level, stats.skill_points)?;
        self.state.hero.stats.skill_points -= cost;
        if let Some(skill) = self.state.hero.skills.iter_mut().find(|s| &s.id == id) {
            skill.is_unlocked = true;
        }
        tracing::info!(skill = %id, cost, "skill unlocked");
        self.emit(vec![StateChange::SkillUnlocked {
            skill: id.clone(),
            cost,
        }]);
        Ok(cost)
    }

    // -- Overworld --

    /// Travel to an overworld node. Only possible outside combat mode.
    ///
    /// On success the hero is placed at the area origin, movement stops, and
    /// the roster is replaced by the area's own population.
    pub fn travel(&mut self, node: &NodeId) -> Result<NodeId, TravelRejection> {
        if self.state.mode == GameMode::Combat {
            return Err(TravelRejection::InCombat);
        }
        let hero_level = self.state.hero.stats.level;
        let arrived = self.overworld.travel_to(node, hero_level)?;

        let (size, population) = self
            .overworld
            .current_area()
            .map_or((AreaSize::new(0, 0), 0), |a| (a.size, a.enemy_count));
        self.state.area.current = arrived.clone();
        self.state.area.size = size;
        self.state.hero.position = self.overworld.player_position();
        self.state.navigation.halt();
        self.state.combat.disengage();
        self.state.enemies = combat::spawn_enemies(
            population as usize,
            hero_level,
            &mut self.rng,
            &mut self.next_enemy_id,
        );

        self.emit(vec![
            StateChange::Traveled {
                area: arrived.clone(),
            },
            StateChange::RosterSpawned { count: population as usize },
        ]);
        Ok(arrived)
    }

    // -- Modes --

    /// Switch modes. Entering combat spawns a fresh roster; leaving it drops
    /// the combat target. Setting the current mode again does nothing.
    pub fn set_mode(&mut self, mode: GameMode) {
        if self.state.mode == mode {
            return;
        }
        self.state.mode = mode;
        let mut changes = vec![StateChange::ModeChanged { mode }];
        match mode {
            GameMode::Combat => {
                let roster = combat::spawn_roster(
                    self.state.hero.stats.level,
                    &mut self.rng,
                    &mut self.next_enemy_id,
                );
                changes.push(StateChange::RosterSpawned {
                    count: roster.len(),
                });
                self.state.enemies = roster;
            }
            GameMode::Overworld => self.state.combat.disengage(),
        }
        self.emit(changes);
    }

    /// Shorthand for `set_mode(GameMode::Combat)`.
    pub fn enter_combat(&mut self) {
        self.set_mode(GameMode::Combat);
    }

    /// Shorthand for `set_mode(GameMode::Overworld)`.
    pub fn leave_combat(&mut self) {
        self.set_mode(GameMode::Overworld);
    }

    // -- Tick --

    /// Advance movement and reconcile combat by `dt_ms` of simulation time.
    pub fn update(&mut self, dt_ms: f64) {
        let mut changes = Vec::new();
        self.update_movement(dt_ms, &mut changes);
        self.update_combat(&mut changes);
        self.emit(changes);
    }

    fn update_movement(&mut self, dt_ms: f64, changes: &mut Vec<StateChange>) {
        let nav = &mut self.state.navigation;
        let hero = &mut self.state.hero;
        let Some(target) = nav.target_position else {
            return;
        };
        if !nav.is_moving {
            return;
        }
        let distance = hero.position.distance(&target);
        if distance < ARRIVAL_EPSILON {
            nav.halt();
            changes.push(StateChange::Arrived);
            return;
        }
        let step = nav.move_speed * dt_ms / 1000.0;
        if step <= 0.0 {
            return;
        }
        hero.position = if step >= distance {
            target
        } else {
            hero.position.lerp(&target, step / distance)
        };
        changes.push(StateChange::Moved {
            position: hero.position,
        });
    }

    fn update_combat(&mut self, changes: &mut Vec<StateChange>) {
        let Some(target) = self.state.combat.target_enemy else {
            return;
        };
        let alive = self.state.enemy(target).is_some_and(|e| e.is_alive);
        if !alive {
            self.state.combat.disengage();
            changes.push(StateChange::CombatReset);
        }
    }

    /// Apply an input event. Returns whether it changed anything.
    pub fn handle(&mut self, event: InputEvent) -> bool {
        match event {
            InputEvent::Attack { enemy } => self.attack_enemy(enemy).landed(),
            InputEvent::MoveTo { x, z } => {
                self.set_target_position(Position::new(x, z));
                true
            }
            InputEvent::Travel { node } => match self.travel(&node) {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!(node = %node, "travel refused: {e}");
                    false
                }
            },
        }
    }

    // -- Saving --

    /// Save if the autosave interval has elapsed since the last successful
    /// save. A failed save is logged and retried on the next poll. Returns
    /// whether a save was written.
    pub fn poll_autosave(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        let now = self.clock.now_ms();
        if now - self.last_save_time < self.config.autosave_interval_ms {
            return false;
        }
        match self.save_now() {
            Ok(()) => true,
            Err(e) => {
                tracing::error!("autosave failed: {e}");
                false
            }
        }
    }

    /// Save immediately.
    pub fn save_now(&mut self) -> HeroResult<()> {
        self.persistence.save(&self.state, self.overworld.discovered())?;
        self.last_save_time = self.clock.now_ms();
        Ok(())
    }

    /// Force a final save, stop autosaving, and drop every subscriber.
    /// Later calls do nothing.
    pub fn dispose(&mut self) -> HeroResult<()> {
        if self.disposed {
            return Ok(());
        }
        self.disposed = true;
        self.observers.clear();
        let result = self.save_now();
        if let Err(e) = &result {
            tracing::error!("final save failed: {e}");
        }
        result
    }
}

fn floored_currency(currency: f64) -> u64 {
    if currency.is_finite() && currency > 0.0 {
        currency.floor() as u64
    } else {
        0
    }
}

fn push_unlocks(changes: &mut Vec<StateChange>, unlocked: Vec<NavigationNode>) {
    if unlocked.is_empty() {
        return;
    }
    changes.push(StateChange::NodesUnlocked {
        nodes: unlocked.into_iter().map(|n| n.id).collect(),
    });
}
