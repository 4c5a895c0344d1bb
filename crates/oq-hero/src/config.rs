use oq_overworld::OverworldConfig;
use oq_persistence::GameKind;

/// Configuration for a [`HeroGameManager`](crate::HeroGameManager).
#[derive(Debug, Clone, PartialEq)]
pub struct HeroConfig {
    /// RNG seed for rosters and drops.
    pub seed: u64,
    /// Minimum time between two landed attacks, in ms.
    pub attack_cooldown_ms: f64,
    /// Hero movement speed in units per second.
    pub move_speed: f64,
    /// Interval between autosaves, in ms.
    pub autosave_interval_ms: f64,
    /// Which save slot the manager writes.
    pub game_kind: GameKind,
    /// Overworld settings.
    pub overworld: OverworldConfig,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            attack_cooldown_ms: 1000.0,
            move_speed: 5.0,
            autosave_interval_ms: 30_000.0,
            game_kind: GameKind::Hero,
            overworld: OverworldConfig::default(),
        }
    }
}

impl HeroConfig {
    /// Set the RNG seed. The overworld gets a seed derived from it.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.overworld.seed = seed.wrapping_add(1);
        self
    }

    /// Set the attack cooldown in ms.
    pub fn with_attack_cooldown(mut self, ms: f64) -> Self {
        self.attack_cooldown_ms = ms.max(0.0);
        self
    }

    /// Set the movement speed in units per second.
    pub fn with_move_speed(mut self, speed: f64) -> Self {
        self.move_speed = speed.max(0.0);
        self
    }

    /// Set the autosave interval in ms.
    pub fn with_autosave_interval(mut self, ms: f64) -> Self {
        self.autosave_interval_ms = ms.max(0.0);
        self
    }

    /// Set the save slot.
    pub fn with_game_kind(mut self, kind: GameKind) -> Self {
        self.game_kind = kind;
        self
    }

    /// Set the travel cooldown in ms.
    pub fn with_travel_cooldown(mut self, ms: f64) -> Self {
        self.overworld = self.overworld.with_travel_cooldown(ms);
        self
    }
}
