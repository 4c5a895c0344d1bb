/// Configuration for an [`OverworldManager`](crate::OverworldManager).
#[derive(Debug, Clone, PartialEq)]
pub struct OverworldConfig {
    /// RNG seed for area generation.
    pub seed: u64,
    /// Minimum time between two successful travels, in ms.
    pub travel_cooldown_ms: f64,
}

impl Default for OverworldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            travel_cooldown_ms: 1000.0,
        }
    }
}

impl OverworldConfig {
    /// Set the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the travel cooldown in ms (negative values become 0).
    pub fn with_travel_cooldown(mut self, ms: f64) -> Self {
        self.travel_cooldown_ms = ms.max(0.0);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_default_values() {
        let config = OverworldConfig::default();
        assert_eq!(config.seed, 42);
        assert!((config.travel_cooldown_ms - 1000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn config_builder_chain() {
        let config = OverworldConfig::default()
            .with_seed(7)
            .with_travel_cooldown(-3.0);
        assert_eq!(config.seed, 7);
        assert_eq!(config.travel_cooldown_ms, 0.0);
    }
}
