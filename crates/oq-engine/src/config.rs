/// Configuration for a [`Scheduler`](crate::Scheduler).
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Length of one simulation step in milliseconds.
    pub fixed_timestep_ms: f64,
    /// A single frame's delta is clamped to this many fixed steps, so a
    /// long stall (suspended tab, debugger) cannot trigger runaway catch-up.
    pub max_steps_per_frame: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_timestep_ms: 1000.0 / 60.0,
            max_steps_per_frame: 3.0,
        }
    }
}

impl SchedulerConfig {
    /// Set the fixed step length in milliseconds. Non-positive values are
    /// ignored.
    pub fn with_fixed_timestep(mut self, ms: f64) -> Self {
        if ms > 0.0 && ms.is_finite() {
            self.fixed_timestep_ms = ms;
        }
        self
    }

    /// Set the catch-up clamp in steps per frame (at least 1).
    pub fn with_max_steps_per_frame(mut self, steps: f64) -> Self {
        if steps.is_finite() {
            self.max_steps_per_frame = steps.max(1.0);
        }
        self
    }

    /// Largest delta a single frame may contribute.
    pub fn max_frame_delta(&self) -> f64 {
        self.fixed_timestep_ms * self.max_steps_per_frame
    }

    /// Simulation steps per second.
    pub fn target_fps(&self) -> f64 {
        1000.0 / self.fixed_timestep_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_sixty_hz_with_triple_clamp() {
        let config = SchedulerConfig::default();
        assert!((config.target_fps() - 60.0).abs() < 1e-9);
        assert!((config.max_frame_delta() - 50.0).abs() < 1e-9);
    }

    #[test]
    fn builder_rejects_nonsense() {
        let config = SchedulerConfig::default()
            .with_fixed_timestep(-5.0)
            .with_max_steps_per_frame(0.2);
        assert!((config.fixed_timestep_ms - 1000.0 / 60.0).abs() < 1e-12);
        assert!((config.max_steps_per_frame - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn builder_chain() {
        let config = SchedulerConfig::default()
            .with_fixed_timestep(10.0)
            .with_max_steps_per_frame(5.0);
        assert!((config.target_fps() - 100.0).abs() < 1e-9);
        assert!((config.max_frame_delta() - 50.0).abs() < 1e-9);
    }
}
