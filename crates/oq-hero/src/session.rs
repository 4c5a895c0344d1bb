use oq_core::SharedClock;
use oq_engine::{CallbackResult, FrameStats, Registration, Scheduler, SchedulerConfig};

use crate::error::HeroResult;
use crate::manager::HeroGameManager;

/// One hero game: a manager and the scheduler that ticks it.
///
/// The manager's `update` is the first update callback. Callbacks added with
/// [`on_update`](Self::on_update) run after it, against the same manager.
#[derive(Debug)]
pub struct HeroSession {
    scheduler: Scheduler<HeroGameManager>,
    manager: HeroGameManager,
}

impl HeroSession {
    /// Wrap `manager` with a scheduler reading `clock`. The loop starts
    /// stopped.
    pub fn new(manager: HeroGameManager, config: SchedulerConfig, clock: SharedClock) -> Self {
        let mut scheduler = Scheduler::new(config, clock);
        scheduler.on_update("hero", |manager: &mut HeroGameManager, dt| {
            manager.update(dt);
            Ok(())
        });
        Self { scheduler, manager }
    }

    /// Start ticking.
    pub fn start(&mut self) {
        self.scheduler.start();
    }

    /// Suspend simulation; frames still render.
    pub fn pause(&mut self) {
        self.scheduler.pause();
    }

    /// Resume simulation.
    pub fn resume(&mut self) {
        self.scheduler.resume();
    }

    /// Stop ticking.
    pub fn stop(&mut self) {
        self.scheduler.stop();
    }

    /// Run one display frame, then give the autosave a chance to run.
    /// Autosave is polled even while paused or stopped.
    pub fn frame(&mut self) -> Option<FrameStats> {
        let stats = self.scheduler.frame(&mut self.manager);
        self.manager.poll_autosave();
        stats
    }

    /// Register an extra update callback against the manager.
    pub fn on_update(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&mut HeroGameManager, f64) -> CallbackResult + 'static,
    ) -> Registration {
        self.scheduler.on_update(name, callback)
    }

    /// Register a render callback against the manager.
    pub fn on_render(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&HeroGameManager, f64, f64) -> CallbackResult + 'static,
    ) -> Registration {
        self.scheduler.on_render(name, callback)
    }

    /// The manager.
    pub fn manager(&self) -> &HeroGameManager {
        &self.manager
    }

    /// The manager, for direct input.
    pub fn manager_mut(&mut self) -> &mut HeroGameManager {
        &mut self.manager
    }

    /// The scheduler.
    pub fn scheduler(&self) -> &Scheduler<HeroGameManager> {
        &self.scheduler
    }

    /// Stop the loop and dispose the manager with a final save.
    pub fn dispose(&mut self) -> HeroResult<()> {
        self.scheduler.stop();
        self.manager.dispose()
    }
}
