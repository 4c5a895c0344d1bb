use std::fmt;

use oq_core::time::SharedClock;

use crate::callbacks::{CallbackList, Registration};
use crate::config::SchedulerConfig;
use crate::error::CallbackResult;

/// Update callback: receives the driven context and the fixed step in ms.
pub type UpdateFn<C> = Box<dyn FnMut(&mut C, f64) -> CallbackResult>;
/// Render callback: receives the context, the frame delta in ms, and the
/// interpolation fraction.
pub type RenderFn<C> = Box<dyn FnMut(&C, f64, f64) -> CallbackResult>;

/// Lifecycle of a scheduler. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// No frames run.
    Stopped,
    /// Updates and renders run.
    Running,
    /// Renders run, updates are suspended.
    Paused,
}

/// What one frame did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStats {
    /// Clamped wall-clock delta in ms.
    pub delta: f64,
    /// Fixed steps drained this frame.
    pub steps: u32,
    /// Interpolation fraction handed to render callbacks.
    pub alpha: f64,
}

/// Fixed-timestep update/render loop, generic over the context `C` it
/// drives.
///
/// The host calls [`frame`](Self::frame) once per display frame. Update
/// callbacks always drain before any render callback of the same frame, so
/// simulation time never outpaces render time.
pub struct Scheduler<C> {
    config: SchedulerConfig,
    clock: SharedClock,
    state: SchedulerState,
    last_time: f64,
    accumulator: f64,
    frame_handle: Option<u64>,
    next_handle: u64,
    frames: u64,
    total_steps: u64,
    updates: CallbackList<UpdateFn<C>>,
    renders: CallbackList<RenderFn<C>>,
}

impl<C> fmt::Debug for Scheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("state", &self.state)
            .field("frames", &self.frames)
            .field("steps", &self.total_steps)
            .field("updates", &self.updates.live_count())
            .field("renders", &self.renders.live_count())
            .finish()
    }
}

impl<C> Scheduler<C> {
    /// Create a stopped scheduler reading time from `clock`.
    pub fn new(config: SchedulerConfig, clock: SharedClock) -> Self {
        Self {
            config,
            clock,
            state: SchedulerState::Stopped,
            last_time: 0.0,
            accumulator: 0.0,
            frame_handle: None,
            next_handle: 0,
            frames: 0,
            total_steps: 0,
            updates: CallbackList::new(),
            renders: CallbackList::new(),
        }
    }

    /// Begin the loop. No-op if already running or paused.
    pub fn start(&mut self) {
        if self.state != SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Running;
        self.last_time = self.clock.now_ms();
        self.accumulator = 0.0;
        self.frame_handle = Some(self.next_handle);
        self.next_handle += 1;
        tracing::debug!(handle = self.next_handle - 1, "scheduler started");
    }

    /// Halt the loop and release the frame handle. No-op if stopped.
    pub fn stop(&mut self) {
        if self.state == SchedulerState::Stopped {
            return;
        }
        self.state = SchedulerState::Stopped;
        self.frame_handle = None;
        tracing::debug!(frames = self.frames, "scheduler stopped");
    }

    /// Suspend fixed updates; rendering continues. Only meaningful while
    /// running.
    pub fn pause(&mut self) {
        if self.state == SchedulerState::Running {
            self.state = SchedulerState::Paused;
        }
    }

    /// Resume fixed updates. Resynchronizes the clock so the paused interval
    /// is not replayed as one large delta. Starts the loop if stopped.
    pub fn resume(&mut self) {
        match self.state {
            SchedulerState::Stopped => self.start(),
            SchedulerState::Paused => {
                self.state = SchedulerState::Running;
                self.last_time = self.clock.now_ms();
            }
            SchedulerState::Running => {}
        }
    }

    /// Register an update callback. Callbacks run in registration order.
    pub fn on_update(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&mut C, f64) -> CallbackResult + 'static,
    ) -> Registration {
        self.updates.register(name.into(), Box::new(callback))
    }

    /// Register a render callback.
    pub fn on_render(
        &mut self,
        name: impl Into<String>,
        callback: impl FnMut(&C, f64, f64) -> CallbackResult + 'static,
    ) -> Registration {
        self.renders.register(name.into(), Box::new(callback))
    }

    /// Run one display frame. Returns `None` while stopped.
    pub fn frame(&mut self, ctx: &mut C) -> Option<FrameStats> {
        self.frame_handle?;

        let now = self.clock.now_ms();
        let delta = (now - self.last_time).max(0.0);
        self.last_time = now;
        let clamped = delta.min(self.config.max_frame_delta());
        let step = self.config.fixed_timestep_ms;

        let mut steps = 0;
        let paused = self.state == SchedulerState::Paused;
        if !paused {
            self.accumulator += clamped;
            while self.accumulator >= step {
                self.run_updates(ctx, step);
                self.accumulator -= step;
                steps += 1;
            }
        }

        let alpha = if paused { 0.0 } else { self.accumulator / step };
        self.run_renders(ctx, clamped, alpha);

        self.updates.sweep();
        self.renders.sweep();
        self.frames += 1;
        self.total_steps += u64::from(steps);

        Some(FrameStats {
            delta: clamped,
            steps,
            alpha,
        })
    }

    fn run_updates(&mut self, ctx: &mut C, step: f64) {
        for slot in self.updates.slots_mut() {
            if !slot.is_live() {
                continue;
            }
            if let Err(e) = (slot.callback)(ctx, step) {
                tracing::error!(callback = %slot.name, error = %e, "update callback failed");
            }
        }
    }

    fn run_renders(&mut self, ctx: &C, delta: f64, alpha: f64) {
        for slot in self.renders.slots_mut() {
            if !slot.is_live() {
                continue;
            }
            if let Err(e) = (slot.callback)(ctx, delta, alpha) {
                tracing::error!(callback = %slot.name, error = %e, "render callback failed");
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether the loop is running (paused counts as running).
    pub fn is_running(&self) -> bool {
        self.state != SchedulerState::Stopped
    }

    /// Whether fixed updates are suspended.
    pub fn is_paused(&self) -> bool {
        self.state == SchedulerState::Paused
    }

    /// Fixed step length in ms.
    pub fn fixed_timestep(&self) -> f64 {
        self.config.fixed_timestep_ms
    }

    /// Simulation steps per second.
    pub fn target_fps(&self) -> f64 {
        self.config.target_fps()
    }

    /// Undrained time in ms, always below one fixed step after a frame.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Frames run since construction.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Fixed steps run since construction.
    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    /// Live update callbacks.
    pub fn update_count(&self) -> usize {
        self.updates.live_count()
    }

    /// Live render callbacks.
    pub fn render_count(&self) -> usize {
        self.renders.live_count()
    }
}
