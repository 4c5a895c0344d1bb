//! Clock abstraction for deterministic timing.
//!
//! Every time-dependent rule (scheduler deltas, attack cooldowns, travel
//! throttling, autosave intervals) reads milliseconds from a [`Clock`]. Tests
//! and the headless runner drive a [`ManualClock`]; interactive hosts use
//! [`SystemClock`].

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

/// A monotonic millisecond time source.
pub trait Clock: fmt::Debug {
    /// Milliseconds since an arbitrary fixed origin.
    fn now_ms(&self) -> f64;
}

/// Clock shared between the components of one game session.
pub type SharedClock = Rc<dyn Clock>;

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Start a clock at 0 ms.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Convenience: a new system clock behind a [`SharedClock`].
    pub fn shared() -> SharedClock {
        Rc::new(Self::new())
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    /// A clock at 0 ms.
    pub fn new() -> Self {
        Self::default()
    }

    /// A clock at `ms`.
    pub fn starting_at(ms: f64) -> Self {
        let clock = Self::new();
        clock.set(ms);
        clock
    }

    /// Jump to `ms`.
    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    /// Move forward by `ms`.
    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }

    /// This clock behind a [`SharedClock`], still controlled through `self`.
    pub fn shared(&self) -> SharedClock {
        Rc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let shared = clock.shared();
        clock.advance(16.5);
        clock.advance(3.5);
        assert!((shared.now_ms() - 20.0).abs() < f64::EPSILON);
        clock.set(5.0);
        assert!((shared.now_ms() - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
