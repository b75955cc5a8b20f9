//! Clock abstraction for timer-driven transitions.
//!
//! The engine never sleeps; it compares stored timestamps against whatever
//! clock it was given. Frontends hand it a monotonic wall clock, tests and
//! headless simulation hand it a manually-advanced one.

use std::time::Instant;

/// A source of milliseconds-since-start timestamps.
pub trait Clock {
    /// Milliseconds elapsed since the clock was created.
    fn now_ms(&self) -> u64;
}

/// Monotonic wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Create a clock anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Manually-advanced clock for tests, simulation, and replay.
///
/// Time only moves when [`ManualClock::advance`] or [`ManualClock::set`]
/// is called.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now_ms: u64,
}

impl ManualClock {
    /// Create a clock at time zero.
    #[must_use]
    pub const fn new() -> Self {
        Self { now_ms: 0 }
    }

    /// Advance the clock by `ms` milliseconds.
    pub const fn advance(&mut self, ms: u64) {
        self.now_ms = self.now_ms.saturating_add(ms);
    }

    /// Set the clock to an absolute timestamp.
    ///
    /// Setting the clock backwards is allowed; replay uses this when
    /// re-simulating from tap zero.
    pub const fn set(&mut self, ms: u64) {
        self.now_ms = ms;
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_starts_at_zero() {
        let clock = ManualClock::new();
        assert_eq!(clock.now_ms(), 0);
    }

    #[test]
    fn test_manual_clock_advance() {
        let mut clock = ManualClock::new();
        clock.advance(100);
        clock.advance(250);
        assert_eq!(clock.now_ms(), 350);
    }

    #[test]
    fn test_manual_clock_set() {
        let mut clock = ManualClock::new();
        clock.set(5000);
        assert_eq!(clock.now_ms(), 5000);
        clock.set(10);
        assert_eq!(clock.now_ms(), 10);
    }

    #[test]
    fn test_manual_clock_advance_saturates() {
        let mut clock = ManualClock::new();
        clock.set(u64::MAX - 1);
        clock.advance(100);
        assert_eq!(clock.now_ms(), u64::MAX);
    }

    #[test]
    fn test_system_clock_monotonic() {
        let clock = SystemClock::new();
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
    }
}
