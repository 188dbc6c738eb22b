//! Engine time model.
//!
//! # Design
//!
//! Time advances in discrete ticks.  Every tick the scheduler runs the
//! action list, routes events and updates the active behavior exactly once.
//! The mapping to seconds is held in `EngineClock`:
//!
//!   now_secs = tick * tick_duration_secs
//!
//! Actions and behaviors reason in seconds (delays, timeouts, cooldowns,
//! penalty graphs) because their configuration is authored in seconds, but
//! the canonical counter stays an integer so the clock never drifts and
//! tests can step it exactly.

use std::fmt;

/// Default tick length: the robot's 60 ms basestation cadence.
pub const DEFAULT_TICK_DURATION_SECS: f64 = 0.06;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self`; saturates at zero.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── EngineClock ───────────────────────────────────────────────────────────────

/// Converts between tick counts and engine seconds.
///
/// `EngineClock` is cheap to copy and intentionally holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EngineClock {
    /// How many seconds one tick represents.
    pub tick_duration_secs: f64,
    /// The current tick, advanced by `EngineClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl Default for EngineClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_DURATION_SECS)
    }
}

impl EngineClock {
    pub fn new(tick_duration_secs: f64) -> Self {
        Self {
            tick_duration_secs,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = Tick(self.current_tick.0 + 1);
    }

    /// Jump forward by `secs` (rounded up to whole ticks).  Used by tests
    /// and the demo to skip cooldowns without running the scheduler.
    pub fn advance_secs(&mut self, secs: f64) {
        self.current_tick = self.current_tick.offset(self.ticks_for_secs(secs));
    }

    /// Engine seconds at the current tick.
    #[inline]
    pub fn now_secs(&self) -> f64 {
        self.secs_at(self.current_tick)
    }

    /// Engine seconds at an arbitrary tick.
    #[inline]
    pub fn secs_at(&self, tick: Tick) -> f64 {
        tick.0 as f64 * self.tick_duration_secs
    }

    /// How many ticks span `secs` seconds? (rounds up; never early)
    pub fn ticks_for_secs(&self, secs: f64) -> u64 {
        if secs <= 0.0 || self.tick_duration_secs <= 0.0 {
            return 0;
        }
        (secs / self.tick_duration_secs - 1e-9).ceil() as u64
    }
}

impl fmt::Display for EngineClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.2}s)", self.current_tick, self.now_secs())
    }
}
