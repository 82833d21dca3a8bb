//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter plus an accumulated
//! count of *scaled* simulated seconds held in `SimClock`.  The tick counter
//! orders events and drives output intervals; the seconds counter drives all
//! gameplay timing (dwell, cooldowns, work rates, need decay).
//!
//! Game-speed scaling is applied to `dt` before anything reads it, so a
//! 2× multiplier simply feeds twice the seconds into the same tick.  A paused
//! step advances neither counter.

use std::fmt;

use crate::config::GameSpeed;

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
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

    /// Ticks elapsed from `earlier` to `self`.
    ///
    /// # Panics
    /// Panics in debug mode if `earlier > self`.
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0 - earlier.0
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

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tick counter plus elapsed scaled seconds.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Unscaled seconds per tick.  Default: 0.1.
    pub tick_duration_secs: f32,
    /// The current tick, advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
    /// Simulated seconds since tick 0, after game-speed scaling.
    pub elapsed_secs: f64,
}

impl SimClock {
    pub fn new(tick_duration_secs: f32) -> Self {
        Self {
            tick_duration_secs,
            current_tick: Tick::ZERO,
            elapsed_secs: 0.0,
        }
    }

    /// The `dt` this step should feed into agent ticks, or `None` if paused.
    #[inline]
    pub fn scaled_dt(&self, speed: GameSpeed) -> Option<f32> {
        speed.scale(self.tick_duration_secs)
    }

    /// Advance by one tick that consumed `dt` scaled seconds.
    #[inline]
    pub fn advance(&mut self, dt: f32) {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.elapsed_secs += dt as f64;
    }

    /// Break elapsed time into (minutes, seconds) for log lines.
    pub fn elapsed_ms(&self) -> (u64, u32) {
        let total = self.elapsed_secs.max(0.0) as u64;
        (total / 60, (total % 60) as u32)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.elapsed_ms();
        write!(f, "{} ({}m{:02}s)", self.current_tick, m, s)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation builder.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Unscaled seconds per tick.  Default: 0.1.
    pub tick_duration_secs: f32,

    /// Total ticks to simulate when driven by `Sim::run`.
    pub total_ticks: u64,

    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Emit a snapshot every N ticks.  1 = every tick.
    pub output_interval_ticks: u64,

    /// Initial pause state and multiplier.
    pub game_speed: GameSpeed,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tick_duration_secs: 0.1,
            total_ticks: 3_000,
            seed: 42,
            output_interval_ticks: 10,
            game_speed: GameSpeed::default(),
        }
    }
}

impl SimConfig {
    /// The tick at which the simulation ends (exclusive upper bound).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_duration_secs)
    }
}
