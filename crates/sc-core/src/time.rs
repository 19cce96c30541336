//! Simulation time model.
//!
//! # Design
//!
//! Time is an integer count of milliseconds since an arbitrary epoch (the
//! start of the recording a scene was built from).  Durations are signed
//! millisecond counts.  Using integers as the canonical unit keeps tick
//! arithmetic exact, so the `t`-th tick of a simulation always lands on the
//! same cache key regardless of how it was reached.
//!
//! Physics works in seconds: [`Duration::as_secs_f64`] is the only bridge.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Duration ─────────────────────────────────────────────────────────────────

/// A signed span of simulated time in milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Duration(pub i64);

impl Duration {
    pub const ZERO: Duration = Duration(0);

    /// Sentinel for "unbounded", e.g. a time-to-collision that never occurs.
    pub const MAX: Duration = Duration(i64::MAX);

    #[inline]
    pub fn from_millis(ms: i64) -> Self {
        Duration(ms)
    }

    /// Round `secs` to the nearest millisecond.  Non-finite or overflowing
    /// inputs saturate to [`Duration::MAX`].
    pub fn from_secs_f64(secs: f64) -> Self {
        let ms = (secs * 1_000.0).round();
        if !ms.is_finite() || ms >= i64::MAX as f64 {
            Duration::MAX
        } else if ms <= i64::MIN as f64 {
            Duration(i64::MIN)
        } else {
            Duration(ms as i64)
        }
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }

    #[inline]
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / 1_000.0
    }

    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0
    }
}

impl std::ops::Mul<i64> for Duration {
    type Output = Duration;
    #[inline]
    fn mul(self, rhs: i64) -> Duration {
        Duration(self.0 * rhs)
    }
}

impl fmt::Display for Duration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Duration::MAX {
            f.write_str("unbounded")
        } else {
            write!(f, "{}ms", self.0)
        }
    }
}

// ── Time ─────────────────────────────────────────────────────────────────────

/// An absolute simulated instant, in milliseconds since the scene epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time(pub i64);

impl Time {
    pub const ZERO: Time = Time(0);

    #[inline]
    pub fn from_millis(ms: i64) -> Self {
        Time(ms)
    }

    #[inline]
    pub fn as_millis(self) -> i64 {
        self.0
    }
}

impl std::ops::Add<Duration> for Time {
    type Output = Time;
    #[inline]
    fn add(self, rhs: Duration) -> Time {
        Time(self.0 + rhs.0)
    }
}

impl std::ops::Sub<Duration> for Time {
    type Output = Time;
    #[inline]
    fn sub(self, rhs: Duration) -> Time {
        Time(self.0 - rhs.0)
    }
}

impl std::ops::Sub for Time {
    type Output = Duration;
    #[inline]
    fn sub(self, rhs: Time) -> Duration {
        Duration(self.0 - rhs.0)
    }
}

impl fmt::Display for Time {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}ms", self.0)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Top-level simulation configuration.
///
/// Typically loaded from a JSON file by the application crate and passed to
/// the simulation scene builder.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Duration of one tick.  Default: 40 ms (25 Hz, the rate of most
    /// drone-recorded highway datasets).
    pub time_step: Duration,

    /// Number of entries in the shared sine/cosine lookup table over one full
    /// turn.  Default: 360 000 (0.001° resolution).
    pub trig_resolution: usize,

    /// Clamp a simulation start that precedes an agent's first recorded
    /// instant to that instant instead of failing.  Off by default.
    pub allow_late_start: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            time_step:        Duration(40),
            trig_resolution:  360_000,
            allow_late_start: false,
        }
    }
}

impl SimConfig {
    /// Reject configurations the simulator cannot run with.
    pub fn validate(&self) -> CoreResult<()> {
        if !self.time_step.is_positive() {
            return Err(CoreError::NonPositiveStep(self.time_step));
        }
        if self.trig_resolution == 0 {
            return Err(CoreError::Config("trig_resolution must be non-zero".into()));
        }
        Ok(())
    }
}
