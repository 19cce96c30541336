//! Read-only tick information passed to every controller callback.

use sc_core::{Duration, Time};

/// The transition a controller is asked to plan for: from `time` to
/// `time + time_step`.
///
/// Built once per tick by the simulator and shared across all agents.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ControlContext {
    /// Time of the current snapshot.
    pub time: Time,

    /// Length of the step being planned.
    pub time_step: Duration,
}

impl ControlContext {
    #[inline]
    pub fn new(time: Time, time_step: Duration) -> Self {
        Self { time, time_step }
    }

    /// Time of the snapshot being filled in.
    #[inline]
    pub fn next_time(&self) -> Time {
        self.time + self.time_step
    }
}
