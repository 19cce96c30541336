//! Simulated variables: an append-only cache of computed values in front of
//! a recorded source.

use std::collections::BTreeMap;

use sc_agent::{AgentError, AgentResult, DrivingAgent, ParamKind, ParamValue, QualifiedName};
use sc_core::{Duration, Time};

/// One kinematic quantity of one agent over a simulated window
/// `[start, end)`.
///
/// | Query time        | Answered by                                      |
/// |-------------------|--------------------------------------------------|
/// | `t < start`       | the source agent                                 |
/// | `start <= t < end`| the cached tick `k` with `k <= t < k + step`     |
/// | `t >= end`        | nobody: [`AgentError::OutOfRange`]               |
///
/// A cached value holds only until the next tick is due.  Inside the
/// window, a time whose tick has not been cached fails with
/// [`AgentError::NotSimulated`]: the owning scene has not advanced that far
/// yet, or (for an unregistered copy) never will.
///
/// The cache is written only through
/// [`simulation_update`](Self::simulation_update), at most once per time.
/// Later writes for the same time are ignored, so a value once answered is
/// never answered differently.
#[derive(Clone, Debug, PartialEq)]
pub struct SimulatedVariable {
    name:  QualifiedName,
    kind:  ParamKind,
    start: Time,
    end:   Time,
    step:  Duration,
    cache: BTreeMap<Time, ParamValue>,
}

impl SimulatedVariable {
    pub fn new(name: QualifiedName, kind: ParamKind, start: Time, end: Time, step: Duration) -> Self {
        Self { name, kind, start, end, step, cache: BTreeMap::new() }
    }

    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    #[inline]
    pub fn start(&self) -> Time {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Time {
        self.end
    }

    #[inline]
    pub fn step(&self) -> Duration {
        self.step
    }

    #[inline]
    pub fn contains(&self, time: Time) -> bool {
        self.start <= time && time < self.end
    }

    /// Latest cached instant, if any.
    pub fn latest(&self) -> Option<Time> {
        self.cache.keys().next_back().copied()
    }

    pub fn cached(&self, time: Time) -> Option<ParamValue> {
        self.cache.get(&time).copied()
    }

    pub fn value_at(&self, time: Time, source: &dyn DrivingAgent) -> AgentResult<ParamValue> {
        if time < self.start {
            return source.value_at(&self.name.full(), time);
        }
        if time >= self.end {
            return Err(AgentError::OutOfRange { name: self.name.full(), time });
        }
        match self.cache.range(..=time).next_back() {
            Some((tick, value)) if time < *tick + self.step => Ok(*value),
            _ => Err(AgentError::NotSimulated { name: self.name.full(), time }),
        }
    }

    /// Cache `value` for `time`.
    ///
    /// Returns `Ok(true)` if the value was stored, `Ok(false)` if `time`
    /// lies outside the window or already has a value.
    pub fn simulation_update(&mut self, time: Time, value: ParamValue) -> AgentResult<bool> {
        if value.kind() != self.kind {
            return Err(AgentError::TypeMismatch {
                name:     self.name.full(),
                expected: self.kind,
                found:    value.kind(),
            });
        }
        if !self.contains(time) {
            log::trace!("{}: {time} outside simulated window, not cached", self.name);
            return Ok(false);
        }
        if self.cache.contains_key(&time) {
            log::trace!("{}: {time} already cached, update ignored", self.name);
            return Ok(false);
        }
        self.cache.insert(time, value);
        Ok(true)
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}
