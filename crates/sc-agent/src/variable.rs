//! Recorded time series.

use std::collections::BTreeMap;

use sc_core::Time;

use crate::{AgentError, AgentResult, ParamKind, ParamValue, QualifiedName};

/// A named, kinded series of recorded values.
///
/// Lookups use sample-and-hold: the value at `t` is the latest sample at or
/// before `t`.  Times outside `[min_time, max_time]` are out of range.
#[derive(Clone, Debug, PartialEq)]
pub struct Variable {
    name:    QualifiedName,
    kind:    ParamKind,
    samples: BTreeMap<Time, ParamValue>,
}

impl Variable {
    pub fn new(name: QualifiedName, kind: ParamKind) -> Self {
        Self { name, kind, samples: BTreeMap::new() }
    }

    #[inline]
    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    #[inline]
    pub fn kind(&self) -> ParamKind {
        self.kind
    }

    /// Record `value` at `time`, replacing an earlier sample at that time.
    pub fn push(&mut self, time: Time, value: ParamValue) -> AgentResult<()> {
        if value.kind() != self.kind {
            return Err(AgentError::TypeMismatch {
                name:     self.name.full(),
                expected: self.kind,
                found:    value.kind(),
            });
        }
        self.samples.insert(time, value);
        Ok(())
    }

    pub fn min_time(&self) -> Option<Time> {
        self.samples.keys().next().copied()
    }

    pub fn max_time(&self) -> Option<Time> {
        self.samples.keys().next_back().copied()
    }

    pub fn value_at(&self, time: Time) -> AgentResult<ParamValue> {
        let out_of_range = || AgentError::OutOfRange { name: self.name.full(), time };
        let max = self.max_time().ok_or_else(out_of_range)?;
        if time > max {
            return Err(out_of_range());
        }
        self.samples
            .range(..=time)
            .next_back()
            .map(|(_, v)| *v)
            .ok_or_else(out_of_range)
    }

    pub fn samples(&self) -> impl Iterator<Item = (Time, ParamValue)> + '_ {
        self.samples.iter().map(|(t, v)| (*t, *v))
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
