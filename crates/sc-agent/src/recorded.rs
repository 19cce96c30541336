//! In-memory recorded agents.
//!
//! Dataset loaders hand the simulator their trajectories as
//! [`RecordedAgent`]s.  Build one with the fluent [`RecordedAgentBuilder`]:
//!
//! ```rust
//! use glam::DVec2;
//! use sc_agent::{DrivingAgent, Kinematics, RecordedAgentBuilder};
//! use sc_core::Time;
//!
//! let agent = RecordedAgentBuilder::new("car_1")
//!     .bounding_box(4.5, 1.8)
//!     .sample(Time(0), &Kinematics::cruising(DVec2::ZERO, 0.0, 10.0))
//!     .sample(Time(40), &Kinematics::cruising(DVec2::new(0.4, 0.0), 0.0, 10.0))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(agent.max_temporal_limit(), Time(40));
//! ```

use std::collections::BTreeMap;

use sc_core::{Duration, Time};

use crate::name::{qualifier, quantity};
use crate::{
    AgentError, AgentResult, Constant, DrivingAgent, KinematicField, Kinematics, ParamValue,
    ParameterMap, QualifiedName, Variable,
};

/// A recorded trajectory: constants plus one [`Variable`] per quantity.
#[derive(Clone, Debug)]
pub struct RecordedAgent {
    name:      String,
    constants: ParameterMap,
    variables: BTreeMap<String, Variable>,
    min_time:  Time,
    max_time:  Time,
}

impl RecordedAgent {
    pub fn variable(&self, full_name: &str) -> Option<&Variable> {
        self.variables.get(full_name)
    }
}

impl DrivingAgent for RecordedAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn min_temporal_limit(&self) -> Time {
        self.min_time
    }

    fn max_temporal_limit(&self) -> Time {
        self.max_time
    }

    fn constants(&self) -> &ParameterMap {
        &self.constants
    }

    fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    fn value_at(&self, full_name: &str, time: Time) -> AgentResult<ParamValue> {
        self.variables
            .get(full_name)
            .ok_or_else(|| AgentError::Missing(full_name.to_owned()))?
            .value_at(time)
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

/// Fluent builder for [`RecordedAgent`].
///
/// Builder methods never fail; the first error is remembered and returned
/// by [`build`](Self::build).
pub struct RecordedAgentBuilder {
    name:      String,
    constants: ParameterMap,
    variables: BTreeMap<String, Variable>,
    error:     Option<AgentError>,
}

impl RecordedAgentBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name:      name.into(),
            constants: ParameterMap::new(),
            variables: BTreeMap::new(),
            error:     None,
        }
    }

    fn record<T>(&mut self, result: AgentResult<T>) {
        if let Err(e) = result {
            self.error.get_or_insert(e);
        }
    }

    /// Add a time-invariant parameter.
    pub fn constant(mut self, quantity: &str, qualifier: &str, value: ParamValue) -> Self {
        let name = QualifiedName::new(self.name.clone(), quantity, qualifier);
        let result = self.constants.insert(Constant::new(name, value));
        self.record(result);
        self
    }

    pub fn bounding_box(self, length: f64, width: f64) -> Self {
        self.constant(quantity::BB_LENGTH, qualifier::BASE, ParamValue::Scalar(length))
            .constant(quantity::BB_WIDTH, qualifier::BASE, ParamValue::Scalar(width))
    }

    pub fn id(self, id: i64) -> Self {
        self.constant(quantity::ID, qualifier::BASE, ParamValue::Integer(id))
    }

    /// Declare interest in the time-to-collision diagnostic.
    pub fn ttc_slot(self) -> Self {
        self.constant(quantity::TTC, qualifier::BASE, ParamValue::Duration(Duration::MAX))
    }

    /// Aligned-speed goal read by goal-seeking controllers: reach `value`
    /// within `duration`.
    pub fn velocity_goal(self, value: f64, duration: Duration) -> Self {
        self.constant(quantity::ALIGNED_LINEAR_VELOCITY, qualifier::GOAL_VALUE, ParamValue::Scalar(value))
            .constant(quantity::ALIGNED_LINEAR_VELOCITY, qualifier::GOAL_DURATION, ParamValue::Duration(duration))
    }

    /// Record one sample of every kinematic field.
    pub fn sample(mut self, time: Time, kinematics: &Kinematics) -> Self {
        for field in KinematicField::ALL {
            let variable = self
                .variables
                .entry(field.name_for(&self.name).full())
                .or_insert_with(|| Variable::new(field.name_for(&self.name), field.kind()));
            let result = variable.push(time, kinematics.value(field));
            self.record(result);
        }
        self
    }

    /// Add (or replace) a whole variable, e.g. a non-kinematic recorded
    /// signal that should pass through simulation untouched.
    pub fn variable(mut self, variable: Variable) -> Self {
        if variable.name().agent() != self.name {
            self.error.get_or_insert(AgentError::InvalidName(variable.name().full()));
            return self;
        }
        self.variables.insert(variable.name().full(), variable);
        self
    }

    pub fn build(self) -> AgentResult<RecordedAgent> {
        if let Some(e) = self.error {
            return Err(e);
        }
        let min_time = self.variables.values().filter_map(Variable::min_time).min();
        let max_time = self.variables.values().filter_map(Variable::max_time).max();
        match (min_time, max_time) {
            (Some(min_time), Some(max_time)) => Ok(RecordedAgent {
                name: self.name,
                constants: self.constants,
                variables: self.variables,
                min_time,
                max_time,
            }),
            _ => Err(AgentError::NoSamples(self.name)),
        }
    }
}
