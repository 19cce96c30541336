//! The `DrivingAgent` trait: anything that can answer "what was this agent's
//! state at time `t`?".

use sc_core::Time;

use crate::{AgentResult, Constant, DrivingAgentState, KinematicField, ParamValue, ParameterMap, QualifiedName};

/// What to do when a snapshot is requested for a time some of the agent's
/// variables cannot answer.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum RangePolicy {
    /// Fail with the range error.
    #[default]
    Propagate,
    /// Return a best-effort snapshot with the unavailable fields unset.
    Partial,
}

/// A vehicle-like agent with a bounded temporal extent.
///
/// Implemented by recorded agents ([`RecordedAgent`][crate::RecordedAgent])
/// and by simulation overlays, which answer some queries from freshly
/// simulated state instead of the recording.
///
/// # Required methods
///
/// Everything except [`driving_agent_state`][Self::driving_agent_state],
/// which has a default built from [`constants`][Self::constants] and
/// [`value_at`][Self::value_at].
pub trait DrivingAgent {
    fn name(&self) -> &str;

    /// Earliest instant the agent can answer for.
    fn min_temporal_limit(&self) -> Time;

    /// Upper temporal bound.  Recorded agents answer up to and including it;
    /// simulation overlays treat it as the exclusive end of their window.
    fn max_temporal_limit(&self) -> Time;

    /// Time-invariant parameters (bounding box, id, goals, TTC placeholder).
    fn constants(&self) -> &ParameterMap;

    /// Full names of every time-varying parameter.
    fn variable_names(&self) -> Vec<String>;

    /// Value of the variable `full_name` at `time`.
    fn value_at(&self, full_name: &str, time: Time) -> AgentResult<ParamValue>;

    /// Snapshot of every constant and every variable at `time`.
    ///
    /// The snapshot is marked populated when all kinematic fields resolved.
    fn driving_agent_state(&self, time: Time, policy: RangePolicy) -> AgentResult<DrivingAgentState> {
        let mut state = DrivingAgentState::new(self.name(), time);
        for constant in self.constants().iter() {
            state.insert(constant.clone())?;
        }
        for full_name in self.variable_names() {
            match self.value_at(&full_name, time) {
                Ok(value) => state.insert(Constant::new(QualifiedName::parse(&full_name)?, value))?,
                Err(e) if e.is_range() && policy == RangePolicy::Partial => {}
                Err(e) => return Err(e),
            }
        }
        let complete = KinematicField::ALL.into_iter().all(|f| state.has(f));
        state.set_populated(complete);
        Ok(state)
    }
}
