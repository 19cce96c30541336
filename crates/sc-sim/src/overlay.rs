//! Simulation overlays: source agents whose kinematics come from the
//! simulator inside a time window.

use std::fmt;
use std::sync::Arc;

use sc_agent::{
    AgentError, AgentResult, DrivingAgent, DrivingAgentState, KinematicField, ParamValue, ParameterMap,
};
use sc_core::{SimConfig, Time};
use sc_physics::BackwardResimulation;

use crate::{SimError, SimResult, SimulatedVariable};

/// A [`DrivingAgent`] that answers kinematic queries inside
/// `[start, end)` from simulated values and everything else from the
/// source agent it wraps.
///
/// Every kinematic field gets a [`SimulatedVariable`]; other variables of
/// the source are passed through unwrapped.  Constants and the lower
/// temporal limit are the source's; the upper limit is the window end.
///
/// An overlay only reads its cache.  Advancing the simulation is the job of
/// the owning [`DrivingSimulationScene`][crate::DrivingSimulationScene],
/// which pushes every computed snapshot in through
/// [`propagate`](Self::propagate) and offers lazy queries through
/// [`DrivingSimulationScene::driving_agent_state`][crate::DrivingSimulationScene::driving_agent_state].
///
/// `Clone` is a deep copy: the copy owns its cache from then on.  A copy is
/// not known to any scene until it is
/// [`register`][crate::DrivingSimulationScene::register]ed; an unregistered
/// copy never sees another tick.
#[derive(Clone)]
pub struct SimulationAgent {
    source:      Arc<dyn DrivingAgent>,
    start:       Time,
    end:         Time,
    simulated:   Vec<(KinematicField, SimulatedVariable)>,
    passthrough: Vec<String>,
    resumed_at:  Option<Time>,
}

impl SimulationAgent {
    /// Wrap `source` for simulation from `start` to `end` (default: the
    /// source's upper temporal limit), on ticks of `config.time_step`.
    ///
    /// # Errors
    ///
    /// [`SimError::InvalidWindow`] if `start` precedes the source's first
    /// instant (unless `config.allow_late_start`, which moves `start` up to
    /// it), if `start` is after the source's last instant, or if
    /// `start > end`.
    pub fn new(
        source: Arc<dyn DrivingAgent>,
        start:  Time,
        end:    Option<Time>,
        config: &SimConfig,
    ) -> SimResult<Self> {
        let end = end.unwrap_or_else(|| source.max_temporal_limit());
        let invalid = |start, reason| SimError::InvalidWindow {
            agent: source.name().to_owned(),
            start,
            end,
            reason,
        };

        let mut start = start;
        if start < source.min_temporal_limit() {
            if !config.allow_late_start {
                return Err(invalid(start, "start precedes the agent's first recorded instant"));
            }
            start = source.min_temporal_limit();
        }
        if start > source.max_temporal_limit() {
            return Err(invalid(start, "start follows the agent's last recorded instant"));
        }
        if start > end {
            return Err(invalid(start, "start follows end"));
        }

        let simulated: Vec<_> = KinematicField::ALL
            .into_iter()
            .map(|field| {
                let name = field.name_for(source.name());
                (field, SimulatedVariable::new(name, field.kind(), start, end, config.time_step))
            })
            .collect();
        let passthrough = source
            .variable_names()
            .into_iter()
            .filter(|name| !simulated.iter().any(|(_, v)| v.name().full() == *name))
            .collect();

        Ok(Self { source, start, end, simulated, passthrough, resumed_at: None })
    }

    /// Effective simulation start (after any late-start clamp).
    #[inline]
    pub fn start(&self) -> Time {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Time {
        self.end
    }

    #[inline]
    pub fn contains(&self, time: Time) -> bool {
        self.start <= time && time < self.end
    }

    pub fn source(&self) -> &Arc<dyn DrivingAgent> {
        &self.source
    }

    pub fn simulated_variable(&self, field: KinematicField) -> Option<&SimulatedVariable> {
        self.simulated.iter().find(|(f, _)| *f == field).map(|(_, v)| v)
    }

    /// Latest instant every simulated variable has a value for.
    pub fn simulated_until(&self) -> Option<Time> {
        self.simulated.iter().map(|(_, v)| v.latest()).min().flatten()
    }

    /// The instant of the last [`begin_simulation`](BackwardResimulation::begin_simulation).
    pub fn resumed_at(&self) -> Option<Time> {
        self.resumed_at
    }

    /// An independent copy of this overlay, cache included.
    pub fn deep_copy(&self) -> Self {
        self.clone()
    }

    /// Cache every kinematic field of `state` at `time`.
    ///
    /// Returns how many variables stored a new value; zero when `time` is
    /// outside the window or was already propagated.
    pub fn propagate(&mut self, time: Time, state: &DrivingAgentState) -> AgentResult<usize> {
        let mut stored = 0;
        for (field, variable) in &mut self.simulated {
            if variable.simulation_update(time, state.get(*field)?)? {
                stored += 1;
            }
        }
        Ok(stored)
    }
}

impl fmt::Debug for SimulationAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimulationAgent")
            .field("name", &self.source.name())
            .field("start", &self.start)
            .field("end", &self.end)
            .field("simulated_until", &self.simulated_until())
            .finish_non_exhaustive()
    }
}

impl DrivingAgent for SimulationAgent {
    fn name(&self) -> &str {
        self.source.name()
    }

    fn min_temporal_limit(&self) -> Time {
        self.source.min_temporal_limit()
    }

    /// The window end, which is exclusive for simulated variables.
    fn max_temporal_limit(&self) -> Time {
        self.end
    }

    fn constants(&self) -> &ParameterMap {
        self.source.constants()
    }

    fn variable_names(&self) -> Vec<String> {
        self.passthrough
            .iter()
            .cloned()
            .chain(self.simulated.iter().map(|(_, v)| v.name().full()))
            .collect()
    }

    fn value_at(&self, full_name: &str, time: Time) -> AgentResult<ParamValue> {
        match self.simulated.iter().find(|(_, v)| v.name().full() == full_name) {
            Some((_, variable)) => variable.value_at(time, self.source.as_ref()),
            None => self.source.value_at(full_name, time),
        }
    }
}

impl BackwardResimulation for SimulationAgent {
    /// Prepare to plan the tick starting at `from` again.
    ///
    /// `from` must be inside the window and already simulated.  The cache
    /// is left untouched: the simulator hands the controller the scene
    /// state at `from` directly, so nothing here needs rewinding.  The
    /// instant is kept for [`resumed_at`](SimulationAgent::resumed_at).
    fn begin_simulation(&mut self, from: Time) -> AgentResult<()> {
        if !self.contains(from) {
            return Err(AgentError::OutOfRange { name: self.name().to_owned(), time: from });
        }
        if self.simulated_until().is_none_or(|latest| latest < from) {
            return Err(AgentError::NotSimulated { name: self.name().to_owned(), time: from });
        }
        log::trace!("{}: re-simulating from {from}", self.name());
        self.resumed_at = Some(from);
        Ok(())
    }
}
