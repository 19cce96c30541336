//! Fluent builder for constructing a [`DrivingSimulationScene`].

use std::collections::HashSet;
use std::sync::Arc;

use sc_agent::{AgentError, DrivingAgent};
use sc_behavior::DrivingAgentController;
use sc_core::{CoreError, Duration, SimConfig, Time, TrigTable};
use sc_physics::DrivingSimulator;

use crate::{DrivingSimulationScene, SimError, SimResult, SimulationAgent};

/// Fluent builder for [`DrivingSimulationScene<C>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: time step, trig resolution, late-start policy
/// - `C: DrivingAgentController`: proposes every simulated agent's intent
/// - at least one agent, simulated or replayed
///
/// # Optional inputs (have defaults)
///
/// | Method          | Default                                   |
/// |-----------------|-------------------------------------------|
/// | `.start(t)`     | Earliest first instant among all agents   |
/// | `.end(t)`       | Latest last instant among all agents      |
///
/// # Example
///
/// ```rust,ignore
/// let mut scene = SimulationSceneBuilder::new(SimConfig::default(), NoopController)
///     .agents(recorded)
///     .replayed(ego)
///     .end(Time(20_000))
///     .build()?;
/// scene.run(&mut NoopObserver)?;
/// ```
pub struct SimulationSceneBuilder<C: DrivingAgentController> {
    config:     SimConfig,
    controller: C,
    agents:     Vec<Arc<dyn DrivingAgent>>,
    replayed:   Vec<Arc<dyn DrivingAgent>>,
    start:      Option<Time>,
    end:        Option<Time>,
}

impl<C: DrivingAgentController> SimulationSceneBuilder<C> {
    pub fn new(config: SimConfig, controller: C) -> Self {
        Self {
            config,
            controller,
            agents:   Vec::new(),
            replayed: Vec::new(),
            start:    None,
            end:      None,
        }
    }

    /// Add an agent to simulate.
    pub fn agent(mut self, agent: Arc<dyn DrivingAgent>) -> Self {
        self.agents.push(agent);
        self
    }

    pub fn agents(mut self, agents: impl IntoIterator<Item = Arc<dyn DrivingAgent>>) -> Self {
        self.agents.extend(agents);
        self
    }

    /// Add an agent that is replayed from its recording.  It takes part in
    /// collisions and TTC but is never integrated.
    pub fn replayed(mut self, agent: Arc<dyn DrivingAgent>) -> Self {
        self.replayed.push(agent);
        self
    }

    pub fn start(mut self, start: Time) -> Self {
        self.start = Some(start);
        self
    }

    /// Exclusive end of the simulation window.
    pub fn end(mut self, end: Time) -> Self {
        self.end = Some(end);
        self
    }

    /// Validate inputs, wrap every simulated agent in an overlay and return
    /// a scene holding its initial state.
    ///
    /// Agents whose recording ends before the scene starts, or begins at or
    /// after the scene ends, are left out.
    pub fn build(self) -> SimResult<DrivingSimulationScene<C>> {
        self.config.validate()?;
        if self.agents.is_empty() && self.replayed.is_empty() {
            return Err(SimError::NoAgents);
        }

        let mut names = HashSet::new();
        for agent in self.agents.iter().chain(&self.replayed) {
            if !names.insert(agent.name()) {
                return Err(AgentError::DuplicateAgent(agent.name().to_owned()).into());
            }
        }

        // ── Resolve the scene window ──────────────────────────────────────
        let all = || self.agents.iter().chain(&self.replayed);
        let start = match self.start {
            Some(t) => t,
            None => all().map(|a| a.min_temporal_limit()).min().ok_or(SimError::NoAgents)?,
        };
        let end = match self.end {
            Some(t) => t,
            None => all().map(|a| a.max_temporal_limit()).max().ok_or(SimError::NoAgents)?,
        };
        if start > end {
            return Err(CoreError::Config(format!("scene start {start} follows scene end {end}")).into());
        }

        // ── Wrap simulated agents ─────────────────────────────────────────
        let dt = self.config.time_step;
        let mut overlays = Vec::with_capacity(self.agents.len());
        for source in self.agents {
            let overlay_start = if self.config.allow_late_start {
                align_to_grid(start, source.min_temporal_limit(), dt)
            } else {
                start
            };
            let overlay_end = end.min(source.max_temporal_limit());
            // A recording that ends between two ticks never reaches the grid.
            if source.max_temporal_limit() < start || overlay_start >= end || overlay_start > overlay_end {
                log::debug!(
                    "{}: recorded over [{}, {}], outside scene [{start}, {end}); left out",
                    source.name(),
                    source.min_temporal_limit(),
                    source.max_temporal_limit(),
                );
                continue;
            }
            overlays.push(SimulationAgent::new(source, overlay_start, Some(overlay_end), &self.config)?);
        }

        let trig = Arc::new(TrigTable::new(self.config.trig_resolution));
        let simulator = DrivingSimulator::new(self.controller, trig);
        DrivingSimulationScene::new(self.config, simulator, overlays, self.replayed, start, end)
    }
}

/// First tick of the grid `start + k * dt` at or after `first`.
pub(crate) fn align_to_grid(start: Time, first: Time, dt: Duration) -> Time {
    if first <= start {
        return start;
    }
    let behind = (first - start).as_millis();
    let step = dt.as_millis();
    start + dt * ((behind + step - 1) / step)
}
