//! The simulation scene: owns the overlays and drives the simulator tick by
//! tick.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use sc_agent::{AgentError, DrivingAgent, DrivingAgentState, DrivingSceneState, RangePolicy};
use sc_behavior::DrivingAgentController;
use sc_core::{AgentId, CoreError, SimConfig, Time};
use sc_physics::{BackwardResimulation, DrivingSimulator, ResimulationRegistry, TickReport};

use crate::{NoopObserver, SimError, SimObserver, SimResult, SimulationAgent};

/// A driving scene whose agents are simulated inside `[start, end)`.
///
/// # Agents
///
/// - **Simulated** agents are [`SimulationAgent`] overlays, stored in a table
///   indexed by [`AgentId`].  The first overlay registered under a name is
///   its *primary*; it decides when the agent takes part.  Further overlays
///   under the same name (deep copies passed to
///   [`register`](Self::register)) receive the same propagated snapshots.
/// - **Replayed** agents (an ego vehicle, say) are read from their recording
///   every tick and never integrated, but they collide and are seen by TTC.
///
/// # Ticks
///
/// The scene keeps the last computed [`DrivingSceneState`].  Each
/// [`step`](Self::step):
///
/// 1. builds the next scene state: empty templates for simulated agents
///    still inside their window, recorded snapshots for replayed agents
///    still inside their recording;
/// 2. runs the [`DrivingSimulator`] over it;
/// 3. propagates every simulated snapshot into the overlays of its agent;
/// 4. admits agents whose window begins at the new time, seeded from their
///    recording.
///
/// Ticks never reach `end`.
///
/// Create via [`SimulationSceneBuilder`][crate::SimulationSceneBuilder].
pub struct DrivingSimulationScene<C: DrivingAgentController> {
    config:    SimConfig,
    simulator: DrivingSimulator<C>,
    overlays:  Vec<SimulationAgent>,
    by_name:   HashMap<String, Vec<AgentId>>,
    replayed:  Vec<Arc<dyn DrivingAgent>>,
    start:     Time,
    end:       Time,
    state:     DrivingSceneState,
}

impl<C: DrivingAgentController> DrivingSimulationScene<C> {
    pub(crate) fn new(
        config:    SimConfig,
        simulator: DrivingSimulator<C>,
        overlays:  Vec<SimulationAgent>,
        replayed:  Vec<Arc<dyn DrivingAgent>>,
        start:     Time,
        end:       Time,
    ) -> SimResult<Self> {
        let mut scene = Self {
            config,
            simulator,
            overlays:  Vec::with_capacity(overlays.len()),
            by_name:   HashMap::new(),
            replayed,
            start,
            end,
            state:     DrivingSceneState::new(start),
        };
        for overlay in overlays {
            scene.insert(overlay)?;
        }
        scene.admit(start)?;
        log::info!(
            "scene [{start}, {end}): {} simulated, {} replayed, {} present at start",
            scene.by_name.len(),
            scene.replayed.len(),
            scene.state.len(),
        );
        Ok(scene)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    #[inline]
    pub fn start(&self) -> Time {
        self.start
    }

    #[inline]
    pub fn end(&self) -> Time {
        self.end
    }

    /// Time of the last computed scene state.
    #[inline]
    pub fn time(&self) -> Time {
        self.state.time()
    }

    /// The last computed scene state.
    #[inline]
    pub fn state(&self) -> &DrivingSceneState {
        &self.state
    }

    pub fn simulator(&self) -> &DrivingSimulator<C> {
        &self.simulator
    }

    pub fn overlay(&self, id: AgentId) -> Option<&SimulationAgent> {
        self.overlays.get(id.index())
    }

    /// Every overlay registered under `name`, primary first.
    pub fn agent_ids(&self, name: &str) -> &[AgentId] {
        self.by_name.get(name).map_or(&[], Vec::as_slice)
    }

    fn primary(&self, name: &str) -> Option<&SimulationAgent> {
        self.agent_ids(name).first().and_then(|id| self.overlay(*id))
    }

    fn replayed_source(&self, name: &str) -> Option<&Arc<dyn DrivingAgent>> {
        self.replayed.iter().find(|a| a.name() == name)
    }

    pub fn is_replayed(&self, name: &str) -> bool {
        self.replayed_source(name).is_some()
    }

    // ── Registration ──────────────────────────────────────────────────────

    fn insert(&mut self, overlay: SimulationAgent) -> SimResult<AgentId> {
        let id = AgentId::try_from(self.overlays.len())
            .map_err(|_| SimError::Config(CoreError::Config("too many overlays".into())))?;
        self.by_name.entry(overlay.name().to_owned()).or_default().push(id);
        self.overlays.push(overlay);
        Ok(id)
    }

    /// Attach an overlay (typically a [`deep_copy`](SimulationAgent::deep_copy)
    /// of one already in the scene) so that future ticks populate it.
    ///
    /// If the agent is part of the current scene state, that state is
    /// propagated into the new overlay straight away.
    pub fn register(&mut self, mut overlay: SimulationAgent) -> SimResult<AgentId> {
        if self.is_replayed(overlay.name()) {
            return Err(AgentError::DuplicateAgent(overlay.name().to_owned()).into());
        }
        if let Some(state) = self.state.get(overlay.name()) {
            overlay.propagate(self.state.time(), state)?;
        }
        let id = self.insert(overlay)?;
        log::debug!("registered overlay {id} for {}", self.overlays[id.index()].name());
        Ok(id)
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Add every agent that should take part at `time` but is not yet in
    /// the current scene state.
    fn admit(&mut self, time: Time) -> SimResult<()> {
        let mut joining = Vec::new();
        for (index, overlay) in self.overlays.iter().enumerate() {
            let primary = self.agent_ids(overlay.name()).first().is_some_and(|id| id.index() == index);
            if primary && overlay.contains(time) && self.state.get(overlay.name()).is_none() {
                joining.push(overlay.source().driving_agent_state(time, RangePolicy::Propagate)?);
            }
        }
        for source in &self.replayed {
            let present = source.min_temporal_limit() <= time && time <= source.max_temporal_limit();
            if present && self.state.get(source.name()).is_none() {
                let mut state = source.driving_agent_state(time, RangePolicy::Propagate)?;
                state.set_populated(true);
                joining.push(state);
            }
        }
        for state in joining {
            log::debug!("{time}: {} joins the scene", state.name());
            self.propagate(time, &state)?;
            self.state.push(state)?;
        }
        Ok(())
    }

    fn propagate(&mut self, time: Time, state: &DrivingAgentState) -> SimResult<()> {
        if let Some(ids) = self.by_name.get(state.name()) {
            for id in ids {
                self.overlays[id.index()].propagate(time, state)?;
            }
        }
        Ok(())
    }

    /// Compute the next scene state.  Returns `None` once the next tick
    /// would reach the window end.
    pub fn step(&mut self) -> SimResult<Option<TickReport>> {
        let dt = self.config.time_step;
        let now = self.state.time();
        let next_time = now + dt;
        if next_time >= self.end {
            return Ok(None);
        }

        let mut next = DrivingSceneState::new(next_time);
        for agent in self.state.agents() {
            let name = agent.name();
            if let Some(source) = self.replayed_source(name) {
                if next_time <= source.max_temporal_limit() {
                    let mut state = source.driving_agent_state(next_time, RangePolicy::Propagate)?;
                    state.set_populated(true);
                    next.push(state)?;
                } else {
                    log::debug!("{next_time}: replayed {name} leaves the scene");
                }
                continue;
            }
            match self.primary(name) {
                Some(overlay) if overlay.contains(next_time) => next.push(agent.next_template(next_time))?,
                _ => log::debug!("{next_time}: {name} leaves the scene"),
            }
        }

        let mut registry = Overlays(&mut self.overlays);
        let report = self.simulator.simulate(&self.state, &mut next, dt, &mut registry)?;
        for state in next.agents() {
            self.propagate(next_time, state)?;
        }
        self.state = next;
        self.admit(next_time)?;
        Ok(Some(report))
    }

    /// Advance until the last computed state is the latest tick at or before
    /// `time` (and before the window end).  Returns the number of ticks run.
    pub fn run_until<O: SimObserver>(&mut self, time: Time, observer: &mut O) -> SimResult<usize> {
        let dt = self.config.time_step;
        let mut ticks = 0;
        while self.state.time() + dt <= time && self.state.time() + dt < self.end {
            let next_time = self.state.time() + dt;
            observer.on_tick_start(next_time);
            let Some(report) = self.step()? else { break };
            observer.on_tick_end(next_time, &self.state, &report);
            ticks += 1;
        }
        Ok(ticks)
    }

    pub fn simulate_until(&mut self, time: Time) -> SimResult<usize> {
        self.run_until(time, &mut NoopObserver)
    }

    /// Run every remaining tick of the window.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<usize> {
        let ticks = self.run_until(self.end, observer)?;
        observer.on_sim_end(self.state.time());
        Ok(ticks)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// State of agent `name` at `time`, advancing the simulation first if
    /// `time` has not been computed yet.
    ///
    /// Replayed agents answer from their recording.
    pub fn driving_agent_state(
        &mut self,
        name:   &str,
        time:   Time,
        policy: RangePolicy,
    ) -> SimResult<DrivingAgentState> {
        if let Some(source) = self.replayed_source(name) {
            return Ok(source.driving_agent_state(time, policy)?);
        }
        let id = *self
            .agent_ids(name)
            .first()
            .ok_or_else(|| SimError::UnknownAgent(name.to_owned()))?;
        self.agent_state(id, time, policy)
    }

    /// Like [`driving_agent_state`](Self::driving_agent_state), for one
    /// specific overlay.
    pub fn agent_state(&mut self, id: AgentId, time: Time, policy: RangePolicy) -> SimResult<DrivingAgentState> {
        if time > self.state.time() {
            self.simulate_until(time)?;
        }
        let overlay = self
            .overlay(id)
            .ok_or_else(|| SimError::UnknownAgent(id.to_string()))?;
        Ok(overlay.driving_agent_state(time, policy)?)
    }
}

impl<C: DrivingAgentController> fmt::Debug for DrivingSimulationScene<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrivingSimulationScene")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("time", &self.state.time())
            .field("overlays", &self.overlays.len())
            .field("replayed", &self.replayed.len())
            .finish_non_exhaustive()
    }
}

/// Capability lookup over the scene's overlay table.
struct Overlays<'a>(&'a mut [SimulationAgent]);

impl ResimulationRegistry for Overlays<'_> {
    fn resimulations(&mut self, agent: &str) -> Vec<&mut dyn BackwardResimulation> {
        self.0
            .iter_mut()
            .filter(|overlay| overlay.name() == agent)
            .map(|overlay| overlay as &mut dyn BackwardResimulation)
            .collect()
    }
}
