//! The per-tick driving simulator.

use std::sync::Arc;

use glam::DVec2;
use sc_agent::{DrivingAgentState, DrivingSceneState, KinematicField};
use sc_behavior::{ControlContext, DrivingAgentController, Intent};
use sc_core::{Duration, Time, TrigTable};

use crate::collision::{self, Body};
use crate::integrator::{self, simulate_agent};
use crate::resim::ResimulationRegistry;
use crate::ttc::smallest_ttc;
use crate::{PhysicsError, PhysicsResult};

/// What happened during one [`DrivingSimulator::simulate`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    /// Time of the scene state that was filled in.
    pub time: Time,

    /// Agents integrated in the first pass (those not already populated).
    pub simulated: usize,

    /// Colliding pairs, in the order they were resolved.
    pub collisions: Vec<(String, String)>,
}

/// Advances a driving scene by one tick.
///
/// # Tick phases
///
/// 1. **First pass**: every agent of `next` that is not already populated
///    gets a zero external acceleration, a controller proposal and an
///    integration step from its `current` snapshot.  Populated agents
///    (replayed ones such as an ego vehicle) are left as they are.
/// 2. **Collision pass**: every unordered pair is tested for bounding-box
///    overlap and overlapping pairs are corrected (see [`collision`]).
///    The first agent of a pair is read once per outer iteration, so later
///    pairs in the same iteration see its first-pass geometry.
/// 3. **TTC pass**: agents carrying a TTC slot get their smallest
///    time-to-collision against the corrected states.
///
/// # Type parameter
///
/// `C` is the driving policy; swap it at compile time with no runtime
/// overhead, or use `Box<dyn DrivingAgentController>`.
pub struct DrivingSimulator<C: DrivingAgentController> {
    controller: C,
    trig:       Arc<TrigTable>,
}

impl<C: DrivingAgentController> DrivingSimulator<C> {
    pub fn new(controller: C, trig: Arc<TrigTable>) -> Self {
        Self { controller, trig }
    }

    #[inline]
    pub fn controller(&self) -> &C {
        &self.controller
    }

    #[inline]
    pub fn trig(&self) -> &Arc<TrigTable> {
        &self.trig
    }

    /// Fill in `next` from `current` over one step of `dt`.
    ///
    /// `next` holds one entry per agent, matched to `current` by name.
    /// Every failure aborts the tick; `next` is then partially updated and
    /// must be discarded.
    pub fn simulate(
        &self,
        current: &DrivingSceneState,
        next:    &mut DrivingSceneState,
        dt:      Duration,
        resim:   &mut dyn ResimulationRegistry,
    ) -> PhysicsResult<TickReport> {
        if !dt.is_positive() {
            return Err(PhysicsError::NonPositiveStep(dt));
        }
        let ctx = ControlContext::new(current.time(), dt);
        let mut report = TickReport { time: next.time(), ..TickReport::default() };

        // ── Phase 1: independent integration ──────────────────────────────
        for state in next.agents_mut() {
            if state.is_populated() {
                continue;
            }
            let previous = current_of(current, state.name())?;
            state.set_vector(KinematicField::ExternalLinearAcceleration, DVec2::ZERO)?;
            self.controller.propose(&ctx, previous, state)?;
            simulate_agent(previous, state, dt, &self.trig)?;
            state.set_populated(true);
            report.simulated += 1;
        }

        // ── Phase 2: pairwise collision correction ────────────────────────
        let agents = next.agents_mut();
        for i in 0..agents.len() {
            let first = Body::of(&agents[i])?;
            for j in i + 1..agents.len() {
                let second = Body::of(&agents[j])?;
                if !first.collides_with(&second, &self.trig) {
                    continue;
                }
                let Some((velocity_i, velocity_j)) = collision::elastic_response(&first, &second) else {
                    log::warn!(
                        "{}: {} and {} overlap with coincident centres; collision skipped",
                        report.time,
                        agents[i].name(),
                        agents[j].name(),
                    );
                    continue;
                };
                log::debug!("{}: collision between {} and {}", report.time, agents[i].name(), agents[j].name());

                self.correct(&ctx, current, &mut agents[i], velocity_i, resim)?;
                self.correct(&ctx, current, &mut agents[j], velocity_j, resim)?;
                report.collisions.push((agents[i].name().to_owned(), agents[j].name().to_owned()));
            }
        }

        // ── Phase 3: time-to-collision ────────────────────────────────────
        let bodies = agents.iter().map(Body::of).collect::<PhysicsResult<Vec<_>>>()?;
        for (index, state) in agents.iter_mut().enumerate() {
            if state.has_ttc_slot() {
                state.set_ttc(smallest_ttc(&bodies, index, &self.trig))?;
            }
        }

        log::debug!(
            "{}: {} agents, {} simulated, {} collisions",
            report.time,
            agents.len(),
            report.simulated,
            report.collisions.len(),
        );
        Ok(report)
    }

    /// Re-plan and re-integrate `state` so that its step ends at `velocity`.
    fn correct(
        &self,
        ctx:      &ControlContext,
        current:  &DrivingSceneState,
        state:    &mut DrivingAgentState,
        velocity: DVec2,
        resim:    &mut dyn ResimulationRegistry,
    ) -> PhysicsResult<()> {
        let previous = current_of(current, state.name())?;
        for participant in resim.resimulations(state.name()) {
            participant.begin_simulation(ctx.time)?;
        }
        self.controller.propose(ctx, previous, state)?;

        let kinematics = previous.kinematics()?;
        let intent = Intent::of(state)?;
        let dt = ctx.time_step.as_secs_f64();
        let (_, rotation) = integrator::heading_after(&kinematics, intent, dt);
        let intrinsic = self.trig.heading(rotation) * intent.aligned_linear_acceleration;
        let external = collision::correcting_acceleration(&kinematics, velocity, intrinsic, dt);
        log::trace!("{}: external acceleration {external}", state.name());

        state.set_vector(KinematicField::ExternalLinearAcceleration, external)?;
        simulate_agent(previous, state, ctx.time_step, &self.trig)
    }
}

fn current_of<'a>(current: &'a DrivingSceneState, name: &str) -> PhysicsResult<&'a DrivingAgentState> {
    current
        .get(name)
        .ok_or_else(|| PhysicsError::MissingCurrentState(name.to_owned()))
}
