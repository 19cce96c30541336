//! Unit tests for sc-sim.

use std::f64::consts::PI;
use std::sync::Arc;

use glam::DVec2;
use sc_agent::{DrivingAgent, Kinematics, RecordedAgent, RecordedAgentBuilder};
use sc_core::{Duration, SimConfig, Time};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One-second steps keep the arithmetic in these tests readable.
fn config() -> SimConfig {
    SimConfig { time_step: Duration(1_000), allow_late_start: true, ..SimConfig::default() }
}

fn strict() -> SimConfig {
    SimConfig { allow_late_start: false, ..config() }
}

/// Recording of a box moving at `speed` along `rotation`, one sample per
/// second over `[from_s, to_s]`.
fn recorded(
    name:     &str,
    origin:   DVec2,
    rotation: f64,
    speed:    f64,
    (length, width): (f64, f64),
    (from_s, to_s): (i64, i64),
) -> RecordedAgent {
    let velocity = DVec2::from_angle(rotation) * speed;
    (from_s..=to_s)
        .fold(RecordedAgentBuilder::new(name).bounding_box(length, width).ttc_slot(), |b, s| {
            let k = Kinematics::cruising(origin + velocity * s as f64, rotation, speed);
            b.sample(Time(s * 1_000), &k)
        })
        .build()
        .unwrap()
}

fn cruiser(name: &str, y: f64) -> Arc<dyn DrivingAgent> {
    Arc::new(recorded(name, DVec2::new(0.0, y), 0.0, 10.0, (4.0, 2.0), (0, 10)))
}

// ── Simulated variables ───────────────────────────────────────────────────────

#[cfg(test)]
mod simulated_tests {
    use sc_agent::{AgentError, KinematicField, ParamValue};

    use super::*;
    use crate::SimulatedVariable;

    fn position(source: &dyn DrivingAgent) -> SimulatedVariable {
        let field = KinematicField::Position;
        SimulatedVariable::new(field.name_for(source.name()), field.kind(), Time(1_000), Time(3_000), Duration(1_000))
    }

    #[test]
    fn before_start_reads_the_source() {
        let source = cruiser("a", 0.0);
        let variable = position(source.as_ref());
        assert_eq!(
            variable.value_at(Time(500), source.as_ref()).unwrap(),
            ParamValue::Vector(DVec2::new(0.0, 0.0)),
        );
    }

    #[test]
    fn inside_window_needs_a_cached_value() {
        let source = cruiser("a", 0.0);
        let variable = position(source.as_ref());
        let err = variable.value_at(Time(1_000), source.as_ref()).unwrap_err();
        assert!(matches!(err, AgentError::NotSimulated { .. }));
    }

    #[test]
    fn cache_holds_and_keeps_first_value() {
        let source = cruiser("a", 0.0);
        let mut variable = position(source.as_ref());
        let first = ParamValue::Vector(DVec2::new(1.0, 2.0));

        assert!(variable.simulation_update(Time(1_000), first).unwrap());
        assert!(!variable.simulation_update(Time(1_000), ParamValue::Vector(DVec2::ZERO)).unwrap());
        assert_eq!(variable.cached(Time(1_000)), Some(first));
        assert_eq!(variable.value_at(Time(1_500), source.as_ref()).unwrap(), first);
        assert_eq!(variable.len(), 1);
    }

    #[test]
    fn hold_ends_where_the_next_tick_is_due() {
        let source = cruiser("a", 0.0);
        let mut variable = position(source.as_ref());
        let first = ParamValue::Vector(DVec2::new(1.0, 2.0));
        variable.simulation_update(Time(1_000), first).unwrap();

        let err = variable.value_at(Time(2_000), source.as_ref()).unwrap_err();
        assert!(matches!(err, AgentError::NotSimulated { .. }));
        let err = variable.value_at(Time(2_500), source.as_ref()).unwrap_err();
        assert!(matches!(err, AgentError::NotSimulated { .. }));

        let second = ParamValue::Vector(DVec2::new(3.0, 4.0));
        variable.simulation_update(Time(2_000), second).unwrap();
        assert_eq!(variable.value_at(Time(1_999), source.as_ref()).unwrap(), first);
        assert_eq!(variable.value_at(Time(2_500), source.as_ref()).unwrap(), second);
    }

    #[test]
    fn window_end_is_exclusive() {
        let source = cruiser("a", 0.0);
        let mut variable = position(source.as_ref());
        assert!(!variable.simulation_update(Time(3_000), ParamValue::Vector(DVec2::ONE)).unwrap());
        assert!(variable.is_empty());
        let err = variable.value_at(Time(3_000), source.as_ref()).unwrap_err();
        assert!(matches!(err, AgentError::OutOfRange { .. }));
    }

    #[test]
    fn update_checks_kind() {
        let source = cruiser("a", 0.0);
        let mut variable = position(source.as_ref());
        let err = variable.simulation_update(Time(1_000), ParamValue::Scalar(1.0)).unwrap_err();
        assert!(matches!(err, AgentError::TypeMismatch { .. }));
    }
}

// ── Overlays ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod overlay_tests {
    use sc_agent::{AgentError, KinematicField, ParamKind, ParamValue, QualifiedName, RangePolicy, Variable};
    use sc_physics::BackwardResimulation;

    use super::*;
    use crate::{SimError, SimulationAgent};

    fn late(name: &str) -> Arc<dyn DrivingAgent> {
        Arc::new(recorded(name, DVec2::ZERO, 0.0, 5.0, (4.0, 2.0), (2, 8)))
    }

    #[test]
    fn end_defaults_to_source_max() {
        let overlay = SimulationAgent::new(cruiser("a", 0.0), Time(2_000), None, &strict()).unwrap();
        assert_eq!(overlay.end(), Time(10_000));
        assert_eq!(overlay.max_temporal_limit(), Time(10_000));
        assert_eq!(overlay.min_temporal_limit(), Time(0));
    }

    #[test]
    fn early_start_rejected_or_clamped() {
        let err = SimulationAgent::new(late("a"), Time(0), None, &strict()).unwrap_err();
        assert!(matches!(err, SimError::InvalidWindow { .. }));

        let overlay = SimulationAgent::new(late("a"), Time(0), None, &config()).unwrap();
        assert_eq!(overlay.start(), Time(2_000));
    }

    #[test]
    fn start_after_recording_rejected() {
        let err = SimulationAgent::new(late("a"), Time(9_000), None, &config()).unwrap_err();
        assert!(matches!(err, SimError::InvalidWindow { .. }));
    }

    #[test]
    fn start_after_end_rejected() {
        let err = SimulationAgent::new(cruiser("a", 0.0), Time(5_000), Some(Time(4_000)), &strict()).unwrap_err();
        assert!(matches!(err, SimError::InvalidWindow { .. }));
    }

    #[test]
    fn propagate_fills_every_kinematic_field() {
        let source = cruiser("a", 0.0);
        let mut overlay = SimulationAgent::new(source.clone(), Time(1_000), None, &strict()).unwrap();
        let mut state = source.driving_agent_state(Time(1_000), RangePolicy::Propagate).unwrap();
        state.set_vector(KinematicField::Position, DVec2::new(-7.0, 3.0)).unwrap();

        assert_eq!(overlay.propagate(Time(1_000), &state).unwrap(), KinematicField::ALL.len());
        assert_eq!(overlay.propagate(Time(1_000), &state).unwrap(), 0);
        assert_eq!(overlay.simulated_until(), Some(Time(1_000)));

        let position = KinematicField::Position.name_for("a").full();
        assert_eq!(overlay.value_at(&position, Time(1_500)).unwrap(), ParamValue::Vector(DVec2::new(-7.0, 3.0)));
        assert_eq!(overlay.value_at(&position, Time(500)).unwrap(), ParamValue::Vector(DVec2::ZERO));
    }

    #[test]
    fn non_kinematic_variables_pass_through() {
        let mut lane = Variable::new(QualifiedName::new("a", "lane", "base"), ParamKind::Integer);
        lane.push(Time(0), ParamValue::Integer(2)).unwrap();
        lane.push(Time(5_000), ParamValue::Integer(3)).unwrap();
        let source = RecordedAgentBuilder::new("a")
            .bounding_box(4.0, 2.0)
            .sample(Time(0), &Kinematics::default())
            .sample(Time(5_000), &Kinematics::default())
            .variable(lane)
            .build()
            .unwrap();
        let overlay = SimulationAgent::new(Arc::new(source), Time(0), None, &strict()).unwrap();

        assert!(overlay.variable_names().contains(&"a.lane.base".to_owned()));
        assert_eq!(overlay.value_at("a.lane.base", Time(3_000)).unwrap(), ParamValue::Integer(2));
    }

    #[test]
    fn partial_snapshot_before_anything_simulated() {
        let overlay = SimulationAgent::new(cruiser("a", 0.0), Time(1_000), None, &strict()).unwrap();
        assert!(overlay.driving_agent_state(Time(2_000), RangePolicy::Propagate).is_err());

        let partial = overlay.driving_agent_state(Time(2_000), RangePolicy::Partial).unwrap();
        assert!(!partial.is_populated());
        assert!(!partial.has(KinematicField::Position));
        assert_eq!(partial.bb_length().unwrap(), 4.0);
    }

    #[test]
    fn begin_simulation_requires_simulated_time() {
        let source = cruiser("a", 0.0);
        let mut overlay = SimulationAgent::new(source.clone(), Time(1_000), Some(Time(5_000)), &strict()).unwrap();

        assert!(matches!(overlay.begin_simulation(Time(1_000)), Err(AgentError::NotSimulated { .. })));
        assert!(matches!(overlay.begin_simulation(Time(5_000)), Err(AgentError::OutOfRange { .. })));

        let state = source.driving_agent_state(Time(1_000), RangePolicy::Propagate).unwrap();
        overlay.propagate(Time(1_000), &state).unwrap();
        overlay.begin_simulation(Time(1_000)).unwrap();
        assert_eq!(overlay.resumed_at(), Some(Time(1_000)));
    }

    #[test]
    fn deep_copy_is_independent() {
        let source = cruiser("a", 0.0);
        let mut overlay = SimulationAgent::new(source.clone(), Time(0), None, &strict()).unwrap();
        let copy = overlay.deep_copy();

        let state = source.driving_agent_state(Time(0), RangePolicy::Propagate).unwrap();
        overlay.propagate(Time(0), &state).unwrap();
        assert_eq!(overlay.simulated_until(), Some(Time(0)));
        assert_eq!(copy.simulated_until(), None);
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use sc_agent::AgentError;
    use sc_behavior::NoopController;
    use sc_core::CoreError;

    use super::*;
    use crate::builder::align_to_grid;
    use crate::{SimError, SimulationSceneBuilder};

    #[test]
    fn empty_scene_rejected() {
        let err = SimulationSceneBuilder::new(config(), NoopController).build().unwrap_err();
        assert!(matches!(err, SimError::NoAgents));
    }

    #[test]
    fn invalid_config_rejected() {
        let bad = SimConfig { time_step: Duration::ZERO, ..SimConfig::default() };
        let err = SimulationSceneBuilder::new(bad, NoopController)
            .agent(cruiser("a", 0.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .replayed(cruiser("a", 5.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Agent(AgentError::DuplicateAgent(name)) if name == "a"));
    }

    #[test]
    fn inverted_window_rejected() {
        let err = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .start(Time(5_000))
            .end(Time(1_000))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::Config(CoreError::Config(_))));
    }

    #[test]
    fn window_defaults_to_agent_extent() {
        let scene = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .agent(Arc::new(recorded("b", DVec2::ZERO, 0.0, 1.0, (1.0, 1.0), (3, 14))))
            .build()
            .unwrap();
        assert_eq!(scene.start(), Time(0));
        assert_eq!(scene.end(), Time(14_000));
        assert_eq!(scene.time(), Time(0));
        assert_eq!(scene.state().names().collect::<Vec<_>>(), vec!["a"]);
    }

    #[test]
    fn finished_agents_left_out() {
        let scene = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .agent(Arc::new(recorded("gone", DVec2::ZERO, 0.0, 1.0, (1.0, 1.0), (0, 2))))
            .start(Time(4_000))
            .build()
            .unwrap();
        assert_eq!(scene.agent_ids("a").len(), 1);
        assert!(scene.agent_ids("gone").is_empty());
    }

    #[test]
    fn late_starts_align_to_the_tick_grid() {
        let dt = Duration(1_000);
        assert_eq!(align_to_grid(Time(0), Time(0), dt), Time(0));
        assert_eq!(align_to_grid(Time(0), Time(2_500), dt), Time(3_000));
        assert_eq!(align_to_grid(Time(500), Time(2_500), dt), Time(2_500));
        assert_eq!(align_to_grid(Time(4_000), Time(1_000), dt), Time(4_000));
    }

    #[test]
    fn recording_between_ticks_left_out() {
        let short = RecordedAgentBuilder::new("short")
            .bounding_box(4.0, 2.0)
            .sample(Time(2_500), &Kinematics::default())
            .sample(Time(2_700), &Kinematics::default())
            .build()
            .unwrap();
        let scene = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .agent(Arc::new(short))
            .build()
            .unwrap();
        assert_eq!(scene.agent_ids("a").len(), 1);
        assert!(scene.agent_ids("short").is_empty());
    }

    #[test]
    fn late_start_refused_by_default() {
        let defaults = SimConfig { time_step: Duration(1_000), ..SimConfig::default() };
        let err = SimulationSceneBuilder::new(defaults, NoopController)
            .agent(cruiser("a", 0.0))
            .agent(Arc::new(recorded("b", DVec2::ZERO, 0.0, 1.0, (1.0, 1.0), (3, 10))))
            .build()
            .unwrap_err();
        assert!(matches!(err, SimError::InvalidWindow { ref agent, .. } if agent == "b"));
    }
}

// ── Scene ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scene_tests {
    use sc_agent::{AgentError, DrivingSceneState, KinematicField, ParamValue, RangePolicy};
    use sc_behavior::NoopController;
    use sc_physics::TickReport;

    use super::*;
    use crate::{DrivingSimulationScene, SimError, SimObserver, SimulationSceneBuilder};

    fn two_lanes() -> DrivingSimulationScene<NoopController> {
        SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .agent(cruiser("b", 5.0))
            .build()
            .unwrap()
    }

    /// Two boxes of equal mass driving at each other along x, 10 units
    /// apart, closing at 1 unit/s.
    fn head_on() -> DrivingSimulationScene<NoopController> {
        SimulationSceneBuilder::new(config(), NoopController)
            .agent(Arc::new(recorded("a", DVec2::ZERO, 0.0, 0.5, (1.5, 1.0), (0, 20))))
            .agent(Arc::new(recorded("b", DVec2::new(10.0, 0.0), PI, 0.5, (1.0, 1.5), (0, 20))))
            .build()
            .unwrap()
    }

    #[test]
    fn step_advances_one_tick() {
        let mut scene = two_lanes();
        let report = scene.step().unwrap().unwrap();
        assert_eq!(report.time, Time(1_000));
        assert_eq!(report.simulated, 2);
        assert!(report.collisions.is_empty());
        assert_eq!(scene.time(), Time(1_000));
    }

    #[test]
    fn free_agents_follow_their_recording() {
        let mut scene = two_lanes();
        let state = scene.driving_agent_state("a", Time(4_000), RangePolicy::Propagate).unwrap();
        let position = state.vector(KinematicField::Position).unwrap();
        assert!((position - DVec2::new(40.0, 0.0)).length() < 1e-6);
        assert_eq!(scene.time(), Time(4_000));
    }

    #[test]
    fn queries_advance_lazily_and_hold_between_ticks() {
        let mut scene = two_lanes();
        let at_tick = scene.driving_agent_state("b", Time(3_000), RangePolicy::Propagate).unwrap();
        let between = scene.driving_agent_state("b", Time(3_400), RangePolicy::Propagate).unwrap();
        assert_eq!(scene.time(), Time(3_000));
        assert_eq!(
            at_tick.vector(KinematicField::Position).unwrap(),
            between.vector(KinematicField::Position).unwrap(),
        );
    }

    #[test]
    fn window_end_is_never_simulated() {
        let mut scene = two_lanes();
        let ticks = scene.simulate_until(Time(50_000)).unwrap();
        assert_eq!(ticks, 9);
        assert_eq!(scene.time(), Time(9_000));
        assert!(scene.step().unwrap().is_none());

        let err = scene.driving_agent_state("a", Time(10_000), RangePolicy::Propagate).unwrap_err();
        assert!(matches!(err, SimError::Agent(e) if e.is_range()));
    }

    #[test]
    fn unknown_agent_is_an_error() {
        let mut scene = two_lanes();
        let err = scene.driving_agent_state("z", Time(0), RangePolicy::Propagate).unwrap_err();
        assert!(matches!(err, SimError::UnknownAgent(name) if name == "z"));
    }

    #[test]
    fn late_agents_join_on_the_grid() {
        let mut scene = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .agent(Arc::new(recorded("late", DVec2::new(0.0, 5.0), 0.0, 2.0, (4.0, 2.0), (2, 10))))
            .build()
            .unwrap();
        scene.simulate_until(Time(1_000)).unwrap();
        assert!(scene.state().get("late").is_none());

        scene.simulate_until(Time(2_000)).unwrap();
        assert!(scene.state().get("late").is_some());
        let joined = scene.driving_agent_state("late", Time(2_000), RangePolicy::Propagate).unwrap();
        assert_eq!(joined.vector(KinematicField::Position).unwrap(), DVec2::new(4.0, 5.0));
    }

    #[test]
    fn agents_leave_at_the_end_of_their_recording() {
        let mut scene = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .agent(Arc::new(recorded("short", DVec2::new(0.0, 5.0), 0.0, 2.0, (4.0, 2.0), (0, 4))))
            .build()
            .unwrap();
        scene.simulate_until(Time(3_000)).unwrap();
        assert!(scene.state().get("short").is_some());
        scene.simulate_until(Time(4_000)).unwrap();
        assert!(scene.state().get("short").is_none());
        assert!(scene.state().get("a").is_some());
    }

    #[test]
    fn replayed_agents_follow_the_recording() {
        let ego = cruiser("ego", 5.0);
        let mut scene = SimulationSceneBuilder::new(config(), NoopController)
            .agent(cruiser("a", 0.0))
            .replayed(ego.clone())
            .build()
            .unwrap();
        let report = scene.step().unwrap().unwrap();
        assert_eq!(report.simulated, 1);
        assert!(scene.is_replayed("ego"));
        assert_eq!(
            scene.state().get("ego").unwrap().vector(KinematicField::Position).unwrap(),
            DVec2::new(10.0, 5.0),
        );
        let queried = scene.driving_agent_state("ego", Time(7_000), RangePolicy::Propagate).unwrap();
        assert_eq!(queried.vector(KinematicField::Position).unwrap(), DVec2::new(70.0, 5.0));
        assert_eq!(scene.time(), Time(1_000));
    }

    #[test]
    fn head_on_collision_end_to_end() {
        let mut scene = head_on();

        scene.simulate_until(Time(8_000)).unwrap();
        let ttc = scene.state().get("a").unwrap().ttc().unwrap();
        assert!((1_990..=2_010).contains(&ttc.as_millis()), "ttc {ttc}");

        for name in ["a", "b"] {
            let state = scene.driving_agent_state(name, Time(9_000), RangePolicy::Propagate).unwrap();
            let v = state.vector(KinematicField::LinearVelocity).unwrap();
            assert!(v.x.abs() < 1e-9, "{name} still moving at {v}");
            assert!(state.scalar(KinematicField::AlignedLinearVelocity).unwrap().abs() < 1e-9);
        }
        assert_eq!(scene.overlay(scene.agent_ids("a")[0]).unwrap().resumed_at(), Some(Time(8_000)));

        scene.simulate_until(Time(19_000)).unwrap();
        for state in scene.state().agents() {
            let k = state.kinematics().unwrap();
            assert!(k.position.is_finite() && k.linear_velocity.is_finite() && k.rotation.is_finite());
        }
    }

    #[test]
    fn registered_copies_keep_up() {
        let mut scene = two_lanes();
        scene.simulate_until(Time(3_000)).unwrap();
        let original = scene.agent_ids("a")[0];
        let detached = scene.overlay(original).unwrap().deep_copy();
        let registered = scene.register(scene.overlay(original).unwrap().deep_copy()).unwrap();

        scene.simulate_until(Time(5_000)).unwrap();
        assert_eq!(detached.simulated_until(), Some(Time(3_000)));
        assert_eq!(scene.overlay(registered).unwrap().simulated_until(), Some(Time(5_000)));
        assert_eq!(scene.agent_ids("a"), &[original, registered]);

        let position = KinematicField::Position.name_for("a").full();
        assert_eq!(
            scene.overlay(registered).unwrap().value_at(&position, Time(5_000)).unwrap(),
            scene.overlay(original).unwrap().value_at(&position, Time(5_000)).unwrap(),
        );
        assert!(matches!(
            detached.value_at(&position, Time(3_500)).unwrap(),
            ParamValue::Vector(p) if (p - DVec2::new(30.0, 0.0)).length() < 1e-6
        ));
        let err = detached.value_at(&position, Time(5_000)).unwrap_err();
        assert!(matches!(err, AgentError::NotSimulated { .. }));
    }

    #[test]
    fn uncomputed_ticks_are_not_answered_early() {
        let mut scene = two_lanes();
        scene.simulate_until(Time(3_000)).unwrap();
        let id = scene.agent_ids("a")[0];
        let position = KinematicField::Position.name_for("a").full();

        let err = scene.overlay(id).unwrap().value_at(&position, Time(5_000)).unwrap_err();
        assert!(matches!(err, AgentError::NotSimulated { .. }));
        let held = scene.overlay(id).unwrap().value_at(&position, Time(3_500)).unwrap();

        scene.simulate_until(Time(5_000)).unwrap();
        assert_eq!(scene.overlay(id).unwrap().value_at(&position, Time(3_500)).unwrap(), held);
        assert!(matches!(
            scene.overlay(id).unwrap().value_at(&position, Time(5_000)).unwrap(),
            ParamValue::Vector(p) if (p - DVec2::new(50.0, 0.0)).length() < 1e-6
        ));
    }

    #[test]
    fn debug_names_the_window() {
        let scene = two_lanes();
        let text = format!("{scene:?}");
        assert!(text.starts_with("DrivingSimulationScene"));
        assert!(text.contains("overlays: 2"));
    }

    #[derive(Default)]
    struct Recorder {
        starts: Vec<Time>,
        ends:   Vec<(Time, usize)>,
        done:   Option<Time>,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, time: Time) {
            self.starts.push(time);
        }

        fn on_tick_end(&mut self, time: Time, state: &DrivingSceneState, _report: &TickReport) {
            self.ends.push((time, state.len()));
        }

        fn on_sim_end(&mut self, final_time: Time) {
            self.done = Some(final_time);
        }
    }

    #[test]
    fn observer_sees_every_tick() {
        let mut scene = two_lanes();
        let mut recorder = Recorder::default();
        let ticks = scene.run(&mut recorder).unwrap();

        assert_eq!(ticks, 9);
        assert_eq!(recorder.starts, (1..=9).map(|s| Time(s * 1_000)).collect::<Vec<_>>());
        assert!(recorder.ends.iter().all(|(_, agents)| *agents == 2));
        assert_eq!(recorder.done, Some(Time(9_000)));
    }
}
