//! Unit tests for sc-behavior.

use glam::DVec2;
use sc_agent::{DrivingAgentState, KinematicField, Kinematics, ParamValue};
use sc_core::{Duration, Time};

use crate::{ControlContext, DrivingAgentController, Intent, NoopController, VelocityGoalController};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ctx() -> ControlContext {
    ControlContext::new(Time(0), Duration(100))
}

/// Snapshot at `speed` with the given intent.
fn current(speed: f64, intent: Intent) -> DrivingAgentState {
    let mut state = DrivingAgentState::new("car", Time(0));
    state.set_kinematics(&Kinematics::cruising(DVec2::ZERO, 0.0, speed)).unwrap();
    intent.write_to(&mut state).unwrap();
    state
}

fn with_goal(mut state: DrivingAgentState, value: f64, duration: Duration) -> DrivingAgentState {
    state.set_param("aligned_linear_velocity", "goal_value", ParamValue::Scalar(value)).unwrap();
    state.set_param("aligned_linear_velocity", "goal_duration", ParamValue::Duration(duration)).unwrap();
    state
}

fn propose(controller: &dyn DrivingAgentController, current: &DrivingAgentState) -> Intent {
    let mut next = current.next_template(ctx().next_time());
    controller.propose(&ctx(), current, &mut next).unwrap();
    Intent::of(&next).unwrap()
}

// ── ControlContext ────────────────────────────────────────────────────────────

#[cfg(test)]
mod context_tests {
    use super::*;

    #[test]
    fn next_time_is_one_step_ahead() {
        assert_eq!(ctx().next_time(), Time(100));
    }
}

// ── NoopController ────────────────────────────────────────────────────────────

#[cfg(test)]
mod noop_tests {
    use super::*;

    #[test]
    fn holds_current_intent() {
        let held = Intent::new(1.5, -0.02);
        assert_eq!(propose(&NoopController, &current(10.0, held)), held);
    }

    #[test]
    fn missing_intent_is_state_error() {
        let state = DrivingAgentState::new("car", Time(0));
        let mut next = state.next_template(Time(100));
        let err = NoopController.propose(&ctx(), &state, &mut next).unwrap_err();
        assert!(matches!(err, crate::BehaviorError::State(_)));
    }

    #[test]
    fn only_intent_fields_written() {
        let state = current(3.0, Intent::default());
        let mut next = state.next_template(Time(100));
        NoopController.propose(&ctx(), &state, &mut next).unwrap();
        assert!(next.has(KinematicField::Steer));
        assert!(next.has(KinematicField::AlignedLinearAcceleration));
        assert!(!next.has(KinematicField::Position));
    }
}

// ── VelocityGoalController ────────────────────────────────────────────────────

#[cfg(test)]
mod goal_tests {
    use super::*;

    #[test]
    fn rejects_bad_limit() {
        assert!(VelocityGoalController::new(0.0).is_err());
        assert!(VelocityGoalController::new(f64::NAN).is_err());
        assert!(VelocityGoalController::new(3.0).is_ok());
    }

    #[test]
    fn closes_gap_over_goal_duration() {
        let controller = VelocityGoalController::new(10.0).unwrap();
        let state = with_goal(current(10.0, Intent::new(0.0, 0.2)), 14.0, Duration(2_000));
        let intent = propose(&controller, &state);
        assert!((intent.aligned_linear_acceleration - 2.0).abs() < 1e-12);
        assert_eq!(intent.steer, 0.2);
    }

    #[test]
    fn clamped_to_limit() {
        let controller = VelocityGoalController::new(3.0).unwrap();
        let state = with_goal(current(20.0, Intent::default()), 0.0, Duration(1_000));
        assert_eq!(propose(&controller, &state).aligned_linear_acceleration, -3.0);
    }

    #[test]
    fn horizon_never_shorter_than_step() {
        let controller = VelocityGoalController::new(100.0).unwrap();
        let state = with_goal(current(0.0, Intent::default()), 1.0, Duration::ZERO);
        // 1 m/s gap over one 100 ms step.
        assert!((propose(&controller, &state).aligned_linear_acceleration - 10.0).abs() < 1e-9);
    }

    #[test]
    fn without_goal_holds_intent() {
        let controller = VelocityGoalController::new(3.0).unwrap();
        let held = Intent::new(0.7, 0.0);
        assert_eq!(propose(&controller, &current(5.0, held)), held);
    }

    #[test]
    fn wrong_kind_goal_is_error() {
        let controller = VelocityGoalController::new(3.0).unwrap();
        let mut state = current(5.0, Intent::default());
        state.set_param("aligned_linear_velocity", "goal_value", ParamValue::Bool(true)).unwrap();
        state.set_param("aligned_linear_velocity", "goal_duration", ParamValue::Duration(Duration(1))).unwrap();
        let mut next = state.next_template(Time(100));
        assert!(controller.propose(&ctx(), &state, &mut next).is_err());
    }
}

// ── Custom controllers ────────────────────────────────────────────────────────

#[cfg(test)]
mod custom_controller_tests {
    use super::*;

    struct TurnLeft;

    impl DrivingAgentController for TurnLeft {
        fn propose(
            &self,
            _ctx:     &ControlContext,
            _current: &DrivingAgentState,
            next:     &mut DrivingAgentState,
        ) -> crate::BehaviorResult<()> {
            Intent::new(0.0, 0.1).write_to(next)?;
            Ok(())
        }
    }

    #[test]
    fn controller_is_object_safe_via_box() {
        let controller: Box<dyn DrivingAgentController> = Box::new(TurnLeft);
        assert_eq!(propose(&controller, &current(1.0, Intent::default())).steer, 0.1);
    }
}
