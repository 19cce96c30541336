//! Single-agent kinematic integrator.
//!
//! Advances one agent by one step using average-rate (trapezoidal)
//! integration of a bicycle-like model: the controller's forward
//! acceleration and steer (a yaw-rate gain per unit forward speed) drive the
//! heading, the heading orients the acceleration, and velocity and position
//! follow.  Each stage consumes the values the previous stage just produced,
//! so the order below is part of the model.
//!
//! Other agents are ignored here; collision response feeds back in through
//! the external acceleration.

use glam::DVec2;
use sc_agent::{DrivingAgentState, KinematicField, Kinematics};
use sc_behavior::Intent;
use sc_core::{Duration, TrigTable};

use crate::{PhysicsError, PhysicsResult};

/// Angular velocity and heading at the end of a step.
///
/// Depends only on the current state and the intent, never on the external
/// acceleration.
pub fn heading_after(current: &Kinematics, intent: Intent, dt: f64) -> (f64, f64) {
    let mean_aligned_acceleration =
        0.5 * (current.aligned_linear_acceleration + intent.aligned_linear_acceleration);
    // One-step lookahead, only used to linearise the yaw rate.
    let estimated_aligned_velocity = current.aligned_linear_velocity + mean_aligned_acceleration * dt;
    let angular_velocity =
        intent.steer * 0.5 * (current.aligned_linear_velocity + estimated_aligned_velocity);
    let rotation = current.rotation + 0.5 * (current.angular_velocity + angular_velocity) * dt;
    (angular_velocity, rotation)
}

/// Kinematics one step of `dt` seconds after `current`.
pub fn advance(current: &Kinematics, intent: Intent, external: DVec2, dt: f64, trig: &TrigTable) -> Kinematics {
    let (angular_velocity, rotation) = heading_after(current, intent, dt);

    let linear_acceleration = trig.heading(rotation) * intent.aligned_linear_acceleration + external;
    let linear_velocity =
        current.linear_velocity + 0.5 * (current.linear_acceleration + linear_acceleration) * dt;
    // Project into the new vehicle frame.
    let aligned_linear_velocity = (trig.rotation(-rotation) * linear_velocity).x;
    let position = current.position + 0.5 * (current.linear_velocity + linear_velocity) * dt;

    Kinematics {
        position,
        linear_velocity,
        aligned_linear_velocity,
        linear_acceleration,
        aligned_linear_acceleration: intent.aligned_linear_acceleration,
        external_linear_acceleration: external,
        rotation,
        steer: intent.steer,
        angular_velocity,
    }
}

/// Integrate `next` from `current` over `dt`.
///
/// `next` must already carry the controller's intent; a missing external
/// acceleration counts as zero.  On success every kinematic field of `next`
/// is replaced.  A non-finite heading or position leaves `next` untouched
/// and fails with [`PhysicsError::NonFinite`].
pub fn simulate_agent(
    current: &DrivingAgentState,
    next:    &mut DrivingAgentState,
    dt:      Duration,
    trig:    &TrigTable,
) -> PhysicsResult<()> {
    let kinematics = current.kinematics()?;
    let intent = Intent::of(next)?;
    let external = if next.has(KinematicField::ExternalLinearAcceleration) {
        next.vector(KinematicField::ExternalLinearAcceleration)?
    } else {
        DVec2::ZERO
    };

    let advanced = advance(&kinematics, intent, external, dt.as_secs_f64(), trig);
    if !advanced.rotation.is_finite() {
        return Err(non_finite(next, "rotation"));
    }
    if !advanced.position.is_finite() {
        return Err(non_finite(next, "position"));
    }
    next.set_kinematics(&advanced)?;
    Ok(())
}

fn non_finite(state: &DrivingAgentState, quantity: &'static str) -> PhysicsError {
    PhysicsError::NonFinite { agent: state.name().to_owned(), quantity }
}
