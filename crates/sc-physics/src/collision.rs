//! Pairwise collision detection and elastic response.
//!
//! # Model
//!
//! Overlapping bounding boxes collide as a one-dimensional elastic
//! collision along the line joining their centres.  Bounding-box area
//! (`length × width`) stands in for mass.  Both agents leave the collision
//! with the momentum-weighted mean speed along that axis; the perpendicular
//! component of each velocity is unchanged.
//!
//! The corrected velocity is realised by re-running the integrator with an
//! external acceleration chosen so the step ends exactly at that velocity.
//!
//! Resolution is pairwise and single pass.  A correction from one pair is
//! not re-checked against agents the first agent was already tested with,
//! and cascades are not iterated to convergence.

use glam::DVec2;
use sc_agent::{DrivingAgentState, KinematicField, Kinematics};
use sc_core::{OrientedRect, TrigTable};

use crate::PhysicsResult;

/// The geometric and kinematic facts about one agent the collision and TTC
/// passes need.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Body {
    pub position: DVec2,
    pub velocity: DVec2,
    pub length:   f64,
    pub width:    f64,
    pub rotation: f64,
}

impl Body {
    pub fn of(state: &DrivingAgentState) -> PhysicsResult<Self> {
        Ok(Self {
            position: state.vector(KinematicField::Position)?,
            velocity: state.vector(KinematicField::LinearVelocity)?,
            length:   state.bb_length()?,
            width:    state.bb_width()?,
            rotation: state.scalar(KinematicField::Rotation)?,
        })
    }

    /// Mass proxy.
    #[inline]
    pub fn mass(&self) -> f64 {
        self.length * self.width
    }

    pub fn rect(&self, trig: &TrigTable) -> OrientedRect {
        OrientedRect::new(self.position, self.length, self.width, self.rotation, trig)
    }

    pub fn collides_with(&self, other: &Body, trig: &TrigTable) -> bool {
        self.rect(trig).overlaps(&other.rect(trig))
    }
}

/// Post-collision velocities of `a` and `b`.
///
/// `None` when the response is undefined: coincident centres (no collision
/// axis) or no mass.
pub fn elastic_response(a: &Body, b: &Body) -> Option<(DVec2, DVec2)> {
    let direction = (b.position - a.position).try_normalize()?;
    let (mass_a, mass_b) = (a.mass(), b.mass());
    if !(mass_a + mass_b > 0.0) {
        return None;
    }
    let axis_a = a.velocity.dot(direction);
    let axis_b = b.velocity.dot(direction);
    let shared = (mass_a * axis_a + mass_b * axis_b) / (mass_a + mass_b);
    Some((
        a.velocity + (shared - axis_a) * direction,
        b.velocity + (shared - axis_b) * direction,
    ))
}

/// External acceleration that makes a step from `current` end at
/// `corrected_velocity`, given the acceleration the agent's own intent
/// produces at the end of the step.
///
/// The integrator averages the start and end accelerations, so the end
/// acceleration must be twice the implied mean minus the start one.
pub fn correcting_acceleration(
    current:            &Kinematics,
    corrected_velocity: DVec2,
    intrinsic:          DVec2,
    dt:                 f64,
) -> DVec2 {
    let implied_mean = (corrected_velocity - current.linear_velocity) / dt;
    let required = 2.0 * implied_mean - current.linear_acceleration;
    required - intrinsic
}
