//! Control intent: the inputs a controller hands the integrator.

use sc_agent::{AgentResult, DrivingAgentState, KinematicField};

/// The two indirectly actuated inputs of a vehicle for one step.
///
/// Controllers usually compute an `Intent` and [`write_to`](Self::write_to)
/// the next snapshot; the integrator derives every other kinematic field
/// from it.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
pub struct Intent {
    /// Target forward acceleration (units/s²).
    pub aligned_linear_acceleration: f64,

    /// Yaw-rate gain: angular velocity per unit of forward speed.
    pub steer: f64,
}

impl Intent {
    pub fn new(aligned_linear_acceleration: f64, steer: f64) -> Self {
        Self { aligned_linear_acceleration, steer }
    }

    /// The intent already stored on `state`.
    pub fn of(state: &DrivingAgentState) -> AgentResult<Self> {
        Ok(Self {
            aligned_linear_acceleration: state.scalar(KinematicField::AlignedLinearAcceleration)?,
            steer: state.scalar(KinematicField::Steer)?,
        })
    }

    pub fn write_to(&self, state: &mut DrivingAgentState) -> AgentResult<()> {
        state.set_scalar(KinematicField::AlignedLinearAcceleration, self.aligned_linear_acceleration)?;
        state.set_scalar(KinematicField::Steer, self.steer)
    }
}
