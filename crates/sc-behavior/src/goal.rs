//! A controller that steers the forward speed towards a per-agent goal.

use sc_agent::name::{qualifier, quantity};
use sc_agent::{AgentError, DrivingAgentState, KinematicField, ParamKind};
use sc_core::Duration;

use crate::{BehaviorError, BehaviorResult, ControlContext, DrivingAgentController, Intent};

/// Accelerates each agent towards its aligned-velocity goal.
///
/// The goal is read from two constants of the current snapshot,
/// `aligned_linear_velocity.goal_value` (scalar) and
/// `aligned_linear_velocity.goal_duration` (duration).  The proposed
/// acceleration closes the speed gap over the goal duration (never faster
/// than one time step) and is clamped to `±max_acceleration`.  Steer is held.
///
/// Agents without a goal hold their current intent, like
/// [`NoopController`][crate::NoopController].
#[derive(Clone, Debug)]
pub struct VelocityGoalController {
    max_acceleration: f64,
}

impl VelocityGoalController {
    pub fn new(max_acceleration: f64) -> BehaviorResult<Self> {
        if !(max_acceleration.is_finite() && max_acceleration > 0.0) {
            return Err(BehaviorError::Config(format!(
                "max_acceleration must be positive and finite, got {max_acceleration}"
            )));
        }
        Ok(Self { max_acceleration })
    }

    #[inline]
    pub fn max_acceleration(&self) -> f64 {
        self.max_acceleration
    }

    fn goal(state: &DrivingAgentState) -> BehaviorResult<Option<(f64, Duration)>> {
        let value = state.param_value(quantity::ALIGNED_LINEAR_VELOCITY, qualifier::GOAL_VALUE, ParamKind::Scalar);
        let duration =
            state.param_value(quantity::ALIGNED_LINEAR_VELOCITY, qualifier::GOAL_DURATION, ParamKind::Duration);
        match (value, duration) {
            (Ok(v), Ok(d)) => Ok(v.as_scalar().zip(d.as_duration())),
            (Err(AgentError::Missing(_)), _) | (_, Err(AgentError::Missing(_))) => Ok(None),
            (Err(e), _) | (_, Err(e)) => Err(e.into()),
        }
    }
}

impl DrivingAgentController for VelocityGoalController {
    fn propose(
        &self,
        ctx:     &ControlContext,
        current: &DrivingAgentState,
        next:    &mut DrivingAgentState,
    ) -> BehaviorResult<()> {
        let mut intent = Intent::of(current)?;
        if let Some((goal, duration)) = Self::goal(current)? {
            let speed = current.scalar(KinematicField::AlignedLinearVelocity)?;
            let horizon = duration.max(ctx.time_step).as_secs_f64();
            intent.aligned_linear_acceleration =
                ((goal - speed) / horizon).clamp(-self.max_acceleration, self.max_acceleration);
        }
        intent.write_to(next)?;
        Ok(())
    }
}
