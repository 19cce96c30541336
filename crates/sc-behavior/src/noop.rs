//! A controller that never changes its mind.

use sc_agent::DrivingAgentState;

use crate::{BehaviorResult, ControlContext, DrivingAgentController, Intent};

/// Carries the current aligned acceleration and steer over unchanged.
///
/// An agent started with zero acceleration and zero steer keeps a constant
/// velocity until something external (a collision) acts on it.
pub struct NoopController;

impl DrivingAgentController for NoopController {
    fn propose(
        &self,
        _ctx:    &ControlContext,
        current: &DrivingAgentState,
        next:    &mut DrivingAgentState,
    ) -> BehaviorResult<()> {
        Intent::of(current)?.write_to(next)?;
        Ok(())
    }
}
