//! The `DrivingAgentController` trait, the extension point for driving
//! policy.

use sc_agent::DrivingAgentState;

use crate::{BehaviorResult, ControlContext};

/// Pluggable driving policy.
///
/// The simulator calls [`propose`][Self::propose] once per unpopulated agent
/// per tick, before integrating, and again for both agents of a colliding
/// pair during collision correction.  Implementations write the
/// [`Intent`][crate::Intent] fields (aligned linear acceleration and steer)
/// of `next`; anything else they write is overwritten by the integrator.
///
/// Proposals must be a pure function of `ctx`, `current` and the
/// controller's configuration so that the re-invocation during collision
/// correction reproduces the first pass.
///
/// # Example
///
/// ```rust
/// use sc_agent::DrivingAgentState;
/// use sc_behavior::{BehaviorResult, ControlContext, DrivingAgentController, Intent};
///
/// /// Full brake, wheel centred.
/// struct Brake(f64);
///
/// impl DrivingAgentController for Brake {
///     fn propose(
///         &self,
///         _ctx:     &ControlContext,
///         _current: &DrivingAgentState,
///         next:     &mut DrivingAgentState,
///     ) -> BehaviorResult<()> {
///         Intent::new(-self.0, 0.0).write_to(next)?;
///         Ok(())
///     }
/// }
/// ```
pub trait DrivingAgentController: Send + Sync {
    fn propose(
        &self,
        ctx:     &ControlContext,
        current: &DrivingAgentState,
        next:    &mut DrivingAgentState,
    ) -> BehaviorResult<()>;
}

impl<C: DrivingAgentController + ?Sized> DrivingAgentController for Box<C> {
    fn propose(
        &self,
        ctx:     &ControlContext,
        current: &DrivingAgentState,
        next:    &mut DrivingAgentState,
    ) -> BehaviorResult<()> {
        (**self).propose(ctx, current, next)
    }
}
