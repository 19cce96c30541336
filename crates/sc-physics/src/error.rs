use sc_agent::AgentError;
use sc_behavior::BehaviorError;
use sc_core::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PhysicsError {
    /// A computed heading or position is NaN or infinite.  The tick is
    /// aborted; the inputs that produced it are corrupt.
    #[error("agent {agent}: integrated {quantity} is not finite")]
    NonFinite { agent: String, quantity: &'static str },

    #[error("agent {0} has no state in the current scene")]
    MissingCurrentState(String),

    #[error("time step {0} must be positive")]
    NonPositiveStep(Duration),

    #[error(transparent)]
    State(#[from] AgentError),

    #[error(transparent)]
    Behavior(#[from] BehaviorError),
}

pub type PhysicsResult<T> = Result<T, PhysicsError>;
