use sc_agent::AgentError;
use sc_core::{CoreError, Time};
use sc_physics::PhysicsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("invalid simulation window [{start}, {end}) for agent {agent}: {reason}")]
    InvalidWindow {
        agent:  String,
        start:  Time,
        end:    Time,
        reason: &'static str,
    },

    #[error("simulation configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("no agent named {0} in the scene")]
    UnknownAgent(String),

    #[error("scene has no agents")]
    NoAgents,

    #[error(transparent)]
    Agent(#[from] AgentError),

    #[error("tick failed: {0}")]
    Physics(#[from] PhysicsError),
}

pub type SimResult<T> = Result<T, SimError>;
