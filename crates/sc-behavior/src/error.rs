use sc_agent::AgentError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BehaviorError {
    #[error("controller configuration error: {0}")]
    Config(String),

    #[error("controller could not read or write agent state: {0}")]
    State(#[from] AgentError),
}

pub type BehaviorResult<T> = Result<T, BehaviorError>;
