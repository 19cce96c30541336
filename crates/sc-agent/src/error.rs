use sc_core::Time;
use thiserror::Error;

use crate::ParamKind;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("{name} has no value at {time}")]
    OutOfRange { name: String, time: Time },

    #[error("{name} has not been simulated up to {time} yet")]
    NotSimulated { name: String, time: Time },

    #[error("parameter {0} is not set")]
    Missing(String),

    #[error("parameter {name} holds a {found} value, expected {expected}")]
    TypeMismatch {
        name:     String,
        expected: ParamKind,
        found:    ParamKind,
    },

    #[error("malformed qualified name {0:?}")]
    InvalidName(String),

    #[error("agent {0} appears twice in one scene state")]
    DuplicateAgent(String),

    #[error("agent {0} has no recorded samples")]
    NoSamples(String),
}

impl AgentError {
    /// `true` for errors caused by asking for a time outside what an agent
    /// knows (recorded or simulated).  Callers may substitute a partial
    /// result for these; every other variant is a contract violation.
    pub fn is_range(&self) -> bool {
        matches!(self, AgentError::OutOfRange { .. } | AgentError::NotSimulated { .. })
    }
}

pub type AgentResult<T> = Result<T, AgentError>;
