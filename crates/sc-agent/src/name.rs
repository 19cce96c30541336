//! Qualified parameter names: `<agent>.<quantity>.<qualifier>`.
//!
//! The qualifier separates competing contributions to the same physical
//! quantity, e.g. `linear_acceleration.base` (what the integrator produced)
//! versus `linear_acceleration.external` (a collision correction).

use std::fmt;

use crate::{AgentError, AgentResult};

/// Quantity names used by the simulator.
pub mod quantity {
    pub const POSITION:                    &str = "position";
    pub const LINEAR_VELOCITY:             &str = "linear_velocity";
    pub const ALIGNED_LINEAR_VELOCITY:     &str = "aligned_linear_velocity";
    pub const LINEAR_ACCELERATION:         &str = "linear_acceleration";
    pub const ALIGNED_LINEAR_ACCELERATION: &str = "aligned_linear_acceleration";
    pub const ROTATION:                    &str = "rotation";
    pub const STEER:                       &str = "steer";
    pub const ANGULAR_VELOCITY:            &str = "angular_velocity";
    pub const BB_LENGTH:                   &str = "bb_length";
    pub const BB_WIDTH:                    &str = "bb_width";
    pub const ID:                          &str = "id";
    pub const TTC:                         &str = "ttc";
}

/// Provenance qualifiers.
pub mod qualifier {
    /// Kinematic result of integration (or the recorded value).
    pub const BASE:               &str = "base";
    /// Injected from outside the agent's own dynamics (collision response).
    pub const EXTERNAL:           &str = "external";
    /// Control input the vehicle realises indirectly (pedals, wheel).
    pub const INDIRECT_ACTUATION: &str = "indirect_actuation";
    pub const GOAL_VALUE:         &str = "goal_value";
    pub const GOAL_DURATION:      &str = "goal_duration";
}

/// A parsed `<agent>.<quantity>.<qualifier>` key.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QualifiedName {
    agent:     String,
    quantity:  String,
    qualifier: String,
}

impl QualifiedName {
    pub fn new(agent: impl Into<String>, quantity: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            agent:     agent.into(),
            quantity:  quantity.into(),
            qualifier: qualifier.into(),
        }
    }

    /// Split a full name.  The agent part may itself contain dots; quantity
    /// and qualifier may not.
    pub fn parse(full: &str) -> AgentResult<Self> {
        let mut parts = full.rsplitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(qualifier), Some(quantity), Some(agent))
                if !agent.is_empty() && !quantity.is_empty() && !qualifier.is_empty() =>
            {
                Ok(Self::new(agent, quantity, qualifier))
            }
            _ => Err(AgentError::InvalidName(full.to_owned())),
        }
    }

    #[inline]
    pub fn agent(&self) -> &str {
        &self.agent
    }

    #[inline]
    pub fn quantity(&self) -> &str {
        &self.quantity
    }

    #[inline]
    pub fn qualifier(&self) -> &str {
        &self.qualifier
    }

    /// The agent-independent part, `<quantity>.<qualifier>`.
    pub fn key(&self) -> String {
        format!("{}.{}", self.quantity, self.qualifier)
    }

    /// The full dotted name, as used for map keys.
    pub fn full(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.agent, self.quantity, self.qualifier)
    }
}
