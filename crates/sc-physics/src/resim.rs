//! Backward re-simulation capability.
//!
//! Collision correction re-invokes the controller for a tick that has
//! already been planned once.  Agents whose controller-facing state depends
//! on the simulated timeline (simulation overlays) must be told to rewind
//! to the start of that tick first.  The simulator looks the capability up
//! by agent name through a [`ResimulationRegistry`]; agents without it are
//! simply re-controlled.

use sc_agent::AgentResult;
use sc_core::Time;

/// Something that can restart its simulation from an earlier instant.
pub trait BackwardResimulation {
    fn begin_simulation(&mut self, from: Time) -> AgentResult<()>;
}

/// Capability lookup by agent name.
pub trait ResimulationRegistry {
    /// Every participant registered under `agent` that supports backward
    /// re-simulation.  Empty if none does.
    fn resimulations(&mut self, agent: &str) -> Vec<&mut dyn BackwardResimulation>;
}

/// A registry in which no agent supports re-simulation.
pub struct NoResimulation;

impl ResimulationRegistry for NoResimulation {
    fn resimulations(&mut self, _agent: &str) -> Vec<&mut dyn BackwardResimulation> {
        Vec::new()
    }
}
