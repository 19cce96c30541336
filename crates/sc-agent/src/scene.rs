//! Scene states: every agent's snapshot at one instant.

use sc_core::Time;

use crate::{AgentError, AgentResult, DrivingAgentState};

/// An ordered collection of agent snapshots, unique by agent name.
///
/// The simulator reads one scene state as "current" and fills in another as
/// "next"; it matches agents across the two by name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DrivingSceneState {
    time:   Time,
    agents: Vec<DrivingAgentState>,
}

impl DrivingSceneState {
    pub fn new(time: Time) -> Self {
        Self { time, agents: Vec::new() }
    }

    #[inline]
    pub fn time(&self) -> Time {
        self.time
    }

    /// Add a snapshot.  Fails if an agent of the same name is already present.
    pub fn push(&mut self, state: DrivingAgentState) -> AgentResult<()> {
        if self.position(state.name()).is_some() {
            return Err(AgentError::DuplicateAgent(state.name().to_owned()));
        }
        self.agents.push(state);
        Ok(())
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.agents.iter().position(|s| s.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&DrivingAgentState> {
        self.agents.iter().find(|s| s.name() == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut DrivingAgentState> {
        self.agents.iter_mut().find(|s| s.name() == name)
    }

    pub fn agents(&self) -> &[DrivingAgentState] {
        &self.agents
    }

    pub fn agents_mut(&mut self) -> &mut [DrivingAgentState] {
        &mut self.agents
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.agents.iter().map(DrivingAgentState::name)
    }

    pub fn into_agents(self) -> Vec<DrivingAgentState> {
        self.agents
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }
}
