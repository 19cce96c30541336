//! `sc-sim` — simulation overlays and the tick driver for the `simcars`
//! driving simulator.
//!
//! # Tick loop
//!
//! ```text
//! scene built at `start`: every agent present at `start` seeded from its recording
//! while now + dt < end:
//!   ① Next      — an empty template per simulated agent still in its
//!                 window, a recorded snapshot per replayed agent.
//!   ② Simulate  — DrivingSimulator: intents + integration, collision
//!                 correction, time-to-collision.
//!   ③ Propagate — every snapshot is cached in the overlays of its agent.
//!   ④ Admit     — agents whose window begins at the new time join, seeded
//!                 from their recording; replayed agents join when recorded.
//! ```
//!
//! Queries for instants not yet computed advance the loop lazily, see
//! [`DrivingSimulationScene::driving_agent_state`].
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`simulated`] | `SimulatedVariable` — windowed cache over a recording     |
//! | [`overlay`]   | `SimulationAgent` — a recorded agent under simulation     |
//! | [`scene`]     | `DrivingSimulationScene<C>` — owns overlays, runs ticks   |
//! | [`builder`]   | `SimulationSceneBuilder<C>`                               |
//! | [`observer`]  | `SimObserver` hooks, `NoopObserver`                       |
//! | [`error`]     | `SimError`, `SimResult<T>`                                |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use sc_behavior::NoopController;
//! use sc_core::SimConfig;
//! use sc_sim::{NoopObserver, SimulationSceneBuilder};
//!
//! let mut scene = SimulationSceneBuilder::new(SimConfig::default(), NoopController)
//!     .agents(recorded_agents)
//!     .build()?;
//! scene.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod overlay;
pub mod scene;
pub mod simulated;

#[cfg(test)]
mod tests;

pub use builder::SimulationSceneBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use overlay::SimulationAgent;
pub use scene::DrivingSimulationScene;
pub use simulated::SimulatedVariable;
