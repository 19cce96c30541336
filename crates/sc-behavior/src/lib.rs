//! `sc-behavior` — driving-agent controller trait and stock controllers.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`intent`]  | `Intent` — aligned acceleration + steer for one step          |
//! | [`context`] | `ControlContext` — time and step of the transition planned    |
//! | [`model`]   | `DrivingAgentController` trait                                |
//! | [`noop`]    | `NoopController` — holds the current intent                   |
//! | [`goal`]    | `VelocityGoalController` — closes the gap to a speed goal     |
//! | [`error`]   | `BehaviorError`, `BehaviorResult<T>`                          |
//!
//! # Design notes
//!
//! Controllers decide *what* an agent wants (its intent); the physics crate
//! decides what actually happens.  A controller only ever writes the intent
//! fields of the next snapshot and never sees other agents, so collision
//! response stays entirely inside the simulator.

pub mod context;
pub mod error;
pub mod goal;
pub mod intent;
pub mod model;
pub mod noop;

#[cfg(test)]
mod tests;

pub use context::ControlContext;
pub use error::{BehaviorError, BehaviorResult};
pub use goal::VelocityGoalController;
pub use intent::Intent;
pub use model::DrivingAgentController;
pub use noop::NoopController;
