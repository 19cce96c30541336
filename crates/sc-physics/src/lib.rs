//! `sc-physics` — kinematic integration, collision response and
//! time-to-collision for driving scenes.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                        |
//! |----------------|-----------------------------------------------------------------|
//! | [`integrator`] | `simulate_agent` — one agent, one step, trapezoidal integration |
//! | [`collision`]  | `Body`, overlap test, elastic response, correcting acceleration |
//! | [`ttc`]        | `time_to_collision`, `smallest_ttc`                             |
//! | [`resim`]      | `BackwardResimulation` capability, `ResimulationRegistry`       |
//! | [`simulator`]  | `DrivingSimulator<C>` — the three-phase tick, `TickReport`      |
//! | [`error`]      | `PhysicsError`, `PhysicsResult<T>`                              |
//!
//! # Units
//!
//! Positions are in scene units (metres for every supported dataset),
//! velocities in units/s, accelerations in units/s², headings in radians
//! counter-clockwise from +x.  Time steps arrive as millisecond
//! [`Duration`][sc_core::Duration]s and are converted to seconds once per
//! step.
//!
//! # Trigonometry
//!
//! All heading-dependent maths goes through the shared
//! [`TrigTable`][sc_core::TrigTable] handed to [`DrivingSimulator::new`], so
//! the first pass and the collision re-run of a tick see identical values.

pub mod collision;
pub mod error;
pub mod integrator;
pub mod resim;
pub mod simulator;
pub mod ttc;


pub use collision::Body;
pub use error::{PhysicsError, PhysicsResult};
pub use integrator::simulate_agent;
pub use resim::{BackwardResimulation, NoResimulation, ResimulationRegistry};
pub use simulator::{DrivingSimulator, TickReport};
pub use ttc::{smallest_ttc, time_to_collision};
