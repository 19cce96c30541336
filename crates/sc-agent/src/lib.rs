//! `sc-agent` — typed parameter store and agent-state snapshots for the
//! `simcars` driving simulator.
//!
//! # Crate layout
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`name`]       | `QualifiedName` (`<agent>.<quantity>.<qualifier>`), name constants |
//! | [`value`]      | `ParamKind`, `ParamValue` tagged union, `Constant`             |
//! | [`params`]     | `ParameterMap` — one snapshot's named constants                |
//! | [`state`]      | `DrivingAgentState`, `KinematicField`, `Kinematics`            |
//! | [`variable`]   | `Variable` — recorded time series                              |
//! | [`agent`]      | `DrivingAgent` trait, `RangePolicy`                            |
//! | [`recorded`]   | `RecordedAgent`, `RecordedAgentBuilder`                        |
//! | [`scene`]      | `DrivingSceneState` — all snapshots at one instant             |
//! | [`error`]      | `AgentError`, `AgentResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on names and values.     |

pub mod agent;
pub mod error;
pub mod name;
pub mod params;
pub mod recorded;
pub mod scene;
pub mod state;
pub mod value;
pub mod variable;


pub use agent::{DrivingAgent, RangePolicy};
pub use error::{AgentError, AgentResult};
pub use name::QualifiedName;
pub use params::ParameterMap;
pub use recorded::{RecordedAgent, RecordedAgentBuilder};
pub use scene::DrivingSceneState;
pub use state::{DrivingAgentState, KinematicField, Kinematics};
pub use value::{Constant, ParamKind, ParamValue};
pub use variable::Variable;
