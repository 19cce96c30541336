//! `sc-core` — foundational types for the `simcars` driving simulator.
//!
//! This crate is a dependency of every other `sc-*` crate.  It intentionally
//! has no `sc-*` dependencies and minimal external ones (only `glam` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`                                             |
//! | [`time`]        | `Time`, `Duration`, `SimConfig`                       |
//! | [`trig`]        | `TrigTable` — fixed-resolution sin/cos/rotation lookup |
//! | [`rect`]        | `OrientedRect` — bounding-box overlap test            |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod ids;
pub mod rect;
pub mod time;
pub mod trig;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::AgentId;
pub use rect::OrientedRect;
pub use time::{Duration, SimConfig, Time};
pub use trig::TrigTable;
