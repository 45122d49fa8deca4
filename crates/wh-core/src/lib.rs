//! `wh-core`: foundational types for the warehouse mission workspace.
//!
//! This crate is a dependency of every other `wh-*` crate.  It has no `wh-*`
//! dependencies and only `thiserror` plus optional `serde` from outside.
//!
//! # What lives here
//!
//! | Module     | Contents                                               |
//! |------------|--------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `SlotId`                                     |
//! | [`node`]   | `NodeKind`, `GridPos`                                  |
//! | [`config`] | `DispatchConfig`                                       |
//! | [`error`]  | `WhError`, `WhResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod ids;
pub mod node;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::DispatchConfig;
pub use error::{WhError, WhResult};
pub use ids::{NodeId, SlotId};
pub use node::{GridPos, NodeKind};
