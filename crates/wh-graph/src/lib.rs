//! `wh-graph`: warehouse graph, path finding, and layout generation.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`graph`]    | `WarehouseGraph` (undirected CSR), `WarehouseGraphBuilder` |
//! | [`path`]     | `PathFinder` trait, `Path`, `Distances`, `BfsPathFinder`   |
//! | [`layout`]   | `LayoutConfig`, `WarehouseLayout` grid generator           |
//! | [`snapshot`] | `GraphSnapshot`, `NodeRecord` (bus wire format)            |
//! | [`error`]    | `GraphError`, `GraphResult<T>`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on snapshot and layout types. |

pub mod error;
pub mod graph;
pub mod layout;
pub mod path;
pub mod snapshot;


pub use error::{GraphError, GraphResult};
pub use graph::{WarehouseGraph, WarehouseGraphBuilder};
pub use layout::{LayoutConfig, WarehouseLayout};
pub use path::{BfsPathFinder, Distances, Path, PathFinder};
pub use snapshot::{GraphSnapshot, NodeRecord};
