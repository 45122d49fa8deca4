//! `wh-mission`: mission planning and dispatch for the warehouse workspace.
//!
//! # Message flow
//!
//! ```text
//! arrival ─▶ Dispatcher ─▶ slot scheduler (nearest slot)
//!                       ─▶ PathPlanner    (three stitched legs)
//!                       ─▶ registry       (flip in_use, bump version)
//!                       ─▶ MessageBus     (slot update, mission queue)
//! ```
//!
//! # Crate layout
//!
//! | Module         | Contents                                                 |
//! |----------------|----------------------------------------------------------|
//! | [`planner`]    | `PathPlanner`, `MissionPlan`, `storage_path`, `retrieval_path` |
//! | [`queue`]      | `MissionQueue`, `MissionQueueSnapshot`                   |
//! | [`message`]    | `Inbound` / `Outbound` envelopes, `Arrival`, `Topics`    |
//! | [`bus`]        | `MessageBus` trait, `RecordingBus`, `ChannelBus`         |
//! | [`observer`]   | `DispatchObserver` hooks, `NoopObserver`                 |
//! | [`dispatcher`] | `Dispatcher`, readiness and per-arrival state            |
//! | [`builder`]    | `DispatcherBuilder`                                      |
//! | [`error`]      | `PlanError`, `BusError`, `MissionError`                  |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_core::DispatchConfig;
//! use wh_graph::{LayoutConfig, WarehouseLayout};
//! use wh_mission::{Arrival, DispatcherBuilder, Inbound, NoopObserver, RecordingBus};
//! use wh_slots::generate_slots;
//!
//! let graph = WarehouseLayout::generate(LayoutConfig::default())?.to_graph();
//! let slots = generate_slots(&graph, 3);
//! let mut dispatcher = DispatcherBuilder::new(DispatchConfig::default(), RecordingBus::new())
//!     .graph(graph)
//!     .slots(slots)
//!     .build()?;
//! dispatcher.handle(Inbound::Arrival(Arrival::pallet(1)), &mut NoopObserver)?;
//! ```

pub mod builder;
pub mod bus;
pub mod dispatcher;
pub mod error;
pub mod message;
pub mod observer;
pub mod planner;
pub mod queue;


pub use builder::DispatcherBuilder;
pub use bus::{ChannelBus, MessageBus, RecordingBus};
pub use dispatcher::{DispatchStats, Dispatcher, MissionState, Readiness};
pub use error::{BusError, BusResult, MissionError, MissionResult, PlanError, PlanResult};
pub use message::{Arrival, Inbound, Outbound, Topics, Trigger};
pub use observer::{DispatchObserver, NoopObserver};
pub use planner::{MissionKind, MissionPlan, PathPlanner, retrieval_path, stitch_legs, storage_path};
pub use queue::{MissionQueue, MissionQueueSnapshot};
