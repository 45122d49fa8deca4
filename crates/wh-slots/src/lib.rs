//! `wh-slots`: storage slots, the slot registry, and nearest-slot selection.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`slot`]      | `Slot` record (also the bus wire format)                     |
//! | [`registry`]  | `SlotRegistry` (`BTreeMap<SlotId, Slot>`), `UpsertOutcome`   |
//! | [`scheduler`] | `find_closest_empty_slot`, `find_closest_used_slot`, `SlotChoice` |
//! | [`generate`]  | `generate_slots`: one slot per (shelf node, level)          |
//! | [`loader`]    | `load_slots_csv`, `load_slots_reader`                        |
//! | [`error`]     | `SlotError`, `SlotResult<T>`                                 |
//!
//! # Ownership
//!
//! The registry is owned by whoever dispatches missions.  The scheduler only
//! borrows it; `in_use` changes go through [`SlotRegistry::set_in_use`], which
//! bumps the slot's `version` so replicas in other processes can tell a newer
//! state from a stale echo.

pub mod error;
pub mod generate;
pub mod loader;
pub mod registry;
pub mod scheduler;
pub mod slot;

#[cfg(test)]
mod tests;

pub use error::{SlotError, SlotResult};
pub use generate::generate_slots;
pub use loader::{load_slots_csv, load_slots_reader};
pub use registry::{SlotRegistry, UpsertOutcome};
pub use scheduler::{
    Occupancy, SlotChoice, find_closest_empty_slot, find_closest_slot, find_closest_used_slot,
};
pub use slot::Slot;
