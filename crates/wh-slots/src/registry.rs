//! `SlotRegistry`: one process's replica of the warehouse slot set.
//!
//! # Replication model
//!
//! Every process that plans missions keeps its own registry, fed by slot
//! snapshots and incremental updates from the bus.  There is no central
//! owner and no locking.  To make the resulting races visible, each slot
//! carries a `version` that a dispatcher bumps whenever it flips `in_use`:
//!
//! | Incoming vs. local               | Outcome     | Local copy    |
//! |----------------------------------|-------------|---------------|
//! | unknown slot                     | `Inserted`  | takes incoming|
//! | higher version                   | `Updated`   | takes incoming|
//! | lower version                    | `Stale`     | kept          |
//! | same version, same content       | `Unchanged` | kept          |
//! | same version, different content  | `Conflict`  | kept          |
//!
//! `Conflict` means two processes changed the same slot from the same base
//! state, i.e. a double booking.  Writers stamp `updated_by`, so two
//! dispatchers making the same change still disagree on content.  The
//! conflict is reported, not resolved.

use std::collections::BTreeMap;

use wh_core::{NodeId, SlotId};

use crate::{Slot, SlotError, SlotResult};

/// What [`SlotRegistry::upsert`] did with an incoming record.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
    Stale,
    Conflict,
}

impl UpsertOutcome {
    /// `true` if the local copy now differs from before the call.
    pub fn changed(self) -> bool {
        matches!(self, UpsertOutcome::Inserted | UpsertOutcome::Updated)
    }
}

/// Slot records keyed and iterated by ascending `SlotId`.
#[derive(Clone, Debug, Default)]
pub struct SlotRegistry {
    slots: BTreeMap<SlotId, Slot>,
}

impl SlotRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from `slots`.  A later record with a duplicate id
    /// replaces the earlier one.
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        Self { slots: slots.into_iter().map(|s| (s.id, s)).collect() }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(&id)
    }

    /// All slots, ascending by id.  The scheduler's tie-break relies on this
    /// order.
    pub fn iter(&self) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.values()
    }

    pub fn in_use_count(&self) -> usize {
        self.slots.values().filter(|s| s.in_use).count()
    }

    pub fn empty_count(&self) -> usize {
        self.len() - self.in_use_count()
    }

    /// Slots reached from `node`, ascending by id.
    pub fn slots_at(&self, node: NodeId) -> impl Iterator<Item = &Slot> + '_ {
        self.slots.values().filter(move |s| s.accessible_node == Some(node))
    }

    /// Merge one incoming record according to the version rules in the
    /// module docs.
    pub fn upsert(&mut self, incoming: Slot) -> UpsertOutcome {
        match self.slots.get_mut(&incoming.id) {
            None => {
                self.slots.insert(incoming.id, incoming);
                UpsertOutcome::Inserted
            }
            Some(local) if incoming.version > local.version => {
                *local = incoming;
                UpsertOutcome::Updated
            }
            Some(local) if incoming.version < local.version => UpsertOutcome::Stale,
            Some(local) if *local == incoming => UpsertOutcome::Unchanged,
            Some(_) => UpsertOutcome::Conflict,
        }
    }

    /// Replace the whole slot set with a fresh snapshot.
    pub fn replace_all(&mut self, slots: impl IntoIterator<Item = Slot>) {
        self.slots = slots.into_iter().map(|s| (s.id, s)).collect();
    }

    /// Set the occupancy flag of slot `id` and bump its version.
    ///
    /// Returns the updated record so the caller can broadcast it.
    ///
    /// # Errors
    ///
    /// [`SlotError::NotFound`] if `id` is not registered.
    pub fn set_in_use(&mut self, id: SlotId, in_use: bool) -> SlotResult<&Slot> {
        self.write(id, in_use, None)
    }

    /// Like [`set_in_use`](Self::set_in_use), stamping `writer` as the
    /// record's `updated_by`.
    pub fn set_in_use_by(&mut self, id: SlotId, in_use: bool, writer: &str) -> SlotResult<&Slot> {
        self.write(id, in_use, Some(writer))
    }

    /// The record [`set_in_use_by`](Self::set_in_use_by) would store, without
    /// storing it.  Pass it to [`commit`](Self::commit) once it is safe to apply.
    ///
    /// # Errors
    ///
    /// [`SlotError::NotFound`] if `id` is not registered.
    pub fn staged(&self, id: SlotId, in_use: bool, writer: &str) -> SlotResult<Slot> {
        self.next_record(id, in_use, Some(writer))
    }

    /// Store a record built by [`staged`](Self::staged), replacing the local copy.
    pub fn commit(&mut self, slot: Slot) {
        self.slots.insert(slot.id, slot);
    }

    fn next_record(&self, id: SlotId, in_use: bool, writer: Option<&str>) -> SlotResult<Slot> {
        let mut slot = self.slots.get(&id).ok_or(SlotError::NotFound(id))?.clone();
        slot.in_use = in_use;
        slot.version += 1;
        slot.updated_by = writer.map(str::to_owned);
        Ok(slot)
    }

    fn write(&mut self, id: SlotId, in_use: bool, writer: Option<&str>) -> SlotResult<&Slot> {
        let slot = self.next_record(id, in_use, writer)?;
        let local = self.slots.get_mut(&id).ok_or(SlotError::NotFound(id))?;
        *local = slot;
        Ok(local)
    }
}
