//! Bus messages and topic names.
//!
//! Each direction has one envelope, tagged by a `kind` field:
//!
//! ```json
//! {"kind": "arrival", "trigger": "pallet", "id": 17, "timestamp_ms": 1200}
//! {"kind": "slot_update", "slot_id": 4, "accessible_node": 44, "in_use": true, ...}
//! {"kind": "missions", "missions": [[2, 3, 4, 3, 2]]}
//! ```
//!
//! | Topic                    | Direction | Envelope variant             |
//! |--------------------------|-----------|------------------------------|
//! | `{prefix}/config/graph`  | in        | `Inbound::Graph`             |
//! | `{prefix}/slots`         | in        | `Inbound::SlotSnapshot`      |
//! | `{prefix}/slots/{id}`    | in / out  | `SlotUpdate`                 |
//! | `{prefix}/order`         | in        | `Inbound::Arrival` (order)   |
//! | `{prefix}/pallet`        | in        | `Inbound::Arrival` (pallet)  |
//! | `{prefix}/missions`      | in / out  | `Missions`                   |

use std::fmt;

use serde::{Deserialize, Serialize};

use wh_graph::GraphSnapshot;
use wh_slots::Slot;

use crate::{MissionKind, MissionQueueSnapshot, MissionResult};

// ── Arrivals ──────────────────────────────────────────────────────────────────

/// What kind of arrival triggered a mission.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trigger {
    /// A customer order: retrieve a stored pallet.
    Order,
    /// A pallet appeared at the spawn node: store it.
    Pallet,
}

impl Trigger {
    pub fn mission_kind(self) -> MissionKind {
        match self {
            Trigger::Order  => MissionKind::Retrieval,
            Trigger::Pallet => MissionKind::Storage,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Trigger::Order  => "order",
            Trigger::Pallet => "pallet",
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An order or pallet arrival.  Only `trigger` matters for planning; `id`
/// and `timestamp_ms` are carried through to logs.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arrival {
    pub trigger: Trigger,
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub timestamp_ms: u64,
}

impl Arrival {
    pub fn order(id: u64) -> Self {
        Self { trigger: Trigger::Order, id, timestamp_ms: 0 }
    }

    pub fn pallet(id: u64) -> Self {
        Self { trigger: Trigger::Pallet, id, timestamp_ms: 0 }
    }
}

// ── Envelopes ─────────────────────────────────────────────────────────────────

/// Everything a dispatcher consumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Inbound {
    Graph(GraphSnapshot),
    SlotSnapshot { slots: Vec<Slot> },
    SlotUpdate(Slot),
    Arrival(Arrival),
    Missions(MissionQueueSnapshot),
}

impl Inbound {
    /// Decode one JSON payload.
    pub fn from_json(payload: &[u8]) -> MissionResult<Self> {
        Ok(serde_json::from_slice(payload)?)
    }

    pub fn to_json(&self) -> MissionResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Everything a dispatcher publishes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outbound {
    SlotUpdate(Slot),
    Missions(MissionQueueSnapshot),
}

impl Outbound {
    /// Topic this message belongs on.
    pub fn topic(&self, topics: &Topics) -> String {
        match self {
            Outbound::SlotUpdate(slot) => topics.slot(slot.id),
            Outbound::Missions(_)      => topics.missions(),
        }
    }

    pub fn to_json(&self) -> MissionResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }
}

// ── Topics ────────────────────────────────────────────────────────────────────

/// Topic names under one prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Topics {
    prefix: String,
}

impl Topics {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into() }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn graph(&self) -> String {
        format!("{}/config/graph", self.prefix)
    }

    pub fn slots(&self) -> String {
        format!("{}/slots", self.prefix)
    }

    pub fn slot(&self, id: wh_core::SlotId) -> String {
        format!("{}/slots/{id}", self.prefix)
    }

    pub fn order(&self) -> String {
        format!("{}/order", self.prefix)
    }

    pub fn pallet(&self) -> String {
        format!("{}/pallet", self.prefix)
    }

    pub fn missions(&self) -> String {
        format!("{}/missions", self.prefix)
    }

    /// Topic an arrival of `trigger` is published on.
    pub fn arrival(&self, trigger: Trigger) -> String {
        match trigger {
            Trigger::Order  => self.order(),
            Trigger::Pallet => self.pallet(),
        }
    }
}
