//! The storage slot record.

use serde::{Deserialize, Serialize};

use wh_core::{GridPos, NodeId, SlotId};

/// One storage location: a level of a shelf cell.
///
/// Serialized flat, the way slot publishers put it on the bus:
///
/// ```json
/// { "slot_id": 7, "accessible_node": 44, "in_use": false,
///   "shelf_node": 45, "row": 3, "col": 5, "level": 1, "version": 2,
///   "updated_by": "dispatcher-a" }
/// ```
///
/// Only `slot_id` is required when decoding; everything else defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    #[serde(rename = "slot_id")]
    pub id: SlotId,

    /// Aisle node an AGV stands on to reach the slot.  `None` when the shelf
    /// cell has no aisle neighbour; such slots are never scheduled.
    #[serde(default)]
    pub accessible_node: Option<NodeId>,

    #[serde(default)]
    pub in_use: bool,

    /// Shelf cell holding the slot.
    #[serde(default)]
    pub shelf_node: Option<NodeId>,

    #[serde(flatten)]
    pub position: GridPos,

    /// Storage level, 1 = floor.
    #[serde(default)]
    pub level: u32,

    /// Bumped on every occupancy change made by a dispatcher.
    #[serde(default)]
    pub version: u64,

    /// Dispatcher that produced this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<String>,
}

impl Slot {
    /// An empty slot reachable from `accessible_node`, with no shelf metadata.
    pub fn new(id: SlotId, accessible_node: Option<NodeId>) -> Self {
        Self {
            id,
            accessible_node,
            in_use: false,
            shelf_node: None,
            position: GridPos::default(),
            level: 1,
            version: 0,
            updated_by: None,
        }
    }

    /// Same slot, marked occupied.
    pub fn occupied(mut self) -> Self {
        self.in_use = true;
        self
    }
}
