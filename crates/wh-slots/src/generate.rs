//! Slot generation from a warehouse graph.
//!
//! Every shelf node holds `levels` slots.  Slots are numbered from 1, shelf
//! nodes in ascending id order and levels bottom-up within a node.  The
//! accessible node is the aisle cell directly left of the shelf cell (same
//! row, `col − 1`); when that cell is missing or not an aisle the slot gets
//! no accessible node and is never scheduled.

use tracing::info;

use wh_core::{NodeKind, SlotId};
use wh_graph::WarehouseGraph;

use crate::Slot;

/// Generate the initial (all empty) slot set for `graph`.
pub fn generate_slots(graph: &WarehouseGraph, levels: u32) -> Vec<Slot> {
    let mut slots = Vec::new();
    let mut next_id = 1u32;

    for shelf in graph.nodes_of_kind(NodeKind::Shelf) {
        let Some(pos) = graph.position(shelf) else {
            continue;
        };
        let accessible_node = pos
            .left()
            .and_then(|left| graph.node_at(left))
            .filter(|&n| graph.kind(n) == Some(NodeKind::Aisle));

        for level in 1..=levels {
            slots.push(Slot {
                id: SlotId(next_id),
                accessible_node,
                in_use: false,
                shelf_node: Some(shelf),
                position: pos,
                level,
                version: 0,
                updated_by: None,
            });
            next_id += 1;
        }
    }

    let unreachable = slots.iter().filter(|s| s.accessible_node.is_none()).count();
    info!(slots = slots.len(), unreachable, "generated slots");
    slots
}
