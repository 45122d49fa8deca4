//! Nearest-slot selection.
//!
//! Distance is the unweighted hop count from a reference node to a slot's
//! accessible node.  One breadth-first search from the reference node yields
//! every candidate's distance at once, so a query costs O(V + E + S) rather
//! than one search per slot.
//!
//! # Tie-break
//!
//! Candidates are scanned in ascending `SlotId` order and a later candidate
//! replaces the current best only when strictly closer, so among equally
//! near slots the lowest id wins.
//!
//! "Nothing found" is always `None`: a full or empty warehouse is a normal
//! state, not an error.

use std::fmt;

use tracing::debug;

use wh_core::{NodeId, SlotId};
use wh_graph::{BfsPathFinder, PathFinder, WarehouseGraph};

use crate::{Slot, SlotRegistry};

/// Which slots a query is looking for.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Occupancy {
    /// `in_use == false`: somewhere to store a pallet.
    Empty,
    /// `in_use == true`: a pallet to retrieve.
    Used,
}

impl Occupancy {
    #[inline]
    pub fn matches(self, slot: &Slot) -> bool {
        match self {
            Occupancy::Empty => !slot.in_use,
            Occupancy::Used  => slot.in_use,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Occupancy::Empty => "empty",
            Occupancy::Used  => "used",
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The slot a query selected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotChoice {
    pub slot:     SlotId,
    /// The slot's accessible node: where the AGV has to drive.
    pub node:     NodeId,
    /// Hops from the reference node to `node`.
    pub distance: u32,
}

/// Nearest empty slot to `reference`, by BFS hop count.
pub fn find_closest_empty_slot(
    graph:     &WarehouseGraph,
    reference: NodeId,
    slots:     &SlotRegistry,
) -> Option<SlotChoice> {
    find_closest_slot(&BfsPathFinder, graph, reference, slots, Occupancy::Empty)
}

/// Nearest occupied slot to `reference`, by BFS hop count.
pub fn find_closest_used_slot(
    graph:     &WarehouseGraph,
    reference: NodeId,
    slots:     &SlotRegistry,
) -> Option<SlotChoice> {
    find_closest_slot(&BfsPathFinder, graph, reference, slots, Occupancy::Used)
}

/// Nearest slot matching `occupancy`, using any [`PathFinder`].
///
/// Slots without an accessible node, or whose node is missing from the graph
/// or unreachable from `reference`, are skipped.  Returns `None` if nothing
/// qualifies or `reference` is not in the graph.
pub fn find_closest_slot<F: PathFinder>(
    finder:    &F,
    graph:     &WarehouseGraph,
    reference: NodeId,
    slots:     &SlotRegistry,
    occupancy: Occupancy,
) -> Option<SlotChoice> {
    let mut candidates = slots
        .iter()
        .filter(|s| occupancy.matches(s))
        .filter_map(|s| s.accessible_node.map(|node| (s.id, node)))
        .peekable();

    if candidates.peek().is_none() {
        debug!(%occupancy, "no candidate slots");
        return None;
    }

    let distances = match finder.distances_from(graph, reference) {
        Ok(d) => d,
        Err(e) => {
            debug!(%reference, error = %e, "reference node unusable for slot search");
            return None;
        }
    };

    let mut best: Option<SlotChoice> = None;
    for (slot, node) in candidates {
        let Some(distance) = distances.get(node) else {
            continue;
        };
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(SlotChoice { slot, node, distance });
        }
    }

    match &best {
        Some(c) => debug!(%occupancy, slot = %c.slot, node = %c.node, distance = c.distance, "slot selected"),
        None    => debug!(%occupancy, %reference, "no reachable candidate slot"),
    }
    best
}
