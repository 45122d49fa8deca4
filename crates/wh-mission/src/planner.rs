//! Three-leg mission planning.
//!
//! | Mission   | Slot searched from | Legs                              |
//! |-----------|--------------------|-----------------------------------|
//! | Storage   | pallet spawn       | start → spawn → slot → start      |
//! | Retrieval | AGV start          | start → slot → spawn → start      |
//!
//! Legs are shortest paths from the [`PathFinder`].  They are joined by
//! dropping the first node of every leg after the first, since it repeats
//! the previous leg's last node.  The result starts and ends at the AGV
//! start node and never repeats a node back to back.
//!
//! If any leg has no path the whole mission is abandoned: a partial route is
//! never returned.

use std::fmt;

use tracing::debug;

use wh_core::{NodeId, NodeKind};
use wh_graph::{BfsPathFinder, Path, PathFinder, WarehouseGraph};
use wh_slots::{Occupancy, SlotChoice, SlotRegistry, find_closest_slot};

use crate::{PlanError, PlanResult};

// ── MissionKind ───────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MissionKind {
    /// Take an arrived pallet to the nearest empty slot.
    Storage,
    /// Fetch a pallet from the nearest occupied slot.
    Retrieval,
}

impl MissionKind {
    /// Occupancy of the slots this mission is looking for.
    pub fn wanted(self) -> Occupancy {
        match self {
            MissionKind::Storage   => Occupancy::Empty,
            MissionKind::Retrieval => Occupancy::Used,
        }
    }

    /// `in_use` value of the chosen slot once the mission is dispatched.
    pub fn slot_in_use_after(self) -> bool {
        matches!(self, MissionKind::Storage)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MissionKind::Storage   => "storage",
            MissionKind::Retrieval => "retrieval",
        }
    }
}

impl fmt::Display for MissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── MissionPlan ───────────────────────────────────────────────────────────────

/// A planned mission: the chosen slot and the full round-trip path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MissionPlan {
    pub kind: MissionKind,
    pub slot: SlotChoice,
    pub path: Vec<NodeId>,
}

impl MissionPlan {
    /// Edges driven over the whole round trip.
    pub fn hops(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

/// Join consecutive legs into one node sequence.
///
/// The first node of every leg after the first is dropped.  Callers pass
/// legs whose endpoints meet; this is not checked.
pub fn stitch_legs(legs: &[Path]) -> Vec<NodeId> {
    let total = legs.iter().map(|l| l.nodes.len()).sum::<usize>();
    let mut out = Vec::with_capacity(total);
    for (i, leg) in legs.iter().enumerate() {
        let skip = if i == 0 { 0 } else { 1 };
        out.extend(leg.nodes.iter().skip(skip).copied());
    }
    out
}

// ── PathPlanner ───────────────────────────────────────────────────────────────

/// Plans storage and retrieval missions with a pluggable [`PathFinder`].
///
/// The planner holds no slot state: the registry is borrowed per call and
/// never modified.  Marking the chosen slot is the dispatcher's job.
#[derive(Clone, Debug, Default)]
pub struct PathPlanner<F: PathFinder = BfsPathFinder> {
    finder: F,
}

impl PathPlanner<BfsPathFinder> {
    pub fn new() -> Self {
        Self { finder: BfsPathFinder }
    }
}

impl<F: PathFinder> PathPlanner<F> {
    pub fn with_finder(finder: F) -> Self {
        Self { finder }
    }

    pub fn finder(&self) -> &F {
        &self.finder
    }

    /// Plan a storage mission for a pallet waiting at `spawn`.
    pub fn plan_storage(
        &self,
        graph:     &WarehouseGraph,
        agv_start: NodeId,
        spawn:     NodeId,
        slots:     &SlotRegistry,
    ) -> PlanResult<MissionPlan> {
        self.plan(MissionKind::Storage, graph, agv_start, spawn, slots)
    }

    /// Plan a retrieval mission delivering to `spawn`.
    pub fn plan_retrieval(
        &self,
        graph:     &WarehouseGraph,
        agv_start: NodeId,
        spawn:     NodeId,
        slots:     &SlotRegistry,
    ) -> PlanResult<MissionPlan> {
        self.plan(MissionKind::Retrieval, graph, agv_start, spawn, slots)
    }

    /// Plan a mission of either kind.
    ///
    /// # Errors
    ///
    /// - [`PlanError::MissingAnchor`] if `agv_start` or `spawn` is not in the graph.
    /// - [`PlanError::NoCandidate`] if no slot of the wanted occupancy is reachable.
    /// - [`PlanError::NoPath`] if any leg is disconnected.
    pub fn plan(
        &self,
        kind:      MissionKind,
        graph:     &WarehouseGraph,
        agv_start: NodeId,
        spawn:     NodeId,
        slots:     &SlotRegistry,
    ) -> PlanResult<MissionPlan> {
        if !graph.contains(agv_start) {
            return Err(PlanError::MissingAnchor(NodeKind::AgvStart));
        }
        if !graph.contains(spawn) {
            return Err(PlanError::MissingAnchor(NodeKind::PalletSpawn));
        }

        let reference = match kind {
            MissionKind::Storage   => spawn,
            MissionKind::Retrieval => agv_start,
        };
        let wanted = kind.wanted();
        let slot = find_closest_slot(&self.finder, graph, reference, slots, wanted)
            .ok_or(PlanError::NoCandidate(wanted))?;

        let stops = match kind {
            MissionKind::Storage   => [agv_start, spawn, slot.node, agv_start],
            MissionKind::Retrieval => [agv_start, slot.node, spawn, agv_start],
        };
        let legs = stops
            .windows(2)
            .map(|w| self.finder.shortest_path(graph, w[0], w[1]))
            .collect::<Result<Vec<Path>, _>>()?;

        let path = stitch_legs(&legs);
        debug!(%kind, slot = %slot.slot, hops = path.len().saturating_sub(1), "mission planned");
        Ok(MissionPlan { kind, slot, path })
    }
}

// ── Convenience functions ─────────────────────────────────────────────────────

/// Storage round trip with BFS, or `None` when no mission can be planned.
pub fn storage_path(
    graph:     &WarehouseGraph,
    agv_start: NodeId,
    spawn:     NodeId,
    slots:     &SlotRegistry,
) -> Option<Vec<NodeId>> {
    PathPlanner::new().plan_storage(graph, agv_start, spawn, slots).ok().map(|p| p.path)
}

/// Retrieval round trip with BFS, or `None` when no mission can be planned.
pub fn retrieval_path(
    graph:     &WarehouseGraph,
    agv_start: NodeId,
    spawn:     NodeId,
    slots:     &SlotRegistry,
) -> Option<Vec<NodeId>> {
    PathPlanner::new().plan_retrieval(graph, agv_start, spawn, slots).ok().map(|p| p.path)
}
