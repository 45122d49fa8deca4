//! Path-finding trait and default breadth-first implementation.
//!
//! # Pluggability
//!
//! The slot scheduler and mission planner call path finding through the
//! [`PathFinder`] trait, so applications can swap in a cached or precomputed
//! distance table without touching the planning code.  The default
//! [`BfsPathFinder`] runs a fresh breadth-first search per query, which is
//! plenty for warehouse graphs of a few hundred nodes.
//!
//! # Cost units
//!
//! Every edge costs one hop.  Cell geometry (`GridPos`) is never consulted.

use std::collections::VecDeque;

use wh_core::NodeId;

use crate::graph::WarehouseGraph;
use crate::{GraphError, GraphResult};

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a path query: every node visited, source and target included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Path {
    pub nodes: Vec<NodeId>,
}

impl Path {
    /// Number of edges traversed.
    pub fn hops(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    /// `true` if source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() <= 1
    }

    pub fn source(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn target(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }
}

// ── Distances ─────────────────────────────────────────────────────────────────

/// Hop counts from one source to every node of a graph.
#[derive(Debug, Clone)]
pub struct Distances {
    source: NodeId,
    /// `u32::MAX` marks nodes unreachable from `source`.
    hops: Vec<u32>,
}

impl Distances {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Hop count to `node`, or `None` if it is unreachable or not in the graph.
    #[inline]
    pub fn get(&self, node: NodeId) -> Option<u32> {
        match self.hops.get(node.index()) {
            Some(&h) if h != u32::MAX => Some(h),
            _ => None,
        }
    }

    /// Number of nodes reachable from the source (the source included).
    pub fn reachable_count(&self) -> usize {
        self.hops.iter().filter(|&&h| h != u32::MAX).count()
    }
}

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine over a [`WarehouseGraph`].
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so a dispatcher can be moved onto
/// its own event-loop thread.
pub trait PathFinder: Send + Sync {
    /// Shortest path from `from` to `to`, both endpoints included.
    ///
    /// `from == to` yields the single-node path.  Fails with
    /// [`GraphError::NodeNotFound`] for unknown endpoints and
    /// [`GraphError::NoPath`] when they lie in different components.
    fn shortest_path(&self, graph: &WarehouseGraph, from: NodeId, to: NodeId) -> GraphResult<Path>;

    /// Hop counts from `from` to every node.
    fn distances_from(&self, graph: &WarehouseGraph, from: NodeId) -> GraphResult<Distances>;
}

// ── BfsPathFinder ─────────────────────────────────────────────────────────────

/// Unweighted breadth-first search over the CSR adjacency.
///
/// Neighbours are visited in ascending id order, so among several shortest
/// paths the one through the lowest-numbered nodes is returned consistently.
#[derive(Clone, Copy, Debug, Default)]
pub struct BfsPathFinder;

impl PathFinder for BfsPathFinder {
    fn shortest_path(&self, graph: &WarehouseGraph, from: NodeId, to: NodeId) -> GraphResult<Path> {
        bfs_path(graph, from, to)
    }

    fn distances_from(&self, graph: &WarehouseGraph, from: NodeId) -> GraphResult<Distances> {
        bfs_distances(graph, from)
    }
}

// ── BFS internals ─────────────────────────────────────────────────────────────

fn bfs_path(graph: &WarehouseGraph, from: NodeId, to: NodeId) -> GraphResult<Path> {
    for n in [from, to] {
        if !graph.contains(n) {
            return Err(GraphError::NodeNotFound(n));
        }
    }
    if from == to {
        return Ok(Path { nodes: vec![from] });
    }

    // prev[v] = node that discovered v; `None` for undiscovered nodes.
    let mut prev: Vec<Option<NodeId>> = vec![None; graph.node_count()];
    let mut seen = vec![false; graph.node_count()];
    let mut frontier = VecDeque::new();

    seen[from.index()] = true;
    frontier.push_back(from);

    while let Some(node) = frontier.pop_front() {
        for &next in graph.neighbors(node) {
            if seen[next.index()] {
                continue;
            }
            seen[next.index()] = true;
            prev[next.index()] = Some(node);
            if next == to {
                return Ok(reconstruct(&prev, to));
            }
            frontier.push_back(next);
        }
    }

    Err(GraphError::NoPath { from, to })
}

fn bfs_distances(graph: &WarehouseGraph, from: NodeId) -> GraphResult<Distances> {
    if !graph.contains(from) {
        return Err(GraphError::NodeNotFound(from));
    }

    let mut hops = vec![u32::MAX; graph.node_count()];
    let mut frontier = VecDeque::new();

    hops[from.index()] = 0;
    frontier.push_back(from);

    while let Some(node) = frontier.pop_front() {
        let next_hops = hops[node.index()] + 1;
        for &next in graph.neighbors(node) {
            if hops[next.index()] == u32::MAX {
                hops[next.index()] = next_hops;
                frontier.push_back(next);
            }
        }
    }

    Ok(Distances { source: from, hops })
}

fn reconstruct(prev: &[Option<NodeId>], to: NodeId) -> Path {
    let mut nodes = vec![to];
    let mut cur = to;
    while let Some(p) = prev[cur.index()] {
        nodes.push(p);
        cur = p;
    }
    nodes.reverse();
    Path { nodes }
}
