//! Warehouse graph representation and builder.
//!
//! # Data layout
//!
//! The graph is undirected but stored as a **Compressed Sparse Row (CSR)**
//! adjacency with both directions of every edge.  Given a `NodeId n`, its
//! neighbours occupy the slice:
//!
//! ```text
//! adj[ adj_start[n] .. adj_start[n+1] ]
//! ```
//!
//! Neighbour slices are sorted ascending, so breadth-first traversal visits
//! nodes in a fixed order and equal-length paths are always resolved the
//! same way.
//!
//! # Position index
//!
//! A hash map from `GridPos` to `NodeId` supports the slot generator's
//! "aisle cell left of this shelf" lookup.

use rustc_hash::FxHashMap;

use wh_core::{GridPos, NodeId, NodeKind};

use crate::{GraphError, GraphResult};

// ── WarehouseGraph ────────────────────────────────────────────────────────────

/// Undirected warehouse graph in CSR format plus a grid-position index.
///
/// Read-only once built.  Do not construct directly; use
/// [`WarehouseGraphBuilder`] or [`WarehouseGraph::from_snapshot`].
#[derive(Clone, Debug)]
pub struct WarehouseGraph {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Kind of each node.  Indexed by `NodeId`.
    pub node_kind: Vec<NodeKind>,

    /// Grid cell of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GridPos>,

    // ── CSR adjacency ─────────────────────────────────────────────────────
    /// CSR row pointer.  Neighbours of node `n` are at
    /// `adj[adj_start[n] .. adj_start[n+1]]`.  Length = `node_count + 1`.
    pub adj_start: Vec<u32>,

    /// Flat neighbour array, both directions of every undirected edge.
    pub adj: Vec<NodeId>,

    // ── Position index ────────────────────────────────────────────────────
    by_pos: FxHashMap<GridPos, NodeId>,
}

impl WarehouseGraph {
    /// Construct a graph with no nodes or edges.
    ///
    /// Any path query against an empty graph fails with
    /// [`GraphError::NodeNotFound`].
    pub fn empty() -> Self {
        WarehouseGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_kind.len()
    }

    /// Number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.adj.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.node_kind.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_kind.len()
    }

    /// All node ids in ascending order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_kind.len() as u32).map(NodeId)
    }

    // ── Node attributes ───────────────────────────────────────────────────

    #[inline]
    pub fn kind(&self, node: NodeId) -> Option<NodeKind> {
        self.node_kind.get(node.index()).copied()
    }

    #[inline]
    pub fn position(&self, node: NodeId) -> Option<GridPos> {
        self.node_pos.get(node.index()).copied()
    }

    /// Node occupying grid cell `pos`, if any.
    pub fn node_at(&self, pos: GridPos) -> Option<NodeId> {
        self.by_pos.get(&pos).copied()
    }

    /// Every node of the given kind, ascending by id.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.node_kind
            .iter()
            .enumerate()
            .filter(move |(_, k)| **k == kind)
            .map(|(i, _)| NodeId(i as u32))
    }

    /// Lowest-id node of the given kind.
    pub fn first_of_kind(&self, kind: NodeKind) -> Option<NodeId> {
        self.nodes_of_kind(kind).next()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Neighbours of `node`, ascending.  Empty for unknown nodes.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[NodeId] {
        if !self.contains(node) {
            return &[];
        }
        let start = self.adj_start[node.index()] as usize;
        let end   = self.adj_start[node.index() + 1] as usize;
        &self.adj[start..end]
    }

    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        self.neighbors(node).len()
    }

    /// `true` if `a` and `b` share an edge.
    pub fn has_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }
}

// ── WarehouseGraphBuilder ─────────────────────────────────────────────────────

/// Construct a [`WarehouseGraph`] incrementally, then call [`build`](Self::build).
///
/// Nodes receive sequential ids from 0.  Edges may be added in any order;
/// `build()` mirrors them, drops self-loops and duplicates, and lays out the
/// CSR arrays.
///
/// # Example
///
/// ```
/// use wh_core::{GridPos, NodeKind};
/// use wh_graph::WarehouseGraphBuilder;
///
/// let mut b = WarehouseGraphBuilder::new();
/// let a = b.add_node(NodeKind::AgvStart, GridPos::new(0, 0));
/// let c = b.add_node(NodeKind::Aisle, GridPos::new(0, 1));
/// b.add_edge(a, c).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 1);
/// ```
pub struct WarehouseGraphBuilder {
    kinds:     Vec<NodeKind>,
    positions: Vec<GridPos>,
    raw_edges: Vec<(NodeId, NodeId)>,
}

impl WarehouseGraphBuilder {
    pub fn new() -> Self {
        Self { kinds: Vec::new(), positions: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and undirected edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            kinds:     Vec::with_capacity(nodes),
            positions: Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, kind: NodeKind, pos: GridPos) -> NodeId {
        let id = NodeId(self.kinds.len() as u32);
        self.kinds.push(kind);
        self.positions.push(pos);
        id
    }

    /// Add an undirected edge between two previously added nodes.
    pub fn add_edge(&mut self, a: NodeId, b: NodeId) -> GraphResult<()> {
        for n in [a, b] {
            if n.index() >= self.kinds.len() {
                return Err(GraphError::NodeNotFound(n));
            }
        }
        self.raw_edges.push((a, b));
        Ok(())
    }

    pub fn node_count(&self) -> usize { self.kinds.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`WarehouseGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort.
    pub fn build(self) -> WarehouseGraph {
        let node_count = self.kinds.len();

        // Mirror every edge, then sort by (from, to) so neighbour slices are
        // ascending and duplicates are adjacent.
        let mut directed: Vec<(NodeId, NodeId)> = Vec::with_capacity(self.raw_edges.len() * 2);
        for &(a, b) in &self.raw_edges {
            if a == b {
                continue;
            }
            directed.push((a, b));
            directed.push((b, a));
        }
        directed.sort_unstable();
        directed.dedup();

        let mut adj_start = vec![0u32; node_count + 1];
        for &(from, _) in &directed {
            adj_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            adj_start[i] += adj_start[i - 1];
        }
        debug_assert_eq!(adj_start[node_count] as usize, directed.len());

        let adj: Vec<NodeId> = directed.into_iter().map(|(_, to)| to).collect();

        let mut by_pos = FxHashMap::default();
        by_pos.reserve(node_count);
        for (i, &pos) in self.positions.iter().enumerate() {
            // First node registered at a cell owns it.
            by_pos.entry(pos).or_insert(NodeId(i as u32));
        }

        WarehouseGraph {
            node_kind: self.kinds,
            node_pos: self.positions,
            adj_start,
            adj,
            by_pos,
        }
    }
}

impl Default for WarehouseGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
