//! Graph snapshot: the form a warehouse graph takes on the bus.
//!
//! # JSON shape (with the `serde` feature)
//!
//! ```json
//! {
//!   "nodes": [
//!     { "id": 0, "kind": "agv_start", "position": { "row": 0, "col": 0 } },
//!     { "id": 1, "kind": "aisle",     "position": { "row": 0, "col": 1 } }
//!   ],
//!   "edges": [[0, 1]]
//! }
//! ```
//!
//! Node ids must cover `0..n` exactly once, in any order.  Each undirected
//! edge is listed once; extra mirrored copies are tolerated.

use wh_core::{GridPos, NodeId, NodeKind};

use crate::{GraphError, GraphResult, WarehouseGraph, WarehouseGraphBuilder};

/// One node of a [`GraphSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeRecord {
    pub id:       NodeId,
    pub kind:     NodeKind,
    pub position: GridPos,
}

/// Serializable description of a whole [`WarehouseGraph`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<[NodeId; 2]>,
}

impl WarehouseGraph {
    /// Rebuild a graph from its snapshot.
    ///
    /// # Errors
    ///
    /// - [`GraphError::DuplicateNode`] if an id appears twice.
    /// - [`GraphError::NonContiguousIds`] if ids leave a gap.
    /// - [`GraphError::NodeNotFound`] if an edge names an unknown node.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> GraphResult<WarehouseGraph> {
        let mut nodes = snapshot.nodes.clone();
        nodes.sort_unstable_by_key(|n| n.id);

        let mut b = WarehouseGraphBuilder::with_capacity(nodes.len(), snapshot.edges.len());
        for (expected, record) in nodes.iter().enumerate() {
            let expected = NodeId(expected as u32);
            if record.id != expected {
                if expected.0 > 0 && record.id == NodeId(expected.0 - 1) {
                    return Err(GraphError::DuplicateNode(record.id));
                }
                return Err(GraphError::NonContiguousIds { expected, found: record.id });
            }
            b.add_node(record.kind, record.position);
        }
        for &[a, c] in &snapshot.edges {
            b.add_edge(a, c)?;
        }
        Ok(b.build())
    }

    /// Describe this graph as a snapshot.  Each undirected edge appears once
    /// as `[low, high]`.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let nodes = self
            .nodes()
            .map(|id| NodeRecord {
                id,
                kind:     self.node_kind[id.index()],
                position: self.node_pos[id.index()],
            })
            .collect();

        let edges = self
            .nodes()
            .flat_map(|a| {
                self.neighbors(a)
                    .iter()
                    .filter(move |&&c| a < c)
                    .map(move |&c| [a, c])
            })
            .collect();

        GraphSnapshot { nodes, edges }
    }
}
