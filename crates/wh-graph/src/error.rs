//! Graph-subsystem error type.

use thiserror::Error;

use wh_core::NodeId;

/// Errors produced by `wh-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no path from {from} to {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("node {0} listed more than once")]
    DuplicateNode(NodeId),

    #[error("node ids must be contiguous from 0: expected {expected}, found {found}")]
    NonContiguousIds { expected: NodeId, found: NodeId },

    #[error("invalid layout: {0}")]
    InvalidLayout(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
