use thiserror::Error;

use wh_core::{NodeId, NodeKind, WhError};
use wh_graph::GraphError;
use wh_slots::{Occupancy, SlotError};

/// Why a single mission could not be planned.
///
/// None of these are fatal: the dispatcher logs them and drops the arrival.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("no {0} slot available")]
    NoCandidate(Occupancy),

    #[error("no path from node {from} to node {to}")]
    NoPath { from: NodeId, to: NodeId },

    #[error("no warehouse graph received yet")]
    MissingGraph,

    #[error("{0} node is unknown or not in the graph")]
    MissingAnchor(NodeKind),

    #[error("graph error: {0}")]
    Graph(GraphError),
}

impl From<GraphError> for PlanError {
    fn from(e: GraphError) -> Self {
        match e {
            GraphError::NoPath { from, to } => PlanError::NoPath { from, to },
            other => PlanError::Graph(other),
        }
    }
}

/// Failure to hand a message to the bus.
#[derive(Debug, Error)]
pub enum BusError {
    #[error("bus receiver disconnected")]
    Disconnected,

    #[error("failed to encode message: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MissionError {
    #[error("malformed message: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] WhError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    #[error("slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),
}

pub type PlanResult<T>    = Result<T, PlanError>;
pub type BusResult<T>     = Result<T, BusError>;
pub type MissionResult<T> = Result<T, MissionError>;
