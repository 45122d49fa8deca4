//! The pending mission queue and its claim-and-republish protocol.
//!
//! The queue lives on the bus as a retained [`MissionQueueSnapshot`].  The
//! dispatcher appends to it; an AGV claims the head, drives it, and
//! publishes the remainder.  Nothing stops two AGVs claiming the same head
//! at once: the protocol only approximates one consumer per mission.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use wh_core::NodeId;

/// Wire form of the queue: `{"missions": [[0, 1, 2, 1, 0], ...]}`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissionQueueSnapshot {
    #[serde(default)]
    pub missions: Vec<Vec<NodeId>>,
}

/// Ordered paths waiting for an AGV, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MissionQueue {
    missions: VecDeque<Vec<NodeId>>,
}

impl MissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.missions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }

    pub fn push(&mut self, path: Vec<NodeId>) {
        self.missions.push_back(path);
    }

    pub fn head(&self) -> Option<&[NodeId]> {
        self.missions.front().map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = &[NodeId]> + '_ {
        self.missions.iter().map(Vec::as_slice)
    }

    /// Take the oldest mission.  The caller publishes [`snapshot`](Self::snapshot)
    /// afterwards so other consumers see the claim.
    pub fn claim_head(&mut self) -> Option<Vec<NodeId>> {
        self.missions.pop_front()
    }

    /// Adopt a snapshot republished by another process.
    pub fn replace(&mut self, snapshot: MissionQueueSnapshot) {
        self.missions = snapshot.missions.into();
    }

    pub fn snapshot(&self) -> MissionQueueSnapshot {
        MissionQueueSnapshot { missions: self.missions.iter().cloned().collect() }
    }
}

impl From<MissionQueueSnapshot> for MissionQueue {
    fn from(snapshot: MissionQueueSnapshot) -> Self {
        Self { missions: snapshot.missions.into() }
    }
}
