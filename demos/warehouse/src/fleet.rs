//! Simulated AGV fleet: the consumer side of the mission queue.
//!
//! Each step every idle AGV claims the queue head and stays busy for as many
//! steps as the mission takes to drive.  After claiming, the fleet
//! republishes the remainder so the dispatcher's copy of the queue follows.

use wh_core::NodeId;
use wh_mission::{MissionQueue, MissionQueueSnapshot};

pub struct Agv {
    pub id:         usize,
    pub home:       NodeId,
    busy_until:     u64,
    pub completed:  u32,
    pub hops_total: u64,
}

impl Agv {
    fn idle(&self, step: u64) -> bool {
        step >= self.busy_until
    }
}

pub struct Fleet {
    pub agvs:      Vec<Agv>,
    hops_per_step: u32,
    /// Latest queue snapshot seen on the bus.
    queue:         MissionQueue,
}

impl Fleet {
    pub fn new(homes: impl IntoIterator<Item = NodeId>, hops_per_step: u32) -> Self {
        let agvs = homes
            .into_iter()
            .enumerate()
            .map(|(id, home)| Agv { id, home, busy_until: 0, completed: 0, hops_total: 0 })
            .collect();
        Self { agvs, hops_per_step, queue: MissionQueue::new() }
    }

    /// Adopt a queue snapshot published by the dispatcher.
    pub fn observe(&mut self, snapshot: MissionQueueSnapshot) {
        self.queue.replace(snapshot);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Let idle AGVs claim missions.  Returns the remainder to republish, or
    /// `None` if nothing was claimed.
    pub fn step(&mut self, step: u64) -> Option<MissionQueueSnapshot> {
        let mut claimed = false;
        for agv in self.agvs.iter_mut().filter(|a| a.idle(step)) {
            let Some(path) = self.queue.claim_head() else {
                break;
            };
            let hops = path.len().saturating_sub(1) as u64;
            agv.busy_until = step + hops.div_ceil(self.hops_per_step as u64).max(1);
            agv.completed += 1;
            agv.hops_total += hops;
            claimed = true;
            tracing::debug!(agv = agv.id, hops, until = agv.busy_until, "mission claimed");
        }
        claimed.then(|| self.queue.snapshot())
    }
}
