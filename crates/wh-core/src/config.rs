//! Dispatcher configuration.
//!
//! Typically loaded from a JSON file by the application crate and passed to
//! `wh_mission::DispatcherBuilder`.  Every field has a default matching the
//! stock warehouse deployment, so an empty `{}` document is a valid config.

use std::time::Duration;

use crate::{NodeId, WhError, WhResult};

/// Top-level configuration of one mission-dispatch process.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Prefix of every bus topic, e.g. `warehouse` → `warehouse/missions`.
    pub topic_prefix: String,

    /// Stamped on every slot record this process changes, so replicas can
    /// tell two writers of the same version apart.  Must differ between
    /// dispatchers sharing a bus.
    pub dispatcher_id: String,

    /// AGV parking node missions start and end at.  `None` picks the lowest
    /// `agv_start` node of the received graph.
    pub agv_start: Option<NodeId>,

    /// Node where incoming pallets appear.  `None` picks the lowest
    /// `pallet_spawn` node of the received graph.
    pub pallet_spawn: Option<NodeId>,

    /// Slots that must be known before planning starts.  Default: 1.
    pub min_slots: usize,

    /// How long to wait for graph and slots before planning in degraded
    /// mode.  Default: 10 000 ms.
    pub prerequisite_timeout_ms: u64,
}

impl DispatchConfig {
    #[inline]
    pub fn prerequisite_timeout(&self) -> Duration {
        Duration::from_millis(self.prerequisite_timeout_ms)
    }

    /// Reject configurations that can never produce a topic layout.
    pub fn validate(&self) -> WhResult<()> {
        let prefix = self.topic_prefix.trim();
        if prefix.is_empty() {
            return Err(WhError::Config("topic_prefix must not be empty".into()));
        }
        if prefix.ends_with('/') || prefix.contains('#') || prefix.contains('+') {
            return Err(WhError::Config(format!(
                "topic_prefix {prefix:?} must not end with '/' or contain wildcards"
            )));
        }
        if self.dispatcher_id.trim().is_empty() {
            return Err(WhError::Config("dispatcher_id must not be empty".into()));
        }
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            topic_prefix:            "warehouse".to_string(),
            dispatcher_id:           "dispatcher".to_string(),
            agv_start:               None,
            pallet_spawn:            None,
            min_slots:               1,
            prerequisite_timeout_ms: 10_000,
        }
    }
}
