//! The `Dispatcher` and its event loop.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use wh_core::{DispatchConfig, NodeId, NodeKind};
use wh_graph::{BfsPathFinder, GraphSnapshot, PathFinder, WarehouseGraph};
use wh_slots::{Slot, SlotRegistry, UpsertOutcome};

use crate::{
    Arrival, BusResult, DispatchObserver, Inbound, MessageBus, MissionError, MissionKind, MissionPlan,
    MissionQueue, MissionResult, Outbound, PathPlanner, PlanError, PlanResult, Topics,
};

/// Receive timeout of [`Dispatcher::run`] when no prerequisite deadline is
/// pending.
const IDLE_POLL: Duration = Duration::from_millis(500);

// ── State ─────────────────────────────────────────────────────────────────────

/// Where the most recent arrival got to.
///
/// ```text
/// Idle ──pallet──▶ PlanningStorage ───┬──▶ Dispatched
///      ──order───▶ PlanningRetrieval ─┘
///                         │ plan failed
///                         └──────────────▶ Idle
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissionState {
    Idle,
    PlanningStorage,
    PlanningRetrieval,
    Dispatched,
}

impl MissionState {
    fn planning(kind: MissionKind) -> Self {
        match kind {
            MissionKind::Storage   => MissionState::PlanningStorage,
            MissionKind::Retrieval => MissionState::PlanningRetrieval,
        }
    }
}

/// Whether the dispatcher has what it needs to plan.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Readiness {
    /// Graph, anchors, or slots are missing.  Arrivals are deferred.
    Waiting { since: Instant },
    Ready,
    /// The wait timed out.  Arrivals are planned with whatever is known and
    /// dropped when that is not enough.
    Degraded,
}

/// Running counters, returned by [`Dispatcher::run`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchStats {
    pub arrivals:             u64,
    pub storage_dispatched:   u64,
    pub retrieval_dispatched: u64,
    pub dropped:              u64,
    pub deferred:             u64,
    pub discarded:            u64,
    pub stale_updates:        u64,
    pub slot_conflicts:       u64,
}

impl DispatchStats {
    pub fn dispatched(&self) -> u64 {
        self.storage_dispatched + self.retrieval_dispatched
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

/// Turns arrivals into missions.
///
/// One dispatcher handles one message at a time.  It owns its replica of the
/// slot registry and the mission queue; the planner only borrows them.
///
/// For each arrival:
///
/// 1. Plan a storage (pallet) or retrieval (order) mission.
/// 2. On success, publish the slot record with `in_use` flipped and the
///    queue with the path appended, then apply both locally.
/// 3. If planning or publishing fails, change nothing and drop the arrival.
///
/// Until the graph, both anchor nodes, and `min_slots` slots are known,
/// arrivals are deferred.  After `prerequisite_timeout` the dispatcher stops
/// waiting and replays them in degraded mode.
///
/// Create via [`DispatcherBuilder`][crate::DispatcherBuilder].
pub struct Dispatcher<B: MessageBus, F: PathFinder = BfsPathFinder> {
    pub(crate) config:       DispatchConfig,
    pub(crate) topics:       Topics,
    pub(crate) planner:      PathPlanner<F>,
    pub(crate) bus:          B,
    pub(crate) graph:        Option<WarehouseGraph>,
    pub(crate) agv_start:    Option<NodeId>,
    pub(crate) pallet_spawn: Option<NodeId>,
    pub(crate) slots:        SlotRegistry,
    pub(crate) missions:     MissionQueue,
    pub(crate) readiness:    Readiness,
    pub(crate) deferred:     VecDeque<Arrival>,
    pub(crate) state:        MissionState,
    pub(crate) stats:        DispatchStats,
}

impl<B: MessageBus, F: PathFinder> Dispatcher<B, F> {
    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    pub fn topics(&self) -> &Topics {
        &self.topics
    }

    pub fn graph(&self) -> Option<&WarehouseGraph> {
        self.graph.as_ref()
    }

    pub fn agv_start(&self) -> Option<NodeId> {
        self.agv_start
    }

    pub fn pallet_spawn(&self) -> Option<NodeId> {
        self.pallet_spawn
    }

    pub fn slots(&self) -> &SlotRegistry {
        &self.slots
    }

    pub fn missions(&self) -> &MissionQueue {
        &self.missions
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    pub fn into_bus(self) -> B {
        self.bus
    }

    pub fn readiness(&self) -> Readiness {
        self.readiness
    }

    pub fn is_degraded(&self) -> bool {
        self.readiness == Readiness::Degraded
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn stats(&self) -> &DispatchStats {
        &self.stats
    }

    /// Arrivals waiting for prerequisites.
    pub fn deferred_len(&self) -> usize {
        self.deferred.len()
    }

    /// Names of the prerequisites still missing; empty when ready to plan.
    pub fn missing_prerequisites(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.graph.is_none() {
            missing.push("graph");
        }
        if self.agv_start.is_none() {
            missing.push("agv_start");
        }
        if self.pallet_spawn.is_none() {
            missing.push("pallet_spawn");
        }
        if self.slots.len() < self.config.min_slots {
            missing.push("slots");
        }
        missing
    }

    // ── Message handling ──────────────────────────────────────────────────

    /// Handle one message at the current time.
    pub fn handle<O: DispatchObserver>(&mut self, message: Inbound, observer: &mut O) -> MissionResult<()> {
        self.handle_at(message, Instant::now(), observer)
    }

    /// Handle one message as if received at `now`.
    ///
    /// Undecodable content is discarded and reported, not returned.  The only
    /// errors are publish failures.
    pub fn handle_at<O: DispatchObserver>(
        &mut self,
        message:  Inbound,
        now:      Instant,
        observer: &mut O,
    ) -> MissionResult<()> {
        self.poll_timeout(now, observer)?;

        match message {
            Inbound::Arrival(arrival) => return self.on_arrival(arrival, observer),
            Inbound::Graph(snapshot)  => self.apply_graph(&snapshot, observer),
            Inbound::SlotSnapshot { slots } => self.apply_slot_snapshot(slots, observer),
            Inbound::SlotUpdate(slot) => self.apply_slot_update(slot, observer),
            Inbound::Missions(snapshot) => {
                debug!(missions = snapshot.missions.len(), "mission queue republished");
                self.missions.replace(snapshot);
            }
        }
        self.check_ready(observer)
    }

    /// Decode and handle one JSON payload.  Malformed payloads are dropped.
    pub fn handle_json<O: DispatchObserver>(&mut self, payload: &[u8], observer: &mut O) -> MissionResult<()> {
        match Inbound::from_json(payload) {
            Ok(message) => self.handle(message, observer),
            Err(e) => {
                self.discard(e, observer);
                Ok(())
            }
        }
    }

    /// Give up waiting for prerequisites once the timeout has passed.
    pub fn poll_timeout<O: DispatchObserver>(&mut self, now: Instant, observer: &mut O) -> MissionResult<()> {
        let Readiness::Waiting { since } = self.readiness else {
            return Ok(());
        };
        let waited = now.saturating_duration_since(since);
        if waited < self.config.prerequisite_timeout() {
            return Ok(());
        }

        warn!(
            missing = ?self.missing_prerequisites(),
            waited_ms = waited.as_millis() as u64,
            "prerequisites not available, planning in degraded mode"
        );
        self.readiness = Readiness::Degraded;
        observer.on_ready(true);
        self.flush_deferred(observer)
    }

    /// Handle messages from `inbox` until every sender is dropped.
    ///
    /// Per-message errors are logged and do not stop the loop.
    pub fn run<O: DispatchObserver>(&mut self, inbox: &Receiver<Inbound>, observer: &mut O) -> DispatchStats {
        info!(prefix = self.topics.prefix(), "dispatcher started");
        loop {
            let wait = self.time_to_deadline(Instant::now()).unwrap_or(IDLE_POLL);
            let result = match inbox.recv_timeout(wait) {
                Ok(message) => self.handle(message, observer),
                Err(RecvTimeoutError::Timeout) => self.poll_timeout(Instant::now(), observer),
                Err(RecvTimeoutError::Disconnected) => break,
            };
            if let Err(e) = result {
                warn!(error = %e, "message handling failed");
            }
        }

        let s = self.stats;
        info!(
            storage = s.storage_dispatched,
            retrieval = s.retrieval_dispatched,
            dropped = s.dropped,
            conflicts = s.slot_conflicts,
            "dispatcher stopped"
        );
        observer.on_stop(&self.stats);
        s
    }

    fn time_to_deadline(&self, now: Instant) -> Option<Duration> {
        match self.readiness {
            Readiness::Waiting { since } => {
                Some((since + self.config.prerequisite_timeout()).saturating_duration_since(now))
            }
            _ => None,
        }
    }

    // ── Prerequisites ─────────────────────────────────────────────────────

    fn apply_graph<O: DispatchObserver>(&mut self, snapshot: &GraphSnapshot, observer: &mut O) {
        let graph = match WarehouseGraph::from_snapshot(snapshot) {
            Ok(g) => g,
            Err(e) => return self.discard(e.into(), observer),
        };
        self.agv_start    = resolve_anchor(&graph, self.config.agv_start, NodeKind::AgvStart);
        self.pallet_spawn = resolve_anchor(&graph, self.config.pallet_spawn, NodeKind::PalletSpawn);
        info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            agv_start = ?self.agv_start,
            pallet_spawn = ?self.pallet_spawn,
            "graph received"
        );
        self.graph = Some(graph);
    }

    fn check_ready<O: DispatchObserver>(&mut self, observer: &mut O) -> MissionResult<()> {
        if self.readiness == Readiness::Ready || !self.missing_prerequisites().is_empty() {
            return Ok(());
        }
        info!(
            slots = self.slots.len(),
            deferred = self.deferred.len(),
            "prerequisites available"
        );
        self.readiness = Readiness::Ready;
        observer.on_ready(false);
        self.flush_deferred(observer)
    }

    /// Replay every deferred arrival.  A failed arrival does not stop the
    /// rest; the first error is returned once the queue is empty.
    fn flush_deferred<O: DispatchObserver>(&mut self, observer: &mut O) -> MissionResult<()> {
        let mut first_error = None;
        while let Some(arrival) = self.deferred.pop_front() {
            if let Err(e) = self.dispatch(arrival, observer) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    // ── Slot replication ──────────────────────────────────────────────────

    /// A full slot set.  Taken as-is into an empty registry, otherwise merged
    /// record by record so local changes are not rolled back.
    fn apply_slot_snapshot<O: DispatchObserver>(&mut self, slots: Vec<Slot>, observer: &mut O) {
        if self.slots.is_empty() {
            info!(slots = slots.len(), "slot set received");
            self.slots.replace_all(slots);
            return;
        }
        for slot in slots {
            self.apply_slot_update(slot, observer);
        }
    }

    fn apply_slot_update<O: DispatchObserver>(&mut self, incoming: Slot, observer: &mut O) {
        let local = self.slots.get(incoming.id).cloned();
        let outcome = self.slots.upsert(incoming.clone());

        match outcome {
            UpsertOutcome::Conflict => {
                self.stats.slot_conflicts += 1;
                if let Some(local) = &local {
                    warn!(
                        slot = %incoming.id,
                        version = incoming.version,
                        local_in_use = local.in_use,
                        incoming_in_use = incoming.in_use,
                        "conflicting slot update, keeping local state"
                    );
                    observer.on_slot_conflict(local, &incoming);
                }
            }
            UpsertOutcome::Stale => {
                self.stats.stale_updates += 1;
                debug!(slot = %incoming.id, version = incoming.version, "stale slot update ignored");
            }
            _ => debug!(slot = %incoming.id, ?outcome, "slot update"),
        }
        observer.on_slot_received(&incoming, outcome);
    }

    // ── Arrivals ──────────────────────────────────────────────────────────

    fn on_arrival<O: DispatchObserver>(&mut self, arrival: Arrival, observer: &mut O) -> MissionResult<()> {
        self.stats.arrivals += 1;
        if let Readiness::Waiting { .. } = self.readiness {
            self.stats.deferred += 1;
            debug!(trigger = %arrival.trigger, id = arrival.id, "arrival deferred");
            self.deferred.push_back(arrival);
            observer.on_arrival_deferred(&arrival);
            return Ok(());
        }
        self.dispatch(arrival, observer)
    }

    fn dispatch<O: DispatchObserver>(&mut self, arrival: Arrival, observer: &mut O) -> MissionResult<()> {
        let kind = arrival.trigger.mission_kind();
        self.state = MissionState::planning(kind);

        let plan = match self.plan(kind) {
            Ok(plan) => plan,
            Err(e) => {
                self.state = MissionState::Idle;
                self.stats.dropped += 1;
                info!(trigger = %arrival.trigger, id = arrival.id, reason = %e, "arrival dropped");
                observer.on_arrival_dropped(&arrival, &e);
                return Ok(());
            }
        };

        // Nothing is applied locally until both messages are out.
        let staged = self.slots.staged(plan.slot.slot, kind.slot_in_use_after(), &self.config.dispatcher_id);
        let slot = match staged {
            Ok(slot) => slot,
            Err(e) => {
                self.state = MissionState::Idle;
                return Err(e.into());
            }
        };
        let mut queued = self.missions.snapshot();
        queued.missions.push(plan.path.clone());

        let published = self
            .publish(&Outbound::SlotUpdate(slot.clone()))
            .and_then(|()| self.publish(&Outbound::Missions(queued)));
        if let Err(e) = published {
            self.state = MissionState::Idle;
            self.stats.dropped += 1;
            warn!(trigger = %arrival.trigger, id = arrival.id, error = %e, "publish failed, mission abandoned");
            observer.on_publish_failed(&arrival, &e);
            return Err(e.into());
        }

        self.slots.commit(slot.clone());
        observer.on_slot_published(&slot);
        self.missions.push(plan.path.clone());

        match kind {
            MissionKind::Storage   => self.stats.storage_dispatched += 1,
            MissionKind::Retrieval => self.stats.retrieval_dispatched += 1,
        }
        self.state = MissionState::Dispatched;
        info!(
            %kind,
            id = arrival.id,
            slot = %plan.slot.slot,
            node = %plan.slot.node,
            hops = plan.hops(),
            queued = self.missions.len(),
            "mission dispatched"
        );
        observer.on_mission_dispatched(&arrival, &plan);
        Ok(())
    }

    fn publish(&mut self, message: &Outbound) -> BusResult<()> {
        let topic = message.topic(&self.topics);
        self.bus.publish(&topic, message)
    }

    fn plan(&self, kind: MissionKind) -> PlanResult<MissionPlan> {
        let graph = self.graph.as_ref().ok_or(PlanError::MissingGraph)?;
        let start = self.agv_start.ok_or(PlanError::MissingAnchor(NodeKind::AgvStart))?;
        let spawn = self.pallet_spawn.ok_or(PlanError::MissingAnchor(NodeKind::PalletSpawn))?;
        self.planner.plan(kind, graph, start, spawn, &self.slots)
    }

    fn discard<O: DispatchObserver>(&mut self, error: MissionError, observer: &mut O) {
        self.stats.discarded += 1;
        warn!(error = %error, "discarding malformed message");
        observer.on_message_discarded(&error);
    }
}

/// The configured anchor if it is in `graph`, else the lowest node of `kind`
/// when none was configured.
pub(crate) fn resolve_anchor(
    graph:      &WarehouseGraph,
    configured: Option<NodeId>,
    kind:       NodeKind,
) -> Option<NodeId> {
    match configured {
        Some(node) if graph.contains(node) => Some(node),
        Some(node) => {
            warn!(%node, %kind, "configured anchor is not in the graph");
            None
        }
        None => graph.first_of_kind(kind),
    }
}
