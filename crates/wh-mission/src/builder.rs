//! Fluent builder for constructing a [`Dispatcher`].

use std::collections::VecDeque;
use std::time::Instant;

use tracing::info;

use wh_core::{DispatchConfig, NodeKind};
use wh_graph::{BfsPathFinder, PathFinder, WarehouseGraph};
use wh_slots::{Slot, SlotRegistry};

use crate::dispatcher::resolve_anchor;
use crate::{
    DispatchStats, Dispatcher, MessageBus, MissionQueue, MissionQueueSnapshot, MissionResult,
    MissionState, PathPlanner, Readiness, Topics,
};

/// Fluent builder for [`Dispatcher<B, F>`].
///
/// # Required inputs
///
/// - [`DispatchConfig`]: topic prefix, anchor overrides, prerequisite wait
/// - `B: MessageBus`: where slot updates and the mission queue are published
///
/// # Optional inputs (have defaults)
///
/// | Method              | Default                                  |
/// |---------------------|------------------------------------------|
/// | `.finder(f)`        | [`BfsPathFinder`]                        |
/// | `.graph(g)`         | none; expected from the bus              |
/// | `.slots(v)`         | none; expected from the bus              |
/// | `.missions(s)`      | empty queue                              |
/// | `.started_at(t)`    | `Instant::now()` at `build`              |
///
/// Whatever is not supplied here has to arrive as messages before planning
/// starts, or the prerequisite timeout runs out.
///
/// # Example
///
/// ```rust,ignore
/// let mut dispatcher = DispatcherBuilder::new(DispatchConfig::default(), RecordingBus::new())
///     .graph(layout.to_graph())
///     .slots(generate_slots(&graph, 3))
///     .build()?;
/// dispatcher.handle(Inbound::Arrival(Arrival::pallet(1)), &mut NoopObserver)?;
/// ```
pub struct DispatcherBuilder<B: MessageBus, F: PathFinder = BfsPathFinder> {
    config:     DispatchConfig,
    bus:        B,
    finder:     F,
    graph:      Option<WarehouseGraph>,
    slots:      Option<Vec<Slot>>,
    missions:   Option<MissionQueueSnapshot>,
    started_at: Option<Instant>,
}

impl<B: MessageBus> DispatcherBuilder<B, BfsPathFinder> {
    /// Create a builder with all required inputs.
    pub fn new(config: DispatchConfig, bus: B) -> Self {
        Self {
            config,
            bus,
            finder:     BfsPathFinder,
            graph:      None,
            slots:      None,
            missions:   None,
            started_at: None,
        }
    }
}

impl<B: MessageBus, F: PathFinder> DispatcherBuilder<B, F> {
    /// Plan with a different path finder.
    pub fn finder<G: PathFinder>(self, finder: G) -> DispatcherBuilder<B, G> {
        DispatcherBuilder {
            config:     self.config,
            bus:        self.bus,
            finder,
            graph:      self.graph,
            slots:      self.slots,
            missions:   self.missions,
            started_at: self.started_at,
        }
    }

    pub fn graph(mut self, graph: WarehouseGraph) -> Self {
        self.graph = Some(graph);
        self
    }

    pub fn slots(mut self, slots: Vec<Slot>) -> Self {
        self.slots = Some(slots);
        self
    }

    /// Start from an existing queue instead of an empty one.
    pub fn missions(mut self, snapshot: MissionQueueSnapshot) -> Self {
        self.missions = Some(snapshot);
        self
    }

    /// Start the prerequisite wait at `at` rather than at build time.
    pub fn started_at(mut self, at: Instant) -> Self {
        self.started_at = Some(at);
        self
    }

    /// Validate the config and return a dispatcher, already `Ready` if the
    /// supplied inputs cover every prerequisite.
    pub fn build(self) -> MissionResult<Dispatcher<B, F>> {
        self.config.validate()?;

        let (agv_start, pallet_spawn) = match &self.graph {
            Some(g) => (
                resolve_anchor(g, self.config.agv_start, NodeKind::AgvStart),
                resolve_anchor(g, self.config.pallet_spawn, NodeKind::PalletSpawn),
            ),
            None => (None, None),
        };

        let mut dispatcher = Dispatcher {
            topics:    Topics::new(self.config.topic_prefix.trim()),
            config:    self.config,
            planner:   PathPlanner::with_finder(self.finder),
            bus:       self.bus,
            graph:     self.graph,
            agv_start,
            pallet_spawn,
            slots:     self.slots.map(SlotRegistry::from_slots).unwrap_or_default(),
            missions:  self.missions.map(MissionQueue::from).unwrap_or_default(),
            readiness: Readiness::Waiting { since: self.started_at.unwrap_or_else(Instant::now) },
            deferred:  VecDeque::new(),
            state:     MissionState::Idle,
            stats:     DispatchStats::default(),
        };

        let missing = dispatcher.missing_prerequisites();
        if missing.is_empty() {
            dispatcher.readiness = Readiness::Ready;
        }
        info!(
            prefix = dispatcher.topics.prefix(),
            slots = dispatcher.slots.len(),
            ?missing,
            "dispatcher built"
        );
        Ok(dispatcher)
    }
}
