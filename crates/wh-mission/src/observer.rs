//! Dispatcher observer trait for logging and data collection.

use wh_slots::{Slot, UpsertOutcome};

use crate::{Arrival, BusError, DispatchStats, MissionError, MissionPlan, PlanError};

/// Callbacks invoked by the [`Dispatcher`][crate::Dispatcher] as it handles
/// messages.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: mission counter
///
/// ```rust,ignore
/// struct Counter { storage: usize }
///
/// impl DispatchObserver for Counter {
///     fn on_mission_dispatched(&mut self, _arrival: &Arrival, plan: &MissionPlan) {
///         if plan.kind == MissionKind::Storage {
///             self.storage += 1;
///         }
///     }
/// }
/// ```
pub trait DispatchObserver {
    /// Prerequisites are in place (`degraded == false`) or the wait for them
    /// timed out (`degraded == true`).
    fn on_ready(&mut self, _degraded: bool) {}

    /// An arrival was queued until prerequisites are available.
    fn on_arrival_deferred(&mut self, _arrival: &Arrival) {}

    /// A mission was planned and published, and its slot marked.
    fn on_mission_dispatched(&mut self, _arrival: &Arrival, _plan: &MissionPlan) {}

    /// No mission could be planned for `arrival`; it is dropped.
    fn on_arrival_dropped(&mut self, _arrival: &Arrival, _error: &PlanError) {}

    /// A mission was planned but could not be published.  The slot and the
    /// queue were left untouched and the arrival is dropped.
    fn on_publish_failed(&mut self, _arrival: &Arrival, _error: &BusError) {}

    /// This dispatcher changed a slot and published the new record.
    fn on_slot_published(&mut self, _slot: &Slot) {}

    /// A slot record arrived from the bus.
    fn on_slot_received(&mut self, _slot: &Slot, _outcome: UpsertOutcome) {}

    /// An incoming record has the local version but different content.
    /// The local copy was kept.
    fn on_slot_conflict(&mut self, _local: &Slot, _incoming: &Slot) {}

    /// A message could not be decoded and was dropped.
    fn on_message_discarded(&mut self, _error: &MissionError) {}

    /// Called once when [`Dispatcher::run`][crate::Dispatcher::run] returns.
    fn on_stop(&mut self, _stats: &DispatchStats) {}
}

/// A [`DispatchObserver`] that does nothing.
pub struct NoopObserver;

impl DispatchObserver for NoopObserver {}
