//! `DispatchLogObserver<W>`: bridges `DispatchObserver` to a `LogWriter`.

use wh_mission::{Arrival, DispatchObserver, DispatchStats, MissionPlan};
use wh_slots::{Slot, UpsertOutcome};

use crate::row::{MissionRow, SlotUpdateRow};
use crate::writer::LogWriter;
use crate::{OutputError, OutputResult};

/// A [`DispatchObserver`] that logs dispatched missions and slot traffic to
/// any [`LogWriter`] backend.
///
/// Errors from the writer are stored internally because observer methods
/// have no return value.  After `dispatcher.run()` returns, check for errors
/// with [`take_error`][Self::take_error].
pub struct DispatchLogObserver<W: LogWriter> {
    writer:     W,
    seq:        u64,
    last_error: Option<OutputError>,
}

impl<W: LogWriter> DispatchLogObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, seq: 0, last_error: None }
    }

    /// Take the stored write error (if any).
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer without waiting for `on_stop`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn slot_row(&mut self, slot: &Slot, source: &'static str, outcome: &'static str) {
        let row = SlotUpdateRow {
            seq:        self.next_seq(),
            slot_id:    slot.id.0,
            in_use:     slot.in_use,
            version:    slot.version,
            source,
            outcome,
            updated_by: slot.updated_by.clone().unwrap_or_default(),
        };
        let result = self.writer.write_slot_update(&row);
        self.store_err(result);
    }
}

fn outcome_name(outcome: UpsertOutcome) -> &'static str {
    match outcome {
        UpsertOutcome::Inserted  => "inserted",
        UpsertOutcome::Updated   => "updated",
        UpsertOutcome::Unchanged => "unchanged",
        UpsertOutcome::Stale     => "stale",
        UpsertOutcome::Conflict  => "conflict",
    }
}

impl<W: LogWriter> DispatchObserver for DispatchLogObserver<W> {
    fn on_mission_dispatched(&mut self, arrival: &Arrival, plan: &MissionPlan) {
        let path = plan.path.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ");
        let row = MissionRow {
            seq:          self.next_seq(),
            arrival_id:   arrival.id,
            timestamp_ms: arrival.timestamp_ms,
            kind:         plan.kind.as_str(),
            slot_id:      plan.slot.slot.0,
            slot_node:    plan.slot.node.0,
            distance:     plan.slot.distance,
            hops:         plan.hops() as u64,
            path,
        };
        let result = self.writer.write_mission(&row);
        self.store_err(result);
    }

    fn on_slot_published(&mut self, slot: &Slot) {
        self.slot_row(slot, "local", "published");
    }

    fn on_slot_received(&mut self, slot: &Slot, outcome: UpsertOutcome) {
        self.slot_row(slot, "remote", outcome_name(outcome));
    }

    fn on_stop(&mut self, _stats: &DispatchStats) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
