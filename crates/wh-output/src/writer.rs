//! The `LogWriter` trait implemented by log backends.

use crate::{MissionRow, OutputResult, SlotUpdateRow};

/// Sink for dispatch log rows.
///
/// Errors are stored by the observer and retrieved with
/// [`DispatchLogObserver::take_error`][crate::DispatchLogObserver::take_error].
pub trait LogWriter {
    fn write_mission(&mut self, row: &MissionRow) -> OutputResult<()>;

    fn write_slot_update(&mut self, row: &SlotUpdateRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
