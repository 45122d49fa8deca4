//! CSV log backend.
//!
//! Creates two files in the configured output directory:
//! - `missions.csv`
//! - `slot_updates.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::LogWriter;
use crate::{MissionRow, OutputResult, SlotUpdateRow};

pub const MISSION_HEADERS: [&str; 9] = [
    "seq", "arrival_id", "timestamp_ms", "kind", "slot_id", "slot_node", "distance", "hops", "path",
];

pub const SLOT_UPDATE_HEADERS: [&str; 7] =
    ["seq", "slot_id", "in_use", "version", "source", "outcome", "updated_by"];

/// Writes the dispatch log to two CSV files.
pub struct CsvLogWriter {
    missions:     Writer<File>,
    slot_updates: Writer<File>,
    finished:     bool,
}

impl CsvLogWriter {
    /// Create the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut missions = Writer::from_path(dir.join("missions.csv"))?;
        missions.write_record(MISSION_HEADERS)?;

        let mut slot_updates = Writer::from_path(dir.join("slot_updates.csv"))?;
        slot_updates.write_record(SLOT_UPDATE_HEADERS)?;

        Ok(Self { missions, slot_updates, finished: false })
    }
}

impl LogWriter for CsvLogWriter {
    fn write_mission(&mut self, row: &MissionRow) -> OutputResult<()> {
        self.missions.write_record(&[
            row.seq.to_string(),
            row.arrival_id.to_string(),
            row.timestamp_ms.to_string(),
            row.kind.to_string(),
            row.slot_id.to_string(),
            row.slot_node.to_string(),
            row.distance.to_string(),
            row.hops.to_string(),
            row.path.clone(),
        ])?;
        Ok(())
    }

    fn write_slot_update(&mut self, row: &SlotUpdateRow) -> OutputResult<()> {
        self.slot_updates.write_record(&[
            row.seq.to_string(),
            row.slot_id.to_string(),
            (row.in_use as u8).to_string(),
            row.version.to_string(),
            row.source.to_string(),
            row.outcome.to_string(),
            row.updated_by.clone(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.missions.flush()?;
        self.slot_updates.flush()?;
        Ok(())
    }
}
