//! Unit tests for wh-output.

#[cfg(test)]
mod csv_tests {
    use tempfile::TempDir;

    use crate::csv::{CsvLogWriter, MISSION_HEADERS, SLOT_UPDATE_HEADERS};
    use crate::row::{MissionRow, SlotUpdateRow};
    use crate::writer::LogWriter;

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn mission_row(seq: u64) -> MissionRow {
        MissionRow {
            seq,
            arrival_id:   seq * 10,
            timestamp_ms: 1_500,
            kind:         "storage",
            slot_id:      1,
            slot_node:    4,
            distance:     2,
            hops:         8,
            path:         "0 1 2 3 4 3 2 1 0".into(),
        }
    }

    #[test]
    fn csv_files_created_with_headers() {
        let dir = tmp();
        let mut w = CsvLogWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("missions.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, MISSION_HEADERS);

        let mut rdr = csv::Reader::from_path(dir.path().join("slot_updates.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, SLOT_UPDATE_HEADERS);
    }

    #[test]
    fn mission_rows_written() {
        let dir = tmp();
        let mut w = CsvLogWriter::new(dir.path()).unwrap();
        w.write_mission(&mission_row(1)).unwrap();
        w.write_mission(&mission_row(2)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("missions.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "10");      // arrival_id
        assert_eq!(&rows[0][3], "storage"); // kind
        assert_eq!(&rows[1][8], "0 1 2 3 4 3 2 1 0");
    }

    #[test]
    fn slot_update_rows_written() {
        let dir = tmp();
        let mut w = CsvLogWriter::new(dir.path()).unwrap();
        w.write_slot_update(&SlotUpdateRow {
            seq:        1,
            slot_id:    7,
            in_use:     true,
            version:    3,
            source:     "remote",
            outcome:    "conflict",
            updated_by: String::new(),
        })
        .unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("slot_updates.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][2], "1");
        assert_eq!(&rows[0][5], "conflict");
        assert_eq!(&rows[0][6], "");
    }

    #[test]
    fn finish_is_idempotent() {
        let dir = tmp();
        let mut w = CsvLogWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn missing_directory_fails() {
        let dir = tmp();
        assert!(CsvLogWriter::new(&dir.path().join("absent")).is_err());
    }
}

#[cfg(test)]
mod observer_tests {
    use wh_core::{DispatchConfig, GridPos, NodeId, NodeKind, SlotId};
    use wh_graph::{WarehouseGraph, WarehouseGraphBuilder};
    use wh_mission::{Arrival, DispatcherBuilder, Inbound, RecordingBus};
    use wh_slots::Slot;

    use crate::{DispatchLogObserver, LogWriter, MissionRow, OutputError, OutputResult, SlotUpdateRow};

    /// In-memory writer.
    #[derive(Default)]
    struct MemWriter {
        missions: Vec<MissionRow>,
        slots:    Vec<SlotUpdateRow>,
        finished: u32,
        fail:     bool,
    }

    impl LogWriter for MemWriter {
        fn write_mission(&mut self, row: &MissionRow) -> OutputResult<()> {
            if self.fail {
                return Err(OutputError::Io(std::io::Error::other("disk full")));
            }
            self.missions.push(row.clone());
            Ok(())
        }

        fn write_slot_update(&mut self, row: &SlotUpdateRow) -> OutputResult<()> {
            self.slots.push(row.clone());
            Ok(())
        }

        fn finish(&mut self) -> OutputResult<()> {
            self.finished += 1;
            Ok(())
        }
    }

    /// Line 0-1-2-3-4, AGV start 0, pallet spawn 2.
    fn line() -> WarehouseGraph {
        let mut b = WarehouseGraphBuilder::new();
        for i in 0..5 {
            let kind = match i {
                0 => NodeKind::AgvStart,
                2 => NodeKind::PalletSpawn,
                _ => NodeKind::Aisle,
            };
            b.add_node(kind, GridPos::new(0, i));
        }
        for i in 1..5 {
            b.add_edge(NodeId(i - 1), NodeId(i)).unwrap();
        }
        b.build()
    }

    #[test]
    fn logs_missions_and_slot_traffic() {
        let mut d = DispatcherBuilder::new(DispatchConfig::default(), RecordingBus::new())
            .graph(line())
            .slots(vec![Slot::new(SlotId(1), Some(NodeId(4)))])
            .build()
            .unwrap();
        let mut obs = DispatchLogObserver::new(MemWriter::default());

        let (tx, rx) = std::sync::mpsc::channel();
        tx.send(Inbound::Arrival(Arrival { timestamp_ms: 250, ..Arrival::pallet(3) })).unwrap();
        tx.send(Inbound::SlotUpdate(Slot::new(SlotId(1), Some(NodeId(4))))).unwrap();
        drop(tx);
        d.run(&rx, &mut obs);

        assert!(obs.take_error().is_none());
        let w = obs.into_writer();
        assert_eq!(w.finished, 1);

        assert_eq!(w.missions.len(), 1);
        let m = &w.missions[0];
        assert_eq!((m.seq, m.arrival_id, m.timestamp_ms), (2, 3, 250));
        assert_eq!(m.kind, "storage");
        assert_eq!(m.path, "0 1 2 3 4 3 2 1 0");
        assert_eq!(m.hops, 8);

        assert_eq!(w.slots.len(), 2);
        assert_eq!((w.slots[0].source, w.slots[0].outcome), ("local", "published"));
        assert_eq!(w.slots[0].updated_by, "dispatcher");
        assert_eq!((w.slots[1].source, w.slots[1].outcome), ("remote", "stale"));
    }

    #[test]
    fn first_write_error_is_kept() {
        let mut d = DispatcherBuilder::new(DispatchConfig::default(), RecordingBus::new())
            .graph(line())
            .slots(vec![Slot::new(SlotId(1), Some(NodeId(4))), Slot::new(SlotId(2), Some(NodeId(3)))])
            .build()
            .unwrap();
        let mut obs = DispatchLogObserver::new(MemWriter { fail: true, ..MemWriter::default() });

        d.handle(Inbound::Arrival(Arrival::pallet(1)), &mut obs).unwrap();
        d.handle(Inbound::Arrival(Arrival::pallet(2)), &mut obs).unwrap();

        assert_eq!(d.stats().storage_dispatched, 2, "log failures do not stop dispatch");
        assert!(matches!(obs.take_error(), Some(OutputError::Io(_))));
        assert!(obs.take_error().is_none());
    }
}
