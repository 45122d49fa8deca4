//! `wh-output`: dispatch log writers for the warehouse mission workspace.
//!
//! | Backend | Files created                        |
//! |---------|--------------------------------------|
//! | CSV     | `missions.csv`, `slot_updates.csv`   |
//!
//! Backends implement [`LogWriter`] and are driven by
//! [`DispatchLogObserver`], which implements `wh_mission::DispatchObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wh_output::{CsvLogWriter, DispatchLogObserver};
//!
//! let writer = CsvLogWriter::new(Path::new("./output"))?;
//! let mut obs = DispatchLogObserver::new(writer);
//! dispatcher.run(&inbox, &mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(test)]
mod tests;

pub use csv::CsvLogWriter;
pub use error::{OutputError, OutputResult};
pub use observer::DispatchLogObserver;
pub use row::{MissionRow, SlotUpdateRow};
pub use writer::LogWriter;
