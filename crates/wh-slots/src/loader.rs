//! CSV slot loader.
//!
//! # CSV format
//!
//! One row per slot.  Empty `accessible_node` / `shelf_node` cells mean
//! "none".  `in_use` accepts `true`/`false` or `1`/`0`.
//!
//! ```csv
//! slot_id,accessible_node,in_use,shelf_node,row,col,level
//! 1,44,false,45,3,3,1
//! 2,44,true,45,3,3,2
//! 3,,false,60,4,0,1
//! ```
//!
//! Loaded slots start at version 0.

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use wh_core::{GridPos, NodeId, SlotId};

use crate::{Slot, SlotError};

// ── CSV record ────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct SlotRecord {
    slot_id:         u32,
    accessible_node: Option<u32>,
    in_use:          String,
    shelf_node:      Option<u32>,
    row:             u32,
    col:             u32,
    level:           u32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load slots from a CSV file.
pub fn load_slots_csv(path: &Path) -> Result<Vec<Slot>, SlotError> {
    let file = std::fs::File::open(path)?;
    load_slots_reader(file)
}

/// Like [`load_slots_csv`] but accepts any `Read` source.
///
/// # Errors
///
/// [`SlotError::Parse`] for malformed rows, unreadable `in_use` values, or a
/// repeated `slot_id`.
pub fn load_slots_reader<R: Read>(reader: R) -> Result<Vec<Slot>, SlotError> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut seen = BTreeSet::new();
    let mut slots = Vec::new();

    for result in csv_reader.deserialize::<SlotRecord>() {
        let row = result.map_err(|e| SlotError::Parse(e.to_string()))?;
        if !seen.insert(row.slot_id) {
            return Err(SlotError::Parse(format!("duplicate slot_id {}", row.slot_id)));
        }
        slots.push(Slot {
            id:              SlotId(row.slot_id),
            accessible_node: row.accessible_node.map(NodeId),
            in_use:          parse_flag(&row.in_use)?,
            shelf_node:      row.shelf_node.map(NodeId),
            position:        GridPos::new(row.row, row.col),
            level:           row.level,
            version:         0,
            updated_by:      None,
        });
    }

    Ok(slots)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_flag(s: &str) -> Result<bool, SlotError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "1"  => Ok(true),
        "false" | "0" => Ok(false),
        other => Err(SlotError::Parse(format!(
            "invalid in_use {other:?}: expected true/false or 1/0"
        ))),
    }
}
