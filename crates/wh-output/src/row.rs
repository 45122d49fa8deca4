//! Plain data row types written by log backends.

/// One dispatched mission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissionRow {
    /// Position in the log, shared with [`SlotUpdateRow::seq`].
    pub seq:          u64,
    pub arrival_id:   u64,
    pub timestamp_ms: u64,
    /// `storage` or `retrieval`.
    pub kind:         &'static str,
    pub slot_id:      u32,
    /// Accessible node of the slot.
    pub slot_node:    u32,
    /// Hops from the reference node to `slot_node`.
    pub distance:     u32,
    pub hops:         u64,
    /// Node ids separated by spaces.
    pub path:         String,
}

/// One slot record published or received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotUpdateRow {
    pub seq:        u64,
    pub slot_id:    u32,
    pub in_use:     bool,
    pub version:    u64,
    /// `local` for changes made here, `remote` for records from the bus.
    pub source:     &'static str,
    /// `published` for local rows, else the registry's merge outcome.
    pub outcome:    &'static str,
    /// Empty when the record carries no writer.
    pub updated_by: String,
}
