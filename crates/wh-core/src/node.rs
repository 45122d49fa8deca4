//! Node kinds and grid positions.

use std::fmt;
use std::str::FromStr;

use crate::WhError;

/// What a warehouse cell is used for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum NodeKind {
    /// Free floor an AGV can drive over.
    #[default]
    Aisle,
    /// One column of a shelf unit; holds `levels_per_shelf` slots.
    Shelf,
    /// Parking position of an AGV between missions.
    AgvStart,
    /// Outbound dock.
    Shipping,
    /// Where incoming pallets appear.
    PalletSpawn,
}

impl NodeKind {
    /// Label used on the wire and in CSV output.
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Aisle       => "aisle",
            NodeKind::Shelf       => "shelf",
            NodeKind::AgvStart    => "agv_start",
            NodeKind::Shipping    => "shipping",
            NodeKind::PalletSpawn => "pallet_spawn",
        }
    }

    /// Single-character symbol for grid dumps.
    pub fn symbol(self) -> char {
        match self {
            NodeKind::Aisle       => '.',
            NodeKind::Shelf       => '#',
            NodeKind::AgvStart    => 'A',
            NodeKind::Shipping    => 'S',
            NodeKind::PalletSpawn => 'P',
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NodeKind {
    type Err = WhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "aisle"        => Ok(NodeKind::Aisle),
            "shelf"        => Ok(NodeKind::Shelf),
            "agv_start"    => Ok(NodeKind::AgvStart),
            "shipping"     => Ok(NodeKind::Shipping),
            "pallet_spawn" => Ok(NodeKind::PalletSpawn),
            other => Err(WhError::Parse(format!("unknown node kind {other:?}"))),
        }
    }
}

/// A `(row, col)` cell in the warehouse grid.
///
/// Display only: planning distances are always graph hop counts, never
/// grid geometry.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridPos {
    pub row: u32,
    pub col: u32,
}

impl GridPos {
    #[inline]
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// The cell immediately to the left, or `None` on column 0.
    #[inline]
    pub fn left(self) -> Option<GridPos> {
        self.col.checked_sub(1).map(|col| GridPos { row: self.row, col })
    }

    /// Manhattan distance in cells.
    #[inline]
    pub fn manhattan(self, other: GridPos) -> u32 {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
