//! Grid warehouse generator.
//!
//! Produces the stock warehouse floor plan from four parameters and turns it
//! into a [`WarehouseGraph`].
//!
//! # Floor plan
//!
//! ```text
//!  row 0      . . . . A . . . A . . . . .    AGV start row (agvs spread evenly)
//!  rows 1-2   . . . . . . . . . . . . . .    cross aisle
//!  rows 3..   . . . # . # . . # . # . . .    shelves: vertical lines, one
//!             . . . # . # . . # . # . . .    column wide, columns_per_shelf
//!             P . . # . # . . # . # . . S    tall; left group | middle aisle |
//!             . . . # . # . . # . # . . .    right group
//!             . . . . . . . . . . . . . .
//! ```
//!
//! Column budget, left to right: pallet spawn (1), aisle (2), left shelves
//! (`2·left − 1`), middle aisle (2), right shelves (`2·right − 1`, or 0),
//! aisle (2), shipping (1).  Rows: AGV start (1), aisle (2), shelves
//! (`columns_per_shelf`), aisle (2), bottom margin (1).
//!
//! Node ids are assigned row-major (`row · width + col`).  Every cell is a
//! node and every pair of 4-neighbours is joined by an edge, shelf cells
//! included.

use wh_core::{GridPos, NodeId, NodeKind};

use crate::{GraphError, GraphResult, WarehouseGraph, WarehouseGraphBuilder};

const AISLE_WIDTH:  u32 = 2;
const SHELF_PITCH:  u32 = 2; // shelf column + gap
const HEADER_ROWS:  u32 = 1 + AISLE_WIDTH; // AGV start row + cross aisle

/// Parameters of a generated warehouse.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutConfig {
    /// Number of shelf units.  The left group gets the extra one when odd.
    pub shelves: u32,
    /// Length of each shelf in cells (one shelf node per cell).
    pub columns_per_shelf: u32,
    /// Storage levels per shelf cell; each level is one slot.
    pub levels_per_shelf: u32,
    /// AGV start nodes placed on the top row.
    pub agvs: u32,
}

impl LayoutConfig {
    pub fn validate(&self) -> GraphResult<()> {
        if self.shelves == 0 {
            return Err(GraphError::InvalidLayout("at least one shelf is required".into()));
        }
        if self.columns_per_shelf == 0 {
            return Err(GraphError::InvalidLayout("columns_per_shelf must be positive".into()));
        }
        if self.levels_per_shelf == 0 {
            return Err(GraphError::InvalidLayout("levels_per_shelf must be positive".into()));
        }
        Ok(())
    }

    /// Total storage slots the layout provides.
    pub fn slot_capacity(&self) -> u64 {
        self.shelves as u64 * self.columns_per_shelf as u64 * self.levels_per_shelf as u64
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self { shelves: 4, columns_per_shelf: 5, levels_per_shelf: 3, agvs: 2 }
    }
}

/// A generated floor plan: one [`NodeKind`] per grid cell, row-major.
#[derive(Clone, Debug)]
pub struct WarehouseLayout {
    pub config: LayoutConfig,
    pub height: u32,
    pub width:  u32,
    cells:      Vec<NodeKind>,
}

impl WarehouseLayout {
    /// Lay out the floor plan for `config`.
    pub fn generate(config: LayoutConfig) -> GraphResult<Self> {
        config.validate()?;

        let shelves_left  = config.shelves.div_ceil(2);
        let shelves_right = config.shelves / 2;
        let left_span  = shelves_left * SHELF_PITCH - 1;
        let right_span = if shelves_right > 0 { shelves_right * SHELF_PITCH - 1 } else { 0 };

        let width  = 1 + AISLE_WIDTH + left_span + AISLE_WIDTH + right_span + AISLE_WIDTH + 1;
        let height = HEADER_ROWS + config.columns_per_shelf + AISLE_WIDTH + 1;

        let mut layout = Self {
            config,
            height,
            width,
            cells: vec![NodeKind::Aisle; (height * width) as usize],
        };

        // ── AGV start row ─────────────────────────────────────────────────
        let spacing = (width / (config.agvs + 1)).max(1);
        for i in 0..config.agvs {
            let col = spacing * (i + 1);
            if col < width {
                layout.set(0, col, NodeKind::AgvStart);
            }
        }

        // ── Pallet spawn and shipping share the mid row of the shelf area ─
        let dock_row = HEADER_ROWS + (height - HEADER_ROWS) / 2;
        layout.set(dock_row, 0, NodeKind::PalletSpawn);

        // ── Shelf groups ──────────────────────────────────────────────────
        let mut col = 1 + AISLE_WIDTH;
        layout.place_shelves(col, shelves_left);
        col += left_span + AISLE_WIDTH;
        layout.place_shelves(col, shelves_right);
        col += right_span + AISLE_WIDTH;

        if col < width {
            layout.set(dock_row, col, NodeKind::Shipping);
        }

        Ok(layout)
    }

    fn place_shelves(&mut self, first_col: u32, count: u32) {
        for i in 0..count {
            let col = first_col + i * SHELF_PITCH;
            for row in HEADER_ROWS..HEADER_ROWS + self.config.columns_per_shelf {
                self.set(row, col, NodeKind::Shelf);
            }
        }
    }

    fn set(&mut self, row: u32, col: u32, kind: NodeKind) {
        let i = (row * self.width + col) as usize;
        self.cells[i] = kind;
    }

    /// Kind of the cell at `pos`, or `None` outside the grid.
    pub fn kind_at(&self, pos: GridPos) -> Option<NodeKind> {
        if pos.row >= self.height || pos.col >= self.width {
            return None;
        }
        self.cells.get((pos.row * self.width + pos.col) as usize).copied()
    }

    /// Node id the cell at `pos` receives in [`to_graph`](Self::to_graph).
    pub fn node_id(&self, pos: GridPos) -> NodeId {
        NodeId(pos.row * self.width + pos.col)
    }

    pub fn count(&self, kind: NodeKind) -> usize {
        self.cells.iter().filter(|&&k| k == kind).count()
    }

    /// Build the 4-connected grid graph.
    pub fn to_graph(&self) -> WarehouseGraph {
        let (h, w) = (self.height, self.width);
        let edges = (h * w.saturating_sub(1) + h.saturating_sub(1) * w) as usize;
        let mut b = WarehouseGraphBuilder::with_capacity(self.cells.len(), edges);

        for row in 0..h {
            for col in 0..w {
                let pos = GridPos::new(row, col);
                b.add_node(self.cells[(row * w + col) as usize], pos);
            }
        }
        for row in 0..h {
            for col in 0..w {
                let here = self.node_id(GridPos::new(row, col));
                if col + 1 < w {
                    let right = self.node_id(GridPos::new(row, col + 1));
                    let added = b.add_edge(here, right);
                    debug_assert!(added.is_ok(), "grid neighbours are always added");
                }
                if row + 1 < h {
                    let down = self.node_id(GridPos::new(row + 1, col));
                    let added = b.add_edge(here, down);
                    debug_assert!(added.is_ok(), "grid neighbours are always added");
                }
            }
        }
        b.build()
    }

    /// Text dump of the floor plan, one line per row.
    ///
    /// Legend: `.` aisle, `#` shelf, `A` AGV start, `S` shipping, `P` pallet spawn.
    pub fn render(&self) -> String {
        let mut out = String::with_capacity(((self.width + 1) * self.height) as usize);
        for row in self.cells.chunks(self.width as usize) {
            out.extend(row.iter().map(|k| k.symbol()));
            out.push('\n');
        }
        out
    }
}
