//! Error types for the `cellsim-world` crate.
//!
//! Only construction and explicit placement can fail. Everything the tick
//! loop does resolves degenerate cases internally, so these errors never
//! cross the core/scheduler boundary.

use cellsim_types::CellId;

/// Errors that can occur during grid construction and cell placement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WorldError {
    /// A grid needs at least one row and one column.
    #[error("grid must be non-empty, got {width}x{height}")]
    EmptyGrid {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// The grid does not fit signed 32-bit coordinates.
    #[error("grid {width}x{height} exceeds the supported coordinate range")]
    DimensionsTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A coordinate lies outside the grid.
    #[error("coordinate ({x}, {y}) is outside the grid")]
    OutOfBounds {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// The tile already holds a live cell.
    #[error("tile ({x}, {y}) is already occupied by {occupant}")]
    TileOccupied {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// The cell already on the tile.
        occupant: CellId,
    },

    /// No cell with this handle exists in the arena.
    #[error("cell not found: {0}")]
    CellNotFound(CellId),
}
