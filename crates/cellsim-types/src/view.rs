//! Read-only views handed to an external renderer.
//!
//! The renderer never receives a mutable handle into the world. It gets
//! these plain snapshots instead, one per tile, in row-major order.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Species;
use crate::ids::CellId;

/// What a renderer needs to draw one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CellView {
    /// Arena handle.
    pub id: CellId,
    /// Breed of the cell.
    pub species: Species,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Whether the cell is alive.
    pub alive: bool,
    /// Remaining energy.
    pub energy: f64,
}

/// What a renderer needs to draw one tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct TileView {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Sugar on the tile.
    pub sugar: f64,
    /// Remaining lifetime of the trail marker (0 when none).
    pub trail: u32,
    /// The live occupant, if any.
    pub cell: Option<CellView>,
    /// Whether a corpse lies on the tile.
    pub has_corpse: bool,
}
