//! One grid cell's full state.

use cellsim_types::{CellId, Sugar, Trail};

/// Contents of a single tile.
///
/// A tile holds at most one live cell and at most one corpse. Both are
/// non-owning handles into the world's arena.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tile {
    /// Resource layer.
    pub sugar: Sugar,
    /// Decay layer.
    pub trail: Trail,
    /// The live occupant, if any.
    pub cell: Option<CellId>,
    /// The corpse lying here, if any.
    pub corpse: Option<CellId>,
}

impl Tile {
    /// Whether a newborn or a seeded cell may be placed here.
    pub const fn is_free(&self) -> bool {
        self.cell.is_none() && self.corpse.is_none()
    }

    /// Whether a live cell stands on this tile.
    pub const fn is_occupied(&self) -> bool {
        self.cell.is_some()
    }
}
