//! Core entity structs: grid locations, tile layers, traits, and cells.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{Behaviour, Direction, Species};
use crate::ids::CellId;

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// A column/row pair on the grid.
///
/// Coordinates are signed so that search windows can extend past the grid
/// edge before being clipped or wrapped by the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Location {
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
}

impl Location {
    /// Create a location.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighbouring location one step in `direction`, without wrapping.
    pub const fn step(self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Chebyshev (king-move) distance to `other`.
    pub const fn chebyshev(self, other: Self) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        if dx > dy { dx } else { dy }
    }
}

// ---------------------------------------------------------------------------
// Tile layers
// ---------------------------------------------------------------------------

/// The resource layer of one tile.
///
/// The amount never drops below zero: [`Sugar::take`] hands out at most
/// what is left.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Sugar {
    amount: f64,
}

impl Sugar {
    /// A sugar layer holding `amount` (negative input is stored as zero).
    pub const fn new(amount: f64) -> Self {
        Self {
            amount: if amount > 0.0 { amount } else { 0.0 },
        }
    }

    /// Current amount.
    pub const fn amount(self) -> f64 {
        self.amount
    }

    /// Whether anything is left to eat.
    pub const fn has_any(self) -> bool {
        self.amount > 0.0
    }

    /// Remove up to `bite` and return how much was actually removed.
    pub fn take(&mut self, bite: f64) -> f64 {
        let taken = bite.clamp(0.0, self.amount);
        self.amount -= taken;
        taken
    }

    /// Add `amount` (ignored when not positive).
    pub fn add(&mut self, amount: f64) {
        if amount > 0.0 {
            self.amount += amount;
        }
    }
}

/// The decay layer of one tile: a countdown left behind by a passing cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Trail {
    /// Ticks until the marker fades.
    pub lifetime: u32,
    /// The cell that left the marker, while it is still visible.
    pub owner: Option<CellId>,
}

impl Trail {
    /// A fresh trail of `lifetime` ticks left by `owner`.
    pub const fn new(lifetime: u32, owner: CellId) -> Self {
        Self {
            lifetime,
            owner: Some(owner),
        }
    }

    /// Age the marker by one tick.
    pub const fn decay(&mut self) {
        self.lifetime = self.lifetime.saturating_sub(1);
        if self.lifetime == 0 {
            self.owner = None;
        }
    }

    /// Whether the marker is still visible.
    pub const fn is_active(self) -> bool {
        self.lifetime > 0
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Heritable traits of a cell. Children copy them and then mutate one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Traits {
    /// Field-of-view radius in tiles (at least 1).
    pub vision: u32,
    /// Path steps per tick; producers use it as feed attempts (at least 0.01).
    pub speed: f64,
    /// Energy spent per step taken.
    pub efficiency: f64,
    /// Amount consumed per feeding.
    pub bite_size: f64,
    /// Lifetime of the trail left on every entered tile (at least 2).
    pub trail_size: u32,
    /// Scale applied to every future mutation of this lineage.
    pub mutation_step_multiplier: f64,
}

// ---------------------------------------------------------------------------
// Cell
// ---------------------------------------------------------------------------

/// Full state of one simulated organism.
///
/// Movement, feeding, and reproduction logic lives in `cellsim-agents`;
/// this struct only carries the state those functions operate on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Arena handle.
    pub id: CellId,
    /// Lineage code: the seed letter followed by one digit per generation.
    pub gene_code: String,
    /// Breed of this cell.
    pub species: Species,
    /// Idle-time social behaviour (only meaningful for herbivores).
    pub behaviour: Behaviour,
    /// Column.
    pub x: i32,
    /// Row.
    pub y: i32,
    /// Whether the cell is alive. Dead cells remain as corpses.
    pub alive: bool,
    /// Remaining energy. A live cell always has positive energy after upkeep.
    pub energy: f64,
    /// Heritable traits.
    pub traits: Traits,
    /// Number of children produced so far.
    pub offspring: u32,
    /// Direction of idle wandering.
    pub idle_direction: Direction,
    /// Pending moves, consumed front first.
    pub path: VecDeque<Direction>,
    /// Where the cell last spotted food, if anywhere.
    pub food: Option<Location>,
    /// Index of the previous random step.
    pub last_random_step: Option<usize>,
    /// Index of the antipode of the previous random step.
    pub opposite_random_step: Option<usize>,
}

impl Cell {
    /// Create a live cell with an empty path and no food target.
    ///
    /// The cell is alive only if `energy` is positive.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: CellId,
        gene_code: String,
        species: Species,
        behaviour: Behaviour,
        location: Location,
        energy: f64,
        traits: Traits,
        idle_direction: Direction,
    ) -> Self {
        Self {
            id,
            gene_code,
            species,
            behaviour,
            x: location.x,
            y: location.y,
            alive: energy > 0.0,
            energy,
            traits,
            offspring: 0,
            idle_direction,
            path: VecDeque::new(),
            food: None,
            last_random_step: None,
            opposite_random_step: None,
        }
    }

    /// Current position.
    pub const fn location(&self) -> Location {
        Location::new(self.x, self.y)
    }

    /// Whether the cell has nothing queued and nothing targeted.
    pub fn is_idle(&self) -> bool {
        self.path.is_empty() && self.food.is_none()
    }

    /// Drop the food target and every pending move.
    pub fn reset_food_and_path(&mut self) {
        self.path.clear();
        self.food = None;
    }
}
