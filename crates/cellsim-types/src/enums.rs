//! Enumeration types for the CellSim simulation.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Directions
// ---------------------------------------------------------------------------

/// A unit step on the grid.
///
/// The declaration order matters: the direction at index `i` of
/// [`Direction::ALL`] is the antipode of the one at index `3 - i`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Direction {
    /// Towards row 0.
    Up,
    /// Towards column 0.
    Left,
    /// Towards the last column.
    Right,
    /// Towards the last row.
    Down,
}

impl Direction {
    /// Every direction in index order.
    pub const ALL: [Self; 4] = [Self::Up, Self::Left, Self::Right, Self::Down];

    /// Column and row delta of one step in this direction.
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::Up => (0, -1),
            Self::Left => (-1, 0),
            Self::Right => (1, 0),
            Self::Down => (0, 1),
        }
    }

    /// Position of this direction in [`Direction::ALL`].
    pub const fn index(self) -> usize {
        match self {
            Self::Up => 0,
            Self::Left => 1,
            Self::Right => 2,
            Self::Down => 3,
        }
    }

    /// Direction at `index` in [`Direction::ALL`], if any.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Up),
            1 => Some(Self::Left),
            2 => Some(Self::Right),
            3 => Some(Self::Down),
            _ => None,
        }
    }

    /// The opposite direction.
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
            Self::Down => Self::Up,
        }
    }
}

// ---------------------------------------------------------------------------
// Species
// ---------------------------------------------------------------------------

/// A breed: the fixed behavior profile a cell belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Herbivore that paths to the first sugar tile its raster scan finds.
    HuntFirst,
    /// Herbivore that paths to the richest sugar tile in sight.
    HuntLargest,
    /// Herbivore that paths to the nearest sugar tile in sight.
    HuntClosest,
    /// Herbivore that drifts towards other members of its own breed.
    Herd,
    /// Immobile producer that can also feed on neighbouring trees.
    Tree,
    /// Immobile producer with a wide field of view.
    Weed,
    /// Parasite that follows a host and drains its energy.
    Leech,
    /// Scavenger that feeds on corpses.
    Vulture,
}

impl Species {
    /// Every species in declaration order.
    pub const ALL: [Self; 8] = [
        Self::HuntFirst,
        Self::HuntLargest,
        Self::HuntClosest,
        Self::Herd,
        Self::Tree,
        Self::Weed,
        Self::Leech,
        Self::Vulture,
    ];

    /// Gene code prefix given to seed cells of this species.
    pub const fn seed_code(self) -> &'static str {
        match self {
            Self::HuntFirst => "F",
            Self::HuntLargest => "G",
            Self::HuntClosest => "C",
            Self::Herd => "H",
            Self::Tree => "T",
            Self::Weed => "W",
            Self::Leech => "L",
            Self::Vulture => "V",
        }
    }

    /// Whether cells of this species never change position.
    pub const fn is_producer(self) -> bool {
        matches!(self, Self::Tree | Self::Weed)
    }
}

impl core::fmt::Display for Species {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::HuntFirst => write!(f, "hunt_first"),
            Self::HuntLargest => write!(f, "hunt_largest"),
            Self::HuntClosest => write!(f, "hunt_closest"),
            Self::Herd => write!(f, "herd"),
            Self::Tree => write!(f, "tree"),
            Self::Weed => write!(f, "weed"),
            Self::Leech => write!(f, "leech"),
            Self::Vulture => write!(f, "vulture"),
        }
    }
}

// ---------------------------------------------------------------------------
// Herbivore behaviour
// ---------------------------------------------------------------------------

/// Idle-time social behaviour of a herbivore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Behaviour {
    /// Wander in the idle direction, occasionally re-rolling it.
    Neutral,
    /// Path towards the nearest live member of the same breed.
    Herd,
    /// Reserved for avoidance of other breeds; currently does nothing.
    Timid,
}

// ---------------------------------------------------------------------------
// Mutable traits
// ---------------------------------------------------------------------------

/// A heritable trait that can mutate on birth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    /// Field-of-view radius.
    Vision,
    /// Energy cost multiplier per step.
    Efficiency,
    /// Path steps (or feed attempts) per tick.
    Speed,
    /// Lifetime of the trail left on entered tiles.
    TrailSize,
    /// Amount consumed per feeding.
    BiteSize,
    /// Scale of future mutations.
    MutationStepMultiplier,
}

impl TraitKind {
    /// Every trait in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Vision,
        Self::Efficiency,
        Self::Speed,
        Self::TrailSize,
        Self::BiteSize,
        Self::MutationStepMultiplier,
    ];
}
