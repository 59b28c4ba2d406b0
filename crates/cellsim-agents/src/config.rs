//! Constants and per-species defaults for the cell lifecycle.
//!
//! The [`SpeciesProfile`] struct bundles the starting state of a seed cell
//! so that seeding and tests build cells from one table.

use cellsim_types::{Behaviour, Species, Traits};

/// Energy a cell needs before it attempts to reproduce.
pub const BIRTH_THRESHOLD: f64 = 100.0;

/// A cell with this many children dies on its next upkeep.
pub const OFFSPRING_LIMIT: u32 = 3;

/// One in this many idle hooks re-rolls the idle direction.
pub const IDLE_DIRECTION_SWITCH_DIVISOR: u32 = 50;

/// Probability that a mutation harms the trait it touches.
pub const DELETERIOUS_MUTATION_RATE: f64 = 0.8;

/// Random draws allowed when looking for a free tile to give birth on.
pub const BIRTHPLACE_ATTEMPTS: usize = 64;

/// Random-step retries after a blocked move before the cell stays put.
pub const COLLISION_RETRIES: usize = 8;

/// Re-rolls allowed while a random step keeps hitting a forbidden direction.
pub const RANDOM_STEP_REROLLS: usize = 32;

/// Damage multiplier applied to a tree attacked by another species.
pub const TREE_RESISTANCE: f64 = 0.8;

/// Energy spent per step, before the efficiency multiplier.
pub const MOVEMENT_COST: f64 = 1.0;

/// Exclusive upper bound of the seed radius and per-tile seed amount a dying
/// producer scatters.
pub const SEED_SCATTER_LIMIT: u32 = 10;

/// Inclusive upper bound of the radius of a scavenger's sugar spill.
pub const SPILL_RADIUS_LIMIT: u32 = 10;

/// Probability that a scavenger spills sugar after eating.
pub const SPILL_PROBABILITY: f64 = 0.2;

/// Lifetime of the trail every seed cell leaves behind.
pub const DEFAULT_TRAIL_SIZE: u32 = 50;

/// Mutation scale every seed lineage starts with.
pub const DEFAULT_MUTATION_STEP_MULTIPLIER: f64 = 1.05;

/// Random-spawn attempts per requested seed cell.
pub const SPAWN_ATTEMPTS_PER_CELL: usize = 32;

/// Starting state of a seed cell of one species.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeciesProfile {
    /// Starting energy.
    pub energy: f64,
    /// Idle-time behaviour.
    pub behaviour: Behaviour,
    /// Starting traits.
    pub traits: Traits,
}

impl SpeciesProfile {
    const fn new(energy: f64, vision: u32, speed: f64, efficiency: f64, bite_size: f64) -> Self {
        Self {
            energy,
            behaviour: Behaviour::Neutral,
            traits: Traits {
                vision,
                speed,
                efficiency,
                bite_size,
                trail_size: DEFAULT_TRAIL_SIZE,
                mutation_step_multiplier: DEFAULT_MUTATION_STEP_MULTIPLIER,
            },
        }
    }

    const fn with_behaviour(mut self, behaviour: Behaviour) -> Self {
        self.behaviour = behaviour;
        self
    }

    /// Defaults for a seed cell of `species`.
    pub const fn for_species(species: Species) -> Self {
        match species {
            Species::HuntFirst => Self::new(50.0, 3, 1.0, 1.0, 1.0),
            Species::HuntLargest => Self::new(50.0, 3, 2.0, 1.0, 1.0),
            Species::HuntClosest => Self::new(50.0, 4, 1.0, 1.0, 1.0),
            Species::Herd => Self::new(50.0, 3, 1.0, 1.0, 1.0).with_behaviour(Behaviour::Herd),
            Species::Tree => Self::new(50.0, 5, 1.0, 0.1, 0.2),
            Species::Weed => Self::new(80.0, 10, 1.0, 1.0, 0.2),
            Species::Leech => Self::new(50.0, 5, 3.0, 0.2, 2.5),
            Species::Vulture => Self::new(50.0, 10, 1.0, 0.33, 7.0),
        }
    }
}
