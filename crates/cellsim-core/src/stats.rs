//! Population statistics: the counters a status panel shows next to the
//! grid.

use std::collections::BTreeMap;

use cellsim_types::Species;
use cellsim_world::World;
use serde::Serialize;

/// Head counts over the whole arena.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PopulationStats {
    /// Cells in the live registry.
    pub live: usize,
    /// Corpses still held by the arena.
    pub dead: usize,
    /// Every record in the arena, live or dead.
    pub total: usize,
    /// Live cells per species. Species with no live cells are absent.
    pub per_species: BTreeMap<Species, usize>,
}

impl PopulationStats {
    /// Count the population of `world`.
    pub fn collect(world: &World) -> Self {
        let mut per_species: BTreeMap<Species, usize> = BTreeMap::new();
        let mut dead: usize = 0;
        for cell in world.cells() {
            if cell.alive {
                let count = per_species.entry(cell.species).or_insert(0);
                *count = count.saturating_add(1);
            } else {
                dead = dead.saturating_add(1);
            }
        }
        Self {
            live: world.live().len(),
            dead,
            total: world.cell_count(),
            per_species,
        }
    }

    /// Live cells of `species`.
    pub fn count_of(&self, species: Species) -> usize {
        self.per_species.get(&species).copied().unwrap_or(0)
    }

    /// Whether no cell is left alive.
    pub const fn is_extinct(&self) -> bool {
        self.live == 0
    }
}
