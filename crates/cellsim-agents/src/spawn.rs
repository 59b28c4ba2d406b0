//! Population seeding.
//!
//! Seed cells start from their species profile with a bare gene code (the
//! species letter) and go straight into the world's live registry.

use cellsim_types::{Cell, CellId, Direction, Location, Species};
use cellsim_world::World;
use rand::Rng;
use tracing::{info, warn};

use crate::config::SPAWN_ATTEMPTS_PER_CELL;
use crate::error::AgentError;
use crate::species::{behavior_for, random_direction};

/// A fresh seed cell of `species` at `at`, not yet placed.
pub fn seed_cell(species: Species, at: Location, idle_direction: Direction) -> Cell {
    let profile = behavior_for(species).profile();
    Cell::new(
        CellId::new(0),
        String::from(species.seed_code()),
        species,
        profile.behaviour,
        at,
        profile.energy,
        profile.traits,
        idle_direction,
    )
}

/// Place a seed cell of `species` at `at` and register it as live.
///
/// The cell wanders upwards when idle until its first re-roll.
pub fn spawn_cell(
    world: &mut World,
    species: Species,
    at: Location,
) -> Result<CellId, AgentError> {
    let id = world.place_cell(seed_cell(species, at, Direction::Up))?;
    world.push_live(id);
    Ok(id)
}

/// Scatter `count` seed cells of `species` over random free tiles.
///
/// A tile is free when it holds neither a live cell nor a corpse. Gives up
/// after `SPAWN_ATTEMPTS_PER_CELL` draws per requested cell, so a crowded
/// grid yields fewer cells than asked for. Returns the handles placed.
pub fn spawn_species<R: Rng + ?Sized>(
    world: &mut World,
    species: Species,
    count: u32,
    rng: &mut R,
) -> Vec<CellId> {
    let wanted = usize::try_from(count).unwrap_or(usize::MAX);
    let mut budget = wanted.saturating_mul(SPAWN_ATTEMPTS_PER_CELL);
    let mut placed = Vec::with_capacity(wanted.min(world.tile_count()));

    while placed.len() < wanted && budget > 0 {
        budget = budget.saturating_sub(1);
        let x = rng.random_range(0..world.width());
        let y = rng.random_range(0..world.height());
        if !world.is_free(x, y) {
            continue;
        }
        let cell = seed_cell(species, Location::new(x, y), random_direction(rng));
        if let Ok(id) = world.place_cell(cell) {
            world.push_live(id);
            placed.push(id);
        }
    }

    if placed.len() < wanted {
        warn!(
            %species,
            requested = wanted,
            placed = placed.len(),
            "Grid too crowded to seed every cell"
        );
    }
    info!(%species, count = placed.len(), "Seeded species");
    placed
}
