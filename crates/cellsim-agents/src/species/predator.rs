//! Predators: a parasite that drains live hosts and a scavenger that eats
//! corpses.
//!
//! Both search afresh every tick in expanding rings starting one tile out,
//! walk as far along the path as their speed allows, and then try to eat.

use cellsim_types::{CellId, Location, Species};
use cellsim_world::World;
use rand::{Rng, RngCore};
use tracing::debug;

use super::{Behavior, drain, nearest, scatter_sugar};
use crate::config::{SPILL_PROBABILITY, SPILL_RADIUS_LIMIT};
use crate::movement::{consume_path, find_path_to};

/// What a predator feeds on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prey {
    /// Any live cell other than the predator.
    LiveHost,
    /// Corpses.
    Carrion,
}

/// A predator species.
#[derive(Debug)]
pub struct Predator {
    species: Species,
    prey: Prey,
}

/// Parasite.
pub static LEECH: Predator = Predator {
    species: Species::Leech,
    prey: Prey::LiveHost,
};

/// Scavenger.
pub static VULTURE: Predator = Predator {
    species: Species::Vulture,
    prey: Prey::Carrion,
};

impl Predator {
    /// Closest prey within `vision` of `center`, skipping the center tile.
    pub fn find_prey(
        &self,
        world: &World,
        id: CellId,
        center: Location,
        vision: u32,
    ) -> Option<Location> {
        match self.prey {
            Prey::LiveHost => nearest(world, center, 1, vision, |world, at| {
                world
                    .occupant(at.x, at.y)
                    .filter(|other| *other != id)
                    .and_then(|other| world.cell(other))
                    .is_some_and(|other| other.alive)
            }),
            Prey::Carrion => nearest(world, center, 1, vision, |world, at| {
                world.corpse_at(at.x, at.y).is_some()
            }),
        }
    }
}

impl Behavior for Predator {
    fn species(&self) -> Species {
        self.species
    }

    fn hunt(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore) {
        let Some(cell) = world.cell_mut(id) else {
            return;
        };
        cell.reset_food_and_path();
        let (at, vision) = (cell.location(), cell.traits.vision);

        let target = self.find_prey(world, id, at, vision);
        if let Some(cell) = world.cell_mut(id) {
            cell.food = target;
            find_path_to(cell, target);
        }
        consume_path(world, id, rng);

        if world.cell(id).is_some_and(|c| c.alive) {
            match self.prey {
                Prey::LiveHost => parasitize(world, id, rng),
                Prey::Carrion => scavenge(world, id, rng),
            }
        }
    }
}

/// Drain the host on the food target if it is a live cell right next to
/// the parasite; otherwise forget the target.
pub fn parasitize<R: Rng + ?Sized>(world: &mut World, id: CellId, rng: &mut R) {
    let Some(cell) = world.cell(id) else {
        return;
    };
    let (at, bite) = (cell.location(), cell.traits.bite_size);

    let host = cell
        .food
        .filter(|target| at.chebyshev(*target) <= 1)
        .and_then(|target| world.occupant(target.x, target.y))
        .filter(|host| *host != id);

    let fed = host.is_some_and(|host| drain(world, id, host, bite, rng));
    if !fed {
        if let Some(cell) = world.cell_mut(id) {
            cell.reset_food_and_path();
        }
    }
}

/// Eat the first corpse in the 3x3 box around the scavenger.
///
/// The scavenger gains the corpse's leftover energy (if positive) plus its
/// bite. The corpse leaves its tile at once and is queued for removal from
/// the arena at the end of the tick. Sometimes the meal spills sugar.
pub fn scavenge<R: Rng + ?Sized>(world: &mut World, id: CellId, rng: &mut R) {
    let Some(cell) = world.cell(id) else {
        return;
    };
    let (at, bite) = (cell.location(), cell.traits.bite_size);

    let meal = (-1..=1)
        .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
        .map(|(dx, dy)| Location::new(at.x.saturating_add(dx), at.y.saturating_add(dy)))
        .find_map(|spot| world.corpse_at(spot.x, spot.y).map(|corpse| (spot, corpse)));
    let Some((spot, corpse)) = meal else {
        return;
    };

    let residual = world.cell(corpse).map_or(0.0, |c| c.energy.max(0.0));
    if let Some(tile) = world.tile_at_mut(spot) {
        tile.corpse = None;
    }
    world.push_consumed_corpse(corpse);
    if let Some(cell) = world.cell_mut(id) {
        cell.energy += residual + bite;
    }
    debug!(cell = %id, %corpse, gained = residual + bite, "Corpse eaten");

    if rng.random_bool(SPILL_PROBABILITY) {
        let radius = rng.random_range(0..=SPILL_RADIUS_LIMIT);
        scatter_sugar(world, at, radius, 1, rng);
    }
}
