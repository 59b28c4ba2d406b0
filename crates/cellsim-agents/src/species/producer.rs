//! Producers: immobile plants that feed on the tiles around them.
//!
//! A producer first picks a food tile among its own and the eight adjacent
//! ones, then feeds there `ceil(speed)` times per tick. Trees may also feed
//! on a neighbouring live tree. A producer that dies after reproducing
//! scatters seed sugar around itself.

use cellsim_types::{CellId, Location, Species};
use cellsim_world::World;
use rand::{Rng, RngCore};

use super::{Behavior, drain, scatter_sugar, take_sugar};
use crate::config::SEED_SCATTER_LIMIT;
use crate::movement::attempts;

/// A plant species.
#[derive(Debug)]
pub struct Producer {
    species: Species,
    feeds_on_kin: bool,
}

/// Producer that can feed on neighbouring trees.
pub static TREE: Producer = Producer {
    species: Species::Tree,
    feeds_on_kin: true,
};

/// Producer that only feeds on sugar.
pub static WEED: Producer = Producer {
    species: Species::Weed,
    feeds_on_kin: false,
};

impl Producer {
    /// Whether the live cell on `at` is kin this producer may feed on.
    fn is_kin(&self, world: &World, id: CellId, at: Location) -> bool {
        self.feeds_on_kin
            && world
                .occupant(at.x, at.y)
                .filter(|other| *other != id)
                .and_then(|other| world.cell(other))
                .is_some_and(|other| other.alive && other.species == self.species)
    }

    /// First edible tile among the cell's own tile and its in-bounds
    /// neighbours, in row-major order after the own tile.
    pub fn find_food(&self, world: &World, id: CellId, center: Location) -> Option<Location> {
        if world.sugar_at(center.x, center.y) > 0.0 {
            return Some(center);
        }
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| (dx, dy) != (0, 0))
            .map(|(dx, dy)| {
                Location::new(center.x.saturating_add(dx), center.y.saturating_add(dy))
            })
            .filter(|at| world.in_bounds(at.x, at.y))
            .find(|at| world.sugar_at(at.x, at.y) > 0.0 || self.is_kin(world, id, *at))
    }

    /// One feed attempt at the current food target. Returns `false` once
    /// the target has been dropped.
    fn feed<R: Rng + ?Sized>(&self, world: &mut World, id: CellId, rng: &mut R) -> bool {
        let Some(cell) = world.cell(id) else {
            return false;
        };
        let Some(target) = cell.food else {
            return false;
        };
        let bite = cell.traits.bite_size;

        if world.sugar_at(target.x, target.y) > 0.0 {
            let gained = take_sugar(world, target, bite);
            if let Some(cell) = world.cell_mut(id) {
                cell.energy += gained;
            }
            return true;
        }

        if self.is_kin(world, id, target) {
            if let Some(host) = world.occupant(target.x, target.y) {
                return drain(world, id, host, bite, rng);
            }
        }

        if let Some(cell) = world.cell_mut(id) {
            cell.reset_food_and_path();
        }
        false
    }
}

impl Behavior for Producer {
    fn species(&self) -> Species {
        self.species
    }

    fn hunt(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore) {
        let Some(cell) = world.cell(id) else {
            return;
        };

        if cell.food.is_none() {
            let found = self.find_food(world, id, cell.location());
            if let Some(cell) = world.cell_mut(id) {
                cell.food = found;
            }
            return;
        }

        for _ in 0..attempts(cell.traits.speed) {
            if !self.feed(world, id, rng) {
                break;
            }
        }
    }

    fn idle(&self, _world: &mut World, _id: CellId, _rng: &mut dyn RngCore) {}

    fn wanders(&self) -> bool {
        false
    }

    /// Scatter seed sugar over a random neighborhood, but only for a
    /// producer that has reproduced.
    fn on_death(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore) {
        let Some(cell) = world.cell(id) else {
            return;
        };
        if cell.offspring == 0 {
            return;
        }
        let at = cell.location();
        let radius = rng.random_range(0..SEED_SCATTER_LIMIT);
        scatter_sugar(world, at, radius, SEED_SCATTER_LIMIT.saturating_sub(1), rng);
    }
}
