//! Herbivores: cells that walk to sugar and eat it off their own tile.
//!
//! The four herbivores share one routine and differ only in how they pick
//! a sugar tile and in their idle behaviour.

use cellsim_types::{Behaviour, CellId, Location, Species};
use cellsim_world::World;
use rand::{Rng, RngCore};

use super::{Behavior, nearest, raster_bottom_up, shuffle_idle_direction, take_sugar};
use crate::movement::{consume_path, find_path_to, random_step};

/// How a forager chooses the sugar tile to walk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Search {
    /// First sugar tile in a bottom-up raster scan of the vision box.
    FirstInRaster,
    /// The tile with the most sugar in the vision box.
    Largest,
    /// The sugar tile in the closest ring around the cell.
    Closest,
}

/// A herbivore species.
#[derive(Debug)]
pub struct Forager {
    species: Species,
    search: Search,
}

/// Opportunistic forager.
pub static HUNT_FIRST: Forager = Forager {
    species: Species::HuntFirst,
    search: Search::FirstInRaster,
};

/// Greedy forager.
pub static HUNT_LARGEST: Forager = Forager {
    species: Species::HuntLargest,
    search: Search::Largest,
};

/// Nearest-first forager.
pub static HUNT_CLOSEST: Forager = Forager {
    species: Species::HuntClosest,
    search: Search::Closest,
};

/// Forager that gathers with its own kind when idle.
pub static HERD: Forager = Forager {
    species: Species::Herd,
    search: Search::FirstInRaster,
};

impl Forager {
    /// Sugar tile this forager would walk to from `center`.
    pub fn find_sugar(&self, world: &World, center: Location, vision: u32) -> Option<Location> {
        let has_sugar = |world: &World, at: Location| world.sugar_at(at.x, at.y) > 0.0;
        match self.search {
            Search::FirstInRaster => raster_bottom_up(world, center, vision)
                .into_iter()
                .find(|at| has_sugar(world, *at)),
            Search::Largest => {
                let mut best: Option<(Location, f64)> = None;
                for at in raster_bottom_up(world, center, vision) {
                    let amount = world.sugar_at(at.x, at.y);
                    if amount > best.map_or(0.0, |(_, most)| most) {
                        best = Some((at, amount));
                    }
                }
                best.map(|(at, _)| at)
            }
            Search::Closest => nearest(world, center, 0, vision, has_sugar),
        }
    }
}

impl Behavior for Forager {
    fn species(&self) -> Species {
        self.species
    }

    /// Walk the current path, or eat, or look for sugar; wander when there
    /// is nothing to walk to.
    fn hunt(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore) {
        let Some(cell) = world.cell(id) else {
            return;
        };
        let (at, vision) = (cell.location(), cell.traits.vision);

        if !cell.path.is_empty() {
            consume_path(world, id, rng);
        } else if cell.food.is_none() {
            let target = self.find_sugar(world, at, vision);
            if let Some(cell) = world.cell_mut(id) {
                cell.food = target;
                find_path_to(cell, target);
            }
        } else {
            eat(world, id);
        }

        let wandering = world.cell(id).is_some_and(|c| c.alive && c.food.is_none());
        if wandering {
            random_step(world, id, rng);
        }
    }

    fn idle(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore) {
        let Some(behaviour) = world.cell(id).map(|c| c.behaviour) else {
            return;
        };
        match behaviour {
            Behaviour::Neutral => shuffle_idle_direction(world.cell_mut(id), rng),
            Behaviour::Herd => join_herd(world, id, rng),
            Behaviour::Timid => {}
        }
    }
}

/// Take a bite of the sugar on the cell's own tile. An empty tile drops the
/// food target and the path.
pub fn eat(world: &mut World, id: CellId) {
    let Some(cell) = world.cell(id) else {
        return;
    };
    let (at, bite) = (cell.location(), cell.traits.bite_size);

    if world.sugar_at(at.x, at.y) > 0.0 {
        let gained = take_sugar(world, at, bite);
        if let Some(cell) = world.cell_mut(id) {
            cell.energy += gained;
        }
    } else if let Some(cell) = world.cell_mut(id) {
        cell.reset_food_and_path();
    }
}

/// Path towards the nearest other live cell of the same species, or re-roll
/// the idle direction when none is in sight.
fn join_herd<R: Rng + ?Sized>(world: &mut World, id: CellId, rng: &mut R) {
    let Some(cell) = world.cell(id) else {
        return;
    };
    let (at, vision, species) = (cell.location(), cell.traits.vision, cell.species);

    let kin = nearest(world, at, 0, vision, |world, spot| {
        world
            .occupant(spot.x, spot.y)
            .filter(|other| *other != id)
            .and_then(|other| world.cell(other))
            .is_some_and(|other| other.alive && other.species == species)
    });

    match kin {
        Some(target) => {
            if let Some(cell) = world.cell_mut(id) {
                find_path_to(cell, Some(target));
            }
        }
        None => shuffle_idle_direction(world.cell_mut(id), rng),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cellsim_types::{Direction, Sugar};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;
    use crate::spawn::spawn_cell;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn put_sugar(world: &mut World, x: i32, y: i32, amount: f64) {
        world.tile_mut(x, y).unwrap().sugar = Sugar::new(amount);
    }

    #[test]
    fn raster_search_prefers_bottom_rows() {
        let mut world = World::new(10, 10).unwrap();
        put_sugar(&mut world, 5, 3, 5.0);
        put_sugar(&mut world, 4, 6, 1.0);
        let found = HUNT_FIRST.find_sugar(&world, Location::new(5, 5), 3);
        assert_eq!(found, Some(Location::new(4, 6)));
    }

    #[test]
    fn largest_search_takes_richest_tile() {
        let mut world = World::new(10, 10).unwrap();
        put_sugar(&mut world, 5, 3, 5.0);
        put_sugar(&mut world, 4, 6, 1.0);
        put_sugar(&mut world, 7, 7, 5.0);
        let found = HUNT_LARGEST.find_sugar(&world, Location::new(5, 5), 3);
        // Ties go to the first tile in raster order.
        assert_eq!(found, Some(Location::new(7, 7)));
    }

    #[test]
    fn closest_search_takes_nearest_ring() {
        let mut world = World::new(10, 10).unwrap();
        put_sugar(&mut world, 5, 2, 9.0);
        put_sugar(&mut world, 6, 6, 1.0);
        let found = HUNT_CLOSEST.find_sugar(&world, Location::new(5, 5), 4);
        assert_eq!(found, Some(Location::new(6, 6)));
    }

    #[test]
    fn search_finds_nothing_on_barren_grid() {
        let world = World::new(10, 10).unwrap();
        for forager in [&HUNT_FIRST, &HUNT_LARGEST, &HUNT_CLOSEST] {
            assert_eq!(forager.find_sugar(&world, Location::new(5, 5), 3), None);
        }
    }

    #[test]
    fn exact_bite_empties_the_tile() {
        let mut world = World::new(5, 5).unwrap();
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(2, 2)).unwrap();
        put_sugar(&mut world, 2, 2, 1.0);
        world.cell_mut(id).unwrap().food = Some(Location::new(2, 2));

        eat(&mut world, id);

        assert!(approx(world.cell(id).unwrap().energy, 51.0));
        assert!(approx(world.sugar_at(2, 2), 0.0));

        eat(&mut world, id);
        let cell = world.cell(id).unwrap();
        assert!(approx(cell.energy, 51.0));
        assert!(cell.is_idle());
    }

    #[test]
    fn bite_never_takes_more_than_is_there() {
        let mut world = World::new(5, 5).unwrap();
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(2, 2)).unwrap();
        put_sugar(&mut world, 2, 2, 0.4);
        world.cell_mut(id).unwrap().food = Some(Location::new(2, 2));

        eat(&mut world, id);

        assert!(approx(world.cell(id).unwrap().energy, 50.4));
        assert!(approx(world.sugar_at(2, 2), 0.0));
    }

    #[test]
    fn hunt_sets_target_then_walks_then_eats() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(31);
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(5, 5)).unwrap();
        put_sugar(&mut world, 6, 5, 3.0);

        HUNT_FIRST.hunt(&mut world, id, &mut rng);
        let cell = world.cell(id).unwrap();
        assert_eq!(cell.food, Some(Location::new(6, 5)));
        assert_eq!(cell.path.iter().copied().collect::<Vec<_>>(), vec![Direction::Right]);

        HUNT_FIRST.hunt(&mut world, id, &mut rng);
        assert_eq!(world.cell(id).unwrap().location(), Location::new(6, 5));

        HUNT_FIRST.hunt(&mut world, id, &mut rng);
        assert!(approx(world.cell(id).unwrap().energy, 50.0));
        assert!(approx(world.sugar_at(6, 5), 2.0));
    }

    #[test]
    fn hunt_without_sugar_wanders() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(32);
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(5, 5)).unwrap();

        HUNT_FIRST.hunt(&mut world, id, &mut rng);

        let cell = world.cell(id).unwrap();
        assert_ne!(cell.location(), Location::new(5, 5));
        assert!(approx(cell.energy, 49.0));
    }

    #[test]
    fn herd_paths_towards_kin() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(33);
        let id = spawn_cell(&mut world, Species::Herd, Location::new(2, 2)).unwrap();
        let _stranger = spawn_cell(&mut world, Species::HuntFirst, Location::new(3, 2)).unwrap();
        let _kin = spawn_cell(&mut world, Species::Herd, Location::new(4, 4)).unwrap();

        HERD.idle(&mut world, id, &mut rng);

        let path: Vec<Direction> = world.cell(id).unwrap().path.iter().copied().collect();
        assert_eq!(
            path,
            vec![Direction::Right, Direction::Right, Direction::Down, Direction::Down]
        );
    }

    #[test]
    fn herd_alone_keeps_no_path() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(34);
        let id = spawn_cell(&mut world, Species::Herd, Location::new(2, 2)).unwrap();

        HERD.idle(&mut world, id, &mut rng);

        assert!(world.cell(id).unwrap().path.is_empty());
    }
}
