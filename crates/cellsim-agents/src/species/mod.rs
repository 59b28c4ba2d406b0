//! Per-species behavior, dispatched by [`Species`] tag.
//!
//! Every species maps to a `&'static dyn Behavior` through
//! [`behavior_for`]. The trait covers the four places where species differ:
//!
//! - `hunt` -- the combined search-and-feed routine run every tick
//! - `idle` -- what an idle cell does before wandering
//! - `on_death` -- side effects of dying (seed dispersal)
//! - `profile` -- defaults for seed cells
//!
//! The routines themselves live in three families:
//!
//! - [`forager`] -- herbivores that path to sugar and eat on their own tile
//! - [`producer`] -- immobile plants that feed on adjacent tiles
//! - [`predator`] -- parasites and scavengers that search every tick

pub mod forager;
pub mod predator;
pub mod producer;

use cellsim_types::{Cell, CellId, Direction, Location, Species};
use cellsim_world::World;
use rand::{Rng, RngCore};

use crate::config::{IDLE_DIRECTION_SWITCH_DIVISOR, SpeciesProfile, TREE_RESISTANCE};
use crate::movement::{self, DeathCause};

/// Species-specific parts of the cell lifecycle.
///
/// The methods take `&mut dyn RngCore` so the table in [`behavior_for`] can
/// hold trait objects.
pub trait Behavior: Sync {
    /// The species this behavior drives.
    fn species(&self) -> Species;

    /// Search for food and feed. Runs every tick for every live cell.
    fn hunt(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore);

    /// Idle hook, run before the idle step when the cell has no path and
    /// no food target. Re-rolls the idle direction by default.
    fn idle(&self, world: &mut World, id: CellId, rng: &mut dyn RngCore) {
        shuffle_idle_direction(world.cell_mut(id), rng);
    }

    /// Whether an idle cell takes the idle step and a random step.
    fn wanders(&self) -> bool {
        true
    }

    /// Side effects of dying, run once right after the corpse is laid.
    fn on_death(&self, _world: &mut World, _id: CellId, _rng: &mut dyn RngCore) {}

    /// Starting state of a seed cell.
    fn profile(&self) -> SpeciesProfile {
        SpeciesProfile::for_species(self.species())
    }
}

/// The behavior driving `species`.
pub fn behavior_for(species: Species) -> &'static dyn Behavior {
    match species {
        Species::HuntFirst => &forager::HUNT_FIRST,
        Species::HuntLargest => &forager::HUNT_LARGEST,
        Species::HuntClosest => &forager::HUNT_CLOSEST,
        Species::Herd => &forager::HERD,
        Species::Tree => &producer::TREE,
        Species::Weed => &producer::WEED,
        Species::Leech => &predator::LEECH,
        Species::Vulture => &predator::VULTURE,
    }
}

/// With probability `1 / IDLE_DIRECTION_SWITCH_DIVISOR`, point the cell's
/// idle wandering in a new random direction.
pub fn shuffle_idle_direction<R: Rng + ?Sized>(cell: Option<&mut Cell>, rng: &mut R) {
    let Some(cell) = cell else {
        return;
    };
    if rng.random_ratio(1, IDLE_DIRECTION_SWITCH_DIVISOR) {
        cell.idle_direction = random_direction(rng);
    }
}

/// A uniformly random direction.
pub fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Direction {
    let index = rng.random_range(0..Direction::ALL.len());
    Direction::from_index(index).unwrap_or(Direction::Up)
}

// ---------------------------------------------------------------------------
// Shared feeding
// ---------------------------------------------------------------------------

/// Take up to `bite` sugar from `at` and return what was taken.
pub fn take_sugar(world: &mut World, at: Location, bite: f64) -> f64 {
    world.tile_at_mut(at).map_or(0.0, |tile| tile.sugar.take(bite))
}

/// Damage actually dealt to `target` when `attacker` bites for `amount`.
///
/// Trees shrug off part of any attack from another species.
pub fn effective_damage(attacker: Species, target: Species, amount: f64) -> f64 {
    if target == Species::Tree && attacker != Species::Tree {
        amount * TREE_RESISTANCE
    } else {
        amount
    }
}

/// `attacker` drains `bite` energy from the live cell `host`.
///
/// The attacker always gains the full bite; the host loses the bite after
/// resistance. A host whose energy drops below zero dies on the spot.
/// Returns `false` if either cell is missing or the host is not alive.
pub fn drain<R: Rng + ?Sized>(
    world: &mut World,
    attacker: CellId,
    host: CellId,
    bite: f64,
    rng: &mut R,
) -> bool {
    if attacker == host {
        return false;
    }
    let Some(attacker_species) = world.cell(attacker).map(|c| c.species) else {
        return false;
    };
    let Some(target) = world.cell_mut(host).filter(|c| c.alive) else {
        return false;
    };
    let damage = effective_damage(attacker_species, target.species, bite);
    target.energy -= damage;
    let host_exhausted = target.energy < 0.0;

    if let Some(cell) = world.cell_mut(attacker) {
        cell.energy += bite;
    }
    if host_exhausted {
        movement::die(world, host, DeathCause::Drained, rng);
    }
    true
}

/// Add a random integer amount of sugar in `0..=max_per_tile` to every tile
/// of the neighborhood of radius `radius` around `center`.
pub fn scatter_sugar<R: Rng + ?Sized>(
    world: &mut World,
    center: Location,
    radius: u32,
    max_per_tile: u32,
    rng: &mut R,
) {
    for at in world.neighborhood(center.x, center.y, radius) {
        let amount = rng.random_range(0..=max_per_tile);
        if let Some(tile) = world.tile_at_mut(at) {
            tile.sugar.add(f64::from(amount));
        }
    }
}

// ---------------------------------------------------------------------------
// Shared search orders
// ---------------------------------------------------------------------------

/// In-bounds tiles of the box of radius `radius` around `center`, rows
/// from the bottom edge up, columns left to right.
pub fn raster_bottom_up(world: &World, center: Location, radius: u32) -> Vec<Location> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let mut tiles = Vec::new();
    for y in (center.y.saturating_sub(r)..=center.y.saturating_add(r)).rev() {
        for x in center.x.saturating_sub(r)..=center.x.saturating_add(r) {
            if world.in_bounds(x, y) {
                tiles.push(Location::new(x, y));
            }
        }
    }
    tiles
}

/// In-bounds tiles exactly `radius` king moves from `center`, rows top
/// down, columns left to right. Radius zero is the center itself.
pub fn ring(world: &World, center: Location, radius: u32) -> Vec<Location> {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    let mut tiles = Vec::new();
    for y in center.y.saturating_sub(r)..=center.y.saturating_add(r) {
        for x in center.x.saturating_sub(r)..=center.x.saturating_add(r) {
            let at = Location::new(x, y);
            if world.in_bounds(x, y) && center.chebyshev(at) == radius {
                tiles.push(at);
            }
        }
    }
    tiles
}

/// First tile in expanding rings `start..=vision` around `center` that
/// satisfies `hit`.
pub fn nearest<F>(
    world: &World,
    center: Location,
    start: u32,
    vision: u32,
    mut hit: F,
) -> Option<Location>
where
    F: FnMut(&World, Location) -> bool,
{
    (start..=vision).find_map(|radius| {
        ring(world, center, radius)
            .into_iter()
            .find(|at| hit(world, *at))
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;
    use crate::spawn::spawn_cell;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn every_species_has_its_own_behavior() {
        for species in Species::ALL {
            let behavior = behavior_for(species);
            assert_eq!(behavior.species(), species);
            assert_eq!(behavior.profile(), SpeciesProfile::for_species(species));
        }
    }

    #[test]
    fn only_producers_stay_put_when_idle() {
        for species in Species::ALL {
            assert_eq!(behavior_for(species).wanders(), !species.is_producer());
        }
    }

    #[test]
    fn tree_resists_other_species_only() {
        assert!(approx(effective_damage(Species::Leech, Species::Tree, 2.5), 2.0));
        assert!(approx(effective_damage(Species::Tree, Species::Tree, 0.2), 0.2));
        assert!(approx(effective_damage(Species::Leech, Species::Weed, 2.5), 2.5));
    }

    #[test]
    fn ring_sizes() {
        let world = World::new(20, 20).unwrap();
        let center = Location::new(10, 10);
        assert_eq!(ring(&world, center, 0), vec![center]);
        assert_eq!(ring(&world, center, 1).len(), 8);
        assert_eq!(ring(&world, center, 2).len(), 16);
        // Clipped at the corner.
        assert_eq!(ring(&world, Location::new(0, 0), 1).len(), 3);
    }

    #[test]
    fn raster_starts_bottom_left() {
        let world = World::new(20, 20).unwrap();
        let tiles = raster_bottom_up(&world, Location::new(5, 5), 1);
        assert_eq!(tiles.len(), 9);
        assert_eq!(tiles.first(), Some(&Location::new(4, 6)));
        assert_eq!(tiles.last(), Some(&Location::new(6, 4)));
    }

    #[test]
    fn drain_kills_host_below_zero() {
        let mut world = World::new(5, 5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(21);
        let leech = spawn_cell(&mut world, Species::Leech, Location::new(1, 1)).unwrap();
        let host = spawn_cell(&mut world, Species::HuntFirst, Location::new(2, 1)).unwrap();
        world.cell_mut(host).unwrap().energy = 2.0;

        assert!(drain(&mut world, leech, host, 2.5, &mut rng));

        assert!(!world.cell(host).unwrap().alive);
        assert_eq!(world.corpse_at(2, 1), Some(host));
        assert!(approx(world.cell(leech).unwrap().energy, 52.5));
    }

    #[test]
    fn drain_refuses_self_and_corpses() {
        let mut world = World::new(5, 5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(22);
        let leech = spawn_cell(&mut world, Species::Leech, Location::new(1, 1)).unwrap();
        assert!(!drain(&mut world, leech, leech, 2.5, &mut rng));
        let dead = spawn_cell(&mut world, Species::Weed, Location::new(3, 3)).unwrap();
        movement::die(&mut world, dead, DeathCause::Starvation, &mut rng);
        assert!(!drain(&mut world, leech, dead, 2.5, &mut rng));
        assert!(approx(world.cell(leech).unwrap().energy, 50.0));
    }

    #[test]
    fn scatter_covers_the_neighborhood() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(23);
        scatter_sugar(&mut world, Location::new(0, 0), 2, 1, &mut rng);
        let touched = world.total_sugar();
        assert!(touched <= 16.0);
        for y in 2..8 {
            for x in 2..8 {
                assert!(approx(world.sugar_at(x, y), 0.0));
            }
        }
    }
}
