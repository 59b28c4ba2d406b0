//! The per-tick life of one cell: upkeep, hunt, idle wandering, and
//! reproduction, always in that order.
//!
//! Every stage after upkeep is skipped as soon as the cell dies, whether it
//! starved mid-step or was drained by a neighbour's turn earlier in the
//! tick. Children are queued in the world's newborn registry and are not
//! visited until the next tick.

use cellsim_types::{Cell, CellId, Location};
use cellsim_world::World;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::{BIRTH_THRESHOLD, BIRTHPLACE_ATTEMPTS, OFFSPRING_LIMIT};
use crate::movement::{DeathCause, die, move_cell, random_step};
use crate::mutation::{Mutation, mutate};
use crate::species::{behavior_for, random_direction};

/// What happened to a cell during one call to [`live`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiveOutcome {
    /// The handle did not resolve; nothing ran.
    Missing,
    /// The cell is dead at the end of its turn.
    Dead,
    /// The cell survived its turn.
    Alive {
        /// The child born this turn, if any.
        child: Option<CellId>,
    },
}

/// A successful division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Birth {
    /// Handle of the newborn.
    pub child: CellId,
    /// Where it was born.
    pub at: Location,
    /// The trait change it was born with.
    pub mutation: Mutation,
}

/// Run one tick of a cell's life.
pub fn live<R: Rng + ?Sized>(world: &mut World, id: CellId, mut rng: &mut R) -> LiveOutcome {
    let cell = match world.try_cell(id) {
        Ok(cell) => cell,
        Err(error) => {
            warn!(%error, "Skipping cell missing from the arena");
            return LiveOutcome::Missing;
        }
    };
    let behavior = behavior_for(cell.species);

    // Upkeep
    if let Some(cause) = upkeep(cell) {
        die(world, id, cause, rng);
        return LiveOutcome::Dead;
    }

    // Hunt
    behavior.hunt(world, id, &mut rng);
    let Some(cell) = alive(world, id) else {
        return LiveOutcome::Dead;
    };

    // Idle wandering
    if cell.is_idle() && behavior.wanders() {
        behavior.idle(world, id, &mut rng);
        if let Some(direction) = alive(world, id).map(|c| c.idle_direction) {
            move_cell(world, id, direction, rng);
        }
        if alive(world, id).is_some() {
            random_step(world, id, rng);
        }
    }

    // Reproduction
    let Some(cell) = alive(world, id) else {
        return LiveOutcome::Dead;
    };
    let child = if cell.energy >= BIRTH_THRESHOLD {
        reproduce(world, id, rng).map(|birth| birth.child)
    } else {
        None
    };
    LiveOutcome::Alive { child }
}

/// The cell, if it exists and is alive.
fn alive(world: &World, id: CellId) -> Option<&Cell> {
    world.cell(id).filter(|c| c.alive)
}

/// Why a cell must die before acting this tick, if it must.
pub fn upkeep(cell: &Cell) -> Option<DeathCause> {
    if !cell.alive || cell.energy <= 0.0 {
        Some(DeathCause::Starvation)
    } else if cell.offspring >= OFFSPRING_LIMIT {
        Some(DeathCause::OffspringLimit)
    } else {
        None
    }
}

/// Divide a cell.
///
/// The child is born on a free tile within the parent's vision box, with
/// the parent's traits (one of them mutated) and a third of its energy.
/// The parent keeps a third of its energy as well. Returns `None` when no
/// free tile turned up within [`BIRTHPLACE_ATTEMPTS`] draws; the parent is
/// left untouched in that case.
pub fn reproduce<R: Rng + ?Sized>(world: &mut World, id: CellId, rng: &mut R) -> Option<Birth> {
    let parent = world.cell(id)?;
    let Some(at) = find_birthplace(world, parent.location(), parent.traits.vision, rng) else {
        debug!(cell = %id, "No room to give birth; skipping reproduction");
        return None;
    };

    let mut traits = parent.traits;
    let mutation = mutate(&mut traits, rng);
    let share = parent.energy / 3.0;
    let gene_code = format!("{}{}", parent.gene_code, parent.offspring);
    let child = Cell::new(
        CellId::new(0),
        gene_code,
        parent.species,
        parent.behaviour,
        at,
        share,
        traits,
        random_direction(rng),
    );

    let child = match world.place_cell(child) {
        Ok(child) => child,
        Err(error) => {
            warn!(cell = %id, %error, "Birthplace rejected the newborn");
            return None;
        }
    };
    world.push_born(child);

    if let Some(parent) = world.cell_mut(id) {
        parent.energy = share;
        parent.offspring = parent.offspring.saturating_add(1);
    }

    debug!(
        parent = %id,
        %child,
        x = at.x,
        y = at.y,
        trait_kind = ?mutation.trait_kind,
        deleterious = mutation.deleterious,
        "Cell divided"
    );
    Some(Birth {
        child,
        at,
        mutation,
    })
}

/// A random free tile within `vision` of `center`, or `None` after
/// [`BIRTHPLACE_ATTEMPTS`] misses. Does not wrap.
pub fn find_birthplace<R: Rng + ?Sized>(
    world: &World,
    center: Location,
    vision: u32,
    rng: &mut R,
) -> Option<Location> {
    let reach = i32::try_from(vision).unwrap_or(i32::MAX);
    (0..BIRTHPLACE_ATTEMPTS).find_map(|_| {
        let dx = rng.random_range(-reach..=reach);
        let dy = rng.random_range(-reach..=reach);
        let at = Location::new(center.x.saturating_add(dx), center.y.saturating_add(dy));
        world.is_free(at.x, at.y).then_some(at)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use cellsim_types::{Species, TraitKind};
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    use super::*;
    use crate::spawn::spawn_cell;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn spent_cell_dies_in_upkeep() {
        let mut world = World::new(5, 5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(71);
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(2, 2)).unwrap();
        world.cell_mut(id).unwrap().energy = 0.0;

        assert_eq!(live(&mut world, id, &mut rng), LiveOutcome::Dead);
        assert_eq!(world.corpse_at(2, 2), Some(id));
        assert_eq!(world.occupant(2, 2), None);
    }

    #[test]
    fn offspring_limit_is_fatal() {
        let mut world = World::new(5, 5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(72);
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(2, 2)).unwrap();
        world.cell_mut(id).unwrap().offspring = OFFSPRING_LIMIT;

        assert_eq!(live(&mut world, id, &mut rng), LiveOutcome::Dead);
        // Nothing ran after upkeep.
        assert!(approx(world.cell(id).unwrap().energy, 50.0));
    }

    #[test]
    fn missing_cell_is_skipped() {
        let mut world = World::new(5, 5).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(73);
        assert_eq!(live(&mut world, CellId::new(8), &mut rng), LiveOutcome::Missing);
    }

    #[test]
    fn upkeep_causes() {
        let mut cell = crate::spawn::seed_cell(
            Species::Weed,
            Location::new(0, 0),
            cellsim_types::Direction::Up,
        );
        assert_eq!(upkeep(&cell), None);
        cell.offspring = 3;
        assert_eq!(upkeep(&cell), Some(DeathCause::OffspringLimit));
        cell.energy = -1.0;
        assert_eq!(upkeep(&cell), Some(DeathCause::Starvation));
    }

    #[test]
    fn division_splits_energy_in_thirds() {
        let mut world = World::new(20, 20).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(74);
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(10, 10)).unwrap();
        world.cell_mut(id).unwrap().energy = 150.0;
        let before = world.cell(id).unwrap().traits;

        let birth = reproduce(&mut world, id, &mut rng).unwrap();

        let parent = world.cell(id).unwrap();
        assert!(approx(parent.energy, 50.0));
        assert_eq!(parent.offspring, 1);

        let child = world.cell(birth.child).unwrap();
        assert!(approx(child.energy, 50.0));
        assert!(child.alive);
        assert_eq!(child.gene_code, "F0");
        assert_eq!(child.species, Species::HuntFirst);
        assert_eq!(child.location(), birth.at);
        assert!(birth.at.chebyshev(Location::new(10, 10)) <= before.vision);
        assert_eq!(world.occupant(birth.at.x, birth.at.y), Some(birth.child));
        assert_eq!(world.born_this_tick(), &[birth.child]);

        let changed = match birth.mutation.trait_kind {
            TraitKind::Vision => child.traits.vision != before.vision,
            TraitKind::Efficiency => !approx(child.traits.efficiency, before.efficiency),
            TraitKind::Speed => !approx(child.traits.speed, before.speed),
            TraitKind::TrailSize => child.traits.trail_size != before.trail_size,
            TraitKind::BiteSize => !approx(child.traits.bite_size, before.bite_size),
            TraitKind::MutationStepMultiplier => !approx(
                child.traits.mutation_step_multiplier,
                before.mutation_step_multiplier,
            ),
        };
        assert!(changed);
    }

    #[test]
    fn gene_code_counts_siblings() {
        let mut world = World::new(20, 20).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(75);
        let id = spawn_cell(&mut world, Species::Weed, Location::new(10, 10)).unwrap();

        let mut codes = Vec::new();
        for _ in 0..3 {
            world.cell_mut(id).unwrap().energy = 300.0;
            let birth = reproduce(&mut world, id, &mut rng).unwrap();
            codes.push(world.cell(birth.child).unwrap().gene_code.clone());
        }
        assert_eq!(codes, vec!["W0", "W1", "W2"]);
        assert_eq!(world.cell(id).unwrap().offspring, 3);
    }

    #[test]
    fn crowded_parent_skips_division() {
        let mut world = World::new(1, 1).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(76);
        let id = spawn_cell(&mut world, Species::Weed, Location::new(0, 0)).unwrap();
        world.cell_mut(id).unwrap().energy = 120.0;

        assert_eq!(reproduce(&mut world, id, &mut rng), None);
        let parent = world.cell(id).unwrap();
        assert!(approx(parent.energy, 120.0));
        assert_eq!(parent.offspring, 0);
        assert!(world.born_this_tick().is_empty());
    }

    #[test]
    fn birthplace_avoids_corpses() {
        let mut world = World::new(3, 1).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(77);
        let parent = spawn_cell(&mut world, Species::Weed, Location::new(1, 0)).unwrap();
        let corpse = spawn_cell(&mut world, Species::Weed, Location::new(0, 0)).unwrap();
        die(&mut world, corpse, DeathCause::Starvation, &mut rng);

        let sites: Vec<Location> = (0..20)
            .filter_map(|_| find_birthplace(&world, Location::new(1, 0), 1, &mut rng))
            .collect();
        assert!(!sites.is_empty());
        assert!(sites.iter().all(|site| *site == Location::new(2, 0)));
        assert!(world.cell(parent).unwrap().alive);
    }

    #[test]
    fn rich_producer_divides_during_live() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(78);
        let id = spawn_cell(&mut world, Species::Weed, Location::new(5, 5)).unwrap();
        world.cell_mut(id).unwrap().energy = 120.0;

        let outcome = live(&mut world, id, &mut rng);

        let child = match outcome {
            LiveOutcome::Alive { child } => child,
            LiveOutcome::Missing | LiveOutcome::Dead => None,
        };
        let child = child.unwrap();
        assert!(approx(world.cell(id).unwrap().energy, 40.0));
        assert!(approx(world.cell(child).unwrap().energy, 40.0));
    }

    #[test]
    fn starving_forager_dies_within_a_hundred_ticks() {
        let mut world = World::new(10, 10).unwrap();
        let mut rng = ChaCha12Rng::seed_from_u64(79);
        let id = spawn_cell(&mut world, Species::HuntFirst, Location::new(5, 5)).unwrap();

        let mut died = false;
        for _ in 0..100 {
            if live(&mut world, id, &mut rng) == LiveOutcome::Dead {
                died = true;
                break;
            }
        }
        assert!(died);
        assert!(!world.cell(id).unwrap().alive);
    }
}
