//! Movement, pathing, and death.
//!
//! A step costs `MOVEMENT_COST * efficiency` energy and leaves a trail on the
//! entered tile. Stepping off the grid wraps onto the opposite edge for free
//! and drops whatever the cell was heading for. A cell that cannot afford a
//! step dies where it stands.
//!
//! Every function here takes the world and a [`CellId`] rather than a cell
//! reference: a move touches two tiles and the cell itself, all owned by the
//! world.

use cellsim_types::{Cell, CellId, Direction, Location, Trail};
use cellsim_world::World;
use rand::Rng;
use tracing::{debug, warn};

use crate::config::{COLLISION_RETRIES, MOVEMENT_COST, RANDOM_STEP_REROLLS};
use crate::species;

/// Why a cell died.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeathCause {
    /// Energy ran out before upkeep.
    Starvation,
    /// The cell reached the offspring limit.
    OffspringLimit,
    /// The cell could not afford its next step.
    Exhaustion,
    /// A parasite drained the cell below zero.
    Drained,
}

impl core::fmt::Display for DeathCause {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Starvation => write!(f, "starvation"),
            Self::OffspringLimit => write!(f, "offspring_limit"),
            Self::Exhaustion => write!(f, "exhaustion"),
            Self::Drained => write!(f, "drained"),
        }
    }
}

/// What a single call to [`move_cell`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The cell paid for a step inside the grid.
    Moved,
    /// The cell crossed an edge and reappeared on the opposite side.
    Wrapped,
    /// Every attempt hit an occupied tile; the cell stayed put.
    Blocked,
    /// The cell could not afford the step and died in place.
    Died,
    /// The cell cannot move at all (dead, immobile, or missing).
    Stationary,
}

/// Kill a live cell, leaving its corpse on its tile.
///
/// Clears the tile's live occupancy, lays the corpse, and runs the species'
/// death effect. A corpse already lying on that tile is buried: it is
/// removed from the arena so the tile keeps a single corpse.
///
/// Returns `false` when the cell was already dead or does not exist.
pub fn die<R: Rng + ?Sized>(
    world: &mut World,
    id: CellId,
    cause: DeathCause,
    mut rng: &mut R,
) -> bool {
    let Some(cell) = world.cell_mut(id) else {
        return false;
    };
    if !cell.alive {
        return false;
    }
    cell.alive = false;
    let (at, species, energy) = (cell.location(), cell.species, cell.energy);

    let buried = world.tile_at_mut(at).and_then(|tile| {
        if tile.cell == Some(id) {
            tile.cell = None;
        }
        tile.corpse.replace(id)
    });
    if let Some(old) = buried.filter(|old| *old != id) {
        if world.remove_cell(old).is_none() {
            warn!(cell = %id, corpse = %old, "Buried corpse was missing from the arena");
        }
    }

    debug!(cell = %id, %species, %cause, energy, x = at.x, y = at.y, "Cell died");
    species::behavior_for(species).on_death(world, id, &mut rng);
    true
}

/// Pick a random direction for `cell`, avoiding its previous random roll
/// and the antipode of that roll.
///
/// Re-rolls are bounded; after [`RANDOM_STEP_REROLLS`] the last roll
/// stands. The roll and its antipode are remembered on the cell.
pub fn roll_direction<R: Rng + ?Sized>(cell: &mut Cell, rng: &mut R) -> Direction {
    let count = Direction::ALL.len();
    let forbidden = |roll: usize, cell: &Cell| {
        cell.last_random_step == Some(roll) || cell.opposite_random_step == Some(roll)
    };

    let mut roll = rng.random_range(0..count);
    for _ in 0..RANDOM_STEP_REROLLS {
        if !forbidden(roll, cell) {
            break;
        }
        roll = rng.random_range(0..count);
    }

    let opposite = count.saturating_sub(1).saturating_sub(roll);
    cell.last_random_step = Some(roll);
    cell.opposite_random_step = Some(opposite);
    Direction::from_index(roll).unwrap_or(Direction::Up)
}

/// Take one step in a random direction. See [`roll_direction`].
pub fn random_step<R: Rng + ?Sized>(world: &mut World, id: CellId, rng: &mut R) -> MoveOutcome {
    let Some(cell) = world.cell_mut(id) else {
        return MoveOutcome::Stationary;
    };
    let direction = roll_direction(cell, rng);
    move_cell(world, id, direction, rng)
}

/// Move a cell one tile in `direction`.
///
/// - Target inside the grid and free: pay the step cost, or die if the
///   remaining energy would not stay positive.
/// - Target outside the grid: wrap onto the opposite edge at no cost and
///   drop the current path and food target.
/// - Target holds another live cell: fall back to a random step, up to
///   [`COLLISION_RETRIES`] times, then stay put.
///
/// Corpses never block movement. Producers never move.
pub fn move_cell<R: Rng + ?Sized>(
    world: &mut World,
    id: CellId,
    direction: Direction,
    rng: &mut R,
) -> MoveOutcome {
    let mut direction = direction;

    for _ in 0..=COLLISION_RETRIES {
        let Some(cell) = world.cell(id) else {
            return MoveOutcome::Stationary;
        };
        if !cell.alive || cell.species.is_producer() {
            return MoveOutcome::Stationary;
        }
        let from = cell.location();
        let cost = MOVEMENT_COST * cell.traits.efficiency;
        let energy = cell.energy;
        let trail_size = cell.traits.trail_size;

        let raw = from.step(direction);
        let wraps = !world.in_bounds(raw.x, raw.y);
        let target = if wraps { world.wrap(raw.x, raw.y) } else { raw };

        if world.occupant(target.x, target.y).is_some_and(|other| other != id) {
            let Some(cell) = world.cell_mut(id) else {
                return MoveOutcome::Stationary;
            };
            direction = roll_direction(cell, rng);
            continue;
        }

        if wraps {
            relocate(world, id, from, target, trail_size);
            if let Some(cell) = world.cell_mut(id) {
                cell.reset_food_and_path();
            }
            return MoveOutcome::Wrapped;
        }

        if energy - cost > 0.0 {
            relocate(world, id, from, target, trail_size);
            if let Some(cell) = world.cell_mut(id) {
                cell.energy -= cost;
            }
            return MoveOutcome::Moved;
        }

        die(world, id, DeathCause::Exhaustion, rng);
        return MoveOutcome::Died;
    }

    MoveOutcome::Blocked
}

/// Shift a cell's occupancy from `from` to `to` and mark its trail.
fn relocate(world: &mut World, id: CellId, from: Location, to: Location, trail_size: u32) {
    if let Some(tile) = world.tile_at_mut(from) {
        if tile.cell == Some(id) {
            tile.cell = None;
        }
    }
    if let Some(tile) = world.tile_at_mut(to) {
        tile.trail = Trail::new(trail_size, id);
        tile.cell = Some(id);
    }
    if let Some(cell) = world.cell_mut(id) {
        cell.x = to.x;
        cell.y = to.y;
    }
}

/// Replace the cell's path with a route to `target`.
///
/// Horizontal moves come first, then vertical ones. The route ignores the
/// torus. A `None` target clears both the path and the food target.
pub fn find_path_to(cell: &mut Cell, target: Option<Location>) {
    let Some(target) = target else {
        cell.reset_food_and_path();
        return;
    };
    cell.path.clear();

    let dx = target.x.saturating_sub(cell.x);
    let dy = target.y.saturating_sub(cell.y);
    let horizontal = if dx > 0 { Direction::Right } else { Direction::Left };
    let vertical = if dy > 0 { Direction::Down } else { Direction::Up };

    for _ in 0..dx.unsigned_abs() {
        cell.path.push_back(horizontal);
    }
    for _ in 0..dy.unsigned_abs() {
        cell.path.push_back(vertical);
    }
}

/// Execute up to `floor(speed)` queued moves.
///
/// Stops early when the path runs out or the cell dies.
pub fn consume_path<R: Rng + ?Sized>(world: &mut World, id: CellId, rng: &mut R) {
    let Some(cell) = world.cell(id) else {
        return;
    };
    let steps = whole_steps(cell.traits.speed);

    for _ in 0..steps {
        let Some(next) = world.cell_mut(id).and_then(|c| c.path.pop_front()) else {
            break;
        };
        if move_cell(world, id, next, rng) == MoveOutcome::Died {
            break;
        }
    }
}

/// `floor(speed)` as a step count; zero for non-positive speeds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn whole_steps(speed: f64) -> usize {
    if speed.is_finite() && speed >= 1.0 {
        speed.floor() as usize
    } else {
        0
    }
}

/// `ceil(speed)` as an attempt count; zero for non-positive speeds.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn attempts(speed: f64) -> usize {
    if speed.is_finite() && speed > 0.0 {
        speed.ceil() as usize
    } else {
        0
    }
}
