//! Tick cycle: the scheduler that drives the CellSim simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Live** -- every cell in a snapshot of the live registry takes its
//!    turn, in registry order. Effects are visible to later cells at once.
//! 2. **Merge** -- children born during the pass join the live registry;
//!    they first act next tick.
//! 3. **Cull** -- dead cells leave the live registry but stay in the arena
//!    as corpses.
//! 4. **Clean up** -- corpses eaten during the pass leave the arena.
//! 5. **Age** -- every trail on the grid loses one tick of lifetime.
//!
//! The cycle is deterministic for a given seed and starting population.

use cellsim_agents::{live, spawn_species};
use cellsim_types::{CellId, Species};
use cellsim_world::{World, WorldError};
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::PopulationConfig;
use crate::stats::PopulationStats;

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed, starting at 1.
    pub tick: u64,
    /// Children merged into the live registry.
    pub births: usize,
    /// Cells dropped from the live registry.
    pub deaths: usize,
    /// Corpses eaten and removed from the arena.
    pub corpses_consumed: usize,
    /// Head counts after the tick.
    pub population: PopulationStats,
    /// Sugar left on the grid after the tick.
    pub total_sugar: f64,
}

/// The mutable simulation state passed through the tick cycle.
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// The grid and every cell in it.
    pub world: World,
    /// The single random source for generation, seeding and ticks.
    pub rng: ChaCha12Rng,
    /// Ticks completed so far.
    pub tick: u64,
}

impl SimulationState {
    /// An empty `width` x `height` world with an RNG seeded from `seed`.
    pub fn new(width: u32, height: u32, seed: u64) -> Result<Self, WorldError> {
        Ok(Self {
            world: World::new(width, height)?,
            rng: ChaCha12Rng::seed_from_u64(seed),
            tick: 0,
        })
    }

    /// Reset the grid and scatter sugar over `sugar_factor` percent of it.
    ///
    /// Returns the number of tiles seeded with sugar. The tick counter
    /// starts over.
    pub fn generate(&mut self, sugar_factor: f64) -> usize {
        self.tick = 0;
        self.world.generate(sugar_factor, &mut self.rng)
    }

    /// Seed `count` cells of `species` onto random free tiles.
    pub fn spawn(&mut self, species: Species, count: u32) -> Vec<CellId> {
        spawn_species(&mut self.world, species, count, &mut self.rng)
    }

    /// Seed every species with its configured head count.
    ///
    /// Returns the number of cells placed.
    pub fn populate(&mut self, population: &PopulationConfig) -> usize {
        Species::ALL
            .iter()
            .map(|species| self.spawn(*species, population.count_for(*species)).len())
            .fold(0, usize::saturating_add)
    }

    /// Head counts right now.
    pub fn stats(&self) -> PopulationStats {
        PopulationStats::collect(&self.world)
    }
}

/// Execute one complete tick of the simulation.
///
/// Degenerate situations inside a cell's turn resolve to no-ops, so a tick
/// cannot fail.
pub fn run_tick(state: &mut SimulationState) -> TickSummary {
    let tick = state.tick.saturating_add(1);

    // --- Phase 1: Live ---
    let snapshot: Vec<CellId> = state.world.live().to_vec();
    for id in snapshot {
        live(&mut state.world, id, &mut state.rng);
    }

    // --- Phase 2: Merge ---
    let newborns = state.world.take_born();
    let births = newborns.len();
    for id in newborns {
        state.world.push_live(id);
    }

    // --- Phase 3: Cull ---
    let before = state.world.live().len();
    state.world.retain_live(|cell| cell.alive);
    let deaths = before.saturating_sub(state.world.live().len());

    // --- Phase 4: Clean up ---
    let eaten = state.world.take_consumed_corpses();
    let corpses_consumed = eaten.len();
    for id in eaten {
        if state.world.remove_cell(id).is_none() {
            debug!(tick, cell = %id, "Eaten corpse already gone from the arena");
        }
    }

    // --- Phase 5: Age ---
    state.world.age_trails();

    state.tick = tick;
    let summary = TickSummary {
        tick,
        births,
        deaths,
        corpses_consumed,
        population: state.stats(),
        total_sugar: state.world.total_sugar(),
    };
    info!(
        tick,
        births,
        deaths,
        corpses_consumed,
        live = summary.population.live,
        dead = summary.population.dead,
        total_sugar = summary.total_sugar,
        "Tick completed"
    );
    summary
}
