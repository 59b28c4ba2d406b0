//! Headless driver for the CellSim simulation.
//!
//! Loads configuration, builds and seeds the world, and runs the tick loop
//! until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from `cellsim-config.yaml`
//! 3. Create the world and its seeded RNG
//! 4. Generate sugar
//! 5. Spawn the initial population
//! 6. Install the Ctrl-C stop handler
//! 7. Run the simulation loop
//! 8. Log the result

mod error;
mod progress;

use std::path::Path;

use cellsim_core::config::{CONFIG_FILE_NAME, SimulationConfig};
use cellsim_core::runner::{self, StopSignal};
use cellsim_core::tick::SimulationState;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::EngineError;
use crate::progress::ProgressCallback;

/// Ticks between periodic population reports.
const REPORT_EVERY_TICKS: u64 = 100;

/// Application entry point for the engine.
///
/// # Errors
///
/// Returns an error if configuration, world construction, or the
/// simulation run fails.
#[tokio::main]
async fn main() -> Result<(), EngineError> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("cellsim-engine starting");

    // 2. Load configuration.
    let config = SimulationConfig::load(Path::new(CONFIG_FILE_NAME))?;
    info!(
        width = config.world.width,
        height = config.world.height,
        sugar_factor = config.world.sugar_factor,
        seed = config.world.seed,
        tick_interval_ms = config.world.tick_interval_ms,
        max_ticks = config.simulation.max_ticks,
        "Configuration loaded"
    );

    // 3. Create the world.
    let mut state =
        SimulationState::new(config.world.width, config.world.height, config.world.seed)?;

    // 4. Generate sugar.
    let sugar_tiles = state.generate(config.world.sugar_factor);
    info!(
        sugar_tiles,
        total_sugar = state.world.total_sugar(),
        "World generated"
    );

    // 5. Spawn the initial population.
    let placed = state.populate(&config.population);
    let requested = config.population.total();
    if u64::try_from(placed).unwrap_or(u64::MAX) < requested {
        warn!(placed, requested, "Grid could not hold the whole population");
    }
    info!(cells = placed, "Population spawned");

    // 6. Stop cleanly on Ctrl-C.
    let stop = StopSignal::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Interrupt received, stopping after the current tick");
                    stop.raise();
                }
                Err(e) => {
                    warn!(error = %e, "failed to listen for Ctrl-C, interrupt disabled");
                }
            }
        });
    }

    // 7. Run the simulation.
    let mut callback = ProgressCallback::new(REPORT_EVERY_TICKS);
    let result = runner::run_simulation(
        state,
        &config.simulation,
        config.world.tick_interval_ms,
        &stop,
        &mut callback,
    )
    .await?;

    // 8. Log results.
    runner::log_simulation_end(&result);

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "cellsim-engine shutdown complete"
    );

    Ok(())
}
