//! Simulation loop runner.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_ticks`
//! - **Extinction**: stop once the live registry is empty
//! - **Pacing**: sleep `tick_interval_ms` between ticks
//! - **External stop**: a [`StopSignal`] ends the run before the next tick
//!
//! Each [`run_tick`] call runs on tokio's blocking pool so a large grid
//! never stalls the async runtime.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use crate::config::SimulationBoundsConfig;
use crate::tick::{self, SimulationState, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The blocking task running a tick panicked or was cancelled.
    #[error("tick task failed: {source}")]
    Join {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}

/// Why a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// No cell is left alive.
    Extinction,
    /// A [`StopSignal`] was raised.
    Stopped,
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed by this run.
    pub total_ticks: u64,
    /// The state as the run left it.
    pub state: SimulationState,
}

/// Shared flag that asks a running simulation to end.
#[derive(Debug, Clone, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    /// A signal that has not been raised.
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to end before its next tick.
    pub fn raise(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether [`raise`](Self::raise) has been called.
    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Callback invoked after each tick completes.
///
/// Implementations can use this to log progress, render the grid, or
/// collect statistics. The callback receives the tick summary and the
/// current simulation state.
pub trait TickCallback: Send {
    /// Called after a tick completes.
    fn on_tick(&mut self, summary: &TickSummary, state: &SimulationState);
}

/// A no-op tick callback for testing.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _state: &SimulationState) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// The stop signal is checked before every tick. Extinction (when
/// `bounds.stop_on_extinction` is set) and the tick limit are checked after
/// every tick, in that order. A `max_ticks` of 0 never ends the run on its
/// own.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick task fails to complete.
pub async fn run_simulation(
    mut state: SimulationState,
    bounds: &SimulationBoundsConfig,
    tick_interval_ms: u64,
    stop: &StopSignal,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = bounds.max_ticks,
        stop_on_extinction = bounds.stop_on_extinction,
        tick_interval_ms,
        live = state.world.live().len(),
        "Simulation starting"
    );

    loop {
        // --- Check stop request (before tick) ---
        if stop.is_raised() {
            info!("Stop requested");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Stopped,
                final_summary: last_summary,
                total_ticks,
                state,
            });
        }

        // --- Execute tick ---
        let (next, summary) = tokio::task::spawn_blocking(move || {
            let mut state = state;
            let summary = tick::run_tick(&mut state);
            (state, summary)
        })
        .await?;
        state = next;

        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, &state);

        // --- Check extinction ---
        if bounds.stop_on_extinction && summary.population.is_extinct() {
            info!(tick = summary.tick, "All cells dead -- extinction");
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::Extinction,
                final_summary: Some(summary),
                total_ticks,
                state,
            });
        }

        // --- Check tick limit (after tick) ---
        if bounds.max_ticks > 0 && total_ticks >= bounds.max_ticks {
            info!(
                tick = summary.tick,
                max_ticks = bounds.max_ticks,
                "Tick limit reached"
            );
            return Ok(SimulationResult {
                end_reason: SimulationEndReason::MaxTicksReached,
                final_summary: Some(summary),
                total_ticks,
                state,
            });
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        if tick_interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(tick_interval_ms)).await;
        }
    }
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        final_live = result.final_summary.as_ref().map(|s| s.population.live),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        for (species, count) in &summary.population.per_species {
            info!(%species, count, "Surviving species");
        }
        info!(
            tick = summary.tick,
            live = summary.population.live,
            dead = summary.population.dead,
            total = summary.population.total,
            total_sugar = summary.total_sugar,
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
