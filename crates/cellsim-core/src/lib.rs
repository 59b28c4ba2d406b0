//! Tick scheduler, configuration, and run orchestration for CellSim.
//!
//! This crate turns the per-cell rules of `cellsim-agents` into a running
//! simulation: it owns the tick cycle, the single seeded RNG, the YAML
//! configuration, and the bounded async runner.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `cellsim-config.yaml` into
//!   strongly-typed structs.
//! - [`runner`] -- Bounded tick loop with callbacks and a stop signal.
//! - [`stats`] -- Population head counts.
//! - [`tick`] -- [`SimulationState`] and the five-phase tick cycle.
//!
//! [`SimulationState`]: tick::SimulationState

pub mod config;
pub mod runner;
pub mod stats;
pub mod tick;

pub use config::{ConfigError, SimulationConfig};
pub use runner::{
    NoOpCallback, RunnerError, SimulationEndReason, SimulationResult, StopSignal, TickCallback,
    run_simulation,
};
pub use stats::PopulationStats;
pub use tick::{SimulationState, TickSummary, run_tick};
