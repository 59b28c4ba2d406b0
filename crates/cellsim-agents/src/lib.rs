//! Cell lifecycle, movement, mutation, and species behavior for the CellSim
//! simulation.
//!
//! This crate contains the logic layer for cells -- everything that operates
//! on cell state through the [`World`] without touching I/O. It sits between
//! `cellsim-world` (which owns the grid and the arena) and `cellsim-core`
//! (which schedules ticks).
//!
//! # Modules
//!
//! - [`config`] -- Lifecycle constants and per-species defaults ([`SpeciesProfile`])
//! - [`error`] -- Error types for spawning ([`AgentError`])
//! - [`lifecycle`] -- One tick of a cell's life ([`live`]) and division
//! - [`movement`] -- Steps, toroidal wrapping, pathing, and death
//! - [`mutation`] -- Trait mutation on birth ([`Mutation`])
//! - [`species`] -- The [`Behavior`] trait and the eight species
//! - [`spawn`] -- Population seeding
//!
//! [`World`]: cellsim_world::World

pub mod config;
pub mod error;
pub mod lifecycle;
pub mod movement;
pub mod mutation;
pub mod spawn;
pub mod species;

// Re-export primary types at crate root for convenience.
pub use config::SpeciesProfile;
pub use error::AgentError;
pub use lifecycle::{Birth, LiveOutcome, live, reproduce};
pub use movement::{
    DeathCause, MoveOutcome, consume_path, die, find_path_to, move_cell, random_step,
};
pub use mutation::{Mutation, mutate};
pub use spawn::{spawn_cell, spawn_species};
pub use species::{Behavior, behavior_for};
