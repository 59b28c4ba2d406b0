//! Grid, resources, and the cell arena for the CellSim simulation.
//!
//! This crate models the physical substrate: a toroidal grid of tiles, each
//! carrying a sugar layer, a trail layer, and handles to at most one live
//! cell and one corpse. The [`World`] owns both the tiles and the cells.
//!
//! # Modules
//!
//! - [`error`] -- Error types for construction and placement.
//! - [`tile`] -- [`Tile`], the state of one grid square.
//! - [`grid`] -- [`World`]: generation, wrapping, neighborhood queries,
//!   the cell arena, and the per-tick registries.

pub mod error;
pub mod grid;
pub mod tile;

// Re-export primary types at crate root.
pub use error::WorldError;
pub use grid::{GENERATION_ATTEMPT_FACTOR, MAX_SUGAR_PER_TILE, World};
pub use tile::Tile;
