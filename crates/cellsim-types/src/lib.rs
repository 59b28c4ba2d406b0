//! Shared value types for the CellSim simulation.
//!
//! This crate is the single source of truth for the data every other crate
//! in the workspace passes around. Renderer-facing views flow downstream
//! to `TypeScript` via `ts-rs`.
//!
//! # Modules
//!
//! - [`ids`] -- Arena handles ([`CellId`])
//! - [`enums`] -- Directions, species, herbivore behaviour, mutable traits
//! - [`structs`] -- Locations, tile layers ([`Sugar`], [`Trail`]), [`Traits`], [`Cell`]
//! - [`view`] -- Read-only snapshots for a renderer

pub mod enums;
pub mod ids;
pub mod structs;
pub mod view;

// Re-export all public types at crate root for convenience.
pub use enums::{Behaviour, Direction, Species, TraitKind};
pub use ids::CellId;
pub use structs::{Cell, Location, Sugar, Trail, Traits};
pub use view::{CellView, TileView};
