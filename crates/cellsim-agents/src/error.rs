//! Error types for the cellsim-agents crate.
//!
//! Only explicit spawning can fail. Everything a cell does during a tick
//! resolves degenerate cases (blocked tiles, missing food, exhausted energy)
//! to a state transition instead of an error.

use cellsim_world::WorldError;

/// Errors that can occur while creating cells.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgentError {
    /// The world refused to place the cell.
    #[error("placement failed: {0}")]
    Placement(#[from] WorldError),
}
