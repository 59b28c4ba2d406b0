//! Type-safe arena handles.
//!
//! Cells live in an arena owned by the world. Tiles and registries refer to
//! them through a [`CellId`], never through an owning reference, so a tile
//! can point at a cell without keeping it alive.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Generates a newtype wrapper around a `u64` arena index with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
        )]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub u64);

        impl $name {
            /// Create an identifier from a raw arena index.
            pub const fn new(raw: u64) -> Self {
                Self(raw)
            }

            /// Return the raw arena index.
            pub const fn into_inner(self) -> u64 {
                self.0
            }

            /// Return the identifier that follows this one.
            ///
            /// Saturates at `u64::MAX`; an arena never allocates that many cells.
            pub const fn next(self) -> Self {
                Self(self.0.saturating_add(1))
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }

        impl From<u64> for $name {
            fn from(raw: u64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for u64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Stable handle of a cell in the world's arena.
    ///
    /// Handles are never reused within one generated world, so a stale
    /// handle held by a trail simply fails to resolve.
    CellId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_is_monotonic() {
        let first = CellId::new(0);
        assert_eq!(first.next(), CellId::new(1));
        assert!(first < first.next());
    }

    #[test]
    fn next_saturates() {
        let last = CellId::new(u64::MAX);
        assert_eq!(last.next(), last);
    }

    #[test]
    fn display_format() {
        assert_eq!(CellId::new(42).to_string(), "#42");
    }

    #[test]
    fn raw_round_trip() {
        let id = CellId::from(7_u64);
        assert_eq!(u64::from(id), 7);
        assert_eq!(id.into_inner(), 7);
    }
}
