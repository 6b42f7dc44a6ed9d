//! Integer identifiers for players and entity records.
//!
//! Records reference each other only through these ids (or through
//! coordinates), never through pointers, so the whole state stays plain
//! serializable data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier types usable as keys in [`crate::state::EntityStore`].
pub trait EntityId: Copy + Ord + fmt::Debug {
    /// Build the id from its raw value.
    fn from_raw(raw: u32) -> Self;

    /// The raw value backing this id.
    fn raw(self) -> u32;
}

macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl EntityId for $name {
            fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

define_id!(
    /// Unique identifier of a unit.
    UnitId,
    "unit"
);

define_id!(
    /// Unique identifier of a city.
    CityId,
    "city"
);

/// Identifier of a player (human or AI; the core does not distinguish).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player#{}", self.0)
    }
}
