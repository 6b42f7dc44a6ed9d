//! # Civ Core
//!
//! Deterministic turn-based simulation core for a hex-grid strategy game.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO beyond (de)serializing rulesets and state snapshots
//! - No randomness
//! - No floating-point math (combat uses fixed-point)
//!
//! Front ends talk to it through [`engine::Engine`]: they submit
//! [`command::Command`]s, subscribe to [`events::GameEvent`]s and read
//! serializable snapshots.
//!
//! ## Crate Structure
//!
//! - [`hex`], [`tile`], [`map`] - axial coordinates, terrain and the cost model
//! - [`pathfinding`] - A* paths and budgeted reachable sets
//! - [`combat`] - fixed-point combat resolution
//! - [`rules`] - unit and building stats, growth constants
//! - [`state`] - entity arenas, the turn clock and the state builder
//! - [`command`], [`validators`], [`executors`], [`registry`] - the command pipeline
//! - [`events`], [`event_bus`] - events and their synchronous delivery
//! - [`engine`] - the orchestrator

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod city;
pub mod clock;
pub mod combat;
pub mod command;
pub mod engine;
pub mod error;
pub mod event_bus;
pub mod events;
pub mod executors;
pub mod hex;
pub mod ids;
pub mod map;
pub mod math;
pub mod pathfinding;
pub mod registry;
pub mod rules;
pub mod snapshot;
pub mod state;
pub mod territory;
pub mod tile;
pub mod unit;
pub mod validators;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::city::{City, ProductionState};
    pub use crate::clock::{TurnClock, TurnPhase};
    pub use crate::combat::{resolve_combat, CombatContext, CombatOutcome, Combatant};
    pub use crate::command::{Command, CommandKind, CommandResult, Rejection, ValidationResult};
    pub use crate::engine::Engine;
    pub use crate::error::{GameError, Result};
    pub use crate::event_bus::{EventBus, EventFilter, SubscriptionId};
    pub use crate::events::{EventKind, GameEvent, RemovalCause};
    pub use crate::hex::HexCoord;
    pub use crate::ids::{CityId, PlayerId, UnitId};
    pub use crate::map::{TileLookup, TileMap};
    pub use crate::math::Fixed;
    pub use crate::pathfinding::{find_path, reachable_tiles, PathResult};
    pub use crate::registry::CommandRegistry;
    pub use crate::rules::{Buildable, BuildingKind, Ruleset, UnitKind};
    pub use crate::snapshot::{GameSnapshot, TileInfo};
    pub use crate::state::{CitySeed, GameState, GameStateBuilder, UnitSeed};
    pub use crate::territory::TerritoryLookup;
    pub use crate::tile::{Terrain, Tile, TileFeature, TileResource, TileYields};
    pub use crate::unit::Unit;
}
