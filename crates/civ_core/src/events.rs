//! Events: immutable records of changes that already happened.
//!
//! Executors return events; the engine publishes them after the executor
//! finishes, so every event describes committed state.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId, UnitId};
use crate::rules::{Buildable, UnitKind};

/// Why a unit left the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalCause {
    /// Health reached zero in combat.
    Combat,
    /// Consumed to found a city.
    FoundedCity,
}

/// Something that changed in the game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GameEvent {
    /// A unit changed position.
    UnitMoved {
        /// Moved unit.
        unit: UnitId,
        /// Previous position.
        from: HexCoord,
        /// New position.
        to: HexCoord,
        /// Tiles walked, `from` and `to` included.
        path: Vec<HexCoord>,
        /// Movement points spent.
        cost: u32,
        /// Movement points left.
        movement_left: u32,
    },
    /// An attack was resolved and damage applied.
    CombatResolved {
        /// Attacking unit.
        attacker: UnitId,
        /// Defending unit.
        defender: UnitId,
        /// Health lost by the attacker.
        damage_to_attacker: u32,
        /// Health lost by the defender.
        damage_to_defender: u32,
        /// Attacker health afterwards.
        attacker_health: u32,
        /// Defender health afterwards.
        defender_health: u32,
    },
    /// A unit was removed from the game.
    UnitDestroyed {
        /// Removed unit.
        unit: UnitId,
        /// Its owner.
        owner: PlayerId,
        /// Where it was.
        at: HexCoord,
        /// Why it was removed.
        cause: RemovalCause,
    },
    /// A new city exists.
    CityFounded {
        /// New city.
        city: CityId,
        /// Owner.
        owner: PlayerId,
        /// Name.
        name: String,
        /// Centre tile.
        at: HexCoord,
    },
    /// A new unit exists.
    UnitSpawned {
        /// New unit.
        unit: UnitId,
        /// Owner.
        owner: PlayerId,
        /// Kind.
        unit_kind: UnitKind,
        /// Position.
        at: HexCoord,
        /// Producing city, if any.
        city: Option<CityId>,
    },
    /// A city changed what it is producing.
    ProductionSet {
        /// City.
        city: CityId,
        /// New item.
        item: Buildable,
    },
    /// A city finished an item.
    ProductionCompleted {
        /// City.
        city: CityId,
        /// Finished item.
        item: Buildable,
    },
    /// A city gained a citizen.
    PopulationGrew {
        /// City.
        city: CityId,
        /// New population.
        population: u32,
    },
    /// A player's action phase began.
    TurnStarted {
        /// Turn number.
        turn: u32,
        /// Player to act.
        player: PlayerId,
    },
    /// A player's turn finished.
    TurnEnded {
        /// Turn number.
        turn: u32,
        /// Player who ended.
        player: PlayerId,
    },
}

/// Discriminant of [`GameEvent`], used for subscriptions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// [`GameEvent::UnitMoved`].
    UnitMoved,
    /// [`GameEvent::CombatResolved`].
    CombatResolved,
    /// [`GameEvent::UnitDestroyed`].
    UnitDestroyed,
    /// [`GameEvent::CityFounded`].
    CityFounded,
    /// [`GameEvent::UnitSpawned`].
    UnitSpawned,
    /// [`GameEvent::ProductionSet`].
    ProductionSet,
    /// [`GameEvent::ProductionCompleted`].
    ProductionCompleted,
    /// [`GameEvent::PopulationGrew`].
    PopulationGrew,
    /// [`GameEvent::TurnStarted`].
    TurnStarted,
    /// [`GameEvent::TurnEnded`].
    TurnEnded,
}

impl EventKind {
    /// Wire name, matching the `kind` tag of serialized events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            EventKind::UnitMoved => "unit_moved",
            EventKind::CombatResolved => "combat_resolved",
            EventKind::UnitDestroyed => "unit_destroyed",
            EventKind::CityFounded => "city_founded",
            EventKind::UnitSpawned => "unit_spawned",
            EventKind::ProductionSet => "production_set",
            EventKind::ProductionCompleted => "production_completed",
            EventKind::PopulationGrew => "population_grew",
            EventKind::TurnStarted => "turn_started",
            EventKind::TurnEnded => "turn_ended",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl GameEvent {
    /// The event's discriminant.
    #[must_use]
    pub fn kind(&self) -> EventKind {
        match self {
            GameEvent::UnitMoved { .. } => EventKind::UnitMoved,
            GameEvent::CombatResolved { .. } => EventKind::CombatResolved,
            GameEvent::UnitDestroyed { .. } => EventKind::UnitDestroyed,
            GameEvent::CityFounded { .. } => EventKind::CityFounded,
            GameEvent::UnitSpawned { .. } => EventKind::UnitSpawned,
            GameEvent::ProductionSet { .. } => EventKind::ProductionSet,
            GameEvent::ProductionCompleted { .. } => EventKind::ProductionCompleted,
            GameEvent::PopulationGrew { .. } => EventKind::PopulationGrew,
            GameEvent::TurnStarted { .. } => EventKind::TurnStarted,
            GameEvent::TurnEnded { .. } => EventKind::TurnEnded,
        }
    }
}
