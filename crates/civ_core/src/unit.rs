//! Unit records.

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::ids::{PlayerId, UnitId};
use crate::rules::{UnitKind, UnitStats};

/// A unit on the map.
///
/// Invariants: `movement <= max_movement` and `health <= max_health`.
/// A unit whose health reaches zero is removed from the state in the same
/// executor call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    /// Unique id.
    pub id: UnitId,
    /// Owning player.
    pub owner: PlayerId,
    /// Unit kind.
    pub kind: UnitKind,
    /// Current position.
    pub position: HexCoord,
    /// Movement points left this turn.
    pub movement: u32,
    /// Movement points at turn start.
    pub max_movement: u32,
    /// Current health.
    pub health: u32,
    /// Maximum health.
    pub max_health: u32,
    /// Base combat strength; 0 for civilians.
    pub strength: u32,
    /// Whether this unit can found a city.
    pub founds_city: bool,
}

impl Unit {
    /// Fresh unit at full health and movement.
    #[must_use]
    pub fn new(
        id: UnitId,
        owner: PlayerId,
        kind: UnitKind,
        position: HexCoord,
        stats: &UnitStats,
    ) -> Self {
        Self {
            id,
            owner,
            kind,
            position,
            movement: stats.movement,
            max_movement: stats.movement,
            health: stats.health,
            max_health: stats.health,
            strength: stats.strength,
            founds_city: stats.founds_city,
        }
    }

    /// Civilians can neither attack nor counter-attack.
    #[must_use]
    pub fn is_civilian(&self) -> bool {
        self.strength == 0
    }

    /// Whether any movement points remain.
    #[must_use]
    pub fn can_act(&self) -> bool {
        self.movement > 0
    }

    /// Restore movement points for a new turn.
    pub(crate) fn refresh(&mut self) {
        self.movement = self.max_movement;
    }

    /// Apply damage, saturating at zero. Returns whether the unit survives.
    pub(crate) fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        self.health > 0
    }
}
