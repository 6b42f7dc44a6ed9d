//! Serializable read-only views of the game for front ends.

use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::clock::TurnPhase;
use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId, UnitId};
use crate::map::TileLookup;
use crate::math::{round_to_u32, Fixed};
use crate::state::GameState;
use crate::territory::TerritoryLookup;
use crate::tile::{Tile, TileYields};
use crate::unit::Unit;

/// Units, cities and turn position at one moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    /// Turn number, starting at 1.
    pub turn: u32,
    /// Current phase.
    pub phase: TurnPhase,
    /// Player whose turn it is.
    pub current_player: PlayerId,
    /// Turn order.
    pub players: Vec<PlayerId>,
    /// Every unit, by id.
    pub units: Vec<Unit>,
    /// Every city, by id.
    pub cities: Vec<City>,
}

impl GameSnapshot {
    /// Capture `state`.
    #[must_use]
    pub fn capture(state: &GameState) -> Self {
        let clock = state.clock();
        Self {
            turn: clock.turn(),
            phase: clock.phase(),
            current_player: clock.current_player(),
            players: clock.players().to_vec(),
            units: state.units().values().cloned().collect(),
            cities: state.cities().values().cloned().collect(),
        }
    }
}

/// Everything a front end shows about one tile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileInfo {
    /// The tile itself.
    pub tile: Tile,
    /// Cost to enter, `None` if impassable.
    pub movement_cost: Option<u32>,
    /// Whether units can enter.
    pub passable: bool,
    /// Defender bonus in percent, walls included.
    pub defense_bonus_percent: u32,
    /// Food, production and gold.
    pub yields: TileYields,
    /// City centred here.
    pub city: Option<CityId>,
    /// City whose territory contains the tile.
    pub territory_owner: Option<CityId>,
    /// Units standing here.
    pub units: Vec<UnitId>,
}

impl TileInfo {
    /// Describe `coord`, or `None` if it is off the map.
    #[must_use]
    pub fn describe(state: &GameState, coord: HexCoord) -> Option<Self> {
        let tile = *state.map().tile(coord)?;
        let percent = state
            .defense_modifier_at(coord)
            .saturating_mul(Fixed::from_bits(100 << 32));
        Some(Self {
            movement_cost: tile.movement_cost(),
            passable: tile.is_passable(),
            defense_bonus_percent: round_to_u32(percent),
            yields: tile.yields(),
            city: state.city_at(coord).map(|c| c.id),
            territory_owner: state.owner_of_tile(coord),
            units: state.units_at(coord).map(|u| u.id).collect(),
            tile,
        })
    }
}
