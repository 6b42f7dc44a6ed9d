//! City records and their production queue slot.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId};
use crate::rules::{Buildable, BuildingKind, Ruleset};
use crate::tile::TileYields;

/// Production in progress.
///
/// Progress is kept when the item changes; overflow past the cost carries
/// into the next item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductionState {
    /// Item being produced, if any.
    pub item: Option<Buildable>,
    /// Accumulated production.
    pub progress: u32,
    /// Cost of the current item, 0 when idle.
    pub cost: u32,
}

impl ProductionState {
    /// Whether the current item has enough progress to complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.item.is_some() && self.progress >= self.cost
    }
}

/// A city.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct City {
    /// Unique id.
    pub id: CityId,
    /// Owning player.
    pub owner: PlayerId,
    /// Display name.
    pub name: String,
    /// Centre tile.
    pub position: HexCoord,
    /// Number of citizens; each works one territory tile.
    pub population: u32,
    /// Stored food towards the next citizen.
    pub food_stock: u32,
    /// Production slot.
    pub production: ProductionState,
    /// Completed buildings.
    pub buildings: BTreeSet<BuildingKind>,
    /// Tiles owned by the city, centre included.
    pub territory: BTreeSet<HexCoord>,
}

impl City {
    /// New population-1 city with the given territory.
    #[must_use]
    pub fn new(
        id: CityId,
        owner: PlayerId,
        name: String,
        position: HexCoord,
        territory: BTreeSet<HexCoord>,
    ) -> Self {
        Self {
            id,
            owner,
            name,
            position,
            population: 1,
            food_stock: 0,
            production: ProductionState::default(),
            buildings: BTreeSet::new(),
            territory,
        }
    }

    /// Whether the building has been completed here.
    #[must_use]
    pub fn has_building(&self, kind: BuildingKind) -> bool {
        self.buildings.contains(&kind)
    }

    /// Flat per-turn bonus from completed buildings.
    #[must_use]
    pub fn building_yields(&self, rules: &Ruleset) -> TileYields {
        self.buildings
            .iter()
            .filter_map(|kind| rules.building_stats(*kind))
            .fold(TileYields::default(), |acc, stats| {
                acc + TileYields {
                    food: stats.food_bonus,
                    production: stats.production_bonus,
                    gold: 0,
                }
            })
    }

    /// Defense quarter steps granted to units on the city tile.
    #[must_use]
    pub fn defense_quarters(&self, rules: &Ruleset) -> u32 {
        self.buildings
            .iter()
            .filter_map(|kind| rules.building_stats(*kind))
            .map(|stats| stats.defense_quarters)
            .fold(0, u32::saturating_add)
    }
}
