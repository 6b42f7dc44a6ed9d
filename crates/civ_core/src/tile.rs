//! Terrain, features and the per-tile cost model.
//!
//! A [`Tile`] is read-only input to the simulation. Everything the core
//! needs from it (movement cost, passability, yields, defense) is derived
//! from the terrain and optional feature.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::hex::HexCoord;
use crate::math::{quarters, Fixed};

/// Base terrain of a tile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum Terrain {
    /// Flat, fertile land.
    #[default]
    Grassland,
    /// Flat land with some production.
    Plains,
    /// Barren flat land.
    Desert,
    /// Cold flat land.
    Tundra,
    /// Frozen flat land.
    Snow,
    /// Grassland hill.
    GrasslandHill,
    /// Plains hill.
    PlainsHill,
    /// Desert hill.
    DesertHill,
    /// Tundra hill.
    TundraHill,
    /// Snow hill.
    SnowHill,
    /// Impassable peak.
    Mountain,
    /// Shallow water next to land.
    Coast,
    /// Deep water.
    Ocean,
    /// Inland water.
    Lake,
}

impl Terrain {
    /// Every terrain, in declaration order.
    pub const ALL: [Terrain; 14] = [
        Terrain::Grassland,
        Terrain::Plains,
        Terrain::Desert,
        Terrain::Tundra,
        Terrain::Snow,
        Terrain::GrasslandHill,
        Terrain::PlainsHill,
        Terrain::DesertHill,
        Terrain::TundraHill,
        Terrain::SnowHill,
        Terrain::Mountain,
        Terrain::Coast,
        Terrain::Ocean,
        Terrain::Lake,
    ];

    /// Cost for a land unit to enter; `None` when land units cannot enter.
    #[must_use]
    pub const fn base_movement_cost(self) -> Option<u32> {
        match self {
            Terrain::Grassland
            | Terrain::Plains
            | Terrain::Desert
            | Terrain::Tundra
            | Terrain::Snow => Some(1),
            Terrain::GrasslandHill
            | Terrain::PlainsHill
            | Terrain::DesertHill
            | Terrain::TundraHill
            | Terrain::SnowHill => Some(2),
            Terrain::Mountain | Terrain::Coast | Terrain::Ocean | Terrain::Lake => None,
        }
    }

    /// Base food before features.
    #[must_use]
    pub const fn base_food(self) -> i32 {
        match self {
            Terrain::Grassland | Terrain::Lake => 2,
            Terrain::Plains | Terrain::Tundra | Terrain::Coast | Terrain::Ocean => 1,
            _ => 0,
        }
    }

    /// Base production before features.
    #[must_use]
    pub const fn base_production(self) -> i32 {
        match self {
            Terrain::Plains => 1,
            Terrain::GrasslandHill
            | Terrain::PlainsHill
            | Terrain::DesertHill
            | Terrain::TundraHill
            | Terrain::SnowHill => 2,
            _ => 0,
        }
    }

    /// Coast, ocean or lake.
    #[must_use]
    pub const fn is_water(self) -> bool {
        matches!(self, Terrain::Coast | Terrain::Ocean | Terrain::Lake)
    }

    /// Any hill variant.
    #[must_use]
    pub const fn is_hill(self) -> bool {
        matches!(
            self,
            Terrain::GrasslandHill
                | Terrain::PlainsHill
                | Terrain::DesertHill
                | Terrain::TundraHill
                | Terrain::SnowHill
        )
    }

    /// Anything that is not water. Mountains count as land.
    #[must_use]
    pub const fn is_land(self) -> bool {
        !self.is_water()
    }
}

impl fmt::Display for Terrain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Optional feature layered on top of terrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileFeature {
    /// Woodland.
    Forest,
    /// Dense rainforest.
    Jungle,
    /// Wetland.
    Marsh,
    /// Seasonally flooded desert river banks.
    Floodplains,
    /// Desert spring.
    Oasis,
    /// Pack ice on water.
    Ice,
}

impl TileFeature {
    /// Food added (or removed) by the feature.
    #[must_use]
    pub const fn food_modifier(self) -> i32 {
        match self {
            TileFeature::Marsh => -1,
            TileFeature::Floodplains => 2,
            TileFeature::Oasis => 3,
            _ => 0,
        }
    }

    /// Production added (or removed) by the feature.
    #[must_use]
    pub const fn production_modifier(self) -> i32 {
        match self {
            TileFeature::Forest => 1,
            TileFeature::Jungle => -1,
            _ => 0,
        }
    }

    /// Gold added by the feature.
    #[must_use]
    pub const fn gold_modifier(self) -> i32 {
        match self {
            TileFeature::Oasis => 1,
            _ => 0,
        }
    }

    /// Extra movement cost to enter a tile carrying this feature.
    #[must_use]
    pub const fn movement_surcharge(self) -> u32 {
        match self {
            TileFeature::Forest | TileFeature::Jungle | TileFeature::Marsh => 1,
            _ => 0,
        }
    }

    /// Whether the feature gives defenders cover.
    #[must_use]
    pub const fn is_cover(self) -> bool {
        matches!(self, TileFeature::Forest | TileFeature::Jungle)
    }

    /// Whether this feature may appear on `terrain`.
    #[must_use]
    pub const fn can_place_on(self, terrain: Terrain) -> bool {
        match self {
            TileFeature::Forest => matches!(
                terrain,
                Terrain::Grassland
                    | Terrain::Plains
                    | Terrain::Tundra
                    | Terrain::GrasslandHill
                    | Terrain::PlainsHill
                    | Terrain::TundraHill
            ),
            TileFeature::Jungle => matches!(
                terrain,
                Terrain::Grassland | Terrain::Plains | Terrain::GrasslandHill | Terrain::PlainsHill
            ),
            TileFeature::Marsh => matches!(terrain, Terrain::Grassland),
            TileFeature::Floodplains | TileFeature::Oasis => matches!(terrain, Terrain::Desert),
            TileFeature::Ice => matches!(terrain, Terrain::Coast | Terrain::Ocean),
        }
    }
}

impl fmt::Display for TileFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Broad class of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResourceCategory {
    /// Common food or production boosts.
    Bonus,
    /// Military inputs.
    Strategic,
    /// Rare trade goods.
    Luxury,
}

/// Collectible resource sitting on a tile. Each adds a flat bonus to the
/// tile's yields.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TileResource {
    Cattle,
    Sheep,
    Fish,
    Stone,
    Wheat,
    Bananas,
    Deer,
    Horses,
    Iron,
    Coal,
    Oil,
    Aluminum,
    Uranium,
    Citrus,
    Cotton,
    Copper,
    Gold,
    Crab,
    Whales,
    Turtles,
    Olives,
    Wine,
    Silk,
    Spices,
    Gems,
    Marble,
    Ivory,
}

impl TileResource {
    /// Category of the resource.
    #[must_use]
    pub const fn category(self) -> ResourceCategory {
        use TileResource::*;
        match self {
            Cattle | Sheep | Fish | Stone | Wheat | Bananas | Deer => ResourceCategory::Bonus,
            Horses | Iron | Coal | Oil | Aluminum | Uranium => ResourceCategory::Strategic,
            _ => ResourceCategory::Luxury,
        }
    }

    /// Food added to the tile.
    #[must_use]
    pub const fn food_bonus(self) -> i32 {
        use TileResource::*;
        match self {
            Fish | Wheat | Bananas | Deer | Citrus | Crab | Whales | Turtles => 1,
            _ => 0,
        }
    }

    /// Production added to the tile.
    #[must_use]
    pub const fn production_bonus(self) -> i32 {
        use TileResource::*;
        match self {
            Cattle | Sheep | Stone | Horses | Iron | Coal | Oil | Aluminum | Uranium | Olives
            | Marble | Ivory => 1,
            _ => 0,
        }
    }

    /// Gold added to the tile.
    #[must_use]
    pub const fn gold_bonus(self) -> i32 {
        use TileResource::*;
        match self {
            Gems => 3,
            Cotton | Copper | Gold | Wine | Silk | Spices => 2,
            Citrus | Whales | Turtles | Olives | Marble | Ivory => 1,
            _ => 0,
        }
    }
}

impl fmt::Display for TileResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Food, production and gold a worked tile provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TileYields {
    /// Food per turn.
    pub food: u32,
    /// Production per turn.
    pub production: u32,
    /// Gold per turn.
    #[serde(default)]
    pub gold: u32,
}

impl TileYields {
    /// Build yields from signed totals, flooring each at zero.
    #[must_use]
    pub fn from_signed(food: i32, production: i32, gold: i32) -> Self {
        Self {
            food: u32::try_from(food).unwrap_or(0),
            production: u32::try_from(production).unwrap_or(0),
            gold: u32::try_from(gold).unwrap_or(0),
        }
    }
}

impl std::ops::Add for TileYields {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            food: self.food.saturating_add(rhs.food),
            production: self.production.saturating_add(rhs.production),
            gold: self.gold.saturating_add(rhs.gold),
        }
    }
}

/// One map cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tile {
    /// Where the tile sits.
    pub coord: HexCoord,
    /// Base terrain.
    pub terrain: Terrain,
    /// Optional feature.
    pub feature: Option<TileFeature>,
    /// Optional resource.
    #[serde(default)]
    pub resource: Option<TileResource>,
}

impl Tile {
    /// Featureless tile.
    #[must_use]
    pub const fn new(coord: HexCoord, terrain: Terrain) -> Self {
        Self {
            coord,
            terrain,
            feature: None,
            resource: None,
        }
    }

    /// Same tile carrying `feature`. Placement is checked when the tile is
    /// inserted into a [`crate::map::TileMap`].
    #[must_use]
    pub const fn with_feature(mut self, feature: TileFeature) -> Self {
        self.feature = Some(feature);
        self
    }

    /// Same tile carrying `resource`.
    #[must_use]
    pub const fn with_resource(mut self, resource: TileResource) -> Self {
        self.resource = Some(resource);
        self
    }

    /// Movement cost to enter this tile, `None` if impassable.
    #[must_use]
    pub fn movement_cost(&self) -> Option<u32> {
        let base = self.terrain.base_movement_cost()?;
        let surcharge = self.feature.map_or(0, TileFeature::movement_surcharge);
        Some(base + surcharge)
    }

    /// Whether land units can enter.
    #[must_use]
    pub fn is_passable(&self) -> bool {
        self.movement_cost().is_some()
    }

    /// Yields of the tile: terrain, then feature, then resource, each
    /// total floored at zero.
    #[must_use]
    pub fn yields(&self) -> TileYields {
        let mut food = self.terrain.base_food();
        let mut production = self.terrain.base_production();
        let mut gold = 0;
        if let Some(f) = self.feature {
            food += f.food_modifier();
            production += f.production_modifier();
            gold += f.gold_modifier();
        }
        if let Some(r) = self.resource {
            food += r.food_bonus();
            production += r.production_bonus();
            gold += r.gold_bonus();
        }
        TileYields::from_signed(food, production, gold)
    }

    /// Defense modifier for a unit standing here: a quarter for hills and a
    /// quarter for forest or jungle cover.
    #[must_use]
    pub fn defense_bonus(&self) -> Fixed {
        let mut steps = 0;
        if self.terrain.is_hill() {
            steps += 1;
        }
        if self.feature.is_some_and(TileFeature::is_cover) {
            steps += 1;
        }
        quarters(steps)
    }

    /// Whether the feature (if any) is valid for the terrain.
    #[must_use]
    pub fn has_valid_feature(&self) -> bool {
        self.feature.map_or(true, |f| f.can_place_on(self.terrain))
    }
}
