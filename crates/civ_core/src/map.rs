//! Tile lookup and the in-memory map.
//!
//! The simulation never generates maps; it consumes them through
//! [`TileLookup`]. [`TileMap`] is the concrete store used by the game state,
//! tests and scenario loading.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::hex::HexCoord;
use crate::tile::{Terrain, Tile};

/// Read-only tile access by axial coordinate.
///
/// The provided methods form the grid cost model: total over every
/// coordinate, with off-map tiles reported as impassable.
pub trait TileLookup {
    /// The tile at `coord`, if it is on the map.
    fn tile(&self, coord: HexCoord) -> Option<&Tile>;

    /// Cost to enter `coord`; `None` is infinite (impassable or off-map).
    fn movement_cost(&self, coord: HexCoord) -> Option<u32> {
        self.tile(coord).and_then(Tile::movement_cost)
    }

    /// Whether `coord` can be entered at finite cost.
    fn is_passable(&self, coord: HexCoord) -> bool {
        self.movement_cost(coord).is_some()
    }
}

/// Map of tiles keyed by coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Tile>", into = "Vec<Tile>")]
pub struct TileMap {
    tiles: BTreeMap<HexCoord, Tile>,
}

impl TileMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Axial parallelogram `q in 0..width`, `r in 0..height` of one terrain.
    #[must_use]
    pub fn rectangle(width: u32, height: u32, terrain: Terrain) -> Self {
        let width = i32::try_from(width).unwrap_or(i32::MAX);
        let height = i32::try_from(height).unwrap_or(i32::MAX);
        let mut tiles = BTreeMap::new();
        for r in 0..height {
            for q in 0..width {
                let coord = HexCoord::new(q, r);
                tiles.insert(coord, Tile::new(coord, terrain));
            }
        }
        Self { tiles }
    }

    /// Single row `(0, 0)..(length - 1, 0)`.
    #[must_use]
    pub fn strip(length: u32, terrain: Terrain) -> Self {
        Self::rectangle(length, 1, terrain)
    }

    /// Build a map from tiles, rejecting invalid feature placement.
    pub fn from_tiles(tiles: impl IntoIterator<Item = Tile>) -> Result<Self> {
        let mut map = Self::new();
        for tile in tiles {
            map.insert(tile)?;
        }
        Ok(map)
    }

    /// Insert or replace a tile.
    pub fn insert(&mut self, tile: Tile) -> Result<()> {
        if let Some(feature) = tile.feature {
            if !feature.can_place_on(tile.terrain) {
                return Err(GameError::InvalidFeature {
                    coord: tile.coord,
                    terrain: tile.terrain.to_string(),
                    feature: feature.to_string(),
                });
            }
        }
        self.tiles.insert(tile.coord, tile);
        Ok(())
    }

    /// Builder form of [`TileMap::insert`].
    pub fn with_tile(mut self, tile: Tile) -> Result<Self> {
        self.insert(tile)?;
        Ok(self)
    }

    /// Whether `coord` is on the map.
    #[must_use]
    pub fn contains(&self, coord: HexCoord) -> bool {
        self.tiles.contains_key(&coord)
    }

    /// Number of tiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Whether the map holds no tiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Tiles in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }
}

impl TileLookup for TileMap {
    fn tile(&self, coord: HexCoord) -> Option<&Tile> {
        self.tiles.get(&coord)
    }
}

/// Deserialization path: feature placement is checked as for
/// [`TileMap::from_tiles`].
impl TryFrom<Vec<Tile>> for TileMap {
    type Error = GameError;

    fn try_from(tiles: Vec<Tile>) -> Result<Self> {
        Self::from_tiles(tiles)
    }
}

impl From<TileMap> for Vec<Tile> {
    fn from(map: TileMap) -> Self {
        map.tiles.into_values().collect()
    }
}
