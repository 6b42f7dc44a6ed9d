//! Scenario loading and configuration.
//!
//! Scenarios are RON files describing the initial game: the map, the turn
//! order, starting units and cities, and optionally a custom ruleset and a
//! clock position to resume from.
//!
//! ```ron
//! (
//!     name: "River crossing",
//!     map: Rectangle(
//!         width: 8,
//!         height: 6,
//!         terrain: Grassland,
//!         overrides: [
//!             (coord: (q: 4, r: 2), terrain: Lake, feature: None),
//!             (coord: (q: 2, r: 3), terrain: Plains, feature: None, resource: Some(Wheat)),
//!         ],
//!     ),
//!     players: [1, 2],
//!     units: [
//!         (owner: 1, kind: warrior, position: (q: 1, r: 1)),
//!     ],
//! )
//! ```

use std::path::Path;

use civ_core::clock::TurnPhase;
use civ_core::error::GameError;
use civ_core::hex::HexCoord;
use civ_core::ids::PlayerId;
use civ_core::map::TileMap;
use civ_core::rules::{Ruleset, UnitKind};
use civ_core::state::{CitySeed, GameState, GameStateBuilder, UnitSeed};
use civ_core::tile::{Terrain, Tile};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for scenario operations.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// File not found.
    #[error("scenario file not found: {0}")]
    FileNotFound(String),
    /// Failed to read file.
    #[error("failed to read scenario file {path}")]
    Read {
        /// File path.
        path: String,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
    /// Failed to parse RON.
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] ron::error::SpannedError),
    /// Parsed, but does not describe a valid game.
    #[error("invalid scenario: {0}")]
    Invalid(#[from] GameError),
}

/// How the map is described.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MapSpec {
    /// A filled parallelogram (`q` in `0..width`, `r` in `0..height`) with
    /// individual tiles replaced.
    Rectangle {
        /// Columns.
        width: u32,
        /// Rows.
        height: u32,
        /// Fill terrain.
        terrain: Terrain,
        /// Tiles replacing the fill.
        #[serde(default)]
        overrides: Vec<Tile>,
    },
    /// Every tile listed explicitly.
    Tiles(Vec<Tile>),
}

impl MapSpec {
    /// Build the map, rejecting invalid feature placement.
    pub fn build(&self) -> Result<TileMap, GameError> {
        match self {
            MapSpec::Rectangle {
                width,
                height,
                terrain,
                overrides,
            } => {
                let mut map = TileMap::rectangle(*width, *height, *terrain);
                for tile in overrides {
                    map.insert(*tile)?;
                }
                Ok(map)
            }
            MapSpec::Tiles(tiles) => TileMap::from_tiles(tiles.iter().copied()),
        }
    }
}

/// Where the clock starts when not at turn 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSpec {
    /// Turn number.
    pub turn: u32,
    /// Phase.
    pub phase: TurnPhase,
    /// Player whose turn it is.
    pub player: PlayerId,
}

/// A complete scenario configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Scenario name.
    pub name: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// The map.
    pub map: MapSpec,
    /// Turn order.
    pub players: Vec<PlayerId>,
    /// Starting units.
    #[serde(default)]
    pub units: Vec<UnitSeed>,
    /// Starting cities.
    #[serde(default)]
    pub cities: Vec<CitySeed>,
    /// Rules; the standard ruleset when absent.
    #[serde(default)]
    pub ruleset: Option<Ruleset>,
    /// Starting clock; turn 1, first player, `TurnStart` when absent.
    #[serde(default)]
    pub clock: Option<ClockSpec>,
}

impl Default for Scenario {
    fn default() -> Self {
        Self::skirmish()
    }
}

impl Scenario {
    /// Load a scenario from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.display().to_string()));
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ScenarioError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_ron_str(&contents)
    }

    /// Load from a RON string (useful for embedded scenarios).
    pub fn from_ron_str(ron: &str) -> Result<Self, ScenarioError> {
        let scenario: Scenario = ron::from_str(ron)?;
        Ok(scenario)
    }

    /// Built-in two-player opening used when no scenario is given.
    ///
    /// A 10x8 grassland with hills, a forest belt and a lake; each player
    /// starts with a settler, a warrior and a scout.
    #[must_use]
    pub fn skirmish() -> Self {
        use civ_core::tile::TileFeature;

        let p1 = PlayerId(1);
        let p2 = PlayerId(2);
        let seed = |owner, kind, q, r| UnitSeed {
            owner,
            kind,
            position: HexCoord::new(q, r),
        };
        let mut overrides = vec![
            Tile::new(HexCoord::new(4, 3), Terrain::Lake),
            Tile::new(HexCoord::new(5, 3), Terrain::Lake),
            Tile::new(HexCoord::new(3, 1), Terrain::GrasslandHill),
            Tile::new(HexCoord::new(6, 5), Terrain::PlainsHill),
            Tile::new(HexCoord::new(5, 0), Terrain::Mountain),
        ];
        overrides.extend(
            (0..8).map(|r| Tile::new(HexCoord::new(7, r), Terrain::Plains).with_feature(TileFeature::Forest)),
        );

        Self {
            name: "Skirmish".to_string(),
            description: "Two players, one settler each".to_string(),
            map: MapSpec::Rectangle {
                width: 10,
                height: 8,
                terrain: Terrain::Grassland,
                overrides,
            },
            players: vec![p1, p2],
            units: vec![
                seed(p1, UnitKind::Settler, 1, 2),
                seed(p1, UnitKind::Warrior, 2, 2),
                seed(p1, UnitKind::Scout, 1, 3),
                seed(p2, UnitKind::Settler, 8, 5),
                seed(p2, UnitKind::Warrior, 8, 4),
                seed(p2, UnitKind::Scout, 9, 5),
            ],
            cities: Vec::new(),
            ruleset: None,
            clock: None,
        }
    }

    /// Build the initial game state.
    pub fn build_state(&self) -> Result<GameState, ScenarioError> {
        let mut builder = GameStateBuilder::new(self.map.build()?)
            .ruleset(self.ruleset.clone().unwrap_or_default())
            .players(self.players.iter().copied());
        if let Some(clock) = self.clock {
            builder = builder.clock(clock.turn, clock.phase, clock.player);
        }
        for city in &self.cities {
            builder = builder.city_seed(city.clone());
        }
        for unit in &self.units {
            builder = builder.unit_seed(unit.clone());
        }
        Ok(builder.build()?)
    }
}
