//! Game state: the map, rules, entity arenas and turn clock.
//!
//! Entities live in [`EntityStore`] arenas keyed by monotonically increasing
//! integer ids. Everything is ordered (`BTreeMap`), so iteration, encoding and
//! hashing are deterministic.

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::city::City;
use crate::clock::{TurnClock, TurnPhase};
use crate::error::{GameError, Result};
use crate::hex::HexCoord;
use crate::ids::{CityId, EntityId, PlayerId, UnitId};
use crate::map::{TileLookup, TileMap};
use crate::math::{quarters, Fixed};
use crate::rules::{Buildable, BuildingKind, Ruleset, UnitKind};
use crate::territory::{initial_claim, release_tile, TerritoryLookup};
use crate::unit::Unit;

/// Arena of records keyed by integer id.
///
/// Ids are never reused: removing a record does not roll back the counter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityStore<I: EntityId, T> {
    records: BTreeMap<I, T>,
    next_id: u32,
}

impl<I: EntityId, T> Default for EntityStore<I, T> {
    fn default() -> Self {
        Self {
            records: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl<I: EntityId, T> EntityStore<I, T> {
    /// Empty store; the first id handed out is 1.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id and store the record built from it.
    pub fn insert(&mut self, build: impl FnOnce(I) -> T) -> I {
        let id = I::from_raw(self.next_id);
        self.next_id += 1;
        self.records.insert(id, build(id));
        id
    }

    /// Record by id.
    #[must_use]
    pub fn get(&self, id: I) -> Option<&T> {
        self.records.get(&id)
    }

    pub(crate) fn get_mut(&mut self, id: I) -> Option<&mut T> {
        self.records.get_mut(&id)
    }

    pub(crate) fn remove(&mut self, id: I) -> Option<T> {
        self.records.remove(&id)
    }

    /// Whether a record exists.
    #[must_use]
    pub fn contains(&self, id: I) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in ascending id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.records.values()
    }

    pub(crate) fn values_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.records.values_mut()
    }

    /// Ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = I> + '_ {
        self.records.keys().copied()
    }
}

/// Complete simulation state.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameState {
    pub(crate) map: TileMap,
    pub(crate) ruleset: Ruleset,
    pub(crate) units: EntityStore<UnitId, Unit>,
    pub(crate) cities: EntityStore<CityId, City>,
    pub(crate) clock: TurnClock,
}

impl GameState {
    /// The map.
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.map
    }

    /// Active rules.
    #[must_use]
    pub fn ruleset(&self) -> &Ruleset {
        &self.ruleset
    }

    /// All units.
    #[must_use]
    pub fn units(&self) -> &EntityStore<UnitId, Unit> {
        &self.units
    }

    /// All cities.
    #[must_use]
    pub fn cities(&self) -> &EntityStore<CityId, City> {
        &self.cities
    }

    /// Turn clock.
    #[must_use]
    pub fn clock(&self) -> &TurnClock {
        &self.clock
    }

    /// Unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.get(id)
    }

    /// City by id.
    #[must_use]
    pub fn city(&self, id: CityId) -> Option<&City> {
        self.cities.get(id)
    }

    /// Units standing on `coord`, in id order.
    pub fn units_at(&self, coord: HexCoord) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.position == coord)
    }

    /// City centred on `coord`.
    #[must_use]
    pub fn city_at(&self, coord: HexCoord) -> Option<&City> {
        self.cities.values().find(|c| c.position == coord)
    }

    /// Units owned by `player`, in id order.
    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.units.values().filter(move |u| u.owner == player)
    }

    /// Cities owned by `player`, in id order.
    pub fn cities_of(&self, player: PlayerId) -> impl Iterator<Item = &City> {
        self.cities.values().filter(move |c| c.owner == player)
    }

    /// Defense modifier for a unit standing on `coord`: terrain and feature
    /// cover plus the walls of a city centred there.
    #[must_use]
    pub fn defense_modifier_at(&self, coord: HexCoord) -> Fixed {
        let terrain = self
            .map
            .tile(coord)
            .map_or(Fixed::ZERO, |t| t.defense_bonus());
        let walls = self
            .city_at(coord)
            .map_or(0, |c| c.defense_quarters(&self.ruleset));
        terrain.saturating_add(quarters(walls))
    }

    /// Encode the whole state with `bincode`.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    /// Decode a state produced by [`GameState::to_bytes`].
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let state: GameState = bincode::deserialize(bytes)?;
        if !state.clock.is_consistent() {
            return Err(GameError::InvalidState(
                "clock points outside the turn order".into(),
            ));
        }
        Ok(state)
    }

    /// Deterministic hash of the full state.
    ///
    /// Equal states hash equally within one build; used to compare runs.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl TerritoryLookup for GameState {
    fn territory_of(&self, city: CityId) -> Option<&std::collections::BTreeSet<HexCoord>> {
        self.cities.territory_of(city)
    }

    fn owner_of_tile(&self, coord: HexCoord) -> Option<CityId> {
        self.cities.owner_of_tile(coord)
    }
}

/// A unit to place when building the initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitSeed {
    /// Owner.
    pub owner: PlayerId,
    /// Kind.
    pub kind: UnitKind,
    /// Starting tile.
    pub position: HexCoord,
}

fn one() -> u32 {
    1
}

/// A city to place when building the initial state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitySeed {
    /// Owner.
    pub owner: PlayerId,
    /// Name; defaults to `City <id>`.
    #[serde(default)]
    pub name: Option<String>,
    /// Centre tile.
    pub position: HexCoord,
    /// Starting population.
    #[serde(default = "one")]
    pub population: u32,
    /// Buildings already completed.
    #[serde(default)]
    pub buildings: Vec<BuildingKind>,
    /// Item in production.
    #[serde(default)]
    pub production: Option<Buildable>,
}

/// Builder for the initial game state.
///
/// This is the initial-spawn path: units and cities placed here never go
/// through command validation, so the builder checks placement itself.
#[derive(Debug, Clone)]
pub struct GameStateBuilder {
    map: TileMap,
    ruleset: Ruleset,
    players: Vec<PlayerId>,
    clock: Option<(u32, TurnPhase, PlayerId)>,
    units: Vec<UnitSeed>,
    cities: Vec<CitySeed>,
}

impl GameStateBuilder {
    /// Start from a map with the default ruleset and no players.
    #[must_use]
    pub fn new(map: TileMap) -> Self {
        Self {
            map,
            ruleset: Ruleset::default(),
            players: Vec::new(),
            clock: None,
            units: Vec::new(),
            cities: Vec::new(),
        }
    }

    /// Replace the ruleset.
    #[must_use]
    pub fn ruleset(mut self, ruleset: Ruleset) -> Self {
        self.ruleset = ruleset;
        self
    }

    /// Set the turn order.
    #[must_use]
    pub fn players(mut self, players: impl IntoIterator<Item = PlayerId>) -> Self {
        self.players = players.into_iter().collect();
        self
    }

    /// Start the clock somewhere other than turn 1 / `TurnStart` / first
    /// player.
    #[must_use]
    pub fn clock(mut self, turn: u32, phase: TurnPhase, current_player: PlayerId) -> Self {
        self.clock = Some((turn, phase, current_player));
        self
    }

    /// Place a unit.
    #[must_use]
    pub fn unit(mut self, owner: PlayerId, kind: UnitKind, position: HexCoord) -> Self {
        self.units.push(UnitSeed {
            owner,
            kind,
            position,
        });
        self
    }

    /// Place a population-1 city.
    #[must_use]
    pub fn city(mut self, owner: PlayerId, name: &str, position: HexCoord) -> Self {
        self.cities.push(CitySeed {
            owner,
            name: Some(name.to_string()),
            position,
            population: 1,
            buildings: Vec::new(),
            production: None,
        });
        self
    }

    /// Place a fully described unit.
    #[must_use]
    pub fn unit_seed(mut self, seed: UnitSeed) -> Self {
        self.units.push(seed);
        self
    }

    /// Place a fully described city.
    #[must_use]
    pub fn city_seed(mut self, seed: CitySeed) -> Self {
        self.cities.push(seed);
        self
    }

    /// Validate placement and build the state.
    pub fn build(self) -> Result<GameState> {
        self.ruleset.validate()?;
        let clock = match self.clock {
            Some((turn, phase, current)) => TurnClock::at(self.players, turn, phase, current)?,
            None => TurnClock::new(self.players)?,
        };

        let mut state = GameState {
            map: self.map,
            ruleset: self.ruleset,
            units: EntityStore::new(),
            cities: EntityStore::new(),
            clock,
        };

        for seed in self.cities {
            place_city(&mut state, seed)?;
        }
        for seed in self.units {
            place_unit(&mut state, &seed)?;
        }
        Ok(state)
    }
}

fn place_city(state: &mut GameState, seed: CitySeed) -> Result<CityId> {
    if !state.clock.has_player(seed.owner) {
        return Err(GameError::UnknownPlayer(seed.owner));
    }
    let on_land = state
        .map
        .tile(seed.position)
        .is_some_and(|t| t.terrain.is_land() && t.is_passable());
    if !on_land {
        return Err(GameError::InvalidState(format!(
            "city cannot be placed at {}",
            seed.position
        )));
    }
    if state.city_at(seed.position).is_some() {
        return Err(GameError::InvalidState(format!(
            "two cities at {}",
            seed.position
        )));
    }
    let production = match seed.production {
        Some(item) => {
            let cost = state.ruleset.cost_of(item).ok_or_else(|| {
                GameError::InvalidState(format!("{item} is not buildable"))
            })?;
            crate::city::ProductionState {
                item: Some(item),
                progress: 0,
                cost,
            }
        }
        None => crate::city::ProductionState::default(),
    };

    release_tile(&mut state.cities, seed.position);
    let territory = initial_claim(
        &state.map,
        &state.cities,
        seed.position,
        state.ruleset.initial_territory_radius,
    );
    let id = state.cities.insert(|id| {
        let name = seed.name.unwrap_or_else(|| format!("City {}", id.0));
        let mut city = City::new(id, seed.owner, name, seed.position, territory);
        city.population = seed.population.max(1);
        city.buildings = seed.buildings.into_iter().collect();
        city.production = production;
        city
    });
    Ok(id)
}

fn place_unit(state: &mut GameState, seed: &UnitSeed) -> Result<UnitId> {
    if !state.clock.has_player(seed.owner) {
        return Err(GameError::UnknownPlayer(seed.owner));
    }
    let stats = state.ruleset.unit_stats(seed.kind).cloned().ok_or_else(|| {
        GameError::InvalidState(format!("ruleset does not define {}", seed.kind))
    })?;
    if !state.map.is_passable(seed.position) {
        return Err(GameError::InvalidState(format!(
            "{} placed on impassable tile {}",
            seed.kind, seed.position
        )));
    }
    let (owner, kind, position) = (seed.owner, seed.kind, seed.position);
    Ok(state
        .units
        .insert(|id| Unit::new(id, owner, kind, position, &stats)))
}
