//! Test fixtures and helpers.
//!
//! Pre-built maps, game states and engines for consistent testing.

use civ_core::clock::TurnPhase;
use civ_core::engine::Engine;
use civ_core::hex::HexCoord;
use civ_core::ids::PlayerId;
use civ_core::map::TileMap;
use civ_core::math::{quarters, Fixed};
use civ_core::rules::{Ruleset, UnitKind};
use civ_core::state::{GameState, GameStateBuilder};
use civ_core::tile::Terrain;

/// First player in every two-player fixture.
pub const RED: PlayerId = PlayerId(1);
/// Second player in every two-player fixture.
pub const BLUE: PlayerId = PlayerId(2);

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> Fixed {
    Fixed::from_num(n)
}

/// Defense modifier of `n` quarter steps (`n * 0.25`).
#[must_use]
pub fn modifier(n: u32) -> Fixed {
    quarters(n)
}

/// One-player state on a `length`-long strip of `terrain`, with no units.
///
/// # Panics
///
/// Panics if the state cannot be built, which only happens for a broken
/// default ruleset.
#[must_use]
pub fn strip_state(length: u32, terrain: Terrain) -> GameState {
    GameStateBuilder::new(TileMap::strip(length, terrain))
        .players([RED])
        .build()
        .expect("strip fixture builds")
}

/// Two-player builder over a grassland rectangle, clock at `RED`'s
/// action phase.
#[must_use]
pub fn two_player_builder(width: u32, height: u32) -> GameStateBuilder {
    GameStateBuilder::new(TileMap::rectangle(width, height, Terrain::Grassland))
        .players([RED, BLUE])
        .clock(1, TurnPhase::PlayerAction, RED)
}

/// Two adjacent warriors on open ground plus a settler for each side.
///
/// Units: 1 = red warrior (1,1), 2 = blue warrior (2,1),
/// 3 = red settler (0,3), 4 = blue settler (5,3).
///
/// # Panics
///
/// Panics if the fixture placement is invalid.
#[must_use]
pub fn skirmish_state() -> GameState {
    two_player_builder(6, 4)
        .unit(RED, UnitKind::Warrior, HexCoord::new(1, 1))
        .unit(BLUE, UnitKind::Warrior, HexCoord::new(2, 1))
        .unit(RED, UnitKind::Settler, HexCoord::new(0, 3))
        .unit(BLUE, UnitKind::Settler, HexCoord::new(5, 3))
        .build()
        .expect("skirmish fixture builds")
}

/// Engine over `state` with subscribers already able to see the first
/// `TurnStarted`.
#[must_use]
pub fn started_engine(state: GameState) -> Engine {
    let mut engine = Engine::new(state);
    engine.start();
    engine
}

/// Rules with cheap warriors and fast growth, for short turn-flow tests.
///
/// # Panics
///
/// Panics if the embedded RON is invalid.
#[must_use]
pub fn quick_ruleset() -> Ruleset {
    let mut rules = Ruleset::from_ron_str(QUICK_RULES).expect("quick ruleset parses");
    for (kind, stats) in Ruleset::default().units {
        rules.units.entry(kind).or_insert(stats);
    }
    rules
}

const QUICK_RULES: &str = r"(
    units: {
        warrior: (strength: 8, movement: 2, health: 100, cost: 2),
        settler: (strength: 0, movement: 2, health: 100, cost: 3, founds_city: true),
    },
    buildings: {
        monument: (cost: 3),
    },
    growth: (food_per_citizen: 2, base_threshold: 2, threshold_per_pop: 1),
    initial_territory_radius: 1,
    center_min_food: 2,
    center_min_production: 1,
)";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixtures_build() {
        assert_eq!(strip_state(4, Terrain::Grassland).map().len(), 4);
        let state = skirmish_state();
        assert_eq!(state.units().len(), 4);
        assert_eq!(state.clock().current_player(), RED);
    }

    #[test]
    fn test_quick_ruleset_keeps_every_unit() {
        let rules = quick_ruleset();
        assert_eq!(rules.unit_stats(UnitKind::Warrior).map(|s| s.cost), Some(2));
        assert!(rules.unit_stats(UnitKind::Horseman).is_some());
        assert_eq!(rules.growth.threshold(1), 3);
    }

    #[test]
    fn test_started_engine_is_in_action_phase() {
        let engine = started_engine(strip_state(3, Terrain::Plains));
        assert_eq!(engine.state().clock().phase(), TurnPhase::PlayerAction);
        assert_eq!(fixed(2) * modifier(2), fixed(1));
    }
}
