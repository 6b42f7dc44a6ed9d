//! Determinism testing utilities.
//!
//! Provides a harness for verifying that replaying the same command script
//! against the same initial state always ends in the same state.
//!
//! # Testing Strategy
//!
//! Sources of non-determinism this guards against:
//!
//! - **Floating-point math**: combat uses [`civ_core::math::Fixed`].
//! - **HashMap iteration order**: every collection in the state is ordered.
//! - **Priority-queue ties**: the pathfinder breaks ties by insertion order.
//! - **Id reuse**: entity ids only ever increase.
//!
//! # Test Levels
//!
//! 1. **Unit tests**: individual executors and the combat formula
//! 2. **Property tests**: random command scripts replay identically
//! 3. **Integration tests**: full turn sequences are reproducible
//! 4. **Parallel tests**: N replays on N threads all match

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::thread;

use civ_core::command::{Command, CommandResult};
use civ_core::engine::Engine;
use civ_core::state::GameState;
use serde::Serialize;

/// Result of a determinism test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeterminismResult {
    /// Whether all runs produced identical results.
    pub is_deterministic: bool,
    /// Final state hash of each run; `None` for a run that panicked.
    pub hashes: Vec<Option<u64>>,
    /// Number of commands replayed per run.
    pub commands: usize,
}

impl DeterminismResult {
    fn from_hashes(hashes: Vec<Option<u64>>, commands: usize) -> Self {
        let is_deterministic =
            hashes.iter().all(Option::is_some) && hashes.windows(2).all(|w| w[0] == w[1]);
        Self {
            is_deterministic,
            hashes,
            commands,
        }
    }

    /// Distinct final hashes (1 for a deterministic replay).
    #[must_use]
    pub fn unique_hashes(&self) -> Vec<u64> {
        let mut unique: Vec<u64> = self.hashes.iter().flatten().copied().collect();
        unique.sort_unstable();
        unique.dedup();
        unique
    }

    /// Assert that the replay was deterministic, with a detailed error message.
    ///
    /// # Panics
    ///
    /// Panics if the runs produced different hashes or a run panicked.
    pub fn assert_deterministic(&self) {
        assert!(
            self.is_deterministic,
            "Replay is non-deterministic!\n\
             Runs: {}\n\
             Commands: {}\n\
             Unique hashes: {} (expected 1)\n\
             All hashes: {:?}",
            self.hashes.len(),
            self.commands,
            self.unique_hashes().len(),
            self.hashes
        );
    }
}

/// Replay `script` on a fresh engine over `state`.
///
/// The engine is started first, so a state still in `TurnStart` gets its
/// turn-start processing. Rejected commands are kept in the results and
/// do not stop the replay.
#[must_use]
pub fn replay(state: GameState, script: &[Command]) -> (GameState, Vec<CommandResult>) {
    let mut engine = Engine::new(state);
    engine.start();
    let results = script
        .iter()
        .map(|command| engine.execute_command(command))
        .collect();
    (engine.into_state(), results)
}

/// Replay a script `runs` times from `setup` and compare final hashes.
///
/// # Example
///
/// ```
/// use civ_core::command::Command;
/// use civ_test_utils::determinism::verify_script_determinism;
/// use civ_test_utils::fixtures::{skirmish_state, BLUE, RED};
///
/// let script = [
///     Command::EndTurn { player: RED },
///     Command::EndTurn { player: BLUE },
/// ];
/// verify_script_determinism(3, skirmish_state, &script).assert_deterministic();
/// ```
pub fn verify_script_determinism<Setup>(
    runs: usize,
    setup: Setup,
    script: &[Command],
) -> DeterminismResult
where
    Setup: Fn() -> GameState,
{
    let hashes = (0..runs)
        .map(|_| Some(replay(setup(), script).0.state_hash()))
        .collect();
    DeterminismResult::from_hashes(hashes, script.len())
}

/// Replay the same script on `runs` scoped threads.
///
/// Catches non-determinism that only shows up under different thread
/// scheduling or memory layout.
pub fn verify_parallel_determinism<Setup>(
    runs: usize,
    setup: Setup,
    script: &[Command],
) -> DeterminismResult
where
    Setup: Fn() -> GameState + Sync,
{
    let hashes = thread::scope(|s| {
        let handles: Vec<_> = (0..runs)
            .map(|_| s.spawn(|| replay(setup(), script).0.state_hash()))
            .collect();
        handles.into_iter().map(|h| h.join().ok()).collect()
    });
    DeterminismResult::from_hashes(hashes, script.len())
}

/// Replay two engines side by side, command by command.
///
/// Returns `None` if they never diverge, or `Some(n)` where `n` is the
/// number of commands applied when the hashes first differed (0 means the
/// initial states already differ).
pub fn find_first_divergence<Setup>(setup: Setup, script: &[Command]) -> Option<usize>
where
    Setup: Fn() -> GameState,
{
    let mut left = Engine::new(setup());
    let mut right = Engine::new(setup());
    left.start();
    right.start();

    if left.state().state_hash() != right.state().state_hash() {
        return Some(0);
    }
    for (index, command) in script.iter().enumerate() {
        let a = left.execute_command(command);
        let b = right.execute_command(command);
        if a != b || left.state().state_hash() != right.state().state_hash() {
            tracing::warn!(index, kind = %command.kind(), "replays diverged");
            return Some(index + 1);
        }
    }
    None
}

/// Check that a `bincode` round trip preserves the state hash exactly.
#[must_use]
pub fn verify_serialization_roundtrip(state: &GameState) -> bool {
    let Ok(bytes) = state.to_bytes() else {
        return false;
    };
    GameState::from_bytes(&bytes).is_ok_and(|restored| restored.state_hash() == state.state_hash())
}

/// Compute a simple hash for any hashable value.
pub fn compute_hash<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Proptest strategies for core types.
///
/// These strategies generate random but reproducible inputs for
/// property-based testing of pathfinding, combat and the command pipeline.
pub mod strategies {
    use civ_core::combat::{CombatContext, Combatant};
    use civ_core::command::Command;
    use civ_core::hex::HexCoord;
    use civ_core::ids::{CityId, PlayerId, UnitId};
    use civ_core::map::TileMap;
    use civ_core::math::{quarters, Fixed};
    use civ_core::rules::{Buildable, BuildingKind, UnitKind};
    use civ_core::tile::{Terrain, Tile, TileFeature, TileResource};
    use proptest::prelude::*;

    /// Coordinate with `q` and `r` in `0..size`.
    pub fn arb_coord(size: i32) -> impl Strategy<Value = HexCoord> {
        (0..size, 0..size).prop_map(|(q, r)| HexCoord::new(q, r))
    }

    /// Any terrain, weighted towards passable land.
    pub fn arb_terrain() -> impl Strategy<Value = Terrain> {
        prop_oneof![
            4 => Just(Terrain::Grassland),
            3 => Just(Terrain::Plains),
            2 => Just(Terrain::GrasslandHill),
            1 => Just(Terrain::Desert),
            1 => Just(Terrain::Mountain),
            1 => Just(Terrain::Lake),
        ]
    }

    /// Any feature.
    pub fn arb_feature() -> impl Strategy<Value = TileFeature> {
        prop_oneof![
            Just(TileFeature::Forest),
            Just(TileFeature::Jungle),
            Just(TileFeature::Marsh),
            Just(TileFeature::Floodplains),
            Just(TileFeature::Oasis),
            Just(TileFeature::Ice),
        ]
    }

    /// Resources covering food, production and gold bonuses.
    pub fn arb_resource() -> impl Strategy<Value = TileResource> {
        prop_oneof![
            Just(TileResource::Wheat),
            Just(TileResource::Cattle),
            Just(TileResource::Iron),
            Just(TileResource::Gems),
        ]
    }

    /// Square map of side `size` with random terrain. Features are kept
    /// only where they are legal.
    pub fn arb_map(size: i32) -> impl Strategy<Value = TileMap> {
        let cells = usize::try_from(size * size).unwrap_or(0);
        proptest::collection::vec(
            (
                arb_terrain(),
                proptest::option::weighted(0.3, arb_feature()),
                proptest::option::weighted(0.1, arb_resource()),
            ),
            cells,
        )
        .prop_map(move |cells| {
            let mut map = TileMap::new();
            for (index, (terrain, feature, resource)) in (0..).zip(cells) {
                let coord = HexCoord::new(index % size, index / size);
                let mut tile = Tile::new(coord, terrain);
                if let Some(feature) = feature.filter(|f| f.can_place_on(terrain)) {
                    tile = tile.with_feature(feature);
                }
                tile.resource = resource;
                // Every feature left is legal for its terrain.
                let _ = map.insert(tile);
            }
            map
        })
    }

    /// Health in `1..=100` out of 100.
    pub fn arb_health() -> impl Strategy<Value = u32> {
        1u32..=100
    }

    /// One side of a fight; strength 0 is a civilian.
    pub fn arb_combatant() -> impl Strategy<Value = Combatant> {
        (0u32..40, arb_health()).prop_map(|(strength, health)| Combatant {
            strength,
            health,
            max_health: 100,
        })
    }

    /// Defense modifier between 0 and 2 in quarter steps.
    pub fn arb_modifier() -> impl Strategy<Value = Fixed> {
        (0u32..=8).prop_map(quarters)
    }

    /// Full combat input.
    pub fn arb_combat_context() -> impl Strategy<Value = CombatContext> {
        (arb_combatant(), arb_combatant(), arb_modifier()).prop_map(
            |(attacker, defender, defense_modifier)| CombatContext {
                attacker,
                defender,
                defense_modifier,
            },
        )
    }

    /// Any buildable item.
    pub fn arb_buildable() -> impl Strategy<Value = Buildable> {
        prop_oneof![
            prop::sample::select(UnitKind::ALL.to_vec()).prop_map(Buildable::Unit),
            prop_oneof![
                Just(BuildingKind::Monument),
                Just(BuildingKind::Granary),
                Just(BuildingKind::Workshop),
                Just(BuildingKind::Walls),
            ]
            .prop_map(Buildable::Building),
        ]
    }

    /// Any command touching unit ids `1..=max_unit`, city ids
    /// `1..=max_city`, players `1..=2` and coordinates in `0..size`.
    /// Most of them will be rejected; that is the point.
    pub fn arb_command(max_unit: u32, max_city: u32, size: i32) -> impl Strategy<Value = Command> {
        let unit = (1..=max_unit).prop_map(UnitId);
        let city = (1..=max_city).prop_map(CityId);
        let player = (1u32..=2).prop_map(PlayerId);
        prop_oneof![
            3 => (unit.clone(), arb_coord(size)).prop_map(|(unit, to)| Command::MoveUnit { unit, to }),
            2 => (unit.clone(), unit.clone())
                .prop_map(|(attacker, defender)| Command::Attack { attacker, defender }),
            1 => unit.prop_map(|unit| Command::FoundCity { unit, name: None }),
            1 => (city, arb_buildable()).prop_map(|(city, item)| Command::SetProduction { city, item }),
            1 => player.prop_map(|player| Command::EndTurn { player }),
        ]
    }

    /// Script of up to `max_len` commands.
    pub fn arb_script(max_len: usize) -> impl Strategy<Value = Vec<Command>> {
        proptest::collection::vec(arb_command(6, 3, 6), 0..max_len)
    }
}

#[cfg(test)]
mod tests {
    use super::strategies::*;
    use super::*;
    use crate::fixtures::{skirmish_state, BLUE, RED};
    use civ_core::hex::HexCoord;
    use civ_core::ids::UnitId;
    use proptest::prelude::*;

    fn opening() -> Vec<Command> {
        vec![
            Command::Attack {
                attacker: UnitId(1),
                defender: UnitId(2),
            },
            Command::FoundCity {
                unit: UnitId(3),
                name: Some("Red Hold".into()),
            },
            Command::EndTurn { player: RED },
            Command::MoveUnit {
                unit: UnitId(4),
                to: HexCoord::new(4, 2),
            },
            Command::EndTurn { player: BLUE },
        ]
    }

    #[test]
    fn test_replay_is_deterministic() {
        verify_script_determinism(4, skirmish_state, &opening()).assert_deterministic();
    }

    #[test]
    fn test_parallel_replays_match() {
        let result = verify_parallel_determinism(4, skirmish_state, &opening());
        result.assert_deterministic();
        assert_eq!(result.unique_hashes().len(), 1);
    }

    #[test]
    fn test_no_divergence() {
        assert_eq!(find_first_divergence(skirmish_state, &opening()), None);
    }

    #[test]
    fn test_replay_reports_every_result() {
        let (state, results) = replay(skirmish_state(), &opening());
        assert_eq!(results.len(), 5);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(state.clock().turn(), 2);
        assert!(verify_serialization_roundtrip(&state));
    }

    #[test]
    fn test_mismatched_hashes_are_reported() {
        let result = DeterminismResult::from_hashes(vec![Some(1), Some(2), None], 0);
        assert!(!result.is_deterministic);
        assert_eq!(result.unique_hashes(), vec![1, 2]);
        assert_ne!(compute_hash(&1u8), compute_hash(&2u8));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_random_scripts_replay_identically(script in arb_script(24)) {
            prop_assert_eq!(find_first_divergence(skirmish_state, &script), None);
        }

        #[test]
        fn prop_generated_maps_are_valid(map in arb_map(5)) {
            prop_assert_eq!(map.len(), 25);
            prop_assert!(map.iter().all(|t| t.has_valid_feature()));
        }
    }
}
