//! Property tests for pathfinding, combat and command rejection.

use civ_core::prelude::{find_path, reachable_tiles, resolve_combat, Engine, TileLookup};
use civ_test_utils::determinism::strategies::{
    arb_combat_context, arb_command, arb_coord, arb_map,
};
use civ_test_utils::fixtures::skirmish_state;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_path_cost_matches_reachable_set(
        map in arb_map(7),
        start in arb_coord(7),
        end in arb_coord(7),
        budget in 0u32..12,
    ) {
        let reach = reachable_tiles(&map, start, budget);
        let path = find_path(&map, start, end, Some(budget));
        if map.is_passable(end) {
            prop_assert_eq!(path.reachable, reach.contains_key(&end));
            if path.reachable {
                prop_assert_eq!(path.total_cost, reach.get(&end).copied());
            }
        } else {
            prop_assert!(!path.reachable);
        }
    }

    #[test]
    fn prop_paths_are_connected_and_priced(
        map in arb_map(7),
        start in arb_coord(7),
        end in arb_coord(7),
    ) {
        let result = find_path(&map, start, end, None);
        if result.reachable {
            prop_assert_eq!(result.path.first(), Some(&start));
            prop_assert_eq!(result.path.last(), Some(&end));
            let mut cost = 0;
            for step in result.path.windows(2) {
                prop_assert_eq!(step[0].distance_to(step[1]), 1);
                let step_cost = map.movement_cost(step[1]);
                prop_assert!(step_cost.is_some());
                cost += step_cost.unwrap_or(0);
            }
            prop_assert_eq!(result.total_cost, Some(cost));
        } else {
            prop_assert!(result.path.is_empty());
            prop_assert_eq!(result.total_cost, None);
        }
    }

    #[test]
    fn prop_reachable_costs_within_budget(
        map in arb_map(7),
        start in arb_coord(7),
        budget in 0u32..10,
    ) {
        let reach = reachable_tiles(&map, start, budget);
        prop_assert_eq!(reach.get(&start), Some(&0));
        for (coord, cost) in &reach {
            prop_assert!(*cost <= budget);
            if *coord != start {
                prop_assert!(map.is_passable(*coord));
            }
        }
    }

    #[test]
    fn prop_combat_damage_is_bounded(ctx in arb_combat_context()) {
        let outcome = resolve_combat(&ctx);
        prop_assert!(outcome.damage_to_attacker <= ctx.attacker.health);
        prop_assert!(outcome.damage_to_defender <= ctx.defender.health);
        prop_assert_eq!(outcome.attacker_survives, ctx.attacker.health > outcome.damage_to_attacker);
        prop_assert_eq!(outcome.defender_survives, ctx.defender.health > outcome.damage_to_defender);
        prop_assert_eq!(resolve_combat(&ctx), outcome);
    }

    #[test]
    fn prop_rejected_commands_change_nothing(command in arb_command(6, 3, 6)) {
        let mut engine = Engine::new(skirmish_state());
        let before = engine.state().to_bytes().unwrap();
        let verdict = engine.validate(&command);
        let result = engine.execute_command(&command);
        prop_assert_eq!(verdict.valid, result.success);
        if !result.success {
            prop_assert!(result.events.is_empty());
            prop_assert_eq!(engine.state().to_bytes().unwrap(), before);
        }
    }
}
