//! Executors, one per command kind: the only code that mutates game state.
//!
//! Executors assume their validator accepted the command and do not check
//! again. They apply every change first and return the resulting events in
//! order; publishing is the engine's job.

use crate::city::{City, ProductionState};
use crate::clock::TurnPhase;
use crate::combat::{resolve_combat, Combatant, CombatContext};
use crate::command::{Command, CommandKind};
use crate::events::{GameEvent, RemovalCause};
use crate::ids::{CityId, UnitId};
use crate::pathfinding::find_path;
use crate::rules::Buildable;
use crate::state::GameState;
use crate::territory::{city_yields, initial_claim, release_tile};
use crate::unit::Unit;

fn mismatch(expected: CommandKind, command: &Command) -> Vec<GameEvent> {
    tracing::error!(
        %expected,
        actual = %command.kind(),
        "executor received a command of another kind"
    );
    Vec::new()
}

/// Walk the unit along the cheapest path and spend its cost.
pub fn execute_move_unit(state: &mut GameState, command: &Command) -> Vec<GameEvent> {
    let Command::MoveUnit { unit: id, to } = command else {
        return mismatch(CommandKind::MoveUnit, command);
    };
    let Some(unit) = state.units.get(*id) else {
        return Vec::new();
    };
    let from = unit.position;
    let route = find_path(&state.map, from, *to, Some(unit.movement));
    let cost = route.total_cost.unwrap_or(0);

    let Some(unit) = state.units.get_mut(*id) else {
        return Vec::new();
    };
    unit.position = *to;
    unit.movement = unit.movement.saturating_sub(cost);

    vec![GameEvent::UnitMoved {
        unit: *id,
        from,
        to: *to,
        path: route.path,
        cost,
        movement_left: unit.movement,
    }]
}

/// Resolve the fight, apply damage, remove the dead and advance a
/// victorious attacker into an emptied tile.
///
/// Attacking spends all of the attacker's movement. Advancing is part of
/// the attack and emits a zero-cost `UnitMoved`.
pub fn execute_attack(state: &mut GameState, command: &Command) -> Vec<GameEvent> {
    let Command::Attack { attacker, defender } = command else {
        return mismatch(CommandKind::Attack, command);
    };
    let (Some(att), Some(def)) = (state.units.get(*attacker), state.units.get(*defender)) else {
        return Vec::new();
    };
    let ctx = CombatContext {
        attacker: Combatant::from(att),
        defender: Combatant::from(def),
        defense_modifier: state.defense_modifier_at(def.position),
    };
    let target_tile = def.position;
    let outcome = resolve_combat(&ctx);

    let mut events = Vec::new();
    let attacker_health = apply_damage(state, *attacker, outcome.damage_to_attacker, true);
    let defender_health = apply_damage(state, *defender, outcome.damage_to_defender, false);
    events.push(GameEvent::CombatResolved {
        attacker: *attacker,
        defender: *defender,
        damage_to_attacker: outcome.damage_to_attacker,
        damage_to_defender: outcome.damage_to_defender,
        attacker_health,
        defender_health,
    });
    tracing::debug!(
        %attacker,
        %defender,
        to_attacker = outcome.damage_to_attacker,
        to_defender = outcome.damage_to_defender,
        "combat resolved"
    );

    if !outcome.defender_survives {
        events.extend(remove_unit(state, *defender, RemovalCause::Combat));
    }
    if !outcome.attacker_survives {
        events.extend(remove_unit(state, *attacker, RemovalCause::Combat));
    }

    let tile_clear =
        state.units_at(target_tile).next().is_none() && state.city_at(target_tile).is_none();
    if outcome.attacker_survives && !outcome.defender_survives && tile_clear {
        if let Some(unit) = state.units.get_mut(*attacker) {
            let from = unit.position;
            unit.position = target_tile;
            events.push(GameEvent::UnitMoved {
                unit: *attacker,
                from,
                to: target_tile,
                path: vec![from, target_tile],
                cost: 0,
                movement_left: unit.movement,
            });
        }
    }
    events
}

/// Subtract health and return what is left. The attacker also loses its
/// remaining movement.
fn apply_damage(state: &mut GameState, id: UnitId, damage: u32, is_attacker: bool) -> u32 {
    let Some(unit) = state.units.get_mut(id) else {
        return 0;
    };
    unit.take_damage(damage);
    if is_attacker {
        unit.movement = 0;
    }
    unit.health
}

fn remove_unit(state: &mut GameState, id: UnitId, cause: RemovalCause) -> Option<GameEvent> {
    let unit = state.units.remove(id)?;
    Some(GameEvent::UnitDestroyed {
        unit: id,
        owner: unit.owner,
        at: unit.position,
        cause,
    })
}

/// Consume the founder and create a population-1 city on its tile. The
/// centre tile is taken from any city that already owned it.
pub fn execute_found_city(state: &mut GameState, command: &Command) -> Vec<GameEvent> {
    let Command::FoundCity { unit, name } = command else {
        return mismatch(CommandKind::FoundCity, command);
    };
    let mut events = Vec::new();
    let Some(destroyed) = remove_unit(state, *unit, RemovalCause::FoundedCity) else {
        return events;
    };
    let GameEvent::UnitDestroyed { owner, at, .. } = destroyed else {
        return events;
    };
    events.push(destroyed);

    release_tile(&mut state.cities, at);
    let territory = initial_claim(
        &state.map,
        &state.cities,
        at,
        state.ruleset.initial_territory_radius,
    );
    let city_id = state.cities.insert(|id| {
        let name = name.clone().unwrap_or_else(|| format!("City {}", id.0));
        City::new(id, owner, name, at, territory)
    });
    let name = state
        .cities
        .get(city_id)
        .map(|c| c.name.clone())
        .unwrap_or_default();
    tracing::info!(city = %city_id, %owner, %at, name = %name, "city founded");

    events.push(GameEvent::CityFounded {
        city: city_id,
        owner,
        name,
        at,
    });
    events
}

/// Switch production. Accumulated progress is kept.
pub fn execute_set_production(state: &mut GameState, command: &Command) -> Vec<GameEvent> {
    let Command::SetProduction { city, item } = command else {
        return mismatch(CommandKind::SetProduction, command);
    };
    let cost = state.ruleset.cost_of(*item).unwrap_or(0);
    let Some(target) = state.cities.get_mut(*city) else {
        return Vec::new();
    };
    target.production.item = Some(*item);
    target.production.cost = cost;
    vec![GameEvent::ProductionSet {
        city: *city,
        item: *item,
    }]
}

/// Run end-of-turn processing for the current player's cities, hand the
/// turn to the next player and start it.
pub fn execute_end_turn(state: &mut GameState, command: &Command) -> Vec<GameEvent> {
    let Command::EndTurn { player } = command else {
        return mismatch(CommandKind::EndTurn, command);
    };
    state.clock.set_phase(TurnPhase::TurnEnd);
    let turn = state.clock.turn();

    let mut events = Vec::new();
    let cities: Vec<CityId> = state.cities_of(*player).map(|c| c.id).collect();
    for city in cities {
        process_city(state, city, &mut events);
    }
    events.push(GameEvent::TurnEnded {
        turn,
        player: *player,
    });

    if state.clock.next_player() {
        tracing::debug!(turn = state.clock.turn(), "turn order wrapped");
    }
    events.extend(begin_turn(state));
    events
}

/// Turn-start processing: refresh the current player's units and open the
/// action phase.
pub(crate) fn begin_turn(state: &mut GameState) -> Vec<GameEvent> {
    let player = state.clock.current_player();
    for unit in state.units.values_mut().filter(|u| u.owner == player) {
        unit.refresh();
    }
    state.clock.set_phase(TurnPhase::PlayerAction);
    let turn = state.clock.turn();
    tracing::info!(turn, %player, "turn started");
    vec![GameEvent::TurnStarted { turn, player }]
}

/// Growth then production for one city.
fn process_city(state: &mut GameState, id: CityId, events: &mut Vec<GameEvent>) {
    let Some(city) = state.cities.get(id) else {
        return;
    };
    let yields = city_yields(&state.map, city, &state.ruleset);
    let growth = state.ruleset.growth.clone();

    let Some(city) = state.cities.get_mut(id) else {
        return;
    };

    let upkeep = city.population.saturating_mul(growth.food_per_citizen);
    let stock = i64::from(city.food_stock) + i64::from(yields.food) - i64::from(upkeep);
    city.food_stock = u32::try_from(stock.max(0)).unwrap_or(u32::MAX);
    let threshold = growth.threshold(city.population);
    if city.food_stock >= threshold {
        city.population += 1;
        city.food_stock -= threshold;
        events.push(GameEvent::PopulationGrew {
            city: id,
            population: city.population,
        });
    }

    city.production.progress = city
        .production
        .progress
        .saturating_add(yields.production.max(1));
    if !city.production.is_complete() {
        return;
    }
    let Some(item) = city.production.item else {
        return;
    };
    let (owner, at) = (city.owner, city.position);
    if matches!(item, Buildable::Unit(_))
        && state
            .units
            .values()
            .any(|u| u.position == at && u.owner != owner)
    {
        // Progress is kept; the unit appears once the centre is clear.
        tracing::debug!(city = %id, %item, %at, "spawn deferred, foreign unit on city tile");
        return;
    }
    let leftover = city.production.progress - city.production.cost;
    city.production = ProductionState {
        item: None,
        progress: leftover,
        cost: 0,
    };
    events.push(GameEvent::ProductionCompleted { city: id, item });

    match item {
        Buildable::Building(kind) => {
            city.buildings.insert(kind);
        }
        Buildable::Unit(kind) => {
            let Some(stats) = state.ruleset.unit_stats(kind).cloned() else {
                tracing::warn!(%kind, city = %id, "ruleset has no stats for produced unit");
                return;
            };
            let unit = state
                .units
                .insert(|uid| Unit::new(uid, owner, kind, at, &stats));
            events.push(GameEvent::UnitSpawned {
                unit,
                owner,
                unit_kind: kind,
                at,
                city: Some(id),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hex::HexCoord;
    use crate::ids::PlayerId;
    use crate::map::TileMap;
    use crate::rules::{BuildingKind, UnitKind};
    use crate::state::{CitySeed, GameStateBuilder};
    use crate::territory::TerritoryLookup;
    use crate::tile::{Terrain, Tile, TileFeature};

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn base() -> GameStateBuilder {
        GameStateBuilder::new(TileMap::rectangle(6, 4, Terrain::Grassland))
            .players([P1, P2])
            .clock(1, TurnPhase::PlayerAction, P1)
    }

    #[test]
    fn test_move_spends_path_cost() {
        let map = TileMap::strip(4, Terrain::Grassland)
            .with_tile(Tile::new(HexCoord::new(1, 0), Terrain::Plains).with_feature(TileFeature::Forest))
            .unwrap();
        let mut state = GameStateBuilder::new(map)
            .players([P1])
            .unit(P1, UnitKind::Horseman, HexCoord::new(0, 0))
            .build()
            .unwrap();
        let events = execute_move_unit(
            &mut state,
            &Command::MoveUnit {
                unit: UnitId(1),
                to: HexCoord::new(2, 0),
            },
        );
        let unit = state.unit(UnitId(1)).unwrap();
        assert_eq!(unit.position, HexCoord::new(2, 0));
        assert_eq!(unit.movement, 1);
        assert_eq!(
            events,
            vec![GameEvent::UnitMoved {
                unit: UnitId(1),
                from: HexCoord::new(0, 0),
                to: HexCoord::new(2, 0),
                path: vec![HexCoord::new(0, 0), HexCoord::new(1, 0), HexCoord::new(2, 0)],
                cost: 3,
                movement_left: 1,
            }]
        );
    }

    #[test]
    fn test_attack_between_equal_warriors() {
        let mut state = base()
            .unit(P1, UnitKind::Warrior, HexCoord::new(1, 1))
            .unit(P2, UnitKind::Warrior, HexCoord::new(2, 1))
            .build()
            .unwrap();
        let events = execute_attack(
            &mut state,
            &Command::Attack {
                attacker: UnitId(1),
                defender: UnitId(2),
            },
        );
        assert_eq!(events.len(), 1);
        assert_eq!(state.unit(UnitId(1)).unwrap().health, 85);
        assert_eq!(state.unit(UnitId(1)).unwrap().movement, 0);
        assert_eq!(state.unit(UnitId(2)).unwrap().health, 70);
        assert!(matches!(
            events[0],
            GameEvent::CombatResolved {
                damage_to_attacker: 15,
                damage_to_defender: 30,
                ..
            }
        ));
    }

    #[test]
    fn test_attack_kills_civilian_and_advances() {
        let mut state = base()
            .unit(P1, UnitKind::Warrior, HexCoord::new(1, 1))
            .unit(P2, UnitKind::Settler, HexCoord::new(2, 1))
            .build()
            .unwrap();
        let events = execute_attack(
            &mut state,
            &Command::Attack {
                attacker: UnitId(1),
                defender: UnitId(2),
            },
        );
        assert!(state.unit(UnitId(2)).is_none());
        assert_eq!(state.unit(UnitId(1)).unwrap().position, HexCoord::new(2, 1));
        assert_eq!(state.unit(UnitId(1)).unwrap().health, 100);
        let kinds: Vec<_> = events.iter().map(GameEvent::kind).collect();
        assert_eq!(
            kinds,
            vec![
                crate::events::EventKind::CombatResolved,
                crate::events::EventKind::UnitDestroyed,
                crate::events::EventKind::UnitMoved
            ]
        );
    }

    #[test]
    fn test_attacker_killed_by_counter_does_not_advance() {
        let mut state = base()
            .unit(P1, UnitKind::Warrior, HexCoord::new(1, 1))
            .unit(P2, UnitKind::Horseman, HexCoord::new(2, 1))
            .build()
            .unwrap();
        state.units.get_mut(UnitId(1)).unwrap().health = 10;
        let events = execute_attack(
            &mut state,
            &Command::Attack {
                attacker: UnitId(1),
                defender: UnitId(2),
            },
        );
        assert!(state.unit(UnitId(1)).is_none());
        assert_eq!(state.unit(UnitId(2)).unwrap().health, 98);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            events[0],
            GameEvent::CombatResolved {
                damage_to_attacker: 10,
                attacker_health: 0,
                ..
            }
        ));
        assert_eq!(
            events[1],
            GameEvent::UnitDestroyed {
                unit: UnitId(1),
                owner: P1,
                at: HexCoord::new(1, 1),
                cause: RemovalCause::Combat,
            }
        );
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::UnitMoved { .. })));
    }

    #[test]
    fn test_mutual_kill_removes_defender_first() {
        let mut state = base()
            .unit(P1, UnitKind::Warrior, HexCoord::new(1, 1))
            .unit(P2, UnitKind::Warrior, HexCoord::new(2, 1))
            .build()
            .unwrap();
        state.units.get_mut(UnitId(1)).unwrap().health = 3;
        state.units.get_mut(UnitId(2)).unwrap().health = 3;
        let events = execute_attack(
            &mut state,
            &Command::Attack {
                attacker: UnitId(1),
                defender: UnitId(2),
            },
        );
        assert!(state.units().is_empty());
        assert_eq!(
            events,
            vec![
                GameEvent::CombatResolved {
                    attacker: UnitId(1),
                    defender: UnitId(2),
                    damage_to_attacker: 3,
                    damage_to_defender: 3,
                    attacker_health: 0,
                    defender_health: 0,
                },
                GameEvent::UnitDestroyed {
                    unit: UnitId(2),
                    owner: P2,
                    at: HexCoord::new(2, 1),
                    cause: RemovalCause::Combat,
                },
                GameEvent::UnitDestroyed {
                    unit: UnitId(1),
                    owner: P1,
                    at: HexCoord::new(1, 1),
                    cause: RemovalCause::Combat,
                },
            ]
        );
    }

    #[test]
    fn test_hills_and_walls_protect_defender() {
        let map = TileMap::rectangle(6, 4, Terrain::Grassland)
            .with_tile(Tile::new(HexCoord::new(2, 1), Terrain::GrasslandHill))
            .unwrap();
        let mut state = GameStateBuilder::new(map)
            .players([P1, P2])
            .clock(1, TurnPhase::PlayerAction, P1)
            .city_seed(CitySeed {
                owner: P2,
                name: None,
                position: HexCoord::new(2, 1),
                population: 1,
                buildings: vec![BuildingKind::Walls],
                production: None,
            })
            .unit(P1, UnitKind::Warrior, HexCoord::new(1, 1))
            .unit(P2, UnitKind::Warrior, HexCoord::new(2, 1))
            .build()
            .unwrap();
        execute_attack(
            &mut state,
            &Command::Attack {
                attacker: UnitId(1),
                defender: UnitId(2),
            },
        );
        // modifier 0.75: ratio = 8 / 14 = 0.571..., 30 * ratio = 17.14
        assert_eq!(state.unit(UnitId(2)).unwrap().health, 83);
        // 30 / ratio * 0.5 = 26.25
        assert_eq!(state.unit(UnitId(1)).unwrap().health, 74);
    }

    #[test]
    fn test_found_city_consumes_settler() {
        let mut state = base()
            .unit(P1, UnitKind::Settler, HexCoord::new(0, 0))
            .build()
            .unwrap();
        let events = execute_found_city(
            &mut state,
            &Command::FoundCity {
                unit: UnitId(1),
                name: None,
            },
        );
        assert!(state.units().is_empty());
        let city = state.city(CityId(1)).unwrap();
        assert_eq!(city.name, "City 1");
        assert_eq!(city.owner, P1);
        assert_eq!(city.population, 1);
        // corner of the map: centre, (1, 0) and (0, 1)
        assert_eq!(city.territory.len(), 3);
        assert!(matches!(
            events[0],
            GameEvent::UnitDestroyed {
                cause: RemovalCause::FoundedCity,
                ..
            }
        ));
        assert!(matches!(events[1], GameEvent::CityFounded { city: CityId(1), .. }));
    }

    #[test]
    fn test_found_city_inside_foreign_territory_owns_its_centre() {
        let mut state = base()
            .city(P2, "Old", HexCoord::new(2, 2))
            .unit(P1, UnitKind::Settler, HexCoord::new(3, 2))
            .build()
            .unwrap();
        let centre = HexCoord::new(3, 2);
        assert_eq!(state.owner_of_tile(centre), Some(CityId(1)));

        execute_found_city(
            &mut state,
            &Command::FoundCity {
                unit: UnitId(1),
                name: Some("New".into()),
            },
        );
        let new_city = state.city(CityId(2)).unwrap();
        assert!(new_city.territory.contains(&centre));
        assert!(!new_city.territory.contains(&HexCoord::new(2, 2)));
        assert!(!state.city(CityId(1)).unwrap().territory.contains(&centre));
        assert_eq!(state.owner_of_tile(centre), Some(CityId(2)));
    }

    #[test]
    fn test_set_production_keeps_progress() {
        let mut state = base().city(P1, "Alpha", HexCoord::new(2, 2)).build().unwrap();
        state.cities.get_mut(CityId(1)).unwrap().production.progress = 7;
        let events = execute_set_production(
            &mut state,
            &Command::SetProduction {
                city: CityId(1),
                item: Buildable::Building(BuildingKind::Granary),
            },
        );
        let production = &state.city(CityId(1)).unwrap().production;
        assert_eq!(production.item, Some(Buildable::Building(BuildingKind::Granary)));
        assert_eq!(production.cost, 40);
        assert_eq!(production.progress, 7);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_end_turn_completes_production_and_spawns() {
        let mut state = base()
            .city_seed(CitySeed {
                owner: P1,
                name: Some("Alpha".into()),
                position: HexCoord::new(2, 2),
                population: 1,
                buildings: Vec::new(),
                production: Some(Buildable::Unit(UnitKind::Warrior)),
            })
            .build()
            .unwrap();
        state.cities.get_mut(CityId(1)).unwrap().production.progress = 19;

        let events = execute_end_turn(&mut state, &Command::EndTurn { player: P1 });

        let city = state.city(CityId(1)).unwrap();
        // centre 2/1 plus one grassland 2/0: production 1, 19 + 1 = 20
        assert_eq!(city.production, ProductionState::default());
        assert_eq!(city.food_stock, 2);
        let spawned = state.units_at(HexCoord::new(2, 2)).next().unwrap();
        assert_eq!(spawned.kind, UnitKind::Warrior);
        assert_eq!(spawned.owner, P1);

        let kinds: Vec<_> = events.iter().map(GameEvent::kind).collect();
        use crate::events::EventKind as K;
        assert_eq!(
            kinds,
            vec![
                K::ProductionCompleted,
                K::UnitSpawned,
                K::TurnEnded,
                K::TurnStarted
            ]
        );
        assert_eq!(state.clock().current_player(), P2);
        assert_eq!(state.clock().phase(), TurnPhase::PlayerAction);
    }

    #[test]
    fn test_spawn_waits_while_foreign_unit_holds_city_tile() {
        let centre = HexCoord::new(2, 2);
        let mut state = GameStateBuilder::new(TileMap::rectangle(6, 4, Terrain::Grassland))
            .players([P1, P2])
            .clock(1, TurnPhase::PlayerAction, P2)
            .city_seed(CitySeed {
                owner: P2,
                name: Some("Beta".into()),
                position: centre,
                population: 1,
                buildings: Vec::new(),
                production: Some(Buildable::Unit(UnitKind::Warrior)),
            })
            .unit(P1, UnitKind::Warrior, centre)
            .build()
            .unwrap();
        state.cities.get_mut(CityId(1)).unwrap().production.progress = 19;

        let events = execute_end_turn(&mut state, &Command::EndTurn { player: P2 });
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::UnitSpawned { .. } | GameEvent::ProductionCompleted { .. }
        )));
        let production = &state.city(CityId(1)).unwrap().production;
        assert_eq!(production.item, Some(Buildable::Unit(UnitKind::Warrior)));
        assert_eq!(production.progress, 20);
        assert!(state.units_at(centre).all(|u| u.owner == P1));

        state.units.remove(UnitId(1));
        execute_end_turn(&mut state, &Command::EndTurn { player: P1 });
        let events = execute_end_turn(&mut state, &Command::EndTurn { player: P2 });
        assert!(events.contains(&GameEvent::ProductionCompleted {
            city: CityId(1),
            item: Buildable::Unit(UnitKind::Warrior),
        }));
        let spawned: Vec<_> = state.units_at(centre).collect();
        assert_eq!(spawned.len(), 1);
        assert_eq!(spawned[0].owner, P2);
        assert_eq!(state.city(CityId(1)).unwrap().production.progress, 1);
    }

    #[test]
    fn test_growth_and_overflow() {
        let mut state = base().city(P1, "Alpha", HexCoord::new(2, 2)).build().unwrap();
        {
            let city = state.cities.get_mut(CityId(1)).unwrap();
            city.food_stock = 20;
            city.production = ProductionState {
                item: Some(Buildable::Building(BuildingKind::Monument)),
                progress: 45,
                cost: 40,
            };
        }
        let events = execute_end_turn(&mut state, &Command::EndTurn { player: P1 });
        let city = state.city(CityId(1)).unwrap();
        // 20 + 4 food - 2 upkeep = 22 >= 21
        assert_eq!(city.population, 2);
        assert_eq!(city.food_stock, 1);
        assert!(city.has_building(BuildingKind::Monument));
        assert_eq!(city.production.progress, 6);
        assert!(city.production.item.is_none());
        assert!(events.contains(&GameEvent::PopulationGrew {
            city: CityId(1),
            population: 2
        }));
    }

    #[test]
    fn test_turn_wraps_and_refreshes_movement() {
        let mut state = base()
            .unit(P1, UnitKind::Warrior, HexCoord::new(0, 0))
            .unit(P2, UnitKind::Warrior, HexCoord::new(5, 3))
            .build()
            .unwrap();
        state.units.get_mut(UnitId(1)).unwrap().movement = 0;
        state.units.get_mut(UnitId(2)).unwrap().movement = 0;

        execute_end_turn(&mut state, &Command::EndTurn { player: P1 });
        assert_eq!(state.unit(UnitId(2)).unwrap().movement, 2);
        assert_eq!(state.unit(UnitId(1)).unwrap().movement, 0);
        assert_eq!(state.clock().turn(), 1);

        let events = execute_end_turn(&mut state, &Command::EndTurn { player: P2 });
        assert_eq!(state.clock().turn(), 2);
        assert_eq!(state.unit(UnitId(1)).unwrap().movement, 2);
        assert_eq!(
            events.last(),
            Some(&GameEvent::TurnStarted {
                turn: 2,
                player: P1
            })
        );
    }
}
