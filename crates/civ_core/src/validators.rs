//! Read-only validators, one per command kind.
//!
//! Each validator takes `&GameState`, so it cannot mutate; the engine only
//! runs an executor after its validator accepted the command.

use crate::city::City;
use crate::clock::TurnPhase;
use crate::command::{Command, CommandKind, Rejection, ValidationResult};
use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId, UnitId};
use crate::map::TileLookup;
use crate::pathfinding::find_path;
use crate::rules::Buildable;
use crate::state::GameState;
use crate::unit::Unit;

fn mismatch(expected: CommandKind, command: &Command) -> ValidationResult {
    ValidationResult::reject(&Rejection::KindMismatch {
        expected,
        actual: command.kind(),
    })
}

fn require_phase(state: &GameState, kind: CommandKind) -> Result<(), Rejection> {
    let phase = state.clock().phase();
    if phase == TurnPhase::PlayerAction {
        Ok(())
    } else {
        Err(Rejection::WrongPhase { kind, phase })
    }
}

/// Unit that exists and belongs to the player whose turn it is.
fn own_unit(state: &GameState, id: UnitId) -> Result<&Unit, Rejection> {
    let unit = state.unit(id).ok_or(Rejection::UnitNotFound(id))?;
    if unit.owner != state.clock().current_player() {
        return Err(Rejection::UnitNotOwned {
            unit: id,
            owner: unit.owner,
        });
    }
    Ok(unit)
}

fn own_city(state: &GameState, id: CityId) -> Result<&City, Rejection> {
    let city = state.city(id).ok_or(Rejection::CityNotFound(id))?;
    if city.owner != state.clock().current_player() {
        return Err(Rejection::CityNotOwned {
            city: id,
            owner: city.owner,
        });
    }
    Ok(city)
}

/// Move: unit exists and is ours, has movement, and the target is a
/// different tile, free of foreign units, not a foreign city centre and
/// reachable within the unit's remaining movement.
pub fn validate_move_unit(state: &GameState, command: &Command) -> ValidationResult {
    let Command::MoveUnit { unit, to } = command else {
        return mismatch(CommandKind::MoveUnit, command);
    };
    check_move(state, *unit, *to).into()
}

fn check_move(state: &GameState, id: UnitId, to: HexCoord) -> Result<(), Rejection> {
    let unit = own_unit(state, id)?;
    if !unit.can_act() {
        return Err(Rejection::NoMovementLeft(id));
    }
    if unit.position == to {
        return Err(Rejection::AlreadyThere { unit: id, at: to });
    }
    if state.units_at(to).any(|other| other.owner != unit.owner) {
        return Err(Rejection::TileOccupied(to));
    }
    if state.city_at(to).is_some_and(|city| city.owner != unit.owner) {
        return Err(Rejection::ForeignCity(to));
    }
    if !find_path(state.map(), unit.position, to, Some(unit.movement)).reachable {
        return Err(Rejection::Unreachable {
            unit: id,
            to,
            movement: unit.movement,
        });
    }
    Ok(())
}

/// Attack: player-action phase; the attacker is ours, has movement and
/// strength; the defender exists, is adjacent and is not ours.
pub fn validate_attack(state: &GameState, command: &Command) -> ValidationResult {
    let Command::Attack { attacker, defender } = command else {
        return mismatch(CommandKind::Attack, command);
    };
    check_attack(state, *attacker, *defender).into()
}

fn check_attack(state: &GameState, attacker_id: UnitId, defender_id: UnitId) -> Result<(), Rejection> {
    require_phase(state, CommandKind::Attack)?;
    let attacker = own_unit(state, attacker_id)?;
    if !attacker.can_act() {
        return Err(Rejection::NoMovementLeft(attacker_id));
    }
    if attacker.is_civilian() {
        return Err(Rejection::NoStrength(attacker_id));
    }
    let defender = state
        .unit(defender_id)
        .ok_or(Rejection::UnitNotFound(defender_id))?;
    if !attacker.position.is_adjacent(defender.position) {
        return Err(Rejection::NotAdjacent {
            attacker: attacker_id,
            defender: defender_id,
        });
    }
    if defender.owner == attacker.owner {
        return Err(Rejection::FriendlyTarget(defender_id));
    }
    Ok(())
}

/// Found city: the unit is ours and can found cities, stands on land, and
/// no city is on that tile yet.
pub fn validate_found_city(state: &GameState, command: &Command) -> ValidationResult {
    let Command::FoundCity { unit, .. } = command else {
        return mismatch(CommandKind::FoundCity, command);
    };
    check_found_city(state, *unit).into()
}

fn check_found_city(state: &GameState, id: UnitId) -> Result<(), Rejection> {
    let unit = own_unit(state, id)?;
    if !unit.founds_city {
        return Err(Rejection::NotAFounder(id));
    }
    let at = unit.position;
    let on_land = state
        .map()
        .tile(at)
        .is_some_and(|t| t.terrain.is_land() && t.is_passable());
    if !on_land {
        return Err(Rejection::NotLand(at));
    }
    if state.city_at(at).is_some() {
        return Err(Rejection::CityExists(at));
    }
    Ok(())
}

/// Set production: player-action phase; the city is ours; the item is
/// buildable under the ruleset and, for buildings, not already built.
pub fn validate_set_production(state: &GameState, command: &Command) -> ValidationResult {
    let Command::SetProduction { city, item } = command else {
        return mismatch(CommandKind::SetProduction, command);
    };
    check_set_production(state, *city, *item).into()
}

fn check_set_production(state: &GameState, id: CityId, item: Buildable) -> Result<(), Rejection> {
    require_phase(state, CommandKind::SetProduction)?;
    let city = own_city(state, id)?;
    if state.ruleset().cost_of(item).is_none() {
        return Err(Rejection::NotBuildable(item));
    }
    if let Buildable::Building(kind) = item {
        if city.has_building(kind) {
            return Err(Rejection::AlreadyBuilt { city: id, item });
        }
    }
    Ok(())
}

/// End turn: only the current player may end the turn. Legal in any phase.
pub fn validate_end_turn(state: &GameState, command: &Command) -> ValidationResult {
    let Command::EndTurn { player } = command else {
        return mismatch(CommandKind::EndTurn, command);
    };
    check_end_turn(state, *player).into()
}

fn check_end_turn(state: &GameState, player: PlayerId) -> Result<(), Rejection> {
    let current = state.clock().current_player();
    if player == current {
        Ok(())
    } else {
        Err(Rejection::NotCurrentPlayer { player, current })
    }
}
