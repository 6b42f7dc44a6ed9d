//! The engine: owns the state, routes commands and publishes events.
//!
//! # Command pipeline
//!
//! 1. Look up the handler for the command's kind. No handler: rejected.
//! 2. Run the validator against `&GameState`. Invalid: rejected, nothing
//!    changed.
//! 3. Run the executor, which mutates the state and returns events.
//! 4. Publish the events in order, then return them in the result.
//!
//! Subscribers therefore only ever observe committed state.
//!
//! # Example
//!
//! ```
//! use civ_core::prelude::*;
//!
//! let state = GameStateBuilder::new(TileMap::strip(4, Terrain::Grassland))
//!     .players([PlayerId(1)])
//!     .unit(PlayerId(1), UnitKind::Warrior, HexCoord::new(0, 0))
//!     .build()?;
//! let mut engine = Engine::new(state);
//! engine.start();
//!
//! let result = engine.execute_command(&Command::MoveUnit {
//!     unit: UnitId(1),
//!     to: HexCoord::new(2, 0),
//! });
//! assert!(result.success);
//! assert_eq!(engine.unit(UnitId(1)).map(|u| u.movement), Some(0));
//! # Ok::<(), civ_core::error::GameError>(())
//! ```

use std::collections::BTreeMap;

use crate::city::City;
use crate::clock::TurnPhase;
use crate::combat::{resolve_combat, CombatContext, CombatOutcome, Combatant};
use crate::command::{Command, CommandResult, Rejection, ValidationResult};
use crate::event_bus::{EventBus, EventFilter, SubscriptionId};
use crate::events::GameEvent;
use crate::executors::begin_turn;
use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId, UnitId};
use crate::pathfinding::reachable_tiles;
use crate::registry::CommandRegistry;
use crate::snapshot::{GameSnapshot, TileInfo};
use crate::state::GameState;
use crate::unit::Unit;

/// Single-threaded game engine. Callers serialize access.
#[derive(Debug)]
pub struct Engine {
    state: GameState,
    registry: CommandRegistry,
    bus: EventBus,
}

impl Engine {
    /// Engine with the standard command handlers.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        Self::with_registry(state, CommandRegistry::standard())
    }

    /// Engine with a custom handler table.
    #[must_use]
    pub fn with_registry(state: GameState, registry: CommandRegistry) -> Self {
        Self {
            state,
            registry,
            bus: EventBus::new(),
        }
    }

    /// Run turn-start processing for the current player if the clock is
    /// still in `TurnStart`. Publishes and returns the events.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.state.clock.phase() != TurnPhase::TurnStart {
            return Vec::new();
        }
        let events = begin_turn(&mut self.state);
        self.publish(&events);
        events
    }

    /// Validate and apply `command`.
    ///
    /// A rejected command leaves the state bit-identical and publishes
    /// nothing.
    pub fn execute_command(&mut self, command: &Command) -> CommandResult {
        let kind = command.kind();
        let Some(handler) = self.registry.get(kind).copied() else {
            let reason = Rejection::UnknownCommandKind(kind).to_string();
            tracing::warn!(%kind, %reason, "command rejected");
            return CommandResult::rejected(reason);
        };

        let verdict = (handler.validate)(&self.state, command);
        if !verdict.valid {
            let reason = verdict
                .reason
                .unwrap_or_else(|| format!("{kind} was rejected"));
            tracing::warn!(%kind, %reason, "command rejected");
            return CommandResult::rejected(reason);
        }

        let events = (handler.execute)(&mut self.state, command);
        tracing::debug!(%kind, events = events.len(), "command applied");
        self.publish(&events);
        CommandResult::accepted(events)
    }

    /// Dry run: what the validator says, without executing.
    #[must_use]
    pub fn validate(&self, command: &Command) -> ValidationResult {
        let kind = command.kind();
        match self.registry.get(kind) {
            Some(handler) => (handler.validate)(&self.state, command),
            None => ValidationResult::reject(&Rejection::UnknownCommandKind(kind)),
        }
    }

    fn publish(&mut self, events: &[GameEvent]) {
        for event in events {
            tracing::debug!(event = %event.kind(), "publishing");
            self.bus.publish(event);
        }
    }

    /// Receive events passing `filter`.
    pub fn subscribe(
        &mut self,
        filter: impl Into<EventFilter>,
        handler: impl FnMut(&GameEvent) + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(filter, handler)
    }

    /// Stop a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    /// The state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Give the state back, dropping subscriptions.
    #[must_use]
    pub fn into_state(self) -> GameState {
        self.state
    }

    /// The handler table.
    #[must_use]
    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Serializable view of units, cities and the clock.
    #[must_use]
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot::capture(&self.state)
    }

    /// Unit by id.
    #[must_use]
    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.state.unit(id)
    }

    /// City by id.
    #[must_use]
    pub fn city(&self, id: CityId) -> Option<&City> {
        self.state.city(id)
    }

    /// Units of `player`, by id.
    pub fn units_of(&self, player: PlayerId) -> impl Iterator<Item = &Unit> {
        self.state.units_of(player)
    }

    /// Describe a tile; `None` off the map.
    #[must_use]
    pub fn tile_info(&self, coord: HexCoord) -> Option<TileInfo> {
        TileInfo::describe(&self.state, coord)
    }

    /// Tiles the unit could reach with its remaining movement, with costs.
    #[must_use]
    pub fn preview_moves(&self, unit: UnitId) -> Option<BTreeMap<HexCoord, u32>> {
        let unit = self.state.unit(unit)?;
        Some(reachable_tiles(self.state.map(), unit.position, unit.movement))
    }

    /// Outcome `attacker` attacking `defender` would have right now.
    ///
    /// Only needs both units to exist; adjacency and phase are not checked.
    #[must_use]
    pub fn preview_combat(&self, attacker: UnitId, defender: UnitId) -> Option<CombatOutcome> {
        let att = self.state.unit(attacker)?;
        let def = self.state.unit(defender)?;
        Some(resolve_combat(&CombatContext {
            attacker: Combatant::from(att),
            defender: Combatant::from(def),
            defense_modifier: self.state.defense_modifier_at(def.position),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandKind;
    use crate::events::EventKind;
    use crate::map::TileMap;
    use crate::rules::UnitKind;
    use crate::state::GameStateBuilder;
    use crate::tile::Terrain;
    use std::cell::RefCell;
    use std::rc::Rc;

    const P1: PlayerId = PlayerId(1);
    const P2: PlayerId = PlayerId(2);

    fn engine() -> Engine {
        let state = GameStateBuilder::new(TileMap::rectangle(5, 5, Terrain::Grassland))
            .players([P1, P2])
            .unit(P1, UnitKind::Warrior, HexCoord::new(1, 1))
            .unit(P2, UnitKind::Warrior, HexCoord::new(2, 1))
            .unit(P1, UnitKind::Settler, HexCoord::new(3, 3))
            .build()
            .unwrap();
        let mut engine = Engine::new(state);
        engine.start();
        engine
    }

    fn attack() -> Command {
        Command::Attack {
            attacker: UnitId(1),
            defender: UnitId(2),
        }
    }

    #[test]
    fn test_start_runs_once() {
        let mut engine = engine();
        assert_eq!(engine.state().clock().phase(), TurnPhase::PlayerAction);
        assert!(engine.start().is_empty());
    }

    #[test]
    fn test_published_events_match_result() {
        let mut engine = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        engine.subscribe(EventFilter::All, move |e| sink.borrow_mut().push(e.clone()));

        let result = engine.execute_command(&attack());
        assert!(result.success);
        assert_eq!(*seen.borrow(), result.events);
        assert_eq!(result.events[0].kind(), EventKind::CombatResolved);
    }

    #[test]
    fn test_rejection_leaves_state_untouched() {
        let mut engine = engine();
        let before = engine.state().to_bytes().unwrap();
        let seen = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&seen);
        engine.subscribe(EventFilter::All, move |_| *sink.borrow_mut() += 1);

        let result = engine.execute_command(&Command::MoveUnit {
            unit: UnitId(2),
            to: HexCoord::new(2, 2),
        });
        assert!(!result.success);
        assert!(result.events.is_empty());
        assert!(result.reason.unwrap().contains("belongs to player#2"));
        assert_eq!(engine.state().to_bytes().unwrap(), before);
        assert_eq!(*seen.borrow(), 0);
    }

    #[test]
    fn test_missing_handler_fails_closed() {
        let state = engine().into_state();
        let mut registry = CommandRegistry::standard();
        registry.unregister(CommandKind::Attack);
        let mut engine = Engine::with_registry(state, registry);
        let hash = engine.state().state_hash();

        let result = engine.execute_command(&attack());
        assert!(!result.success);
        assert_eq!(result.reason.as_deref(), Some("unknown command kind: attack"));
        assert_eq!(engine.state().state_hash(), hash);
        assert!(!engine.validate(&attack()).valid);
    }

    #[test]
    fn test_panicking_subscriber_does_not_abort_command() {
        let mut engine = engine();
        engine.subscribe(EventKind::CombatResolved, |_| panic!("listener bug"));
        let result = engine.execute_command(&attack());
        assert!(result.success);
        assert_eq!(engine.unit(UnitId(2)).unwrap().health, 70);
    }

    #[test]
    fn test_previews_do_not_mutate() {
        let engine = engine();
        let hash = engine.state().state_hash();

        let moves = engine.preview_moves(UnitId(1)).unwrap();
        assert_eq!(moves[&HexCoord::new(1, 1)], 0);
        assert!(moves.values().all(|cost| *cost <= 2));

        let outcome = engine.preview_combat(UnitId(1), UnitId(2)).unwrap();
        assert_eq!(outcome.damage_to_defender, 30);
        assert_eq!(outcome.damage_to_attacker, 15);

        let info = engine.tile_info(HexCoord::new(2, 1)).unwrap();
        assert_eq!(info.units, vec![UnitId(2)]);
        assert!(engine.preview_moves(UnitId(42)).is_none());
        assert_eq!(engine.units_of(P1).count(), 2);
        assert_eq!(engine.state().state_hash(), hash);
    }

    #[test]
    fn test_validate_is_a_dry_run() {
        let engine = engine();
        let command = Command::FoundCity {
            unit: UnitId(3),
            name: Some("Home".into()),
        };
        assert!(engine.validate(&command).valid);
        assert!(engine.city(CityId(1)).is_none());
        assert_eq!(engine.snapshot().units.len(), 3);
    }
}
