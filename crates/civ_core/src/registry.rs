//! Lookup of the validator and executor for each command kind.

use std::collections::BTreeMap;
use std::fmt;

use crate::command::{Command, CommandKind, ValidationResult};
use crate::events::GameEvent;
use crate::executors;
use crate::state::GameState;
use crate::validators;

/// Read-only check of a command against the state.
pub type ValidatorFn = fn(&GameState, &Command) -> ValidationResult;

/// State mutation for an already validated command.
pub type ExecutorFn = fn(&mut GameState, &Command) -> Vec<GameEvent>;

/// Validator and executor registered for one kind.
#[derive(Clone, Copy)]
pub struct CommandHandler {
    /// Runs first; the executor only runs if this accepts.
    pub validate: ValidatorFn,
    /// Applies the command and returns its events.
    pub execute: ExecutorFn,
}

impl fmt::Debug for CommandHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandHandler").finish_non_exhaustive()
    }
}

/// Handlers keyed by [`CommandKind`].
///
/// A kind with no entry is rejected by the engine; it is never executed.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    handlers: BTreeMap<CommandKind, CommandHandler>,
}

impl CommandRegistry {
    /// Registry with no handlers.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Registry with the built-in handler for every kind.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(
            CommandKind::MoveUnit,
            validators::validate_move_unit,
            executors::execute_move_unit,
        );
        registry.register(
            CommandKind::Attack,
            validators::validate_attack,
            executors::execute_attack,
        );
        registry.register(
            CommandKind::FoundCity,
            validators::validate_found_city,
            executors::execute_found_city,
        );
        registry.register(
            CommandKind::SetProduction,
            validators::validate_set_production,
            executors::execute_set_production,
        );
        registry.register(
            CommandKind::EndTurn,
            validators::validate_end_turn,
            executors::execute_end_turn,
        );
        registry
    }

    /// Install or replace the handler for `kind`. Returns the previous one.
    pub fn register(
        &mut self,
        kind: CommandKind,
        validate: ValidatorFn,
        execute: ExecutorFn,
    ) -> Option<CommandHandler> {
        self.handlers
            .insert(kind, CommandHandler { validate, execute })
    }

    /// Remove the handler for `kind`.
    pub fn unregister(&mut self, kind: CommandKind) -> Option<CommandHandler> {
        self.handlers.remove(&kind)
    }

    /// Handler for `kind`.
    #[must_use]
    pub fn get(&self, kind: CommandKind) -> Option<&CommandHandler> {
        self.handlers.get(&kind)
    }

    /// Kinds with a handler, ascending.
    pub fn kinds(&self) -> impl Iterator<Item = CommandKind> + '_ {
        self.handlers.keys().copied()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
