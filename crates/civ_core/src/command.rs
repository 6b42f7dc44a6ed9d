//! Commands (player intents) and the results of validating and executing them.
//!
//! Commands are plain data. Behaviour lives in the validators and executors
//! registered for each [`CommandKind`].

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::TurnPhase;
use crate::events::GameEvent;
use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId, UnitId};
use crate::rules::Buildable;

/// A player's declared intent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Command {
    /// Move a unit to a tile within its remaining movement.
    MoveUnit {
        /// Unit to move.
        unit: UnitId,
        /// Destination.
        to: HexCoord,
    },
    /// Attack an adjacent enemy unit.
    Attack {
        /// Attacking unit.
        attacker: UnitId,
        /// Target unit.
        defender: UnitId,
    },
    /// Consume a founder unit to found a city on its tile.
    FoundCity {
        /// Founder unit.
        unit: UnitId,
        /// City name; defaults to `City <id>`.
        #[serde(default)]
        name: Option<String>,
    },
    /// Choose what a city produces.
    SetProduction {
        /// City.
        city: CityId,
        /// Item to produce.
        item: Buildable,
    },
    /// Finish the current player's turn.
    EndTurn {
        /// Player ending the turn.
        player: PlayerId,
    },
}

/// Discriminant of [`Command`], the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// [`Command::MoveUnit`].
    MoveUnit,
    /// [`Command::Attack`].
    Attack,
    /// [`Command::FoundCity`].
    FoundCity,
    /// [`Command::SetProduction`].
    SetProduction,
    /// [`Command::EndTurn`].
    EndTurn,
}

impl CommandKind {
    /// Every command kind.
    pub const ALL: [CommandKind; 5] = [
        CommandKind::MoveUnit,
        CommandKind::Attack,
        CommandKind::FoundCity,
        CommandKind::SetProduction,
        CommandKind::EndTurn,
    ];

    /// Wire name, matching the `kind` tag of serialized commands.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandKind::MoveUnit => "move_unit",
            CommandKind::Attack => "attack",
            CommandKind::FoundCity => "found_city",
            CommandKind::SetProduction => "set_production",
            CommandKind::EndTurn => "end_turn",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Command {
    /// The command's discriminant.
    #[must_use]
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::MoveUnit { .. } => CommandKind::MoveUnit,
            Command::Attack { .. } => CommandKind::Attack,
            Command::FoundCity { .. } => CommandKind::FoundCity,
            Command::SetProduction { .. } => CommandKind::SetProduction,
            Command::EndTurn { .. } => CommandKind::EndTurn,
        }
    }
}

/// Why a command was refused. The `Display` text is the reason reported to
/// callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// No validator or executor is registered for the kind.
    #[error("unknown command kind: {0}")]
    UnknownCommandKind(CommandKind),
    /// A handler received a command of another kind.
    #[error("handler for {expected} cannot process {actual}")]
    KindMismatch {
        /// Kind the handler serves.
        expected: CommandKind,
        /// Kind it was given.
        actual: CommandKind,
    },
    /// The command is not legal in the current phase.
    #[error("{kind} is not allowed during {phase}")]
    WrongPhase {
        /// Command kind.
        kind: CommandKind,
        /// Current phase.
        phase: TurnPhase,
    },
    /// Unit id does not exist.
    #[error("{0} does not exist")]
    UnitNotFound(UnitId),
    /// City id does not exist.
    #[error("{0} does not exist")]
    CityNotFound(CityId),
    /// Acting unit belongs to another player.
    #[error("{unit} belongs to {owner}, not the current player")]
    UnitNotOwned {
        /// Unit.
        unit: UnitId,
        /// Its owner.
        owner: PlayerId,
    },
    /// Acting city belongs to another player.
    #[error("{city} belongs to {owner}, not the current player")]
    CityNotOwned {
        /// City.
        city: CityId,
        /// Its owner.
        owner: PlayerId,
    },
    /// No movement points left.
    #[error("{0} has no movement left")]
    NoMovementLeft(UnitId),
    /// Move target equals the current position.
    #[error("{unit} is already at {at}")]
    AlreadyThere {
        /// Unit.
        unit: UnitId,
        /// Position.
        at: HexCoord,
    },
    /// Move target cannot be reached with the remaining movement.
    #[error("{to} is not reachable by {unit} with {movement} movement left")]
    Unreachable {
        /// Unit.
        unit: UnitId,
        /// Target tile.
        to: HexCoord,
        /// Remaining movement.
        movement: u32,
    },
    /// Move target holds another player's unit.
    #[error("{0} is occupied by another player's unit")]
    TileOccupied(HexCoord),
    /// Move target is the centre of a city the mover does not own.
    #[error("{0} is another player's city")]
    ForeignCity(HexCoord),
    /// Attacker has no combat strength.
    #[error("{0} cannot attack")]
    NoStrength(UnitId),
    /// Defender is not next to the attacker.
    #[error("{defender} is not adjacent to {attacker}")]
    NotAdjacent {
        /// Attacking unit.
        attacker: UnitId,
        /// Target unit.
        defender: UnitId,
    },
    /// Defender belongs to the attacker's owner.
    #[error("{0} is a friendly unit")]
    FriendlyTarget(UnitId),
    /// Unit kind cannot found cities.
    #[error("{0} cannot found a city")]
    NotAFounder(UnitId),
    /// Tile is water or otherwise not settleable.
    #[error("cannot found a city on {0}")]
    NotLand(HexCoord),
    /// A city already occupies the tile.
    #[error("a city already exists at {0}")]
    CityExists(HexCoord),
    /// Item is not recognized by the ruleset.
    #[error("{0} cannot be built")]
    NotBuildable(Buildable),
    /// The building is already in the city.
    #[error("{city} already has {item}")]
    AlreadyBuilt {
        /// City.
        city: CityId,
        /// Building.
        item: Buildable,
    },
    /// Someone other than the current player tried to end the turn.
    #[error("it is {current}'s turn, not {player}'s")]
    NotCurrentPlayer {
        /// Player in the command.
        player: PlayerId,
        /// Player whose turn it is.
        current: PlayerId,
    },
}

/// Outcome of running a validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// Whether the command may execute.
    pub valid: bool,
    /// Human-readable reason when invalid.
    pub reason: Option<String>,
}

impl ValidationResult {
    /// Command is valid.
    #[must_use]
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    /// Command is invalid for `rejection`.
    #[must_use]
    pub fn reject(rejection: &Rejection) -> Self {
        Self {
            valid: false,
            reason: Some(rejection.to_string()),
        }
    }
}

impl From<Result<(), Rejection>> for ValidationResult {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(rejection) => Self::reject(&rejection),
        }
    }
}

/// Outcome of [`crate::engine::Engine::execute_command`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandResult {
    /// Whether the command was applied.
    pub success: bool,
    /// Why it was not applied.
    pub reason: Option<String>,
    /// Events produced, in publish order. Empty on failure.
    pub events: Vec<GameEvent>,
}

impl CommandResult {
    /// Applied with the given events.
    #[must_use]
    pub fn accepted(events: Vec<GameEvent>) -> Self {
        Self {
            success: true,
            reason: None,
            events,
        }
    }

    /// Refused for `reason`.
    #[must_use]
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: Some(reason.into()),
            events: Vec::new(),
        }
    }
}
