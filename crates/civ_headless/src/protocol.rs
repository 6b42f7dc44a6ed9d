//! JSON protocol for headless game communication.
//!
//! The headless runner communicates via JSON lines (one JSON object per line):
//!
//! **Input (stdin):** requests from the controller
//! **Output (stdout):** responses, plus one `event` line per published event
//!
//! # Protocol Flow
//!
//! 1. Runner starts, outputs `{"type":"ready",...}` and the opening events
//! 2. Controller sends requests as JSON lines
//! 3. For `execute`, every event is streamed as it is published, then the
//!    `result` line follows with the same events
//! 4. `quit` (or end of input) ends the session with `{"type":"bye"}`
//!
//! # Example Session
//!
//! ```text
//! <- {"type":"ready","version":"1.0","turn":1,"player":1}
//! -> {"cmd":"execute","command":{"kind":"move_unit","unit":1,"to":{"q":2,"r":0}}}
//! <- {"type":"event","event":{"kind":"unit_moved","unit":1,...}}
//! <- {"type":"result","success":true,"reason":null,"events":[...]}
//! -> {"cmd":"execute","command":{"kind":"attack","attacker":1,"defender":9}}
//! <- {"type":"result","success":false,"reason":"unit#9 does not exist","events":[]}
//! -> {"cmd":"hash"}
//! <- {"type":"state_hash","turn":1,"hash":1234567890}
//! ```
//!
//! Front ends should ignore event kinds they do not know.

use civ_core::combat::CombatOutcome;
use civ_core::command::{Command, CommandResult};
use civ_core::events::GameEvent;
use civ_core::hex::HexCoord;
use civ_core::ids::{PlayerId, UnitId};
use civ_core::snapshot::{GameSnapshot, TileInfo};
use serde::{Deserialize, Serialize};

/// Protocol version reported in `ready`.
pub const PROTOCOL_VERSION: &str = "1.0";

// ============================================================================
// Requests (controller -> runner)
// ============================================================================

/// Requests accepted by the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum Request {
    /// Submit a game command.
    Execute {
        /// The command.
        command: Command,
    },
    /// Full snapshot of units, cities and the clock.
    Query,
    /// Describe one tile.
    Tile {
        /// Axial column.
        q: i32,
        /// Axial row.
        r: i32,
    },
    /// Tiles a unit could reach this turn.
    PreviewMoves {
        /// The unit.
        unit: UnitId,
    },
    /// Outcome of an attack, without performing it.
    PreviewCombat {
        /// Attacking unit.
        attacker: UnitId,
        /// Target unit.
        defender: UnitId,
    },
    /// Current state hash (for determinism verification).
    Hash,
    /// End the session.
    Quit,
}

impl Request {
    /// Parse from a JSON line.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Request name for error reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Execute { .. } => "execute",
            Self::Query => "query",
            Self::Tile { .. } => "tile",
            Self::PreviewMoves { .. } => "preview_moves",
            Self::PreviewCombat { .. } => "preview_combat",
            Self::Hash => "hash",
            Self::Quit => "quit",
        }
    }
}

// ============================================================================
// Responses (runner -> controller)
// ============================================================================

/// A reachable tile and the movement it costs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReachableTile {
    /// Tile.
    pub coord: HexCoord,
    /// Movement points to get there.
    pub cost: u32,
}

/// Responses sent from the headless runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    /// Runner is ready to accept requests.
    Ready {
        /// Protocol version.
        version: String,
        /// Current turn.
        turn: u32,
        /// Player to act.
        player: PlayerId,
    },
    /// Outcome of an `execute` request.
    #[serde(rename = "result")]
    CommandResult {
        /// Whether the command was applied.
        success: bool,
        /// Rejection reason.
        reason: Option<String>,
        /// Events produced, in publish order.
        events: Vec<GameEvent>,
    },
    /// One published event, streamed from the bus.
    Event {
        /// The event.
        event: GameEvent,
    },
    /// Snapshot of the game.
    State {
        /// The snapshot.
        snapshot: GameSnapshot,
    },
    /// Tile description.
    Tile {
        /// The description.
        info: TileInfo,
    },
    /// Reachable tiles of a unit.
    Reachable {
        /// The unit.
        unit: UnitId,
        /// Tiles in coordinate order, start included.
        tiles: Vec<ReachableTile>,
    },
    /// Previewed combat.
    Combat {
        /// Attacking unit.
        attacker: UnitId,
        /// Target unit.
        defender: UnitId,
        /// What would happen.
        outcome: CombatOutcome,
    },
    /// State hash for determinism verification.
    StateHash {
        /// Current turn.
        turn: u32,
        /// Hash of the full state.
        hash: u64,
    },
    /// Error processing a request.
    Error {
        /// What went wrong.
        message: String,
        /// Request name, if it parsed.
        cmd: Option<String>,
    },
    /// Goodbye message before shutdown.
    Bye,
}

impl Response {
    /// Create a ready response.
    #[must_use]
    pub fn ready(turn: u32, player: PlayerId) -> Self {
        Self::Ready {
            version: PROTOCOL_VERSION.to_string(),
            turn,
            player,
        }
    }

    /// Create an error response.
    pub fn error(message: impl Into<String>, cmd: Option<&str>) -> Self {
        Self::Error {
            message: message.into(),
            cmd: cmd.map(String::from),
        }
    }

    /// Serialize to JSON line (with newline).
    #[must_use]
    pub fn to_json_line(&self) -> String {
        let mut json = serde_json::to_string(self).unwrap_or_else(|e| {
            serde_json::json!({
                "type": "error",
                "message": format!("serialization failed: {e}"),
            })
            .to_string()
        });
        json.push('\n');
        json
    }
}

impl From<CommandResult> for Response {
    fn from(result: CommandResult) -> Self {
        Self::CommandResult {
            success: result.success,
            reason: result.reason,
            events: result.events,
        }
    }
}
