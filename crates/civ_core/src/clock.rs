//! Turn clock: turn number, phase and whose turn it is.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use crate::ids::PlayerId;

/// Phase within one player's turn.
///
/// `TurnStart -> PlayerAction -> TurnEnd -> TurnStart` (next player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    /// Start-of-turn bookkeeping has not run yet.
    TurnStart,
    /// The current player may issue commands.
    PlayerAction,
    /// End-of-turn processing.
    TurnEnd,
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TurnPhase::TurnStart => "turn start",
            TurnPhase::PlayerAction => "player action",
            TurnPhase::TurnEnd => "turn end",
        };
        f.write_str(name)
    }
}

/// Turn bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TurnClock {
    turn: u32,
    phase: TurnPhase,
    current: usize,
    players: Vec<PlayerId>,
}

impl TurnClock {
    /// Turn 1, first player, `TurnStart`.
    pub fn new(players: Vec<PlayerId>) -> Result<Self> {
        let first = players.first().copied().ok_or_else(|| {
            GameError::InvalidState("turn order needs at least one player".into())
        })?;
        Self::at(players, 1, TurnPhase::TurnStart, first)
    }

    /// Clock at an arbitrary point, e.g. when resuming a scenario.
    pub fn at(
        players: Vec<PlayerId>,
        turn: u32,
        phase: TurnPhase,
        current_player: PlayerId,
    ) -> Result<Self> {
        if players.is_empty() {
            return Err(GameError::InvalidState(
                "turn order needs at least one player".into(),
            ));
        }
        for (i, player) in players.iter().enumerate() {
            if players[..i].contains(player) {
                return Err(GameError::InvalidState(format!(
                    "{player} appears twice in the turn order"
                )));
            }
        }
        let current = players
            .iter()
            .position(|p| *p == current_player)
            .ok_or(GameError::UnknownPlayer(current_player))?;
        Ok(Self {
            turn: turn.max(1),
            phase,
            current,
            players,
        })
    }

    /// Turn number, starting at 1. Increments when play wraps to the first
    /// player.
    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> TurnPhase {
        self.phase
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> PlayerId {
        self.players[self.current]
    }

    /// Turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerId] {
        &self.players
    }

    /// Whether `player` takes part in the game.
    #[must_use]
    pub fn has_player(&self, player: PlayerId) -> bool {
        self.players.contains(&player)
    }

    /// Whether the current-player index points into the turn order.
    /// Only false for hand-edited or corrupt snapshots.
    pub(crate) fn is_consistent(&self) -> bool {
        self.current < self.players.len()
    }

    pub(crate) fn set_phase(&mut self, phase: TurnPhase) {
        self.phase = phase;
    }

    /// Hand the turn to the next player and enter `TurnStart`.
    ///
    /// Returns `true` when the order wrapped and the turn number advanced.
    pub(crate) fn next_player(&mut self) -> bool {
        self.current += 1;
        let wrapped = self.current >= self.players.len();
        if wrapped {
            self.current = 0;
            self.turn = self.turn.saturating_add(1);
        }
        self.phase = TurnPhase::TurnStart;
        wrapped
    }
}
