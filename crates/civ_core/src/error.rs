//! Error types for the game simulation.
//!
//! Command rejections are not errors: they are expected outcomes carried in
//! [`crate::command::ValidationResult`]. [`GameError`] covers the fallible
//! setup and serialization paths around the engine.

use thiserror::Error;

use crate::hex::HexCoord;
use crate::ids::{CityId, PlayerId, UnitId};

/// Result type alias using [`GameError`].
pub type Result<T> = std::result::Result<T, GameError>;

/// Top-level error type for all game simulation errors.
#[derive(Debug, Error)]
pub enum GameError {
    /// Ruleset text could not be parsed.
    #[error("Failed to parse ruleset: {0}")]
    RulesetParse(#[from] ron::error::SpannedError),

    /// Ruleset parsed but holds values the simulation cannot run with.
    #[error("Invalid ruleset: {0}")]
    InvalidRuleset(String),

    /// Reading a data file failed.
    #[error("Failed to read '{path}': {source}")]
    Io {
        /// Path to the file that failed to load.
        path: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Snapshot encoding or decoding failed.
    #[error("State serialization failed: {0}")]
    Serialization(#[from] bincode::Error),

    /// A feature was placed on terrain that cannot carry it.
    #[error("Feature {feature} cannot be placed on {terrain} at {coord}")]
    InvalidFeature {
        /// Tile coordinate.
        coord: HexCoord,
        /// Terrain name.
        terrain: String,
        /// Feature name.
        feature: String,
    },

    /// Invalid unit identifier.
    #[error("Unit not found: {0}")]
    UnitNotFound(UnitId),

    /// Invalid city identifier.
    #[error("City not found: {0}")]
    CityNotFound(CityId),

    /// Player is not part of the turn order.
    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    /// Invalid game state.
    #[error("Invalid game state: {0}")]
    InvalidState(String),
}
