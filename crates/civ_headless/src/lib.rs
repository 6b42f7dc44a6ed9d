//! Headless game runner for AI testing and CI verification.
//!
//! This crate provides a headless runner that can be controlled via JSON
//! requests on stdin, with responses and events on stdout. This enables:
//!
//! - **AI testing**: an agent can play the game without a front end
//! - **CI verification**: automated checks of game rules and determinism
//! - **Scenario authoring**: RON scenarios validated and replayed from the CLI
//!
//! # Protocol
//!
//! Communication uses JSON lines (one JSON object per line):
//!
//! - **stdin**: requests from the controller (execute, query, tile, ...)
//! - **stdout**: responses and streamed events (JSON)
//! - **stderr**: logs (human-readable)
//!
//! See [`protocol`] module for the full request/response specification.
//!
//! # Example
//!
//! ```bash
//! # Run interactively on the built-in skirmish
//! echo '{"cmd":"query"}' | cargo run -p civ_headless
//!
//! # Run a scenario
//! cargo run -p civ_headless -- run --scenario scenarios/river_crossing.ron
//! ```

pub mod protocol;
pub mod runner;
pub mod scenario;

pub use protocol::{Request, Response, PROTOCOL_VERSION};
pub use runner::{HeadlessRunner, RunnerError, SessionStats};
pub use scenario::{MapSpec, Scenario, ScenarioError};
