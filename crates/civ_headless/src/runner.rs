//! Headless game runner implementation.
//!
//! The runner owns an [`Engine`] and answers one [`Request`] per input line.
//! Events reach the output through an ordinary bus subscription, so a
//! controller sees exactly what any other subscriber would see, in publish
//! order, before the `result` line of the command that produced them.

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use civ_core::engine::Engine;
use civ_core::event_bus::{EventFilter, SubscriptionId};
use civ_core::hex::HexCoord;
use civ_core::state::GameState;
use thiserror::Error;

use crate::protocol::{ReachableTile, Request, Response};
use crate::scenario::{Scenario, ScenarioError};

/// Errors that stop a session.
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Reading requests or writing responses failed.
    #[error("session I/O failed: {0}")]
    Io(#[from] io::Error),
    /// The scenario could not be loaded.
    #[error(transparent)]
    Scenario(#[from] ScenarioError),
}

/// Counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Lines read, blank lines excluded.
    pub requests: u32,
    /// Requests answered with an error.
    pub errors: u32,
    /// Commands the engine accepted.
    pub accepted: u32,
    /// Commands the engine rejected.
    pub rejected: u32,
}

/// Headless runner for externally controlled games.
#[derive(Debug)]
pub struct HeadlessRunner {
    engine: Engine,
    outbox: Rc<RefCell<Vec<Response>>>,
    subscription: SubscriptionId,
    stats: SessionStats,
}

impl HeadlessRunner {
    /// Runner over an initial state.
    #[must_use]
    pub fn new(state: GameState) -> Self {
        let mut engine = Engine::new(state);
        let outbox = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&outbox);
        let subscription = engine.subscribe(EventFilter::All, move |event| {
            sink.borrow_mut().push(Response::Event {
                event: event.clone(),
            });
        });
        Self {
            engine,
            outbox,
            subscription,
            stats: SessionStats::default(),
        }
    }

    /// Runner over a scenario's initial state.
    pub fn from_scenario(scenario: &Scenario) -> Result<Self, RunnerError> {
        tracing::info!(name = %scenario.name, "loading scenario");
        Ok(Self::new(scenario.build_state()?))
    }

    /// The engine.
    #[must_use]
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The `ready` line followed by any opening turn events.
    pub fn open(&mut self) -> Vec<Response> {
        let clock = self.engine.state().clock();
        let ready = Response::ready(clock.turn(), clock.current_player());
        self.engine.start();
        let mut responses = vec![ready];
        responses.append(&mut self.drain_events());
        responses
    }

    /// Answer one raw input line.
    pub fn handle_line(&mut self, line: &str) -> Vec<Response> {
        self.stats.requests += 1;
        match Request::from_json(line) {
            Ok(request) => self.handle(request),
            Err(e) => {
                self.stats.errors += 1;
                tracing::debug!(error = %e, "unparsable request");
                vec![Response::error(format!("parse error: {e}"), None)]
            }
        }
    }

    /// Answer one request.
    ///
    /// For `execute` the streamed `event` lines come first, then the
    /// `result` line.
    pub fn handle(&mut self, request: Request) -> Vec<Response> {
        let name = request.name();
        let response = match request {
            Request::Execute { command } => {
                let result = self.engine.execute_command(&command);
                if result.success {
                    self.stats.accepted += 1;
                } else {
                    self.stats.rejected += 1;
                }
                let mut responses = self.drain_events();
                responses.push(Response::from(result));
                return responses;
            }
            Request::Query => Response::State {
                snapshot: self.engine.snapshot(),
            },
            Request::Tile { q, r } => {
                let coord = HexCoord::new(q, r);
                match self.engine.tile_info(coord) {
                    Some(info) => Response::Tile { info },
                    None => Response::error(format!("no tile at {coord}"), Some(name)),
                }
            }
            Request::PreviewMoves { unit } => match self.engine.preview_moves(unit) {
                Some(reachable) => Response::Reachable {
                    unit,
                    tiles: reachable
                        .into_iter()
                        .map(|(coord, cost)| ReachableTile { coord, cost })
                        .collect(),
                },
                None => Response::error(format!("{unit} does not exist"), Some(name)),
            },
            Request::PreviewCombat { attacker, defender } => {
                match self.engine.preview_combat(attacker, defender) {
                    Some(outcome) => Response::Combat {
                        attacker,
                        defender,
                        outcome,
                    },
                    None => Response::error(
                        format!("{attacker} or {defender} does not exist"),
                        Some(name),
                    ),
                }
            }
            Request::Hash => Response::StateHash {
                turn: self.engine.state().clock().turn(),
                hash: self.engine.state().state_hash(),
            },
            Request::Quit => Response::Bye,
        };
        if matches!(response, Response::Error { .. }) {
            self.stats.errors += 1;
        }
        vec![response]
    }

    /// Serve requests from `input` until `quit` or end of input.
    ///
    /// Every response is flushed as soon as it is written so a controller
    /// on a pipe sees it immediately.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
    ) -> Result<SessionStats, RunnerError> {
        let opening = self.open();
        write_all(&mut output, &opening)?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let responses = self.handle_line(line);
            write_all(&mut output, &responses)?;
            if responses.last() == Some(&Response::Bye) {
                tracing::info!(stats = ?self.stats, "session ended by controller");
                return Ok(self.stats);
            }
        }

        write_all(&mut output, &[Response::Bye])?;
        tracing::info!(stats = ?self.stats, "input closed");
        Ok(self.stats)
    }

    /// Stop streaming events and give the engine back.
    #[must_use]
    pub fn into_engine(mut self) -> Engine {
        self.engine.unsubscribe(self.subscription);
        self.engine
    }

    fn drain_events(&mut self) -> Vec<Response> {
        std::mem::take(&mut *self.outbox.borrow_mut())
    }
}

fn write_all<W: Write>(output: &mut W, responses: &[Response]) -> io::Result<()> {
    for response in responses {
        output.write_all(response.to_json_line().as_bytes())?;
    }
    output.flush()
}
