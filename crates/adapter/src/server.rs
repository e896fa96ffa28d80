//! Request handling and the line-delimited I/O loop
//!
//! The adapter owns one session. Each request line is answered by exactly
//! one response line; malformed lines get an `error` response and the loop
//! keeps going.

use std::io::{BufRead, Write};

use anyhow::Context;
use log::{debug, info, warn};

use crate::core::{ConfigError, EngineConfig, GameSession};
use crate::engine::apply_swap;
use crate::protocol::*;
use crate::types::{EngineEvent, Move, TapOutcome};

pub const DEFAULT_SEED: u32 = 1;

pub struct Adapter {
    session: GameSession,
    seed: u32,
}

impl Adapter {
    pub fn new(config: EngineConfig, seed: u32) -> Result<Self, ConfigError> {
        Ok(Self {
            session: GameSession::new(config, seed)?,
            seed,
        })
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn handle(&mut self, request: Request) -> Response {
        match request {
            Request::Init { config, seed } => self.init(config, seed),
            Request::Move { from, to } => self.apply_move(from, to),
            Request::Tap { pos } => self.tap(pos),
            Request::State => {
                let events = self.session.take_events();
                Response::State(self.state(&events))
            }
            Request::Board => {
                let board = self.session.board();
                Response::Board {
                    rows: board.rows(),
                    cols: board.cols(),
                    grid: board.to_u8_grid(),
                }
            }
            Request::Hint => Response::Hint {
                mv: self.session.hint().map(MoveMsg::from),
            },
            Request::Restart => {
                self.session.restart();
                let events = self.session.take_events();
                Response::State(self.state(&events))
            }
        }
    }

    /// Parse one request line and serialize the response (without newline)
    pub fn handle_line(&mut self, line: &str) -> String {
        let response = match serde_json::from_str::<Request>(line) {
            Ok(request) => {
                debug!("request: {:?}", request);
                self.handle(request)
            }
            Err(e) => {
                warn!("rejected request line: {}", e);
                Response::error(ErrorCode::InvalidRequest, e.to_string())
            }
        };

        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"error","code":"{}","message":"failed to encode response: {}"}}"#,
                ErrorCode::Internal.as_str(),
                e.to_string().replace('"', "'")
            )
        })
    }

    /// Answer request lines from `reader` on `writer` until end of input
    ///
    /// Blank lines are skipped.
    pub fn serve<R: BufRead, W: Write>(&mut self, reader: R, mut writer: W) -> anyhow::Result<()> {
        info!(
            "serving {}x{} board, seed {}",
            self.session.config().rows,
            self.session.config().cols,
            self.seed
        );

        let mut handled = 0u64;
        for line in reader.lines() {
            let line = line.context("failed to read request line")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let out = self.handle_line(line);
            writeln!(writer, "{}", out).context("failed to write response")?;
            writer.flush().context("failed to flush response")?;
            handled += 1;
        }

        info!("input closed after {} request(s)", handled);
        Ok(())
    }

    fn init(&mut self, config: Option<ConfigMsg>, seed: Option<u32>) -> Response {
        let config = config.map_or_else(EngineConfig::default, EngineConfig::from);
        let seed = seed.unwrap_or(self.seed);
        match GameSession::new(config, seed) {
            Ok(session) => {
                info!(
                    "new session: {}x{}, {} kinds, seed {}",
                    config.rows, config.cols, config.tile_kinds, seed
                );
                self.session = session;
                self.seed = seed;
                Response::State(self.state(&[]))
            }
            Err(e) => {
                warn!("init rejected: {}", e);
                Response::error(ErrorCode::InvalidConfig, e.to_string())
            }
        }
    }

    fn apply_move(&mut self, from: PosMsg, to: PosMsg) -> Response {
        let (Some(from), Some(to)) = (from.to_position(), to.to_position()) else {
            return Response::Move {
                accepted: false,
                reason: Some("out_of_bounds".to_string()),
                state: self.state(&[]),
            };
        };

        match apply_swap(&mut self.session, Move::new(from, to)) {
            Ok(report) => Response::Move {
                accepted: true,
                reason: None,
                state: self.state(&report.events),
            },
            Err(e) => {
                debug!("move rejected: {}", e.message());
                Response::Move {
                    accepted: false,
                    reason: Some(e.code().to_string()),
                    state: self.state(&[]),
                }
            }
        }
    }

    fn tap(&mut self, pos: PosMsg) -> Response {
        let outcome = match pos.to_position() {
            Some(pos) => self.session.tap(pos),
            None => TapOutcome::Ignored,
        };
        let events = self.session.take_events();
        Response::Tap {
            outcome: outcome.into(),
            state: self.state(&events),
        }
    }

    fn state(&self, events: &[EngineEvent]) -> StateMsg {
        StateMsg::from_snapshot(&self.session.snapshot(), events)
    }
}
