//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains the match-3 rules, session state and the board
//! generation that backs them. It has no dependencies on UI, networking or
//! I/O and can run headless.
//!
//! - **Deterministic**: the same seed and the same moves give the same game
//! - **Testable**: every rule is covered by unit tests next to it
//!
//! # Module Structure
//!
//! - [`board`]: rectangular grid, match detection, move scan, removal and gravity
//! - [`config`]: board size, alphabet, move budget and target score
//! - [`generate`]: match-free generation, refill and deadlock reshuffle
//! - [`rng`]: seedable random source
//! - [`scoring`]: points for one removal round
//! - [`session`]: the game state machine (moves, cascades, outcome)
//! - [`snapshot`]: owned read-only view of a session
//!
//! # Game Rules
//!
//! - Two orthogonally adjacent tiles may swap only if the swap lines up three
//!   or more equal tiles in a row or column; otherwise the swap is undone.
//! - Matched tiles are removed, the tiles above fall, the gaps are refilled
//!   from the top and the board is scanned again until it comes to rest.
//! - A resting board without a valid move is reshuffled while moves remain.
//!
//! # Example
//!
//! ```
//! use tile_swap_core::{EngineConfig, GameSession};
//!
//! let mut session = GameSession::new(EngineConfig::default(), 12345).unwrap();
//! let mv = session.hint().expect("a fresh board always has a move");
//! assert!(session.try_move(mv));
//! assert!(session.score() >= 30);
//! assert_eq!(session.moves_left(), 29);
//! ```

pub mod board;
pub mod config;
pub mod generate;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use tile_swap_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::{ConfigError, EngineConfig};
pub use generate::{generate_board, Generated};
pub use rng::{RandomSource, SimpleRng};
pub use scoring::{score_step, ScoreResult};
pub use session::{CascadeStep, GameSession, MoveError};
pub use snapshot::SessionSnapshot;
