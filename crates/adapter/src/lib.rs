//! Adapter module - external control over a line-delimited JSON protocol
//!
//! Lets an external agent (a UI shell, a test harness, a bot) drive one game
//! session through stdin/stdout or any other byte stream.
//!
//! # Protocol Overview
//!
//! One JSON object per line in each direction. Every request is answered by
//! exactly one response.
//!
//! ## Client → Engine
//!
//! - **init**: start a new session, optionally with `config` and `seed`
//! - **move**: swap `from` and `to`
//! - **tap**: select-then-swap interaction on `pos`
//! - **state** / **board** / **hint**: queries
//! - **restart**: new board, same configuration
//!
//! ## Engine → Client
//!
//! - **state**: full session state plus events since the last response
//! - **board**: the grid only (`0` empty, `kind + 1` otherwise)
//! - **hint**: a valid move or `null`
//! - **move**: `accepted`, a `reason` code when refused, and the state
//! - **tap**: the tap outcome and the state
//! - **error**: malformed request or rejected configuration
//!
//! # Example Protocol Flow
//!
//! ```text
//! Client -> Engine: {"type":"hint"}
//! Engine -> Client: {"type":"hint","move":{"from":{"row":3,"col":4},"to":{"row":3,"col":5}}}
//! Client -> Engine: {"type":"move","from":{"row":3,"col":4},"to":{"row":3,"col":5}}
//! Engine -> Client: {"type":"move","accepted":true,"state":{"rows":8,"cols":8,...}}
//! Client -> Engine: {"type":"move","from":{"row":0,"col":0},"to":{"row":0,"col":2}}
//! Engine -> Client: {"type":"move","accepted":false,"reason":"not_adjacent","state":{...}}
//! ```
//!
//! # Testing
//!
//! ```bash
//! echo '{"type":"state"}' | tile-swap serve --seed 7
//! ```

pub mod protocol;
pub mod server;

pub use tile_swap_core as core;
pub use tile_swap_engine as engine;
pub use tile_swap_types as types;

// Re-export protocol types for convenience
pub use protocol::*;
pub use server::{Adapter, DEFAULT_SEED};
