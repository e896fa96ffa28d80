//! Tile-swap match-3 engine (workspace facade crate).
//!
//! Re-exports the workspace crates under one name, so callers can use
//! `tile_swap::{core,engine,adapter,types}` while the implementation lives in
//! dedicated crates under `crates/`.

pub use tile_swap_adapter as adapter;
pub use tile_swap_core as core;
pub use tile_swap_engine as engine;
pub use tile_swap_types as types;
