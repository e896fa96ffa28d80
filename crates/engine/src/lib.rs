//! Engine helpers built on top of the core session
//!
//! - [`plan`]: read-only move analysis (valid moves, previews, greedy choice)
//! - [`swap`]: applying a move to a session with a structured report, and
//!   headless autoplay

pub mod plan;
pub mod swap;

pub use tile_swap_core as core;
pub use tile_swap_types as types;

pub use plan::{best_move, preview_move, valid_moves, MovePreview};
pub use swap::{apply_swap, autoplay, AutoplaySummary, SwapError, SwapReport};
