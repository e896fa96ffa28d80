//! Engine configuration
//!
//! Every tunable is passed in at construction. The only baked-in values are
//! the documented fallback constants in `tile_swap_types`.

use thiserror::Error;

use crate::types::{
    DEFAULT_COLS, DEFAULT_MOVE_BUDGET, DEFAULT_ROWS, DEFAULT_TARGET_SCORE, DEFAULT_TILE_KINDS,
    MAX_BOARD_DIM, MAX_TILE_KINDS, MIN_BOARD_DIM, MIN_TILE_KINDS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineConfig {
    pub rows: u8,
    pub cols: u8,
    /// Alphabet size `T`; tiles are `TileKind(0)..TileKind(T - 1)`
    pub tile_kinds: u8,
    pub move_budget: u32,
    pub target_score: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board must be between {min}x{min} and {max}x{max}, got {rows}x{cols}")]
    BoardSize { rows: u8, cols: u8, min: u8, max: u8 },
    #[error("tile kinds must be between {min} and {max}, got {got}")]
    TileKinds { got: u8, min: u8, max: u8 },
    #[error("layout is {got_rows}x{got_cols} but the config expects {rows}x{cols}")]
    BoardShape {
        rows: u8,
        cols: u8,
        got_rows: u8,
        got_cols: u8,
    },
    #[error("layout contains tile {kind} outside an alphabet of {tile_kinds}")]
    UnknownTile { kind: u8, tile_kinds: u8 },
}

impl EngineConfig {
    /// 8 rows by 7 columns with 7 tile kinds, the taller second board
    pub fn tall() -> Self {
        Self {
            rows: 8,
            cols: 7,
            tile_kinds: 7,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = MIN_BOARD_DIM..=MAX_BOARD_DIM;
        if !dims.contains(&self.rows) || !dims.contains(&self.cols) {
            return Err(ConfigError::BoardSize {
                rows: self.rows,
                cols: self.cols,
                min: MIN_BOARD_DIM,
                max: MAX_BOARD_DIM,
            });
        }
        if !(MIN_TILE_KINDS..=MAX_TILE_KINDS).contains(&self.tile_kinds) {
            return Err(ConfigError::TileKinds {
                got: self.tile_kinds,
                min: MIN_TILE_KINDS,
                max: MAX_TILE_KINDS,
            });
        }
        Ok(())
    }

    pub fn area(&self) -> usize {
        self.rows as usize * self.cols as usize
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            tile_kinds: DEFAULT_TILE_KINDS,
            move_budget: DEFAULT_MOVE_BUDGET,
            target_score: DEFAULT_TARGET_SCORE,
        }
    }
}
