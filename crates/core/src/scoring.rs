//! Scoring module - points for one removal round
//!
//! Every distinct cleared tile is worth `TILE_POINTS`; each match adds
//! `LENGTH_BONUS_POINTS` for every tile beyond the third. A tile where a
//! horizontal and a vertical match cross is paid once as a tile, while both
//! matches still pay their length bonus.

use crate::types::{Match, LENGTH_BONUS_POINTS, MIN_MATCH_LENGTH, TILE_POINTS};

/// Score calculation result for one cascade round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// `TILE_POINTS` per distinct cleared cell
    pub base_points: u32,
    /// Sum of the per-match length bonuses
    pub length_bonus: u32,
    pub total: u32,
}

/// Bonus for a single match: zero for three, `LENGTH_BONUS_POINTS` per extra tile
pub fn match_length_bonus(len: u8) -> u32 {
    len.saturating_sub(MIN_MATCH_LENGTH) as u32 * LENGTH_BONUS_POINTS
}

pub fn tile_points(cleared_cells: u32) -> u32 {
    cleared_cells.saturating_mul(TILE_POINTS)
}

/// Score one removal round from the number of distinct cells cleared and the matches found
pub fn score_step(cleared_cells: u32, matches: &[Match]) -> ScoreResult {
    let base_points = tile_points(cleared_cells);
    let length_bonus = matches
        .iter()
        .map(|m| match_length_bonus(m.len))
        .fold(0u32, u32::saturating_add);

    ScoreResult {
        base_points,
        length_bonus,
        total: base_points.saturating_add(length_bonus),
    }
}
