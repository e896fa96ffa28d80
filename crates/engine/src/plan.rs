use crate::core::scoring::{score_step, ScoreResult};
use crate::core::Board;
use crate::types::{Match, Move};

/// What the first removal round of a move would do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovePreview {
    pub mv: Move,
    pub matches: Vec<Match>,
    /// Distinct cells the first round removes
    pub cleared: u32,
    pub score: ScoreResult,
}

impl MovePreview {
    pub fn points(&self) -> u32 {
        self.score.total
    }
}

/// Every swap that creates a match, each pair listed once (right and down)
pub fn valid_moves(board: &Board) -> Vec<Move> {
    board.valid_moves()
}

/// Matches and points of the swap's first removal round
///
/// Cascades after the refill depend on random tiles and are not predicted.
/// Returns None when the swap is out of bounds, not adjacent or makes no match.
pub fn preview_move(board: &Board, mv: Move) -> Option<MovePreview> {
    if !mv.is_adjacent() || !board.contains(mv.from) || !board.contains(mv.to) {
        return None;
    }

    let mut probe = board.clone();
    probe.swap(mv.from, mv.to);
    let matches = probe.find_all_matches();
    if matches.is_empty() {
        return None;
    }

    let cleared = probe.clear_matches(&matches);
    let score = score_step(cleared, &matches);
    Some(MovePreview {
        mv,
        matches,
        cleared,
        score,
    })
}

/// Greedy choice: the move with the most immediate points, first found on ties
pub fn best_move(board: &Board) -> Option<MovePreview> {
    let mut best: Option<MovePreview> = None;
    for mv in board.valid_moves() {
        let Some(preview) = preview_move(board, mv) else {
            continue;
        };
        if best.as_ref().map_or(true, |b| preview.points() > b.points()) {
            best = Some(preview);
        }
    }
    best
}
