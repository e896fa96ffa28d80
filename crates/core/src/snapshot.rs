use crate::board::Board;
use crate::types::{Outcome, Position, DEFAULT_COLS, DEFAULT_ROWS};

/// Owned, read-only copy of a session at one point in time
///
/// It does not follow later mutations of the session it was taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    pub board: Board,
    pub score: u32,
    pub moves_left: u32,
    pub target_score: u32,
    pub cascading: bool,
    pub has_valid_moves: bool,
    pub outcome: Outcome,
    pub selected: Option<Position>,
    pub episode_id: u32,
}

impl SessionSnapshot {
    pub fn clear(&mut self) {
        self.board.clear();
        self.score = 0;
        self.moves_left = 0;
        self.target_score = 0;
        self.cascading = false;
        self.has_valid_moves = false;
        self.outcome = Outcome::Playing;
        self.selected = None;
        self.episode_id = 0;
    }

    /// Whether a move request could be accepted in this state
    pub fn playable(&self) -> bool {
        !self.cascading && !self.outcome.is_terminal()
    }
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            board: Board::new(DEFAULT_ROWS, DEFAULT_COLS),
            score: 0,
            moves_left: 0,
            target_score: 0,
            cascading: false,
            has_valid_moves: false,
            outcome: Outcome::Playing,
            selected: None,
            episode_id: 0,
        }
    }
}
