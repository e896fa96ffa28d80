//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data: the board engine, the move planner and the
//! JSON adapter all speak in these types.
//!
//! # Coordinates
//!
//! Positions are `(row, col)` with row 0 at the top of the board. Tiles fall
//! towards higher row indices. Coordinates are signed so callers can hand the
//! engine an off-board position and get a plain rejection back.
//!
//! # Scoring Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `MIN_MATCH_LENGTH` | 3 | Shortest run that counts as a match |
//! | `TILE_POINTS` | 10 | Points per cleared tile |
//! | `LENGTH_BONUS_POINTS` | 5 | Bonus per tile beyond the third in one match |
//!
//! # Examples
//!
//! ```
//! use tile_swap_types::{Move, Orientation, Position, TileKind, Match};
//!
//! let mv = Move::new(Position::new(4, 2), Position::new(3, 2));
//! assert!(mv.is_adjacent());
//! assert!(!Move::new(Position::new(0, 0), Position::new(1, 1)).is_adjacent());
//!
//! let run = Match {
//!     kind: TileKind(0),
//!     orientation: Orientation::Horizontal,
//!     start: Position::new(3, 0),
//!     len: 3,
//! };
//! assert!(run.contains(Position::new(3, 2)));
//! assert_eq!(run.end(), Position::new(3, 2));
//! ```

use arrayvec::ArrayVec;

/// Shortest straight run that counts as a match
pub const MIN_MATCH_LENGTH: u8 = 3;

/// Base points awarded for every cleared tile
pub const TILE_POINTS: u32 = 10;

/// Points per tile beyond `MIN_MATCH_LENGTH` in a single match
pub const LENGTH_BONUS_POINTS: u32 = 5;

/// Attempt budget for random generation and reshuffling
pub const GENERATION_ATTEMPTS: u32 = 1000;

/// Cascade rounds after which a chain is forcibly settled
pub const CASCADE_DEPTH_GUARD: u32 = 256;

/// Undrained events a session holds before discarding the oldest
pub const MAX_BUFFERED_EVENTS: usize = 1024;

/// Smallest supported board side (the fallback cluster needs a 4x4 interior)
pub const MIN_BOARD_DIM: u8 = 4;

/// Largest supported board side
pub const MAX_BOARD_DIM: u8 = 16;

/// Smallest alphabet that still lets matches be avoided during generation
pub const MIN_TILE_KINDS: u8 = 3;

/// Largest supported alphabet
pub const MAX_TILE_KINDS: u8 = 16;

pub const DEFAULT_ROWS: u8 = 8;
pub const DEFAULT_COLS: u8 = 8;
pub const DEFAULT_TILE_KINDS: u8 = 6;
pub const DEFAULT_MOVE_BUDGET: u32 = 30;
pub const DEFAULT_TARGET_SCORE: u32 = 500;

/// Cells forced to tile 0 by the deterministic fallback layout
///
/// Two in row 1 and one diagonally below the right end: swapping `(2, 2)`
/// up into `(1, 2)` always completes a run of three.
pub const FALLBACK_CLUSTER: [(i8, i8); 3] = [(1, 0), (1, 1), (2, 2)];


/// A tile type: index into the configured alphabet (`0..tile_kinds`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileKind(pub u8);

impl TileKind {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A cell on the board
///
/// - `None`: empty (only observable between removal and refill)
/// - `Some(TileKind)`: occupied
pub type Cell = Option<TileKind>;

/// Grid coordinate, row-major, row 0 at the top
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub row: i8,
    pub col: i8,
}

impl Position {
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// Shift by a delta; saturates instead of wrapping so the result stays off-board
    pub fn offset(self, dr: i8, dc: i8) -> Self {
        Self {
            row: self.row.saturating_add(dr),
            col: self.col.saturating_add(dc),
        }
    }

    /// The four orthogonal neighbours (up, down, left, right), unchecked against any board
    pub fn neighbors(self) -> ArrayVec<Position, 4> {
        let mut out = ArrayVec::new();
        out.push(self.offset(-1, 0));
        out.push(self.offset(1, 0));
        out.push(self.offset(0, -1));
        out.push(self.offset(0, 1));
        out
    }

    pub fn manhattan(self, other: Position) -> u16 {
        let dr = (self.row as i16 - other.row as i16).unsigned_abs();
        let dc = (self.col as i16 - other.col as i16).unsigned_abs();
        dr + dc
    }

    /// Orthogonally adjacent: Manhattan distance of exactly one
    pub fn is_adjacent(self, other: Position) -> bool {
        self.manhattan(other) == 1
    }
}

/// A swap request between two cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Position,
    pub to: Position,
}

impl Move {
    pub const fn new(from: Position, to: Position) -> Self {
        Self { from, to }
    }

    pub fn is_adjacent(&self) -> bool {
        self.from.is_adjacent(self.to)
    }

    pub fn reversed(&self) -> Self {
        Self {
            from: self.to,
            to: self.from,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Unit step along the run as `(d_row, d_col)`
    pub fn step(self) -> (i8, i8) {
        match self {
            Orientation::Horizontal => (0, 1),
            Orientation::Vertical => (1, 0),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// A maximal straight run of at least `MIN_MATCH_LENGTH` equal tiles
///
/// L and T shapes show up as two overlapping matches, one per orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Match {
    pub kind: TileKind,
    pub orientation: Orientation,
    /// Top-most (vertical) or left-most (horizontal) cell
    pub start: Position,
    pub len: u8,
}

impl Match {
    pub fn cells(self) -> impl Iterator<Item = Position> {
        let (dr, dc) = self.orientation.step();
        let start = self.start;
        (0..self.len as i8).map(move |i| start.offset(dr * i, dc * i))
    }

    pub fn end(&self) -> Position {
        let (dr, dc) = self.orientation.step();
        let last = self.len.saturating_sub(1) as i8;
        self.start.offset(dr * last, dc * last)
    }

    pub fn contains(&self, pos: Position) -> bool {
        let end = self.end();
        match self.orientation {
            Orientation::Horizontal => {
                pos.row == self.start.row && pos.col >= self.start.col && pos.col <= end.col
            }
            Orientation::Vertical => {
                pos.col == self.start.col && pos.row >= self.start.row && pos.row <= end.row
            }
        }
    }
}

/// How a cascade chain came to rest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    /// At least one valid move is available
    Playable,
    /// The board deadlocked with budget left and was reshuffled
    Reshuffled { attempts: u32, regenerated: bool },
    /// The board deadlocked with no budget left; nothing more can happen
    Stalled,
}

/// Session-level result, derived from score, budget and deadlock state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Playing,
    TargetReached,
    OutOfMoves,
    Stalled,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Playing => "playing",
            Outcome::TargetReached => "targetReached",
            Outcome::OutOfMoves => "outOfMoves",
            Outcome::Stalled => "stalled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Playing)
    }
}

/// Result of a tap on the board (select-then-swap interaction)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapOutcome {
    /// Off-board, mid-cascade, or the session has ended
    Ignored,
    Selected(Position),
    Deselected,
    /// The selected cell and the tapped cell were swapped and a cascade ran
    Moved(Move),
    /// The swap was refused; the tapped cell becomes the new selection
    Rejected(Position),
}

/// Notifications surfaced to presentation code, in the order they happened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    MoveAccepted {
        mv: Move,
        moves_left: u32,
    },
    /// One match removed during cascade round `depth` (1 = the player's swap)
    MatchResolved {
        depth: u32,
        matched: Match,
        points: u32,
    },
    /// The chain started by a move came to rest
    CascadeSettled {
        depth: u32,
        points: u32,
    },
    Reshuffled {
        attempts: u32,
        regenerated: bool,
    },
    /// Deadlock with an exhausted budget
    Stalled {
        score: u32,
    },
    /// Emitted once per episode, when the score first reaches the target
    TargetReached {
        score: u32,
        target: u32,
    },
}

impl EngineEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            EngineEvent::MoveAccepted { .. } => "moveAccepted",
            EngineEvent::MatchResolved { .. } => "matchResolved",
            EngineEvent::CascadeSettled { .. } => "cascadeSettled",
            EngineEvent::Reshuffled { .. } => "reshuffled",
            EngineEvent::Stalled { .. } => "stalled",
            EngineEvent::TargetReached { .. } => "targetReached",
        }
    }
}
