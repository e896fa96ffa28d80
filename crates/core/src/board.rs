//! Board module - manages the tile grid
//!
//! The board is a `rows x cols` grid where each cell is empty or holds a tile kind.
//! Cells live in one flat row-major vector.
//! Coordinates: (row, col), row 0 is the top; tiles fall towards the last row.
//!
//! Matching works on straight runs only. A full scan walks every row and then
//! every column once; the local checks used for move availability only walk
//! outwards from the cells involved in a swap.

use std::fmt;

use arrayvec::ArrayVec;

use crate::types::{
    Cell, Match, Move, Orientation, Position, TileKind, MAX_BOARD_DIM, MAX_TILE_KINDS,
    MIN_MATCH_LENGTH,
};

const ORIENTATIONS: [Orientation; 2] = [Orientation::Horizontal, Orientation::Vertical];

/// The game board, flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    rows: u8,
    cols: u8,
    /// Flat array of cells, row-major order (row * cols + col)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board; dimensions are clamped to `1..=MAX_BOARD_DIM`
    pub fn new(rows: u8, cols: u8) -> Self {
        let rows = rows.clamp(1, MAX_BOARD_DIM);
        let cols = cols.clamp(1, MAX_BOARD_DIM);
        Self {
            rows,
            cols,
            cells: vec![None; rows as usize * cols as usize],
        }
    }

    /// Build a board from explicit rows of cells
    ///
    /// Returns `None` for an empty, ragged or oversized grid, or a tile kind
    /// beyond `MAX_TILE_KINDS`.
    pub fn from_rows(rows: &[Vec<Cell>]) -> Option<Self> {
        let height = rows.len();
        let width = rows.first()?.len();
        if height > MAX_BOARD_DIM as usize || width == 0 || width > MAX_BOARD_DIM as usize {
            return None;
        }
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }

        let cells: Vec<Cell> = rows.iter().flatten().copied().collect();
        if cells.iter().flatten().any(|k| k.0 >= MAX_TILE_KINDS) {
            return None;
        }

        Some(Self {
            rows: height as u8,
            cols: width as u8,
            cells,
        })
    }

    /// Build a completely filled board from tile indices
    ///
    /// ```
    /// use tile_swap_core::Board;
    /// use tile_swap_core::types::{Position, TileKind};
    ///
    /// let board = Board::from_kinds(&[&[0, 1, 2], &[1, 2, 0]]).unwrap();
    /// assert_eq!(board.kind_at(Position::new(1, 2)), Some(TileKind(0)));
    /// ```
    pub fn from_kinds(rows: &[&[u8]]) -> Option<Self> {
        let rows: Vec<Vec<Cell>> = rows
            .iter()
            .map(|r| r.iter().map(|&k| Some(TileKind(k))).collect())
            .collect();
        Self::from_rows(&rows)
    }

    /// Calculate flat index from a position
    #[inline(always)]
    fn index(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        Some(pos.row as usize * self.cols as usize + pos.col as usize)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.rows as i8 && pos.col < self.cols as i8
    }

    /// Get cell at position
    /// Returns None if out of bounds
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|idx| self.cells[idx])
    }

    /// Tile at position; None for empty or out of bounds
    pub fn kind_at(&self, pos: Position) -> Option<TileKind> {
        self.get(pos).flatten()
    }

    /// Set cell at position
    /// Returns false if out of bounds
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        match self.index(pos) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Exchange two cells; false (and no change) if either is out of bounds
    pub fn swap(&mut self, a: Position, b: Position) -> bool {
        match (self.index(a), self.index(b)) {
            (Some(ia), Some(ib)) => {
                self.cells.swap(ia, ib);
                true
            }
            _ => false,
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// One row of cells; empty slice when out of range
    pub fn row_slice(&self, row: u8) -> &[Cell] {
        if row >= self.rows {
            return &[];
        }
        let start = row as usize * self.cols as usize;
        &self.cells[start..start + self.cols as usize]
    }

    /// Every position in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.cols as i8;
        (0..self.rows as i8).flat_map(move |row| (0..cols).map(move |col| Position::new(row, col)))
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.is_some())
    }

    pub fn empty_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_none()).count()
    }

    /// Number of tiles of each kind, indexed by kind
    pub fn tile_counts(&self) -> [u32; MAX_TILE_KINDS as usize] {
        let mut counts = [0u32; MAX_TILE_KINDS as usize];
        for kind in self.cells.iter().flatten() {
            counts[kind.index()] += 1;
        }
        counts
    }

    /// Grid of `u8`, 0 for empty and `kind + 1` otherwise
    pub fn to_u8_grid(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|row| {
                self.row_slice(row)
                    .iter()
                    .map(|c| c.map_or(0, |k| k.0 + 1))
                    .collect()
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Find every maximal straight run of at least three equal tiles
    ///
    /// Rows are scanned first, then columns. A tile where a horizontal and a
    /// vertical run cross is reported in both matches.
    pub fn find_all_matches(&self) -> Vec<Match> {
        let mut out = Vec::new();
        for row in 0..self.rows as i8 {
            self.scan_line(
                Position::new(row, 0),
                Orientation::Horizontal,
                self.cols,
                &mut out,
            );
        }
        for col in 0..self.cols as i8 {
            self.scan_line(
                Position::new(0, col),
                Orientation::Vertical,
                self.rows,
                &mut out,
            );
        }
        out
    }

    pub fn has_match(&self) -> bool {
        !self.find_all_matches().is_empty()
    }

    fn scan_line(&self, origin: Position, orientation: Orientation, len: u8, out: &mut Vec<Match>) {
        let (dr, dc) = orientation.step();
        let mut run_kind: Cell = None;
        let mut run_start = origin;
        let mut run_len = 0u8;

        for i in 0..len as i8 {
            let pos = origin.offset(dr * i, dc * i);
            let cell = self.kind_at(pos);
            if cell.is_some() && cell == run_kind {
                run_len += 1;
                continue;
            }
            push_run(run_kind, run_start, run_len, orientation, out);
            run_kind = cell;
            run_start = pos;
            run_len = 1;
        }
        push_run(run_kind, run_start, run_len, orientation, out);
    }

    /// Length of the run of `kind` through `pos` along one axis, reading cells
    /// through `cell_at`. `pos` itself counts as `kind` whatever it holds.
    fn run_through<F>(
        &self,
        pos: Position,
        kind: TileKind,
        orientation: Orientation,
        cell_at: &F,
    ) -> (Position, u8)
    where
        F: Fn(Position) -> Cell,
    {
        let (dr, dc) = orientation.step();
        let same = |p: Position| self.contains(p) && cell_at(p) == Some(kind);

        let mut back = 0i8;
        while same(pos.offset(-dr * (back + 1), -dc * (back + 1))) {
            back += 1;
        }
        let mut fwd = 0i8;
        while same(pos.offset(dr * (fwd + 1), dc * (fwd + 1))) {
            fwd += 1;
        }

        (
            pos.offset(-dr * back, -dc * back),
            (back + fwd + 1) as u8,
        )
    }

    /// Runs of at least three passing through one cell (at most one per axis)
    pub fn matches_at(&self, pos: Position) -> ArrayVec<Match, 2> {
        let mut out = ArrayVec::new();
        let Some(kind) = self.kind_at(pos) else {
            return out;
        };
        let cell_at = |p: Position| self.kind_at(p);
        for orientation in ORIENTATIONS {
            let (start, len) = self.run_through(pos, kind, orientation, &cell_at);
            if len >= MIN_MATCH_LENGTH {
                out.push(Match {
                    kind,
                    orientation,
                    start,
                    len,
                });
            }
        }
        out
    }

    /// Whether putting `kind` at `pos` would line it up with two or more
    /// equal neighbours on either axis
    pub fn would_complete_run(&self, pos: Position, kind: TileKind) -> bool {
        if !self.contains(pos) {
            return false;
        }
        let cell_at = |p: Position| self.kind_at(p);
        ORIENTATIONS
            .iter()
            .any(|&o| self.run_through(pos, kind, o, &cell_at).1 >= MIN_MATCH_LENGTH)
    }

    /// Whether exchanging `a` and `b` would put either of them in a match
    ///
    /// The swap is evaluated through a remapped view of the grid, so the board
    /// is never written to.
    pub fn swap_creates_match(&self, a: Position, b: Position) -> bool {
        if !self.contains(a) || !self.contains(b) || a == b {
            return false;
        }
        let swapped = |p: Position| {
            if p == a {
                self.kind_at(b)
            } else if p == b {
                self.kind_at(a)
            } else {
                self.kind_at(p)
            }
        };

        [(a, self.kind_at(b)), (b, self.kind_at(a))]
            .into_iter()
            .any(|(pos, kind)| match kind {
                Some(kind) => ORIENTATIONS.iter().any(|&o| {
                    self.run_through(pos, kind, o, &swapped).1 >= MIN_MATCH_LENGTH
                }),
                None => false,
            })
    }

    /// First swap (in row-major scan order, neighbours up/down/left/right)
    /// that would produce a match
    pub fn find_valid_move(&self) -> Option<Move> {
        for from in self.positions() {
            for to in from.neighbors() {
                if self.contains(to) && self.swap_creates_match(from, to) {
                    return Some(Move::new(from, to));
                }
            }
        }
        None
    }

    pub fn has_valid_moves(&self) -> bool {
        self.find_valid_move().is_some()
    }

    /// Every matching swap, each unordered pair once (`to` is right of or below `from`)
    pub fn valid_moves(&self) -> Vec<Move> {
        let mut out = Vec::new();
        for from in self.positions() {
            for to in [from.offset(0, 1), from.offset(1, 0)] {
                if self.contains(to) && self.swap_creates_match(from, to) {
                    out.push(Move::new(from, to));
                }
            }
        }
        out
    }

    /// Empty every cell covered by `matches`; returns the number of distinct cells cleared
    pub fn clear_matches(&mut self, matches: &[Match]) -> u32 {
        let mut cleared = 0;
        for m in matches {
            for pos in m.cells() {
                if let Some(idx) = self.index(pos) {
                    if self.cells[idx].take().is_some() {
                        cleared += 1;
                    }
                }
            }
        }
        cleared
    }

    /// Let tiles fall to the bottom of each column, preserving their order
    ///
    /// Uses a two-pointer pass per column; returns how many tiles moved.
    pub fn collapse(&mut self) -> u32 {
        let mut moved = 0;
        for col in 0..self.cols as i8 {
            let mut write = self.rows as i8 - 1;
            for read in (0..self.rows as i8).rev() {
                let from = Position::new(read, col);
                let Some(kind) = self.kind_at(from) else {
                    continue;
                };
                if write != read {
                    self.set(Position::new(write, col), Some(kind));
                    self.set(from, None);
                    moved += 1;
                }
                write -= 1;
            }
        }
        moved
    }
}

fn push_run(kind: Cell, start: Position, len: u8, orientation: Orientation, out: &mut Vec<Match>) {
    if let Some(kind) = kind {
        if len >= MIN_MATCH_LENGTH {
            out.push(Match {
                kind,
                orientation,
                start,
                len,
            });
        }
    }
}

impl fmt::Display for Board {
    /// One line per row; tiles as base-36 digits, empty cells as `.`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for cell in self.row_slice(row) {
                let ch = match cell {
                    Some(kind) => char::from_digit(kind.0 as u32, 36).unwrap_or('?'),
                    None => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
