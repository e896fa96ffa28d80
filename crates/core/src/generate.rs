//! Board generation, refill and reshuffle
//!
//! New tiles are drawn from the kinds that would not line up with the tiles
//! already placed around them. Whole boards are retried until they are both
//! match-free and playable; a deterministic layout backs that up when the
//! attempt budget runs out.

use arrayvec::ArrayVec;
use log::{debug, warn};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::rng::RandomSource;
use crate::types::{Position, TileKind, FALLBACK_CLUSTER, GENERATION_ATTEMPTS, MAX_TILE_KINDS};

/// A freshly generated board and how it was obtained
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub board: Board,
    /// Random fills tried (equals `GENERATION_ATTEMPTS` when the fallback was used)
    pub attempts: u32,
    /// True when the deterministic layout was used
    pub fallback: bool,
}

/// Pick a kind for `pos` that does not complete a run with its neighbours
///
/// Falls back to a uniform draw over the whole alphabet when every kind would
/// line up.
pub fn random_tile<R: RandomSource>(
    board: &Board,
    pos: Position,
    tile_kinds: u8,
    rng: &mut R,
) -> TileKind {
    let tile_kinds = tile_kinds.clamp(1, MAX_TILE_KINDS);
    let candidates: ArrayVec<TileKind, { MAX_TILE_KINDS as usize }> = (0..tile_kinds)
        .map(TileKind)
        .filter(|&kind| !board.would_complete_run(pos, kind))
        .collect();

    if candidates.is_empty() {
        return TileKind(rng.next_range(tile_kinds as u32) as u8);
    }
    candidates[rng.next_range(candidates.len() as u32) as usize]
}

/// Fill every empty cell in row-major order; returns how many cells were filled
pub fn fill_empty<R: RandomSource>(board: &mut Board, tile_kinds: u8, rng: &mut R) -> u32 {
    let mut filled = 0;
    let empty: Vec<Position> = board
        .positions()
        .filter(|&pos| board.get(pos) == Some(None))
        .collect();
    for pos in empty {
        let kind = random_tile(board, pos, tile_kinds, rng);
        board.set(pos, Some(kind));
        filled += 1;
    }
    filled
}

/// Generate a match-free board with at least one valid move
pub fn generate_board<R: RandomSource>(config: &EngineConfig, rng: &mut R) -> Generated {
    let mut board = Board::new(config.rows, config.cols);

    for attempt in 1..=GENERATION_ATTEMPTS {
        board.clear();
        fill_empty(&mut board, config.tile_kinds, rng);
        if !board.has_match() && board.has_valid_moves() {
            debug!("generated {}x{} board after {} attempt(s)", config.rows, config.cols, attempt);
            return Generated {
                board,
                attempts: attempt,
                fallback: false,
            };
        }
    }

    warn!(
        "no playable board after {} attempts, using fallback layout",
        GENERATION_ATTEMPTS
    );
    Generated {
        board: fallback_board(config),
        attempts: GENERATION_ATTEMPTS,
        fallback: true,
    }
}

/// Diagonal stripes `(row + col) mod T` with a cluster of tile 0 forced in
///
/// The cluster guarantees the `(2, 2) <-> (1, 2)` move; the stripes may
/// also leave a standing match, which is accepted.
pub fn fallback_board(config: &EngineConfig) -> Board {
    let mut board = Board::new(config.rows, config.cols);
    let kinds = config.tile_kinds.max(1) as usize;
    for pos in board.positions().collect::<Vec<_>>() {
        let kind = (pos.row as usize + pos.col as usize) % kinds;
        board.set(pos, Some(TileKind(kind as u8)));
    }
    for (row, col) in FALLBACK_CLUSTER {
        board.set(Position::new(row, col), Some(TileKind(0)));
    }
    board
}

/// Uniformly permute the tiles among the occupied cells
///
/// Empty cells stay empty, so the tile multiset is unchanged.
pub fn reshuffle<R: RandomSource>(board: &mut Board, rng: &mut R) {
    let occupied: Vec<Position> = board
        .positions()
        .filter(|&pos| board.kind_at(pos).is_some())
        .collect();
    let mut tiles: Vec<TileKind> = occupied.iter().filter_map(|&pos| board.kind_at(pos)).collect();
    rng.shuffle(&mut tiles);
    for (pos, kind) in occupied.into_iter().zip(tiles) {
        board.set(pos, Some(kind));
    }
}

/// Reshuffle until the board is match-free and has a valid move
///
/// Returns the number of permutations tried, or `None` when the attempt budget
/// ran out (the board keeps its last permutation).
pub fn reshuffle_until_playable<R: RandomSource>(board: &mut Board, rng: &mut R) -> Option<u32> {
    for attempt in 1..=GENERATION_ATTEMPTS {
        reshuffle(board, rng);
        if !board.has_match() && board.has_valid_moves() {
            return Some(attempt);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SimpleRng;

    #[test]
    fn test_random_tile_avoids_runs() {
        let mut board = Board::new(4, 4);
        board.set(Position::new(0, 0), Some(TileKind(0)));
        board.set(Position::new(0, 1), Some(TileKind(0)));
        board.set(Position::new(1, 2), Some(TileKind(1)));
        board.set(Position::new(2, 2), Some(TileKind(1)));

        let mut rng = SimpleRng::new(3);
        for _ in 0..200 {
            let kind = random_tile(&board, Position::new(0, 2), 3, &mut rng);
            assert_eq!(kind, TileKind(2));
        }
    }

    #[test]
    fn test_random_tile_falls_back_when_boxed_in() {
        // With two kinds, 0 closes the row and 1 closes the column at (1, 1).
        let mut board = Board::new(4, 4);
        board.set(Position::new(1, 0), Some(TileKind(0)));
        board.set(Position::new(1, 2), Some(TileKind(0)));
        board.set(Position::new(0, 1), Some(TileKind(1)));
        board.set(Position::new(2, 1), Some(TileKind(1)));
        assert!(board.would_complete_run(Position::new(1, 1), TileKind(0)));
        assert!(board.would_complete_run(Position::new(1, 1), TileKind(1)));

        let mut rng = SimpleRng::new(11);
        let kind = random_tile(&board, Position::new(1, 1), 2, &mut rng);
        assert!(kind.0 < 2);
    }

    #[test]
    fn test_fill_empty_leaves_no_match() {
        let mut rng = SimpleRng::new(8);
        for _ in 0..20 {
            let mut board = Board::new(8, 8);
            assert_eq!(fill_empty(&mut board, 6, &mut rng), 64);
            assert!(board.is_full());
            assert!(!board.has_match());
        }
    }

    #[test]
    fn test_generate_board_is_playable() {
        let config = EngineConfig::default();
        for seed in 1..30 {
            let mut rng = SimpleRng::new(seed);
            let generated = generate_board(&config, &mut rng);
            assert!(!generated.fallback);
            assert!(generated.board.find_all_matches().is_empty());
            assert!(generated.board.has_valid_moves());
            assert!(generated.attempts >= 1);
        }
    }

    #[test]
    fn test_generate_board_respects_alphabet() {
        let config = EngineConfig::tall();
        let mut rng = SimpleRng::new(77);
        let generated = generate_board(&config, &mut rng);
        assert_eq!(generated.board.rows(), 8);
        assert_eq!(generated.board.cols(), 7);
        assert!(generated
            .board
            .cells()
            .iter()
            .flatten()
            .all(|k| k.0 < config.tile_kinds));
    }

    #[test]
    fn test_fallback_board_has_move() {
        let config = EngineConfig::default();
        let board = fallback_board(&config);
        assert!(board.is_full());
        assert!(board.has_valid_moves());
        assert!(board.swap_creates_match(Position::new(2, 2), Position::new(1, 2)));
        for (row, col) in FALLBACK_CLUSTER {
            assert_eq!(board.kind_at(Position::new(row, col)), Some(TileKind(0)));
        }
    }

    /// Replays a fixed list of draws, wrapping around at the end
    struct Scripted {
        draws: Vec<u32>,
        next: usize,
    }

    impl RandomSource for Scripted {
        fn next_u32(&mut self) -> u32 {
            let draw = self.draws[self.next % self.draws.len()];
            self.next += 1;
            draw
        }
    }

    fn striped(pos: Position) -> TileKind {
        TileKind(((pos.row + 2 * pos.col) % 5) as u8)
    }

    /// Draws that make `fill_empty` lay out the deadlocked `(r + 2c) mod 5` stripes
    fn striped_draws(rows: u8, cols: u8, tile_kinds: u8) -> Vec<u32> {
        let mut board = Board::new(rows, cols);
        let mut draws = Vec::new();
        for pos in board.positions().collect::<Vec<_>>() {
            let candidates: Vec<TileKind> = (0..tile_kinds)
                .map(TileKind)
                .filter(|&kind| !board.would_complete_run(pos, kind))
                .collect();
            let index = candidates.iter().position(|&k| k == striped(pos)).unwrap();
            draws.push(index as u32);
            board.set(pos, Some(striped(pos)));
        }
        draws
    }

    #[test]
    fn test_exhausted_generation_uses_fallback() {
        let config = EngineConfig {
            rows: 4,
            cols: 4,
            tile_kinds: 5,
            ..EngineConfig::default()
        };
        let draws = striped_draws(4, 4, 5);

        // Every fill comes out as the same deadlocked layout.
        let mut rng = Scripted {
            draws: draws.clone(),
            next: 0,
        };
        let mut board = Board::new(4, 4);
        fill_empty(&mut board, 5, &mut rng);
        assert!(board.positions().all(|pos| board.kind_at(pos) == Some(striped(pos))));
        assert!(!board.has_match());
        assert!(!board.has_valid_moves());

        let mut rng = Scripted { draws, next: 0 };
        let generated = generate_board(&config, &mut rng);
        assert!(generated.fallback);
        assert_eq!(generated.attempts, GENERATION_ATTEMPTS);
        assert_eq!(generated.board, fallback_board(&config));
        assert!(generated
            .board
            .swap_creates_match(Position::new(2, 2), Position::new(1, 2)));
        assert!(generated.board.has_valid_moves());
    }

    #[test]
    fn test_reshuffle_keeps_multiset() {
        let mut rng = SimpleRng::new(5);
        let mut board = generate_board(&EngineConfig::default(), &mut rng).board;
        board.set(Position::new(0, 0), None);
        let before = board.tile_counts();

        reshuffle(&mut board, &mut rng);
        assert_eq!(board.tile_counts(), before);
        assert_eq!(board.get(Position::new(0, 0)), Some(None));
    }

    #[test]
    fn test_reshuffle_until_playable() {
        let rows: Vec<Vec<u8>> = (0..8u8)
            .map(|r| (0..8u8).map(|c| (r + 2 * c) % 5).collect())
            .collect();
        let refs: Vec<&[u8]> = rows.iter().map(|r| r.as_slice()).collect();
        let mut board = Board::from_kinds(&refs).unwrap();
        assert!(!board.has_valid_moves());
        let before = board.tile_counts();

        let mut rng = SimpleRng::new(21);
        let attempts = reshuffle_until_playable(&mut board, &mut rng);
        assert!(attempts.is_some());
        assert!(!board.has_match());
        assert!(board.has_valid_moves());
        assert_eq!(board.tile_counts(), before);
    }

    #[test]
    fn test_reshuffle_gives_up_on_uniform_board() {
        let row: &[u8] = &[2; 4];
        let mut board = Board::from_kinds(&[row, row, row, row]).unwrap();
        let mut rng = SimpleRng::new(6);
        assert_eq!(reshuffle_until_playable(&mut board, &mut rng), None);
        assert_eq!(board.tile_counts()[2], 16);
    }
}
