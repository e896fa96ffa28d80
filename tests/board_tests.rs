//! Board tests - generation, matching, move scan and reshuffle laws

use tile_swap::core::generate::{fallback_board, generate_board, reshuffle};
use tile_swap::core::{Board, EngineConfig, SimpleRng};
use tile_swap::types::{Move, Orientation, Position, TileKind};

fn p(row: i8, col: i8) -> Position {
    Position::new(row, col)
}

fn board_from(rows: &[&[u8]]) -> Board {
    Board::from_kinds(rows).expect("rectangular layout")
}

/// `(r + 2c) mod 5`: no pair on either axis and no swap that makes a match
fn deadlocked(rows: u8, cols: u8) -> Board {
    let grid: Vec<Vec<u8>> = (0..rows)
        .map(|r| (0..cols).map(|c| (r + 2 * c) % 5).collect())
        .collect();
    let refs: Vec<&[u8]> = grid.iter().map(|r| r.as_slice()).collect();
    board_from(&refs)
}

#[test]
fn test_generated_boards_are_valid() {
    let configs = [
        EngineConfig::default(),
        EngineConfig::tall(),
        EngineConfig {
            rows: 4,
            cols: 4,
            tile_kinds: 3,
            ..EngineConfig::default()
        },
        EngineConfig {
            rows: 16,
            cols: 16,
            tile_kinds: 16,
            ..EngineConfig::default()
        },
    ];

    for config in configs {
        for seed in 0..20 {
            let mut rng = SimpleRng::new(seed);
            let generated = generate_board(&config, &mut rng);
            let board = &generated.board;

            assert_eq!(board.rows(), config.rows);
            assert_eq!(board.cols(), config.cols);
            assert!(board.is_full(), "seed {} left empty cells", seed);
            assert!(
                board.cells().iter().flatten().all(|k| k.0 < config.tile_kinds),
                "seed {} used a kind outside the alphabet",
                seed
            );
            assert!(board.has_valid_moves(), "seed {} has no move", seed);
            if !generated.fallback {
                assert!(board.find_all_matches().is_empty(), "seed {} has a match", seed);
            }
        }
    }
}

#[test]
fn test_fallback_layout_is_playable() {
    for tile_kinds in 3..=8 {
        let config = EngineConfig {
            tile_kinds,
            ..EngineConfig::default()
        };
        let board = fallback_board(&config);
        assert!(board.is_full());
        assert!(board.has_valid_moves(), "{} kinds", tile_kinds);
    }
}

#[test]
fn test_adjacency_law() {
    let board = deadlocked(6, 6);
    let c = p(2, 2);
    let neighbours: Vec<Position> = c.neighbors().into_iter().collect();
    assert_eq!(neighbours.len(), 4);
    for n in &neighbours {
        assert!(c.is_adjacent(*n));
        assert_eq!(c.manhattan(*n), 1);
    }

    for other in board.positions() {
        let adjacent = Move::new(c, other).is_adjacent();
        assert_eq!(adjacent, neighbours.contains(&other), "{:?}", other);
    }
    assert!(!c.is_adjacent(c));
    assert!(!c.is_adjacent(p(3, 3)));
}

#[test]
fn test_match_detection_rows_and_columns() {
    let board = board_from(&[
        &[0, 0, 0, 0, 1],
        &[1, 2, 3, 4, 1],
        &[2, 3, 4, 2, 1],
        &[3, 4, 2, 3, 2],
    ]);
    let matches = board.find_all_matches();
    assert_eq!(matches.len(), 2);

    let row = matches
        .iter()
        .find(|m| m.orientation == Orientation::Horizontal)
        .unwrap();
    assert_eq!(row.start, p(0, 0));
    assert_eq!(row.len, 4);
    assert_eq!(row.kind, TileKind(0));

    let col = matches
        .iter()
        .find(|m| m.orientation == Orientation::Vertical)
        .unwrap();
    assert_eq!(col.start, p(0, 4));
    assert_eq!(col.len, 3);
    assert_eq!(col.kind, TileKind(1));
}

#[test]
fn test_has_valid_moves_does_not_mutate() {
    let mut rng = SimpleRng::new(31);
    let board = generate_board(&EngineConfig::default(), &mut rng).board;
    let before = board.clone();

    assert!(board.has_valid_moves());
    assert!(board.find_valid_move().is_some());
    let _ = board.valid_moves();
    for pos in board.positions() {
        for n in pos.neighbors() {
            let _ = board.swap_creates_match(pos, n);
        }
    }
    assert_eq!(board, before);

    let stuck = deadlocked(8, 8);
    let before = stuck.clone();
    assert!(!stuck.has_valid_moves());
    assert_eq!(stuck, before);
}

#[test]
fn test_every_valid_move_creates_a_match() {
    let mut rng = SimpleRng::new(8);
    let board = generate_board(&EngineConfig::default(), &mut rng).board;
    let moves = board.valid_moves();
    assert!(!moves.is_empty());
    for mv in moves {
        let mut probe = board.clone();
        assert!(probe.swap(mv.from, mv.to));
        assert!(probe.has_match(), "{:?} should match", mv);
    }
}

#[test]
fn test_reshuffle_preserves_multiset() {
    let mut board = deadlocked(8, 8);
    board.set(p(7, 7), None);
    board.set(p(0, 3), None);
    let before = board.tile_counts();
    let empty = board.empty_count();

    let mut rng = SimpleRng::new(99);
    for _ in 0..25 {
        reshuffle(&mut board, &mut rng);
        assert_eq!(board.tile_counts(), before);
        assert_eq!(board.empty_count(), empty);
        assert_eq!(board.get(p(7, 7)), Some(None));
        assert_eq!(board.get(p(0, 3)), Some(None));
    }
}

#[test]
fn test_clear_and_collapse() {
    let mut board = board_from(&[
        &[1, 2, 3, 4],
        &[2, 3, 4, 1],
        &[0, 0, 0, 2],
        &[3, 4, 1, 3],
    ]);
    let matches = board.find_all_matches();
    assert_eq!(matches.len(), 1);
    assert_eq!(board.clear_matches(&matches), 3);
    assert_eq!(board.empty_count(), 3);

    board.collapse();
    assert_eq!(board.kind_at(p(2, 0)), Some(TileKind(2)));
    assert_eq!(board.kind_at(p(1, 0)), Some(TileKind(1)));
    assert_eq!(board.get(p(0, 0)), Some(None));
    assert_eq!(board.kind_at(p(3, 0)), Some(TileKind(3)));
    assert_eq!(board.kind_at(p(2, 3)), Some(TileKind(2)));
}
