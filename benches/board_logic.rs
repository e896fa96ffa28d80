use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tile_swap::core::generate::generate_board;
use tile_swap::core::{EngineConfig, GameSession, SimpleRng};
use tile_swap::engine::best_move;

fn bench_generate(c: &mut Criterion) {
    let config = EngineConfig::default();
    let mut rng = SimpleRng::new(12345);

    c.bench_function("generate_8x8", |b| {
        b.iter(|| generate_board(black_box(&config), &mut rng))
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    let board = generate_board(&EngineConfig::default(), &mut rng).board;

    c.bench_function("find_all_matches", |b| {
        b.iter(|| black_box(&board).find_all_matches())
    });
}

fn bench_has_valid_moves(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    let board = generate_board(&EngineConfig::default(), &mut rng).board;

    c.bench_function("has_valid_moves", |b| {
        b.iter(|| black_box(&board).has_valid_moves())
    });
}

fn bench_best_move(c: &mut Criterion) {
    let mut rng = SimpleRng::new(12345);
    let board = generate_board(&EngineConfig::default(), &mut rng).board;

    c.bench_function("best_move", |b| b.iter(|| best_move(black_box(&board))));
}

fn bench_try_move(c: &mut Criterion) {
    let session = GameSession::new(EngineConfig::default(), 12345).unwrap();

    c.bench_function("try_move_with_cascade", |b| {
        b.iter(|| {
            let mut s = session.clone();
            if let Some(mv) = s.hint() {
                s.try_move(mv);
            }
            black_box(s.score())
        })
    });
}

criterion_group!(
    benches,
    bench_generate,
    bench_find_matches,
    bench_has_valid_moves,
    bench_best_move,
    bench_try_move
);
criterion_main!(benches);
