//! Criterion benchmarks: static evaluation and fixed-depth searches.

use std::sync::atomic::AtomicBool;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use petrel::eval::eval;
use petrel::position::Position;
use petrel::search::{iterative_deepening, KillerTable, SearchOptions};
use petrel::tt::TranspositionTable;

fn bench_eval(c: &mut Criterion) {
    let start = Position::start();
    let middlegame =
        Position::from_fen("r1bq1rk1/pp2bppp/2n1pn2/3p4/3P4/2NBPN2/PP3PPP/R1BQ1RK1 w - - 0 9")
            .unwrap();

    c.bench_function("eval_startpos", |b| {
        b.iter(|| eval(black_box(start.board())));
    });
    c.bench_function("eval_middlegame", |b| {
        b.iter(|| eval(black_box(middlegame.board())));
    });
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_startpos");
    group.sample_size(10);

    for depth in [1i32, 2, 3, 4] {
        group.bench_function(format!("depth_{depth}"), |b| {
            b.iter(|| {
                let pos = Position::start();
                let tt = TranspositionTable::new(16);
                let killers = KillerTable::new();
                let stop = AtomicBool::new(false);
                iterative_deepening(
                    &pos,
                    &tt,
                    &killers,
                    &stop,
                    SearchOptions::depth(depth),
                    |_| {},
                )
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_eval, bench_search);
criterion_main!(benches);
