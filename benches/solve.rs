use criterion::{black_box, criterion_group, criterion_main, Criterion};
use setting_sun::{Board, Point, Solver, SolverConfig, StateKey};

const NEAR_GOAL: &str = "TTTT\nTTTT\nss..\nSSWW\nSSss\n";

fn bench_solve(c: &mut Criterion) {
    let near: Board = NEAR_GOAL.parse().expect("valid layout");
    let layouts = [("standard", Board::standard()), ("near_goal", near)];

    for (name, board) in &layouts {
        let mut solver = Solver::new(SolverConfig::default()).expect("valid config");
        c.bench_function(&format!("solve_{}", name), |b| {
            b.iter(|| solver.solve(black_box(board)))
        });
    }

    let mut shallow =
        Solver::new(SolverConfig::default().with_goal(Point::new(1, 1))).expect("valid config");
    let standard = Board::standard();
    c.bench_function("solve_standard_goal_1_1", |b| {
        b.iter(|| shallow.solve(black_box(&standard)))
    });
}

fn bench_codec(c: &mut Criterion) {
    let positions = *Board::standard().positions();
    let key = StateKey::encode(&positions);

    c.bench_function("encode", |b| b.iter(|| StateKey::encode(black_box(&positions))));
    c.bench_function("decode_all", |b| b.iter(|| black_box(key).positions()));
}

criterion_group!(benches, bench_solve, bench_codec);
criterion_main!(benches);
