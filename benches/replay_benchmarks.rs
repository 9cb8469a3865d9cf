//! Benchmarks for settlement replay performance
//!
//! These benchmarks measure:
//! - Replay throughput for growing operation logs
//! - Effect of the number of distinct players
//! - Report rendering cost

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use uuid::Uuid;

use betsettle::{
    Match, MatchRegistry, MatchResult, Operation, ReportSerializer, SettlementEngine,
    TextReportSerializer, Side,
};

fn create_registry(num_matches: u128) -> MatchRegistry {
    (0..num_matches)
        .map(|i| {
            let result = match i % 3 {
                0 => MatchResult::SideA,
                1 => MatchResult::SideB,
                _ => MatchResult::Draw,
            };
            Match::new(Uuid::from_u128(1_000_000 + i), 1.45, 0.75, result)
        })
        .collect()
}

/// Every player deposits, bets once on each match, then withdraws; every
/// tenth player overdraws and gets frozen.
fn create_operation_log(num_players: u128, num_matches: u128) -> Vec<Operation> {
    let mut ops = Vec::new();
    for p in 0..num_players {
        let player = Uuid::from_u128(p + 1);
        ops.push(Operation::deposit(player, 10_000));
        for m in 0..num_matches {
            let side = if (p + m) % 2 == 0 { Side::A } else { Side::B };
            ops.push(Operation::bet(player, Uuid::from_u128(1_000_000 + m), 50, side));
        }
        let amount = if p % 10 == 0 { 1_000_000 } else { 100 };
        ops.push(Operation::withdraw(player, amount));
    }
    ops
}

fn bench_replay_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay_sizes");

    for num_players in [10u128, 100, 1000].iter() {
        let registry = create_registry(20);
        let ops = create_operation_log(*num_players, 20);
        group.throughput(Throughput::Elements(ops.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(num_players), &ops, |b, ops| {
            let engine = SettlementEngine::builder()
                .with_matches(registry.clone())
                .build()
                .unwrap();
            b.iter(|| black_box(engine.run(ops).unwrap()));
        });
    }

    group.finish();
}

fn bench_bets_per_player(c: &mut Criterion) {
    let mut group = c.benchmark_group("bets_per_player");

    for num_matches in [1u128, 50, 200].iter() {
        let registry = create_registry(*num_matches);
        let ops = create_operation_log(50, *num_matches);
        group.throughput(Throughput::Elements(ops.len() as u64));

        group.bench_with_input(BenchmarkId::from_parameter(num_matches), &ops, |b, ops| {
            let engine = SettlementEngine::builder()
                .with_matches(registry.clone())
                .build()
                .unwrap();
            b.iter(|| black_box(engine.run(ops).unwrap()));
        });
    }

    group.finish();
}

fn bench_text_rendering(c: &mut Criterion) {
    let engine = SettlementEngine::builder()
        .with_matches(create_registry(20))
        .build()
        .unwrap();
    let report = engine.run(&create_operation_log(1000, 20)).unwrap().report;
    let serializer = TextReportSerializer::default();

    c.bench_function("render_text_report_1000_players", |b| {
        b.iter(|| black_box(serializer.render(&report).unwrap()))
    });
}

criterion_group!(benches, bench_replay_sizes, bench_bets_per_player, bench_text_rendering);
criterion_main!(benches);
