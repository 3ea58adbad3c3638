use criterion::{black_box, criterion_group, criterion_main, Criterion};

use guildxp::progression::{Change, Direction, ProgressCalculator};
use guildxp::{Curve, GrowthConfig, MemberRecord};

fn curve_benchmarks(c: &mut Criterion) {
    for (name, config) in [
        ("linear", GrowthConfig::linear(300.0)),
        ("quadratic", GrowthConfig::quadratic(30.0)),
        ("cubic", GrowthConfig::cubic()),
    ] {
        let curve = Curve::new(config);
        c.bench_function(&format!("level_for_xp_{}", name), |b| {
            b.iter(|| curve.level_for_xp(black_box(123_456_789)))
        });
    }

    let calc = ProgressCalculator::default();
    let member = calc.record_for_xp(50_000);
    c.bench_function("compute_delta_add_levels", |b| {
        b.iter(|| calc.compute_delta(black_box(member), Change::Levels(3), Direction::Add))
    });
    c.bench_function("compute_delta_subtract_xp", |b| {
        b.iter(|| calc.compute_delta(black_box(MemberRecord::new(900, 5)), Change::Xp(1_000), Direction::Subtract))
    });
}

criterion_group!(benches, curve_benchmarks);
criterion_main!(benches);
