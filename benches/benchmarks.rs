use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use travel_ppi::{
    config::Config,
    data::{moving_average, RateHistory},
    index::{calculate_lsb, calculate_tei},
    pipeline::{RankingPipeline, SnapshotMap},
    types::{CostBasket, MovingAverageSnapshot, RateRecord},
};

fn benchmark_tei(c: &mut Criterion) {
    c.bench_function("tei_10000", |b| {
        b.iter(|| {
            let mut total = 0.0;
            for i in 0..10_000 {
                let lsb = calculate_lsb(500.0, 400.0, 6000.0 + i as f64);
                total += calculate_tei(
                    black_box(2_000_000.0),
                    5,
                    lsb,
                    black_box(9.0),
                    black_box(9.5),
                )
                .tei_score();
            }
            total
        });
    });
}

fn benchmark_moving_average(c: &mut Criterion) {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let history = RateHistory::from_records(
        (0..500)
            .rev()
            .map(|i| RateRecord::new("USD", start + Duration::days(i), 1300.0 + (i % 17) as f64))
            .collect(),
    );

    c.bench_function("moving_average_500_records", |b| {
        b.iter(|| moving_average("USD", black_box(&history), 50, 5));
    });
}

fn benchmark_rank(c: &mut Criterion) {
    let config = Config::default();
    let latest_date = NaiveDate::from_ymd_opt(2025, 12, 9).unwrap();
    let mut snapshots = SnapshotMap::new();
    for unit in config.currency_units() {
        snapshots.insert(
            unit.code.clone(),
            MovingAverageSnapshot {
                currency_code: unit.code.clone(),
                latest_date,
                latest_rate: 1000.0,
                ma_rate: 1010.0,
                periods: 50,
            },
        );
    }
    let baskets: Vec<_> = config
        .destinations
        .iter()
        .map(|d| CostBasket::new(d.country.clone(), d.currency.clone(), 10.0, 5.0, 150_000.0))
        .collect();
    let pipeline = RankingPipeline::new(config);

    c.bench_function("rank_default_destinations", |b| {
        b.iter(|| pipeline.rank(black_box(&baskets), &snapshots, 2_000_000.0, 5));
    });
}

criterion_group!(benches, benchmark_tei, benchmark_moving_average, benchmark_rank);
criterion_main!(benches);
