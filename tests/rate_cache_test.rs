//! Integration tests for the rate history cache
//!
//! Each test gets its own temporary cache directory.

use chrono::NaiveDate;
use std::fs;
use tempfile::TempDir;
use travel_ppi::data::{moving_average, RateHistory, RateHistoryCache, SaveOutcome};
use travel_ppi::types::RateRecord;

fn day(m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, m, d).unwrap()
}

#[test]
fn test_round_trip_dedups_and_sorts() {
    let dir = TempDir::new().unwrap();
    let cache = RateHistoryCache::new(dir.path());

    let history = RateHistory::from_records(vec![
        RateRecord::new("USD", day(12, 3), 1372.0),
        RateRecord::new("USD", day(12, 1), 1365.5),
        RateRecord::new("USD", day(12, 2), 1369.25),
        RateRecord::new("USD", day(12, 1), 9999.0),
    ]);

    let outcome = cache.save("USD", &history).unwrap();
    assert!(matches!(outcome, SaveOutcome::Saved { records: 3, .. }));

    let loaded = cache.load("USD");
    assert!(loaded.warning.is_none());
    let pairs: Vec<_> = loaded
        .history
        .records()
        .iter()
        .map(|r| (r.date, r.rate))
        .collect();
    assert_eq!(
        pairs,
        vec![(day(12, 1), 1365.5), (day(12, 2), 1369.25), (day(12, 3), 1372.0)]
    );
}

#[test]
fn test_resave_is_byte_identical() {
    let dir = TempDir::new().unwrap();
    let cache = RateHistoryCache::new(dir.path());

    let history = RateHistory::from_records(vec![
        RateRecord::new("JPY", day(11, 28), 948.21),
        RateRecord::new("JPY", day(12, 1), 951.7),
        RateRecord::new("JPY", day(11, 27), 945.0),
    ]);
    cache.save("JPY", &history).unwrap();
    let first = fs::read(cache.path_for("JPY")).unwrap();

    let loaded = cache.load("JPY");
    cache.save("JPY", &loaded.history).unwrap();
    let second = fs::read(cache.path_for("JPY")).unwrap();

    assert_eq!(first, second);
    assert!(String::from_utf8(first)
        .unwrap()
        .starts_with("date,currency_code,rate\n20251127,JPY,945"));
}

#[test]
fn test_caches_are_isolated() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();

    let history = RateHistory::from_records(vec![RateRecord::new("EUR", day(12, 1), 1530.0)]);
    RateHistoryCache::new(a.path()).save("EUR", &history).unwrap();

    assert_eq!(RateHistoryCache::new(a.path()).load("EUR").history.len(), 1);
    assert!(RateHistoryCache::new(b.path()).load("EUR").history.is_empty());
}

#[test]
fn test_moving_average_over_loaded_history() {
    let dir = TempDir::new().unwrap();
    let cache = RateHistoryCache::new(dir.path());

    let records: Vec<_> = (1..=10)
        .map(|d| RateRecord::new("USD", day(12, d), 1300.0 + d as f64))
        .collect();
    cache
        .save("USD", &RateHistory::from_records(records))
        .unwrap();

    let history = cache.load("USD").history;
    let snapshot = moving_average("USD", &history, 4, 3).unwrap();

    assert_eq!(snapshot.latest_date, day(12, 10));
    assert_eq!(snapshot.latest_rate, 1310.0);
    // mean of 1307..=1310
    assert_eq!(snapshot.ma_rate, 1308.5);
    assert_eq!(snapshot.periods, 4);
}
