//! Worked examples for the index calculations

use approx::assert_relative_eq;
use proptest::prelude::*;
use travel_ppi::index::{calculate_lsb, calculate_tei, trend_factor, InvalidReason};

#[test]
fn test_lsb_weights() {
    assert_eq!(calculate_lsb(5000.0, 4000.0, 50000.0), 73000.0);
    assert_eq!(calculate_lsb(-100.0, 4000.0, 50000.0), 0.0);
    assert_eq!(calculate_lsb(0.0, 0.0, 0.0), 0.0);
}

#[test]
fn test_trend_examples() {
    assert_relative_eq!(trend_factor(850.0, 1000.0), -0.15, epsilon = 1e-12);
    assert_relative_eq!(trend_factor(1100.0, 1000.0), 0.10, epsilon = 1e-12);
    assert_eq!(trend_factor(1234.5, 1234.5), 0.0);
    assert_eq!(trend_factor(1234.5, 0.0), 0.0);
}

#[test]
fn test_tei_examples() {
    let neutral = calculate_tei(1_000_000.0, 5, 100.0, 1000.0, 1000.0);
    assert_eq!(neutral.tei_score(), 2.0);
    assert!(!neutral.is_undervalued());

    let cheap = calculate_tei(1_000_000.0, 5, 100.0, 900.0, 1000.0);
    assert_eq!(cheap.tei_score(), 2.47);
    assert!(cheap.is_undervalued());

    let invalid = calculate_tei(1_000_000.0, 0, 100.0, 1000.0, 1000.0);
    assert_eq!(invalid.tei_score(), 0.0);
    assert_eq!(invalid.error(), Some(InvalidReason::DurationOrCost));
}

#[test]
fn test_lsb_feeds_tei() {
    // Tokyo-like basket: 480 JPY meal, 500 JPY drink, 15,000 JPY room at 9.0 KRW/JPY
    let lsb = calculate_lsb(480.0, 500.0, 15_000.0);
    assert_eq!(lsb, 17_440.0);

    let result = calculate_tei(2_000_000.0, 5, lsb, 9.0, 9.0);
    // 400,000 / (17,440 * 9.0)
    assert_eq!(result.tei_score(), 2.55);
    assert_eq!(result.trend_impact_pct(), 0.0);
}

proptest! {
    #[test]
    fn prop_trend_zero_cases(rate in 0.0001f64..1e6) {
        prop_assert_eq!(trend_factor(rate, rate), 0.0);
        prop_assert_eq!(trend_factor(rate, 0.0), 0.0);
    }

    #[test]
    fn prop_lsb_linear(meal in 0.0f64..1e6, drink in 0.0f64..1e6, room in 0.0f64..1e7) {
        let lsb = calculate_lsb(meal, drink, room);
        prop_assert!((lsb - (3.0 * meal + 2.0 * drink + room)).abs() < 1e-6);
    }

    #[test]
    fn prop_lsb_negative_is_zero(meal in -1e6f64..-0.001, drink in 0.0f64..1e6, room in 0.0f64..1e7) {
        prop_assert_eq!(calculate_lsb(meal, drink, room), 0.0);
        prop_assert_eq!(calculate_lsb(drink, meal, room), 0.0);
        prop_assert_eq!(calculate_lsb(drink, room, meal), 0.0);
    }
}
