//! In-memory rate history and moving averages

use crate::error::{PpiError, Result};
use crate::types::{MovingAverageSnapshot, RateRecord};
use chrono::NaiveDate;
use statrs::statistics::Statistics;
use std::collections::HashSet;

/// Daily rates for a single currency
///
/// Records are kept in insertion order; use [`RateHistory::ascending`] or
/// [`RateHistory::descending`] for a date-ordered view.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateHistory {
    records: Vec<RateRecord>,
}

impl RateHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<RateRecord>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[RateRecord] {
        &self.records
    }

    pub fn push(&mut self, record: RateRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = RateRecord>) {
        self.records.extend(records);
    }

    /// Dates already known
    pub fn dates(&self) -> HashSet<NaiveDate> {
        self.records.iter().map(|r| r.date).collect()
    }

    /// Drop later records whose date was already seen
    pub fn dedup_keep_first(&mut self) {
        let mut seen = HashSet::with_capacity(self.records.len());
        self.records.retain(|r| seen.insert(r.date));
    }

    /// Records sorted oldest first (stable)
    pub fn ascending(&self) -> Vec<RateRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by_key(|r| r.date);
        sorted
    }

    /// Records sorted newest first (stable)
    pub fn descending(&self) -> Vec<RateRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));
        sorted
    }
}

/// Average the most recent `window_size` rates.
///
/// Fewer than `window_size` records still produce a (partial-window) average
/// as long as at least `min_periods` are present.
pub fn moving_average(
    currency: &str,
    history: &RateHistory,
    window_size: usize,
    min_periods: usize,
) -> Result<MovingAverageSnapshot> {
    let required = min_periods.max(1);
    if history.len() < required {
        return Err(PpiError::InsufficientData {
            currency: currency.to_string(),
            available: history.len(),
            required,
        });
    }

    let sorted = history.ascending();
    let window = window_size.max(1).min(sorted.len());
    let recent = &sorted[sorted.len() - window..];

    let ma_rate = recent.iter().map(|r| r.rate).mean();

    // `required >= 1` guarantees a last element
    let latest = &sorted[sorted.len() - 1];

    Ok(MovingAverageSnapshot {
        currency_code: currency.to_string(),
        latest_date: latest.date,
        latest_rate: latest.rate,
        ma_rate,
        periods: window,
    })
}
