//! Travel Efficiency Index (TEI), the purchasing power score
//!
//! The score is the ratio of the traveler's daily home-currency budget to the
//! home-currency cost of one day's survival basket. The basket is converted
//! through a trend-adjusted rate: a currency trading below its moving average
//! is priced as if the discount continues.

use super::trend::trend_factor;
use serde::Serialize;
use std::fmt;

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Why a TEI calculation was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum InvalidReason {
    /// Non-positive duration or basket cost
    DurationOrCost,
    /// Converted basket cost is non-positive, or a metric is not finite
    CalculatedCost,
}

impl InvalidReason {
    pub fn message(&self) -> &'static str {
        match self {
            InvalidReason::DurationOrCost => "Invalid duration or cost",
            InvalidReason::CalculatedCost => "Invalid calculated cost",
        }
    }
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Successful TEI metrics, all rounded to two decimals
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeiScore {
    pub tei_score: f64,
    /// Trend factor expressed in percent
    pub trend_impact_pct: f64,
    pub is_undervalued: bool,
    pub adjusted_rate: f64,
}

/// Outcome of [`calculate_tei`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TeiResult {
    Scored(TeiScore),
    Invalid(InvalidReason),
}

impl TeiResult {
    /// Score, or `0.0` for a rejected calculation
    pub fn tei_score(&self) -> f64 {
        match self {
            TeiResult::Scored(score) => score.tei_score,
            TeiResult::Invalid(_) => 0.0,
        }
    }

    /// Trend impact in percent, or `0.0` for a rejected calculation
    pub fn trend_impact_pct(&self) -> f64 {
        match self {
            TeiResult::Scored(score) => score.trend_impact_pct,
            TeiResult::Invalid(_) => 0.0,
        }
    }

    pub fn is_undervalued(&self) -> bool {
        matches!(self, TeiResult::Scored(score) if score.is_undervalued)
    }

    pub fn error(&self) -> Option<InvalidReason> {
        match self {
            TeiResult::Scored(_) => None,
            TeiResult::Invalid(reason) => Some(*reason),
        }
    }
}

/// Compute the purchasing power score.
///
/// * `budget` - total trip budget in home currency
/// * `duration` - trip length in days
/// * `local_daily_cost` - LSB in local currency
/// * `current_rate` - home currency per local unit
/// * `ma_rate` - moving average of `current_rate`
pub fn calculate_tei(
    budget: f64,
    duration: u32,
    local_daily_cost: f64,
    current_rate: f64,
    ma_rate: f64,
) -> TeiResult {
    if duration == 0 || !(local_daily_cost > 0.0) {
        return TeiResult::Invalid(InvalidReason::DurationOrCost);
    }

    let daily_budget_home = budget / duration as f64;

    let trend = trend_factor(current_rate, ma_rate);
    let adjusted_rate = current_rate * (1.0 + trend);

    let local_cost_home = local_daily_cost * adjusted_rate;
    if !(local_cost_home > 0.0) {
        return TeiResult::Invalid(InvalidReason::CalculatedCost);
    }

    let purchasing_power = daily_budget_home / local_cost_home;

    let score = TeiScore {
        tei_score: round2(purchasing_power),
        trend_impact_pct: round2(trend * 100.0),
        is_undervalued: trend < 0.0,
        adjusted_rate: round2(adjusted_rate),
    };
    if [score.tei_score, score.trend_impact_pct, score.adjusted_rate]
        .iter()
        .any(|v| !v.is_finite())
    {
        return TeiResult::Invalid(InvalidReason::CalculatedCost);
    }

    TeiResult::Scored(score)
}
