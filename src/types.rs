//! Core records shared across the crate

use crate::error::{PpiError, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Calendar day key format used by the provider and the rate cache
pub const DATE_FORMAT: &str = "%Y%m%d";

/// Home-currency amount
pub type Money = f64;

/// Home-currency per foreign unit
pub type Rate = f64;

/// Format a calendar day as `YYYYMMDD`
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Parse a `YYYYMMDD` calendar day
pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .map_err(|e| PpiError::ParseError(format!("Invalid date '{}': {}", raw, e)))
}

/// Serde adapter for `YYYYMMDD` dates
pub mod yyyymmdd {
    use super::DATE_FORMAT;
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Daily cost basket for one destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBasket {
    pub country_code: String,
    pub currency_code: String,
    /// One meal, local currency
    pub meal_cost: Money,
    /// One drink, local currency
    pub drink_cost: Money,
    /// One night of lodging, home currency
    pub accommodation_cost_krw: Money,
}

impl CostBasket {
    pub fn new(
        country_code: impl Into<String>,
        currency_code: impl Into<String>,
        meal_cost: Money,
        drink_cost: Money,
        accommodation_cost_krw: Money,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            currency_code: currency_code.into(),
            meal_cost,
            drink_cost,
            accommodation_cost_krw,
        }
    }
}

/// One day's exchange rate for one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateRecord {
    #[serde(with = "yyyymmdd")]
    pub date: NaiveDate,
    pub currency_code: String,
    /// Home currency per quoted unit (per 100 units for scaled currencies)
    pub rate: Rate,
}

impl RateRecord {
    pub fn new(currency_code: impl Into<String>, date: NaiveDate, rate: Rate) -> Self {
        Self {
            date,
            currency_code: currency_code.into(),
            rate,
        }
    }
}

/// Latest rate paired with its moving average
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSnapshot {
    pub currency_code: String,
    #[serde(with = "yyyymmdd")]
    pub latest_date: NaiveDate,
    pub latest_rate: Rate,
    pub ma_rate: Rate,
    /// Number of records the average was taken over
    pub periods: usize,
}

/// Affordability band of a score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Plenty,
    Safe,
    Tight,
    Short,
}

impl Band {
    /// Classify a PPI score
    pub fn classify(score: f64) -> Self {
        if score >= 1.5 {
            Band::Plenty
        } else if score >= 1.0 {
            Band::Safe
        } else if score >= 0.8 {
            Band::Tight
        } else {
            Band::Short
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Band::Plenty => "plenty",
            Band::Safe => "safe",
            Band::Tight => "tight",
            Band::Short => "short",
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Scored destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub country_code: String,
    pub currency_code: String,
    pub ppi_score: f64,
    pub trend_factor_pct: f64,
    pub lsb_local: f64,
    /// Normalized spot rate, home currency per single foreign unit
    pub exchange_rate: Rate,
    pub band: Band,
    /// Set when the score was forced to zero by a calculation guard
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub invalid_reason: Option<String>,
}
