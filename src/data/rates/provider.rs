//! Daily exchange rate provider
//!
//! The default provider is the Korea Eximbank `exchangeJSON` API, which
//! returns every quoted currency for one calendar day in a single response.

use crate::error::{PpiError, Result};
use crate::types::format_date;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::time::Duration;

/// Provider status code for a successful lookup
pub const STATUS_SUCCESS: i32 = 1;

/// Provider status code for an unknown service code
pub const STATUS_BAD_SERVICE_CODE: i32 = 2;

/// Provider status code for a rejected API key
pub const STATUS_BAD_AUTH_KEY: i32 = 3;

/// Provider status code meaning "no data for this date / daily quota used up"
pub const STATUS_NO_DATA: i32 = 4;

/// Default API endpoint
pub const EXIM_BASE_URL: &str = "https://oapi.koreaexim.go.kr/site/program/financial/exchangeJSON";

/// Default service code (daily exchange rates)
pub const EXIM_SERVICE_CODE: &str = "AP01";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// One entry of the provider's per-day currency list
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProviderQuote {
    #[serde(default)]
    pub result: i32,
    #[serde(default)]
    pub cur_unit: String,
    #[serde(default)]
    pub cur_nm: String,
    /// Base dealing rate, locale formatted (e.g. "1,350.50")
    #[serde(default)]
    pub deal_bas_r: String,
}

impl ProviderQuote {
    pub fn new(cur_unit: impl Into<String>, deal_bas_r: impl Into<String>) -> Self {
        Self {
            result: 1,
            cur_unit: cur_unit.into(),
            cur_nm: String::new(),
            deal_bas_r: deal_bas_r.into(),
        }
    }
}

/// Provider response for one calendar day
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderDay {
    /// Quotes for the day (empty on weekends and holidays)
    Quotes(Vec<ProviderQuote>),
    /// No data for the date, or the daily quota is exhausted
    Exhausted,
}

impl ProviderDay {
    /// Classify a raw response list by the status code of its first entry
    pub fn from_quotes(quotes: Vec<ProviderQuote>) -> Result<Self> {
        match quotes.first().map(|q| q.result) {
            Some(STATUS_NO_DATA) => Ok(ProviderDay::Exhausted),
            Some(STATUS_BAD_SERVICE_CODE) => Err(PpiError::ProviderUnavailable(format!(
                "Provider rejected the service code (result {})",
                STATUS_BAD_SERVICE_CODE
            ))),
            Some(STATUS_BAD_AUTH_KEY) => Err(PpiError::ProviderUnavailable(format!(
                "Provider rejected the API key (result {})",
                STATUS_BAD_AUTH_KEY
            ))),
            Some(code) if code != STATUS_SUCCESS => {
                log::warn!("Unexpected provider result code {}", code);
                Ok(ProviderDay::Quotes(quotes))
            }
            _ => Ok(ProviderDay::Quotes(quotes)),
        }
    }

    /// Rate quoted for `provider_code` on `date`.
    ///
    /// `Ok(None)` means the day lists no usable quote for the currency
    /// (weekend, holiday). An exhausted day is a [`PpiError::QuotaExhausted`].
    pub fn rate_for(&self, provider_code: &str, date: NaiveDate) -> Result<Option<f64>> {
        let quotes = match self {
            ProviderDay::Quotes(quotes) => quotes,
            ProviderDay::Exhausted => {
                return Err(PpiError::QuotaExhausted {
                    date: format_date(date),
                })
            }
        };

        match quotes
            .iter()
            .find(|q| q.cur_unit == provider_code && !q.deal_bas_r.trim().is_empty())
        {
            Some(quote) => parse_rate_string(&quote.deal_bas_r).map(Some),
            None => Ok(None),
        }
    }
}

/// Parse a locale formatted decimal such as `"1,350.50"`
pub fn parse_rate_string(raw: &str) -> Result<f64> {
    let cleaned: String = raw.chars().filter(|c| *c != ',' && !c.is_whitespace()).collect();
    let rate: f64 = cleaned
        .parse()
        .map_err(|e| PpiError::ParseError(format!("Invalid rate '{}': {}", raw, e)))?;

    if !rate.is_finite() || rate <= 0.0 {
        return Err(PpiError::ParseError(format!(
            "Rate must be positive, got: {}",
            raw
        )));
    }
    Ok(rate)
}

/// Source of daily exchange rates
pub trait RateProvider {
    /// Fetch every quoted currency for `date`
    fn daily_rates(&self, date: NaiveDate) -> Result<ProviderDay>;

    /// Provider name for logs
    fn name(&self) -> &str;
}

/// Immutable connection settings for [`EximRateProvider`]
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub service_code: String,
    pub timeout: Duration,
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: EXIM_BASE_URL.to_string(),
            service_code: EXIM_SERVICE_CODE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

/// Korea Eximbank daily rate client (blocking)
pub struct EximRateProvider {
    config: ProviderConfig,
    client: Client,
}

impl EximRateProvider {
    /// Create a new provider; fails if the API key is blank
    pub fn new(config: ProviderConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(PpiError::ConfigError(
                "Rate provider API key is empty".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PpiError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl RateProvider for EximRateProvider {
    fn daily_rates(&self, date: NaiveDate) -> Result<ProviderDay> {
        let search_date = format_date(date);
        log::debug!("Requesting {} rates for {}", self.name(), search_date);

        let response = self
            .client
            .get(&self.config.base_url)
            .query(&[
                ("authkey", self.config.api_key.as_str()),
                ("searchdate", search_date.as_str()),
                ("data", self.config.service_code.as_str()),
            ])
            .send()
            .map_err(|e| PpiError::ProviderUnavailable(format!("HTTP request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(PpiError::ProviderUnavailable(format!(
                "Provider returned error: {}",
                response.status()
            )));
        }

        let quotes: Vec<ProviderQuote> = response
            .json()
            .map_err(|e| PpiError::ProviderUnavailable(format!("JSON parse error: {}", e)))?;

        ProviderDay::from_quotes(quotes)
    }

    fn name(&self) -> &str {
        "koreaexim"
    }
}
