//! Append-only per-currency rate history store
//!
//! Each currency lives in its own CSV file (`exchange_data_<CODE>.csv`) under
//! an explicit cache directory. Files are rewritten whole on save, deduplicated
//! by date and sorted oldest first, so re-saving a loaded history leaves the
//! file byte-for-byte unchanged.

use super::history::RateHistory;
use super::provider::{ProviderDay, RateProvider};
use crate::currency::CurrencyUnit;
use crate::error::{PpiError, Result};
use crate::types::{format_date, RateRecord};
use chrono::{Duration as ChronoDuration, NaiveDate};
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name prefix for per-currency stores
pub const FILE_PREFIX: &str = "exchange_data_";

/// Default bound on provider probes per currency
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Default pause between provider probes
pub const DEFAULT_PROBE_DELAY_MS: u64 = 100;

/// How hard to try when backfilling missing days
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchPolicy {
    /// Maximum provider calls for one currency
    pub max_iterations: usize,
    /// Pause after every provider call
    pub probe_delay: Duration,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            probe_delay: Duration::from_millis(DEFAULT_PROBE_DELAY_MS),
        }
    }
}

/// Result of [`RateHistoryCache::load`]
#[derive(Debug, Clone, Default)]
pub struct LoadedHistory {
    pub history: RateHistory,
    /// Set when an existing store could not be read and was treated as empty
    pub warning: Option<String>,
}

/// Why a backfill loop ended
#[derive(Debug, Clone, PartialEq)]
pub enum FetchStop {
    /// History already covered the window; the provider was not called
    AlreadyFull,
    /// Enough new records were collected
    WindowFilled,
    /// Provider reported no data or an exhausted quota
    QuotaExhausted { date: NaiveDate },
    /// Network failure, timeout, or malformed response
    ProviderUnavailable(String),
    /// Probe budget spent before the window was filled
    IterationLimit,
}

impl FetchStop {
    /// Provider-side failure, as an error value for reporting
    pub fn as_error(&self) -> Option<PpiError> {
        match self {
            FetchStop::QuotaExhausted { date } => Some(PpiError::QuotaExhausted {
                date: format_date(*date),
            }),
            FetchStop::ProviderUnavailable(msg) => Some(PpiError::ProviderUnavailable(msg.clone())),
            _ => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            FetchStop::QuotaExhausted { .. } | FetchStop::ProviderUnavailable(_)
        )
    }
}

/// Result of [`RateHistoryCache::ensure_window`]
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// Existing records followed by newly fetched ones
    pub history: RateHistory,
    /// Number of new records
    pub fetched: usize,
    pub stop: FetchStop,
}

/// Result of [`RateHistoryCache::save`]
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Saved { path: PathBuf, records: usize },
    /// Nothing to write
    Skipped,
}

/// Rate history store rooted at an explicit directory
#[derive(Debug, Clone)]
pub struct RateHistoryCache {
    dir: PathBuf,
    policy: FetchPolicy,
}

impl RateHistoryCache {
    /// Create a cache with the default fetch policy
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            policy: FetchPolicy::default(),
        }
    }

    /// Create a cache with a custom fetch policy
    pub fn with_policy(dir: impl Into<PathBuf>, policy: FetchPolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    /// Store path for a currency
    pub fn path_for(&self, currency: &str) -> PathBuf {
        let safe: String = currency
            .trim()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        self.dir.join(format!("{}{}.csv", FILE_PREFIX, safe))
    }

    /// Read the persisted history for `currency`.
    ///
    /// A missing store yields an empty history. An unreadable store also yields
    /// an empty history, with a warning.
    pub fn load(&self, currency: &str) -> LoadedHistory {
        let path = self.path_for(currency);
        if !path.exists() {
            return LoadedHistory::default();
        }

        match read_records(&path) {
            Ok(records) => LoadedHistory {
                history: RateHistory::from_records(records),
                warning: None,
            },
            Err(e) => {
                let warning = format!(
                    "Error loading {}: {}. Starting with empty history.",
                    path.display(),
                    e
                );
                log::warn!("{}", warning);
                LoadedHistory {
                    history: RateHistory::new(),
                    warning: Some(warning),
                }
            }
        }
    }

    /// Backfill missing recent business days until `history` holds `window_size` records.
    ///
    /// Walks backward from the day before `today`, skipping dates already known.
    /// Days on which the provider lists no quote for the currency (weekends,
    /// holidays) do not count toward the window.
    pub fn ensure_window(
        &self,
        provider: &dyn RateProvider,
        unit: &CurrencyUnit,
        history: RateHistory,
        window_size: usize,
        today: NaiveDate,
    ) -> FetchOutcome {
        if history.len() >= window_size {
            log::info!(
                "[{}] {} records cached, skipping provider",
                unit.code,
                history.len()
            );
            return FetchOutcome {
                history,
                fetched: 0,
                stop: FetchStop::AlreadyFull,
            };
        }

        let needed = window_size - history.len();
        let known = history.dates();
        let provider_code = unit.provider_code();
        log::info!(
            "[{}] Fetching up to {} business days from {}",
            unit.code,
            needed,
            provider.name()
        );

        let mut new_records = Vec::with_capacity(needed);
        let mut stop = FetchStop::IterationLimit;
        let mut probes = 0;
        let mut offset = 0i64;

        while probes < self.policy.max_iterations {
            if new_records.len() >= needed {
                stop = FetchStop::WindowFilled;
                break;
            }

            offset += 1;
            let date = today - ChronoDuration::days(offset);
            if known.contains(&date) {
                continue;
            }

            probes += 1;
            match provider.daily_rates(date) {
                Ok(ProviderDay::Exhausted) => {
                    log::warn!(
                        "[{}] Provider quota reached or no data on {}",
                        unit.code,
                        format_date(date)
                    );
                    stop = FetchStop::QuotaExhausted { date };
                    break;
                }
                Ok(day) => match day.rate_for(&provider_code, date) {
                    Ok(Some(rate)) => {
                        new_records.push(RateRecord::new(unit.code.clone(), date, rate));
                        log::debug!(
                            "[{}] {} = {} ({}/{})",
                            unit.code,
                            format_date(date),
                            rate,
                            new_records.len(),
                            needed
                        );
                    }
                    Ok(None) => {
                        log::debug!("[{}] No quote on {}", unit.code, format_date(date));
                    }
                    Err(e) => {
                        log::warn!("[{}] Malformed quote on {}: {}", unit.code, format_date(date), e);
                        stop = FetchStop::ProviderUnavailable(e.to_string());
                        break;
                    }
                },
                Err(e) => {
                    log::warn!("[{}] Request for {} failed: {}", unit.code, format_date(date), e);
                    stop = FetchStop::ProviderUnavailable(e.to_string());
                    break;
                }
            }

            if !self.policy.probe_delay.is_zero() {
                std::thread::sleep(self.policy.probe_delay);
            }
        }

        if stop == FetchStop::IterationLimit && new_records.len() >= needed {
            stop = FetchStop::WindowFilled;
        }

        let fetched = new_records.len();
        let mut merged = history;
        merged.extend(new_records);

        FetchOutcome {
            history: merged,
            fetched,
            stop,
        }
    }

    /// Persist `history`, replacing the previous store for `currency`.
    ///
    /// The file is written to a sibling temp path and renamed into place.
    pub fn save(&self, currency: &str, history: &RateHistory) -> Result<SaveOutcome> {
        if history.is_empty() {
            log::info!("[{}] No data to save", currency);
            return Ok(SaveOutcome::Skipped);
        }

        let mut deduped = history.clone();
        deduped.dedup_keep_first();
        let records = deduped.ascending();

        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(currency);
        let tmp = path.with_extension("csv.tmp");

        {
            let mut writer = WriterBuilder::new().has_headers(true).from_path(&tmp)?;
            for record in &records {
                writer.serialize(record)?;
            }
            writer.flush()?;
        }
        fs::rename(&tmp, &path)?;

        log::info!(
            "[{}] Saved {} days to {}",
            currency,
            records.len(),
            path.display()
        );
        Ok(SaveOutcome::Saved {
            path,
            records: records.len(),
        })
    }
}

fn read_records(path: &Path) -> Result<Vec<RateRecord>> {
    let mut reader = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut records = Vec::new();

    for (idx, row) in reader.deserialize::<RateRecord>().enumerate() {
        let record = row?;
        if !(record.rate > 0.0) || !record.rate.is_finite() {
            return Err(PpiError::DataError(format!(
                "Non-positive rate {} at row {}",
                record.rate,
                idx + 1
            )));
        }
        records.push(record);
    }

    Ok(records)
}
