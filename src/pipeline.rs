//! Ranking pipeline
//!
//! Refreshes each configured currency's rate history, takes its moving
//! average snapshot, and scores every cost basket against the traveler's
//! budget. One failing currency never stops the batch; it is reported in
//! [`Ranking::currencies`] and its countries land in [`Ranking::skipped`].

use crate::config::Config;
use crate::currency::CurrencyUnit;
use crate::data::rates::{moving_average, FetchStop, RateHistoryCache, RateProvider, SaveOutcome};
use crate::error::{PpiError, Result};
use crate::index::{calculate_lsb, calculate_tei, round2};
use crate::types::{Band, CostBasket, MovingAverageSnapshot, ScoreResult};
use chrono::NaiveDate;
use hashbrown::HashMap;
use serde::Serialize;

/// Moving average snapshots keyed by ISO currency code
pub type SnapshotMap = HashMap<String, MovingAverageSnapshot>;

/// Per-currency state after a refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CurrencyOutcome {
    /// A moving average is available
    Ready { periods: usize },
    /// Too few records for a moving average
    Insufficient { available: usize, required: usize },
    /// The provider stopped the backfill early; `ready` tells whether the
    /// partial history still produced a moving average
    FetchStopped { reason: String, ready: bool },
}

impl CurrencyOutcome {
    pub fn is_ready(&self) -> bool {
        matches!(
            self,
            CurrencyOutcome::Ready { .. } | CurrencyOutcome::FetchStopped { ready: true, .. }
        )
    }
}

/// What happened to one currency during a refresh
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrencyReport {
    pub currency_code: String,
    /// Records held after the refresh
    pub records: usize,
    /// Records newly fetched from the provider
    pub fetched: usize,
    /// Problems that did not stop the currency (unreadable store, failed save)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    pub outcome: CurrencyOutcome,
}

/// A cost basket that could not be scored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skipped {
    pub country_code: String,
    pub currency_code: String,
    pub reason: String,
}

/// Final output of a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    /// Scored destinations, best first
    pub results: Vec<ScoreResult>,
    pub skipped: Vec<Skipped>,
    pub currencies: Vec<CurrencyReport>,
}

/// Orchestrates cache refresh and scoring
#[derive(Debug, Clone)]
pub struct RankingPipeline {
    config: Config,
    cache: RateHistoryCache,
}

impl RankingPipeline {
    /// Create a pipeline whose cache lives in `config.cache_dir`
    pub fn new(config: Config) -> Self {
        let cache = RateHistoryCache::with_policy(config.cache_dir.clone(), config.fetch_policy());
        Self { config, cache }
    }

    /// Create a pipeline with an explicit cache
    pub fn with_cache(config: Config, cache: RateHistoryCache) -> Self {
        Self { config, cache }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &RateHistoryCache {
        &self.cache
    }

    /// Run the cache cycle for one currency: load, backfill, save, average.
    ///
    /// Without a provider the persisted history is used as-is.
    pub fn refresh_currency(
        &self,
        provider: Option<&dyn RateProvider>,
        unit: &CurrencyUnit,
        today: NaiveDate,
    ) -> (Option<MovingAverageSnapshot>, CurrencyReport) {
        let code = unit.code.as_str();
        let loaded = self.cache.load(code);
        let mut warnings: Vec<String> = loaded.warning.into_iter().collect();

        let (history, fetched, stop) = match provider {
            Some(provider) => {
                let outcome = self.cache.ensure_window(
                    provider,
                    unit,
                    loaded.history,
                    self.config.window_size,
                    today,
                );
                (outcome.history, outcome.fetched, Some(outcome.stop))
            }
            None => (loaded.history, 0, None),
        };

        if fetched > 0 {
            match self.cache.save(code, &history) {
                Ok(SaveOutcome::Saved { .. }) | Ok(SaveOutcome::Skipped) => {}
                Err(e) => {
                    let msg = format!("Failed to save {} history: {}", code, e);
                    log::warn!("{}", msg);
                    warnings.push(msg);
                }
            }
        }

        let snapshot = match moving_average(
            code,
            &history,
            self.config.window_size,
            self.config.min_periods,
        ) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("[{}] {}", code, e);
                None
            }
        };

        let outcome = match (&stop, &snapshot) {
            (Some(stop), _) if stop.is_failure() => CurrencyOutcome::FetchStopped {
                reason: stop
                    .as_error()
                    .map(|e| e.to_string())
                    .unwrap_or_else(|| format!("{:?}", stop)),
                ready: snapshot.is_some(),
            },
            (_, Some(snapshot)) => CurrencyOutcome::Ready {
                periods: snapshot.periods,
            },
            (_, None) => CurrencyOutcome::Insufficient {
                available: history.len(),
                required: self.config.min_periods.max(1),
            },
        };

        if stop == Some(FetchStop::IterationLimit) {
            log::warn!(
                "[{}] Probe limit reached with {} of {} records",
                code,
                history.len(),
                self.config.window_size
            );
        }

        let report = CurrencyReport {
            currency_code: code.to_string(),
            records: history.len(),
            fetched,
            warnings,
            outcome,
        };
        (snapshot, report)
    }

    /// Refresh every configured currency
    pub fn refresh(
        &self,
        provider: Option<&dyn RateProvider>,
        today: NaiveDate,
    ) -> (SnapshotMap, Vec<CurrencyReport>) {
        self.refresh_with(provider, today, |_| {})
    }

    /// Refresh every configured currency, calling `on_currency` as each one finishes
    pub fn refresh_with<F>(
        &self,
        provider: Option<&dyn RateProvider>,
        today: NaiveDate,
        mut on_currency: F,
    ) -> (SnapshotMap, Vec<CurrencyReport>)
    where
        F: FnMut(&CurrencyReport),
    {
        let mut snapshots = SnapshotMap::new();
        let mut reports = Vec::new();

        for unit in self.config.currency_units() {
            let (snapshot, report) = self.refresh_currency(provider, &unit, today);
            if let Some(snapshot) = snapshot {
                snapshots.insert(unit.code.clone(), snapshot);
            }
            on_currency(&report);
            reports.push(report);
        }

        (snapshots, reports)
    }

    /// Score every basket against its currency snapshot, best first
    pub fn rank(
        &self,
        baskets: &[CostBasket],
        snapshots: &SnapshotMap,
        budget: f64,
        days: u32,
    ) -> (Vec<ScoreResult>, Vec<Skipped>) {
        let mut results = Vec::with_capacity(baskets.len());
        let mut skipped = Vec::new();

        for basket in baskets {
            let currency = basket.currency_code.trim().to_uppercase();
            let Some(snapshot) = snapshots.get(&currency) else {
                log::warn!(
                    "Skipping {}: no exchange rate data for {}",
                    basket.country_code,
                    currency
                );
                skipped.push(Skipped {
                    country_code: basket.country_code.clone(),
                    currency_code: currency,
                    reason: "No exchange rate data".to_string(),
                });
                continue;
            };

            let unit = self.config.unit_for(&currency);
            results.push(score_basket(basket, &unit, snapshot, budget, days));
        }

        // stable: ties keep input order
        results.sort_by(|a, b| b.ppi_score.total_cmp(&a.ppi_score));
        (results, skipped)
    }

    /// Refresh rates and rank `baskets` in one pass
    pub fn run(
        &self,
        budget: f64,
        days: u32,
        baskets: &[CostBasket],
        provider: Option<&dyn RateProvider>,
        today: NaiveDate,
    ) -> Result<Ranking> {
        self.run_with(budget, days, baskets, provider, today, |_| {})
    }

    /// [`RankingPipeline::run`] with a per-currency progress callback
    pub fn run_with<F>(
        &self,
        budget: f64,
        days: u32,
        baskets: &[CostBasket],
        provider: Option<&dyn RateProvider>,
        today: NaiveDate,
        on_currency: F,
    ) -> Result<Ranking>
    where
        F: FnMut(&CurrencyReport),
    {
        validate_trip(budget, days)?;

        let (snapshots, currencies) = self.refresh_with(provider, today, on_currency);
        let (results, skipped) = self.rank(baskets, &snapshots, budget, days);

        log::info!(
            "Ranked {} destinations ({} skipped)",
            results.len(),
            skipped.len()
        );
        Ok(Ranking {
            results,
            skipped,
            currencies,
        })
    }
}

/// Reject a non-positive or non-finite budget and a zero-day trip
pub fn validate_trip(budget: f64, days: u32) -> Result<()> {
    if !budget.is_finite() || budget <= 0.0 {
        return Err(PpiError::ValidationError(format!(
            "Budget must be a positive number, got {}",
            budget
        )));
    }
    if days == 0 {
        return Err(PpiError::ValidationError(
            "Trip duration must be at least 1 day".to_string(),
        ));
    }
    Ok(())
}

/// Score a single basket
pub fn score_basket(
    basket: &CostBasket,
    unit: &CurrencyUnit,
    snapshot: &MovingAverageSnapshot,
    budget: f64,
    days: u32,
) -> ScoreResult {
    let current_rate = unit.normalize(snapshot.latest_rate);
    let ma_rate = unit.normalize(snapshot.ma_rate);

    let accommodation_local = if current_rate > 0.0 {
        basket.accommodation_cost_krw / current_rate
    } else {
        0.0
    };

    let lsb_local = calculate_lsb(basket.meal_cost, basket.drink_cost, accommodation_local);
    let tei = calculate_tei(budget, days, lsb_local, current_rate, ma_rate);

    if let Some(reason) = tei.error() {
        log::warn!("{}: {}", basket.country_code, reason);
    }

    ScoreResult {
        country_code: basket.country_code.clone(),
        currency_code: unit.code.clone(),
        ppi_score: tei.tei_score(),
        trend_factor_pct: tei.trend_impact_pct(),
        lsb_local: round2(lsb_local),
        exchange_rate: current_rate,
        band: Band::classify(tei.tei_score()),
        invalid_reason: tei.error().map(|r| r.to_string()),
    }
}
