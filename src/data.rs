//! Data providers and persisted state
//!
//! - **rates**: rate provider, per-currency rate history cache, moving averages
//! - **costs**: destination cost baskets from price indices

pub mod costs;
pub mod rates;

pub use costs::{
    baskets_from_entries, clean_number, load_cost_file, merge_price_indices, read_cost_file,
    write_cost_file, CostEntry, PriceIndexPaths,
};
pub use rates::{
    moving_average, EximRateProvider, FetchOutcome, FetchPolicy, FetchStop, LoadedHistory,
    ProviderConfig, ProviderDay, ProviderQuote, RateHistory, RateHistoryCache, RateProvider,
    SaveOutcome,
};
