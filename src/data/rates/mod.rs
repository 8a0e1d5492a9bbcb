//! Exchange rate history
//!
//! # Components
//!
//! - **provider**: `RateProvider` trait and the Korea Eximbank HTTP client
//! - **history**: in-memory rate history and moving average snapshots
//! - **cache**: append-only per-currency CSV store that backfills missing days
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use travel_ppi::data::rates::{moving_average, RateHistory};
//! use travel_ppi::types::RateRecord;
//!
//! let day = |d| NaiveDate::from_ymd_opt(2025, 12, d).unwrap();
//! let history = RateHistory::from_records(vec![
//!     RateRecord::new("USD", day(1), 1300.0),
//!     RateRecord::new("USD", day(2), 1310.0),
//!     RateRecord::new("USD", day(3), 1320.0),
//! ]);
//!
//! let snapshot = moving_average("USD", &history, 50, 3).unwrap();
//! assert_eq!(snapshot.latest_rate, 1320.0);
//! assert_eq!(snapshot.ma_rate, 1310.0);
//! ```

pub mod cache;
pub mod history;
pub mod provider;

pub use cache::{FetchOutcome, FetchPolicy, FetchStop, LoadedHistory, RateHistoryCache, SaveOutcome};
pub use history::{moving_average, RateHistory};
pub use provider::{
    parse_rate_string, EximRateProvider, ProviderConfig, ProviderDay, ProviderQuote, RateProvider,
};
