//! # travel_ppi
//!
//! Travel purchasing power index: ranks destinations by how far a traveler's
//! budget stretches once a standard daily cost basket is converted through a
//! trend-adjusted exchange rate.
//!
//! Daily rates are fetched from a rate provider into an append-only
//! per-currency cache; a moving average over that history yields the trend.
//!
//! ## Example
//!
//! ```rust,no_run
//! use chrono::Local;
//! use travel_ppi::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let config = Config::load(None)?;
//!     let provider = EximRateProvider::new(config.provider_config()?)?;
//!     let baskets = load_cost_file(std::path::Path::new("result.json"), &config)?;
//!
//!     let pipeline = RankingPipeline::new(config);
//!     let ranking = pipeline.run(
//!         2_000_000.0,
//!         5,
//!         &baskets,
//!         Some(&provider),
//!         Local::now().date_naive(),
//!     )?;
//!
//!     for result in &ranking.results {
//!         println!("{} {:.2} {}", result.country_code, result.ppi_score, result.band);
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod currency;
pub mod data;
pub mod error;
pub mod index;
pub mod pipeline;
pub mod report;
pub mod types;

pub mod prelude {
    //! Commonly used types and traits
    pub use crate::config::{Config, Destination};
    pub use crate::currency::CurrencyUnit;
    pub use crate::data::{
        load_cost_file, EximRateProvider, RateHistory, RateHistoryCache, RateProvider,
    };
    pub use crate::error::{PpiError, Result};
    pub use crate::index::{calculate_lsb, calculate_tei, trend_factor, TeiResult};
    pub use crate::pipeline::{Ranking, RankingPipeline};
    pub use crate::types::*;
}
