//! Purchasing power index calculations
//!
//! # Components
//!
//! - **trend**: deviation of the spot rate from its moving average
//! - **basket**: Local Survival Budget (3 meals + 2 drinks + 1 night)
//! - **tei**: purchasing power score from budget, duration, basket, and rates
//!
//! # Example
//!
//! ```rust
//! use travel_ppi::index::{calculate_lsb, calculate_tei};
//!
//! let lsb = calculate_lsb(500.0, 400.0, 6000.0);
//! assert_eq!(lsb, 8300.0);
//!
//! let result = calculate_tei(1_000_000.0, 5, lsb, 9.0, 10.0);
//! assert_eq!(result.tei_score(), 2.97);
//! ```

pub mod basket;
pub mod tei;
pub mod trend;

pub use basket::calculate_lsb;
pub use tei::{calculate_tei, round2, InvalidReason, TeiResult, TeiScore};
pub use trend::trend_factor;
