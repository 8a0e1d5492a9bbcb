//! Currency units and quote scaling
//!
//! The rate provider quotes some currencies per 100 units (e.g. `JPY(100)`).
//! A [`CurrencyUnit`] keeps that scale as an explicit integer so the rest of
//! the crate never has to inspect code formatting.

use crate::error::{PpiError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currencies the provider quotes per 100 units by default
pub const DEFAULT_SCALED_CURRENCIES: &[&str] = &["JPY", "IDR"];

/// Scale used for per-100-unit quotes
pub const HUNDRED_UNIT_SCALE: u32 = 100;

/// A currency code together with the number of foreign units a quote refers to
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurrencyUnit {
    /// ISO 4217 code
    pub code: String,
    /// Foreign units per quoted rate (1 or 100)
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_scale() -> u32 {
    1
}

impl CurrencyUnit {
    /// Create a unit with an explicit scale
    pub fn new(code: impl Into<String>, scale: u32) -> Self {
        Self {
            code: code.into().trim().to_uppercase(),
            scale: scale.max(1),
        }
    }

    /// Create a unit using the provider's default scale for this code
    pub fn with_default_scale(code: impl Into<String>) -> Self {
        let code = code.into().trim().to_uppercase();
        let scale = if DEFAULT_SCALED_CURRENCIES.contains(&code.as_str()) {
            HUNDRED_UNIT_SCALE
        } else {
            1
        };
        Self { code, scale }
    }

    /// Parse a provider unit string such as `USD` or `JPY(100)`
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(PpiError::ParseError("Empty currency code".to_string()));
        }

        match raw.split_once('(') {
            Some((code, rest)) => {
                let digits = rest.strip_suffix(')').ok_or_else(|| {
                    PpiError::ParseError(format!("Unterminated unit suffix: {}", raw))
                })?;
                let scale: u32 = digits.trim().parse().map_err(|e| {
                    PpiError::ParseError(format!("Invalid unit scale in {}: {}", raw, e))
                })?;
                if scale == 0 {
                    return Err(PpiError::ParseError(format!("Zero unit scale: {}", raw)));
                }
                Ok(Self::new(code, scale))
            }
            None => Ok(Self::new(raw, 1)),
        }
    }

    /// Code as the provider reports it in `cur_unit`
    pub fn provider_code(&self) -> String {
        if self.scale > 1 {
            format!("{}({})", self.code, self.scale)
        } else {
            self.code.clone()
        }
    }

    /// Whether quotes refer to more than one foreign unit
    pub fn is_scaled(&self) -> bool {
        self.scale > 1
    }

    /// Convert a provider quote into home currency per single foreign unit
    pub fn normalize(&self, quoted_rate: f64) -> f64 {
        quoted_rate / self.scale as f64
    }
}

impl fmt::Display for CurrencyUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.provider_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_code() {
        let unit = CurrencyUnit::parse("usd").unwrap();
        assert_eq!(unit.code, "USD");
        assert_eq!(unit.scale, 1);
        assert!(!unit.is_scaled());
    }

    #[test]
    fn test_parse_scaled_code() {
        let unit = CurrencyUnit::parse("JPY(100)").unwrap();
        assert_eq!(unit.code, "JPY");
        assert_eq!(unit.scale, 100);
        assert_eq!(unit.provider_code(), "JPY(100)");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(CurrencyUnit::parse("").is_err());
        assert!(CurrencyUnit::parse("JPY(100").is_err());
        assert!(CurrencyUnit::parse("JPY(abc)").is_err());
        assert!(CurrencyUnit::parse("JPY(0)").is_err());
    }

    #[test]
    fn test_default_scale() {
        assert_eq!(CurrencyUnit::with_default_scale("jpy").scale, 100);
        assert_eq!(CurrencyUnit::with_default_scale("IDR").scale, 100);
        assert_eq!(CurrencyUnit::with_default_scale("EUR").scale, 1);
    }

    #[test]
    fn test_normalize_scaled_rate() {
        let unit = CurrencyUnit::new("JPY", 100);
        assert_eq!(unit.normalize(950.0), 9.5);
        assert_eq!(unit.normalize(900.0), 9.0);

        let usd = CurrencyUnit::new("USD", 1);
        assert_eq!(usd.normalize(1350.5), 1350.5);
    }

    #[test]
    fn test_display_uses_provider_code() {
        assert_eq!(format!("{}", CurrencyUnit::new("IDR", 100)), "IDR(100)");
        assert_eq!(format!("{}", CurrencyUnit::new("EUR", 1)), "EUR");
    }
}
