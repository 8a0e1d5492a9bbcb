//! Exchange rate trend factor

/// Signed fractional deviation of `current_rate` from `ma_rate`.
///
/// Negative means the currency is cheaper than its recent average
/// (undervalued, good for travel). Positive means overvalued.
/// A zero average carries no trend signal and yields `0.0`.
pub fn trend_factor(current_rate: f64, ma_rate: f64) -> f64 {
    if ma_rate == 0.0 {
        return 0.0;
    }
    (current_rate - ma_rate) / ma_rate
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_undervalued() {
        assert_relative_eq!(trend_factor(850.0, 1000.0), -0.15, epsilon = 1e-12);
    }

    #[test]
    fn test_overvalued() {
        assert_relative_eq!(trend_factor(1100.0, 1000.0), 0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_flat() {
        for rate in [0.01, 9.5, 1350.5, 1e6] {
            assert_eq!(trend_factor(rate, rate), 0.0);
        }
    }

    #[test]
    fn test_zero_average() {
        for rate in [-5.0, 0.0, 9.5, 1350.5] {
            assert_eq!(trend_factor(rate, 0.0), 0.0);
        }
    }
}
