//! Average True Range (ATR) indicator.

use super::sma::sma;
use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// ATR (Average True Range) indicator.
///
/// Rolling mean of true ranges:
/// TR = max(High-Low, |High-PrevClose|, |Low-PrevClose|)
///
/// The first bar has no previous close, so its TR is High-Low.
pub struct Atr {
    period: usize,
}

impl Default for Atr {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Atr {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for Atr {
    type Output = f64;

    fn id(&self) -> &str {
        "atr"
    }

    fn name(&self) -> &str {
        "ATR (14)"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let true_ranges: Vec<f64> = bars
            .iter()
            .enumerate()
            .map(|(i, bar)| {
                let prev_close = i.checked_sub(1).map(|p| bars[p].close);
                bar.true_range(prev_close)
            })
            .collect();
        sma(&true_ranges, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_atr_insufficient_data() {
        let candles = create_uptrend_candles(13);
        assert!(Atr::default().latest(&candles).is_none());
    }

    #[test]
    fn test_atr_first_true_range_is_bar_range() {
        let candles = create_uptrend_candles(3);
        let out = Atr::new(1).calculate(&candles);
        assert_eq!(out[0], Some(3.0));
    }

    #[test]
    fn test_atr_uptrend_constant() {
        // Each bar: high = base + 2, low = base - 1, prev close = base - 0.5.
        // TR = max(3, 2.5, 0.5) = 3.
        let candles = create_uptrend_candles(30);
        let value = Atr::default().latest(&candles).unwrap();
        assert!((value - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_atr_flat_is_zero() {
        let candles = create_flat_candles(20);
        assert_eq!(Atr::default().latest(&candles), Some(0.0));
    }
}
