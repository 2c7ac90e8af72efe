//! Exponential Moving Average (EMA) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// EMA (Exponential Moving Average) indicator.
///
/// Uses the span convention `alpha = 2 / (period + 1)` with weight
/// normalization, so the average is defined from the first bar and early
/// values are not biased toward zero.
pub struct Ema {
    period: usize,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// Exponentially weighted moving average over raw values.
///
/// `y[t] = sum(w^k * x[t-k]) / sum(w^k)` with `w = 1 - alpha`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let decay = 1.0 - alpha;
    let mut numerator = 0.0;
    let mut denominator = 0.0;

    values
        .iter()
        .map(|&v| {
            numerator = v + decay * numerator;
            denominator = 1.0 + decay * denominator;
            Some(numerator / denominator)
        })
        .collect()
}

impl Indicator for Ema {
    type Output = f64;

    fn id(&self) -> &str {
        match self.period {
            12 => "ema12",
            26 => "ema26",
            _ => "ema",
        }
    }

    fn name(&self) -> &str {
        match self.period {
            12 => "EMA (12)",
            26 => "EMA (26)",
            _ => "EMA",
        }
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        ema(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_ema_first_value_is_first_input() {
        let out = ema(&[10.0, 20.0], 3);
        assert_eq!(out[0], Some(10.0));
    }

    #[test]
    fn test_ema_weighting() {
        // alpha = 0.5, w = 0.5: (20 + 0.5 * 10) / (1 + 0.5)
        let out = ema(&[10.0, 20.0], 3);
        let expected = (20.0 + 0.5 * 10.0) / 1.5;
        assert!((out[1].unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_ema_constant_series() {
        let out = ema(&[5.0; 30], 12);
        for v in out {
            assert!((v.unwrap() - 5.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_ema_tracks_uptrend_below_price() {
        let candles = create_uptrend_candles(40);
        let last_close = candles.last().unwrap().close;
        let value = Ema::new(12).latest(&candles).unwrap();
        assert!(value < last_close);
        assert!(value > candles[0].close);
    }

    #[test]
    fn test_ema_zero_period() {
        assert_eq!(ema(&[1.0], 0), vec![None]);
    }
}
