//! Relative Strength Index (RSI) indicator.

use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// RSI (Relative Strength Index) indicator.
///
/// Measures momentum by comparing the magnitude of recent gains to recent losses.
/// Values range from 0-100:
/// - Below 30: Oversold (potential buy signal)
/// - Above 70: Overbought (potential sell signal)
///
/// Gains and losses are averaged with a plain rolling mean over the last
/// `period` price changes.
pub struct Rsi {
    period: usize,
}

impl Default for Rsi {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

/// RSI from the average gain and loss of a window.
///
/// A window with no movement at all reads as neutral (50); a window with
/// gains but no losses reads as 100.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        if avg_gain == 0.0 {
            return 50.0;
        }
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

/// Trailing RSI over raw closes. Defined once `period` changes exist.
pub fn rsi(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; closes.len()];
    }

    let mut gains = vec![0.0; closes.len()];
    let mut losses = vec![0.0; closes.len()];
    for i in 1..closes.len() {
        let change = closes[i] - closes[i - 1];
        if change > 0.0 {
            gains[i] = change;
        } else {
            losses[i] = -change;
        }
    }

    (0..closes.len())
        .map(|i| {
            if i < period {
                return None;
            }
            let start = i + 1 - period;
            let avg_gain = gains[start..=i].iter().sum::<f64>() / period as f64;
            let avg_loss = losses[start..=i].iter().sum::<f64>() / period as f64;
            Some(rsi_from_averages(avg_gain, avg_loss))
        })
        .collect()
}

impl Indicator for Rsi {
    type Output = f64;

    fn id(&self) -> &str {
        "rsi"
    }

    fn name(&self) -> &str {
        "RSI (14)"
    }

    fn min_periods(&self) -> usize {
        self.period + 1
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        rsi(&closes, self.period)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;

    #[test]
    fn test_rsi_insufficient_data() {
        let candles = create_uptrend_candles(10);
        let rsi = Rsi::default();
        assert!(rsi.latest(&candles).is_none());
        assert!(rsi.calculate(&candles).iter().all(Option::is_none));
    }

    #[test]
    fn test_rsi_first_defined_index() {
        let candles = create_uptrend_candles(15);
        let out = Rsi::default().calculate(&candles);
        assert!(out[13].is_none());
        assert!(out[14].is_some());
    }

    #[test]
    fn test_rsi_monotonic_uptrend_is_100() {
        let candles = create_uptrend_candles(30);
        assert_eq!(Rsi::default().latest(&candles), Some(100.0));
    }

    #[test]
    fn test_rsi_monotonic_downtrend_is_0() {
        let candles = create_downtrend_candles(30);
        assert_eq!(Rsi::default().latest(&candles), Some(0.0));
    }

    #[test]
    fn test_rsi_constant_series_is_neutral() {
        let candles = create_flat_candles(30);
        assert_eq!(Rsi::default().latest(&candles), Some(50.0));
    }

    #[test]
    fn test_rsi_balanced_moves() {
        // Alternating +1/-1: equal average gain and loss.
        let closes: Vec<f64> = (0..30)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let value = Rsi::default().latest(&from_closes(&closes)).unwrap();
        assert!((value - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_stays_in_range() {
        let closes: Vec<f64> = (0..80)
            .map(|i| 100.0 + ((i * 37) % 11) as f64 - 5.0)
            .collect();
        for value in rsi(&closes, 14).into_iter().flatten() {
            assert!((0.0..=100.0).contains(&value));
        }
    }
}
