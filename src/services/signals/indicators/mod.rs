//! Technical indicator implementations.
//!
//! Every indicator produces a trailing series aligned with its input: entry
//! `i` only looks at bars `..=i`, and entries before the window fills are
//! `None`. Zero denominators are guarded locally so no `NaN` leaves here.

pub mod atr;
pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod stochastic;
pub mod williams_r;

pub use atr::Atr;
pub use bollinger::BollingerBands;
pub use ema::Ema;
pub use macd::Macd;
pub use rsi::Rsi;
pub use sma::Sma;
pub use stochastic::Stochastic;
pub use williams_r::WilliamsR;

use super::Indicator;
use crate::types::{IndicatorSnapshot, PriceBar, Series};

/// Bar column an indicator reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceField {
    Close,
    Volume,
}

impl PriceField {
    pub fn extract(&self, bars: &[PriceBar]) -> Vec<f64> {
        bars.iter()
            .map(|b| match self {
                PriceField::Close => b.close,
                PriceField::Volume => b.volume,
            })
            .collect()
    }
}

/// Compute the canonical indicator set and keep the latest value of each.
///
/// Never fails: indicators whose window exceeds the series are `None`.
pub fn compute_indicators(series: &Series) -> IndicatorSnapshot {
    let bars = series.bars();
    let last = series.last();

    IndicatorSnapshot {
        current_price: last.close,
        current_volume: last.volume,
        rsi: Rsi::default().latest(bars),
        macd: Macd::default().latest(bars),
        sma20: Sma::new(20).latest(bars),
        sma50: Sma::new(50).latest(bars),
        ema12: Ema::new(12).latest(bars),
        ema26: Ema::new(26).latest(bars),
        bollinger: BollingerBands::default().latest(bars),
        stochastic: Stochastic::default().latest(bars),
        atr: Atr::default().latest(bars),
        williams_r: WilliamsR::default().latest(bars),
        volume_sma20: Sma::on(PriceField::Volume, 20).latest(bars),
    }
}

/// Highest and lowest value of a window, or `None` when empty.
pub(crate) fn window_extremes(highs: &[f64], lows: &[f64]) -> Option<(f64, f64)> {
    if highs.is_empty() || lows.is_empty() {
        return None;
    }
    let highest = highs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lowest = lows.iter().copied().fold(f64::INFINITY, f64::min);
    Some((highest, lowest))
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_snapshot_on_short_series_degrades_to_none() {
        let series = Series::new(create_uptrend_candles(10)).unwrap();
        let snapshot = compute_indicators(&series);
        assert!(snapshot.rsi.is_none());
        assert!(snapshot.sma20.is_none());
        assert!(snapshot.sma50.is_none());
        assert!(snapshot.bollinger.is_none());
        assert!(snapshot.volume_sma20.is_none());
        assert!(snapshot.macd.is_some());
        assert_eq!(snapshot.current_price, series.current_price());
    }

    #[test]
    fn test_snapshot_canonical_set_filled() {
        let series = Series::new(create_uptrend_candles(60)).unwrap();
        let snapshot = compute_indicators(&series);
        assert!(snapshot.rsi.is_some());
        assert!(snapshot.macd.is_some());
        assert!(snapshot.sma20.is_some());
        assert!(snapshot.sma50.is_some());
        assert!(snapshot.bollinger.is_some());
        assert!(snapshot.stochastic.is_some());
        assert!(snapshot.atr.is_some());
        assert!(snapshot.williams_r.is_some());
        assert_eq!(snapshot.volume_sma20, Some(1000.0));
    }

    #[test]
    fn test_window_extremes() {
        assert_eq!(window_extremes(&[1.0, 5.0, 3.0], &[0.5, 2.0]), Some((5.0, 0.5)));
        assert_eq!(window_extremes(&[], &[1.0]), None);
    }
}
