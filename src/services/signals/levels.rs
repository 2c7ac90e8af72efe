//! Support and resistance detection from pivot points.

use super::indicators::sma::sma;
use crate::config::LevelConfig;
use crate::types::{LevelSet, Series};
use tracing::debug;

/// Finds pivot highs/lows and clusters them into support/resistance bands.
///
/// The 20- and 50-bar moving averages of the lookback window are added as
/// dynamic levels when the window is long enough for them.
#[derive(Debug, Clone, Default)]
pub struct PivotLevelDetector {
    config: LevelConfig,
}

impl PivotLevelDetector {
    pub fn new(config: LevelConfig) -> Self {
        Self { config }
    }

    /// Pivot highs and lows.
    ///
    /// Bar `i` is a pivot high when its high is at least every high within
    /// `window` bars on both sides (a pivot low mirrors this with `<=`).
    /// Only `window <= i < n - window` qualifies, so short input yields none.
    pub fn find_pivots(highs: &[f64], lows: &[f64], window: usize) -> (Vec<f64>, Vec<f64>) {
        let n = highs.len().min(lows.len());
        let mut pivot_highs = Vec::new();
        let mut pivot_lows = Vec::new();

        if n < window.saturating_mul(2).saturating_add(1) {
            return (pivot_highs, pivot_lows);
        }

        for i in window..n - window {
            let neighbours = (1..=window).flat_map(|j| [i - j, i + j]);

            if neighbours.clone().all(|k| highs[i] >= highs[k]) {
                pivot_highs.push(highs[i]);
            }
            if neighbours.clone().all(|k| lows[i] <= lows[k]) {
                pivot_lows.push(lows[i]);
            }
        }

        (pivot_highs, pivot_lows)
    }

    /// Group sorted levels whose relative gap from the previous member is
    /// within `tolerance`, and replace each group with its mean.
    ///
    /// Applying this to its own output returns the same levels.
    pub fn cluster_levels(levels: &[f64], tolerance: f64) -> Vec<f64> {
        let mut sorted = levels.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));

        let mut clustered = Vec::new();
        let mut cluster: Vec<f64> = Vec::new();

        for level in sorted {
            if let Some(&last) = cluster.last() {
                if (level - last).abs() / last > tolerance {
                    clustered.push(mean(&cluster));
                    cluster.clear();
                }
            }
            cluster.push(level);
        }
        if !cluster.is_empty() {
            clustered.push(mean(&cluster));
        }

        clustered
    }

    /// Support and resistance for the latest bar of `series`.
    ///
    /// Never fails; short input just produces fewer (or no) levels.
    pub fn detect(&self, series: &Series) -> LevelSet {
        let recent = series.tail(self.config.lookback_periods.max(1));
        let current_price = series.current_price();

        let highs: Vec<f64> = recent.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = recent.iter().map(|b| b.low).collect();
        let closes: Vec<f64> = recent.iter().map(|b| b.close).collect();

        let (pivot_highs, pivot_lows) = Self::find_pivots(&highs, &lows, self.config.pivot_window);
        let mut resistance = Self::cluster_levels(&pivot_highs, self.config.cluster_tolerance);
        let mut support = Self::cluster_levels(&pivot_lows, self.config.cluster_tolerance);

        for period in [20, 50] {
            if let Some(Some(ma)) = sma(&closes, period).last() {
                if *ma > current_price {
                    resistance.push(*ma);
                } else {
                    support.push(*ma);
                }
            }
        }

        resistance.retain(|&level| level > current_price);
        resistance.sort_by(|a, b| a.total_cmp(b));
        resistance.truncate(self.config.max_levels);

        support.retain(|&level| level < current_price);
        support.sort_by(|a, b| b.total_cmp(a));
        support.truncate(self.config.max_levels);

        debug!(
            "Levels for {}: {} pivot highs, {} pivot lows -> {} support, {} resistance",
            series.symbol(),
            pivot_highs.len(),
            pivot_lows.len(),
            support.len(),
            resistance.len()
        );

        LevelSet {
            support,
            resistance,
            current_price,
        }
    }
}

/// Detect levels with an explicit configuration.
pub fn detect_levels(series: &Series, config: &LevelConfig) -> LevelSet {
    PivotLevelDetector::new(*config).detect(series)
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::signals::indicators::test_support::*;
    use crate::types::PriceBar;

    fn zigzag_candles(count: usize) -> Vec<PriceBar> {
        // Period-10 triangle wave between 95 and 105.
        (0..count)
            .map(|i| {
                let phase = (i % 10) as f64;
                let base = if phase <= 5.0 { 95.0 + phase * 2.0 } else { 105.0 - (phase - 5.0) * 2.0 };
                candle(i, base, 0.5, 0.5, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_find_pivots_simple_peak() {
        let highs = [1.0, 2.0, 5.0, 2.0, 1.0];
        let lows = [0.5, 1.5, 4.0, 1.5, 0.5];
        let (ph, pl) = PivotLevelDetector::find_pivots(&highs, &lows, 2);
        assert_eq!(ph, vec![5.0]);
        assert!(pl.is_empty());
    }

    #[test]
    fn test_find_pivots_short_input() {
        let highs = [1.0, 2.0, 3.0];
        let (ph, pl) = PivotLevelDetector::find_pivots(&highs, &highs, 5);
        assert!(ph.is_empty());
        assert!(pl.is_empty());
    }

    #[test]
    fn test_find_pivots_huge_window() {
        let highs = [1.0, 2.0, 5.0, 2.0, 1.0];
        let (ph, pl) = PivotLevelDetector::find_pivots(&highs, &highs, usize::MAX);
        assert!(ph.is_empty());
        assert!(pl.is_empty());

        let config = LevelConfig {
            pivot_window: usize::MAX,
            ..LevelConfig::default()
        };
        let series = Series::new(zigzag_candles(60)).unwrap();
        let levels = detect_levels(&series, &config);
        assert!(levels.support.iter().all(|&s| s < levels.current_price));
    }

    #[test]
    fn test_find_pivots_ties_count() {
        let highs = [1.0, 3.0, 3.0, 1.0];
        let (ph, _) = PivotLevelDetector::find_pivots(&highs, &highs, 1);
        assert_eq!(ph, vec![3.0, 3.0]);
    }

    #[test]
    fn test_cluster_levels_merges_close_values() {
        let clustered = PivotLevelDetector::cluster_levels(&[100.0, 101.0, 110.0, 101.5], 0.02);
        assert_eq!(clustered.len(), 2);
        assert!((clustered[0] - 302.5 / 3.0).abs() < 1e-12);
        assert_eq!(clustered[1], 110.0);
    }

    #[test]
    fn test_cluster_levels_empty() {
        assert!(PivotLevelDetector::cluster_levels(&[], 0.02).is_empty());
    }

    #[test]
    fn test_cluster_levels_idempotent() {
        let once = PivotLevelDetector::cluster_levels(&[50.0, 50.5, 51.0, 60.0, 61.0, 75.0], 0.02);
        let twice = PivotLevelDetector::cluster_levels(&once, 0.02);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_detect_on_zigzag() {
        let series = Series::new(zigzag_candles(60)).unwrap();
        let levels = PivotLevelDetector::default().detect(&series);
        let price = levels.current_price;

        assert!(!levels.support.is_empty() || !levels.resistance.is_empty());
        assert!(levels.support.iter().all(|&s| s < price));
        assert!(levels.resistance.iter().all(|&r| r > price));
        assert!(levels.support.len() <= 3);
        assert!(levels.resistance.len() <= 3);
        assert!(levels.support.windows(2).all(|w| w[0] > w[1]));
        assert!(levels.resistance.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_detect_single_bar() {
        let series = Series::new(create_uptrend_candles(1)).unwrap();
        let levels = detect_levels(&series, &LevelConfig::default());
        assert!(levels.support.is_empty());
        assert!(levels.resistance.is_empty());
        assert_eq!(levels.current_price, series.current_price());
    }

    #[test]
    fn test_detect_uptrend_uses_moving_average_support() {
        // No interior pivots in a clean uptrend; SMA20 sits below price.
        let series = Series::new(create_uptrend_candles(30)).unwrap();
        let levels = PivotLevelDetector::default().detect(&series);
        assert!(levels.resistance.is_empty());
        assert_eq!(levels.support.len(), 1);
        assert!(levels.support[0] < series.current_price());
    }
}
