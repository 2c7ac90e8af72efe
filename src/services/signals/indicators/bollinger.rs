//! Bollinger Bands indicator.

use crate::services::signals::Indicator;
use crate::types::{BollingerValues, PriceBar};

/// Bollinger Bands indicator.
///
/// Middle band = SMA(period); upper/lower = middle ± std_dev × sample
/// standard deviation of the same window.
pub struct BollingerBands {
    period: usize,
    std_dev: f64,
}

impl Default for BollingerBands {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64) -> Self {
        Self { period, std_dev }
    }

    fn bands(&self, window: &[f64]) -> BollingerValues {
        let n = window.len() as f64;
        let middle = window.iter().sum::<f64>() / n;
        let variance = window.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / (n - 1.0);
        let width = self.std_dev * variance.sqrt();

        BollingerValues {
            upper: middle + width,
            middle,
            lower: middle - width,
        }
    }
}

impl Indicator for BollingerBands {
    type Output = BollingerValues;

    fn id(&self) -> &str {
        "bollinger"
    }

    fn name(&self) -> &str {
        "Bollinger Bands (20, 2)"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<BollingerValues>> {
        // Sample deviation needs two points.
        if self.period < 2 {
            return vec![None; bars.len()];
        }
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        (0..closes.len())
            .map(|i| {
                if i + 1 < self.period {
                    None
                } else {
                    Some(self.bands(&closes[i + 1 - self.period..=i]))
                }
            })
            .collect()
    }
}
