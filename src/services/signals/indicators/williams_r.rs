//! Williams %R indicator.

use super::window_extremes;
use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// Williams %R.
///
/// -100 × (highest high − close) / (highest high − lowest low), in
/// `[-100, 0]`. A window with no range reads as -50.
pub struct WilliamsR {
    period: usize,
}

impl Default for WilliamsR {
    fn default() -> Self {
        Self { period: 14 }
    }
}

impl WilliamsR {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl Indicator for WilliamsR {
    type Output = f64;

    fn id(&self) -> &str {
        "williams_r"
    }

    fn name(&self) -> &str {
        "Williams %R (14)"
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        if self.period == 0 {
            return vec![None; bars.len()];
        }

        (0..bars.len())
            .map(|i| {
                if i + 1 < self.period {
                    return None;
                }
                let window = &bars[i + 1 - self.period..=i];
                let highs: Vec<f64> = window.iter().map(|b| b.high).collect();
                let lows: Vec<f64> = window.iter().map(|b| b.low).collect();
                let (highest, lowest) = window_extremes(&highs, &lows)?;

                let range = highest - lowest;
                if range == 0.0 {
                    return Some(-50.0);
                }
                Some(-100.0 * (highest - bars[i].close) / range)
            })
            .collect()
    }
}
