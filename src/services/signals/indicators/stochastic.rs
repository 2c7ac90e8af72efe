//! Stochastic Oscillator indicator.

use super::sma::sma;
use super::window_extremes;
use crate::services::signals::Indicator;
use crate::types::{PriceBar, StochasticValues};

/// Stochastic Oscillator.
///
/// %K = 100 × (close − lowest low) / (highest high − lowest low) over
/// `k_period` bars; %D = SMA(d_period) of %K. A window with no range
/// reads as 50.
pub struct Stochastic {
    k_period: usize,
    d_period: usize,
}

impl Default for Stochastic {
    fn default() -> Self {
        Self {
            k_period: 14,
            d_period: 3,
        }
    }
}

impl Stochastic {
    pub fn new(k_period: usize, d_period: usize) -> Self {
        Self { k_period, d_period }
    }

    fn percent_k(bars: &[PriceBar]) -> Option<f64> {
        let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let (highest, lowest) = window_extremes(&highs, &lows)?;
        let close = bars.last()?.close;

        let range = highest - lowest;
        if range == 0.0 {
            return Some(50.0);
        }
        Some(100.0 * (close - lowest) / range)
    }
}

impl Indicator for Stochastic {
    type Output = StochasticValues;

    fn id(&self) -> &str {
        "stochastic"
    }

    fn name(&self) -> &str {
        "Stochastic (14, 3)"
    }

    fn min_periods(&self) -> usize {
        self.k_period
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<StochasticValues>> {
        if self.k_period == 0 {
            return vec![None; bars.len()];
        }

        let k: Vec<Option<f64>> = (0..bars.len())
            .map(|i| {
                if i + 1 < self.k_period {
                    None
                } else {
                    Self::percent_k(&bars[i + 1 - self.k_period..=i])
                }
            })
            .collect();

        let offset = k.iter().take_while(|v| v.is_none()).count();
        let defined: Vec<f64> = k[offset..].iter().flatten().copied().collect();
        let d = sma(&defined, self.d_period);

        let mut out = vec![None; offset];
        out.extend(
            defined
                .iter()
                .zip(d)
                .map(|(&k, d)| Some(StochasticValues { k, d })),
        );
        out
    }
}
