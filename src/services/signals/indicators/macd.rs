//! Moving Average Convergence Divergence (MACD) indicator.

use super::ema::ema;
use crate::services::signals::Indicator;
use crate::types::{MacdValues, PriceBar};

/// MACD indicator.
///
/// MACD line = EMA(fast) - EMA(slow); signal line = EMA(signal) of the MACD
/// line; histogram = MACD - signal. Defined wherever its EMAs are.
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
}

impl Default for Macd {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

impl Macd {
    pub fn new(fast_period: usize, slow_period: usize, signal_period: usize) -> Self {
        Self {
            fast_period,
            slow_period,
            signal_period,
        }
    }
}

impl Indicator for Macd {
    type Output = MacdValues;

    fn id(&self) -> &str {
        "macd"
    }

    fn name(&self) -> &str {
        "MACD (12, 26, 9)"
    }

    fn min_periods(&self) -> usize {
        1
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<MacdValues>> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let fast = ema(&closes, self.fast_period);
        let slow = ema(&closes, self.slow_period);

        let line: Vec<Option<f64>> = fast
            .iter()
            .zip(&slow)
            .map(|(f, s)| Some((*f)? - (*s)?))
            .collect();

        // The signal EMA only runs over the defined part of the MACD line.
        let offset = line.iter().take_while(|v| v.is_none()).count();
        let defined: Vec<f64> = line[offset..].iter().flatten().copied().collect();
        let signal = ema(&defined, self.signal_period);

        let mut out = vec![None; offset];
        out.extend(defined.iter().zip(signal).map(|(&macd, signal)| {
            signal.map(|signal| MacdValues {
                macd,
                signal,
                histogram: macd - signal,
            })
        }));
        out
    }
}
