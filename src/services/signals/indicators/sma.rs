//! Simple Moving Average (SMA) indicator.

use super::PriceField;
use crate::services::signals::Indicator;
use crate::types::PriceBar;

/// SMA (Simple Moving Average) indicator.
///
/// Arithmetic mean of the trailing `period` values of one bar column.
pub struct Sma {
    period: usize,
    field: PriceField,
}

impl Sma {
    /// SMA of closes.
    pub fn new(period: usize) -> Self {
        Self::on(PriceField::Close, period)
    }

    /// SMA of an arbitrary bar column.
    pub fn on(field: PriceField, period: usize) -> Self {
        Self { period, field }
    }
}

/// Trailing simple moving average over raw values.
pub fn sma(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                None
            } else {
                let window = &values[i + 1 - period..=i];
                Some(window.iter().sum::<f64>() / period as f64)
            }
        })
        .collect()
}

impl Indicator for Sma {
    type Output = f64;

    fn id(&self) -> &str {
        match (self.field, self.period) {
            (PriceField::Close, 20) => "sma20",
            (PriceField::Close, 50) => "sma50",
            (PriceField::Volume, 20) => "volume_sma20",
            (PriceField::Volume, _) => "volume_sma",
            _ => "sma",
        }
    }

    fn name(&self) -> &str {
        match (self.field, self.period) {
            (PriceField::Close, 20) => "SMA (20)",
            (PriceField::Close, 50) => "SMA (50)",
            (PriceField::Volume, _) => "Volume SMA",
            _ => "SMA",
        }
    }

    fn min_periods(&self) -> usize {
        self.period
    }

    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<f64>> {
        sma(&self.field.extract(bars), self.period)
    }
}
