use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};

/// Bar interval of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[default]
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
}

impl Timeframe {
    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "1m" => Some(Timeframe::OneMinute),
            "5m" => Some(Timeframe::FiveMinutes),
            "15m" => Some(Timeframe::FifteenMinutes),
            "1H" | "1h" => Some(Timeframe::OneHour),
            "1D" | "1d" => Some(Timeframe::OneDay),
            "1W" | "1w" => Some(Timeframe::OneWeek),
            _ => None,
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneMinute => "1m",
            Timeframe::FiveMinutes => "5m",
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1H",
            Timeframe::OneDay => "1D",
            Timeframe::OneWeek => "1W",
        }
    }

    /// Bar duration in seconds.
    pub fn seconds(&self) -> i64 {
        match self {
            Timeframe::OneMinute => 60,
            Timeframe::FiveMinutes => 300,
            Timeframe::FifteenMinutes => 900,
            Timeframe::OneHour => 3600,
            Timeframe::OneDay => 86400,
            Timeframe::OneWeek => 604800,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// OHLCV bar for a fixed interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceBar {
    pub symbol: String,
    /// Unix timestamp (milliseconds) of the bar open.
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
    pub timeframe: Timeframe,
}

impl PriceBar {
    /// True range against the previous close.
    pub fn true_range(&self, prev_close: Option<f64>) -> f64 {
        let hl = self.high - self.low;
        match prev_close {
            Some(pc) => hl.max((self.high - pc).abs()).max((self.low - pc).abs()),
            None => hl,
        }
    }

    fn check(&self) -> Result<()> {
        let prices = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ];
        for (name, value) in prices {
            if !value.is_finite() || value <= 0.0 {
                return Err(SignalError::InvalidSeries(format!(
                    "{} price must be positive at {} (got {})",
                    name, self.timestamp, value
                )));
            }
        }
        if self.high < self.low {
            return Err(SignalError::InvalidSeries(format!(
                "high {} below low {} at {}",
                self.high, self.low, self.timestamp
            )));
        }
        if !self.volume.is_finite() || self.volume < 0.0 {
            return Err(SignalError::InvalidSeries(format!(
                "volume must be non-negative at {} (got {})",
                self.timestamp, self.volume
            )));
        }
        Ok(())
    }
}

/// Validated, time-ordered batch of bars for one symbol and timeframe.
///
/// Construction enforces the series invariants, so every component can borrow
/// a `Series` without re-checking:
/// - at least one bar
/// - all bars share `symbol` and `timeframe`
/// - timestamps strictly ascending
/// - prices finite and positive, `high >= low`, volume non-negative
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PriceBar>", into = "Vec<PriceBar>")]
pub struct Series {
    bars: Vec<PriceBar>,
}

impl Series {
    pub fn new(bars: Vec<PriceBar>) -> Result<Self> {
        let first = bars
            .first()
            .ok_or_else(|| SignalError::insufficient("series construction", 1, 0))?;

        if first.symbol.trim().is_empty() {
            return Err(SignalError::InvalidSeries("symbol is empty".to_string()));
        }

        let mut prev_ts: Option<i64> = None;
        for bar in &bars {
            bar.check()?;
            if bar.symbol != first.symbol {
                return Err(SignalError::InvalidSeries(format!(
                    "mixed symbols: {} and {}",
                    first.symbol, bar.symbol
                )));
            }
            if bar.timeframe != first.timeframe {
                return Err(SignalError::InvalidSeries(format!(
                    "mixed timeframes: {} and {}",
                    first.timeframe, bar.timeframe
                )));
            }
            if let Some(prev) = prev_ts {
                if bar.timestamp <= prev {
                    return Err(SignalError::InvalidSeries(format!(
                        "timestamps not strictly ascending: {} after {}",
                        bar.timestamp, prev
                    )));
                }
            }
            prev_ts = Some(bar.timestamp);
        }

        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Always false; kept for API symmetry with slices.
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn symbol(&self) -> &str {
        &self.bars[0].symbol
    }

    pub fn timeframe(&self) -> Timeframe {
        self.bars[0].timeframe
    }

    pub fn last(&self) -> &PriceBar {
        &self.bars[self.bars.len() - 1]
    }

    /// Close of the most recent bar.
    pub fn current_price(&self) -> f64 {
        self.last().close
    }

    /// The most recent `n` bars (all bars when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[PriceBar] {
        let start = self.bars.len().saturating_sub(n);
        &self.bars[start..]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Require at least `required` bars for `operation`.
    pub fn require(&self, operation: &'static str, required: usize) -> Result<()> {
        if self.len() < required {
            return Err(SignalError::insufficient(operation, required, self.len()));
        }
        Ok(())
    }
}

impl TryFrom<Vec<PriceBar>> for Series {
    type Error = SignalError;

    fn try_from(bars: Vec<PriceBar>) -> Result<Self> {
        Series::new(bars)
    }
}

impl From<Series> for Vec<PriceBar> {
    fn from(series: Series) -> Self {
        series.bars
    }
}
