use super::Timeframe;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum reasoning length in characters.
pub const REASONING_CAPACITY: usize = 500;

/// Direction of a trading signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalType {
    Buy,
    Sell,
    #[default]
    Hold,
}

impl SignalType {
    /// Get display label.
    pub fn label(&self) -> &'static str {
        match self {
            SignalType::Buy => "BUY",
            SignalType::Sell => "SELL",
            SignalType::Hold => "HOLD",
        }
    }

    pub fn is_actionable(&self) -> bool {
        !matches!(self, SignalType::Hold)
    }
}

impl std::fmt::Display for SignalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Qualitative strength descriptor used in reasoning text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrengthLabel {
    Weak,
    Moderate,
    Strong,
}

impl StrengthLabel {
    /// Create from a numeric strength (0.0 - 1.0).
    pub fn from_strength(strength: f64) -> Self {
        if strength > 0.7 {
            StrengthLabel::Strong
        } else if strength > 0.4 {
            StrengthLabel::Moderate
        } else {
            StrengthLabel::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            StrengthLabel::Weak => "Weak",
            StrengthLabel::Moderate => "Moderate",
            StrengthLabel::Strong => "Strong",
        }
    }
}

/// Identifies one input to signal fusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorKind {
    Rsi,
    Macd,
    MovingAverage,
    Bollinger,
    Volume,
    Prediction,
}

impl IndicatorKind {
    pub fn name(&self) -> &'static str {
        match self {
            IndicatorKind::Rsi => "RSI",
            IndicatorKind::Macd => "MACD",
            IndicatorKind::MovingAverage => "Moving Averages",
            IndicatorKind::Bollinger => "Bollinger Bands",
            IndicatorKind::Volume => "Volume",
            IndicatorKind::Prediction => "Prediction",
        }
    }
}

/// Directional vote from a single indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorReading {
    pub direction: SignalType,
    /// Vote strength in `[0, 1]`.
    pub strength: f64,
    /// Raw indicator value behind the vote (e.g. the RSI reading).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl IndicatorReading {
    pub fn new(direction: SignalType, strength: f64, value: Option<f64>) -> Self {
        Self {
            direction,
            strength: sanitize_strength(strength),
            value,
        }
    }

    pub fn buy(strength: f64, value: Option<f64>) -> Self {
        Self::new(SignalType::Buy, strength, value)
    }

    pub fn sell(strength: f64, value: Option<f64>) -> Self {
        Self::new(SignalType::Sell, strength, value)
    }

    pub fn hold(value: Option<f64>) -> Self {
        Self::new(SignalType::Hold, 0.0, value)
    }
}

/// Volume spike confirmation. Not directional: it boosts whichever side leads.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct VolumeConfirmation {
    pub confirmed: bool,
    pub strength: f64,
    /// Current volume divided by its 20-bar average.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratio: Option<f64>,
}

/// Vote derived from an external price prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionReading {
    pub reading: IndicatorReading,
    pub confidence: f64,
    pub predicted_price: f64,
}

/// Per-indicator votes that feed fusion.
///
/// `moving_average` and `bollinger` are absent when the series is too short
/// for their windows; `prediction` is absent when no estimate passed the
/// confidence gate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorVotes {
    pub rsi: IndicatorReading,
    pub macd: IndicatorReading,
    pub moving_average: Option<IndicatorReading>,
    pub bollinger: Option<IndicatorReading>,
    pub volume: VolumeConfirmation,
    pub prediction: Option<PredictionReading>,
}

impl IndicatorVotes {
    /// Directional votes paired with their kind, skipping absent ones.
    pub fn directional(&self) -> Vec<(IndicatorKind, IndicatorReading)> {
        let mut votes = vec![
            (IndicatorKind::Rsi, self.rsi),
            (IndicatorKind::Macd, self.macd),
        ];
        if let Some(ma) = self.moving_average {
            votes.push((IndicatorKind::MovingAverage, ma));
        }
        if let Some(bb) = self.bollinger {
            votes.push((IndicatorKind::Bollinger, bb));
        }
        if let Some(p) = self.prediction {
            votes.push((IndicatorKind::Prediction, p.reading));
        }
        votes
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MacdValues {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BollingerValues {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StochasticValues {
    pub k: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<f64>,
}

/// Latest value of every indicator for a series. `None` means the window
/// has not filled yet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndicatorSnapshot {
    pub current_price: f64,
    pub current_volume: f64,
    pub rsi: Option<f64>,
    pub macd: Option<MacdValues>,
    pub sma20: Option<f64>,
    pub sma50: Option<f64>,
    pub ema12: Option<f64>,
    pub ema26: Option<f64>,
    pub bollinger: Option<BollingerValues>,
    pub stochastic: Option<StochasticValues>,
    pub atr: Option<f64>,
    pub williams_r: Option<f64>,
    pub volume_sma20: Option<f64>,
}

/// Support and resistance bands around the current price.
///
/// Every support level is below `current_price` and every resistance level is
/// above it; both lists are ordered nearest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelSet {
    pub support: Vec<f64>,
    pub resistance: Vec<f64>,
    pub current_price: f64,
}

impl LevelSet {
    pub fn empty(current_price: f64) -> Self {
        Self {
            support: Vec::new(),
            resistance: Vec::new(),
            current_price,
        }
    }

    pub fn nearest_support(&self) -> Option<f64> {
        self.support.first().copied()
    }

    pub fn nearest_resistance(&self) -> Option<f64> {
        self.resistance.first().copied()
    }
}

/// Fixed-capacity reasoning text.
///
/// Appends stop at [`REASONING_CAPACITY`] characters; anything beyond is
/// dropped at a character boundary.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Reasoning {
    text: String,
    chars: usize,
}

impl Reasoning {
    pub fn new() -> Self {
        Self {
            text: String::with_capacity(REASONING_CAPACITY),
            chars: 0,
        }
    }

    /// Append `s`, truncating at capacity. Returns false if anything was cut.
    pub fn push_str(&mut self, s: &str) -> bool {
        let remaining = REASONING_CAPACITY - self.chars;
        match s.char_indices().nth(remaining) {
            None => {
                self.text.push_str(s);
                self.chars += s.chars().count();
                true
            }
            Some((cut, _)) => {
                self.text.push_str(&s[..cut]);
                self.chars = REASONING_CAPACITY;
                false
            }
        }
    }

    /// Discard the current text and start over with `s`.
    pub fn replace(&mut self, s: &str) {
        self.text.clear();
        self.chars = 0;
        self.push_str(s);
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.chars
    }

    pub fn is_empty(&self) -> bool {
        self.chars == 0
    }

    pub fn is_full(&self) -> bool {
        self.chars == REASONING_CAPACITY
    }
}

impl From<String> for Reasoning {
    fn from(s: String) -> Self {
        let mut reasoning = Reasoning::new();
        reasoning.push_str(&s);
        reasoning
    }
}

impl From<&str> for Reasoning {
    fn from(s: &str) -> Self {
        let mut reasoning = Reasoning::new();
        reasoning.push_str(s);
        reasoning
    }
}

impl From<Reasoning> for String {
    fn from(r: Reasoning) -> Self {
        r.text
    }
}

impl std::fmt::Display for Reasoning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.text)
    }
}

/// Final trading recommendation for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignalDecision {
    /// Unique decision ID.
    pub id: Uuid,
    pub symbol: String,
    pub timeframe: Timeframe,
    pub signal_type: SignalType,
    /// Strength in `[0, 1]`.
    pub strength: f64,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_target: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_loss: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_reward_ratio: Option<f64>,
    /// Fraction of capital, in `[0, max_position_size]`.
    pub recommended_position_size: f64,
    /// Fraction of capital lost if the stop is hit at the recommended size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_at_risk: Option<f64>,
    /// Weighted BUY total before the decision rule.
    pub buy_strength: f64,
    /// Weighted SELL total before the decision rule.
    pub sell_strength: f64,
    pub reasoning: Reasoning,
    pub contributing_signals: IndicatorVotes,
    pub levels: LevelSet,
    /// Set when the risk filter demoted a BUY/SELL signal to HOLD.
    pub vetoed: bool,
    /// Unix timestamp (milliseconds) when generated.
    pub timestamp: i64,
}

impl SignalDecision {
    pub fn support_level(&self) -> Option<f64> {
        self.levels.nearest_support()
    }

    pub fn resistance_level(&self) -> Option<f64> {
        self.levels.nearest_resistance()
    }
}

/// One row of a signal-strength breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightedVote {
    pub indicator: IndicatorKind,
    pub direction: SignalType,
    pub strength: f64,
    pub weight: f64,
    /// `weight * strength`, the vote's contribution to its side's total.
    pub contribution: f64,
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
pub fn sanitize_strength(strength: f64) -> f64 {
    if strength.is_nan() {
        0.0
    } else {
        strength.clamp(0.0, 1.0)
    }
}

/// Round to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
