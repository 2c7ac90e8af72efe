use serde::{Deserialize, Serialize};
use std::env;

/// Fusion weight per directional indicator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionWeights {
    pub rsi: f64,
    pub macd: f64,
    pub moving_average: f64,
    pub bollinger: f64,
    pub prediction: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self {
            rsi: 0.20,
            macd: 0.25,
            moving_average: 0.20,
            bollinger: 0.15,
            prediction: 0.20,
        }
    }
}

/// Signal fusion thresholds and weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FusionConfig {
    pub weights: FusionWeights,
    /// Multiplier on volume strength added to the leading side.
    pub volume_boost: f64,
    /// A side must exceed this total to produce BUY/SELL.
    pub decision_threshold: f64,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,
    /// Current volume must exceed this multiple of its 20-bar average.
    pub volume_spike_ratio: f64,
    /// Predictions at or below this confidence are ignored.
    pub prediction_min_confidence: f64,
    /// Minimum predicted fractional move for a directional prediction vote.
    pub prediction_min_move: f64,
    pub prediction_strength_scale: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            weights: FusionWeights::default(),
            volume_boost: 0.1,
            decision_threshold: 0.3,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            volume_spike_ratio: 1.5,
            prediction_min_confidence: 0.5,
            prediction_min_move: 0.02,
            prediction_strength_scale: 10.0,
        }
    }
}

/// Support/resistance detection settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelConfig {
    /// Bars considered, counted back from the latest.
    pub lookback_periods: usize,
    /// Bars on each side a pivot must dominate.
    pub pivot_window: usize,
    /// Relative gap that still joins a cluster.
    pub cluster_tolerance: f64,
    /// Levels kept on each side of the price.
    pub max_levels: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            lookback_periods: 50,
            pivot_window: 5,
            cluster_tolerance: 0.02,
            max_levels: 3,
        }
    }
}

/// Risk filter settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskConfig {
    /// Capital fraction a single stop-out may cost before a warning is logged.
    pub max_risk_per_trade: f64,
    pub max_position_size: f64,
    pub volatility_window: usize,
    pub volatility_threshold: f64,
    pub volatility_penalty: f64,
    pub min_volatility_factor: f64,
    pub min_risk_reward: f64,
    pub risk_reward_penalty: f64,
    /// Signals weaker than this after adjustment are demoted to HOLD.
    pub min_strength: f64,
    /// Keep the original rationale after the veto note instead of discarding it.
    pub retain_vetoed_reasoning: bool,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            max_risk_per_trade: 0.02,
            max_position_size: 0.1,
            volatility_window: 20,
            volatility_threshold: 0.05,
            volatility_penalty: 5.0,
            min_volatility_factor: 0.5,
            min_risk_reward: 1.5,
            risk_reward_penalty: 0.5,
            min_strength: 0.2,
            retain_vetoed_reasoning: false,
        }
    }
}

/// Prediction blending settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlendConfig {
    pub max_confidence: f64,
    pub fallback_confidence: f64,
    /// Closes used for the trend fallback.
    pub trend_window: usize,
    pub trend_damping: f64,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            max_confidence: 0.95,
            fallback_confidence: 0.3,
            trend_window: 5,
            trend_damping: 0.1,
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub fusion: FusionConfig,
    pub levels: LevelConfig,
    pub risk: RiskConfig,
    pub blend: BlendConfig,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        let defaults = Config::default();

        Self {
            fusion: FusionConfig {
                decision_threshold: env::var("SIGNAL_DECISION_THRESHOLD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.fusion.decision_threshold),
                volume_spike_ratio: env::var("SIGNAL_VOLUME_SPIKE_RATIO")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.fusion.volume_spike_ratio),
                prediction_min_confidence: env::var("SIGNAL_PREDICTION_MIN_CONFIDENCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.fusion.prediction_min_confidence),
                ..defaults.fusion
            },
            levels: LevelConfig {
                lookback_periods: env::var("LEVELS_LOOKBACK_PERIODS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.levels.lookback_periods),
                pivot_window: env::var("LEVELS_PIVOT_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.levels.pivot_window),
                cluster_tolerance: env::var("LEVELS_CLUSTER_TOLERANCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.levels.cluster_tolerance),
                ..defaults.levels
            },
            risk: RiskConfig {
                max_risk_per_trade: env::var("RISK_MAX_RISK_PER_TRADE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.risk.max_risk_per_trade),
                max_position_size: env::var("RISK_MAX_POSITION_SIZE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.risk.max_position_size),
                min_risk_reward: env::var("RISK_MIN_RISK_REWARD")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.risk.min_risk_reward),
                retain_vetoed_reasoning: env::var("RISK_RETAIN_VETOED_REASONING")
                    .ok()
                    .map(|v| v == "true" || v == "1")
                    .unwrap_or(defaults.risk.retain_vetoed_reasoning),
                ..defaults.risk
            },
            blend: BlendConfig {
                max_confidence: env::var("BLEND_MAX_CONFIDENCE")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.blend.max_confidence),
                trend_window: env::var("BLEND_TREND_WINDOW")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.blend.trend_window),
                ..defaults.blend
            },
        }
    }
}
