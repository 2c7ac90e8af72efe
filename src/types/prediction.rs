use crate::error::{Result, SignalError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Price estimate produced by an external model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionEstimate {
    pub predicted_price: f64,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Model or service that produced the estimate.
    pub source_id: String,
}

impl PredictionEstimate {
    pub fn new(predicted_price: f64, confidence: f64, source_id: impl Into<String>) -> Result<Self> {
        let estimate = Self {
            predicted_price,
            confidence,
            source_id: source_id.into(),
        };
        estimate.validate()?;
        Ok(estimate)
    }

    /// Check the estimate invariants (useful after deserialization).
    pub fn validate(&self) -> Result<()> {
        if !self.predicted_price.is_finite() || self.predicted_price <= 0.0 {
            return Err(SignalError::InvalidEstimate(format!(
                "{}: predicted price must be positive (got {})",
                self.source_id, self.predicted_price
            )));
        }
        if !(0.0..=1.0).contains(&self.confidence) {
            return Err(SignalError::InvalidEstimate(format!(
                "{}: confidence must be within [0, 1] (got {})",
                self.source_id, self.confidence
            )));
        }
        Ok(())
    }
}

/// How an ensemble estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateKind {
    /// Confidence-weighted blend of one or more model estimates.
    ModelEnsemble,
    /// No model available; damped extrapolation of the recent trend.
    /// Low confidence by construction.
    TrendFallback,
}

/// Result of blending zero or more model estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnsembleEstimate {
    pub estimate: PredictionEstimate,
    pub kind: EstimateKind,
    pub current_price: f64,
    /// Predicted move relative to `current_price`, in percent (2 dp).
    pub price_change_pct: f64,
    pub model_predictions: BTreeMap<String, f64>,
    pub model_confidences: BTreeMap<String, f64>,
    /// Unix timestamp (milliseconds) when blended.
    pub timestamp: i64,
}

impl EnsembleEstimate {
    pub fn is_model_backed(&self) -> bool {
        self.kind == EstimateKind::ModelEnsemble
    }
}

/// One predicted-vs-actual observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceEntry {
    pub predicted: f64,
    pub actual: f64,
    /// `max(0, 1 - |actual - predicted| / actual)`.
    pub accuracy: f64,
    /// Unix timestamp (milliseconds) when recorded.
    pub timestamp: i64,
}

impl PerformanceEntry {
    pub fn new(predicted: f64, actual: f64) -> Self {
        let accuracy = if actual > 0.0 {
            (1.0 - (actual - predicted).abs() / actual).max(0.0)
        } else {
            0.0
        };
        Self {
            predicted,
            actual,
            accuracy,
            timestamp: chrono::Utc::now().timestamp_millis(),
        }
    }
}

/// Accuracy statistics for one model on one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelPerformance {
    pub model: String,
    pub avg_accuracy: f64,
    pub std_accuracy: f64,
    pub min_accuracy: f64,
    pub max_accuracy: f64,
    pub total_predictions: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceTrend {
    Improving,
    Stable,
}

/// Summary of confidence across a run of estimates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfidenceSummary {
    pub total_predictions: usize,
    pub avg_confidence: f64,
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub trend: ConfidenceTrend,
}
