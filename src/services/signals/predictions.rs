//! External prediction sources and ensemble blending.

use crate::config::BlendConfig;
use crate::types::{
    round_to, ConfidenceSummary, ConfidenceTrend, EnsembleEstimate, EstimateKind,
    PredictionEstimate, Series,
};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Source id of a blended model estimate.
pub const ENSEMBLE_SOURCE: &str = "ensemble";
/// Source id of the no-model trend extrapolation.
pub const TREND_FALLBACK_SOURCE: &str = "trend_fallback";

/// A price model living outside the engine.
///
/// Implementations return `None` when they have nothing to say about the
/// series (untrained, too little history, ...).
pub trait PredictorService: Send + Sync {
    /// Identifier reported as the estimate's source.
    fn source_id(&self) -> &str;

    /// Estimate the next price for `series`.
    fn predict(&self, series: &Series) -> Option<PredictionEstimate>;
}

/// Predictor that always returns the same estimate.
#[derive(Debug, Clone)]
pub struct StaticPredictor {
    estimate: PredictionEstimate,
}

impl StaticPredictor {
    pub fn new(estimate: PredictionEstimate) -> Self {
        Self { estimate }
    }
}

impl PredictorService for StaticPredictor {
    fn source_id(&self) -> &str {
        &self.estimate.source_id
    }

    fn predict(&self, _series: &Series) -> Option<PredictionEstimate> {
        Some(self.estimate.clone())
    }
}

/// Blend model estimates into one.
///
/// With at least one valid estimate the result is their confidence-weighted
/// mean, with confidence `min(max_confidence, mean confidence)`. With none,
/// the last `trend_window` closes are extrapolated with a damped trend at
/// the fixed fallback confidence.
pub fn blend_predictions(
    estimates: &[PredictionEstimate],
    series: &Series,
    config: &BlendConfig,
) -> EnsembleEstimate {
    let current_price = series.current_price();

    let valid: Vec<&PredictionEstimate> = estimates
        .iter()
        .filter(|e| match e.validate() {
            Ok(()) => true,
            Err(err) => {
                warn!("Skipping prediction estimate: {}", err);
                false
            }
        })
        .collect();

    let mut model_predictions = BTreeMap::new();
    let mut model_confidences = BTreeMap::new();

    let (predicted_price, confidence, kind, source) = if valid.is_empty() {
        let recent = series.tail(config.trend_window.max(1));
        let first = recent[0].close;
        let last = recent[recent.len() - 1].close;
        let trend = (last - first) / first;

        debug!(
            "No model estimates for {}; trend fallback over {} closes ({:.4})",
            series.symbol(),
            recent.len(),
            trend
        );

        (
            current_price * (1.0 + trend * config.trend_damping),
            config.fallback_confidence,
            EstimateKind::TrendFallback,
            TREND_FALLBACK_SOURCE,
        )
    } else {
        for estimate in &valid {
            model_predictions.insert(estimate.source_id.clone(), estimate.predicted_price);
            model_confidences.insert(estimate.source_id.clone(), estimate.confidence);
        }

        let count = valid.len() as f64;
        let total_confidence: f64 = valid.iter().map(|e| e.confidence).sum();
        let price = if total_confidence > 0.0 {
            valid
                .iter()
                .map(|e| e.predicted_price * e.confidence)
                .sum::<f64>()
                / total_confidence
        } else {
            valid.iter().map(|e| e.predicted_price).sum::<f64>() / count
        };

        (
            price,
            (total_confidence / count).min(config.max_confidence),
            EstimateKind::ModelEnsemble,
            ENSEMBLE_SOURCE,
        )
    };

    EnsembleEstimate {
        estimate: PredictionEstimate {
            predicted_price: round_to(predicted_price, 2),
            confidence: round_to(confidence, 3),
            source_id: source.to_string(),
        },
        kind,
        current_price,
        price_change_pct: round_to((predicted_price - current_price) / current_price * 100.0, 2),
        model_predictions,
        model_confidences,
        timestamp: chrono::Utc::now().timestamp_millis(),
    }
}

/// Confidence from how closely models agree, optionally mixed with their
/// historical accuracy.
///
/// Agreement is `max(0, 1 - std/mean)` of the predicted prices (0.5 for a
/// single model). With history the result is `0.6·agreement + 0.4·mean
/// accuracy`, otherwise `0.8·agreement`; clamped to `[0.1, 0.95]`. No
/// estimates at all gives 0.
pub fn agreement_confidence(
    estimates: &[PredictionEstimate],
    historical_accuracy: &BTreeMap<String, f64>,
) -> f64 {
    if estimates.is_empty() {
        return 0.0;
    }

    let agreement = if estimates.len() > 1 {
        let n = estimates.len() as f64;
        let mean = estimates.iter().map(|e| e.predicted_price).sum::<f64>() / n;
        let variance = estimates
            .iter()
            .map(|e| (e.predicted_price - mean).powi(2))
            .sum::<f64>()
            / n;
        (1.0 - variance.sqrt() / mean).max(0.0)
    } else {
        0.5
    };

    let confidence = if historical_accuracy.is_empty() {
        agreement * 0.8
    } else {
        let avg_accuracy =
            historical_accuracy.values().sum::<f64>() / historical_accuracy.len() as f64;
        agreement * 0.6 + avg_accuracy * 0.4
    };

    confidence.clamp(0.1, 0.95)
}

/// Count, average, range and direction of confidence over a run of
/// estimates (oldest first). `None` when there are no estimates.
pub fn confidence_summary(estimates: &[PredictionEstimate]) -> Option<ConfidenceSummary> {
    if estimates.is_empty() {
        return None;
    }

    let scores: Vec<f64> = estimates.iter().map(|e| e.confidence).collect();
    let n = scores.len();
    let avg = scores.iter().sum::<f64>() / n as f64;
    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    let trend = if n > 5 {
        let window_mean = |w: &[f64]| w.iter().sum::<f64>() / w.len() as f64;
        if window_mean(&scores[n - 5..]) > window_mean(&scores[..5]) {
            ConfidenceTrend::Improving
        } else {
            ConfidenceTrend::Stable
        }
    } else {
        ConfidenceTrend::Stable
    };

    Some(ConfidenceSummary {
        total_predictions: n,
        avg_confidence: round_to(avg, 3),
        min_confidence: round_to(min, 3),
        max_confidence: round_to(max, 3),
        trend,
    })
}
