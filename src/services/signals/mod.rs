//! Trading signals service module.
//!
//! Provides technical indicator calculations, support/resistance detection,
//! weighted signal fusion, risk filtering and prediction blending.

pub mod accuracy;
pub mod fusion;
pub mod indicators;
pub mod levels;
pub mod predictions;
pub mod risk;
pub mod targets;

pub use accuracy::PerformanceTracker;
pub use fusion::{FusionOutcome, SignalFusionEngine};
pub use indicators::compute_indicators;
pub use levels::{detect_levels, PivotLevelDetector};
pub use predictions::{
    agreement_confidence, blend_predictions, confidence_summary, PredictorService, StaticPredictor,
};
pub use risk::{apply_risk_filter, RiskFilter};
pub use targets::{PriceTargetCalculator, PriceTargets};

use crate::config::Config;
use crate::error::Result;
use crate::types::{
    round_to, EnsembleEstimate, IndicatorSnapshot, LevelSet, PerformanceEntry, PredictionEstimate,
    PriceBar, Series, SignalDecision, WeightedVote,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Bars required before a signal is generated.
pub const MIN_SIGNAL_BARS: usize = 20;

/// Trait for implementing technical indicators.
pub trait Indicator: Send + Sync {
    type Output;

    /// Unique identifier for this indicator.
    fn id(&self) -> &str;

    /// Human-readable name.
    fn name(&self) -> &str;

    /// Bars needed before the first defined value.
    fn min_periods(&self) -> usize;

    /// One entry per bar; `None` until the window fills.
    fn calculate(&self, bars: &[PriceBar]) -> Vec<Option<Self::Output>>;

    /// Value at the latest bar.
    fn latest(&self, bars: &[PriceBar]) -> Option<Self::Output> {
        self.calculate(bars).pop().flatten()
    }
}

/// Full pipeline output for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    /// Risk-filtered decision.
    pub decision: SignalDecision,
    pub ensemble: EnsembleEstimate,
    /// Raw estimates from every registered predictor.
    pub estimates: Vec<PredictionEstimate>,
    /// Model agreement mixed with tracked accuracy.
    pub agreement_confidence: f64,
}

/// Orchestrates indicators, levels, fusion, targets and the risk filter.
pub struct SignalEngine {
    config: Config,
    fusion: SignalFusionEngine,
    levels: PivotLevelDetector,
    risk: RiskFilter,
    predictors: Vec<Arc<dyn PredictorService>>,
    tracker: Arc<PerformanceTracker>,
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl SignalEngine {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            fusion: SignalFusionEngine::new(config.fusion),
            levels: PivotLevelDetector::new(config.levels),
            risk: RiskFilter::new(config.risk),
            predictors: Vec::new(),
            tracker: PerformanceTracker::new(),
        }
    }

    /// Register a predictor consulted by [`SignalEngine::analyze`].
    pub fn with_predictor(mut self, predictor: Arc<dyn PredictorService>) -> Self {
        self.register_predictor(predictor);
        self
    }

    pub fn register_predictor(&mut self, predictor: Arc<dyn PredictorService>) {
        debug!("Registered predictor {}", predictor.source_id());
        self.predictors.push(predictor);
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tracker(&self) -> &Arc<PerformanceTracker> {
        &self.tracker
    }

    pub fn compute_indicators(&self, series: &Series) -> IndicatorSnapshot {
        compute_indicators(series)
    }

    pub fn detect_levels(&self, series: &Series) -> LevelSet {
        self.levels.detect(series)
    }

    /// Raw (not yet risk-filtered) decision for the latest bar.
    pub fn generate_signal(
        &self,
        series: &Series,
        prediction: Option<&PredictionEstimate>,
    ) -> Result<SignalDecision> {
        series.require("signal generation", MIN_SIGNAL_BARS)?;
        if let Some(estimate) = prediction {
            estimate.validate()?;
        }

        let snapshot = self.compute_indicators(series);
        let levels = self.detect_levels(series);
        let outcome = self.fusion.fuse(&snapshot, prediction);
        let targets = PriceTargetCalculator::calculate(
            outcome.signal_type,
            snapshot.current_price,
            outcome.strength,
            &levels,
        );

        let decision = SignalDecision {
            id: Uuid::new_v4(),
            symbol: series.symbol().to_string(),
            timeframe: series.timeframe(),
            signal_type: outcome.signal_type,
            strength: round_to(outcome.strength, 3),
            current_price: snapshot.current_price,
            price_target: targets.price_target,
            stop_loss: targets.stop_loss,
            risk_reward_ratio: None,
            recommended_position_size: 0.0,
            capital_at_risk: None,
            buy_strength: round_to(outcome.buy_total, 3),
            sell_strength: round_to(outcome.sell_total, 3),
            reasoning: outcome.reasoning,
            contributing_signals: outcome.votes,
            levels,
            vetoed: false,
            timestamp: chrono::Utc::now().timestamp_millis(),
        };

        info!(
            "Trading signal generated for {}: {} ({:.3})",
            decision.symbol,
            decision.signal_type.label(),
            decision.strength
        );

        Ok(decision)
    }

    /// Per-indicator votes with their fusion weights.
    pub fn strength_breakdown(
        &self,
        series: &Series,
        prediction: Option<&PredictionEstimate>,
    ) -> Vec<WeightedVote> {
        let snapshot = self.compute_indicators(series);
        let votes = self.fusion.derive_votes(&snapshot, prediction);
        self.fusion.strength_breakdown(&votes)
    }

    pub fn blend_predictions(
        &self,
        estimates: &[PredictionEstimate],
        series: &Series,
    ) -> EnsembleEstimate {
        blend_predictions(estimates, series, &self.config.blend)
    }

    pub fn apply_risk_filter(&self, decision: SignalDecision, series: &Series) -> SignalDecision {
        self.risk.apply(decision, series)
    }

    /// Ask every registered predictor, dropping invalid answers.
    pub fn collect_estimates(&self, series: &Series) -> Vec<PredictionEstimate> {
        self.predictors
            .iter()
            .filter_map(|predictor| {
                let estimate = predictor.predict(series)?;
                match estimate.validate() {
                    Ok(()) => Some(estimate),
                    Err(e) => {
                        warn!("Predictor {} returned an invalid estimate: {}", predictor.source_id(), e);
                        None
                    }
                }
            })
            .collect()
    }

    /// Blend the given estimates, fuse, target and risk-filter.
    ///
    /// Only a model-backed ensemble feeds fusion; the trend fallback is
    /// reported but never votes.
    pub fn analyze_with(&self, series: &Series, estimates: Vec<PredictionEstimate>) -> Result<Analysis> {
        series.require("signal generation", MIN_SIGNAL_BARS)?;

        let ensemble = self.blend_predictions(&estimates, series);
        let prediction = ensemble.is_model_backed().then_some(&ensemble.estimate);

        let raw = self.generate_signal(series, prediction)?;
        let decision = self.apply_risk_filter(raw, series);
        let agreement = agreement_confidence(&estimates, &self.tracker.accuracy_by_model(series.symbol()));

        Ok(Analysis {
            decision,
            ensemble,
            estimates,
            agreement_confidence: agreement,
        })
    }

    /// Full pipeline using the registered predictors.
    pub fn analyze(&self, series: &Series) -> Result<Analysis> {
        let estimates = self.collect_estimates(series);
        self.analyze_with(series, estimates)
    }

    /// Record how a model's prediction turned out.
    pub fn record_outcome(
        &self,
        symbol: &str,
        model: &str,
        actual: f64,
        predicted: f64,
    ) -> Result<PerformanceEntry> {
        self.tracker.update(symbol, model, actual, predicted)
    }
}

/// Raw decision with the default configuration.
pub fn generate_signal(
    series: &Series,
    prediction: Option<&PredictionEstimate>,
) -> Result<SignalDecision> {
    SignalEngine::default().generate_signal(series, prediction)
}
