//! Integration tests for indicators, fusion, risk filtering and blending.

mod common;

use common::{ascending_series, random_walk, series_from_closes};
use std::sync::Arc;
use tradesignal::config::{Config, FusionConfig, RiskConfig};
use tradesignal::services::signals::indicators::rsi::rsi;
use tradesignal::services::signals::indicators::{Stochastic, WilliamsR};
use tradesignal::types::*;
use tradesignal::{
    apply_risk_filter, blend_predictions, compute_indicators, generate_signal, Indicator,
    SignalEngine, SignalError, SignalFusionEngine, StaticPredictor,
};

// ---------------------------------------------------------------------------
// Indicators
// ---------------------------------------------------------------------------

#[test]
fn test_rsi_within_bounds_on_random_walks() {
    for seed in 0..50 {
        let series = random_walk(seed, 120);
        for value in rsi(&series.closes(), 14).into_iter().flatten() {
            assert!(value.is_finite());
            assert!((0.0..=100.0).contains(&value), "seed {} gave RSI {}", seed, value);
        }
    }
}

#[test]
fn test_rsi_constant_series_is_50() {
    let series = series_from_closes(&[250.0; 30]);
    let snapshot = compute_indicators(&series);
    assert_eq!(snapshot.rsi, Some(50.0));
}

#[test]
fn test_rsi_monotonic_series_saturates_at_100() {
    let series = ascending_series(15);
    let snapshot = compute_indicators(&series);
    assert_eq!(snapshot.rsi, Some(100.0));
}

#[test]
fn test_zero_range_windows_are_neutral() {
    let bars: Vec<PriceBar> = (0..20).map(|i| common::bar(i, 50.0, 50.0, 50.0, 50.0, 10.0)).collect();
    assert_eq!(Stochastic::default().latest(&bars).map(|s| s.k), Some(50.0));
    assert_eq!(WilliamsR::default().latest(&bars), Some(-50.0));
}

#[test]
fn test_snapshot_has_no_nan() {
    for seed in 0..20 {
        let snapshot = compute_indicators(&random_walk(seed, 80));
        let values = [
            snapshot.rsi,
            snapshot.sma20,
            snapshot.sma50,
            snapshot.ema12,
            snapshot.ema26,
            snapshot.atr,
            snapshot.williams_r,
            snapshot.volume_sma20,
        ];
        assert!(values.iter().flatten().all(|v| v.is_finite()));
    }
}

// ---------------------------------------------------------------------------
// Fusion
// ---------------------------------------------------------------------------

#[test]
fn test_totals_below_floor_hold() {
    let engine = SignalFusionEngine::default();
    let (signal_type, strength) = engine.decide(0.25, 0.1);
    assert_eq!(signal_type, SignalType::Hold);
    assert_eq!(strength, 0.0);
}

#[test]
fn test_hand_computed_buy_from_snapshot() {
    // Oversold RSI, bullish MACD, bullish MA cross, price inside the bands,
    // flat volume and no prediction.
    let snapshot = IndicatorSnapshot {
        current_price: 101.0,
        current_volume: 1000.0,
        rsi: Some(3.0),
        macd: Some(MacdValues {
            macd: 1.8,
            signal: 0.8,
            histogram: 1.0,
        }),
        sma20: Some(100.0),
        sma50: Some(98.0),
        ema12: None,
        ema26: None,
        bollinger: Some(BollingerValues {
            upper: 110.0,
            middle: 100.0,
            lower: 90.0,
        }),
        stochastic: None,
        atr: None,
        williams_r: None,
        volume_sma20: Some(1000.0),
    };

    let rsi_strength = (30.0 - 3.0) / 30.0;
    let macd_strength = ((1.8f64 - 0.8) / 0.8).min(1.0);
    let ma_strength = (101.0 - 100.0) / 100.0;
    let expected = 0.2 * rsi_strength + 0.25 * macd_strength + 0.2 * ma_strength;

    let outcome = SignalFusionEngine::default().fuse(&snapshot, None);
    assert_eq!(outcome.signal_type, SignalType::Buy);
    assert!((outcome.strength - expected).abs() < 1e-9);
    assert_eq!(outcome.votes.bollinger.unwrap().direction, SignalType::Hold);
    assert!(!outcome.votes.volume.confirmed);
}

#[test]
fn test_volume_spike_boosts_leading_side() {
    let snapshot = IndicatorSnapshot {
        current_price: 105.0,
        current_volume: 2500.0,
        rsi: Some(12.0),
        macd: None,
        sma20: None,
        sma50: None,
        ema12: None,
        ema26: None,
        bollinger: None,
        stochastic: None,
        atr: None,
        williams_r: None,
        volume_sma20: Some(1000.0),
    };

    let outcome = SignalFusionEngine::default().fuse(&snapshot, None);
    // 0.2 * 0.6 + 0.1 * min(1, 2.5 - 1)
    assert!((outcome.buy_total - 0.22).abs() < 1e-9);
    assert!(outcome.reasoning.as_str().contains("High volume confirms the signal"));
}

#[test]
fn test_strength_always_in_unit_interval() {
    let engine = SignalEngine::default();
    for seed in 0..60 {
        let series = random_walk(seed, 90);
        let decision = engine.generate_signal(&series, None).unwrap();
        assert!((0.0..=1.0).contains(&decision.strength), "seed {}", seed);
        assert!(decision.reasoning.len() <= REASONING_CAPACITY);

        let filtered = engine.apply_risk_filter(decision, &series);
        assert!((0.0..=1.0).contains(&filtered.strength));
        assert!(filtered.recommended_position_size >= 0.0);
        assert!(filtered.recommended_position_size <= 0.1);
    }
}

#[test]
fn test_generate_signal_insufficient_data() {
    let series = ascending_series(12);
    let err = generate_signal(&series, None).unwrap_err();
    assert!(err.is_recoverable());
    assert!(matches!(
        err,
        SignalError::InsufficientData {
            required: 20,
            actual: 12,
            ..
        }
    ));
}

#[test]
fn test_lower_threshold_from_config() {
    let config = Config {
        fusion: FusionConfig {
            decision_threshold: 0.0,
            ..FusionConfig::default()
        },
        ..Config::default()
    };
    let engine = SignalFusionEngine::new(config.fusion);
    assert_eq!(engine.decide(0.25, 0.1).0, SignalType::Buy);
}

// ---------------------------------------------------------------------------
// Risk filter
// ---------------------------------------------------------------------------

fn raw_decision(series: &Series, signal_type: SignalType, strength: f64) -> SignalDecision {
    let mut decision = SignalEngine::default().generate_signal(series, None).unwrap();
    decision.signal_type = signal_type;
    decision.strength = strength;
    decision
}

#[test]
fn test_risk_reward_of_one_halves_strength() {
    let series = series_from_closes(&[100.0; 25]);
    let mut decision = raw_decision(&series, SignalType::Buy, 0.9);
    decision.price_target = Some(103.0);
    decision.stop_loss = Some(97.0);

    let filtered = apply_risk_filter(decision, &series, &RiskConfig::default());
    assert_eq!(filtered.risk_reward_ratio, Some(1.0));
    assert_eq!(filtered.strength, 0.45);
    assert!(filtered
        .reasoning
        .as_str()
        .contains("(Poor risk-reward ratio: 1.00)"));
    assert_eq!(filtered.signal_type, SignalType::Buy);
}

#[test]
fn test_risk_veto_discards_reasoning() {
    let series = series_from_closes(&[100.0; 25]);
    let mut decision = raw_decision(&series, SignalType::Sell, 0.3);
    decision.price_target = Some(99.0);
    decision.stop_loss = Some(102.0);

    let filtered = apply_risk_filter(decision, &series, &RiskConfig::default());
    assert_eq!(filtered.signal_type, SignalType::Hold);
    assert_eq!(filtered.strength, 0.0);
    assert!(filtered.vetoed);
    assert_eq!(
        filtered.reasoning.as_str(),
        "Signal filtered out due to risk management rules"
    );
}

#[test]
fn test_risk_filter_replaces_raw_hold_reasoning() {
    let series = series_from_closes(&[100.0; 25]);
    let raw = generate_signal(&series, None).unwrap();
    assert_eq!(raw.signal_type, SignalType::Hold);
    assert_eq!(raw.strength, 0.0);
    assert!(raw.reasoning.as_str().starts_with("Weak hold signal."));

    let filtered = apply_risk_filter(raw, &series, &RiskConfig::default());
    assert_eq!(filtered.signal_type, SignalType::Hold);
    assert_eq!(filtered.strength, 0.0);
    assert_eq!(filtered.recommended_position_size, 0.0);
    assert!(!filtered.vetoed);
    assert_eq!(
        filtered.reasoning.as_str(),
        "Signal filtered out due to risk management rules"
    );
}

// ---------------------------------------------------------------------------
// Blending and the full pipeline
// ---------------------------------------------------------------------------

#[test]
fn test_blend_empty_trend_fallback() {
    let series = series_from_closes(&[100.0, 101.0, 102.0, 103.0, 104.0]);
    let blended = blend_predictions(&[], &series, &Config::default().blend);

    assert_eq!(blended.estimate.confidence, 0.3);
    // trend = (104 - 100) / 100 = 0.04 applied to the latest close
    assert_eq!(blended.estimate.predicted_price, 104.42);
    assert_eq!(blended.kind, EstimateKind::TrendFallback);
}

#[test]
fn test_analyze_with_registered_predictors() {
    let series = random_walk(7, 80);
    let price = series.current_price();
    let engine = SignalEngine::default()
        .with_predictor(Arc::new(StaticPredictor::new(
            PredictionEstimate::new(price * 0.9, 0.9, "lstm").unwrap(),
        )))
        .with_predictor(Arc::new(StaticPredictor::new(
            PredictionEstimate::new(price * 0.92, 0.7, "random_forest").unwrap(),
        )));

    let analysis = engine.analyze(&series).unwrap();
    assert_eq!(analysis.estimates.len(), 2);
    assert!(analysis.ensemble.is_model_backed());
    assert_eq!(analysis.ensemble.model_predictions.len(), 2);
    assert!((analysis.ensemble.estimate.confidence - 0.8).abs() < 1e-9);

    let vote = analysis.decision.contributing_signals.prediction.unwrap();
    assert_eq!(vote.reading.direction, SignalType::Sell);
    assert!(analysis.agreement_confidence >= 0.1);
}

#[test]
fn test_decision_serializes_camel_case() {
    let series = random_walk(3, 60);
    let decision = generate_signal(&series, None).unwrap();
    let json = serde_json::to_value(&decision).unwrap();

    assert!(json.get("signalType").is_some());
    assert!(json.get("contributingSignals").is_some());
    assert!(json.get("recommendedPositionSize").is_some());
    assert!(json["reasoning"].is_string());

    let parsed: SignalDecision = serde_json::from_value(json).unwrap();
    assert_eq!(parsed.id, decision.id);
}
