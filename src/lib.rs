//! Tradesignal - technical-analysis signal engine
//!
//! Turns an ordered OHLCV series (plus optional external price predictions)
//! into a BUY/SELL/HOLD recommendation with strength, price target,
//! stop-loss, position size and a short rationale.

pub mod config;
pub mod error;
pub mod services;
pub mod types;

pub use config::Config;
pub use error::{Result, SignalError};
pub use services::signals::{
    agreement_confidence, apply_risk_filter, blend_predictions, compute_indicators,
    confidence_summary, detect_levels, generate_signal, MIN_SIGNAL_BARS,
};
pub use services::{
    Analysis, Indicator, PerformanceTracker, PivotLevelDetector, PredictorService,
    PriceTargetCalculator, RiskFilter, SignalEngine, SignalFusionEngine, StaticPredictor,
};
// Re-export commonly used types
pub use types::*;
