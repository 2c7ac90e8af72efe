pub mod signals;

pub use signals::{
    Analysis, Indicator, PerformanceTracker, PivotLevelDetector, PredictorService,
    PriceTargetCalculator, RiskFilter, SignalEngine, SignalFusionEngine, StaticPredictor,
};
