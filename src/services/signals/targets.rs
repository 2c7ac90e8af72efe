//! Price target and stop-loss derivation.

use crate::types::{round_to, LevelSet, SignalType};

/// Target and stop for a decision. Both absent for HOLD.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceTargets {
    pub price_target: Option<f64>,
    pub stop_loss: Option<f64>,
}

/// Places targets at the nearest level in the trade direction and stops at
/// the nearest level against it. Missing levels fall back to a
/// strength-scaled percentage of the current price.
pub struct PriceTargetCalculator;

impl PriceTargetCalculator {
    /// Target distance without a level: 1% at zero strength, 5% at full.
    fn target_pct(strength: f64) -> f64 {
        0.01 + 0.04 * strength
    }

    /// Stop distance without a level: 2% at zero strength, 5% at full.
    fn stop_pct(strength: f64) -> f64 {
        0.02 + 0.03 * strength
    }

    pub fn calculate(
        signal_type: SignalType,
        current_price: f64,
        strength: f64,
        levels: &LevelSet,
    ) -> PriceTargets {
        let (target, stop) = match signal_type {
            SignalType::Hold => return PriceTargets::default(),
            SignalType::Buy => (
                levels
                    .nearest_resistance()
                    .unwrap_or(current_price * (1.0 + Self::target_pct(strength))),
                levels
                    .nearest_support()
                    .unwrap_or(current_price * (1.0 - Self::stop_pct(strength))),
            ),
            SignalType::Sell => (
                levels
                    .nearest_support()
                    .unwrap_or(current_price * (1.0 - Self::target_pct(strength))),
                levels
                    .nearest_resistance()
                    .unwrap_or(current_price * (1.0 + Self::stop_pct(strength))),
            ),
        };

        PriceTargets {
            price_target: Some(round_to(target, 2)),
            stop_loss: Some(round_to(stop, 2)),
        }
    }
}
