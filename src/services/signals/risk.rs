//! Risk management applied to raw signal decisions.

use crate::config::RiskConfig;
use crate::types::{round_to, Series, SignalDecision, SignalType};
use tracing::{debug, info, warn};

/// Replacement reasoning for a vetoed signal.
pub const VETO_NOTE: &str = "Signal filtered out due to risk management rules";

/// Adjusts strength for volatility and risk/reward, sizes the position and
/// vetoes signals that end up too weak.
#[derive(Debug, Clone, Default)]
pub struct RiskFilter {
    config: RiskConfig,
}

impl RiskFilter {
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    /// Coefficient of variation (population std / mean) of the last
    /// `window` closes, or `None` with fewer bars than that.
    pub fn volatility(series: &Series, window: usize) -> Option<f64> {
        if window == 0 || series.len() < window {
            return None;
        }
        let closes: Vec<f64> = series.tail(window).iter().map(|b| b.close).collect();
        let n = closes.len() as f64;
        let mean = closes.iter().sum::<f64>() / n;
        let variance = closes.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / n;
        Some(variance.sqrt() / mean)
    }

    pub fn apply(&self, decision: SignalDecision, series: &Series) -> SignalDecision {
        let mut filtered = decision;
        let original_type = filtered.signal_type;
        let original_reasoning = filtered.reasoning.clone();

        // 1. Volatility damping
        if let Some(volatility) = Self::volatility(series, self.config.volatility_window) {
            if volatility > self.config.volatility_threshold {
                let factor = (1.0
                    - (volatility - self.config.volatility_threshold) * self.config.volatility_penalty)
                    .max(self.config.min_volatility_factor);
                filtered.strength *= factor;
                filtered
                    .reasoning
                    .push_str(&format!(" (Adjusted for high volatility: {:.3})", volatility));
                debug!(
                    "{}: volatility {:.3} scales strength by {:.3}",
                    filtered.symbol, volatility, factor
                );
            }
        }

        // 2. Position sizing
        let max_position = self.config.max_position_size;
        filtered.recommended_position_size =
            round_to((filtered.strength * max_position).min(max_position), 3);

        // 3. Risk/reward gate
        let current_price = series.current_price();
        if let (Some(target), Some(stop)) = (filtered.price_target, filtered.stop_loss) {
            let gain_loss = match filtered.signal_type {
                SignalType::Buy => Some((target - current_price, current_price - stop)),
                SignalType::Sell => Some((current_price - target, stop - current_price)),
                SignalType::Hold => None,
            };

            if let Some((gain, loss)) = gain_loss.filter(|(_, loss)| *loss > 0.0) {
                let ratio = gain / loss;
                filtered.risk_reward_ratio = Some(round_to(ratio, 2));

                let capital_at_risk = filtered.recommended_position_size * loss / current_price;
                filtered.capital_at_risk = Some(capital_at_risk);
                if capital_at_risk > self.config.max_risk_per_trade {
                    warn!(
                        "{}: capital at risk {:.4} exceeds per-trade limit {:.4}",
                        filtered.symbol, capital_at_risk, self.config.max_risk_per_trade
                    );
                }

                if ratio < self.config.min_risk_reward {
                    filtered.strength *= self.config.risk_reward_penalty;
                    filtered
                        .reasoning
                        .push_str(&format!(" (Poor risk-reward ratio: {:.2})", ratio));
                    debug!("{}: risk/reward {:.2} penalized", filtered.symbol, ratio);
                }
            }
        }

        // 4. Veto. Applies to every decision below the floor, HOLD included;
        // `vetoed` only marks a BUY/SELL that was overturned.
        if filtered.strength < self.config.min_strength {
            if original_type.is_actionable() {
                info!(
                    "{}: {} signal vetoed by risk filter (strength {:.3})",
                    filtered.symbol,
                    original_type.label(),
                    filtered.strength
                );
            }
            filtered.signal_type = SignalType::Hold;
            filtered.strength = 0.0;
            filtered.recommended_position_size = 0.0;
            filtered.capital_at_risk = None;
            filtered.vetoed = original_type.is_actionable();
            filtered.reasoning.replace(VETO_NOTE);
            if self.config.retain_vetoed_reasoning {
                filtered.reasoning.push_str(". Original rationale: ");
                filtered.reasoning.push_str(original_reasoning.as_str());
            }
        }

        filtered
    }
}

/// Apply the risk filter with an explicit configuration.
pub fn apply_risk_filter(decision: SignalDecision, series: &Series, config: &RiskConfig) -> SignalDecision {
    RiskFilter::new(*config).apply(decision, series)
}
