//! Weighted fusion of indicator votes into one BUY/SELL/HOLD decision.

use crate::config::FusionConfig;
use crate::types::{
    BollingerValues, IndicatorKind, IndicatorReading, IndicatorSnapshot, IndicatorVotes,
    MacdValues, PredictionEstimate, PredictionReading, Reasoning, SignalType, StrengthLabel,
    VolumeConfirmation, WeightedVote,
};
use tracing::debug;

/// Outcome of fusing one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct FusionOutcome {
    pub votes: IndicatorVotes,
    /// Weighted BUY total, volume boost included.
    pub buy_total: f64,
    /// Weighted SELL total, volume boost included.
    pub sell_total: f64,
    pub signal_type: SignalType,
    /// Unrounded decision strength in `[0, 1]`.
    pub strength: f64,
    pub reasoning: Reasoning,
}

/// Turns an indicator snapshot (plus an optional prediction) into votes and
/// combines them with fixed weights.
#[derive(Debug, Clone, Default)]
pub struct SignalFusionEngine {
    config: FusionConfig,
}

impl SignalFusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Run vote derivation, weighting, the decision rule and reasoning.
    pub fn fuse(
        &self,
        snapshot: &IndicatorSnapshot,
        prediction: Option<&PredictionEstimate>,
    ) -> FusionOutcome {
        let votes = self.derive_votes(snapshot, prediction);
        let (buy_total, sell_total) = self.totals(&votes);
        let (signal_type, strength) = self.decide(buy_total, sell_total);
        let reasoning = self.reasoning(&votes, signal_type, strength);

        debug!(
            "Fusion totals: buy={:.3} sell={:.3} -> {} ({:.3})",
            buy_total,
            sell_total,
            signal_type.label(),
            strength
        );

        FusionOutcome {
            votes,
            buy_total,
            sell_total,
            signal_type,
            strength,
            reasoning,
        }
    }

    /// Per-indicator votes for a snapshot.
    pub fn derive_votes(
        &self,
        snapshot: &IndicatorSnapshot,
        prediction: Option<&PredictionEstimate>,
    ) -> IndicatorVotes {
        let price = snapshot.current_price;

        IndicatorVotes {
            rsi: self.rsi_vote(snapshot.rsi),
            macd: Self::macd_vote(snapshot.macd),
            moving_average: Self::moving_average_vote(price, snapshot.sma20, snapshot.sma50),
            bollinger: snapshot.bollinger.map(|bb| Self::bollinger_vote(price, bb)),
            volume: self.volume_confirmation(snapshot.current_volume, snapshot.volume_sma20),
            prediction: prediction.and_then(|p| self.prediction_vote(price, p)),
        }
    }

    /// RSI above the overbought line sells, below the oversold line buys.
    pub fn rsi_vote(&self, rsi: Option<f64>) -> IndicatorReading {
        let Some(value) = rsi else {
            return IndicatorReading::hold(None);
        };

        let overbought = self.config.rsi_overbought;
        let oversold = self.config.rsi_oversold;

        if value > overbought {
            IndicatorReading::sell((value - overbought) / (100.0 - overbought), Some(value))
        } else if value < oversold {
            IndicatorReading::buy((oversold - value) / oversold, Some(value))
        } else {
            IndicatorReading::hold(Some(value))
        }
    }

    /// MACD above its signal line buys, otherwise sells.
    pub fn macd_vote(macd: Option<MacdValues>) -> IndicatorReading {
        let Some(values) = macd else {
            return IndicatorReading::hold(None);
        };

        let strength = if values.signal != 0.0 {
            (values.macd - values.signal).abs() / values.signal.abs()
        } else {
            0.5
        };

        if values.macd > values.signal {
            IndicatorReading::buy(strength, Some(values.histogram))
        } else {
            IndicatorReading::sell(strength, Some(values.histogram))
        }
    }

    /// Absent unless both the 20- and 50-bar averages exist.
    pub fn moving_average_vote(
        price: f64,
        sma20: Option<f64>,
        sma50: Option<f64>,
    ) -> Option<IndicatorReading> {
        let (fast, slow) = (sma20?, sma50?);

        let reading = if fast > slow && price > fast {
            IndicatorReading::buy((price - fast) / fast, Some(fast))
        } else if fast < slow && price < fast {
            IndicatorReading::sell((fast - price) / fast, Some(fast))
        } else {
            IndicatorReading::hold(Some(fast))
        };
        Some(reading)
    }

    /// Price outside the bands votes for a reversal.
    pub fn bollinger_vote(price: f64, bands: BollingerValues) -> IndicatorReading {
        if price > bands.upper {
            IndicatorReading::sell((price - bands.upper) / bands.upper, Some(bands.upper))
        } else if price < bands.lower {
            IndicatorReading::buy((bands.lower - price) / bands.lower, Some(bands.lower))
        } else {
            IndicatorReading::hold(Some(bands.middle))
        }
    }

    /// Confirmed when current volume is a spike over its 20-bar average.
    pub fn volume_confirmation(&self, volume: f64, volume_sma: Option<f64>) -> VolumeConfirmation {
        let Some(average) = volume_sma.filter(|v| *v > 0.0) else {
            return VolumeConfirmation::default();
        };

        let ratio = volume / average;
        if volume > average * self.config.volume_spike_ratio {
            VolumeConfirmation {
                confirmed: true,
                strength: (ratio - 1.0).min(1.0),
                ratio: Some(ratio),
            }
        } else {
            VolumeConfirmation {
                confirmed: false,
                strength: 0.0,
                ratio: Some(ratio),
            }
        }
    }

    /// Absent when the estimate does not clear the confidence gate.
    pub fn prediction_vote(
        &self,
        price: f64,
        estimate: &PredictionEstimate,
    ) -> Option<PredictionReading> {
        if estimate.predicted_price <= 0.0 || estimate.confidence <= self.config.prediction_min_confidence {
            return None;
        }

        let change = (estimate.predicted_price - price) / price;
        let strength = estimate.confidence * change.abs() * self.config.prediction_strength_scale;

        let reading = if change > self.config.prediction_min_move {
            IndicatorReading::buy(strength, Some(change))
        } else if change < -self.config.prediction_min_move {
            IndicatorReading::sell(strength, Some(change))
        } else {
            IndicatorReading::hold(Some(change))
        };

        Some(PredictionReading {
            reading,
            confidence: estimate.confidence,
            predicted_price: estimate.predicted_price,
        })
    }

    fn weight(&self, kind: IndicatorKind) -> f64 {
        let weights = &self.config.weights;
        match kind {
            IndicatorKind::Rsi => weights.rsi,
            IndicatorKind::Macd => weights.macd,
            IndicatorKind::MovingAverage => weights.moving_average,
            IndicatorKind::Bollinger => weights.bollinger,
            IndicatorKind::Prediction => weights.prediction,
            // Volume boosts the leading side instead of voting.
            IndicatorKind::Volume => 0.0,
        }
    }

    /// Every directional vote with its weight and weighted contribution.
    pub fn strength_breakdown(&self, votes: &IndicatorVotes) -> Vec<WeightedVote> {
        votes
            .directional()
            .into_iter()
            .map(|(kind, reading)| {
                let weight = self.weight(kind);
                WeightedVote {
                    indicator: kind,
                    direction: reading.direction,
                    strength: reading.strength,
                    weight,
                    contribution: weight * reading.strength,
                }
            })
            .collect()
    }

    /// Weighted BUY and SELL totals, with the volume boost applied to the
    /// side that leads (SELL on a tie).
    pub fn totals(&self, votes: &IndicatorVotes) -> (f64, f64) {
        let mut buy = 0.0;
        let mut sell = 0.0;

        for vote in self.strength_breakdown(votes) {
            match vote.direction {
                SignalType::Buy => buy += vote.contribution,
                SignalType::Sell => sell += vote.contribution,
                SignalType::Hold => {}
            }
        }

        if votes.volume.confirmed {
            let boost = votes.volume.strength * self.config.volume_boost;
            if buy > sell {
                buy += boost;
            } else {
                sell += boost;
            }
        }

        (buy, sell)
    }

    /// A side wins only if it leads and clears the decision threshold.
    pub fn decide(&self, buy_total: f64, sell_total: f64) -> (SignalType, f64) {
        let threshold = self.config.decision_threshold;

        if buy_total > sell_total && buy_total > threshold {
            (SignalType::Buy, buy_total.min(1.0))
        } else if sell_total > buy_total && sell_total > threshold {
            (SignalType::Sell, sell_total.min(1.0))
        } else {
            (SignalType::Hold, 0.0)
        }
    }

    /// Clauses for every indicator agreeing with the decision, prefixed with
    /// a strength descriptor.
    pub fn reasoning(&self, votes: &IndicatorVotes, signal_type: SignalType, strength: f64) -> Reasoning {
        let mut reasons: Vec<String> = Vec::new();

        for (kind, reading) in votes.directional() {
            if reading.direction != signal_type {
                continue;
            }
            if let Some(clause) = self.clause(kind, &reading, votes, signal_type) {
                reasons.push(clause);
            }
        }

        if votes.volume.confirmed {
            reasons.push("High volume confirms the signal".to_string());
        }
        if reasons.is_empty() {
            reasons.push("Mixed signals suggest holding position".to_string());
        }

        let mut reasoning = Reasoning::new();
        reasoning.push_str(&format!(
            "{} {} signal. ",
            StrengthLabel::from_strength(strength).label(),
            signal_type.label().to_lowercase()
        ));
        reasoning.push_str(&reasons.join("; "));
        reasoning
    }

    fn clause(
        &self,
        kind: IndicatorKind,
        reading: &IndicatorReading,
        votes: &IndicatorVotes,
        signal_type: SignalType,
    ) -> Option<String> {
        let clause = match (kind, signal_type) {
            (IndicatorKind::Rsi, SignalType::Buy) => {
                format!("RSI indicates oversold conditions (strength: {:.2})", reading.strength)
            }
            (IndicatorKind::Rsi, SignalType::Sell) => {
                format!("RSI indicates overbought conditions (strength: {:.2})", reading.strength)
            }
            (IndicatorKind::Rsi, SignalType::Hold) => {
                reading.value?;
                "RSI is in the neutral zone".to_string()
            }
            (IndicatorKind::Macd, SignalType::Buy) => "MACD shows bullish momentum".to_string(),
            (IndicatorKind::Macd, SignalType::Sell) => "MACD shows bearish momentum".to_string(),
            (IndicatorKind::Macd, SignalType::Hold) => return None,
            (IndicatorKind::MovingAverage, SignalType::Hold) => {
                "Moving averages show no clear trend".to_string()
            }
            (IndicatorKind::MovingAverage, _) => "Moving averages support the trend".to_string(),
            (IndicatorKind::Bollinger, SignalType::Hold) => {
                "Price is within the Bollinger Bands".to_string()
            }
            (IndicatorKind::Bollinger, _) => "Bollinger Bands indicate potential reversal".to_string(),
            (IndicatorKind::Prediction, SignalType::Hold) => format!(
                "Predicted move is within ±{:.0}%",
                self.config.prediction_min_move * 100.0
            ),
            (IndicatorKind::Prediction, _) => format!(
                "Price prediction favors this move (confidence: {:.2})",
                votes.prediction.map(|p| p.confidence).unwrap_or_default()
            ),
            (IndicatorKind::Volume, _) => return None,
        };
        Some(clause)
    }
}
