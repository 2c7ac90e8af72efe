//! Historical accuracy tracking for prediction models.

use crate::error::{Result, SignalError};
use crate::types::{round_to, ModelPerformance, PerformanceEntry};
use dashmap::DashMap;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Maximum observations kept per symbol/model pair.
pub const MAX_RECORDS_PER_KEY: usize = 100;

/// Ring buffers of predicted-vs-actual observations per (symbol, model).
///
/// Writers to the same key are serialized by the map's shard lock; the
/// fusion path never reads from here.
pub struct PerformanceTracker {
    /// key = (lowercased symbol, model)
    records: DashMap<(String, String), VecDeque<PerformanceEntry>>,
}

impl PerformanceTracker {
    /// Create a new tracker.
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            records: DashMap::new(),
        })
    }

    fn key(symbol: &str, model: &str) -> (String, String) {
        (symbol.to_lowercase(), model.to_string())
    }

    /// Record one observation, evicting the oldest beyond capacity.
    pub fn update(
        &self,
        symbol: &str,
        model: &str,
        actual: f64,
        predicted: f64,
    ) -> Result<PerformanceEntry> {
        if !actual.is_finite() || actual <= 0.0 {
            return Err(SignalError::InvalidEstimate(format!(
                "{}: actual price must be positive (got {})",
                model, actual
            )));
        }
        if !predicted.is_finite() {
            return Err(SignalError::InvalidEstimate(format!(
                "{}: predicted price must be finite",
                model
            )));
        }

        let entry = PerformanceEntry::new(predicted, actual);
        let mut history = self.records.entry(Self::key(symbol, model)).or_default();
        history.push_back(entry.clone());
        while history.len() > MAX_RECORDS_PER_KEY {
            history.pop_front();
        }

        debug!(
            "Model performance updated for {}:{}: accuracy {:.3} ({} records)",
            symbol,
            model,
            entry.accuracy,
            history.len()
        );

        Ok(entry)
    }

    /// Accuracy statistics per model for `symbol`, ordered by model name.
    pub fn stats(&self, symbol: &str) -> Vec<ModelPerformance> {
        let symbol = symbol.to_lowercase();
        let mut stats: Vec<ModelPerformance> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == symbol && !entry.value().is_empty())
            .map(|entry| {
                let scores: Vec<f64> = entry.value().iter().map(|e| e.accuracy).collect();
                let n = scores.len() as f64;
                let avg = scores.iter().sum::<f64>() / n;
                let variance = scores.iter().map(|s| (s - avg).powi(2)).sum::<f64>() / n;

                ModelPerformance {
                    model: entry.key().1.clone(),
                    avg_accuracy: avg,
                    std_accuracy: variance.sqrt(),
                    min_accuracy: scores.iter().copied().fold(f64::INFINITY, f64::min),
                    max_accuracy: scores.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                    total_predictions: scores.len(),
                }
            })
            .collect();

        stats.sort_by(|a, b| a.model.cmp(&b.model));
        stats
    }

    /// Mean accuracy per model for `symbol` (3 dp), for confidence mixing.
    pub fn accuracy_by_model(&self, symbol: &str) -> BTreeMap<String, f64> {
        self.stats(symbol)
            .into_iter()
            .map(|s| (s.model, round_to(s.avg_accuracy, 3)))
            .collect()
    }

    /// Recorded observations for one symbol/model pair, oldest first.
    pub fn history(&self, symbol: &str, model: &str) -> Vec<PerformanceEntry> {
        self.records
            .get(&Self::key(symbol, model))
            .map(|h| h.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Drop all observations for `symbol`.
    pub fn clear(&self, symbol: &str) {
        let symbol = symbol.to_lowercase();
        self.records.retain(|key, _| key.0 != symbol);
    }
}
