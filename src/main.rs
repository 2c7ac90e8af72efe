use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tradesignal::{
    Config, EnsembleEstimate, PredictionEstimate, Series, SignalDecision, SignalEngine,
    StaticPredictor,
};

/// One input file: a validated series plus any model estimates for it.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Batch {
    bars: Series,
    #[serde(default)]
    predictions: Vec<PredictionEstimate>,
}

/// Printed result for one batch.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AnalysisReport {
    symbol: String,
    decision: SignalDecision,
    ensemble: EnsembleEstimate,
}

fn run_batch(config: Config, path: &Path) -> anyhow::Result<AnalysisReport> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch file {}", path.display()))?;
    let batch: Batch = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse batch file {}", path.display()))?;

    let mut engine = SignalEngine::new(config);
    for estimate in batch.predictions {
        engine.register_predictor(Arc::new(StaticPredictor::new(estimate)));
    }

    let analysis = engine
        .analyze(&batch.bars)
        .with_context(|| format!("Analysis failed for {}", path.display()))?;

    Ok(AnalysisReport {
        symbol: batch.bars.symbol().to_string(),
        decision: analysis.decision,
        ensemble: analysis.ensemble,
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tradesignal=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let paths: Vec<PathBuf> = std::env::args().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        anyhow::bail!("usage: tradesignal <batch.json>...");
    }

    let config = Config::from_env();
    info!("Analyzing {} batch file(s)", paths.len());

    let mut tasks = JoinSet::new();
    for path in paths {
        tasks.spawn_blocking(move || {
            let result = run_batch(config, &path);
            (path, result)
        });
    }

    let mut failed = 0usize;
    let mut total = 0usize;
    while let Some(joined) = tasks.join_next().await {
        total += 1;
        match joined {
            Ok((_, Ok(report))) => {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            Ok((path, Err(e))) => {
                failed += 1;
                error!("Batch {} failed: {:#}", path.display(), e);
            }
            Err(e) => {
                failed += 1;
                error!("Batch task panicked: {}", e);
            }
        }
    }

    if failed > 0 {
        anyhow::bail!("{} of {} batches failed", failed, total);
    }
    Ok(())
}
