//! CLI command implementations.

pub mod compute;
pub mod indicators;
pub mod replay;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use ta_core::traits::CandleSource;
use ta_core::types::Candle;
use ta_data::{validate_candles, CsvCandleSource};
use tracing::{info, warn};

/// Load candles for `symbol` and report anything suspicious in them.
async fn load_candles(path: &Path, symbol: &str) -> Result<Vec<Candle>> {
    if !path.exists() {
        anyhow::bail!(
            "Data path '{}' does not exist. Provide a CSV file or directory containing CSV files (e.g. --data ./data)",
            path.display()
        );
    }

    let source = CsvCandleSource::new(path)?;
    let candles = source
        .load_candles(symbol)
        .await
        .with_context(|| format!("Failed to load candles from {}", path.display()))?;

    let issues = validate_candles(&candles);
    for issue in issues.iter().take(5) {
        warn!("{}", issue);
    }

    info!(candles = candles.len(), issues = issues.len(), "Loaded candles");
    Ok(candles)
}

fn fmt_value(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.4}", v),
        None => "-".to_string(),
    }
}
