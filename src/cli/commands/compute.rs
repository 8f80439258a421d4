//! Compute command implementation.

use anyhow::{Context, Result};
use ta_config::AppConfig;
use ta_indicators::{IndicatorBundle, IndicatorEngine};
use tracing::info;

use super::{fmt_value, load_candles};
use crate::cli::{ComputeArgs, OutputFormat};

pub async fn run(args: ComputeArgs, config: &AppConfig) -> Result<()> {
    let candles = load_candles(&args.data, &args.symbol).await?;

    let engine = IndicatorEngine::new(config.indicators)?;
    let bundle = engine.compute(&candles);
    bundle
        .check_alignment(candles.len())
        .context("Indicator output is not aligned with the candles")?;

    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&bundle)?),
        OutputFormat::Text => print_summary(&bundle, candles.last().map(|c| c.close)),
    }

    if let Some(save_path) = &args.save {
        let json = serde_json::to_string_pretty(&bundle)?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    Ok(())
}

fn print_summary(bundle: &IndicatorBundle, last_close: Option<f64>) {
    println!("Indicator Summary ({} candles)", bundle.len());
    println!("═══════════════════════════════════════════════════════════");
    println!("  {:<18} {:>12} {:>14}", "series", "first value", "latest");
    println!("  ───────────────────────────────────────────────────────");

    for (name, series) in bundle.series() {
        let first = series
            .first_defined()
            .map(|i| format!("#{}", i))
            .unwrap_or_else(|| "-".to_string());
        println!("  {:<18} {:>12} {:>14}", name, first, fmt_value(series.last()));
    }

    if let (Some(latest), Some(close)) = (bundle.latest(), last_close) {
        println!();
        if latest.bollinger.is_overbought(close) {
            println!("  Close {:.4} is above the upper Bollinger band", close);
        } else if latest.bollinger.is_oversold(close) {
            println!("  Close {:.4} is below the lower Bollinger band", close);
        }
    }
}
