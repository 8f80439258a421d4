//! Replay command implementation.
//!
//! Feeds a candle file one candle at a time, the way a live chart receives
//! ticks, and prints the newest indicator values after each one.

use anyhow::{Context, Result};
use ta_config::AppConfig;
use ta_core::types::CandleSeries;
use ta_indicators::{IndicatorEngine, IndicatorSnapshot, StreamingEngine};
use tracing::info;

use super::{fmt_value, load_candles};
use crate::cli::{ReplayArgs, ReplayMode};

pub async fn run(args: ReplayArgs, config: &AppConfig) -> Result<()> {
    let candles = load_candles(&args.data, &args.symbol).await?;
    let window = args.window.unwrap_or(config.stream.window);
    if window == 0 {
        anyhow::bail!("--window must be greater than 0");
    }

    info!(window, candles = candles.len(), "Starting replay");
    print_header();

    match args.mode {
        ReplayMode::Batch => {
            let engine = IndicatorEngine::new(config.indicators)?;
            let mut history = CandleSeries::with_capacity(window);

            for candle in &candles {
                history.push(*candle);
                let visible = history.as_slice();
                let bundle = engine.compute(visible);
                bundle
                    .check_alignment(visible.len())
                    .context("Indicator output is not aligned with the candles")?;

                if let Some(snapshot) = bundle.latest() {
                    print_row(candle.timestamp, candle.close, &snapshot);
                }
            }
        }
        ReplayMode::Streaming => {
            // Incremental state covers the full history, not just the window
            let mut engine = StreamingEngine::new(config.indicators)?;
            for candle in &candles {
                let snapshot = engine.update(candle);
                print_row(candle.timestamp, candle.close, &snapshot);
            }
        }
    }

    Ok(())
}

fn print_header() {
    println!(
        "{:>14} {:>12} {:>12} {:>12} {:>10} {:>12} {:>10} {:>12}",
        "timestamp", "close", "sma20", "ema12", "rsi", "macd", "%K", "atr"
    );
}

fn print_row(timestamp: i64, close: f64, snapshot: &IndicatorSnapshot) {
    println!(
        "{:>14} {:>12.4} {:>12} {:>12} {:>10} {:>12} {:>10} {:>12}",
        timestamp,
        close,
        fmt_value(snapshot.sma20),
        fmt_value(snapshot.ema12),
        fmt_value(snapshot.rsi),
        fmt_value(snapshot.macd.macd),
        fmt_value(snapshot.stochastic.k),
        fmt_value(snapshot.atr),
    );
}
