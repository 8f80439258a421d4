//! List indicators command.

use anyhow::Result;
use ta_config::AppConfig;
use ta_indicators::engine::{EMA_PERIODS, SMA_PERIODS};

pub async fn run(config: &AppConfig) -> Result<()> {
    let s = &config.indicators;
    let sma: Vec<String> = SMA_PERIODS.iter().map(|p| p.to_string()).collect();
    let ema: Vec<String> = EMA_PERIODS.iter().map(|p| p.to_string()).collect();

    let entries = [
        ("SMA", format!("periods {}", sma.join(", ")), "Simple moving average of close"),
        ("EMA", format!("periods {}", ema.join(", ")), "Exponential moving average seeded with an SMA"),
        ("RSI", format!("period {}", s.rsi_period), "Wilder-smoothed relative strength, 0-100"),
        (
            "MACD",
            format!("{}/{}/{}", s.macd_fast, s.macd_slow, s.macd_signal),
            "EMA spread with signal line and histogram",
        ),
        (
            "Bollinger",
            format!("period {}, {}σ", s.bollinger_period, s.bollinger_std_dev),
            "SMA with population standard deviation bands",
        ),
        (
            "Stochastic",
            format!("{}/{}/{}", s.stochastic_period, s.stochastic_smooth_k, s.stochastic_smooth_d),
            "Smoothed %K and %D, 0-100",
        ),
        ("ATR", format!("period {}", s.atr_period), "Wilder-smoothed true range"),
    ];

    println!("Available Indicators");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    for (name, params, description) in entries {
        println!("  {} ({})", name, params);
        println!("  ───────────────────────────────────────────────────────");
        println!("  {}", description);
        println!();
    }

    Ok(())
}
