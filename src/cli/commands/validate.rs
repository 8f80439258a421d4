//! Validate configuration command.

use anyhow::Result;
use std::path::Path;
use ta_config::load_validated_config;

pub async fn run(config_path: &Path) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    match load_validated_config(config_path) {
        Ok(config) => {
            let s = &config.indicators;
            println!("Configuration is valid!");
            println!();
            println!("App: {}", config.app.name);
            println!("Environment: {}", config.app.environment);
            println!("Log level: {}", config.logging.level);
            println!("RSI period: {}", s.rsi_period);
            println!("MACD: {}/{}/{}", s.macd_fast, s.macd_slow, s.macd_signal);
            println!("Bollinger: {} x {}", s.bollinger_period, s.bollinger_std_dev);
            println!(
                "Stochastic: {}/{}/{}",
                s.stochastic_period, s.stochastic_smooth_k, s.stochastic_smooth_d
            );
            println!("ATR period: {}", s.atr_period);
            println!("Stream window: {}", config.stream.window);
        }
        Err(e) => {
            println!("Configuration error: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
