//! Configuration management.

mod settings;

pub use settings::{AppConfig, AppSettings, LoggingConfig, StreamSettings};

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use std::path::Path;
use ta_core::{TaError, TaResult};

/// Prefix for environment overrides, e.g. `TA__INDICATORS__RSI_PERIOD=21`.
pub const ENV_PREFIX: &str = "TA";

fn with_environment(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    )
}

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = with_environment(
        Config::builder().add_source(File::from(path).format(FileFormat::Toml).required(true)),
    )
    .build()?;

    config.try_deserialize()
}

/// Parse configuration from a TOML string, without environment overrides.
pub fn parse_config(toml: &str) -> Result<AppConfig, ConfigError> {
    Config::builder()
        .add_source(File::from_str(toml, FileFormat::Toml))
        .build()?
        .try_deserialize()
}

/// Load configuration and check the indicator parameters are usable.
pub fn load_validated_config(path: &Path) -> TaResult<AppConfig> {
    let config = load_config(path).map_err(|e| TaError::Config(e.to_string()))?;
    validate(&config)?;
    Ok(config)
}

/// Check a loaded configuration.
pub fn validate(config: &AppConfig) -> TaResult<()> {
    config.indicators.validate()?;
    if config.stream.window == 0 {
        return Err(TaError::Config(
            "stream.window must be greater than 0".to_string(),
        ));
    }
    Ok(())
}
