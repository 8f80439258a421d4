//! CLI definitions.

pub mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use ta_config::{load_validated_config, AppConfig};

#[derive(Parser)]
#[command(name = "ta")]
#[command(author, version, about = "Technical indicators for candlestick charts")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Log level (overrides the configured level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute every indicator over a candle file
    Compute(ComputeArgs),
    /// Replay a candle file tick by tick, printing the latest values
    Replay(ReplayArgs),
    /// List available indicators
    Indicators,
    /// Validate configuration
    ValidateConfig,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ReplayMode {
    /// Recompute the whole bundle over the rolling window on every candle
    Batch,
    /// Advance incremental indicators one candle at a time
    Streaming,
}

#[derive(clap::Args)]
pub struct ComputeArgs {
    /// Data file (CSV) or directory of `{symbol}.csv` files
    #[arg(long)]
    pub data: PathBuf,

    /// Symbol to load when `--data` is a directory
    #[arg(short = 'S', long, default_value = "DATA")]
    pub symbol: String,

    /// Output format
    #[arg(long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Save the bundle as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct ReplayArgs {
    /// Data file (CSV) or directory of `{symbol}.csv` files
    #[arg(long)]
    pub data: PathBuf,

    /// Symbol to load when `--data` is a directory
    #[arg(short = 'S', long, default_value = "DATA")]
    pub symbol: String,

    /// Rolling window size (defaults to `stream.window`)
    #[arg(short, long)]
    pub window: Option<usize>,

    /// Replay mode
    #[arg(long, value_enum, default_value = "batch")]
    pub mode: ReplayMode,
}

/// Load configuration, falling back to defaults when the file does not exist.
pub fn load_app_config(path: &Path) -> Result<AppConfig> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    load_validated_config(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}
