//! CSV candle source.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use ta_core::error::DataError;
use ta_core::traits::CandleSource;
use ta_core::types::Candle;

/// CSV record format.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp", alias = "time")]
    date: String,
    #[serde(alias = "Open", alias = "open")]
    open: f64,
    #[serde(alias = "High", alias = "high")]
    high: f64,
    #[serde(alias = "Low", alias = "low")]
    low: f64,
    #[serde(alias = "Close", alias = "close", alias = "Adj Close")]
    close: f64,
    #[serde(alias = "Volume", alias = "volume", default)]
    volume: f64,
}

/// CSV candle source.
///
/// Points either at a single file, or at a directory holding one
/// `{symbol}.csv` per symbol.
pub struct CsvCandleSource {
    path: PathBuf,
}

impl CsvCandleSource {
    /// Create a new CSV candle source.
    pub fn new(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(DataError::SourceNotFound(path.display().to_string()));
        }
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Resolve the file holding `symbol`'s candles.
    fn resolve(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if self.path.is_file() {
            return Ok(self.path.clone());
        }

        let lower = symbol.to_lowercase();
        [
            self.path.join(format!("{}.csv", symbol)),
            self.path.join(format!("{}.csv", lower)),
        ]
        .into_iter()
        .find(|candidate| candidate.is_file())
        .ok_or_else(|| DataError::SourceNotFound(format!("{} in {}", symbol, self.path.display())))
    }

    /// Load candles from a specific path, sorted ascending by timestamp.
    fn load_from_path(&self, path: &Path) -> Result<Vec<Candle>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError {
                record: 0,
                message: e.to_string(),
            })?;

        let mut candles = Vec::new();

        for (record_index, result) in reader.deserialize().enumerate() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError {
                record: record_index + 1,
                message: e.to_string(),
            })?;

            let timestamp = parse_timestamp(&record.date)?;

            candles.push(Candle::new(
                timestamp,
                record.open,
                record.high,
                record.low,
                record.close,
                record.volume,
            ));
        }

        if candles.is_empty() {
            return Err(DataError::NoDataAvailable);
        }

        // Stable sort keeps equal timestamps in file order
        candles.sort_by_key(|c| c.timestamp);
        debug!(path = %path.display(), candles = candles.len(), "parsed csv");

        Ok(candles)
    }
}

#[async_trait]
impl CandleSource for CsvCandleSource {
    async fn load_candles(&self, symbol: &str) -> Result<Vec<Candle>, DataError> {
        let path = self.resolve(symbol)?;
        let candles = self.load_from_path(&path)?;
        info!(path = %path.display(), candles = candles.len(), "loaded candles");
        Ok(candles)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various timestamp formats into Unix milliseconds.
fn parse_timestamp(date_str: &str) -> Result<i64, DataError> {
    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M"];
    for format in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            if let Some(dt) = d.and_hms_opt(0, 0, 0) {
                return Ok(dt.and_utc().timestamp_millis());
            }
        }
    }

    // Try parsing as Unix timestamp
    if let Ok(ts) = date_str.parse::<i64>() {
        // Assume milliseconds if > 10 digits
        if ts > 10_000_000_000 {
            return Ok(ts);
        } else {
            return Ok(ts * 1000);
        }
    }

    Err(DataError::InvalidTimestamp(date_str.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_temp(name: &str, contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("ta-data-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("TEST.csv");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_timestamp() {
        // Test various formats
        assert_eq!(parse_timestamp("2024-01-15").unwrap(), 1_705_276_800_000);
        assert!(parse_timestamp("2024-01-15 10:30:00").is_ok());
        assert!(parse_timestamp("2024-01-15T10:30:00").is_ok());
        assert_eq!(parse_timestamp("1705312800000").unwrap(), 1_705_312_800_000); // Unix ms
        assert_eq!(parse_timestamp("1705312800").unwrap(), 1_705_312_800_000); // Unix sec
        assert!(matches!(
            parse_timestamp("yesterday"),
            Err(DataError::InvalidTimestamp(_))
        ));
    }

    #[tokio::test]
    async fn test_load_sorts_ascending() {
        let path = write_temp(
            "sort",
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-03,11,12,10,11.5,300\n\
             2024-01-01,10,11,9,10.5,100\n\
             2024-01-02,10.5,11.5,10,11,200\n",
        );

        let source = CsvCandleSource::new(&path).unwrap();
        let candles = source.load_candles("TEST").await.unwrap();

        assert_eq!(candles.len(), 3);
        assert!(candles.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(candles[0].close, 10.5);
        assert_eq!(candles[2].volume, 300.0);
    }

    #[tokio::test]
    async fn test_load_from_directory_by_symbol() {
        let path = write_temp("dir", "timestamp,open,high,low,close\n1705312800,1,2,0.5,1.5\n");
        let dir = path.parent().unwrap();

        let source = CsvCandleSource::new(dir).unwrap();
        let candles = source.load_candles("TEST").await.unwrap();
        assert_eq!(candles.len(), 1);
        // Missing volume column defaults to zero
        assert_eq!(candles[0].volume, 0.0);

        assert!(matches!(
            source.load_candles("MISSING").await,
            Err(DataError::SourceNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_bad_record_reports_position() {
        let path = write_temp(
            "bad",
            "Date,Open,High,Low,Close\n2024-01-01,1,2,0.5,1.5\n2024-01-02,1,2,oops,1.5\n",
        );

        let source = CsvCandleSource::new(&path).unwrap();
        match source.load_candles("TEST").await {
            Err(DataError::ParseError { record, .. }) => assert_eq!(record, 2),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            CsvCandleSource::new("/definitely/not/here.csv"),
            Err(DataError::SourceNotFound(_))
        ));
    }
}
