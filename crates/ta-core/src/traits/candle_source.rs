//! Candle source trait definitions.

use async_trait::async_trait;

use crate::error::DataError;
use crate::types::Candle;

/// Producer of ordered candle history.
///
/// Implementations must return candles sorted ascending by timestamp; the
/// indicator calculators consume them in the given order without re-sorting.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch all available candles for a symbol, oldest first.
    async fn load_candles(&self, symbol: &str) -> Result<Vec<Candle>, DataError>;

    /// Fetch the most recent `limit` candles, oldest first.
    async fn recent_candles(&self, symbol: &str, limit: usize) -> Result<Vec<Candle>, DataError> {
        let mut candles = self.load_candles(symbol).await?;
        let start = candles.len().saturating_sub(limit);
        candles.drain(..start);
        Ok(candles)
    }

    /// Get the source name.
    fn name(&self) -> &str;
}
