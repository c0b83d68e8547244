//! Outbound data clients and the port traits the services consume.
//!
//! Each client wraps one upstream dependency. Recoverable failures are
//! resolved inside the client (secondary endpoints, derived fallbacks);
//! only total failure surfaces as an error, which the service layer maps
//! to stale-cache or neutral defaults so callers never need per-source
//! error handling.

mod anthropic;
mod binance;
mod fear_greed;
mod llm;
mod news;
mod openai;

pub use anthropic::Anthropic;
pub use binance::BinanceClient;
pub use fear_greed::FearGreedClient;
pub use llm::{build_llm, Llm};
pub use news::NewsClient;
pub use openai::OpenAi;

use async_trait::async_trait;

use crate::domain::{Article, Asset, Candle, FearGreed, LongShortBias, Ticker};
use crate::error::Result;

/// Exchange market data port.
#[async_trait]
pub trait MarketFeed: Send + Sync {
    /// Feed name for logging.
    fn name(&self) -> &'static str;

    /// Long/short positioning bias for an asset.
    async fn long_short_bias(&self, asset: Asset) -> Result<LongShortBias>;

    /// Order-book buy share in percent, from summed bid/ask notional.
    async fn order_book_bias(&self, asset: Asset) -> Result<f64>;

    /// 24h spot ticker.
    async fn ticker(&self, asset: Asset) -> Result<Ticker>;

    /// Most recent `days` daily candles, oldest first.
    async fn daily_candles(&self, asset: Asset, days: u32) -> Result<Vec<Candle>>;
}

/// Fear & Greed index port.
#[async_trait]
pub trait SentimentFeed: Send + Sync {
    fn name(&self) -> &'static str;

    /// Latest index reading.
    async fn fear_greed(&self) -> Result<FearGreed>;

    /// Daily index values over the last `days` days, newest first.
    async fn fear_greed_history(&self, days: u32) -> Result<Vec<u8>>;
}

/// Crypto news feed port.
#[async_trait]
pub trait NewsFeed: Send + Sync {
    fn name(&self) -> &'static str;

    /// Recent articles, filtered of removed/empty entries and capped at
    /// `limit`. An empty list is a valid result, not an error.
    async fn latest_articles(&self, limit: usize) -> Result<Vec<Article>>;
}
