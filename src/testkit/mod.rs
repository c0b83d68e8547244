//! Scripted test doubles for the outbound ports.
//!
//! Every double records its calls into a shared [`CallLog`] so tests can
//! assert call counts and cross-source ordering, and each can be scripted
//! to fail or to stall for a fixed delay.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::client::{Llm, MarketFeed, NewsFeed, SentimentFeed};
use crate::domain::{Article, Asset, Candle, FearGreed, LongShortBias, Ticker};
use crate::error::{Error, Result};

/// Shared, ordered record of every scripted call.
pub type CallLog = Arc<Mutex<Vec<String>>>;

/// Create an empty call log.
#[must_use]
pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Entries in `log` whose tag starts with `prefix`.
#[must_use]
pub fn calls_with_prefix(log: &CallLog, prefix: &str) -> Vec<String> {
    log.lock()
        .iter()
        .filter(|entry| entry.starts_with(prefix))
        .cloned()
        .collect()
}

fn scripted_failure(source: &'static str) -> Error {
    Error::Connection(format!("scripted {source} failure"))
}

/// Scripted [`MarketFeed`].
pub struct ScriptedMarketFeed {
    log: CallLog,
    bias: LongShortBias,
    book_pct: f64,
    price: Decimal,
    change_24h_pct: f64,
    candles: Vec<Candle>,
    failing: bool,
    failing_assets: Vec<Asset>,
    fail_after: Option<usize>,
    calls: AtomicUsize,
    delay: Duration,
}

impl ScriptedMarketFeed {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            bias: LongShortBias::from_ratio(1.0),
            book_pct: 50.0,
            price: dec!(100),
            change_24h_pct: 0.0,
            candles: vec![
                Candle {
                    close: 100.0,
                    volume: 1000.0
                };
                14
            ],
            failing: false,
            failing_assets: Vec::new(),
            fail_after: None,
            calls: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn with_ratio(mut self, ratio: f64) -> Self {
        self.bias = LongShortBias::from_ratio(ratio);
        self
    }

    #[must_use]
    pub fn with_book_pct(mut self, book_pct: f64) -> Self {
        self.book_pct = book_pct;
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    #[must_use]
    pub fn with_candles(mut self, candles: Vec<Candle>) -> Self {
        self.candles = candles;
        self
    }

    /// Fail every call.
    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Fail calls for one asset only.
    #[must_use]
    pub fn failing_for(mut self, asset: Asset) -> Self {
        self.failing_assets.push(asset);
        self
    }

    /// Succeed for the first `n` calls (across all methods), then fail.
    #[must_use]
    pub fn fail_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }

    /// Stall every call for `delay`.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    async fn record(&self, method: &str, asset: Asset) -> Result<()> {
        let call_index = self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().push(format!("{method}:{asset}"));
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing || self.failing_assets.contains(&asset) {
            return Err(scripted_failure("market feed"));
        }
        if self.fail_after.is_some_and(|n| call_index >= n) {
            return Err(scripted_failure("market feed"));
        }
        Ok(())
    }
}

#[async_trait]
impl MarketFeed for ScriptedMarketFeed {
    fn name(&self) -> &'static str {
        "scripted-market"
    }

    async fn long_short_bias(&self, asset: Asset) -> Result<LongShortBias> {
        self.record("long_short_bias", asset).await?;
        Ok(self.bias)
    }

    async fn order_book_bias(&self, asset: Asset) -> Result<f64> {
        self.record("order_book_bias", asset).await?;
        Ok(self.book_pct)
    }

    async fn ticker(&self, asset: Asset) -> Result<Ticker> {
        self.record("ticker", asset).await?;
        Ok(Ticker {
            asset,
            price: self.price,
            change_24h_pct: self.change_24h_pct,
            volume_24h: 1_000_000.0,
        })
    }

    async fn daily_candles(&self, asset: Asset, _days: u32) -> Result<Vec<Candle>> {
        self.record("daily_candles", asset).await?;
        Ok(self.candles.clone())
    }
}

/// Scripted [`SentimentFeed`].
pub struct ScriptedSentimentFeed {
    log: CallLog,
    value: u8,
    history: Vec<u8>,
    failing: bool,
}

impl ScriptedSentimentFeed {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            value: 50,
            history: vec![50; 30],
            failing: false,
        }
    }

    #[must_use]
    pub fn with_value(mut self, value: u8) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn with_history(mut self, history: Vec<u8>) -> Self {
        self.history = history;
        self
    }

    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl SentimentFeed for ScriptedSentimentFeed {
    fn name(&self) -> &'static str {
        "scripted-sentiment"
    }

    async fn fear_greed(&self) -> Result<FearGreed> {
        self.log.lock().push("fear_greed".to_string());
        if self.failing {
            return Err(scripted_failure("sentiment feed"));
        }
        Ok(FearGreed::new(self.value))
    }

    async fn fear_greed_history(&self, days: u32) -> Result<Vec<u8>> {
        self.log.lock().push("fear_greed_history".to_string());
        if self.failing {
            return Err(scripted_failure("sentiment feed"));
        }
        Ok(self.history.iter().copied().take(days as usize).collect())
    }
}

/// Scripted [`NewsFeed`].
pub struct ScriptedNewsFeed {
    log: CallLog,
    articles: Vec<Article>,
    failing: bool,
}

impl ScriptedNewsFeed {
    #[must_use]
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            articles: Vec::new(),
            failing: false,
        }
    }

    #[must_use]
    pub fn with_articles(mut self, articles: Vec<Article>) -> Self {
        self.articles = articles;
        self
    }

    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }
}

#[async_trait]
impl NewsFeed for ScriptedNewsFeed {
    fn name(&self) -> &'static str {
        "scripted-news"
    }

    async fn latest_articles(&self, limit: usize) -> Result<Vec<Article>> {
        self.log.lock().push("latest_articles".to_string());
        if self.failing {
            return Err(scripted_failure("news feed"));
        }
        Ok(self.articles.iter().take(limit).cloned().collect())
    }
}

/// Scripted [`Llm`] returning a fixed response.
pub struct ScriptedLlm {
    log: CallLog,
    response: String,
    failing: bool,
    delay: Duration,
}

impl ScriptedLlm {
    #[must_use]
    pub fn new(log: CallLog, response: impl Into<String>) -> Self {
        Self {
            log,
            response: response.into(),
            failing: false,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl Llm for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted-llm"
    }

    async fn complete(&self, _prompt: &str) -> Result<String> {
        self.log.lock().push("llm:complete".to_string());
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if self.failing {
            return Err(scripted_failure("llm"));
        }
        Ok(self.response.clone())
    }
}

/// A usable news article for scripted feeds.
#[must_use]
pub fn sample_article(headline: &str) -> Article {
    Article {
        headline: headline.to_string(),
        source: "CoinDesk".to_string(),
        url: format!(
            "https://example.com/{}",
            headline.to_lowercase().replace(' ', "-")
        ),
        published_at: Utc::now(),
        body: "Article body.".to_string(),
    }
}
