//! Shared builders for the integration suites.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use marketpulse::client::{Llm, MarketFeed, NewsFeed, SentimentFeed};
use marketpulse::config::SchedulerConfig;
use marketpulse::domain::{
    Asset, Direction, FearGreedLabel, Prediction, Timeframe, PREDICTION_VALIDITY,
};
use marketpulse::predictor::{NewsService, PredictionGenerator};
use marketpulse::scheduler::Scheduler;
use marketpulse::service::MarketDataService;
use marketpulse::store::{MemoryPredictionStore, MemoryStrategyStore};
use rust_decimal_macros::dec;
use uuid::Uuid;

/// Canonical well-formed generation response.
pub const BULLISH_RESPONSE: &str =
    r#"{"prediction":"BULLISH","confidence":82,"targetPrice":2000,"reasoning":"test"}"#;

/// Default freshness window used by the fixtures.
pub const FRESHNESS: Duration = Duration::from_secs(600);

pub fn market_service(
    market: Arc<dyn MarketFeed>,
    sentiment: Arc<dyn SentimentFeed>,
    depth_ttl: Duration,
) -> Arc<MarketDataService> {
    Arc::new(MarketDataService::new(
        market,
        sentiment,
        depth_ttl,
        Duration::from_secs(600),
    ))
}

pub fn generator(
    market: Arc<dyn MarketFeed>,
    sentiment: Arc<dyn SentimentFeed>,
    llm: Arc<dyn Llm>,
    store: Arc<MemoryPredictionStore>,
) -> Arc<PredictionGenerator> {
    Arc::new(PredictionGenerator::new(
        market, sentiment, llm, store, FRESHNESS,
    ))
}

pub fn news_service(news: Arc<dyn NewsFeed>, llm: Arc<dyn Llm>) -> Arc<NewsService> {
    Arc::new(NewsService::new(news, llm, Duration::from_secs(600), 8))
}

/// Assemble a scheduler over in-memory stores and the given doubles.
pub fn scheduler(
    market_feed: Arc<dyn MarketFeed>,
    sentiment_feed: Arc<dyn SentimentFeed>,
    news_feed: Arc<dyn NewsFeed>,
    llm: Arc<dyn Llm>,
    store: Arc<MemoryPredictionStore>,
) -> Arc<Scheduler> {
    let market = market_service(
        Arc::clone(&market_feed),
        Arc::clone(&sentiment_feed),
        Duration::from_secs(60),
    );
    let generator = generator(
        market_feed,
        sentiment_feed,
        Arc::clone(&llm),
        Arc::clone(&store),
    );
    let news = news_service(news_feed, llm);

    Arc::new(Scheduler::new(
        market,
        generator,
        news,
        Arc::new(MemoryStrategyStore::seeded()),
        store,
        SchedulerConfig {
            cycle_secs: 60,
            warmup_delay_secs: 0,
            retention_hours: 12,
        },
    ))
}

/// A stored prediction with a chosen creation time.
pub fn stored_prediction(
    asset: Asset,
    timeframe: Timeframe,
    created_at: DateTime<Utc>,
) -> Prediction {
    Prediction {
        id: Uuid::new_v4(),
        asset,
        timeframe,
        direction: Direction::Bearish,
        confidence: 64,
        target_price: dec!(1800),
        current_price: dec!(1900),
        fear_greed_index: 40,
        fear_greed_label: FearGreedLabel::Fear,
        reasoning: "seeded".into(),
        created_at,
        expires_at: created_at + PREDICTION_VALIDITY,
    }
}
