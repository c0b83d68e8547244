//! Exchange depth and sentiment aggregation service.
//!
//! Every read goes through a single-slot TTL cache: a fresh slot is served
//! without upstream calls, a miss triggers a refresh, and a failed refresh
//! falls back to the stale slot or to the documented neutral default.

use std::sync::Arc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, warn};

use crate::analysis::{depth, sentiment};
use crate::cache::TtlCache;
use crate::client::{MarketFeed, SentimentFeed};
use crate::domain::{
    Asset, AssetSentiment, DepthSnapshot, FearGreed, SentimentOverview, TRACKED_ASSETS,
};
use crate::error::Result;

/// Days of fear/greed history tallied into the distribution.
const DISTRIBUTION_WINDOW_DAYS: u32 = 30;

/// Days of candles behind each per-asset sentiment score.
const SCORE_WINDOW_DAYS: u32 = 14;

/// Serves depth snapshots and the sentiment overview, cache-guarded.
pub struct MarketDataService {
    market: Arc<dyn MarketFeed>,
    sentiment: Arc<dyn SentimentFeed>,
    depth_cache: TtlCache<Asset, DepthSnapshot>,
    overview_cache: TtlCache<(), SentimentOverview>,
}

impl MarketDataService {
    pub fn new(
        market: Arc<dyn MarketFeed>,
        sentiment: Arc<dyn SentimentFeed>,
        depth_ttl: Duration,
        overview_ttl: Duration,
    ) -> Self {
        Self {
            market,
            sentiment,
            depth_cache: TtlCache::new(depth_ttl),
            overview_cache: TtlCache::new(overview_ttl),
        }
    }

    /// On-demand depth read: never fails.
    ///
    /// Cache-fresh snapshots are returned without upstream calls. On a miss
    /// the refresh runs; a failed refresh serves the stale snapshot, and
    /// with no history at all the neutral 50/50 default.
    pub async fn exchange_depth(&self, asset: Asset) -> DepthSnapshot {
        if let Some(snapshot) = self.depth_cache.get_fresh(&asset) {
            debug!(asset = %asset, "Serving cached depth snapshot");
            return snapshot;
        }

        match self.refresh_depth(asset).await {
            Ok(snapshot) => snapshot,
            Err(err) => {
                warn!(asset = %asset, error = %err, "Depth refresh failed");
                match self.depth_cache.get_stale(&asset) {
                    Some(stale) => {
                        debug!(asset = %asset, "Serving stale depth snapshot");
                        stale
                    }
                    None => depth::neutral_depth(asset),
                }
            }
        }
    }

    /// Forced refresh used by the scheduler; propagates failure for the
    /// cycle tally.
    ///
    /// The long/short bias is the primary signal and is required; the
    /// order book and fear/greed degrade to their neutral values on their
    /// own failures.
    pub async fn refresh_depth(&self, asset: Asset) -> Result<DepthSnapshot> {
        let (bias, book, fear_greed) = tokio::join!(
            self.market.long_short_bias(asset),
            self.market.order_book_bias(asset),
            self.sentiment.fear_greed(),
        );

        let bias = bias?;
        let book_buy_pct = book.unwrap_or_else(|err| {
            warn!(asset = %asset, error = %err, "Order book unavailable, using even split");
            50.0
        });
        let fear_greed = fear_greed.unwrap_or_else(|err| {
            warn!(error = %err, "Fear & greed unavailable, using neutral");
            FearGreed::default()
        });

        let mut rng = StdRng::from_entropy();
        let snapshot = depth::synthesize_depth(asset, &bias, book_buy_pct, fear_greed, &mut rng);

        self.depth_cache.put(asset, snapshot.clone());
        debug!(asset = %asset, aggregated_buy = snapshot.aggregated_buy_pct, "Depth snapshot refreshed");

        Ok(snapshot)
    }

    /// Dashboard sentiment aggregate: current index, 30-day bucket
    /// distribution, and per-asset scores. Same cache discipline as depth.
    pub async fn sentiment_overview(&self) -> SentimentOverview {
        if let Some(overview) = self.overview_cache.get_fresh(&()) {
            return overview;
        }

        match self.refresh_overview().await {
            Ok(overview) => overview,
            Err(err) => {
                warn!(error = %err, "Sentiment overview refresh failed");
                match self.overview_cache.get_stale(&()) {
                    Some(stale) => stale,
                    None => neutral_overview(),
                }
            }
        }
    }

    async fn refresh_overview(&self) -> Result<SentimentOverview> {
        let fear_greed = self.sentiment.fear_greed().await?;
        let history = self
            .sentiment
            .fear_greed_history(DISTRIBUTION_WINDOW_DAYS)
            .await
            .unwrap_or_else(|err| {
                warn!(error = %err, "Fear & greed history unavailable");
                vec![fear_greed.value]
            });

        let mut assets = Vec::with_capacity(TRACKED_ASSETS.len());
        for asset in TRACKED_ASSETS {
            // Scores degrade to neutral per asset; one dead klines endpoint
            // must not take the whole overview down.
            let score = match self.market.daily_candles(asset, SCORE_WINDOW_DAYS).await {
                Ok(candles) => sentiment::sentiment_score(&candles),
                Err(err) => {
                    warn!(asset = %asset, error = %err, "Price history unavailable, neutral score");
                    50.0
                }
            };
            assets.push(AssetSentiment { asset, score });
        }

        let overview = SentimentOverview {
            fear_greed,
            distribution: sentiment::distribution(&history),
            assets,
            timestamp: chrono::Utc::now(),
        };

        self.overview_cache.put((), overview.clone());
        Ok(overview)
    }
}

/// Overview served when the index is down and nothing was ever cached.
fn neutral_overview() -> SentimentOverview {
    SentimentOverview {
        fear_greed: FearGreed::default(),
        distribution: Default::default(),
        assets: TRACKED_ASSETS
            .iter()
            .map(|&asset| AssetSentiment { asset, score: 50.0 })
            .collect(),
        timestamp: chrono::Utc::now(),
    }
}
