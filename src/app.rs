//! Application wiring and lifecycle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::info;

use crate::client::{build_llm, BinanceClient, FearGreedClient, MarketFeed, NewsClient, NewsFeed, SentimentFeed};
use crate::config::Config;
use crate::error::Result;
use crate::predictor::{NewsService, PredictionGenerator};
use crate::scheduler::Scheduler;
use crate::service::MarketDataService;
use crate::store::{
    create_pool, run_migrations, MemoryStrategyStore, PredictionStore, SqlitePredictionStore,
    StrategyStore,
};

/// Builds the refresh pipeline from config and runs it.
pub struct App;

impl App {
    /// Run the refresh daemon until the process is stopped.
    pub async fn run(config: Config) -> Result<()> {
        let (_shutdown_tx, shutdown_rx) = watch::channel(false);
        Self::run_with_shutdown(config, shutdown_rx).await
    }

    /// Run with an externally controlled shutdown signal.
    pub async fn run_with_shutdown(
        config: Config,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<()> {
        let pool = create_pool(&config.database.url)?;
        run_migrations(&pool)?;
        info!(database = %config.database.url, "Database initialized");

        let store: Arc<dyn PredictionStore> = Arc::new(SqlitePredictionStore::new(pool));
        let strategies: Arc<dyn StrategyStore> = Arc::new(MemoryStrategyStore::seeded());

        let market_feed: Arc<dyn MarketFeed> = Arc::new(BinanceClient::from_config(&config.network));
        let sentiment_feed: Arc<dyn SentimentFeed> =
            Arc::new(FearGreedClient::from_config(&config.network));
        let news_feed: Arc<dyn NewsFeed> = Arc::new(NewsClient::from_config(&config.network));

        let llm = build_llm(&config.llm)?;
        info!(provider = llm.name(), model = %config.llm.model, "LLM client initialized");

        let market = Arc::new(MarketDataService::new(
            Arc::clone(&market_feed),
            Arc::clone(&sentiment_feed),
            Duration::from_secs(config.cache.depth_ttl_secs),
            Duration::from_secs(config.cache.sentiment_ttl_secs),
        ));
        let generator = Arc::new(PredictionGenerator::new(
            market_feed,
            sentiment_feed,
            Arc::clone(&llm),
            Arc::clone(&store),
            Duration::from_secs(config.cache.prediction_freshness_secs),
        ));
        let news = Arc::new(NewsService::new(
            news_feed,
            llm,
            Duration::from_secs(config.cache.news_ttl_secs),
            config.news.top_articles,
        ));

        let scheduler = Arc::new(Scheduler::new(
            market,
            generator,
            news,
            strategies,
            store,
            config.scheduler.clone(),
        ));
        let handle = scheduler.start();

        loop {
            match shutdown.changed().await {
                Ok(()) => {
                    if *shutdown.borrow() {
                        info!("Shutdown signal received");
                        break;
                    }
                }
                Err(_) => {
                    info!("Shutdown channel closed");
                    break;
                }
            }
        }

        handle.shutdown().await;
        Ok(())
    }
}
