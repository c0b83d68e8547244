//! News-driven sentiment prediction batches.
//!
//! Each refresh analyzes the freshest articles as one LLM batch and
//! replaces the cached batch wholesale. The cache never merges batches;
//! it only ever holds the latest successful one.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::cache::TtlCache;
use crate::client::{Llm, NewsFeed};
use crate::domain::{Article, NewsPrediction};
use crate::error::Result;

use super::parse;

/// Longest article body excerpt included in the analysis prompt.
const BODY_EXCERPT_CHARS: usize = 240;

/// Generates and caches the news-prediction batch.
pub struct NewsService {
    news: Arc<dyn NewsFeed>,
    llm: Arc<dyn Llm>,
    cache: TtlCache<(), Vec<NewsPrediction>>,
    top_articles: usize,
}

impl NewsService {
    pub fn new(
        news: Arc<dyn NewsFeed>,
        llm: Arc<dyn Llm>,
        ttl: Duration,
        top_articles: usize,
    ) -> Self {
        Self {
            news,
            llm,
            cache: TtlCache::new(ttl),
            top_articles,
        }
    }

    /// On-demand entry point: cached batch when fresh, otherwise a refresh
    /// attempt; a failed refresh serves the stale batch, or an empty one
    /// when no batch was ever built.
    pub async fn predictions(&self) -> Vec<NewsPrediction> {
        if let Some(batch) = self.cache.get_fresh(&()) {
            debug!(predictions = batch.len(), "Serving cached news batch");
            return batch;
        }

        match self.refresh().await {
            Ok(batch) => batch,
            Err(err) => {
                warn!(error = %err, "News refresh failed, serving last batch");
                self.cache.get_stale(&()).unwrap_or_default()
            }
        }
    }

    /// Refresh entry point used by the scheduler: propagates failure for
    /// the cycle tally. Zero fetched articles is a valid (empty) batch.
    pub async fn refresh(&self) -> Result<Vec<NewsPrediction>> {
        let articles = self.news.latest_articles(self.top_articles).await?;

        if articles.is_empty() {
            info!("No usable news articles; storing empty batch");
            self.cache.put((), Vec::new());
            return Ok(Vec::new());
        }

        let prompt = build_batch_prompt(&articles);
        let response = self.llm.complete(&prompt).await?;
        let items = parse::parse_news_batch(&response)?;

        // Analysis items pair with articles by position; surplus on either
        // side is dropped.
        let batch: Vec<NewsPrediction> = articles
            .iter()
            .zip(items)
            .map(|(article, item)| NewsPrediction {
                headline: article.headline.clone(),
                source: article.source.clone(),
                published_at: article.published_at,
                url: article.url.clone(),
                asset: item.asset.unwrap_or_else(|| "CRYPTO".to_string()),
                direction: item.direction,
                confidence: item.confidence,
                impact: item.impact,
                reasoning: item.reasoning,
            })
            .collect();

        info!(articles = articles.len(), predictions = batch.len(), "News batch refreshed");
        self.cache.put((), batch.clone());

        Ok(batch)
    }
}

fn build_batch_prompt(articles: &[Article]) -> String {
    let listing = articles
        .iter()
        .enumerate()
        .map(|(i, article)| {
            let excerpt: String = article.body.chars().take(BODY_EXCERPT_CHARS).collect();
            format!(
                "{}. {} ({})\n   {}",
                i + 1,
                article.headline,
                article.source,
                excerpt
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a crypto market analyst. For each numbered article below, judge its market impact.

## Articles
{listing}

## Output (JSON only, one entry per article, same order)
```json
{{
  "predictions": [
    {{
      "asset": "ticker symbol the article most affects, e.g. BTC",
      "prediction": "BULLISH | BEARISH | NEUTRAL",
      "confidence": 0-100,
      "impact": "HIGH | MEDIUM | LOW",
      "reasoning": "One sentence"
    }}
  ]
}}
```"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn article(headline: &str) -> Article {
        Article {
            headline: headline.into(),
            source: "CoinDesk".into(),
            url: "https://example.com/a".into(),
            published_at: Utc::now(),
            body: "Body text ".repeat(100),
        }
    }

    #[test]
    fn batch_prompt_numbers_articles_and_truncates_bodies() {
        let prompt = build_batch_prompt(&[article("BTC ETF inflows"), article("ETH upgrade")]);

        assert!(prompt.contains("1. BTC ETF inflows (CoinDesk)"));
        assert!(prompt.contains("2. ETH upgrade (CoinDesk)"));
        // The thousand-char body must not leak in whole.
        assert!(prompt.len() < 2 * BODY_EXCERPT_CHARS + 800);
    }
}
