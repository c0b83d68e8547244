//! AI price prediction generation.
//!
//! Per (asset, timeframe) pair the generator behaves as a small state
//! machine: a stored record inside the freshness window is returned
//! untouched; otherwise market context is fetched, the LLM is prompted,
//! and a new time-boxed record is persisted. Generation failures fall back
//! to the previous stored record, or to a neutral placeholder that is
//! never persisted.

pub mod news;
pub mod parse;

pub use news::NewsService;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::client::{Llm, MarketFeed, SentimentFeed};
use crate::domain::{
    Asset, Direction, FearGreed, Prediction, Ticker, Timeframe, PREDICTION_VALIDITY,
};
use crate::error::Result;
use crate::store::PredictionStore;

/// Reasoning attached to the unpersisted neutral placeholder.
const PLACEHOLDER_REASONING: &str = "Unable to generate prediction";

/// Generates and serves AI price predictions.
pub struct PredictionGenerator {
    market: Arc<dyn MarketFeed>,
    sentiment: Arc<dyn SentimentFeed>,
    llm: Arc<dyn Llm>,
    store: Arc<dyn PredictionStore>,
    /// Stored records younger than this are served without regeneration.
    freshness: Duration,
}

impl PredictionGenerator {
    pub fn new(
        market: Arc<dyn MarketFeed>,
        sentiment: Arc<dyn SentimentFeed>,
        llm: Arc<dyn Llm>,
        store: Arc<dyn PredictionStore>,
        freshness: std::time::Duration,
    ) -> Self {
        Self {
            market,
            sentiment,
            llm,
            store,
            freshness: Duration::from_std(freshness).unwrap_or_else(|_| Duration::minutes(10)),
        }
    }

    /// On-demand entry point: always returns a prediction.
    ///
    /// Failures degrade to the last stored record (stale allowed) or to a
    /// synthesized neutral record that is not persisted, so request
    /// handlers never need error handling here.
    pub async fn generate(&self, asset: Asset, timeframe: Timeframe) -> Prediction {
        match self.try_refresh(asset, timeframe).await {
            Ok(prediction) => prediction,
            Err(err) => {
                warn!(asset = %asset, timeframe = %timeframe, error = %err, "Prediction generation failed");
                match self.store.latest(asset, timeframe).await {
                    Ok(Some(stored)) => {
                        debug!(asset = %asset, "Serving stale stored prediction");
                        stored
                    }
                    _ => Self::placeholder(asset, timeframe),
                }
            }
        }
    }

    /// Refresh entry point used by the scheduler: propagates failure so the
    /// cycle can tally it. A fresh stored record short-circuits without any
    /// upstream call.
    pub async fn try_refresh(&self, asset: Asset, timeframe: Timeframe) -> Result<Prediction> {
        let now = Utc::now();

        if let Some(stored) = self.store.latest(asset, timeframe).await? {
            if stored.is_fresh(now, self.freshness) {
                debug!(asset = %asset, timeframe = %timeframe, "Stored prediction still fresh");
                return Ok(stored);
            }
        }

        let (ticker, fear_greed) = tokio::join!(self.market.ticker(asset), self.sentiment.fear_greed());
        // Price is required context; the sentiment index degrades to neutral.
        let ticker = ticker?;
        let fear_greed = fear_greed.unwrap_or_else(|err| {
            warn!(error = %err, "Fear & greed unavailable, using neutral");
            FearGreed::default()
        });

        let prompt = build_prompt(&ticker, fear_greed, timeframe);
        let response = self.llm.complete(&prompt).await?;
        let parsed = parse::parse_prediction(&response)?;

        let record = Prediction {
            id: Uuid::new_v4(),
            asset,
            timeframe,
            direction: parsed.direction,
            confidence: parsed.confidence,
            target_price: parsed
                .target_price
                .unwrap_or_else(|| implied_target(ticker.price, parsed.direction)),
            current_price: ticker.price,
            fear_greed_index: fear_greed.value,
            fear_greed_label: fear_greed.label,
            reasoning: parsed.reasoning,
            created_at: now,
            expires_at: now + PREDICTION_VALIDITY,
        };

        self.store.save(&record).await?;
        debug!(asset = %asset, direction = %record.direction, confidence = record.confidence, "Prediction stored");

        Ok(record)
    }

    /// Neutral record served when generation fails and no history exists.
    /// Never persisted, to keep placeholder data out of the history.
    fn placeholder(asset: Asset, timeframe: Timeframe) -> Prediction {
        let now = Utc::now();
        let fear_greed = FearGreed::default();
        Prediction {
            id: Uuid::new_v4(),
            asset,
            timeframe,
            direction: Direction::Neutral,
            confidence: 50,
            target_price: Decimal::ZERO,
            current_price: Decimal::ZERO,
            fear_greed_index: fear_greed.value,
            fear_greed_label: fear_greed.label,
            reasoning: PLACEHOLDER_REASONING.to_string(),
            created_at: now,
            expires_at: now + PREDICTION_VALIDITY,
        }
    }
}

/// Target used when the model omitted a usable number: a modest move in
/// the predicted direction.
fn implied_target(current: Decimal, direction: Direction) -> Decimal {
    match direction {
        Direction::Bullish => current * dec!(1.02),
        Direction::Bearish => current * dec!(0.98),
        Direction::Neutral => current,
    }
}

fn build_prompt(ticker: &Ticker, fear_greed: FearGreed, timeframe: Timeframe) -> String {
    let asset = ticker.asset;
    format!(
        r#"You are a crypto market analyst. Predict the {timeframe} price direction for {name} ({symbol}).

## Market context
- Current price: ${price}
- 24h change: {change:.2}%
- Fear & Greed index: {fg_value} ({fg_label})

## Output (JSON only, no prose)
```json
{{
  "prediction": "BULLISH | BEARISH | NEUTRAL",
  "confidence": 0-100,
  "targetPrice": number,
  "reasoning": "One or two sentences"
}}
```"#,
        timeframe = timeframe,
        name = asset.display_name(),
        symbol = asset.symbol(),
        price = ticker.price,
        change = ticker.change_24h_pct,
        fg_value = fear_greed.value,
        fg_label = fear_greed.label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn implied_target_moves_with_direction() {
        assert_eq!(implied_target(dec!(100), Direction::Bullish), dec!(102.00));
        assert_eq!(implied_target(dec!(100), Direction::Bearish), dec!(98.00));
        assert_eq!(implied_target(dec!(100), Direction::Neutral), dec!(100));
    }

    #[test]
    fn prompt_names_the_asset_and_requires_json() {
        let ticker = Ticker {
            asset: Asset::Eth,
            price: dec!(1950.25),
            change_24h_pct: -1.3,
            volume_24h: 1.0e9,
        };
        let prompt = build_prompt(&ticker, FearGreed::new(30), Timeframe::OneHour);

        assert!(prompt.contains("Ethereum (ETH)"));
        assert!(prompt.contains("$1950.25"));
        assert!(prompt.contains("Fear & Greed index: 30 (Fear)"));
        assert!(prompt.contains("\"prediction\""));
    }
}
