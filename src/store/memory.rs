//! In-memory store implementations.
//!
//! `MemoryPredictionStore` backs tests and ephemeral deployments;
//! `MemoryStrategyStore` is the only strategy backend (the metrics are
//! simulated presentation data).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal_macros::dec;

use super::{PredictionStore, StrategyStore};
use crate::domain::{Asset, Prediction, Strategy, Timeframe};
use crate::error::Result;

/// In-memory prediction store.
#[derive(Debug, Default)]
pub struct MemoryPredictionStore {
    records: RwLock<Vec<Prediction>>,
}

impl MemoryPredictionStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PredictionStore for MemoryPredictionStore {
    async fn latest(&self, asset: Asset, timeframe: Timeframe) -> Result<Option<Prediction>> {
        let records = self.records.read();
        Ok(records
            .iter()
            .filter(|p| p.asset == asset && p.timeframe == timeframe)
            .max_by_key(|p| p.created_at)
            .cloned())
    }

    async fn save(&self, prediction: &Prediction) -> Result<()> {
        self.records.write().push(prediction.clone());
        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|p| p.created_at >= cutoff);
        Ok(before - records.len())
    }

    async fn list(&self) -> Result<Vec<Prediction>> {
        let mut records = self.records.read().clone();
        records.sort_by_key(|p| std::cmp::Reverse(p.created_at));
        Ok(records)
    }
}

/// In-memory strategy store, seeded with the showcase roster.
#[derive(Debug)]
pub struct MemoryStrategyStore {
    strategies: RwLock<Vec<Strategy>>,
}

impl MemoryStrategyStore {
    /// Create a store seeded with the default strategy roster.
    #[must_use]
    pub fn seeded() -> Self {
        let now = Utc::now();
        let seed = |id, name: &str, aum, win_rate_pct, monthly_return_pct| Strategy {
            id,
            name: name.to_string(),
            aum,
            win_rate_pct,
            monthly_return_pct,
            updated_at: now,
        };

        Self {
            strategies: RwLock::new(vec![
                seed(1, "Momentum Alpha", dec!(2400000), 68.2, 14.1),
                seed(2, "Grid Harvester", dec!(1150000), 61.5, 8.7),
                seed(3, "Volatility Edge", dec!(3800000), 57.3, 19.4),
                seed(4, "Stable Yield", dec!(5200000), 74.8, 5.2),
            ]),
        }
    }

    /// Create an empty store.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            strategies: RwLock::new(Vec::new()),
        }
    }
}

#[async_trait]
impl StrategyStore for MemoryStrategyStore {
    async fn list(&self) -> Result<Vec<Strategy>> {
        Ok(self.strategies.read().clone())
    }

    async fn save(&self, strategy: &Strategy) -> Result<()> {
        let mut strategies = self.strategies.write();
        match strategies.iter_mut().find(|s| s.id == strategy.id) {
            Some(existing) => *existing = strategy.clone(),
            None => strategies.push(strategy.clone()),
        }
        Ok(())
    }
}
