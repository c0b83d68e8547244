//! Persistence layer with pluggable storage backends.
//!
//! Predictions are the durable entity: they survive restarts through the
//! SQLite backend. Strategy metrics are cosmetic and live in memory.

mod connection;
mod memory;
mod model;
mod schema;
mod sqlite;

pub use connection::{create_pool, run_migrations, DbPool};
pub use memory::{MemoryPredictionStore, MemoryStrategyStore};
pub use sqlite::SqlitePredictionStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Asset, Prediction, Strategy, Timeframe};
use crate::error::Result;

/// Durable store for AI predictions.
///
/// Assumed read-after-write consistent; records are whole, never partial.
#[async_trait]
pub trait PredictionStore: Send + Sync {
    /// Most recent prediction for an (asset, timeframe) pair.
    async fn latest(&self, asset: Asset, timeframe: Timeframe) -> Result<Option<Prediction>>;

    /// Persist a new immutable record.
    async fn save(&self, prediction: &Prediction) -> Result<()>;

    /// Delete records created before `cutoff`. Returns the deleted count.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize>;

    /// All stored records, newest first.
    async fn list(&self) -> Result<Vec<Prediction>>;
}

/// Store for the showcase strategy metrics.
#[async_trait]
pub trait StrategyStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Strategy>>;

    /// Replace the stored record with the same id.
    async fn save(&self, strategy: &Strategy) -> Result<()>;
}
