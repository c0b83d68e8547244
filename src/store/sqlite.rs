//! SQLite prediction store implementation.
//!
//! Provides persistent storage for AI predictions using SQLite and
//! Diesel ORM, so stored records survive process restarts.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::connection::DbPool;
use super::model::PredictionRow;
use super::schema::predictions;
use super::PredictionStore;
use crate::domain::{Asset, Direction, FearGreedLabel, Prediction, Timeframe};
use crate::error::{Error, Result};

/// SQLite-backed prediction store.
pub struct SqlitePredictionStore {
    /// Database connection pool.
    pool: DbPool,
}

impl SqlitePredictionStore {
    /// Create a new SQLite prediction store with the given connection pool.
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<diesel::r2d2::PooledConnection<diesel::r2d2::ConnectionManager<SqliteConnection>>> {
        self.pool
            .get()
            .map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(prediction: &Prediction) -> PredictionRow {
        PredictionRow {
            id: prediction.id.to_string(),
            asset: prediction.asset.symbol().to_string(),
            timeframe: prediction.timeframe.as_str().to_string(),
            direction: prediction.direction.as_str().to_string(),
            confidence: i32::from(prediction.confidence),
            current_price: prediction.current_price.to_string(),
            target_price: prediction.target_price.to_string(),
            fear_greed_index: i32::from(prediction.fear_greed_index),
            fear_greed_label: prediction.fear_greed_label.as_str().to_string(),
            reasoning: prediction.reasoning.clone(),
            created_at: prediction.created_at.to_rfc3339(),
            expires_at: prediction.expires_at.to_rfc3339(),
        }
    }

    fn from_row(row: PredictionRow) -> Result<Prediction> {
        let parse_ts = |raw: &str| -> Result<DateTime<Utc>> {
            DateTime::parse_from_rfc3339(raw)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| Error::Parse(e.to_string()))
        };

        Ok(Prediction {
            id: Uuid::parse_str(&row.id).map_err(|e| Error::Parse(e.to_string()))?,
            asset: row
                .asset
                .parse::<Asset>()
                .map_err(|e| Error::Parse(e.to_string()))?,
            timeframe: row
                .timeframe
                .parse::<Timeframe>()
                .map_err(|_| Error::Parse(format!("invalid timeframe: {}", row.timeframe)))?,
            direction: row
                .direction
                .parse::<Direction>()
                .map_err(|_| Error::Parse(format!("invalid direction: {}", row.direction)))?,
            confidence: u8::try_from(row.confidence.clamp(0, 100))
                .map_err(|e| Error::Parse(e.to_string()))?,
            current_price: row
                .current_price
                .parse()
                .map_err(|_| Error::Parse(format!("invalid price: {}", row.current_price)))?,
            target_price: row
                .target_price
                .parse()
                .map_err(|_| Error::Parse(format!("invalid price: {}", row.target_price)))?,
            fear_greed_index: u8::try_from(row.fear_greed_index.clamp(0, 100))
                .map_err(|e| Error::Parse(e.to_string()))?,
            fear_greed_label: row
                .fear_greed_label
                .parse::<FearGreedLabel>()
                .map_err(|_| Error::Parse(format!("invalid label: {}", row.fear_greed_label)))?,
            reasoning: row.reasoning,
            created_at: parse_ts(&row.created_at)?,
            expires_at: parse_ts(&row.expires_at)?,
        })
    }
}

#[async_trait]
impl PredictionStore for SqlitePredictionStore {
    async fn latest(&self, asset: Asset, timeframe: Timeframe) -> Result<Option<Prediction>> {
        let mut conn = self.conn()?;

        // RFC3339 UTC timestamps sort lexicographically.
        let row: Option<PredictionRow> = predictions::table
            .filter(predictions::asset.eq(asset.symbol()))
            .filter(predictions::timeframe.eq(timeframe.as_str()))
            .order(predictions::created_at.desc())
            .first(&mut conn)
            .optional()
            .map_err(|e| Error::Database(e.to_string()))?;

        row.map(Self::from_row).transpose()
    }

    async fn save(&self, prediction: &Prediction) -> Result<()> {
        let row = Self::to_row(prediction);
        let mut conn = self.conn()?;

        diesel::replace_into(predictions::table)
            .values(&row)
            .execute(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn()?;

        let deleted = diesel::delete(
            predictions::table.filter(predictions::created_at.lt(cutoff.to_rfc3339())),
        )
        .execute(&mut conn)
        .map_err(|e| Error::Database(e.to_string()))?;

        Ok(deleted)
    }

    async fn list(&self) -> Result<Vec<Prediction>> {
        let mut conn = self.conn()?;

        let rows: Vec<PredictionRow> = predictions::table
            .order(predictions::created_at.desc())
            .load(&mut conn)
            .map_err(|e| Error::Database(e.to_string()))?;

        rows.into_iter().map(Self::from_row).collect()
    }
}
