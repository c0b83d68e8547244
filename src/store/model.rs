//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::predictions;

/// Database row for a prediction.
///
/// Timestamps are RFC3339 text (UTC), prices are text-encoded decimals so
/// they round-trip exactly.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = predictions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PredictionRow {
    pub id: String,
    pub asset: String,
    pub timeframe: String,
    pub direction: String,
    pub confidence: i32,
    pub current_price: String,
    pub target_price: String,
    pub fear_greed_index: i32,
    pub fear_greed_label: String,
    pub reasoning: String,
    pub created_at: String,
    pub expires_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prediction_row_is_insertable() {
        // Type check - if this compiles, the Insertable derive works
        let _row = PredictionRow {
            id: "5f3d8f1e-0000-0000-0000-000000000000".to_string(),
            asset: "BTC".to_string(),
            timeframe: "1H".to_string(),
            direction: "BULLISH".to_string(),
            confidence: 82,
            current_price: "68000.5".to_string(),
            target_price: "70000".to_string(),
            fear_greed_index: 55,
            fear_greed_label: "Neutral".to_string(),
            reasoning: "test".to_string(),
            created_at: "2026-01-01T00:00:00+00:00".to_string(),
            expires_at: "2026-01-01T01:00:00+00:00".to_string(),
        };
    }
}
