//! Showcase strategy performance metrics.
//!
//! These figures are a simulation drifted by the scheduler within fixed
//! bounds; they are presentation data, not measured trading results.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// A managed strategy with its headline metrics.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Strategy {
    pub id: u32,
    pub name: String,
    /// Assets under management in USD.
    pub aum: Decimal,
    /// Win rate in percent, kept within [45, 85].
    pub win_rate_pct: f64,
    /// Monthly return in percent, kept within [2, 35].
    pub monthly_return_pct: f64,
    pub updated_at: DateTime<Utc>,
}
