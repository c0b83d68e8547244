//! Market data snapshots fetched from the exchange endpoints.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::asset::Asset;
use super::sentiment::FearGreedLabel;

/// Long/short positioning bias from the derivatives endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LongShortBias {
    /// Ratio of long to short open positions.
    pub ratio: f64,
    /// Share of longs in percent.
    pub long_pct: f64,
    /// Share of shorts in percent.
    pub short_pct: f64,
}

impl LongShortBias {
    /// Build from a raw long/short ratio: `long = r / (1 + r) * 100`.
    #[must_use]
    pub fn from_ratio(ratio: f64) -> Self {
        let long_pct = ratio / (1.0 + ratio) * 100.0;
        Self {
            ratio,
            long_pct,
            short_pct: 100.0 - long_pct,
        }
    }

    /// Build from a long percentage, back-deriving the ratio.
    #[must_use]
    pub fn from_long_pct(long_pct: f64) -> Self {
        let short_pct = 100.0 - long_pct;
        Self {
            ratio: long_pct / short_pct,
            long_pct,
            short_pct,
        }
    }

    /// The documented neutral default: an even 50/50 split.
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            ratio: 1.0,
            long_pct: 50.0,
            short_pct: 50.0,
        }
    }
}

/// 24h spot ticker snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker {
    pub asset: Asset,
    pub price: Decimal,
    /// 24h price change in percent.
    pub change_24h_pct: f64,
    /// 24h quote volume.
    pub volume_24h: f64,
}

/// One daily candle from the klines endpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub close: f64,
    pub volume: f64,
}

/// One exchange row in a depth snapshot.
///
/// Only the primary exchange row reflects a measured order book; the
/// remaining roster is modeled around it (see `analysis::depth`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeDepthRow {
    pub exchange: &'static str,
    pub buy_pct: f64,
    pub sell_pct: f64,
}

/// Aggregated buy/sell depth across the exchange roster for one asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthSnapshot {
    pub asset: Asset,
    /// Per-exchange rows, sorted descending by `buy_pct`.
    pub rows: Vec<ExchangeDepthRow>,
    /// Mean of the row buy percentages.
    pub aggregated_buy_pct: f64,
    pub aggregated_sell_pct: f64,
    pub fear_greed_index: u8,
    pub fear_greed_label: FearGreedLabel,
    pub long_short_ratio: f64,
    pub timestamp: DateTime<Utc>,
}
