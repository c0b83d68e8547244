//! Binance REST API client.
//!
//! Uses two API surfaces:
//! - **Spot API** (`api.binance.com`) — ticker, order-book depth, klines
//! - **Futures data API** (`fapi.binance.com`) — global long/short
//!   account ratio
//!
//! The long/short bias has a built-in fallback chain: when the ratio
//! endpoint fails, a bias is derived from the 24h price change; only when
//! both endpoints are down does the call fail.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use super::MarketFeed;
use crate::config::NetworkConfig;
use crate::domain::{Asset, Candle, LongShortBias, Ticker};
use crate::error::{Error, Result};

/// Order-book levels summed per side.
const DEPTH_LEVELS: u32 = 50;

/// Clamp bounds for the change-derived long/short fallback.
const FALLBACK_BIAS_MIN: f64 = 30.0;
const FALLBACK_BIAS_MAX: f64 = 70.0;

/// HTTP client for the Binance spot and futures-data APIs.
pub struct BinanceClient {
    http: HttpClient,
    spot_url: String,
    futures_url: String,
}

impl BinanceClient {
    /// Create a client with explicit base URLs and default timeouts.
    #[must_use]
    pub fn new(spot_url: impl Into<String>, futures_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            spot_url: spot_url.into(),
            futures_url: futures_url.into(),
        }
    }

    #[must_use]
    pub fn from_config(config: &NetworkConfig) -> Self {
        let http = HttpClient::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .connect_timeout(Duration::from_millis(config.connect_timeout_ms))
            .build()
            .unwrap_or_else(|err| {
                warn!(error = %err, "Failed to build HTTP client, using defaults");
                HttpClient::new()
            });

        Self {
            http,
            spot_url: config.spot_api_url.clone(),
            futures_url: config.futures_api_url.clone(),
        }
    }

    async fn get_json<T>(&self, url: &str) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json::<T>()
            .await?;
        Ok(response)
    }

    async fn global_ratio(&self, asset: Asset) -> Result<f64> {
        let url = format!(
            "{}/futures/data/globalLongShortAccountRatio?symbol={}&period=1h&limit=1",
            self.futures_url,
            asset.pair()
        );
        let rows: Vec<GlobalRatioRow> = self.get_json(&url).await?;
        let row = rows
            .into_iter()
            .next()
            .ok_or(Error::EmptyResponse("globalLongShortAccountRatio"))?;
        parse_f64(&row.long_short_ratio, "longShortRatio")
    }
}

fn parse_f64(raw: &str, field: &str) -> Result<f64> {
    raw.parse::<f64>()
        .map_err(|_| Error::Parse(format!("invalid {field}: {raw}")))
}

fn parse_decimal(raw: &str, field: &str) -> Result<Decimal> {
    raw.parse::<Decimal>()
        .map_err(|_| Error::Parse(format!("invalid {field}: {raw}")))
}

#[async_trait]
impl MarketFeed for BinanceClient {
    fn name(&self) -> &'static str {
        "binance"
    }

    async fn long_short_bias(&self, asset: Asset) -> Result<LongShortBias> {
        match self.global_ratio(asset).await {
            Ok(ratio) if ratio.is_finite() && ratio > 0.0 => {
                return Ok(LongShortBias::from_ratio(ratio));
            }
            Ok(ratio) => {
                warn!(asset = %asset, ratio, "Unusable long/short ratio, deriving from ticker");
            }
            Err(err) => {
                warn!(asset = %asset, error = %err, "Long/short endpoint failed, deriving from ticker");
            }
        }

        // Secondary fallback: bias from the 24h price change, clamped so a
        // single hot day cannot read as an extreme positioning skew.
        let ticker = self.ticker(asset).await?;
        let long_pct =
            (50.0 + ticker.change_24h_pct * 2.0).clamp(FALLBACK_BIAS_MIN, FALLBACK_BIAS_MAX);
        Ok(LongShortBias::from_long_pct(long_pct))
    }

    async fn order_book_bias(&self, asset: Asset) -> Result<f64> {
        let url = format!(
            "{}/api/v3/depth?symbol={}&limit={}",
            self.spot_url,
            asset.pair(),
            DEPTH_LEVELS
        );
        let book: DepthResponse = self.get_json(&url).await?;

        let bid_total = notional(&book.bids)?;
        let ask_total = notional(&book.asks)?;
        let total = bid_total + ask_total;
        if total <= 0.0 {
            return Err(Error::EmptyResponse("order book"));
        }

        Ok(bid_total / total * 100.0)
    }

    async fn ticker(&self, asset: Asset) -> Result<Ticker> {
        let url = format!(
            "{}/api/v3/ticker/24hr?symbol={}",
            self.spot_url,
            asset.pair()
        );
        let raw: TickerResponse = self.get_json(&url).await?;

        Ok(Ticker {
            asset,
            price: parse_decimal(&raw.last_price, "lastPrice")?,
            change_24h_pct: parse_f64(&raw.price_change_percent, "priceChangePercent")?,
            volume_24h: parse_f64(&raw.quote_volume, "quoteVolume")?,
        })
    }

    async fn daily_candles(&self, asset: Asset, days: u32) -> Result<Vec<Candle>> {
        let url = format!(
            "{}/api/v3/klines?symbol={}&interval=1d&limit={}",
            self.spot_url,
            asset.pair(),
            days
        );
        let rows: Vec<Vec<serde_json::Value>> = self.get_json(&url).await?;

        rows.iter().map(|row| candle_from_kline(row)).collect()
    }
}

/// Sum of price × quantity over one side of the book.
fn notional(levels: &[[String; 2]]) -> Result<f64> {
    let mut total = 0.0;
    for [price, qty] in levels {
        total += parse_f64(price, "depth price")? * parse_f64(qty, "depth quantity")?;
    }
    Ok(total)
}

/// Kline rows are heterogeneous arrays; close is index 4, volume index 5.
fn candle_from_kline(row: &[serde_json::Value]) -> Result<Candle> {
    let field = |idx: usize, name: &str| -> Result<f64> {
        let raw = row
            .get(idx)
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::Parse(format!("kline missing {name}")))?;
        parse_f64(raw, name)
    };

    Ok(Candle {
        close: field(4, "close")?,
        volume: field(5, "volume")?,
    })
}

#[derive(Deserialize)]
struct GlobalRatioRow {
    #[serde(rename = "longShortRatio")]
    long_short_ratio: String,
}

#[derive(Deserialize)]
struct DepthResponse {
    bids: Vec<[String; 2]>,
    asks: Vec<[String; 2]>,
}

#[derive(Deserialize)]
struct TickerResponse {
    #[serde(rename = "lastPrice")]
    last_price: String,
    #[serde(rename = "priceChangePercent")]
    price_change_percent: String,
    #[serde(rename = "quoteVolume")]
    quote_volume: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notional_sums_price_times_quantity() {
        let levels = vec![
            ["100.0".to_string(), "2.0".to_string()],
            ["99.0".to_string(), "1.0".to_string()],
        ];
        assert!((notional(&levels).unwrap() - 299.0).abs() < 1e-9);
    }

    #[test]
    fn notional_rejects_garbage_levels() {
        let levels = vec![["abc".to_string(), "2.0".to_string()]];
        assert!(notional(&levels).is_err());
    }

    #[test]
    fn kline_row_parses_close_and_volume() {
        let row: Vec<serde_json::Value> = serde_json::from_str(
            r#"[1700000000000, "67000.1", "68000", "66000", "67500.5", "1234.5", 1700086399999]"#,
        )
        .unwrap();

        let candle = candle_from_kline(&row).unwrap();
        assert!((candle.close - 67500.5).abs() < 1e-9);
        assert!((candle.volume - 1234.5).abs() < 1e-9);
    }

    #[test]
    fn kline_row_missing_fields_is_an_error() {
        let row: Vec<serde_json::Value> = serde_json::from_str(r#"[1700000000000]"#).unwrap();
        assert!(candle_from_kline(&row).is_err());
    }

    #[test]
    fn ratio_row_deserializes_string_ratio() {
        let row: GlobalRatioRow =
            serde_json::from_str(r#"{"symbol":"BTCUSDT","longShortRatio":"1.5"}"#).unwrap();
        assert_eq!(row.long_short_ratio, "1.5");
    }

    #[test]
    fn depth_response_deserializes_levels() {
        let book: DepthResponse = serde_json::from_str(
            r#"{"lastUpdateId":1,"bids":[["0.5","10"]],"asks":[["0.6","5"]]}"#,
        )
        .unwrap();
        assert_eq!(book.bids.len(), 1);
        assert_eq!(book.asks.len(), 1);
    }
}
