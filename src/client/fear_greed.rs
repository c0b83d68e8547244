//! Fear & Greed index client (alternative.me).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::warn;

use super::SentimentFeed;
use crate::config::NetworkConfig;
use crate::domain::FearGreed;
use crate::error::{Error, Result};

/// HTTP client for the Fear & Greed index API.
pub struct FearGreedClient {
    http: HttpClient,
    base_url: String,
}

impl FearGreedClient {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: HttpClient::new(),
            base_url: base_url.into(),
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
            base_url: config.fear_greed_url.clone(),
        }
    }

    async fn fetch(&self, limit: u32) -> Result<Vec<u8>> {
        let url = format!("{}?limit={}&format=json", self.base_url, limit);
        let response: FngResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json()
            .await?;

        let values: Vec<u8> = response
            .data
            .iter()
            .filter_map(|row| row.value.parse::<u16>().ok())
            .map(|v| v.min(100) as u8)
            .collect();

        if values.is_empty() {
            return Err(Error::EmptyResponse("fear & greed index"));
        }
        Ok(values)
    }
}

#[async_trait]
impl SentimentFeed for FearGreedClient {
    fn name(&self) -> &'static str {
        "alternative.me"
    }

    async fn fear_greed(&self) -> Result<FearGreed> {
        let values = self.fetch(1).await?;
        Ok(FearGreed::new(values[0]))
    }

    async fn fear_greed_history(&self, days: u32) -> Result<Vec<u8>> {
        self.fetch(days).await
    }
}

#[derive(Deserialize)]
struct FngResponse {
    data: Vec<FngRow>,
}

#[derive(Deserialize)]
struct FngRow {
    value: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FearGreedLabel;

    #[test]
    fn response_rows_deserialize() {
        let response: FngResponse = serde_json::from_str(
            r#"{"name":"Fear and Greed Index","data":[
                {"value":"64","value_classification":"Greed","timestamp":"1700000000"},
                {"value":"20","value_classification":"Extreme Fear","timestamp":"1699913600"}
            ]}"#,
        )
        .unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].value, "64");
    }

    #[test]
    fn classification_is_derived_locally_not_trusted_from_upstream() {
        // The label comes from our own bucketing, so mismatched upstream
        // classifications cannot leak through.
        let fg = FearGreed::new(64);
        assert_eq!(fg.label, FearGreedLabel::Greed);
    }
}
