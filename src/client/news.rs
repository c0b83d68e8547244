//! Crypto news feed client (CryptoCompare news API).

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::warn;

use super::NewsFeed;
use crate::config::NetworkConfig;
use crate::domain::Article;
use crate::error::{Error, Result};

/// HTTP client for the news feed.
pub struct NewsClient {
    http: HttpClient,
    base_url: String,
}

impl NewsClient {
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
            base_url: config.news_api_url.clone(),
        }
    }
}

#[async_trait]
impl NewsFeed for NewsClient {
    fn name(&self) -> &'static str {
        "cryptocompare"
    }

    async fn latest_articles(&self, limit: usize) -> Result<Vec<Article>> {
        let url = format!("{}?lang=EN", self.base_url);
        let response: NewsResponse = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()
            .map_err(|e| Error::Connection(e.to_string()))?
            .json()
            .await?;

        let articles = response
            .data
            .into_iter()
            .filter(is_usable)
            .filter_map(|raw| {
                let published_at = DateTime::<Utc>::from_timestamp(raw.published_on, 0)?;
                Some(Article {
                    headline: raw.title,
                    source: raw.source_info.name,
                    url: raw.url,
                    published_at,
                    body: raw.body,
                })
            })
            .take(limit)
            .collect();

        Ok(articles)
    }
}

/// Drop removed or gutted entries before they reach the analysis batch.
fn is_usable(raw: &RawArticle) -> bool {
    !raw.title.is_empty() && raw.title != "[Removed]" && !raw.url.is_empty()
}

#[derive(Deserialize)]
struct NewsResponse {
    #[serde(rename = "Data")]
    data: Vec<RawArticle>,
}

#[derive(Deserialize)]
struct RawArticle {
    title: String,
    url: String,
    #[serde(default)]
    body: String,
    #[serde(rename = "published_on")]
    published_on: i64,
    #[serde(rename = "source_info")]
    source_info: SourceInfo,
}

#[derive(Deserialize)]
struct SourceInfo {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(title: &str, url: &str) -> RawArticle {
        RawArticle {
            title: title.into(),
            url: url.into(),
            body: "body".into(),
            published_on: 1_700_000_000,
            source_info: SourceInfo {
                name: "CoinDesk".into(),
            },
        }
    }

    #[test]
    fn removed_and_empty_entries_are_filtered() {
        assert!(is_usable(&raw("BTC rallies", "https://example.com/a")));
        assert!(!is_usable(&raw("", "https://example.com/a")));
        assert!(!is_usable(&raw("[Removed]", "https://example.com/a")));
        assert!(!is_usable(&raw("BTC rallies", "")));
    }

    #[test]
    fn response_deserializes_cryptocompare_shape() {
        let response: NewsResponse = serde_json::from_str(
            r#"{"Type":100,"Message":"News list","Data":[
                {"id":"1","title":"ETH upgrade ships","url":"https://example.com/eth",
                 "body":"Details...","published_on":1700000000,
                 "source_info":{"name":"CoinDesk","lang":"EN"}}
            ]}"#,
        )
        .unwrap();

        assert_eq!(response.data.len(), 1);
        assert_eq!(response.data[0].title, "ETH upgrade ships");
        assert_eq!(response.data[0].source_info.name, "CoinDesk");
    }
}
