//! Application configuration loading and validation.
//!
//! Configuration is loaded from a TOML file with environment variable
//! overrides for sensitive values like `OPENAI_API_KEY`.

use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};
use url::Url;

use crate::error::{ConfigError, Result};

/// Supported generative-analysis providers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    #[default]
    Openai,
    Anthropic,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub news: NewsConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Upstream endpoint base URLs.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkConfig {
    /// Spot exchange REST API (ticker, order book, klines).
    #[serde(default = "default_spot_api_url")]
    pub spot_api_url: String,
    /// Derivatives data API (long/short account ratio).
    #[serde(default = "default_futures_api_url")]
    pub futures_api_url: String,
    /// Fear & Greed index API.
    #[serde(default = "default_fear_greed_url")]
    pub fear_greed_url: String,
    /// Crypto news feed API.
    #[serde(default = "default_news_api_url")]
    pub news_api_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_spot_api_url() -> String {
    "https://api.binance.com".into()
}

fn default_futures_api_url() -> String {
    "https://fapi.binance.com".into()
}

fn default_fear_greed_url() -> String {
    "https://api.alternative.me/fng/".into()
}

fn default_news_api_url() -> String {
    "https://min-api.cryptocompare.com/data/v2/news/".into()
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_connect_timeout_ms() -> u64 {
    5_000
}

/// Time-to-live windows for the per-source caches.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Exchange depth snapshot TTL in seconds.
    #[serde(default = "default_depth_ttl_secs")]
    pub depth_ttl_secs: u64,
    /// News prediction batch TTL in seconds.
    #[serde(default = "default_news_ttl_secs")]
    pub news_ttl_secs: u64,
    /// Stored AI prediction freshness window in seconds.
    #[serde(default = "default_prediction_freshness_secs")]
    pub prediction_freshness_secs: u64,
    /// Sentiment overview TTL in seconds.
    #[serde(default = "default_sentiment_ttl_secs")]
    pub sentiment_ttl_secs: u64,
}

const fn default_depth_ttl_secs() -> u64 {
    60
}

const fn default_news_ttl_secs() -> u64 {
    600
}

const fn default_prediction_freshness_secs() -> u64 {
    600
}

const fn default_sentiment_ttl_secs() -> u64 {
    600
}

/// Refresh cycle cadence and retention.
#[derive(Debug, Clone, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between refresh cycles.
    #[serde(default = "default_cycle_secs")]
    pub cycle_secs: u64,
    /// Delay before the warm-up cycle after process start, in seconds.
    #[serde(default = "default_warmup_delay_secs")]
    pub warmup_delay_secs: u64,
    /// Stored predictions older than this many hours are deleted.
    #[serde(default = "default_retention_hours")]
    pub retention_hours: i64,
}

const fn default_cycle_secs() -> u64 {
    60
}

const fn default_warmup_delay_secs() -> u64 {
    3
}

const fn default_retention_hours() -> i64 {
    12
}

/// Generative-analysis provider settings.
/// API keys are loaded from `OPENAI_API_KEY` / `ANTHROPIC_API_KEY` env vars
/// at runtime (never from the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: LlmProvider,
    #[serde(default = "default_llm_model")]
    pub model: String,
    #[serde(default = "default_llm_max_tokens")]
    pub max_tokens: usize,
    #[serde(default = "default_llm_temperature")]
    pub temperature: f64,
}

fn default_llm_model() -> String {
    "gpt-4o-mini".into()
}

const fn default_llm_max_tokens() -> usize {
    1024
}

const fn default_llm_temperature() -> f64 {
    0.3
}

/// News feed settings.
#[derive(Debug, Clone, Deserialize)]
pub struct NewsConfig {
    /// How many of the freshest articles go to the analysis batch.
    #[serde(default = "default_top_articles")]
    pub top_articles: usize,
}

const fn default_top_articles() -> usize {
    8
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database path, or `:memory:` for ephemeral storage.
    #[serde(default = "default_database_url")]
    pub url: String,
}

fn default_database_url() -> String {
    "marketpulse.db".into()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("spot_api_url", &self.network.spot_api_url),
            ("futures_api_url", &self.network.futures_api_url),
            ("fear_greed_url", &self.network.fear_greed_url),
            ("news_api_url", &self.network.news_api_url),
        ] {
            if value.is_empty() {
                return Err(ConfigError::MissingField { field }.into());
            }
            Url::parse(value).map_err(|e| ConfigError::InvalidValue {
                field,
                reason: e.to_string(),
            })?;
        }

        if self.scheduler.cycle_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cycle_secs",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.scheduler.retention_hours <= 0 {
            return Err(ConfigError::InvalidValue {
                field: "retention_hours",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.news.top_articles == 0 {
            return Err(ConfigError::InvalidValue {
                field: "top_articles",
                reason: "must be positive".into(),
            }
            .into());
        }

        Ok(())
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            logging: LoggingConfig::default(),
            cache: CacheConfig::default(),
            scheduler: SchedulerConfig::default(),
            llm: LlmConfig::default(),
            news: NewsConfig::default(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            spot_api_url: default_spot_api_url(),
            futures_api_url: default_futures_api_url(),
            fear_greed_url: default_fear_greed_url(),
            news_api_url: default_news_api_url(),
            request_timeout_ms: default_request_timeout_ms(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            depth_ttl_secs: default_depth_ttl_secs(),
            news_ttl_secs: default_news_ttl_secs(),
            prediction_freshness_secs: default_prediction_freshness_secs(),
            sentiment_ttl_secs: default_sentiment_ttl_secs(),
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            cycle_secs: default_cycle_secs(),
            warmup_delay_secs: default_warmup_delay_secs(),
            retention_hours: default_retention_hours(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_llm_model(),
            max_tokens: default_llm_max_tokens(),
            temperature: default_llm_temperature(),
        }
    }
}

impl Default for NewsConfig {
    fn default() -> Self {
        Self {
            top_articles: default_top_articles(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.scheduler.cycle_secs, 60);
        assert_eq!(config.cache.depth_ttl_secs, 60);
        assert_eq!(config.news.top_articles, 8);
        assert_eq!(config.llm.provider, LlmProvider::Openai);
    }

    #[test]
    fn partial_toml_overrides_defaults() {
        let config: Config = toml::from_str(
            r#"
            [scheduler]
            cycle_secs = 30

            [llm]
            provider = "anthropic"
            model = "claude-3-5-haiku-latest"
            "#,
        )
        .unwrap();

        assert_eq!(config.scheduler.cycle_secs, 30);
        assert_eq!(config.llm.provider, LlmProvider::Anthropic);
        assert_eq!(config.llm.model, "claude-3-5-haiku-latest");
        // Untouched sections keep defaults
        assert_eq!(config.cache.news_ttl_secs, 600);
    }

    #[test]
    fn invalid_url_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [network]
            spot_api_url = "not a url"
            "#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_cycle_is_rejected() {
        let config: Config = toml::from_str(
            r#"
            [scheduler]
            cycle_secs = 0
            "#,
        )
        .unwrap();

        assert!(config.validate().is_err());
    }
}
