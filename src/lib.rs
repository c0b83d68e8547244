//! Marketpulse - periodic market data refresh and caching.
//!
//! This crate is the data-refresh daemon behind a crypto trading platform:
//! it polls exchange, sentiment, and news sources on a fixed cycle, caches
//! every expensive upstream call behind a single-slot TTL slot, and keeps
//! AI-generated price predictions fresh and garbage-collected.
//!
//! # Architecture
//!
//! - [`scheduler`] - Recurring refresh cycles with an overlap guard and two
//!   allSettled-style fan-out phases
//! - [`service`] - Cache-guarded read paths (exchange depth, sentiment
//!   overview) with soft-expiry fallbacks
//! - [`predictor`] - AI prediction generation and news sentiment batches,
//!   with a tolerant response decode layer
//! - [`client`] - Outbound port traits and the HTTP/LLM adapters behind them
//! - [`analysis`] - Pure derivations: synthetic depth, fear/greed
//!   bucketing, sentiment scoring, strategy metric drift
//! - [`cache`] - The single-slot TTL cache
//! - [`store`] - Prediction persistence (SQLite via Diesel) and the
//!   in-memory backends
//! - [`config`] - TOML configuration with env-only secrets
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use marketpulse::app::App;
//! use marketpulse::config::Config;
//!
//! # async fn run() -> marketpulse::error::Result<()> {
//! let config = Config::load("config.toml")?;
//! App::run(config).await
//! # }
//! ```

pub mod analysis;
pub mod app;
pub mod cache;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod predictor;
pub mod scheduler;
pub mod service;
pub mod store;

#[cfg(any(test, feature = "testkit"))]
pub mod testkit;
