//! Depth cache behavior and aggregation end-to-end.

mod support;

use std::sync::Arc;
use std::time::Duration;

use marketpulse::domain::Asset;
use marketpulse::testkit::{call_log, calls_with_prefix, ScriptedMarketFeed, ScriptedSentimentFeed};

#[tokio::test]
async fn second_read_within_ttl_makes_no_upstream_calls() {
    let log = call_log();
    let market = support::market_service(
        Arc::new(ScriptedMarketFeed::new(Arc::clone(&log))),
        Arc::new(ScriptedSentimentFeed::new(Arc::clone(&log))),
        Duration::from_secs(60),
    );

    let first = market.exchange_depth(Asset::Btc).await;
    tokio::time::sleep(Duration::from_millis(1)).await;
    let second = market.exchange_depth(Asset::Btc).await;

    assert_eq!(first, second);
    assert_eq!(calls_with_prefix(&log, "long_short_bias").len(), 1);
    assert_eq!(calls_with_prefix(&log, "order_book_bias").len(), 1);
}

#[tokio::test]
async fn failed_refresh_serves_the_prior_good_snapshot() {
    let log = call_log();
    // Two market calls succeed (one full refresh), everything after fails.
    let market = support::market_service(
        Arc::new(ScriptedMarketFeed::new(Arc::clone(&log)).with_ratio(1.5).fail_after(2)),
        Arc::new(ScriptedSentimentFeed::new(Arc::clone(&log))),
        Duration::ZERO,
    );

    let good = market.exchange_depth(Asset::Btc).await;
    tokio::time::sleep(Duration::from_millis(2)).await;
    let fallback = market.exchange_depth(Asset::Btc).await;

    assert_eq!(good, fallback);
    assert_ne!(fallback.aggregated_buy_pct, 50.0);
}

#[tokio::test]
async fn failure_with_no_history_serves_the_documented_neutral_default() {
    let log = call_log();
    let market = support::market_service(
        Arc::new(ScriptedMarketFeed::new(Arc::clone(&log)).failing()),
        Arc::new(ScriptedSentimentFeed::new(Arc::clone(&log))),
        Duration::from_secs(60),
    );

    let snapshot = market.exchange_depth(Asset::Btc).await;

    assert_eq!(snapshot.aggregated_buy_pct, 50.0);
    assert_eq!(snapshot.aggregated_sell_pct, 50.0);
    assert_eq!(snapshot.long_short_ratio, 1.0);
    assert!(snapshot.rows.iter().all(|r| r.buy_pct == 50.0 && r.sell_pct == 50.0));
}

#[tokio::test]
async fn ratio_of_one_point_five_yields_sixty_percent_base() {
    let log = call_log();
    let market = support::market_service(
        Arc::new(
            ScriptedMarketFeed::new(Arc::clone(&log))
                .with_ratio(1.5)
                .with_book_pct(60.0),
        ),
        Arc::new(ScriptedSentimentFeed::new(Arc::clone(&log)).with_value(64)),
        Duration::from_secs(60),
    );

    let snapshot = market.exchange_depth(Asset::Btc).await;

    // Primary row carries the unjittered base: 1.5 / 2.5 * 100 = 60.
    let primary = snapshot
        .rows
        .iter()
        .find(|r| r.exchange == "Binance")
        .expect("primary exchange row");
    assert!((primary.buy_pct - 60.0).abs() < 1e-9);

    assert_eq!(snapshot.rows.len(), 14);
    for pair in snapshot.rows.windows(2) {
        assert!(pair[0].buy_pct >= pair[1].buy_pct, "rows must sort descending");
    }

    // Jitter is bounded, so the aggregate stays near the base.
    assert!((snapshot.aggregated_buy_pct - 60.0).abs() <= 6.0);
    assert_eq!(snapshot.long_short_ratio, 1.5);
    assert_eq!(snapshot.fear_greed_index, 64);
}

#[tokio::test]
async fn order_book_failure_degrades_to_even_split_not_error() {
    let log = call_log();
    // fail_after(1): the long/short call succeeds, the order book call fails.
    let market = support::market_service(
        Arc::new(ScriptedMarketFeed::new(Arc::clone(&log)).with_ratio(1.5).fail_after(1)),
        Arc::new(ScriptedSentimentFeed::new(Arc::clone(&log))),
        Duration::from_secs(60),
    );

    let snapshot = market.exchange_depth(Asset::Btc).await;

    // base = (60 + 50) / 2 = 55 on the primary row.
    let primary = snapshot
        .rows
        .iter()
        .find(|r| r.exchange == "Binance")
        .unwrap();
    assert!((primary.buy_pct - 55.0).abs() < 1e-9);
}

#[tokio::test]
async fn sentiment_overview_tallies_the_full_history_window() {
    let log = call_log();
    let history = vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 55];
    let market = support::market_service(
        Arc::new(ScriptedMarketFeed::new(Arc::clone(&log))),
        Arc::new(
            ScriptedSentimentFeed::new(Arc::clone(&log))
                .with_value(55)
                .with_history(history.clone()),
        ),
        Duration::from_secs(60),
    );

    let overview = market.sentiment_overview().await;

    assert_eq!(overview.distribution.total(), history.len());
    assert_eq!(overview.fear_greed.value, 55);
    assert_eq!(overview.assets.len(), 5);
    // Flat scripted candles mean neutral per-asset scores.
    assert!(overview.assets.iter().all(|a| (a.score - 50.0).abs() < 1e-9));
}

#[tokio::test]
async fn sentiment_overview_is_cached() {
    let log = call_log();
    let market = support::market_service(
        Arc::new(ScriptedMarketFeed::new(Arc::clone(&log))),
        Arc::new(ScriptedSentimentFeed::new(Arc::clone(&log))),
        Duration::from_secs(60),
    );

    market.sentiment_overview().await;
    market.sentiment_overview().await;

    assert_eq!(calls_with_prefix(&log, "fear_greed_history").len(), 1);
}
