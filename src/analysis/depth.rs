//! Synthetic per-exchange depth derivation.
//!
//! Only the primary exchange exposes a reliable public order-book and
//! positioning API; the rest of the roster is modeled around its measured
//! bias so the depth table stays complete. The modeled rows are simulated
//! data and are kept clearly separated from the measured inputs.

use rand::Rng;

use crate::domain::{Asset, DepthSnapshot, ExchangeDepthRow, FearGreed, LongShortBias};

/// Exchange roster for the depth table. The first entry is the primary
/// exchange whose row carries the measured bias unjittered.
pub const EXCHANGES: [&str; 14] = [
    "Binance",
    "Coinbase",
    "OKX",
    "Bybit",
    "Upbit",
    "Kraken",
    "Gate.io",
    "KuCoin",
    "Bitfinex",
    "HTX",
    "MEXC",
    "Bitget",
    "Crypto.com",
    "Gemini",
];

/// Jitter half-width applied to the modeled rows, in percentage points.
const JITTER: f64 = 6.0;

/// Modeled buy percentages are clamped into this band.
const BUY_PCT_MIN: f64 = 15.0;
const BUY_PCT_MAX: f64 = 85.0;

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Build a depth snapshot from the measured long/short bias and order-book
/// buy share.
///
/// The base buy bias is the mean of the two measured signals. The primary
/// exchange row carries the base unchanged; every other roster row gets the
/// base plus bounded jitter. Rows are sorted descending by buy percentage.
pub fn synthesize_depth<R: Rng>(
    asset: Asset,
    bias: &LongShortBias,
    book_buy_pct: f64,
    fear_greed: FearGreed,
    rng: &mut R,
) -> DepthSnapshot {
    let base = (bias.long_pct + book_buy_pct) / 2.0;

    let mut rows: Vec<ExchangeDepthRow> = EXCHANGES
        .iter()
        .enumerate()
        .map(|(i, &exchange)| {
            let buy_pct = if i == 0 {
                round1(base.clamp(BUY_PCT_MIN, BUY_PCT_MAX))
            } else {
                let jittered = base + rng.gen_range(-JITTER..=JITTER);
                round1(jittered.clamp(BUY_PCT_MIN, BUY_PCT_MAX))
            };
            ExchangeDepthRow {
                exchange,
                buy_pct,
                sell_pct: round1(100.0 - buy_pct),
            }
        })
        .collect();

    rows.sort_by(|a, b| {
        b.buy_pct
            .partial_cmp(&a.buy_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let aggregated_buy_pct =
        round1(rows.iter().map(|r| r.buy_pct).sum::<f64>() / rows.len() as f64);

    DepthSnapshot {
        asset,
        rows,
        aggregated_buy_pct,
        aggregated_sell_pct: round1(100.0 - aggregated_buy_pct),
        fear_greed_index: fear_greed.value,
        fear_greed_label: fear_greed.label,
        long_short_ratio: bias.ratio,
        timestamp: chrono::Utc::now(),
    }
}

/// The documented neutral snapshot served when every source is down and no
/// prior value exists: an even 50/50 split on every row, ratio 1.
#[must_use]
pub fn neutral_depth(asset: Asset) -> DepthSnapshot {
    let fear_greed = FearGreed::default();
    let rows = EXCHANGES
        .iter()
        .map(|&exchange| ExchangeDepthRow {
            exchange,
            buy_pct: 50.0,
            sell_pct: 50.0,
        })
        .collect();

    DepthSnapshot {
        asset,
        rows,
        aggregated_buy_pct: 50.0,
        aggregated_sell_pct: 50.0,
        fear_greed_index: fear_greed.value,
        fear_greed_label: fear_greed.label,
        long_short_ratio: 1.0,
        timestamp: chrono::Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snapshot_for(base_long_pct: f64, book_pct: f64) -> DepthSnapshot {
        let mut rng = StdRng::seed_from_u64(7);
        synthesize_depth(
            Asset::Btc,
            &LongShortBias::from_long_pct(base_long_pct),
            book_pct,
            FearGreed::new(60),
            &mut rng,
        )
    }

    #[test]
    fn primary_row_carries_the_unjittered_base() {
        let snapshot = snapshot_for(60.0, 60.0);
        let primary = snapshot
            .rows
            .iter()
            .find(|r| r.exchange == "Binance")
            .unwrap();
        assert!((primary.buy_pct - 60.0).abs() < 1e-9);
    }

    #[test]
    fn full_roster_sorted_descending() {
        let snapshot = snapshot_for(60.0, 60.0);
        assert_eq!(snapshot.rows.len(), EXCHANGES.len());
        for pair in snapshot.rows.windows(2) {
            assert!(pair[0].buy_pct >= pair[1].buy_pct);
        }
    }

    #[test]
    fn rows_sum_to_one_hundred_within_rounding() {
        let snapshot = snapshot_for(64.2, 55.8);
        for row in &snapshot.rows {
            assert!((row.buy_pct + row.sell_pct - 100.0).abs() < 0.11);
        }
    }

    #[test]
    fn aggregate_is_the_mean_of_the_rows() {
        let snapshot = snapshot_for(60.0, 60.0);
        let mean = snapshot.rows.iter().map(|r| r.buy_pct).sum::<f64>() / 14.0;
        assert!((snapshot.aggregated_buy_pct - mean).abs() < 0.06);
        // Jitter is symmetric, so the aggregate stays near the base.
        assert!((snapshot.aggregated_buy_pct - 60.0).abs() <= JITTER);
    }

    #[test]
    fn extreme_base_is_clamped() {
        let snapshot = snapshot_for(99.0, 99.0);
        for row in &snapshot.rows {
            assert!(row.buy_pct <= BUY_PCT_MAX);
            assert!(row.buy_pct >= BUY_PCT_MIN);
        }
    }

    #[test]
    fn neutral_snapshot_is_the_documented_default() {
        let snapshot = neutral_depth(Asset::Eth);
        assert_eq!(snapshot.aggregated_buy_pct, 50.0);
        assert_eq!(snapshot.aggregated_sell_pct, 50.0);
        assert_eq!(snapshot.long_short_ratio, 1.0);
        assert_eq!(snapshot.fear_greed_index, 50);
        assert!(snapshot.rows.iter().all(|r| r.buy_pct == 50.0));
    }
}
