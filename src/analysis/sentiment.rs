//! Fear/greed bucketing and the per-asset sentiment score.

use crate::domain::{Candle, FearGreedDistribution, FearGreedLabel};

/// Tally a historical series of fear/greed scores into bucket counts.
///
/// The counts always sum to the length of the input series.
#[must_use]
pub fn distribution(values: &[u8]) -> FearGreedDistribution {
    let mut dist = FearGreedDistribution::default();
    for &value in values {
        match FearGreedLabel::classify(value) {
            FearGreedLabel::ExtremeFear => dist.extreme_fear += 1,
            FearGreedLabel::Fear => dist.fear += 1,
            FearGreedLabel::Neutral => dist.neutral += 1,
            FearGreedLabel::Greed => dist.greed += 1,
            FearGreedLabel::ExtremeGreed => dist.extreme_greed += 1,
        }
    }
    dist
}

/// Heuristic sentiment score over daily candles (oldest first).
///
/// The weights and clamp bounds are fixed; downstream consumers rely on
/// output parity with the original scoring, so do not retune them:
///
/// ```text
/// score = 50
///       + clamp(momentum7d * 2.5, ±20)
///       + clamp(return1d * 3, ±10)
///       - clamp((volatility14d - 3) * 3, 0..15)
///       + clamp(volume_change * 0.05, ±5)
/// ```
///
/// clamped to [0, 100]. Returns the neutral 50 when fewer than two candles
/// are available.
#[must_use]
pub fn sentiment_score(candles: &[Candle]) -> f64 {
    let len = candles.len();
    if len < 2 {
        return 50.0;
    }

    let last = candles[len - 1];
    let prev = candles[len - 2];

    let return_1d = pct_change(prev.close, last.close);

    let momentum_base = if len >= 8 { candles[len - 8] } else { candles[0] };
    let momentum_7d = pct_change(momentum_base.close, last.close);

    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volatility_14d = coefficient_of_variation(&closes) * 100.0;

    let prior_volumes: Vec<f64> = candles[..len - 1].iter().map(|c| c.volume).collect();
    let volume_change = pct_change(mean(&prior_volumes), last.volume);

    let score = 50.0
        + (momentum_7d * 2.5).clamp(-20.0, 20.0)
        + (return_1d * 3.0).clamp(-10.0, 10.0)
        - ((volatility_14d - 3.0) * 3.0).clamp(0.0, 15.0)
        + (volume_change * 0.05).clamp(-5.0, 5.0);

    score.clamp(0.0, 100.0)
}

fn pct_change(from: f64, to: f64) -> f64 {
    if from == 0.0 {
        return 0.0;
    }
    (to / from - 1.0) * 100.0
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// stdev / mean of the series; 0 for a degenerate series.
fn coefficient_of_variation(values: &[f64]) -> f64 {
    let m = mean(values);
    if m == 0.0 || values.len() < 2 {
        return 0.0;
    }
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt() / m
}
