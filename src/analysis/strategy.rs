//! Bounded random walk for the showcase strategy metrics.
//!
//! Presentation data, not trading results: each cycle nudges the figures
//! inside fixed bands so the dashboard does not look frozen.

use chrono::Utc;
use rand::Rng;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;

use crate::domain::Strategy;

/// Per-cycle AUM drift half-width (fraction).
const AUM_DRIFT: f64 = 0.005;

/// Per-cycle win-rate step half-width (percentage points).
const WIN_RATE_STEP: f64 = 0.4;
const WIN_RATE_MIN: f64 = 45.0;
const WIN_RATE_MAX: f64 = 85.0;

/// Per-cycle monthly-return step half-width (percentage points).
const RETURN_STEP: f64 = 0.3;
const RETURN_MIN: f64 = 2.0;
const RETURN_MAX: f64 = 35.0;

/// Apply one random-walk step to a strategy's metrics.
pub fn drift<R: Rng>(strategy: &mut Strategy, rng: &mut R) {
    let factor = 1.0 + rng.gen_range(-AUM_DRIFT..=AUM_DRIFT);
    let factor = Decimal::from_f64(factor).unwrap_or(Decimal::ONE);
    strategy.aum = (strategy.aum * factor).round_dp(2);

    strategy.win_rate_pct = (strategy.win_rate_pct + rng.gen_range(-WIN_RATE_STEP..=WIN_RATE_STEP))
        .clamp(WIN_RATE_MIN, WIN_RATE_MAX);

    strategy.monthly_return_pct = (strategy.monthly_return_pct
        + rng.gen_range(-RETURN_STEP..=RETURN_STEP))
    .clamp(RETURN_MIN, RETURN_MAX);

    strategy.updated_at = Utc::now();
}
