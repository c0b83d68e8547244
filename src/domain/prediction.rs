//! AI price predictions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::asset::Asset;
use super::sentiment::FearGreedLabel;

/// Predicted price direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    #[default]
    Neutral,
}

impl Direction {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Bullish => "BULLISH",
            Direction::Bearish => "BEARISH",
            Direction::Neutral => "NEUTRAL",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ();

    /// Case-insensitive; used by the tolerant response decode.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BULLISH" | "BUY" | "LONG" => Ok(Direction::Bullish),
            "BEARISH" | "SELL" | "SHORT" => Ok(Direction::Bearish),
            "NEUTRAL" | "HOLD" => Ok(Direction::Neutral),
            _ => Err(()),
        }
    }
}

/// Prediction horizon.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[default]
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "24H")]
    OneDay,
}

impl Timeframe {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Timeframe::OneHour => "1H",
            Timeframe::FourHours => "4H",
            Timeframe::OneDay => "24H",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "1H" => Ok(Timeframe::OneHour),
            "4H" => Ok(Timeframe::FourHours),
            "24H" | "1D" => Ok(Timeframe::OneDay),
            _ => Err(()),
        }
    }
}

/// How long a generated prediction stays valid.
pub const PREDICTION_VALIDITY: Duration = Duration::hours(1);

/// An immutable AI-generated price prediction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prediction {
    pub id: Uuid,
    pub asset: Asset,
    pub timeframe: Timeframe,
    pub direction: Direction,
    /// Confidence in [0, 100].
    pub confidence: u8,
    pub target_price: Decimal,
    pub current_price: Decimal,
    pub fear_greed_index: u8,
    pub fear_greed_label: FearGreedLabel,
    pub reasoning: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Prediction {
    /// Age of the record relative to `now`.
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.created_at
    }

    /// Whether the record is still inside the freshness window.
    #[must_use]
    pub fn is_fresh(&self, now: DateTime<Utc>, window: Duration) -> bool {
        self.age(now) < window
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(created_at: DateTime<Utc>) -> Prediction {
        Prediction {
            id: Uuid::new_v4(),
            asset: Asset::Btc,
            timeframe: Timeframe::OneHour,
            direction: Direction::Bullish,
            confidence: 70,
            target_price: dec!(70000),
            current_price: dec!(68000),
            fear_greed_index: 60,
            fear_greed_label: FearGreedLabel::Greed,
            reasoning: "test".into(),
            created_at,
            expires_at: created_at + PREDICTION_VALIDITY,
        }
    }

    #[test]
    fn direction_parses_common_spellings() {
        assert_eq!("bullish".parse::<Direction>().unwrap(), Direction::Bullish);
        assert_eq!("SELL".parse::<Direction>().unwrap(), Direction::Bearish);
        assert_eq!("hold".parse::<Direction>().unwrap(), Direction::Neutral);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn direction_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&Direction::Bullish).unwrap(),
            "\"BULLISH\""
        );
    }

    #[test]
    fn timeframe_display_roundtrip() {
        for tf in [Timeframe::OneHour, Timeframe::FourHours, Timeframe::OneDay] {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn freshness_window_is_exclusive_of_age() {
        let now = Utc::now();
        let fresh = sample(now - Duration::minutes(5));
        let stale = sample(now - Duration::minutes(15));
        let window = Duration::minutes(10);

        assert!(fresh.is_fresh(now, window));
        assert!(!stale.is_fresh(now, window));
    }
}
