//! Fear & Greed readings and derived sentiment aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::asset::Asset;

/// Qualitative bucket for a Fear & Greed reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FearGreedLabel {
    #[serde(rename = "Extreme Fear")]
    ExtremeFear,
    Fear,
    Neutral,
    Greed,
    #[serde(rename = "Extreme Greed")]
    ExtremeGreed,
}

impl FearGreedLabel {
    /// Classify a 0-100 score into its bucket.
    #[must_use]
    pub const fn classify(value: u8) -> Self {
        match value {
            0..=25 => FearGreedLabel::ExtremeFear,
            26..=45 => FearGreedLabel::Fear,
            46..=55 => FearGreedLabel::Neutral,
            56..=75 => FearGreedLabel::Greed,
            _ => FearGreedLabel::ExtremeGreed,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            FearGreedLabel::ExtremeFear => "Extreme Fear",
            FearGreedLabel::Fear => "Fear",
            FearGreedLabel::Neutral => "Neutral",
            FearGreedLabel::Greed => "Greed",
            FearGreedLabel::ExtremeGreed => "Extreme Greed",
        }
    }
}

impl std::fmt::Display for FearGreedLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FearGreedLabel {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Extreme Fear" => Ok(FearGreedLabel::ExtremeFear),
            "Fear" => Ok(FearGreedLabel::Fear),
            "Neutral" => Ok(FearGreedLabel::Neutral),
            "Greed" => Ok(FearGreedLabel::Greed),
            "Extreme Greed" => Ok(FearGreedLabel::ExtremeGreed),
            _ => Err(()),
        }
    }
}

/// A Fear & Greed index reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FearGreed {
    /// Index value in [0, 100].
    pub value: u8,
    pub label: FearGreedLabel,
}

impl FearGreed {
    #[must_use]
    pub const fn new(value: u8) -> Self {
        Self {
            value,
            label: FearGreedLabel::classify(value),
        }
    }
}

impl Default for FearGreed {
    /// The documented neutral fallback when the index is unavailable.
    fn default() -> Self {
        Self::new(50)
    }
}

/// Bucket tallies over a historical window of Fear & Greed scores.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FearGreedDistribution {
    pub extreme_fear: usize,
    pub fear: usize,
    pub neutral: usize,
    pub greed: usize,
    pub extreme_greed: usize,
}

impl FearGreedDistribution {
    /// Total number of readings tallied.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.extreme_fear + self.fear + self.neutral + self.greed + self.extreme_greed
    }

    /// Share of a bucket count in percent of the total; 0 for an empty window.
    #[must_use]
    pub fn pct(&self, count: usize) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        count as f64 / total as f64 * 100.0
    }
}

/// Per-asset heuristic sentiment score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetSentiment {
    pub asset: Asset,
    /// Score in [0, 100]; 50 when no price history was available.
    pub score: f64,
}

/// Dashboard-facing sentiment aggregate.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentOverview {
    pub fear_greed: FearGreed,
    pub distribution: FearGreedDistribution,
    pub assets: Vec<AssetSentiment>,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_covers_all_bucket_boundaries() {
        assert_eq!(FearGreedLabel::classify(0), FearGreedLabel::ExtremeFear);
        assert_eq!(FearGreedLabel::classify(25), FearGreedLabel::ExtremeFear);
        assert_eq!(FearGreedLabel::classify(26), FearGreedLabel::Fear);
        assert_eq!(FearGreedLabel::classify(45), FearGreedLabel::Fear);
        assert_eq!(FearGreedLabel::classify(46), FearGreedLabel::Neutral);
        assert_eq!(FearGreedLabel::classify(55), FearGreedLabel::Neutral);
        assert_eq!(FearGreedLabel::classify(56), FearGreedLabel::Greed);
        assert_eq!(FearGreedLabel::classify(75), FearGreedLabel::Greed);
        assert_eq!(FearGreedLabel::classify(76), FearGreedLabel::ExtremeGreed);
        assert_eq!(FearGreedLabel::classify(100), FearGreedLabel::ExtremeGreed);
    }

    #[test]
    fn default_reading_is_neutral() {
        let fg = FearGreed::default();
        assert_eq!(fg.value, 50);
        assert_eq!(fg.label, FearGreedLabel::Neutral);
    }

    #[test]
    fn label_serializes_with_spaces() {
        let json = serde_json::to_string(&FearGreedLabel::ExtremeFear).unwrap();
        assert_eq!(json, "\"Extreme Fear\"");
    }

    #[test]
    fn distribution_pct_handles_empty_window() {
        let dist = FearGreedDistribution::default();
        assert_eq!(dist.total(), 0);
        assert_eq!(dist.pct(dist.neutral), 0.0);
    }
}
