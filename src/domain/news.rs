//! News articles and per-headline sentiment predictions.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::prediction::Direction;

/// A news article as returned by the news feed, already filtered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub headline: String,
    pub source: String,
    pub url: String,
    pub published_at: DateTime<Utc>,
    pub body: String,
}

/// Expected market impact of a headline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Impact {
    High,
    #[default]
    Medium,
    Low,
}

impl Impact {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Impact::High => "HIGH",
            Impact::Medium => "MEDIUM",
            Impact::Low => "LOW",
        }
    }
}

impl fmt::Display for Impact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Impact {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HIGH" => Ok(Impact::High),
            "MEDIUM" | "MODERATE" => Ok(Impact::Medium),
            "LOW" => Ok(Impact::Low),
            _ => Err(()),
        }
    }
}

/// Sentiment read of a single headline.
///
/// Batches are replaced wholesale on each successful refresh; individual
/// records are never updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsPrediction {
    pub headline: String,
    pub source: String,
    pub published_at: DateTime<Utc>,
    pub url: String,
    /// Asset the headline most affects, free-form (not restricted to the
    /// tracked universe; news covers the whole market).
    pub asset: String,
    pub direction: Direction,
    /// Confidence in [0, 100].
    pub confidence: u8,
    pub impact: Impact,
    pub reasoning: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impact_parses_case_insensitive() {
        assert_eq!("high".parse::<Impact>().unwrap(), Impact::High);
        assert_eq!("Moderate".parse::<Impact>().unwrap(), Impact::Medium);
        assert!("extreme".parse::<Impact>().is_err());
    }

    #[test]
    fn impact_default_is_medium() {
        assert_eq!(Impact::default(), Impact::Medium);
    }
}
