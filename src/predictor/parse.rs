//! Tolerant decode of generative-analysis responses.
//!
//! Model output is only nominally JSON: it arrives fenced or bare, with
//! drifting key names and out-of-range numbers. This layer normalizes all
//! of that into typed values with one documented default per field, so the
//! rest of the pipeline never sees a malformed response.

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::domain::{Direction, Impact};
use crate::error::{Error, Result};

/// Confidence used when the field is missing or unreadable.
const DEFAULT_CONFIDENCE: u8 = 50;

/// A decoded price prediction with every field defaulted.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPrediction {
    /// Defaults to `Neutral` on a missing or unknown direction.
    pub direction: Direction,
    /// Clamped to [0, 100]; defaults to 50.
    pub confidence: u8,
    /// Absent when the model gave no usable number.
    pub target_price: Option<Decimal>,
    pub reasoning: String,
}

/// A decoded news batch item; article metadata is attached by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedNewsItem {
    pub asset: Option<String>,
    pub direction: Direction,
    pub confidence: u8,
    pub impact: Impact,
    pub reasoning: String,
}

#[derive(Deserialize)]
struct RawPrediction {
    #[serde(alias = "direction", alias = "signal")]
    prediction: Option<String>,
    confidence: Option<Value>,
    #[serde(rename = "targetPrice", alias = "target_price", alias = "target")]
    target_price: Option<Value>,
    #[serde(alias = "rationale", alias = "analysis")]
    reasoning: Option<String>,
}

#[derive(Deserialize)]
struct RawNewsBatch {
    #[serde(alias = "items", alias = "results")]
    predictions: Vec<RawNewsItem>,
}

#[derive(Deserialize)]
struct RawNewsItem {
    #[serde(alias = "symbol", alias = "coin")]
    asset: Option<String>,
    #[serde(alias = "direction", alias = "sentiment", alias = "signal")]
    prediction: Option<String>,
    confidence: Option<Value>,
    impact: Option<String>,
    #[serde(alias = "rationale")]
    reasoning: Option<String>,
}

/// Decode a single price-prediction response.
///
/// # Errors
/// Returns an error only when no JSON object can be located at all; every
/// recognizable-but-wrong field maps to its default instead.
pub fn parse_prediction(text: &str) -> Result<ParsedPrediction> {
    let json = extract_json(text)?;
    let raw: RawPrediction =
        serde_json::from_str(json).map_err(|e| Error::Parse(format!("invalid JSON: {e}")))?;

    Ok(ParsedPrediction {
        direction: parse_direction(raw.prediction.as_deref()),
        confidence: parse_confidence(raw.confidence.as_ref()),
        target_price: raw.target_price.as_ref().and_then(to_decimal),
        reasoning: raw
            .reasoning
            .unwrap_or_else(|| "No reasoning provided".to_string()),
    })
}

/// Decode a news-batch response: either `{"predictions": [...]}` or a bare
/// array.
pub fn parse_news_batch(text: &str) -> Result<Vec<ParsedNewsItem>> {
    let json = extract_json(text)?;

    let items: Vec<RawNewsItem> = match serde_json::from_str::<RawNewsBatch>(json) {
        Ok(batch) => batch.predictions,
        Err(_) => serde_json::from_str(json)
            .map_err(|e| Error::Parse(format!("invalid JSON: {e}")))?,
    };

    Ok(items
        .into_iter()
        .map(|raw| ParsedNewsItem {
            asset: raw.asset.filter(|a| !a.is_empty()),
            direction: parse_direction(raw.prediction.as_deref()),
            confidence: parse_confidence(raw.confidence.as_ref()),
            impact: raw
                .impact
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or_default(),
            reasoning: raw
                .reasoning
                .unwrap_or_else(|| "No reasoning provided".to_string()),
        })
        .collect())
}

fn parse_direction(raw: Option<&str>) -> Direction {
    raw.and_then(|s| s.parse().ok()).unwrap_or_default()
}

/// Accept numbers or numeric strings; clamp into [0, 100].
fn parse_confidence(raw: Option<&Value>) -> u8 {
    let value = match raw {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match value {
        Some(v) if v.is_finite() => v.clamp(0.0, 100.0).round() as u8,
        _ => DEFAULT_CONFIDENCE,
    }
}

fn to_decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => n.as_f64().and_then(Decimal::from_f64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Find JSON in a markdown code block, or the outermost object/array.
fn extract_json(text: &str) -> Result<&str> {
    if let Some(start) = text.find("```json") {
        let start = start + 7;
        let end = text[start..]
            .find("```")
            .map(|i| start + i)
            .unwrap_or(text.len());
        return Ok(text[start..end].trim());
    }

    let obj = text.find('{');
    let arr = text.find('[');
    match (obj, arr) {
        (Some(o), Some(a)) if a < o => Ok(slice_to_last(text, a, ']')),
        (_, Some(a)) if obj.is_none() => Ok(slice_to_last(text, a, ']')),
        (Some(o), _) => Ok(slice_to_last(text, o, '}')),
        _ => Err(Error::Parse("no JSON found in response".into())),
    }
}

fn slice_to_last(text: &str, start: usize, close: char) -> &str {
    let end = text.rfind(close).map(|i| i + 1).unwrap_or(text.len());
    &text[start..end]
}
