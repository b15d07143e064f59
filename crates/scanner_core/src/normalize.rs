//! Reconciles the detection service's two response shapes into one [`ScanResult`].
//!
//! The service answers either with an aggregate over many content items or with a
//! single binary prediction. Decoding is an explicit tagged step: try the aggregate
//! shape, then the single-prediction shape, otherwise fail.

use scan_logging::scan_debug;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

use crate::{
    classify, DetectedSnippet, RiskLevel, ScanKind, ScanResult, FLAGGED_INPUT_PLACEHOLDER,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NormalizeError {
    #[error("unrecognized response shape")]
    UnrecognizedResponseShape,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum UpstreamShape {
    Aggregate(AggregateShape),
    SinglePrediction(SinglePredictionShape),
}

#[derive(Debug, Deserialize)]
struct AggregateShape {
    #[serde(deserialize_with = "whole_number")]
    total_contents_scanned: u64,
    #[serde(deserialize_with = "whole_number")]
    total_dark_patterns_detected: u64,
    dark_ratio: f64,
    #[serde(default)]
    risk_level: Option<Value>,
    #[serde(default)]
    detected_texts: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct SinglePredictionShape {
    #[serde(deserialize_with = "whole_number")]
    prediction: u64,
    #[serde(default)]
    confidence: Option<Value>,
    // Present only to reject half-aggregate objects.
    #[serde(default)]
    total_contents_scanned: Option<Value>,
    #[serde(default)]
    total_dark_patterns_detected: Option<Value>,
    #[serde(default)]
    dark_ratio: Option<Value>,
}

/// Accept `10` and `10.0` alike; negative, fractional and non-finite numbers fail.
fn whole_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = Number::deserialize(deserializer)?;
    if let Some(whole) = number.as_u64() {
        return Ok(whole);
    }
    match number.as_f64() {
        Some(value) if value >= 0.0 && value.fract() == 0.0 && value < u64::MAX as f64 => {
            Ok(value as u64)
        }
        _ => Err(D::Error::custom(format!("expected a whole non-negative number, got {number}"))),
    }
}

/// Normalize a decoded response body for a scan of `kind`.
pub fn normalize(body: &Value, kind: ScanKind) -> Result<ScanResult, NormalizeError> {
    // Derived structs also accept JSON arrays; only objects are responses.
    if !body.is_object() {
        return Err(NormalizeError::UnrecognizedResponseShape);
    }

    let shape = UpstreamShape::deserialize(body)
        .map_err(|_| NormalizeError::UnrecognizedResponseShape)?;

    match shape {
        UpstreamShape::Aggregate(aggregate) => {
            scan_debug!("{} scan answered with aggregate shape", kind);
            Ok(from_aggregate(aggregate))
        }
        UpstreamShape::SinglePrediction(single) => {
            scan_debug!("{} scan answered with single-prediction shape", kind);
            from_single_prediction(single)
        }
    }
}

fn from_aggregate(aggregate: AggregateShape) -> ScanResult {
    let dark_ratio = clamp_ratio(aggregate.dark_ratio);
    let risk_level = aggregate
        .risk_level
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|label| label.parse::<RiskLevel>().ok())
        .unwrap_or_else(|| classify(dark_ratio));
    let detected_texts = match aggregate.detected_texts {
        Some(Value::Array(items)) => items.iter().map(coerce_snippet).collect(),
        _ => Vec::new(),
    };

    ScanResult {
        total_contents_scanned: aggregate.total_contents_scanned,
        total_dark_patterns_detected: aggregate.total_dark_patterns_detected,
        dark_ratio,
        risk_level,
        detected_texts,
    }
}

fn from_single_prediction(single: SinglePredictionShape) -> Result<ScanResult, NormalizeError> {
    if single.total_contents_scanned.is_some()
        || single.total_dark_patterns_detected.is_some()
        || single.dark_ratio.is_some()
    {
        return Err(NormalizeError::UnrecognizedResponseShape);
    }

    match single.prediction {
        1 => Ok(ScanResult {
            total_contents_scanned: 1,
            total_dark_patterns_detected: 1,
            dark_ratio: 100.0,
            risk_level: RiskLevel::High,
            detected_texts: vec![DetectedSnippet {
                text: FLAGGED_INPUT_PLACEHOLDER.to_string(),
                confidence: coerce_confidence(single.confidence.as_ref()),
            }],
        }),
        0 => Ok(ScanResult {
            total_contents_scanned: 1,
            total_dark_patterns_detected: 0,
            dark_ratio: 0.0,
            risk_level: RiskLevel::Low,
            detected_texts: Vec::new(),
        }),
        _ => Err(NormalizeError::UnrecognizedResponseShape),
    }
}

/// Round to two decimals, then clamp into `[0, 100]`.
fn clamp_ratio(ratio: f64) -> f64 {
    if !ratio.is_finite() {
        return 0.0;
    }
    ((ratio * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

fn coerce_confidence(value: Option<&Value>) -> f64 {
    value
        .and_then(Value::as_f64)
        .filter(|confidence| confidence.is_finite())
        .map_or(0.0, |confidence| confidence.clamp(0.0, 1.0))
}

fn coerce_snippet(item: &Value) -> DetectedSnippet {
    match item {
        Value::Object(fields) => DetectedSnippet {
            text: fields
                .get("text")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            confidence: coerce_confidence(fields.get("confidence")),
        },
        Value::String(text) => DetectedSnippet {
            text: text.clone(),
            confidence: 0.0,
        },
        _ => DetectedSnippet {
            text: String::new(),
            confidence: 0.0,
        },
    }
}
