use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ratios at or above this percentage are `High` risk.
pub const HIGH_RISK_THRESHOLD: f64 = 60.0;
/// Ratios at or above this percentage (and below `HIGH_RISK_THRESHOLD`) are `Medium` risk.
pub const MEDIUM_RISK_THRESHOLD: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Medium => "Medium",
            RiskLevel::High => "High",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown risk level {0:?}")]
pub struct UnknownRiskLevel(pub String);

impl FromStr for RiskLevel {
    type Err = UnknownRiskLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Low" => Ok(RiskLevel::Low),
            "Medium" => Ok(RiskLevel::Medium),
            "High" => Ok(RiskLevel::High),
            other => Err(UnknownRiskLevel(other.to_string())),
        }
    }
}

/// Map a dark ratio (percentage, already clamped to `[0, 100]`) to a risk tier.
pub fn classify(ratio: f64) -> RiskLevel {
    if ratio >= HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if ratio >= MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}
