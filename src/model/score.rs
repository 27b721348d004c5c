//! Complexity score records.

use super::ConnectorUsage;
use crate::config::TierCutoffs;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Migration risk tier derived from the overall score
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum RiskTier {
    /// Neither flows nor connectors were found, so the score carries no meaning
    #[default]
    InsufficientSignal,
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    /// Map an overall score onto a tier using the configured cut-offs
    #[must_use]
    pub fn from_score(score: f64, cutoffs: &TierCutoffs) -> Self {
        if score >= cutoffs.critical {
            Self::Critical
        } else if score >= cutoffs.high {
            Self::High
        } else if score >= cutoffs.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Upper-case label used by the text reports
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::InsufficientSignal => "INSUFFICIENT SIGNAL",
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Whether the tier warrants dedicated migration attention
    #[must_use]
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::High | Self::Critical)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category scores, each within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct CategoryScores {
    pub connectors: f64,
    pub custom_code: f64,
    pub transformation: f64,
    pub structure: f64,
}

/// Final complexity score of one project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct ComplexityScore {
    pub categories: CategoryScores,
    /// Weighted combination of the categories, within [0, 100]
    pub overall: f64,
    pub tier: RiskTier,
    /// Tested flows over all flows; 0 when there are no flows
    pub test_coverage: f64,
    /// Coverage fell below the configured threshold
    pub testing_risk: bool,
    /// Connector occurrences with the weight each type was scored at
    pub connector_usage: Vec<ConnectorUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_cutoffs() {
        let cutoffs = TierCutoffs::default();
        assert_eq!(RiskTier::from_score(0.0, &cutoffs), RiskTier::Low);
        assert_eq!(RiskTier::from_score(24.99, &cutoffs), RiskTier::Low);
        assert_eq!(RiskTier::from_score(25.0, &cutoffs), RiskTier::Medium);
        assert_eq!(RiskTier::from_score(50.0, &cutoffs), RiskTier::High);
        assert_eq!(RiskTier::from_score(74.99, &cutoffs), RiskTier::High);
        assert_eq!(RiskTier::from_score(75.0, &cutoffs), RiskTier::Critical);
        assert_eq!(RiskTier::from_score(100.0, &cutoffs), RiskTier::Critical);
    }

    #[test]
    fn test_tier_serialization() {
        let json = serde_json::to_string(&RiskTier::InsufficientSignal).unwrap();
        assert_eq!(json, "\"insufficient-signal\"");
        assert!(RiskTier::Critical.is_elevated());
        assert!(!RiskTier::Medium.is_elevated());
    }
}
