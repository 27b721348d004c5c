//! Portfolio recommendation rules.

use super::{PortfolioAccumulator, PortfolioAggregator};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rule that produced a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum RecommendationRule {
    LegacyPlatform,
    HighComplexity,
    CustomCodeReview,
    CustomCodePresent,
    HeavyConnectors,
    LowTestCoverage,
    UnparsableSources,
    OversizedFiles,
    ComplexFlows,
    InsufficientSignal,
}

impl RecommendationRule {
    /// Every rule in evaluation order
    pub const ALL: [Self; 10] = [
        Self::LegacyPlatform,
        Self::HighComplexity,
        Self::CustomCodeReview,
        Self::CustomCodePresent,
        Self::HeavyConnectors,
        Self::LowTestCoverage,
        Self::UnparsableSources,
        Self::OversizedFiles,
        Self::ComplexFlows,
        Self::InsufficientSignal,
    ];

    /// Priority, 1 being the most urgent
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::LegacyPlatform => 1,
            Self::HighComplexity | Self::CustomCodeReview => 2,
            Self::CustomCodePresent | Self::HeavyConnectors | Self::LowTestCoverage => 3,
            Self::UnparsableSources | Self::OversizedFiles | Self::ComplexFlows => 4,
            Self::InsufficientSignal => 5,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LegacyPlatform => "Legacy platform",
            Self::HighComplexity => "High complexity",
            Self::CustomCodeReview => "Custom code review",
            Self::CustomCodePresent => "Custom code present",
            Self::HeavyConnectors => "Heavy connectors",
            Self::LowTestCoverage => "Low test coverage",
            Self::UnparsableSources => "Unparsable sources",
            Self::OversizedFiles => "Oversized files",
            Self::ComplexFlows => "Complex flows",
            Self::InsufficientSignal => "Insufficient signal",
        }
    }
}

/// A portfolio-level action item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    /// Priority (1 = highest, 5 = lowest)
    pub priority: u8,
    pub rule: RecommendationRule,
    pub message: String,
    /// Projects, findings or operations the rule fired on
    pub affected_count: usize,
}

impl Recommendation {
    fn new(rule: RecommendationRule, affected_count: usize, message: String) -> Self {
        Self {
            priority: rule.priority(),
            rule,
            message,
            affected_count,
        }
    }
}

/// Evaluate every rule against an accumulated portfolio.
///
/// The result is ordered by priority, then by rule.
#[must_use]
pub fn recommend(acc: &PortfolioAccumulator, thresholds: &PortfolioAggregator) -> Vec<Recommendation> {
    let mut recommendations: Vec<Recommendation> = RecommendationRule::ALL
        .iter()
        .filter_map(|rule| evaluate(*rule, acc, thresholds))
        .collect();
    recommendations.sort_by_key(|r| (r.priority, r.rule));
    recommendations
}

fn evaluate(
    rule: RecommendationRule,
    acc: &PortfolioAccumulator,
    thresholds: &PortfolioAggregator,
) -> Option<Recommendation> {
    let totals = &acc.totals;
    let (count, message) = match rule {
        RecommendationRule::LegacyPlatform => {
            let n = acc.generations.mule3;
            (n, format!("{n} project(s) run on Mule 3.x; plan a runtime upgrade before migrating"))
        }
        RecommendationRule::HighComplexity => {
            let n = acc.tiers.elevated();
            (n, format!("{n} project(s) scored high or critical; schedule detailed design reviews"))
        }
        RecommendationRule::CustomCodeReview => {
            let ratio = acc.custom_code_ratio();
            if ratio <= thresholds.custom_code_ratio_threshold {
                return None;
            }
            let n = totals.projects_with_custom_code;
            (
                n,
                format!(
                    "{:.0}% of projects embed custom code; review it as a dedicated workstream",
                    ratio * 100.0
                ),
            )
        }
        RecommendationRule::CustomCodePresent => {
            let n = totals.custom_code_findings;
            (
                n,
                format!(
                    "{n} custom code block(s) totalling {} lines need manual rewrite",
                    totals.custom_code_lines
                ),
            )
        }
        RecommendationRule::HeavyConnectors => {
            let n: usize = acc.heavy_connectors.values().sum();
            let names: Vec<&str> = acc.heavy_connectors.keys().map(String::as_str).collect();
            (
                n,
                format!(
                    "{n} operation(s) use heavyweight connectors ({}); verify target platform support",
                    names.join(", ")
                ),
            )
        }
        RecommendationRule::LowTestCoverage => {
            if acc.projects_with_flows == 0
                || acc.average_test_coverage() >= thresholds.low_coverage_threshold
            {
                return None;
            }
            let n = acc.testing_risk_projects;
            (
                n,
                format!(
                    "Average MUnit flow coverage is {:.0}%; add tests before migrating",
                    acc.average_test_coverage() * 100.0
                ),
            )
        }
        RecommendationRule::UnparsableSources => {
            let n = totals.absorbed_errors;
            (n, format!("{n} file(s) could not be read or parsed; inspect them manually"))
        }
        RecommendationRule::OversizedFiles => {
            let n = totals.oversized_files;
            (n, format!("{n} oversized file(s) should be split during migration"))
        }
        RecommendationRule::ComplexFlows => {
            let n = totals.complex_flows;
            (
                n,
                format!("{n} flow(s) exceed the complex-flow threshold; break them up before migrating"),
            )
        }
        RecommendationRule::InsufficientSignal => {
            let n = acc.tiers.insufficient_signal;
            (
                n,
                format!("{n} project(s) contain no flows or connectors; confirm they are in scope"),
            )
        }
    };

    (count > 0).then(|| Recommendation::new(rule, count, message))
}
