//! Complexity scoring.
//!
//! Turns the raw facts of one [`Project`] into bounded category scores, a
//! weighted overall score and a risk tier. Each category uses the saturating
//! curve `100 * (1 - e^(-raw / scale))`, so a score never decreases as its
//! raw input grows and never leaves [0, 100].
//!
//! | Category       | Raw value                                            |
//! |----------------|------------------------------------------------------|
//! | connectors     | sum of weight x operations per connector type        |
//! | custom code    | sum of (5 + 0.05 x lines) per finding                |
//! | transformation | 1 x low + 3 x medium + 8 x high                      |
//! | structure      | 2 x flows + sub-flows + 0.1 x components + 10 x oversized |

mod weights;

pub use weights::{ConnectorWeights, CONNECTOR_WEIGHTS};

use crate::config::ScoringConfig;
use crate::model::{round2, CategoryScores, ComplexityScore, Project, RiskTier};

/// Fixed raw cost of every custom-code finding
pub const CUSTOM_CODE_BASE: f64 = 5.0;
/// Raw cost per custom-code line
pub const CUSTOM_CODE_PER_LINE: f64 = 0.05;

/// Raw cost per transformation tier (low, medium, high)
pub const TRANSFORM_TIER_COSTS: [f64; 3] = [1.0, 3.0, 8.0];

/// Raw structural cost per flow
pub const STRUCTURE_PER_FLOW: f64 = 2.0;
/// Raw structural cost per sub-flow
pub const STRUCTURE_PER_SUB_FLOW: f64 = 1.0;
/// Raw structural cost per component
pub const STRUCTURE_PER_COMPONENT: f64 = 0.1;
/// Raw structural cost per oversized file
pub const STRUCTURE_PER_OVERSIZED: f64 = 10.0;

/// Map a raw value onto [0, 100] with a saturating curve.
///
/// Negative or non-finite inputs score 0.
#[must_use]
pub fn saturate(raw: f64, scale: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 || scale <= 0.0 {
        return 0.0;
    }
    round2((100.0 * (1.0 - (-raw / scale).exp())).clamp(0.0, 100.0))
}

/// Scores projects against one scoring configuration
#[derive(Debug, Clone)]
pub struct ComplexityScorer {
    config: ScoringConfig,
    weights: ConnectorWeights,
}

impl ComplexityScorer {
    #[must_use]
    pub fn new(config: ScoringConfig) -> Self {
        let weights = ConnectorWeights::from_config(&config);
        Self { config, weights }
    }

    #[must_use]
    pub const fn weights(&self) -> &ConnectorWeights {
        &self.weights
    }

    /// Raw connector value
    #[must_use]
    pub fn connector_raw(&self, project: &Project) -> f64 {
        self.weights
            .usages(&project.connectors)
            .iter()
            .map(|u| u.weighted() as f64)
            .sum()
    }

    /// Raw custom-code value
    #[must_use]
    pub fn custom_code_raw(project: &Project) -> f64 {
        project
            .custom_code
            .iter()
            .map(|c| CUSTOM_CODE_BASE + CUSTOM_CODE_PER_LINE * c.lines as f64)
            .sum()
    }

    /// Raw transformation value
    #[must_use]
    pub fn transformation_raw(project: &Project) -> f64 {
        let tiers = project.transform_tiers();
        let [low, medium, high] = TRANSFORM_TIER_COSTS;
        low * tiers.low as f64 + medium * tiers.medium as f64 + high * tiers.high as f64
    }

    /// Raw structural value
    #[must_use]
    pub fn structure_raw(project: &Project) -> f64 {
        STRUCTURE_PER_FLOW * project.flow_count() as f64
            + STRUCTURE_PER_SUB_FLOW * project.sub_flow_count() as f64
            + STRUCTURE_PER_COMPONENT * project.total_components as f64
            + STRUCTURE_PER_OVERSIZED * project.oversized_files.len() as f64
    }

    /// Compute the score of a fully scanned project.
    ///
    /// A project with neither flows nor connector operations scores 0 with
    /// tier [`RiskTier::InsufficientSignal`]; its category scores are still
    /// reported. Test coverage never affects the overall score.
    #[must_use]
    pub fn score(&self, project: &Project) -> ComplexityScore {
        let scales = &self.config.scales;
        let categories = CategoryScores {
            connectors: saturate(self.connector_raw(project), scales.connectors),
            custom_code: saturate(Self::custom_code_raw(project), scales.custom_code),
            transformation: saturate(Self::transformation_raw(project), scales.transformation),
            structure: saturate(Self::structure_raw(project), scales.structure),
        };

        let insufficient = project.flows.is_empty() && project.connector_operations() == 0;
        let (overall, tier) = if insufficient {
            (0.0, RiskTier::InsufficientSignal)
        } else {
            let overall = self.overall(&categories);
            (overall, RiskTier::from_score(overall, &self.config.tiers))
        };

        let test_coverage = if project.flows.is_empty() {
            0.0
        } else {
            round2(project.testing.tested_flows.len() as f64 / project.flows.len() as f64)
        };
        let testing_risk =
            !project.flows.is_empty() && test_coverage < self.config.low_coverage_threshold;

        ComplexityScore {
            categories,
            overall,
            tier,
            test_coverage,
            testing_risk,
            connector_usage: self.weights.usages(&project.connectors),
        }
    }

    /// Score `project` and store the result on it
    pub fn finalize(&self, project: &mut Project) {
        project.score = self.score(project);
        tracing::debug!(
            "{}: overall {:.2} ({})",
            project.display_path,
            project.score.overall,
            project.score.tier
        );
    }

    fn overall(&self, categories: &CategoryScores) -> f64 {
        let w = &self.config.weights;
        let weighted = w.connectors * categories.connectors
            + w.custom_code * categories.custom_code
            + w.transformation * categories.transformation
            + w.structure * categories.structure;
        round2(weighted.clamp(0.0, 100.0))
    }
}

impl Default for ComplexityScorer {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        CustomCodeFinding, CustomCodeKind, Flow, FlowKind, ProjectDescriptor, SourceLocation,
        TransformOrigin, TransformScript, TransformTier,
    };
    use std::path::PathBuf;

    fn empty_project() -> Project {
        Project::new(&ProjectDescriptor {
            root: PathBuf::from("/tmp/p"),
            name: "p".to_string(),
            display_path: "p".to_string(),
            source: "local".to_string(),
        })
    }

    fn flow(name: &str) -> Flow {
        Flow {
            name: name.to_string(),
            kind: FlowKind::Flow,
            file: "src/main/mule/app.xml".to_string(),
            component_count: 2,
            flow_refs: Vec::new(),
            has_error_handler: true,
        }
    }

    fn custom(lines: usize) -> CustomCodeFinding {
        CustomCodeFinding {
            kind: CustomCodeKind::EmbeddedScript,
            language: "groovy".to_string(),
            location: SourceLocation::file("src/main/mule/app.xml"),
            lines,
        }
    }

    #[test]
    fn test_saturate_bounds() {
        assert!(saturate(0.0, 50.0).abs() < f64::EPSILON);
        assert!(saturate(-3.0, 50.0).abs() < f64::EPSILON);
        assert!(saturate(f64::NAN, 50.0).abs() < f64::EPSILON);
        assert!((saturate(50.0, 50.0) - 63.21).abs() < 1e-9);
        assert!(saturate(1e9, 50.0) <= 100.0);
    }

    #[test]
    fn test_insufficient_signal() {
        let mut project = empty_project();
        project.custom_code.push(custom(40));
        let score = ComplexityScorer::default().score(&project);
        assert!(score.overall.abs() < f64::EPSILON);
        assert_eq!(score.tier, RiskTier::InsufficientSignal);
        assert!(score.categories.custom_code > 0.0);
        assert!(!score.testing_risk);
    }

    #[test]
    fn test_connector_only_project_is_scored() {
        let mut project = empty_project();
        project.connectors.insert("sap".to_string(), 4);
        let score = ComplexityScorer::default().score(&project);
        assert_ne!(score.tier, RiskTier::InsufficientSignal);
        assert!((score.categories.connectors - saturate(20.0, 50.0)).abs() < 1e-9);
        assert_eq!(score.connector_usage[0].weight, 5);
    }

    #[test]
    fn test_category_raws() {
        let mut project = empty_project();
        project.flows = vec![flow("a"), flow("b")];
        project.flows.push(Flow {
            kind: FlowKind::SubFlow,
            ..flow("c")
        });
        project.total_components = 30;
        project.connectors.insert("http".to_string(), 2);
        project.connectors.insert("db".to_string(), 3);
        project.custom_code.push(custom(20));
        for tier in [TransformTier::Low, TransformTier::Medium, TransformTier::High] {
            project.transforms.push(TransformScript {
                location: SourceLocation::file("x.dwl"),
                origin: TransformOrigin::External,
                lines: 10,
                operators: 1,
                nesting_depth: 1,
                tier,
            });
        }

        let scorer = ComplexityScorer::default();
        assert!((scorer.connector_raw(&project) - 8.0).abs() < 1e-9);
        assert!((ComplexityScorer::custom_code_raw(&project) - 6.0).abs() < 1e-9);
        assert!((ComplexityScorer::transformation_raw(&project) - 12.0).abs() < 1e-9);
        assert!((ComplexityScorer::structure_raw(&project) - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_overall_is_weighted_sum() {
        let mut project = empty_project();
        project.flows = vec![flow("a")];
        project.connectors.insert("salesforce".to_string(), 10);
        project.custom_code.push(custom(100));

        let score = ComplexityScorer::default().score(&project);
        let c = score.categories;
        let expected =
            0.30 * c.connectors + 0.25 * c.custom_code + 0.25 * c.transformation + 0.20 * c.structure;
        assert!((score.overall - round2(expected)).abs() < 1e-9);
        assert_eq!(
            score.tier,
            RiskTier::from_score(score.overall, &ScoringConfig::default().tiers)
        );
    }

    #[test]
    fn test_custom_code_monotonic() {
        let scorer = ComplexityScorer::default();
        let mut project = empty_project();
        project.flows = vec![flow("a")];
        let mut previous = scorer.score(&project);
        for lines in [1, 5, 30, 200] {
            project.custom_code.push(custom(lines));
            let next = scorer.score(&project);
            assert!(next.categories.custom_code >= previous.categories.custom_code);
            assert!(next.overall >= previous.overall);
            previous = next;
        }
    }

    #[test]
    fn test_coverage_flags_without_changing_score() {
        let scorer = ComplexityScorer::default();
        let mut project = empty_project();
        project.flows = vec![flow("a"), flow("b"), flow("c"), flow("d")];
        project.testing.tested_flows = vec!["a".to_string()];
        let low = scorer.score(&project);
        assert!((low.test_coverage - 0.25).abs() < f64::EPSILON);
        assert!(low.testing_risk);

        project.testing.tested_flows = vec!["a".into(), "b".into(), "c".into()];
        let high = scorer.score(&project);
        assert!((high.test_coverage - 0.75).abs() < f64::EPSILON);
        assert!(!high.testing_risk);
        assert!((low.overall - high.overall).abs() < f64::EPSILON);
        assert_eq!(low.tier, high.tier);
    }
}
