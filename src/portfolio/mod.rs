//! Portfolio aggregation.
//!
//! Reduces scored project records into portfolio-wide histograms, totals,
//! rankings and recommendations. The reduction runs as a parallel
//! fold/reduce over [`PortfolioAccumulator`] values, so the result does not
//! depend on the order projects are visited.

mod accumulator;
mod recommendations;

pub use accumulator::{
    top_counts, GenerationCounts, PortfolioAccumulator, PortfolioTotals, RankedCount, RankedFile,
    TierCounts,
};
pub use recommendations::{recommend, Recommendation, RecommendationRule};

use crate::config::AssessConfig;
use crate::model::Project;
use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Portfolio-wide view of one run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, JsonSchema)]
pub struct PortfolioAggregate {
    pub project_count: usize,
    /// Projects per detected platform version string
    pub version_histogram: BTreeMap<String, usize>,
    pub generation_histogram: GenerationCounts,
    pub tier_histogram: TierCounts,
    pub totals: PortfolioTotals,
    pub average_score: f64,
    /// Mean coverage over projects that define flows
    pub average_test_coverage: f64,
    /// Share of projects with custom code
    pub custom_code_ratio: f64,
    pub testing_risk_projects: usize,
    pub top_connectors: Vec<RankedCount>,
    pub top_component_types: Vec<RankedCount>,
    pub largest_files: Vec<RankedFile>,
    /// Connector types at or above the heavy weight, with their operations
    pub heavy_connectors: BTreeMap<String, usize>,
    pub recommendations: Vec<Recommendation>,
}

/// Thresholds the aggregator applies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PortfolioAggregator {
    pub top_n: usize,
    pub heavy_connector_weight: u32,
    pub custom_code_ratio_threshold: f64,
    pub low_coverage_threshold: f64,
}

impl PortfolioAggregator {
    #[must_use]
    pub const fn from_config(config: &AssessConfig) -> Self {
        Self {
            top_n: config.portfolio.top_n,
            heavy_connector_weight: config.portfolio.heavy_connector_weight,
            custom_code_ratio_threshold: config.portfolio.custom_code_ratio_threshold,
            low_coverage_threshold: config.scoring.low_coverage_threshold,
        }
    }

    /// Empty accumulator for this aggregator's thresholds
    #[must_use]
    pub fn accumulator(&self) -> PortfolioAccumulator {
        PortfolioAccumulator::new(self.top_n, self.heavy_connector_weight)
    }

    /// Reduce projects into a single accumulator in parallel
    #[must_use]
    pub fn accumulate(&self, projects: &[Project]) -> PortfolioAccumulator {
        projects
            .par_iter()
            .fold(|| self.accumulator(), PortfolioAccumulator::add)
            .reduce(|| self.accumulator(), PortfolioAccumulator::merge)
    }

    /// Build the final aggregate from an accumulator
    #[must_use]
    pub fn finish(&self, acc: &PortfolioAccumulator) -> PortfolioAggregate {
        let recommendations = recommend(acc, self);
        PortfolioAggregate {
            project_count: acc.project_count(),
            version_histogram: acc.versions.clone(),
            generation_histogram: acc.generations,
            tier_histogram: acc.tiers,
            totals: acc.totals,
            average_score: acc.average_score(),
            average_test_coverage: acc.average_test_coverage(),
            custom_code_ratio: acc.custom_code_ratio(),
            testing_risk_projects: acc.testing_risk_projects,
            top_connectors: acc.top_connectors(),
            top_component_types: acc.top_component_types(),
            largest_files: acc.largest_files().to_vec(),
            heavy_connectors: acc.heavy_connectors.clone(),
            recommendations,
        }
    }

    /// Aggregate a set of scored projects
    #[must_use]
    pub fn aggregate(&self, projects: &[Project]) -> PortfolioAggregate {
        let acc = self.accumulate(projects);
        tracing::info!(
            "Aggregated {} projects (average score {:.2})",
            acc.project_count(),
            acc.average_score()
        );
        self.finish(&acc)
    }
}

impl Default for PortfolioAggregator {
    fn default() -> Self {
        Self::from_config(&AssessConfig::default())
    }
}
