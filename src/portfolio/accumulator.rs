//! Order-independent portfolio accumulation.

use crate::model::{
    round2, OversizedFile, PlatformGeneration, Project, RiskTier, SourceKind, TransformTierCounts,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Projects per platform generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerationCounts {
    pub mule4: usize,
    pub mule3: usize,
    pub unknown: usize,
}

impl GenerationCounts {
    fn add(&mut self, generation: PlatformGeneration) {
        match generation {
            PlatformGeneration::Mule4 => self.mule4 += 1,
            PlatformGeneration::Mule3 => self.mule3 += 1,
            PlatformGeneration::Unknown => self.unknown += 1,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.mule4 += other.mule4;
        self.mule3 += other.mule3;
        self.unknown += other.unknown;
    }

    /// Counts paired with their generation, in display order
    #[must_use]
    pub const fn entries(&self) -> [(PlatformGeneration, usize); 3] {
        [
            (PlatformGeneration::Mule4, self.mule4),
            (PlatformGeneration::Mule3, self.mule3),
            (PlatformGeneration::Unknown, self.unknown),
        ]
    }
}

/// Projects per risk tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TierCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
    pub insufficient_signal: usize,
}

impl TierCounts {
    fn add(&mut self, tier: RiskTier) {
        match tier {
            RiskTier::Critical => self.critical += 1,
            RiskTier::High => self.high += 1,
            RiskTier::Medium => self.medium += 1,
            RiskTier::Low => self.low += 1,
            RiskTier::InsufficientSignal => self.insufficient_signal += 1,
        }
    }

    fn merge(&mut self, other: &Self) {
        self.critical += other.critical;
        self.high += other.high;
        self.medium += other.medium;
        self.low += other.low;
        self.insufficient_signal += other.insufficient_signal;
    }

    /// Projects in the high or critical tier
    #[must_use]
    pub const fn elevated(&self) -> usize {
        self.high + self.critical
    }

    /// Counts paired with their tier, most severe first
    #[must_use]
    pub const fn entries(&self) -> [(RiskTier, usize); 5] {
        [
            (RiskTier::Critical, self.critical),
            (RiskTier::High, self.high),
            (RiskTier::Medium, self.medium),
            (RiskTier::Low, self.low),
            (RiskTier::InsufficientSignal, self.insufficient_signal),
        ]
    }
}

/// Portfolio-wide sums
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PortfolioTotals {
    pub projects: usize,
    pub flows: usize,
    pub sub_flows: usize,
    pub flows_without_error_handling: usize,
    pub components: usize,
    pub connector_operations: usize,
    pub config_files: usize,
    pub config_lines: usize,
    pub custom_code_findings: usize,
    pub custom_code_lines: usize,
    pub projects_with_custom_code: usize,
    pub transforms: TransformTierCounts,
    pub munit_tests: usize,
    pub oversized_files: usize,
    /// Flows above the complex-flow threshold
    pub complex_flows: usize,
    pub domain_projects: usize,
    pub shared_config_files: usize,
    pub absorbed_errors: usize,
}

impl PortfolioTotals {
    fn add(&mut self, project: &Project) {
        self.projects += 1;
        self.flows += project.flow_count();
        self.sub_flows += project.sub_flow_count();
        self.flows_without_error_handling += project.flows_without_error_handling();
        self.components += project.total_components;
        self.connector_operations += project.connector_operations();
        self.config_files += project.config_files.len();
        self.config_lines += project.config_lines();
        self.custom_code_findings += project.custom_code.len();
        self.custom_code_lines += project.custom_code_lines();
        self.projects_with_custom_code += usize::from(project.has_custom_code());
        self.transforms.merge(&project.transform_tiers());
        self.munit_tests += project.testing.munit_tests;
        self.oversized_files += project.oversized_files.len();
        self.complex_flows += project.complex_flows.len();
        self.domain_projects += usize::from(project.shared_resources.domain_project);
        self.shared_config_files += project.shared_resources.config_files.len();
        self.absorbed_errors += project.absorbed_errors().count();
    }

    fn merge(&mut self, other: &Self) {
        self.projects += other.projects;
        self.flows += other.flows;
        self.sub_flows += other.sub_flows;
        self.flows_without_error_handling += other.flows_without_error_handling;
        self.components += other.components;
        self.connector_operations += other.connector_operations;
        self.config_files += other.config_files;
        self.config_lines += other.config_lines;
        self.custom_code_findings += other.custom_code_findings;
        self.custom_code_lines += other.custom_code_lines;
        self.projects_with_custom_code += other.projects_with_custom_code;
        self.transforms.merge(&other.transforms);
        self.munit_tests += other.munit_tests;
        self.oversized_files += other.oversized_files;
        self.complex_flows += other.complex_flows;
        self.domain_projects += other.domain_projects;
        self.shared_config_files += other.shared_config_files;
        self.absorbed_errors += other.absorbed_errors;
    }
}

/// A name with its occurrence count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RankedCount {
    pub name: String,
    pub count: usize,
}

/// An oversized file ranked across the portfolio
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RankedFile {
    pub project: String,
    pub path: String,
    pub kind: SourceKind,
    pub lines: usize,
}

impl RankedFile {
    fn new(project: &Project, file: &OversizedFile) -> Self {
        Self {
            project: project.display_path.clone(),
            path: file.path.clone(),
            kind: file.kind,
            lines: file.lines,
        }
    }

    /// Lines descending, then project and path ascending
    fn rank(a: &Self, b: &Self) -> Ordering {
        b.lines
            .cmp(&a.lines)
            .then_with(|| a.project.cmp(&b.project))
            .then_with(|| a.path.cmp(&b.path))
    }
}

/// Top `n` entries of a histogram by count descending, then name ascending
#[must_use]
pub fn top_counts(histogram: &BTreeMap<String, usize>, n: usize) -> Vec<RankedCount> {
    let mut ranked: Vec<RankedCount> = histogram
        .iter()
        .map(|(name, count)| RankedCount {
            name: name.clone(),
            count: *count,
        })
        .collect();
    ranked.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.name.cmp(&b.name)));
    ranked.truncate(n);
    ranked
}

/// Running portfolio state.
///
/// `add` folds one project in and `merge` combines two partial states.
/// `merge` is commutative and associative: every field is an integer sum,
/// a sorted map or a totally ordered bounded list, so any fold order over
/// the same projects yields the same value. Scores are carried as integer
/// hundredths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioAccumulator {
    top_n: usize,
    heavy_weight: u32,
    pub(crate) versions: BTreeMap<String, usize>,
    pub(crate) generations: GenerationCounts,
    pub(crate) tiers: TierCounts,
    pub(crate) totals: PortfolioTotals,
    pub(crate) score_hundredths: u64,
    pub(crate) coverage_hundredths: u64,
    pub(crate) projects_with_flows: usize,
    pub(crate) testing_risk_projects: usize,
    pub(crate) connectors: BTreeMap<String, usize>,
    pub(crate) heavy_connectors: BTreeMap<String, usize>,
    pub(crate) component_types: BTreeMap<String, usize>,
    pub(crate) largest_files: Vec<RankedFile>,
}

impl PortfolioAccumulator {
    /// Empty state keeping `top_n` oversized files and treating connectors
    /// weighted at least `heavy_weight` as heavy
    #[must_use]
    pub fn new(top_n: usize, heavy_weight: u32) -> Self {
        Self {
            top_n,
            heavy_weight,
            versions: BTreeMap::new(),
            generations: GenerationCounts::default(),
            tiers: TierCounts::default(),
            totals: PortfolioTotals::default(),
            score_hundredths: 0,
            coverage_hundredths: 0,
            projects_with_flows: 0,
            testing_risk_projects: 0,
            connectors: BTreeMap::new(),
            heavy_connectors: BTreeMap::new(),
            component_types: BTreeMap::new(),
            largest_files: Vec::new(),
        }
    }

    /// Fold one scored project into the state
    #[must_use]
    pub fn add(mut self, project: &Project) -> Self {
        *self.versions.entry(project.platform_version.clone()).or_insert(0) += 1;
        self.generations.add(project.platform);
        self.tiers.add(project.score.tier);
        self.totals.add(project);
        self.score_hundredths += to_hundredths(project.score.overall);

        if !project.flows.is_empty() {
            self.projects_with_flows += 1;
            self.coverage_hundredths += to_hundredths(project.score.test_coverage);
        }
        self.testing_risk_projects += usize::from(project.score.testing_risk);

        for usage in &project.score.connector_usage {
            *self.connectors.entry(usage.connector.clone()).or_insert(0) += usage.count;
            if usage.weight >= self.heavy_weight {
                *self.heavy_connectors.entry(usage.connector.clone()).or_insert(0) += usage.count;
            }
        }
        for (tag, count) in &project.tag_usage {
            *self.component_types.entry(tag.clone()).or_insert(0) += count;
        }

        self.largest_files
            .extend(project.oversized_files.iter().map(|f| RankedFile::new(project, f)));
        self.trim_files();
        self
    }

    /// Combine two partial states
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        merge_counts(&mut self.versions, other.versions);
        self.generations.merge(&other.generations);
        self.tiers.merge(&other.tiers);
        self.totals.merge(&other.totals);
        self.score_hundredths += other.score_hundredths;
        self.coverage_hundredths += other.coverage_hundredths;
        self.projects_with_flows += other.projects_with_flows;
        self.testing_risk_projects += other.testing_risk_projects;
        merge_counts(&mut self.connectors, other.connectors);
        merge_counts(&mut self.heavy_connectors, other.heavy_connectors);
        merge_counts(&mut self.component_types, other.component_types);
        self.largest_files.extend(other.largest_files);
        self.trim_files();
        self
    }

    fn trim_files(&mut self) {
        self.largest_files.sort_by(RankedFile::rank);
        self.largest_files.truncate(self.top_n);
    }

    #[must_use]
    pub const fn project_count(&self) -> usize {
        self.totals.projects
    }

    /// Mean overall score
    #[must_use]
    pub fn average_score(&self) -> f64 {
        mean_of_hundredths(self.score_hundredths, self.totals.projects)
    }

    /// Mean coverage over projects that define flows
    #[must_use]
    pub fn average_test_coverage(&self) -> f64 {
        mean_of_hundredths(self.coverage_hundredths, self.projects_with_flows)
    }

    /// Share of projects with at least one custom-code finding
    #[must_use]
    pub fn custom_code_ratio(&self) -> f64 {
        if self.totals.projects == 0 {
            return 0.0;
        }
        round2(self.totals.projects_with_custom_code as f64 / self.totals.projects as f64)
    }

    #[must_use]
    pub fn top_connectors(&self) -> Vec<RankedCount> {
        top_counts(&self.connectors, self.top_n)
    }

    #[must_use]
    pub fn top_component_types(&self) -> Vec<RankedCount> {
        top_counts(&self.component_types, self.top_n)
    }

    #[must_use]
    pub fn largest_files(&self) -> &[RankedFile] {
        &self.largest_files
    }
}

fn merge_counts(into: &mut BTreeMap<String, usize>, from: BTreeMap<String, usize>) {
    for (key, count) in from {
        *into.entry(key).or_insert(0) += count;
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_hundredths(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        (value * 100.0).round() as u64
    } else {
        0
    }
}

fn mean_of_hundredths(sum: u64, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    round2(sum as f64 / 100.0 / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_counts_tie_break() {
        let histogram: BTreeMap<String, usize> = [
            ("vm".to_string(), 2),
            ("db".to_string(), 5),
            ("http".to_string(), 2),
            ("jms".to_string(), 1),
        ]
        .into();
        let top = top_counts(&histogram, 3);
        let names: Vec<_> = top.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["db", "http", "vm"]);
    }

    #[test]
    fn test_hundredths() {
        assert_eq!(to_hundredths(12.34), 1234);
        assert_eq!(to_hundredths(-1.0), 0);
        assert_eq!(to_hundredths(f64::NAN), 0);
        assert!((mean_of_hundredths(3001, 3) - 10.0).abs() < f64::EPSILON);
        assert!(mean_of_hundredths(0, 0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_merge_is_identity() {
        let a = PortfolioAccumulator::new(5, 4);
        let b = PortfolioAccumulator::new(5, 4);
        assert_eq!(a.clone().merge(b), a);
    }
}
