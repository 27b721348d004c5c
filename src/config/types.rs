//! Configuration types for mule-assess.
//!
//! One [`AssessConfig`] drives a whole run: where to scan, how to weigh what
//! is found, and where to write the reports.

use super::defaults::{
    DEFAULT_COMPLEX_FLOW_COMPONENTS, DEFAULT_CONNECTOR_WEIGHT, DEFAULT_CUSTOM_CODE_RATIO,
    DEFAULT_HEAVY_CONNECTOR_WEIGHT, DEFAULT_LARGE_FILE_LINES, DEFAULT_LOW_COVERAGE,
    DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR, DEFAULT_TOP_N,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

// ============================================================================
// Top-level configuration
// ============================================================================

/// Configuration for one assessment run.
///
/// Can be constructed from CLI arguments, a YAML config file, or both (with
/// CLI overriding file settings).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AssessConfig {
    /// Where and how to look for projects
    pub scan: ScanConfig,
    /// Category weights, saturation scales and tier cut-offs
    pub scoring: ScoringConfig,
    /// Transformation tier thresholds
    pub transform: TransformThresholds,
    /// Portfolio rankings and recommendation thresholds
    pub portfolio: PortfolioConfig,
    /// Report destination
    pub output: OutputConfig,
}

impl AssessConfig {
    /// Create an `AssessConfig` with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an `AssessConfig` builder.
    pub fn builder() -> AssessConfigBuilder {
        AssessConfigBuilder::default()
    }
}

// ============================================================================
// Builder for AssessConfig
// ============================================================================

/// Builder for constructing `AssessConfig` with fluent API.
#[derive(Debug, Default)]
#[must_use]
pub struct AssessConfigBuilder {
    config: AssessConfig,
}

impl AssessConfigBuilder {
    /// Set the scan root.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.config.scan.root = root.into();
        self
    }

    /// Restrict the run to the named projects.
    pub fn projects(mut self, projects: Vec<String>) -> Self {
        self.config.scan.projects = projects;
        self
    }

    /// Set the worker count.
    pub const fn jobs(mut self, jobs: Option<usize>) -> Self {
        self.config.scan.jobs = jobs;
        self
    }

    /// Set the report directory.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output.dir = dir.into();
        self
    }

    /// Also write one JSON document per project.
    pub const fn individual_files(mut self, enabled: bool) -> Self {
        self.config.output.individual_files = enabled;
        self
    }

    /// Set the oversized-file threshold.
    pub const fn large_file_lines(mut self, lines: usize) -> Self {
        self.config.scan.large_file_lines = lines;
        self
    }

    /// Set the complex-flow threshold.
    pub const fn complex_flow_components(mut self, components: usize) -> Self {
        self.config.scan.complex_flow_components = components;
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> AssessConfig {
        self.config
    }
}

// ============================================================================
// Scan configuration
// ============================================================================

/// Where and how projects are located and scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScanConfig {
    /// Directory containing the project tree
    pub root: PathBuf,
    /// Project names or display paths to restrict the run to (empty = all)
    pub projects: Vec<String>,
    /// Maximum directory depth below the root searched for projects
    pub max_depth: usize,
    /// Files with more lines than this are flagged as oversized
    pub large_file_lines: usize,
    /// Flows with more components than this are listed as complex
    pub complex_flow_components: usize,
    /// Worker threads (default: available parallelism)
    pub jobs: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            projects: Vec::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            large_file_lines: DEFAULT_LARGE_FILE_LINES,
            complex_flow_components: DEFAULT_COMPLEX_FLOW_COMPONENTS,
            jobs: None,
        }
    }
}

// ============================================================================
// Scoring configuration
// ============================================================================

/// How raw facts turn into scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ScoringConfig {
    /// Category weights for the overall score; must sum to 1.0
    pub weights: CategoryWeights,
    /// Raw value at which each category reaches ~63% of its maximum
    pub scales: CategoryScales,
    /// Overall-score cut-offs between risk tiers
    pub tiers: TierCutoffs,
    /// Coverage ratio below which a project is flagged as a testing risk
    pub low_coverage_threshold: f64,
    /// Per-connector weight overrides, merged over the built-in table
    pub connector_weights: BTreeMap<String, u32>,
    /// Weight for connector types absent from every table
    pub default_connector_weight: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: CategoryWeights::default(),
            scales: CategoryScales::default(),
            tiers: TierCutoffs::default(),
            low_coverage_threshold: DEFAULT_LOW_COVERAGE,
            connector_weights: BTreeMap::new(),
            default_connector_weight: DEFAULT_CONNECTOR_WEIGHT,
        }
    }
}

/// Category weights for the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CategoryWeights {
    pub connectors: f64,
    pub custom_code: f64,
    pub transformation: f64,
    pub structure: f64,
}

impl CategoryWeights {
    #[must_use]
    pub fn total(&self) -> f64 {
        self.connectors + self.custom_code + self.transformation + self.structure
    }
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            connectors: 0.30,
            custom_code: 0.25,
            transformation: 0.25,
            structure: 0.20,
        }
    }
}

/// Saturation scale per category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CategoryScales {
    pub connectors: f64,
    pub custom_code: f64,
    pub transformation: f64,
    pub structure: f64,
}

impl Default for CategoryScales {
    fn default() -> Self {
        Self {
            connectors: 50.0,
            custom_code: 40.0,
            transformation: 30.0,
            structure: 150.0,
        }
    }
}

/// Lower bounds of the medium, high and critical tiers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TierCutoffs {
    pub medium: f64,
    pub high: f64,
    pub critical: f64,
}

impl Default for TierCutoffs {
    fn default() -> Self {
        Self {
            medium: 25.0,
            high: 50.0,
            critical: 75.0,
        }
    }
}

// ============================================================================
// Transformation thresholds
// ============================================================================

/// Tier thresholds for transformation scripts.
///
/// A script is low when it stays under every `low_*` bound, high when it
/// reaches any `high_*` bound, and medium otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct TransformThresholds {
    pub low_max_lines: usize,
    pub low_max_operators: usize,
    pub high_min_lines: usize,
    pub high_min_operators: usize,
    pub high_min_depth: usize,
}

impl Default for TransformThresholds {
    fn default() -> Self {
        Self {
            low_max_lines: 20,
            low_max_operators: 10,
            high_min_lines: 100,
            high_min_operators: 40,
            high_min_depth: 8,
        }
    }
}

// ============================================================================
// Portfolio configuration
// ============================================================================

/// Portfolio rankings and recommendation thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct PortfolioConfig {
    /// Length of each top-N ranking
    pub top_n: usize,
    /// Share of projects with custom code above which a review is advised
    pub custom_code_ratio_threshold: f64,
    /// Connectors at or above this weight count as heavy
    pub heavy_connector_weight: u32,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            top_n: DEFAULT_TOP_N,
            custom_code_ratio_threshold: DEFAULT_CUSTOM_CODE_RATIO,
            heavy_connector_weight: DEFAULT_HEAVY_CONNECTOR_WEIGHT,
        }
    }
}

// ============================================================================
// Output configuration
// ============================================================================

/// Report destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving all report artifacts
    pub dir: PathBuf,
    /// Write `projects/<display-path>.json` for every project
    pub individual_files: bool,
    /// Indent JSON documents
    pub pretty_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            individual_files: false,
            pretty_json: true,
        }
    }
}
