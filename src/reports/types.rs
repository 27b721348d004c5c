//! Report type definitions.

use crate::model::{Project, REPORT_SCHEMA_VERSION};
use crate::portfolio::PortfolioAggregate;
use chrono::Utc;
use clap::ValueEnum;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ReportFormat {
    /// Combined JSON document
    Json,
    /// High-level text summary
    Summary,
    /// Per-project text breakdown
    Comprehensive,
}

impl ReportFormat {
    /// Every format written by a run, in write order
    pub const ALL: [Self; 3] = [Self::Json, Self::Summary, Self::Comprehensive];

    /// File name of the artifact in the output directory
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Json => "assessment.json",
            Self::Summary => "summary.txt",
            Self::Comprehensive => "comprehensive.txt",
        }
    }
}

impl std::fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json => write!(f, "json"),
            Self::Summary => write!(f, "summary"),
            Self::Comprehensive => write!(f, "comprehensive"),
        }
    }
}

/// Tool identification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolInfo {
    pub name: String,
    pub version: String,
}

impl Default for ToolInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Metadata included in every report document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportMetadata {
    /// Layout version of the serialized records
    pub schema_version: String,
    pub tool: ToolInfo,
    /// RFC 3339 generation timestamp
    pub generated_at: String,
    /// Scan root as given on the command line
    pub root: String,
    pub project_count: usize,
    /// Project filter applied to the run, empty when none
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_filter: Vec<String>,
}

impl ReportMetadata {
    /// Metadata stamped with the current time
    #[must_use]
    pub fn new(root: impl Into<String>, project_count: usize) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION.to_string(),
            tool: ToolInfo::default(),
            generated_at: Utc::now().to_rfc3339(),
            root: root.into(),
            project_count,
            project_filter: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: Vec<String>) -> Self {
        self.project_filter = filter;
        self
    }
}

/// The canonical result of one run.
///
/// Every rendered artifact is a view of this value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AssessmentReport {
    pub metadata: ReportMetadata,
    /// Projects in discovery order
    pub projects: Vec<Project>,
    pub aggregate: PortfolioAggregate,
}

/// Per-project JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ProjectDocument {
    pub metadata: ReportMetadata,
    pub project: Project,
}
