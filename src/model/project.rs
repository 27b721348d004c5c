//! Project records and the structural facts extracted from them.

use super::{ComplexityScore, CustomCodeFinding, Finding, OversizedFile, TransformScript, TransformTier};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Placeholder for a platform version that could not be determined
pub const UNKNOWN_VERSION: &str = "unknown";

/// Runtime generation a project targets
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformGeneration {
    Mule4,
    Mule3,
    #[default]
    Unknown,
}

impl PlatformGeneration {
    /// Derive the generation from a version string.
    ///
    /// Full semantic versions are parsed with `semver`; shorter forms such as
    /// `4.3` fall back to the leading numeric component.
    #[must_use]
    pub fn from_version(version: &str) -> Self {
        let version = version.trim();
        let major = semver::Version::parse(version)
            .map(|v| v.major)
            .ok()
            .or_else(|| version.split('.').next().and_then(|m| m.parse::<u64>().ok()));

        match major {
            Some(4) => Self::Mule4,
            Some(3) => Self::Mule3,
            _ => Self::Unknown,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Mule4 => "Mule 4.x",
            Self::Mule3 => "Mule 3.x",
            Self::Unknown => "Unknown",
        }
    }

    /// Mule 3 projects need a full platform migration
    #[must_use]
    pub const fn is_legacy(self) -> bool {
        matches!(self, Self::Mule3)
    }
}

impl fmt::Display for PlatformGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Metadata read from the project's build descriptors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BuildDescriptor {
    pub has_pom: bool,
    pub has_artifact_json: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub packaging: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A discovered project root, before analysis
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct ProjectDescriptor {
    /// Absolute or scan-root-joined path; unique within a run
    pub root: PathBuf,
    /// Directory name
    pub name: String,
    /// Path relative to the scan root, `/`-separated
    pub display_path: String,
    /// `local` for flat layouts, `host/org` for hierarchical ones
    pub source: String,
}

// ============================================================================
// Structural facts
// ============================================================================

/// Whether a flow is a full flow or a sub-flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum FlowKind {
    Flow,
    SubFlow,
}

/// One flow or sub-flow definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Flow {
    pub name: String,
    pub kind: FlowKind,
    /// Defining configuration file, relative to the project root
    pub file: String,
    /// Elements nested anywhere inside the flow
    pub component_count: usize,
    /// `flow-ref` targets in document order
    pub flow_refs: Vec<String>,
    pub has_error_handler: bool,
}

/// Occurrences of one connector type with its scoring weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConnectorUsage {
    pub connector: String,
    pub count: usize,
    pub weight: u32,
}

impl ConnectorUsage {
    /// Weight times count
    #[must_use]
    pub const fn weighted(&self) -> u64 {
        self.weight as u64 * self.count as u64
    }
}

/// Summary of one scanned configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConfigFileSummary {
    pub path: String,
    pub lines: usize,
    pub flows: usize,
    pub sub_flows: usize,
    pub components: usize,
    pub parsed: bool,
}

/// Test suites found in the project
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TestingFacts {
    pub munit_files: usize,
    pub munit_tests: usize,
    /// Non-MUnit test sources (`java`, `groovy`, `py`)
    pub other_test_files: usize,
    /// Names of project flows referenced by at least one test, sorted
    pub tested_flows: Vec<String>,
}

/// Transformation counts per tier
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransformTierCounts {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl TransformTierCounts {
    /// Tally the tiers of a set of scripts
    #[must_use]
    pub fn from_scripts(scripts: &[TransformScript]) -> Self {
        let mut counts = Self::default();
        for script in scripts {
            counts.add(script.tier, 1);
        }
        counts
    }

    pub fn add(&mut self, tier: TransformTier, n: usize) {
        match tier {
            TransformTier::Low => self.low += n,
            TransformTier::Medium => self.medium += n,
            TransformTier::High => self.high += n,
        }
    }

    pub fn merge(&mut self, other: &Self) {
        self.low += other.low;
        self.medium += other.medium;
        self.high += other.high;
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

/// A configuration file under `src/main/resources` that other projects or
/// environments are likely to share
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SharedConfigFile {
    /// Relative to the project root
    pub path: String,
    /// Lower-case extension: `properties`, `yaml`, `yml` or `json`
    pub format: String,
}

/// Resources the project shares with others
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SharedResources {
    /// The project is a Mule domain holding resources for sibling applications
    pub domain_project: bool,
    pub config_files: Vec<SharedConfigFile>,
}

/// A flow with more components than the complex-flow threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ComplexFlow {
    pub name: String,
    pub file: String,
    pub component_count: usize,
}

// ============================================================================
// Project record
// ============================================================================

/// Complete assessment record for one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Project {
    pub name: String,
    pub display_path: String,
    pub source: String,
    pub root: PathBuf,
    /// Version string as found in the descriptor, or `unknown`
    pub platform_version: String,
    pub platform: PlatformGeneration,
    pub build: BuildDescriptor,
    pub config_files: Vec<ConfigFileSummary>,
    pub flows: Vec<Flow>,
    /// Connector type to operation count
    pub connectors: BTreeMap<String, usize>,
    /// Namespace-qualified tag to occurrence count
    pub tag_usage: BTreeMap<String, usize>,
    /// Elements across all configuration files, roots excluded
    pub total_components: usize,
    pub async_scopes: usize,
    pub error_handlers: usize,
    /// Attribute values holding `#[...]` expressions
    pub inline_expressions: usize,
    pub custom_code: Vec<CustomCodeFinding>,
    pub transforms: Vec<TransformScript>,
    pub oversized_files: Vec<OversizedFile>,
    /// Flows above the complex-flow threshold, largest first
    pub complex_flows: Vec<ComplexFlow>,
    pub shared_resources: SharedResources,
    pub testing: TestingFacts,
    pub findings: Vec<Finding>,
    pub score: ComplexityScore,
}

impl Project {
    /// Empty record for a discovered project
    #[must_use]
    pub fn new(descriptor: &ProjectDescriptor) -> Self {
        Self {
            name: descriptor.name.clone(),
            display_path: descriptor.display_path.clone(),
            source: descriptor.source.clone(),
            root: descriptor.root.clone(),
            platform_version: UNKNOWN_VERSION.to_string(),
            platform: PlatformGeneration::Unknown,
            build: BuildDescriptor::default(),
            config_files: Vec::new(),
            flows: Vec::new(),
            connectors: BTreeMap::new(),
            tag_usage: BTreeMap::new(),
            total_components: 0,
            async_scopes: 0,
            error_handlers: 0,
            inline_expressions: 0,
            custom_code: Vec::new(),
            transforms: Vec::new(),
            oversized_files: Vec::new(),
            complex_flows: Vec::new(),
            shared_resources: SharedResources::default(),
            testing: TestingFacts::default(),
            findings: Vec::new(),
            score: ComplexityScore::default(),
        }
    }

    /// Number of full flows
    #[must_use]
    pub fn flow_count(&self) -> usize {
        self.flows.iter().filter(|f| f.kind == FlowKind::Flow).count()
    }

    /// Number of sub-flows
    #[must_use]
    pub fn sub_flow_count(&self) -> usize {
        self.flows.iter().filter(|f| f.kind == FlowKind::SubFlow).count()
    }

    /// Full flows with no error-handling construct
    #[must_use]
    pub fn flows_without_error_handling(&self) -> usize {
        self.flows
            .iter()
            .filter(|f| f.kind == FlowKind::Flow && !f.has_error_handler)
            .count()
    }

    /// Total connector operations across all types
    #[must_use]
    pub fn connector_operations(&self) -> usize {
        self.connectors.values().sum()
    }

    #[must_use]
    pub fn custom_code_lines(&self) -> usize {
        self.custom_code.iter().map(|c| c.lines).sum()
    }

    #[must_use]
    pub fn has_custom_code(&self) -> bool {
        !self.custom_code.is_empty()
    }

    /// Lines across all scanned configuration files
    #[must_use]
    pub fn config_lines(&self) -> usize {
        self.config_files.iter().map(|c| c.lines).sum()
    }

    #[must_use]
    pub fn transform_tiers(&self) -> TransformTierCounts {
        TransformTierCounts::from_scripts(&self.transforms)
    }

    /// The `n` most used tags, count descending then tag ascending
    #[must_use]
    pub fn top_components(&self, n: usize) -> Vec<(&str, usize)> {
        let mut ranked: Vec<(&str, usize)> = self
            .tag_usage
            .iter()
            .map(|(tag, count)| (tag.as_str(), *count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(n);
        ranked
    }

    /// Findings that stand for absorbed parse or read failures
    pub fn absorbed_errors(&self) -> impl Iterator<Item = &Finding> {
        self.findings.iter().filter(|f| f.kind.is_absorbed_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> ProjectDescriptor {
        ProjectDescriptor {
            root: PathBuf::from("/repos/orders-api"),
            name: "orders-api".to_string(),
            display_path: "orders-api".to_string(),
            source: "local".to_string(),
        }
    }

    #[test]
    fn test_generation_from_version() {
        assert_eq!(PlatformGeneration::from_version("4.4.0"), PlatformGeneration::Mule4);
        assert_eq!(
            PlatformGeneration::from_version("4.4.0-20220221"),
            PlatformGeneration::Mule4
        );
        assert_eq!(PlatformGeneration::from_version("3.9"), PlatformGeneration::Mule3);
        assert_eq!(PlatformGeneration::from_version(" 3.8.1 "), PlatformGeneration::Mule3);
        assert_eq!(
            PlatformGeneration::from_version("plugin-3.8.0"),
            PlatformGeneration::Unknown
        );
        assert_eq!(PlatformGeneration::from_version("unknown"), PlatformGeneration::Unknown);
        assert!(PlatformGeneration::Mule3.is_legacy());
    }

    #[test]
    fn test_new_project_is_empty() {
        let project = Project::new(&descriptor());
        assert_eq!(project.name, "orders-api");
        assert_eq!(project.platform_version, UNKNOWN_VERSION);
        assert_eq!(project.flow_count(), 0);
        assert_eq!(project.connector_operations(), 0);
        assert!(!project.has_custom_code());
    }

    #[test]
    fn test_flow_helpers() {
        let mut project = Project::new(&descriptor());
        for (name, kind, handled) in [
            ("a", FlowKind::Flow, true),
            ("b", FlowKind::Flow, false),
            ("c", FlowKind::SubFlow, false),
        ] {
            project.flows.push(Flow {
                name: name.to_string(),
                kind,
                file: "src/main/mule/a.xml".to_string(),
                component_count: 1,
                flow_refs: Vec::new(),
                has_error_handler: handled,
            });
        }

        assert_eq!(project.flow_count(), 2);
        assert_eq!(project.sub_flow_count(), 1);
        assert_eq!(project.flows_without_error_handling(), 1);
    }

    #[test]
    fn test_top_components() {
        let mut project = Project::new(&descriptor());
        for (tag, count) in [("logger", 4), ("flow", 2), ("http:request", 4), ("choice", 1)] {
            project.tag_usage.insert(tag.to_string(), count);
        }
        assert_eq!(
            project.top_components(3),
            vec![("http:request", 4), ("logger", 4), ("flow", 2)]
        );
        assert_eq!(project.top_components(10).len(), 4);
    }

    #[test]
    fn test_connector_usage_weighted() {
        let usage = ConnectorUsage {
            connector: "sap".to_string(),
            count: 3,
            weight: 5,
        };
        assert_eq!(usage.weighted(), 15);
    }
}
