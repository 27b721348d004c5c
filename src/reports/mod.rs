//! Report generation for assessment results.
//!
//! Every artifact is rendered from one [`AssessmentReport`]:
//! - JSON: the combined document plus optional per-project documents
//! - Summary: portfolio-level text overview
//! - Comprehensive: per-project text breakdown
//!
//! Renderers only read the report; no score or count is recomputed here,
//! and no source text is ever included.

mod comprehensive;
mod json;
mod summary;
mod text;
mod types;

pub use comprehensive::ComprehensiveReporter;
pub use json::{JsonReporter, PROJECTS_DIR};
pub use summary::SummaryReporter;
pub use types::{AssessmentReport, ProjectDocument, ReportFormat, ReportMetadata, ToolInfo};

use std::io::Write;
use thiserror::Error;

/// Errors that can occur during report generation
#[derive(Error, Debug)]
pub enum ReportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Format error: {0}")]
    FormatError(#[from] std::fmt::Error),
}

impl From<serde_json::Error> for ReportError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Trait for report generators
pub trait ReportGenerator {
    /// Render the report
    fn generate(&self, report: &AssessmentReport) -> Result<String, ReportError>;

    /// Write the rendered report to a writer
    fn write_report(
        &self,
        report: &AssessmentReport,
        writer: &mut dyn Write,
    ) -> Result<(), ReportError> {
        let rendered = self.generate(report)?;
        writer.write_all(rendered.as_bytes())?;
        Ok(())
    }

    /// Get the format this generator produces
    fn format(&self) -> ReportFormat;
}

/// Create a report generator for the given format
#[must_use]
pub fn create_reporter(format: ReportFormat, pretty_json: bool) -> Box<dyn ReportGenerator> {
    match format {
        ReportFormat::Json => Box::new(JsonReporter::new().pretty(pretty_json)),
        ReportFormat::Summary => Box::new(SummaryReporter::new()),
        ReportFormat::Comprehensive => Box::new(ComprehensiveReporter::new()),
    }
}

/// JSON Schema of the combined report document
pub fn report_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AssessmentReport);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{AssessmentReport, ReportMetadata};
    use crate::model::{
        ComplexFlow, CustomCodeFinding, CustomCodeKind, Finding, FindingKind, Flow, FlowKind,
        OversizedFile, PlatformGeneration, Project, ProjectDescriptor, SharedConfigFile,
        SourceKind, SourceLocation, TransformOrigin, TransformScript, TransformTier,
    };
    use crate::portfolio::PortfolioAggregator;
    use crate::scoring::ComplexityScorer;
    use std::path::PathBuf;

    fn flow(name: &str, kind: FlowKind, has_error_handler: bool) -> Flow {
        Flow {
            name: name.to_string(),
            kind,
            file: "src/main/mule/orders.xml".to_string(),
            component_count: 4,
            flow_refs: vec!["store-order".to_string()],
            has_error_handler,
        }
    }

    /// A two-project report with every section populated
    pub fn sample_report() -> AssessmentReport {
        let mut orders = Project::new(&ProjectDescriptor {
            root: PathBuf::from("/repos/orders-api"),
            name: "orders-api".to_string(),
            display_path: "orders-api".to_string(),
            source: "local".to_string(),
        });
        orders.platform_version = "4.4.0".to_string();
        orders.platform = PlatformGeneration::Mule4;
        orders.flows = vec![
            flow("orders-listener", FlowKind::Flow, true),
            flow("create-order", FlowKind::Flow, false),
            flow("store-order", FlowKind::SubFlow, false),
        ];
        orders.connectors.insert("http".to_string(), 2);
        orders.connectors.insert("salesforce".to_string(), 1);
        orders.tag_usage.insert("http:request".to_string(), 1);
        orders.tag_usage.insert("logger".to_string(), 5);
        orders.total_components = 17;
        orders.custom_code.push(CustomCodeFinding {
            kind: CustomCodeKind::EmbeddedScript,
            language: "groovy".to_string(),
            location: SourceLocation::element("src/main/mule/orders.xml", "flow[create-order]/scripting:execute"),
            lines: 7,
        });
        orders.transforms.push(TransformScript {
            location: SourceLocation::file("src/main/resources/dw/order.dwl"),
            origin: TransformOrigin::External,
            lines: 50,
            operators: 12,
            nesting_depth: 3,
            tier: TransformTier::Medium,
        });
        orders.oversized_files.push(OversizedFile {
            path: "src/main/mule/orders.xml".to_string(),
            kind: SourceKind::Configuration,
            lines: 1204,
        });
        orders.complex_flows.push(ComplexFlow {
            name: "create-order".to_string(),
            file: "src/main/mule/orders.xml".to_string(),
            component_count: 64,
        });
        orders.shared_resources.config_files.push(SharedConfigFile {
            path: "src/main/resources/config.yaml".to_string(),
            format: "yaml".to_string(),
        });
        orders.testing.munit_files = 1;
        orders.testing.munit_tests = 2;
        orders.testing.tested_flows = vec!["create-order".to_string()];

        let mut legacy = Project::new(&ProjectDescriptor {
            root: PathBuf::from("/repos/billing"),
            name: "billing".to_string(),
            display_path: "billing".to_string(),
            source: "local".to_string(),
        });
        legacy.platform_version = "3.9.1".to_string();
        legacy.platform = PlatformGeneration::Mule3;
        legacy.flows = vec![flow("billing-main", FlowKind::Flow, true)];
        legacy.connectors.insert("db".to_string(), 4);
        legacy.findings.push(Finding::new(
            FindingKind::Unparsable,
            "src/main/mule/broken.xml",
            "Invalid XML structure",
        ));

        let scorer = ComplexityScorer::default();
        let mut projects = vec![legacy, orders];
        projects.sort_by(|a, b| a.display_path.cmp(&b.display_path));
        for project in &mut projects {
            scorer.finalize(project);
        }

        let aggregate = PortfolioAggregator::default().aggregate(&projects);
        let mut metadata = ReportMetadata::new("/repos", projects.len());
        metadata.generated_at = "2026-01-01T00:00:00+00:00".to_string();
        AssessmentReport {
            metadata,
            projects,
            aggregate,
        }
    }
}
