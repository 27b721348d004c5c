//! Comprehensive report generator.
//!
//! One section per project with every extracted fact, in discovery order.

use super::text::{field, heading, percent, table, RULE_WIDTH};
use super::{AssessmentReport, ReportError, ReportFormat, ReportGenerator};
use crate::model::{FlowKind, Project};
use std::fmt::Write as _;

/// Tags listed per project
const TOP_COMPONENTS: usize = 10;

/// Comprehensive reporter for `comprehensive.txt`
pub struct ComprehensiveReporter;

impl ComprehensiveReporter {
    /// Create a new comprehensive reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn write_project(out: &mut String, project: &Project) -> std::fmt::Result {
        writeln!(out)?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        writeln!(out, "{} ({})", project.display_path, project.source)?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

        let score = &project.score;
        field(out, "Platform", format!("{} ({})", project.platform.label(), project.platform_version))?;
        if let Some(artifact) = &project.build.artifact_id {
            let group = project.build.group_id.as_deref().unwrap_or("-");
            let version = project.build.version.as_deref().unwrap_or("-");
            field(out, "Artifact", format!("{group}:{artifact}:{version}"))?;
        }
        field(out, "Overall score", format!("{:.2}", score.overall))?;
        field(out, "Risk tier", score.tier.label())?;
        field(out, "Connectors score", format!("{:.2}", score.categories.connectors))?;
        field(out, "Custom code score", format!("{:.2}", score.categories.custom_code))?;
        field(out, "Transformation score", format!("{:.2}", score.categories.transformation))?;
        field(out, "Structure score", format!("{:.2}", score.categories.structure))?;

        heading(out, "Structure")?;
        field(out, "Configuration files", format!("{} ({} lines)", project.config_files.len(), project.config_lines()))?;
        field(out, "Flows", project.flow_count())?;
        field(out, "Sub-flows", project.sub_flow_count())?;
        field(out, "Flows without error handling", project.flows_without_error_handling())?;
        field(out, "Components", project.total_components)?;
        field(out, "Async scopes", project.async_scopes)?;
        field(out, "Error handlers", project.error_handlers)?;
        field(out, "Inline expressions", project.inline_expressions)?;

        if !project.flows.is_empty() {
            writeln!(out)?;
            let rows: Vec<Vec<String>> = project
                .flows
                .iter()
                .map(|f| {
                    vec![
                        f.name.clone(),
                        match f.kind {
                            FlowKind::Flow => "flow".to_string(),
                            FlowKind::SubFlow => "sub-flow".to_string(),
                        },
                        f.file.clone(),
                        f.component_count.to_string(),
                        if f.has_error_handler { "yes" } else { "no" }.to_string(),
                    ]
                })
                .collect();
            table(out, &["FLOW", "KIND", "FILE", "COMPONENTS", "ERROR HANDLER"], &rows, &[3])?;
        }

        if !project.complex_flows.is_empty() {
            heading(out, "Complex flows")?;
            for flow in &project.complex_flows {
                writeln!(out, "  {} in {} ({} components)", flow.name, flow.file, flow.component_count)?;
            }
        }

        let top = project.top_components(TOP_COMPONENTS);
        if !top.is_empty() {
            heading(out, "Top components")?;
            for (tag, count) in top {
                field(out, tag, count)?;
            }
        }

        if !score.connector_usage.is_empty() {
            heading(out, "Connectors")?;
            let rows: Vec<Vec<String>> = score
                .connector_usage
                .iter()
                .map(|u| {
                    vec![
                        u.connector.clone(),
                        u.count.to_string(),
                        u.weight.to_string(),
                        u.weighted().to_string(),
                    ]
                })
                .collect();
            table(out, &["CONNECTOR", "OPERATIONS", "WEIGHT", "WEIGHTED"], &rows, &[1, 2, 3])?;
        }

        if !project.custom_code.is_empty() {
            heading(out, "Custom code")?;
            let rows: Vec<Vec<String>> = project
                .custom_code
                .iter()
                .map(|c| {
                    vec![
                        c.location.to_string(),
                        c.kind.to_string(),
                        c.language.clone(),
                        c.lines.to_string(),
                    ]
                })
                .collect();
            table(out, &["LOCATION", "KIND", "LANGUAGE", "LINES"], &rows, &[3])?;
        }

        if !project.transforms.is_empty() {
            heading(out, "Transformations")?;
            let rows: Vec<Vec<String>> = project
                .transforms
                .iter()
                .map(|t| {
                    vec![
                        t.location.to_string(),
                        t.lines.to_string(),
                        t.operators.to_string(),
                        t.nesting_depth.to_string(),
                        t.tier.to_string(),
                    ]
                })
                .collect();
            table(out, &["LOCATION", "LINES", "OPERATORS", "DEPTH", "TIER"], &rows, &[1, 2, 3])?;
        }

        heading(out, "Shared resources")?;
        let shared = &project.shared_resources;
        field(out, "Domain project", if shared.domain_project { "yes" } else { "no" })?;
        field(out, "Shared configuration files", shared.config_files.len())?;
        for file in &shared.config_files {
            writeln!(out, "    {} ({})", file.path, file.format)?;
        }

        heading(out, "Testing")?;
        field(out, "MUnit files", project.testing.munit_files)?;
        field(out, "MUnit tests", project.testing.munit_tests)?;
        field(out, "Other test files", project.testing.other_test_files)?;
        field(out, "Tested flows", project.testing.tested_flows.len())?;
        let coverage = if score.testing_risk {
            format!("{} (at risk)", percent(score.test_coverage))
        } else {
            percent(score.test_coverage)
        };
        field(out, "Flow coverage", coverage)?;

        if !project.oversized_files.is_empty() || !project.findings.is_empty() {
            heading(out, "Findings")?;
            for file in &project.oversized_files {
                writeln!(out, "  oversized   {} ({} lines)", file.path, file.lines)?;
            }
            for finding in project.findings.iter().filter(|f| f.kind.is_absorbed_error()) {
                writeln!(out, "  {:<11} {}: {}", finding.kind.to_string(), finding.location, finding.message)?;
            }
        }

        Ok(())
    }
}

impl Default for ComprehensiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for ComprehensiveReporter {
    fn generate(&self, report: &AssessmentReport) -> Result<String, ReportError> {
        let mut out = String::new();
        writeln!(out, "MuleSoft Migration Assessment: Project Breakdown")?;
        field(&mut out, "Generated", &report.metadata.generated_at)?;
        field(&mut out, "Projects", report.projects.len())?;

        for project in &report.projects {
            Self::write_project(&mut out, project)?;
        }
        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Comprehensive
    }
}
