//! Summary report generator.
//!
//! Provides a compact, portfolio-level overview for stakeholders.

use super::text::{field, heading, percent, table, RULE_WIDTH};
use super::{AssessmentReport, ReportError, ReportFormat, ReportGenerator};
use crate::utils::compare_versions;
use std::fmt::Write as _;

/// Tags listed per project in the summary
const TOP_COMPONENTS_PER_PROJECT: usize = 3;

/// Summary reporter for `summary.txt`
pub struct SummaryReporter;

impl SummaryReporter {
    /// Create a new summary reporter
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Default for SummaryReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for SummaryReporter {
    fn generate(&self, report: &AssessmentReport) -> Result<String, ReportError> {
        let agg = &report.aggregate;
        let totals = &agg.totals;
        let mut out = String::new();

        writeln!(out, "MuleSoft Migration Assessment Summary")?;
        writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;
        field(&mut out, "Generated", &report.metadata.generated_at)?;
        field(&mut out, "Scan root", &report.metadata.root)?;
        field(&mut out, "Projects assessed", agg.project_count)?;
        field(&mut out, "Average score", format!("{:.2}", agg.average_score))?;
        field(&mut out, "Average flow coverage", percent(agg.average_test_coverage))?;
        field(&mut out, "Projects with custom code", percent(agg.custom_code_ratio))?;

        heading(&mut out, "Platform generations")?;
        for (generation, count) in agg.generation_histogram.entries() {
            field(&mut out, generation.label(), count)?;
        }

        heading(&mut out, "Platform versions")?;
        let mut versions: Vec<(&String, &usize)> = agg.version_histogram.iter().collect();
        versions.sort_by(|a, b| compare_versions(a.0, b.0));
        for (version, count) in versions {
            field(&mut out, version, count)?;
        }

        heading(&mut out, "Risk tiers")?;
        for (tier, count) in agg.tier_histogram.entries() {
            field(&mut out, tier.label(), count)?;
        }

        heading(&mut out, "Portfolio totals")?;
        field(&mut out, "Flows", totals.flows)?;
        field(&mut out, "Sub-flows", totals.sub_flows)?;
        field(&mut out, "Flows without error handling", totals.flows_without_error_handling)?;
        field(&mut out, "Components", totals.components)?;
        field(&mut out, "Connector operations", totals.connector_operations)?;
        field(
            &mut out,
            "Configuration files",
            format!("{} ({} lines)", totals.config_files, totals.config_lines),
        )?;
        field(
            &mut out,
            "Custom code blocks",
            format!("{} ({} lines)", totals.custom_code_findings, totals.custom_code_lines),
        )?;
        field(
            &mut out,
            "Transformations",
            format!(
                "{} (low {}, medium {}, high {})",
                totals.transforms.total(),
                totals.transforms.low,
                totals.transforms.medium,
                totals.transforms.high
            ),
        )?;
        field(&mut out, "MUnit tests", totals.munit_tests)?;
        field(&mut out, "Oversized files", totals.oversized_files)?;
        field(&mut out, "Complex flows", totals.complex_flows)?;
        field(&mut out, "Domain projects", totals.domain_projects)?;
        field(&mut out, "Shared configuration files", totals.shared_config_files)?;
        field(&mut out, "Unreadable or unparsable files", totals.absorbed_errors)?;

        if !agg.top_connectors.is_empty() {
            heading(&mut out, "Top connectors")?;
            let rows: Vec<Vec<String>> = agg
                .top_connectors
                .iter()
                .map(|c| vec![c.name.clone(), c.count.to_string()])
                .collect();
            table(&mut out, &["CONNECTOR", "OPERATIONS"], &rows, &[1])?;
        }

        if !agg.top_component_types.is_empty() {
            heading(&mut out, "Top component types")?;
            let rows: Vec<Vec<String>> = agg
                .top_component_types
                .iter()
                .map(|c| vec![c.name.clone(), c.count.to_string()])
                .collect();
            table(&mut out, &["COMPONENT", "COUNT"], &rows, &[1])?;
        }

        if !agg.largest_files.is_empty() {
            heading(&mut out, "Largest files")?;
            let rows: Vec<Vec<String>> = agg
                .largest_files
                .iter()
                .map(|f| vec![f.project.clone(), f.path.clone(), f.lines.to_string()])
                .collect();
            table(&mut out, &["PROJECT", "FILE", "LINES"], &rows, &[2])?;
        }

        heading(&mut out, "Recommendations")?;
        if agg.recommendations.is_empty() {
            writeln!(out, "  None")?;
        }
        for rec in &agg.recommendations {
            writeln!(out, "  [P{}] {}: {}", rec.priority, rec.rule.name(), rec.message)?;
        }

        heading(&mut out, "Projects")?;
        let rows: Vec<Vec<String>> = report
            .projects
            .iter()
            .map(|p| {
                vec![
                    p.display_path.clone(),
                    p.platform_version.clone(),
                    format!("{:.2}", p.score.overall),
                    p.score.tier.label().to_string(),
                    percent(p.score.test_coverage),
                ]
            })
            .collect();
        table(
            &mut out,
            &["PROJECT", "VERSION", "SCORE", "TIER", "COVERAGE"],
            &rows,
            &[2, 4],
        )?;

        heading(&mut out, "Top components per project")?;
        for project in &report.projects {
            let top: Vec<String> = project
                .top_components(TOP_COMPONENTS_PER_PROJECT)
                .into_iter()
                .map(|(tag, count)| format!("{tag}({count})"))
                .collect();
            let listed = if top.is_empty() {
                "-".to_string()
            } else {
                top.join(", ")
            };
            field(&mut out, &project.display_path, listed)?;
        }

        Ok(out)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Summary
    }
}
