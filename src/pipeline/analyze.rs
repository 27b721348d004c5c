//! Per-project analysis and the parallel assessment run.

use super::PipelineError;
use crate::config::AssessConfig;
use crate::custom_code::CustomCodeDetector;
use crate::discovery::{filter_projects, ProjectLocator};
use crate::error::AssessError;
use crate::model::{
    ComplexFlow, CustomCodeKind, Finding, FindingKind, OversizedFile, Project, ProjectDescriptor,
    SourceKind, TransformOrigin,
};
use crate::portfolio::PortfolioAggregator;
use crate::reports::{AssessmentReport, ReportMetadata};
use crate::scanner::StructuralScanner;
use crate::scoring::ComplexityScorer;
use crate::transform::TransformAnalyzer;
use rayon::prelude::*;

/// Runs every analysis stage over one project.
#[derive(Debug, Clone)]
pub struct ProjectAnalyzer {
    scanner: StructuralScanner,
    transforms: TransformAnalyzer,
    detector: CustomCodeDetector,
    scorer: ComplexityScorer,
    large_file_lines: usize,
    complex_flow_components: usize,
}

impl ProjectAnalyzer {
    #[must_use]
    pub fn from_config(config: &AssessConfig) -> Self {
        let transforms = TransformAnalyzer::new(config.transform);
        Self {
            scanner: StructuralScanner::new(transforms),
            transforms,
            detector: CustomCodeDetector::new(),
            scorer: ComplexityScorer::new(config.scoring.clone()),
            large_file_lines: config.scan.large_file_lines,
            complex_flow_components: config.scan.complex_flow_components,
        }
    }

    /// Build the finished record for one project.
    ///
    /// Never fails: unreadable or malformed files end up as findings on the
    /// returned project.
    #[must_use]
    pub fn analyze(&self, descriptor: &ProjectDescriptor) -> Project {
        let mut project = Project::new(descriptor);
        tracing::debug!("Analyzing {}", project.display_path);

        self.scanner.scan_project(&mut project);

        let external = self
            .transforms
            .analyze_project(&project.root, &mut project.findings);
        project.transforms.extend(external);

        let standalone = self
            .detector
            .detect_standalone(&project.root, &mut project.findings);
        project.custom_code.extend(standalone);

        flag_oversized(&mut project, self.large_file_lines);
        flag_complex_flows(&mut project, self.complex_flow_components);
        self.scorer.finalize(&mut project);

        let absorbed = project.absorbed_errors().count();
        if absorbed > 0 {
            tracing::warn!(
                "{}: {absorbed} file(s) could not be read or parsed",
                project.display_path
            );
        }
        project
    }
}

/// Record every source file longer than `threshold` lines.
///
/// Configuration files, external transformations and standalone custom-code
/// files are checked. Each outlier is listed on the project and also raised
/// as an oversized finding.
pub fn flag_oversized(project: &mut Project, threshold: usize) {
    let config = project
        .config_files
        .iter()
        .map(|c| (c.path.clone(), SourceKind::Configuration, c.lines));
    let transforms = project
        .transforms
        .iter()
        .filter(|t| t.origin == TransformOrigin::External)
        .map(|t| (t.location.path.clone(), SourceKind::Transform, t.lines));
    let custom = project
        .custom_code
        .iter()
        .filter(|c| c.kind == CustomCodeKind::ForeignLanguage)
        .map(|c| (c.location.path.clone(), SourceKind::CustomCode, c.lines));

    let oversized: Vec<OversizedFile> = config
        .chain(transforms)
        .chain(custom)
        .filter(|(_, _, lines)| *lines > threshold)
        .map(|(path, kind, lines)| OversizedFile { path, kind, lines })
        .collect();

    for file in oversized {
        tracing::warn!(
            "{}: {} has {} lines (threshold {threshold})",
            project.display_path,
            file.path,
            file.lines
        );
        project.findings.push(Finding::new(
            FindingKind::Oversized,
            file.path.clone(),
            format!("{} lines exceeds the {threshold}-line threshold", file.lines),
        ));
        project.oversized_files.push(file);
    }
}

/// List flows with more than `threshold` components, largest first.
pub fn flag_complex_flows(project: &mut Project, threshold: usize) {
    let mut complex: Vec<ComplexFlow> = project
        .flows
        .iter()
        .filter(|f| f.component_count > threshold)
        .map(|f| ComplexFlow {
            name: f.name.clone(),
            file: f.file.clone(),
            component_count: f.component_count,
        })
        .collect();
    complex.sort_by(|a, b| {
        b.component_count
            .cmp(&a.component_count)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.name.cmp(&b.name))
    });
    if !complex.is_empty() {
        tracing::debug!(
            "{}: {} flow(s) above {threshold} components",
            project.display_path,
            complex.len()
        );
    }
    project.complex_flows = complex;
}

/// Locate, analyze and aggregate every project under the configured root.
///
/// Projects are analyzed on a bounded worker pool; the returned report keeps
/// discovery order. A root without projects yields an empty report. Only an
/// unusable root, a filter that matches nothing or a pool that cannot start
/// abort the run.
pub fn run_assessment(config: &AssessConfig) -> Result<AssessmentReport, PipelineError> {
    let root = &config.scan.root;
    if !root.is_dir() {
        return Err(AssessError::config(format!(
            "scan root {} is not a directory",
            root.display()
        ))
        .into());
    }

    let located = ProjectLocator::new(config.scan.max_depth).locate(root);
    tracing::info!("Found {} project(s) under {}", located.len(), root.display());
    let descriptors = filter_projects(located, &config.scan.projects)?;
    if descriptors.is_empty() {
        tracing::warn!("No Mule projects found under {}", root.display());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.scan.jobs.unwrap_or(0))
        .build()
        .map_err(|e| AssessError::config(format!("cannot start worker pool: {e}")))?;

    let analyzer = ProjectAnalyzer::from_config(config);
    let aggregator = PortfolioAggregator::from_config(config);
    tracing::info!(
        "Analyzing {} project(s) on {} worker(s)",
        descriptors.len(),
        pool.current_num_threads()
    );

    let (projects, aggregate) = pool.install(|| {
        let projects: Vec<Project> = descriptors
            .par_iter()
            .map(|descriptor| analyzer.analyze(descriptor))
            .collect();
        let aggregate = aggregator.aggregate(&projects);
        (projects, aggregate)
    });

    let metadata = ReportMetadata::new(root.display().to_string(), projects.len())
        .with_filter(config.scan.projects.clone());
    Ok(AssessmentReport {
        metadata,
        projects,
        aggregate,
    })
}
