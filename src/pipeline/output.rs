//! Writing report artifacts to the output directory.

use super::PipelineError;
use crate::config::OutputConfig;
use crate::error::AssessError;
use crate::reports::{create_reporter, AssessmentReport, JsonReporter, ReportError, ReportFormat};
use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Files produced by one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrittenReports {
    pub files: Vec<PathBuf>,
}

/// Render every artifact and write it under `output.dir`.
///
/// The directory is created when missing. Any failure aborts with a
/// [`PipelineError::ReportFailed`].
pub fn write_reports(
    report: &AssessmentReport,
    output: &OutputConfig,
) -> Result<WrittenReports, PipelineError> {
    write_all(report, output).map_err(|source| PipelineError::ReportFailed { source })
}

fn write_all(report: &AssessmentReport, output: &OutputConfig) -> Result<WrittenReports> {
    let dir = &output.dir;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let mut written = WrittenReports::default();
    for format in ReportFormat::ALL {
        let reporter = create_reporter(format, output.pretty_json);
        let path = dir.join(reporter.format().file_name());
        let file = File::create(&path)
            .with_context(|| format!("Failed to create output file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        reporter
            .write_report(report, &mut writer)
            .and_then(|()| writer.flush().map_err(ReportError::from))
            .map_err(|e| AssessError::report(format!("writing {format} report"), e))?;
        tracing::debug!("Report written to {}", path.display());
        written.files.push(path);
    }

    if output.individual_files {
        let reporter = JsonReporter::new().pretty(output.pretty_json);
        for project in &report.projects {
            let rendered = reporter
                .generate_project(&report.metadata, project)
                .map_err(|e| AssessError::report(format!("rendering {}", project.display_path), e))?;
            let path = dir.join(JsonReporter::project_file(project));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            write_file(&path, &rendered)?;
            written.files.push(path);
        }
    }

    tracing::info!(
        "Wrote {} report file(s) to {}",
        written.files.len(),
        dir.display()
    );
    Ok(written)
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).with_context(|| format!("Failed to write output to {}", path.display()))?;
    tracing::debug!("Report written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_report;
    use tempfile::TempDir;

    fn output_in(dir: &Path, individual_files: bool) -> OutputConfig {
        OutputConfig {
            dir: dir.to_path_buf(),
            individual_files,
            pretty_json: true,
        }
    }

    #[test]
    fn test_writes_standard_artifacts() {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("report_output");
        let written = write_reports(&sample_report(), &output_in(&out, false)).unwrap();
        assert_eq!(written.files.len(), 3);
        for name in ["assessment.json", "summary.txt", "comprehensive.txt"] {
            assert!(out.join(name).is_file(), "missing {name}");
        }
        assert!(!out.join("projects").exists());
    }

    #[test]
    fn test_writes_individual_files() {
        let tmp = TempDir::new().unwrap();
        let written = write_reports(&sample_report(), &output_in(tmp.path(), true)).unwrap();
        assert_eq!(written.files.len(), 5);
        assert!(tmp.path().join("projects/orders-api.json").is_file());
        assert!(tmp.path().join("projects/billing.json").is_file());
    }

    #[test]
    fn test_unwritable_output_is_report_error() {
        let tmp = TempDir::new().unwrap();
        let blocker = tmp.path().join("occupied");
        fs::write(&blocker, "not a directory").unwrap();
        let err = write_reports(&sample_report(), &output_in(&blocker, false)).unwrap_err();
        assert!(matches!(err, PipelineError::ReportFailed { .. }));
        assert_eq!(err.exit_code(), crate::pipeline::exit_codes::REPORT_ERROR);
    }
}
