//! JSON report generator.

use super::{AssessmentReport, ReportError, ReportFormat, ReportGenerator, ReportMetadata};
use crate::model::Project;
use serde::Serialize;
use std::path::PathBuf;

/// Directory holding per-project documents, relative to the output directory
pub const PROJECTS_DIR: &str = "projects";

/// JSON report generator
pub struct JsonReporter {
    /// Pretty print output
    pretty: bool,
}

impl JsonReporter {
    /// Create a new JSON reporter
    #[must_use]
    pub const fn new() -> Self {
        Self { pretty: true }
    }

    /// Set pretty printing
    #[must_use]
    pub const fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> Result<String, ReportError> {
        let json = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }

    /// Render the stand-alone document for one project
    pub fn generate_project(
        &self,
        metadata: &ReportMetadata,
        project: &Project,
    ) -> Result<String, ReportError> {
        self.to_json(&ProjectDocumentRef { metadata, project })
    }

    /// Path of a project's document relative to the output directory
    #[must_use]
    pub fn project_file(project: &Project) -> PathBuf {
        let mut path = PathBuf::from(PROJECTS_DIR);
        let segments: Vec<&str> = project
            .display_path
            .split('/')
            .filter(|s| !s.is_empty() && *s != "." && *s != "..")
            .collect();
        match segments.split_last() {
            Some((last, parents)) => {
                path.extend(parents);
                path.push(format!("{last}.json"));
            }
            None => path.push(format!("{}.json", project.name)),
        }
        path
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportGenerator for JsonReporter {
    fn generate(&self, report: &AssessmentReport) -> Result<String, ReportError> {
        self.to_json(report)
    }

    fn format(&self) -> ReportFormat {
        ReportFormat::Json
    }
}

/// Borrowed form of [`super::ProjectDocument`] used when writing
#[derive(Serialize)]
struct ProjectDocumentRef<'a> {
    metadata: &'a ReportMetadata,
    project: &'a Project,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::test_support::sample_report;
    use crate::reports::ProjectDocument;

    #[test]
    fn test_top_level_keys() {
        let json = JsonReporter::new().generate(&sample_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["aggregate", "metadata", "projects"]);
        assert_eq!(value["metadata"]["schema_version"], "1.0");
    }

    #[test]
    fn test_project_round_trip_is_exact() {
        let report = sample_report();
        let reporter = JsonReporter::new().pretty(false);
        let json = reporter
            .generate_project(&report.metadata, &report.projects[0])
            .unwrap();
        let doc: ProjectDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(doc.project, report.projects[0]);
        assert_eq!(
            doc.project.score.overall.to_bits(),
            report.projects[0].score.overall.to_bits()
        );

        let full: AssessmentReport =
            serde_json::from_str(&reporter.generate(&report).unwrap()).unwrap();
        assert_eq!(full, report);
    }

    #[test]
    fn test_project_file_path() {
        let mut project = sample_report().projects[0].clone();
        project.display_path = "github.com/acme/orders-api".to_string();
        assert_eq!(
            JsonReporter::project_file(&project),
            PathBuf::from("projects/github.com/acme/orders-api.json")
        );
    }
}
