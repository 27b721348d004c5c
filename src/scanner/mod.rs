//! Structural scanning of Mule projects.
//!
//! The scanner reads a project's build descriptors, every configuration
//! file under `src/main/mule`, its shared resources and its MUnit suites, and
//! folds the extracted facts into the project record. A file that cannot be read or parsed
//! becomes a finding on the project and scanning moves on.

mod descriptor;
mod munit;
mod namespaces;
mod resources;
mod xml;

pub use descriptor::{
    read_artifact_json, read_descriptors, read_pom, ArtifactDescriptor, PomFacts,
    PLUGIN_VERSION_PREFIX,
};
pub use munit::{scan_munit, MunitFacts, MUNIT_DIR, OTHER_TEST_EXTENSIONS, TEST_DIR};
pub use namespaces::{NamespaceLabel, CONNECTOR_NAMESPACES, CORE_LABEL, NON_CONNECTOR_MODULES};
pub use resources::{
    is_domain_project, scan_shared_resources, RESOURCES_DIR, SHARED_CONFIG_EXTENSIONS,
};
pub use xml::{scan_config, ConfigFacts};

use crate::discovery::CONFIG_SOURCE_DIR;
use crate::error::AssessError;
use crate::model::{ConfigFileSummary, Finding, PlatformGeneration, Project, TestingFacts};
use crate::transform::TransformAnalyzer;
use crate::utils::{count_lines, relative_path, source_files};
use std::collections::BTreeSet;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Extracts structural facts from a project's files.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralScanner {
    analyzer: TransformAnalyzer,
}

impl StructuralScanner {
    #[must_use]
    pub const fn new(analyzer: TransformAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Scan one configuration file from disk.
    pub fn scan_config_file(&self, path: &Path, relative: &str) -> Result<ConfigFacts, AssessError> {
        let file = File::open(path).map_err(|e| AssessError::io(path, e))?;
        scan_config(BufReader::new(file), relative, &self.analyzer)
    }

    /// Populate `project` with descriptor, configuration and test facts.
    pub fn scan_project(&self, project: &mut Project) {
        let root = project.root.clone();
        self.scan_descriptors(&root, project);
        self.scan_configuration(&root, project);
        let (shared, errors) = scan_shared_resources(&root, &project.name, &project.build);
        record_walk_errors(project, &root, errors);
        project.shared_resources = shared;
        project.testing = self.scan_tests(&root, project);
    }

    fn scan_descriptors(&self, root: &Path, project: &mut Project) {
        let (build, version, errors) = read_descriptors(root);
        project.build = build;
        if let Some(version) = version {
            project.platform = PlatformGeneration::from_version(&version);
            project.platform_version = version;
        }
        for (file, err) in errors {
            tracing::warn!("{}: {err}", project.display_path);
            project.findings.push(Finding::from_error(file, &err));
        }
    }

    fn scan_configuration(&self, root: &Path, project: &mut Project) {
        let (files, errors) = source_files(&root.join(CONFIG_SOURCE_DIR), &["xml"]);
        record_walk_errors(project, root, errors);

        for path in files {
            let relative = relative_path(root, &path);
            let lines = match count_lines(&path) {
                Ok(lines) => lines,
                Err(e) => {
                    let err = AssessError::io(&path, e);
                    tracing::warn!("{}: skipping {relative}: {err}", project.display_path);
                    project.findings.push(Finding::from_error(relative, &err));
                    continue;
                }
            };

            match self.scan_config_file(&path, &relative) {
                Ok(facts) => {
                    tracing::debug!(
                        "{relative}: {} flows, {} components",
                        facts.flows.len(),
                        facts.components
                    );
                    project.config_files.push(ConfigFileSummary {
                        path: relative,
                        lines,
                        flows: facts.flow_count(),
                        sub_flows: facts.sub_flow_count(),
                        components: facts.components,
                        parsed: true,
                    });
                    merge_facts(project, facts);
                }
                Err(err) => {
                    tracing::warn!("{}: {err}", project.display_path);
                    project.findings.push(Finding::from_error(relative.clone(), &err));
                    project.config_files.push(ConfigFileSummary {
                        path: relative,
                        lines,
                        flows: 0,
                        sub_flows: 0,
                        components: 0,
                        parsed: false,
                    });
                }
            }
        }
    }

    /// Collect MUnit cases and other test sources.
    ///
    /// Only references to flows defined in the project count as tested.
    fn scan_tests(&self, root: &Path, project: &mut Project) -> TestingFacts {
        let mut testing = TestingFacts::default();
        let mut suites = MunitFacts::default();

        let (files, errors) = source_files(&root.join(MUNIT_DIR), &["xml"]);
        record_walk_errors(project, root, errors);
        for path in files {
            let relative = relative_path(root, &path);
            let result = File::open(&path)
                .map_err(|e| AssessError::io(&path, e))
                .and_then(|file| scan_munit(BufReader::new(file), &relative));
            match result {
                Ok(facts) => {
                    testing.munit_files += 1;
                    suites.merge(facts);
                }
                Err(err) => {
                    tracing::warn!("{}: {err}", project.display_path);
                    project.findings.push(Finding::from_error(relative, &err));
                }
            }
        }

        let (other, errors) = source_files(&root.join(TEST_DIR), OTHER_TEST_EXTENSIONS);
        record_walk_errors(project, root, errors);
        testing.other_test_files = other.len();

        let defined: BTreeSet<&str> = project.flows.iter().map(|f| f.name.as_str()).collect();
        testing.munit_tests = suites.tests;
        testing.tested_flows = suites
            .referenced_flows
            .into_iter()
            .filter(|name| defined.contains(name.as_str()))
            .collect();
        testing
    }
}

/// Turn entries a directory walk could not read into findings.
fn record_walk_errors(project: &mut Project, root: &Path, errors: Vec<(PathBuf, AssessError)>) {
    for (path, err) in errors {
        tracing::warn!("{}: {err}", project.display_path);
        project.findings.push(Finding::from_error(relative_path(root, &path), &err));
    }
}

/// Fold one file's facts into the project.
fn merge_facts(project: &mut Project, facts: ConfigFacts) {
    project.flows.extend(facts.flows);
    for (connector, count) in facts.connectors {
        *project.connectors.entry(connector).or_insert(0) += count;
    }
    for (tag, count) in facts.tag_usage {
        *project.tag_usage.entry(tag).or_insert(0) += count;
    }
    project.total_components += facts.components;
    project.async_scopes += facts.async_scopes;
    project.error_handlers += facts.error_handlers;
    project.inline_expressions += facts.inline_expressions;
    project.transforms.extend(facts.transforms);
    project.custom_code.extend(facts.custom_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FindingKind, ProjectDescriptor};
    use std::fs;
    use tempfile::TempDir;

    const APP: &str = r#"<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:http="http://www.mulesoft.org/schema/mule/http">
  <flow name="orders">
    <http:listener path="/orders"/>
    <flow-ref name="store"/>
  </flow>
  <sub-flow name="store">
    <http:request path="/db"/>
  </sub-flow>
</mule>
"#;

    const SUITE: &str = r#"<mule xmlns="http://www.mulesoft.org/schema/mule/core"
      xmlns:munit="http://www.mulesoft.org/schema/mule/munit">
  <munit:test name="t1">
    <munit:execution><flow-ref name="orders"/></munit:execution>
  </munit:test>
  <munit:test name="t2">
    <munit:execution><flow-ref name="ghost"/></munit:execution>
  </munit:test>
</mule>
"#;

    fn project_in(dir: &Path) -> Project {
        Project::new(&ProjectDescriptor {
            root: dir.to_path_buf(),
            name: "orders".to_string(),
            display_path: "orders".to_string(),
            source: "local".to_string(),
        })
    }

    #[test]
    fn test_scan_project() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("src/main/mule")).unwrap();
        fs::create_dir_all(root.join("src/test/munit")).unwrap();
        fs::create_dir_all(root.join("src/test/java")).unwrap();
        fs::write(
            root.join("pom.xml"),
            "<project><properties><mule.version>3.9.1</mule.version></properties></project>",
        )
        .unwrap();
        fs::write(root.join("src/main/mule/app.xml"), APP).unwrap();
        fs::write(root.join("src/main/mule/broken.xml"), "<mule><flow></mule>").unwrap();
        fs::write(root.join("src/test/munit/suite.xml"), SUITE).unwrap();
        fs::write(root.join("src/test/java/HelperTest.java"), "class HelperTest {}").unwrap();
        fs::create_dir_all(root.join("src/main/resources")).unwrap();
        fs::write(root.join("src/main/resources/app.properties"), "port=8081\n").unwrap();

        let mut project = project_in(root);
        StructuralScanner::default().scan_project(&mut project);

        assert_eq!(project.platform_version, "3.9.1");
        assert_eq!(project.platform, PlatformGeneration::Mule3);
        assert!(project.build.has_pom);

        assert_eq!(project.flows.len(), 2);
        assert_eq!(project.connectors.get("http"), Some(&2));
        assert_eq!(project.config_files.len(), 2);
        assert!(project.config_files.iter().any(|c| !c.parsed));
        assert_eq!(project.config_files[0].lines, 10);

        assert_eq!(project.findings.len(), 1);
        assert_eq!(project.findings[0].kind, FindingKind::Unparsable);
        assert_eq!(project.findings[0].location.path, "src/main/mule/broken.xml");

        assert_eq!(project.testing.munit_files, 1);
        assert_eq!(project.testing.munit_tests, 2);
        assert_eq!(project.testing.other_test_files, 1);
        assert_eq!(project.testing.tested_flows, vec!["orders"]);

        assert!(!project.shared_resources.domain_project);
        assert_eq!(project.shared_resources.config_files.len(), 1);
        assert_eq!(
            project.shared_resources.config_files[0].path,
            "src/main/resources/app.properties"
        );
    }

    #[test]
    fn test_walk_errors_become_findings() {
        let root = Path::new("/repos/orders");
        let mut project = project_in(root);
        let locked = root.join("src/test/java/locked");
        let err = AssessError::io(
            &locked,
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );

        record_walk_errors(&mut project, root, vec![(locked, err)]);
        assert_eq!(project.findings.len(), 1);
        assert_eq!(project.findings[0].kind, FindingKind::Unreadable);
        assert_eq!(project.findings[0].location.path, "src/test/java/locked");
    }
}
