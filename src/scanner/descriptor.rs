//! Build descriptor reading: `pom.xml` and `mule-artifact.json`.

use crate::error::{AssessError, ErrorContext, ParseErrorKind};
use crate::model::BuildDescriptor;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Maven plugin that packages Mule applications
const MULE_MAVEN_PLUGIN: &str = "mule-maven-plugin";

/// Version prefix used when only the packaging plugin version is known
pub const PLUGIN_VERSION_PREFIX: &str = "plugin-";

/// Facts read from a `pom.xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PomFacts {
    pub group_id: Option<String>,
    pub artifact_id: Option<String>,
    pub version: Option<String>,
    pub packaging: Option<String>,
    pub name: Option<String>,
    /// Runtime version from `properties`
    pub runtime_version: Option<String>,
    /// Version of the `mule-maven-plugin`, if declared
    pub plugin_version: Option<String>,
}

impl PomFacts {
    /// Best available platform version.
    ///
    /// `mule.version` wins over `app.runtime`; the plugin version is a last
    /// resort and is prefixed so it is not mistaken for a runtime version.
    #[must_use]
    pub fn platform_version(&self) -> Option<String> {
        self.runtime_version.clone().or_else(|| {
            self.plugin_version
                .as_ref()
                .map(|v| format!("{PLUGIN_VERSION_PREFIX}{v}"))
        })
    }
}

/// Read a `pom.xml` in streaming mode.
pub fn read_pom<R: BufRead>(source: R, context: &str) -> Result<PomFacts, AssessError> {
    let mut reader = Reader::from_reader(source);
    let mut facts = PomFacts::default();
    let mut path: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut mule_version = None;
    let mut app_runtime = None;
    let mut plugin_artifact: Option<String> = None;
    let mut plugin_version: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                path.push(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
                text.clear();
                if path_is(&path, &["project", "build", "plugins", "plugin"]) {
                    plugin_artifact = None;
                    plugin_version = None;
                }
            }
            Ok(Event::Text(ref e)) => {
                text.push_str(&e.unescape().unwrap_or_default());
            }
            Ok(Event::End(_)) => {
                let value = text.trim().to_string();
                let segments: Vec<&str> = path.iter().map(String::as_str).collect();
                match segments.as_slice() {
                    ["project", "groupId"] => facts.group_id = non_empty(value),
                    ["project", "artifactId"] => facts.artifact_id = non_empty(value),
                    ["project", "version"] => facts.version = non_empty(value),
                    ["project", "packaging"] => facts.packaging = non_empty(value),
                    ["project", "name"] => facts.name = non_empty(value),
                    ["project", "properties", "mule.version"] => mule_version = non_empty(value),
                    ["project", "properties", "app.runtime"] => app_runtime = non_empty(value),
                    ["project", "build", "plugins", "plugin", "artifactId"] => {
                        plugin_artifact = non_empty(value);
                    }
                    ["project", "build", "plugins", "plugin", "version"] => {
                        plugin_version = non_empty(value);
                    }
                    ["project", "build", "plugins", "plugin"] => {
                        if plugin_artifact.as_deref() == Some(MULE_MAVEN_PLUGIN) {
                            facts.plugin_version = plugin_version.take();
                        }
                    }
                    _ => {}
                }
                path.pop();
                text.clear();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(AssessError::invalid_xml(
                    context,
                    format!("error at position {}: {e}", reader.buffer_position()),
                ))
            }
            _ => {}
        }
        buf.clear();
    }

    facts.runtime_version = mule_version.or(app_runtime);
    Ok(facts)
}

fn path_is(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}

/// The fields of `mule-artifact.json` the scanner reads
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactDescriptor {
    pub min_mule_version: Option<String>,
    pub name: Option<String>,
}

/// Read `mule-artifact.json`.
pub fn read_artifact_json(bytes: &[u8], context: &str) -> Result<ArtifactDescriptor, AssessError> {
    serde_json::from_slice(bytes).map_err(|e| {
        AssessError::parse(context, ParseErrorKind::InvalidJson(e.to_string()))
    })
}

/// Descriptor facts for a project root, plus the platform version.
///
/// Parse failures are returned alongside whatever could still be read so
/// the caller can record them without losing the rest.
#[must_use]
pub fn read_descriptors(root: &Path) -> (BuildDescriptor, Option<String>, Vec<(String, AssessError)>) {
    let mut build = BuildDescriptor::default();
    let mut version = None;
    let mut errors = Vec::new();

    let pom_path = root.join("pom.xml");
    if pom_path.is_file() {
        build.has_pom = true;
        let result = File::open(&pom_path)
            .map_err(|e| AssessError::io(&pom_path, e))
            .and_then(|file| read_pom(BufReader::new(file), "pom.xml"))
            .context("reading build descriptor");
        match result {
            Ok(pom) => {
                version = pom.platform_version();
                build.group_id = pom.group_id;
                build.artifact_id = pom.artifact_id;
                build.version = pom.version;
                build.packaging = pom.packaging;
                build.name = pom.name;
            }
            Err(err) => errors.push(("pom.xml".to_string(), err)),
        }
    }

    let artifact_path = root.join("mule-artifact.json");
    if artifact_path.is_file() {
        build.has_artifact_json = true;
        let result = std::fs::read(&artifact_path)
            .map_err(|e| AssessError::io(&artifact_path, e))
            .and_then(|bytes| read_artifact_json(&bytes, "mule-artifact.json"))
            .context("reading artifact descriptor");
        match result {
            Ok(artifact) => {
                if version.is_none() {
                    version = artifact.min_mule_version;
                }
                if build.name.is_none() {
                    build.name = artifact.name;
                }
            }
            Err(err) => errors.push(("mule-artifact.json".to_string(), err)),
        }
    }

    (build, version, errors)
}
