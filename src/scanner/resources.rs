//! Shared resources: domain projects and shared configuration files.

use crate::error::AssessError;
use crate::model::{BuildDescriptor, SharedConfigFile, SharedResources};
use crate::utils::{relative_path, source_files};
use std::path::{Path, PathBuf};

/// Directory holding property and resource files, relative to the root
pub const RESOURCES_DIR: &str = "src/main/resources";

/// Extensions of shared configuration files
pub const SHARED_CONFIG_EXTENSIONS: &[&str] = &["properties", "yaml", "yml", "json"];

/// Files whose relative path contains this are API catalog metadata
const CATALOG_MARKER: &str = "catalog";

/// Maven packaging of Mule domain projects
const DOMAIN_PACKAGING: &str = "mule-domain";

/// A domain project is named like one or packaged as one.
#[must_use]
pub fn is_domain_project(name: &str, build: &BuildDescriptor) -> bool {
    name.to_ascii_lowercase().contains("domain")
        || build.packaging.as_deref() == Some(DOMAIN_PACKAGING)
}

/// Collect the project's shared resources.
///
/// Catalog files are left out. Entries the walk could not read are returned
/// for the caller to record.
#[must_use]
pub fn scan_shared_resources(
    root: &Path,
    name: &str,
    build: &BuildDescriptor,
) -> (SharedResources, Vec<(PathBuf, AssessError)>) {
    let (files, errors) = source_files(&root.join(RESOURCES_DIR), SHARED_CONFIG_EXTENSIONS);
    let config_files = files
        .iter()
        .map(|path| relative_path(root, path))
        .filter(|relative| !relative.to_ascii_lowercase().contains(CATALOG_MARKER))
        .map(|relative| {
            let format = Path::new(&relative)
                .extension()
                .map(|e| e.to_string_lossy().to_ascii_lowercase())
                .unwrap_or_default();
            SharedConfigFile {
                path: relative,
                format,
            }
        })
        .collect();

    let resources = SharedResources {
        domain_project: is_domain_project(name, build),
        config_files,
    };
    (resources, errors)
}
