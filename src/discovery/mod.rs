//! Project root discovery.
//!
//! Walks a directory tree and returns every directory that looks like a Mule
//! application, in lexicographic path order. Both the flat layout
//! (`root/project`) and the hierarchical layout (`root/host/org/project`) are
//! found without the caller saying which one to expect.

mod matcher;

pub use matcher::{
    PathPredicate, StructuralMatcher, CONFIG_SOURCE_DIR, DESCRIPTOR_FILES,
};
pub(crate) use matcher::{has_extension, is_hidden};

use crate::config::DEFAULT_MAX_DEPTH;
use crate::error::AssessError;
use crate::model::ProjectDescriptor;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Source group for projects directly under the scan root
pub const LOCAL_SOURCE: &str = "local";

/// Finds project roots below a scan root.
#[derive(Debug, Clone)]
pub struct ProjectLocator {
    matcher: StructuralMatcher,
    max_depth: usize,
}

impl ProjectLocator {
    #[must_use]
    pub fn new(max_depth: usize) -> Self {
        Self {
            matcher: StructuralMatcher::mule_project(),
            max_depth,
        }
    }

    /// Find all projects below `root`.
    ///
    /// Descent stops at matched projects, hidden directories and the maximum
    /// depth. Unreadable directories are skipped.
    #[must_use]
    pub fn locate(&self, root: &Path) -> Vec<ProjectDescriptor> {
        let mut projects = Vec::new();
        let mut walker = WalkDir::new(root)
            .min_depth(1)
            .max_depth(self.max_depth)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));

        while let Some(item) = walker.next() {
            let entry = match item {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!("Skipping unreadable entry: {err}");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }

            match self.matcher.check(entry.path()) {
                Ok(()) => {
                    if let Some(descriptor) = describe(root, &entry) {
                        tracing::debug!("Found project {}", descriptor.display_path);
                        projects.push(descriptor);
                    }
                    walker.skip_current_dir();
                }
                Err(reason) => tracing::debug!("{reason}"),
            }
        }

        projects.sort_by(|a, b| a.display_path.cmp(&b.display_path));
        projects
    }
}

impl Default for ProjectLocator {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

/// Build a descriptor from a matched directory entry.
fn describe(root: &Path, entry: &DirEntry) -> Option<ProjectDescriptor> {
    let relative = entry.path().strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    let (name, groups) = parts.split_last()?;

    let source = if groups.is_empty() {
        LOCAL_SOURCE.to_string()
    } else {
        groups.join("/")
    };

    Some(ProjectDescriptor {
        root: entry.path().to_path_buf(),
        name: name.clone(),
        display_path: parts.join("/"),
        source,
    })
}

/// Restrict projects to those named by the filter.
///
/// A project is kept when its directory name or display path equals any
/// filter entry. An empty filter keeps everything; a filter that keeps
/// nothing is a configuration error.
pub fn filter_projects(
    projects: Vec<ProjectDescriptor>,
    filter: &[String],
) -> Result<Vec<ProjectDescriptor>, AssessError> {
    if filter.is_empty() {
        return Ok(projects);
    }

    let matches = |p: &ProjectDescriptor, wanted: &str| p.name == wanted || p.display_path == wanted;

    for wanted in filter {
        if !projects.iter().any(|p| matches(p, wanted)) {
            tracing::warn!("No project matches filter entry '{wanted}'");
        }
    }

    let selected: Vec<_> = projects
        .into_iter()
        .filter(|p| filter.iter().any(|wanted| matches(p, wanted)))
        .collect();

    if selected.is_empty() {
        return Err(AssessError::config(format!(
            "no projects match the filter: {}",
            filter.join(", ")
        )));
    }
    Ok(selected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn make_project(dir: &Path) {
        fs::create_dir_all(dir.join("src/main/mule")).unwrap();
        fs::write(dir.join("pom.xml"), "<project/>").unwrap();
        fs::write(dir.join("src/main/mule/app.xml"), "<mule/>").unwrap();
    }

    #[test]
    fn test_flat_layout() {
        let tmp = TempDir::new().unwrap();
        make_project(&tmp.path().join("beta-api"));
        make_project(&tmp.path().join("alpha-api"));
        fs::create_dir_all(tmp.path().join("not-a-project/docs")).unwrap();

        let projects = ProjectLocator::default().locate(tmp.path());
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["alpha-api", "beta-api"]);
        assert!(projects.iter().all(|p| p.source == LOCAL_SOURCE));
    }

    #[test]
    fn test_hierarchical_layout() {
        let tmp = TempDir::new().unwrap();
        make_project(&tmp.path().join("github.com/acme/orders"));
        make_project(&tmp.path().join("gitlab.com/acme/billing"));

        let projects = ProjectLocator::default().locate(tmp.path());
        assert_eq!(projects.len(), 2);
        assert_eq!(projects[0].display_path, "github.com/acme/orders");
        assert_eq!(projects[0].source, "github.com/acme");
        assert_eq!(projects[1].name, "billing");
    }

    #[test]
    fn test_hidden_and_deep_directories_skipped() {
        let tmp = TempDir::new().unwrap();
        make_project(&tmp.path().join(".cache/orders"));
        make_project(&tmp.path().join("a/b/c/too-deep"));
        make_project(&tmp.path().join("visible"));

        let projects = ProjectLocator::default().locate(tmp.path());
        let names: Vec<_> = projects.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["visible"]);
    }

    #[test]
    fn test_projects_do_not_nest() {
        let tmp = TempDir::new().unwrap();
        make_project(&tmp.path().join("outer"));
        make_project(&tmp.path().join("outer/inner"));

        let projects = ProjectLocator::default().locate(tmp.path());
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "outer");
    }

    fn descriptor(path: &str) -> ProjectDescriptor {
        let name = path.rsplit('/').next().unwrap().to_string();
        ProjectDescriptor {
            root: PathBuf::from("/repos").join(path),
            name,
            display_path: path.to_string(),
            source: LOCAL_SOURCE.to_string(),
        }
    }

    #[test]
    fn test_filter_by_name_or_path() {
        let all = vec![
            descriptor("host/acme/orders"),
            descriptor("billing"),
            descriptor("shipping"),
        ];

        let kept = filter_projects(
            all.clone(),
            &["orders".to_string(), "billing".to_string()],
        )
        .unwrap();
        assert_eq!(kept.len(), 2);

        let kept = filter_projects(all.clone(), &["host/acme/orders".to_string()]).unwrap();
        assert_eq!(kept[0].name, "orders");

        let kept = filter_projects(all, &[]).unwrap();
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_empty_filter_result_is_config_error() {
        let err = filter_projects(vec![descriptor("billing")], &["nope".to_string()]).unwrap_err();
        assert!(matches!(err, AssessError::Config(_)));
    }
}
