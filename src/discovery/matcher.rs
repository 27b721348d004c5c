//! Declarative structural matcher for project roots.

use crate::error::AssessError;
use std::path::Path;
use walkdir::{DirEntry, WalkDir};

/// Build or artifact descriptors that mark a project root
pub const DESCRIPTOR_FILES: &[&str] = &["pom.xml", "mule-artifact.json"];

/// Directory holding the configuration sources, relative to the root
pub const CONFIG_SOURCE_DIR: &str = "src/main/mule";

/// One required-path check against a candidate directory
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathPredicate {
    /// At least one of the named files exists directly in the candidate
    AnyFile(&'static [&'static str]),
    /// The relative directory exists
    Directory(&'static str),
    /// The relative directory contains a file with this extension, at any depth
    ContainsExtension {
        dir: &'static str,
        extension: &'static str,
    },
}

impl PathPredicate {
    /// Check the predicate, returning the reason on failure
    fn check(&self, candidate: &Path) -> Result<(), String> {
        match self {
            Self::AnyFile(names) => {
                if names.iter().any(|name| candidate.join(name).is_file()) {
                    Ok(())
                } else {
                    Err(format!("none of {} present", names.join(", ")))
                }
            }
            Self::Directory(dir) => {
                if candidate.join(dir).is_dir() {
                    Ok(())
                } else {
                    Err(format!("missing {dir}/"))
                }
            }
            Self::ContainsExtension { dir, extension } => {
                let found = WalkDir::new(candidate.join(dir))
                    .follow_links(false)
                    .into_iter()
                    .filter_entry(|e| !is_hidden(e))
                    .filter_map(Result::ok)
                    .any(|e| e.file_type().is_file() && has_extension(e.path(), extension));
                if found {
                    Ok(())
                } else {
                    Err(format!("no *.{extension} files under {dir}/"))
                }
            }
        }
    }
}

/// Dot-prefixed entry below the walk root; scanners skip these too
pub(crate) fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0 && entry.file_name().to_string_lossy().starts_with('.')
}

/// Case-insensitive extension check
pub(crate) fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(extension))
}

/// Ordered list of predicates; a candidate must satisfy all of them.
#[derive(Debug, Clone)]
pub struct StructuralMatcher {
    predicates: Vec<PathPredicate>,
}

impl StructuralMatcher {
    #[must_use]
    pub fn new(predicates: Vec<PathPredicate>) -> Self {
        Self { predicates }
    }

    /// Matcher for Mule application roots
    #[must_use]
    pub fn mule_project() -> Self {
        Self::new(vec![
            PathPredicate::AnyFile(DESCRIPTOR_FILES),
            PathPredicate::Directory(CONFIG_SOURCE_DIR),
            PathPredicate::ContainsExtension {
                dir: CONFIG_SOURCE_DIR,
                extension: "xml",
            },
        ])
    }

    /// Evaluate predicates in order, stopping at the first failure.
    pub fn check(&self, candidate: &Path) -> Result<(), AssessError> {
        for predicate in &self.predicates {
            predicate
                .check(candidate)
                .map_err(|reason| AssessError::discovery(candidate, reason))?;
        }
        Ok(())
    }

    #[must_use]
    pub fn matches(&self, candidate: &Path) -> bool {
        self.check(candidate).is_ok()
    }
}

impl Default for StructuralMatcher {
    fn default() -> Self {
        Self::mule_project()
    }
}
