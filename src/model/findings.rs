//! Per-artifact findings attached to a project.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where an artifact was found, relative to its project root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
pub struct SourceLocation {
    /// File path relative to the project root, `/`-separated
    pub path: String,
    /// Element trail inside the file (e.g. `flow[orders]/ee:transform`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl SourceLocation {
    /// Location of a whole file
    #[must_use]
    pub fn file(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: None,
        }
    }

    /// Location of an element within a file
    #[must_use]
    pub fn element(path: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            context: Some(context.into()),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{}#{}", self.path, ctx),
            None => write!(f, "{}", self.path),
        }
    }
}

// ============================================================================
// Custom code
// ============================================================================

/// Kind of custom logic that resists declarative migration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CustomCodeKind {
    /// Script text embedded in a configuration element
    EmbeddedScript,
    /// Standalone source file or a binding to a foreign-language class
    ForeignLanguage,
}

impl fmt::Display for CustomCodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmbeddedScript => write!(f, "embedded script"),
            Self::ForeignLanguage => write!(f, "foreign language"),
        }
    }
}

/// One block of custom code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CustomCodeFinding {
    pub kind: CustomCodeKind,
    /// Language or engine name (`java`, `groovy`, `mel`, ...)
    pub language: String,
    pub location: SourceLocation,
    /// Approximate size in lines, never below 1
    pub lines: usize,
}

// ============================================================================
// Transformations
// ============================================================================

/// Complexity tier of one transformation script
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum TransformTier {
    #[default]
    Low,
    Medium,
    High,
}

impl fmt::Display for TransformTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "low"),
            Self::Medium => write!(f, "medium"),
            Self::High => write!(f, "high"),
        }
    }
}

/// Whether a script lives in its own file or inside a configuration element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum TransformOrigin {
    External,
    Inline,
}

/// Complexity heuristics for one transformation script.
///
/// The script text itself is never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TransformScript {
    pub location: SourceLocation,
    pub origin: TransformOrigin,
    pub lines: usize,
    /// Keyword operators plus function-call sites
    pub operators: usize,
    /// Deepest bracket nesting outside strings and comments
    pub nesting_depth: usize,
    pub tier: TransformTier,
}

// ============================================================================
// Absorbed findings
// ============================================================================

/// Kind of a per-file finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FindingKind {
    /// File was read but failed to parse
    Unparsable,
    /// File could not be read at all
    Unreadable,
    /// File exceeds the size threshold; extraction still ran
    Oversized,
}

impl FindingKind {
    /// Whether the finding stands for a failure absorbed during extraction
    #[must_use]
    pub const fn is_absorbed_error(self) -> bool {
        matches!(self, Self::Unparsable | Self::Unreadable)
    }
}

impl fmt::Display for FindingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unparsable => write!(f, "unparsable"),
            Self::Unreadable => write!(f, "unreadable"),
            Self::Oversized => write!(f, "oversized"),
        }
    }
}

/// A file-level finding recorded instead of aborting the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub kind: FindingKind,
    pub location: SourceLocation,
    pub message: String,
}

impl Finding {
    #[must_use]
    pub fn new(kind: FindingKind, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            location: SourceLocation::file(path),
            message: message.into(),
        }
    }

    /// Build a finding from an error absorbed while processing `path`.
    ///
    /// IO failures become `unreadable`, everything else `unparsable`.
    #[must_use]
    pub fn from_error(path: impl Into<String>, err: &crate::error::AssessError) -> Self {
        let kind = match err {
            crate::error::AssessError::Io { .. } => FindingKind::Unreadable,
            _ => FindingKind::Unparsable,
        };
        Self::new(kind, path, err.to_string())
    }
}

/// Kind of source file, used to label size outliers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Configuration,
    Transform,
    CustomCode,
}

/// A file above the size threshold
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct OversizedFile {
    pub path: String,
    pub kind: SourceKind,
    pub lines: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AssessError;

    #[test]
    fn test_location_display() {
        assert_eq!(SourceLocation::file("a/b.xml").to_string(), "a/b.xml");
        assert_eq!(
            SourceLocation::element("a/b.xml", "flow[main]/ee:set-payload").to_string(),
            "a/b.xml#flow[main]/ee:set-payload"
        );
    }

    #[test]
    fn test_finding_from_error() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let finding = Finding::from_error("src/main/mule/a.xml", &AssessError::io("a.xml", io));
        assert_eq!(finding.kind, FindingKind::Unreadable);

        let finding = Finding::from_error(
            "src/main/mule/b.xml",
            &AssessError::invalid_xml("b.xml", "mismatched tag"),
        );
        assert_eq!(finding.kind, FindingKind::Unparsable);
        assert!(finding.kind.is_absorbed_error());
        assert!(!FindingKind::Oversized.is_absorbed_error());
    }

    #[test]
    fn test_tier_serialization() {
        let json = serde_json::to_string(&TransformTier::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let json = serde_json::to_string(&CustomCodeKind::EmbeddedScript).unwrap();
        assert_eq!(json, "\"embedded-script\"");
    }
}
