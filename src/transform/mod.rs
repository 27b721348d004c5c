//! Transformation script analysis.
//!
//! Rates DataWeave scripts, both external `.dwl` files and blocks embedded in
//! configuration elements, on a low / medium / high tier from their size,
//! operator count and bracket nesting.

mod metrics;

pub use metrics::{measure, measure_inline, ScriptMetrics};

use crate::config::TransformThresholds;
use crate::error::AssessError;
use crate::model::{Finding, SourceLocation, TransformOrigin, TransformScript, TransformTier};
use crate::utils::{relative_path, source_files};
use std::path::Path;

/// Extension of external transformation scripts
pub const SCRIPT_EXTENSION: &str = "dwl";

/// Elements whose text content is an inline transformation, as
/// `(namespace label, local name)`
pub const INLINE_TRANSFORM_TAGS: &[(&str, &str)] = &[
    ("ee", "set-payload"),
    ("ee", "set-variable"),
    ("ee", "set-attributes"),
    ("dw", "set-payload"),
    ("dw", "set-variable"),
    ("dw", "set-property"),
    ("dw", "set-session-variable"),
];

/// Whether an element holds an inline transformation
#[must_use]
pub fn is_inline_transform(label: &str, local: &str) -> bool {
    INLINE_TRANSFORM_TAGS
        .iter()
        .any(|(l, n)| *l == label && *n == local)
}

/// Rates transformation scripts against configured thresholds.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformAnalyzer {
    thresholds: TransformThresholds,
}

impl TransformAnalyzer {
    #[must_use]
    pub const fn new(thresholds: TransformThresholds) -> Self {
        Self { thresholds }
    }

    /// Tier for a set of measurements.
    #[must_use]
    pub fn tier(&self, metrics: &ScriptMetrics) -> TransformTier {
        let t = &self.thresholds;
        if metrics.lines >= t.high_min_lines
            || metrics.operators >= t.high_min_operators
            || metrics.nesting_depth >= t.high_min_depth
        {
            TransformTier::High
        } else if metrics.lines < t.low_max_lines && metrics.operators < t.low_max_operators {
            TransformTier::Low
        } else {
            TransformTier::Medium
        }
    }

    fn script(
        &self,
        metrics: ScriptMetrics,
        location: SourceLocation,
        origin: TransformOrigin,
    ) -> TransformScript {
        TransformScript {
            location,
            origin,
            lines: metrics.lines,
            operators: metrics.operators,
            nesting_depth: metrics.nesting_depth,
            tier: self.tier(&metrics),
        }
    }

    /// Rate an inline block. Blocks holding only whitespace yield nothing.
    #[must_use]
    pub fn analyze_inline(&self, text: &str, location: SourceLocation) -> Option<TransformScript> {
        let metrics = measure_inline(text);
        (metrics.lines > 0).then(|| self.script(metrics, location, TransformOrigin::Inline))
    }

    /// Rate one external script file.
    pub fn analyze_file(&self, path: &Path, relative: &str) -> Result<TransformScript, AssessError> {
        let bytes = std::fs::read(path).map_err(|e| AssessError::io(path, e))?;
        let source = String::from_utf8_lossy(&bytes);
        Ok(self.script(
            measure(&source),
            SourceLocation::file(relative),
            TransformOrigin::External,
        ))
    }

    /// Rate every external script under the project's `src/main`.
    ///
    /// Unreadable scripts are recorded in `findings` and skipped.
    pub fn analyze_project(&self, root: &Path, findings: &mut Vec<Finding>) -> Vec<TransformScript> {
        let (files, errors) = source_files(&root.join("src/main"), &[SCRIPT_EXTENSION]);
        for (path, err) in &errors {
            findings.push(Finding::from_error(relative_path(root, path), err));
        }

        let mut scripts = Vec::with_capacity(files.len());
        for file in files {
            let relative = relative_path(root, &file);
            match self.analyze_file(&file, &relative) {
                Ok(script) => {
                    tracing::debug!(
                        "{relative}: {} lines, {} operators, tier {}",
                        script.lines,
                        script.operators,
                        script.tier
                    );
                    scripts.push(script);
                }
                Err(err) => {
                    tracing::warn!("Skipping transformation {relative}: {err}");
                    findings.push(Finding::from_error(relative, &err));
                }
            }
        }
        scripts
    }
}
