//! Pipeline orchestration for assessment runs.
//!
//! This module provides the locate → analyze → aggregate → report workflow
//! shared by the CLI handler and the integration tests.

mod analyze;
mod output;

pub use analyze::{flag_complex_flows, flag_oversized, run_assessment, ProjectAnalyzer};
pub use output::{write_reports, WrittenReports};

use crate::error::AssessError;

/// Structured pipeline error types for better diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The run cannot start: bad root, unmatched filter, worker pool failure
    #[error("Configuration error: {source}")]
    ConfigFailed {
        #[source]
        source: AssessError,
    },

    /// Report generation or output failed
    #[error("Report failed: {source}")]
    ReportFailed {
        #[source]
        source: anyhow::Error,
    },
}

impl PipelineError {
    /// Process exit code for this failure
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigFailed { .. } => exit_codes::CONFIG_ERROR,
            Self::ReportFailed { .. } => exit_codes::REPORT_ERROR,
        }
    }
}

impl From<AssessError> for PipelineError {
    fn from(source: AssessError) -> Self {
        Self::ConfigFailed { source }
    }
}

/// Exit codes for CI/CD integration
pub mod exit_codes {
    /// Success, including runs with absorbed per-project findings
    pub const SUCCESS: i32 = 0;
    /// Invalid invocation: missing root, unmatched filter, invalid config
    pub const CONFIG_ERROR: i32 = 2;
    /// Writing report artifacts failed
    pub const REPORT_ERROR: i32 = 3;
}
