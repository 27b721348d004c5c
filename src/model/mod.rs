//! Assessment data model.
//!
//! This module defines the result records produced by one assessment run.
//! A [`Project`] is created once per discovered project root, populated by the
//! scanner, transform analyzer and custom-code detector, and finalized by the
//! scorer. Reports only ever read these records.
//!
//! Every record is a plain serde value so the JSON report schema follows
//! directly from the types here:
//!
//! ```ignore
//! let project = ProjectAnalyzer::from_config(&config).analyze(&descriptor);
//! let json = serde_json::to_string_pretty(&project)?;
//! ```

mod findings;
mod project;
mod score;

pub use findings::*;
pub use project::*;
pub use score::*;

/// Version of the serialized report layout.
///
/// Bumped whenever a field is renamed or removed from any record in this
/// module.
pub const REPORT_SCHEMA_VERSION: &str = "1.0";

/// Round a value to two decimal places.
///
/// Scores and ratios are stored at this precision so that the JSON form is
/// stable and aggregate sums can be carried as exact hundredths.
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
