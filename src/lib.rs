//! **Static migration-complexity assessment for MuleSoft integration portfolios.**
//!
//! `mule-assess` scans a directory tree of Mule applications, extracts
//! structural facts from their configuration XML, DataWeave transformations,
//! embedded scripts and MUnit suites, and turns those facts into bounded
//! per-project complexity scores and a portfolio-wide view. Nothing is
//! executed or rewritten; the tool only reads files and writes reports.
//!
//! ## Core Concepts & Modules
//!
//! - **[`discovery`]**: [`ProjectLocator`] finds project roots by structural
//!   markers (a build descriptor plus `src/main/mule` or `src/main/app`).
//! - **[`scanner`]**: [`StructuralScanner`] streams configuration XML and
//!   build descriptors into flows, tag usage and connector operations.
//! - **[`transform`]**: [`TransformAnalyzer`] measures DataWeave scripts and
//!   rates them low, medium or high.
//! - **[`custom_code`]**: [`CustomCodeDetector`] flags embedded scripts and
//!   foreign-language sources that resist declarative migration.
//! - **[`scoring`]**: [`ComplexityScorer`] combines the facts into weighted
//!   category scores, an overall score and a risk tier.
//! - **[`portfolio`]**: [`PortfolioAggregator`] reduces scored projects into
//!   histograms, rankings and prioritised recommendations.
//! - **[`reports`]**: renders one [`AssessmentReport`] as JSON and text.
//! - **[`pipeline`]**: ties the stages together on a bounded worker pool.
//!
//! ## Getting Started
//!
//! ```no_run
//! use mule_assess::{config::AssessConfig, pipeline::{run_assessment, write_reports}};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AssessConfig::builder()
//!         .root("path/to/repos")
//!         .output_dir("report_output")
//!         .build();
//!
//!     let report = run_assessment(&config)?;
//!     for project in &report.projects {
//!         println!(
//!             "{}: {:.2} ({})",
//!             project.display_path, project.score.overall, project.score.tier
//!         );
//!     }
//!     write_reports(&report, &config.output)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Analyzing a Single Project
//!
//! ```no_run
//! use mule_assess::{config::AssessConfig, pipeline::ProjectAnalyzer, ProjectLocator};
//! use std::path::Path;
//!
//! let config = AssessConfig::default();
//! let analyzer = ProjectAnalyzer::from_config(&config);
//! for descriptor in ProjectLocator::new(config.scan.max_depth).locate(Path::new("repos")) {
//!     let project = analyzer.analyze(&descriptor);
//!     println!("{} flows, connectors {:?}", project.flows.len(), project.connectors);
//! }
//! ```

// Lint to discourage unwrap() in production code - prefer explicit error handling
#![warn(clippy::unwrap_used)]
// Pedantic lints: allow categories that are design choices for this codebase
#![allow(
    // Counts become f64 for ratios and scores; all values are bounded in practice
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    // Doc completeness: # Errors / # Panics sections are not written for every fn
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    // Report renderers write one section per block
    clippy::too_many_lines,
    // Config and flags structs legitimately carry several bools
    clippy::struct_excessive_bools,
    // Variable names like `flows`/`sub_flows` are clear in context
    clippy::similar_names
)]

pub mod cli;
pub mod config;
pub mod custom_code;
pub mod discovery;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod portfolio;
pub mod reports;
pub mod scanner;
pub mod scoring;
pub mod transform;
pub mod utils;

// Re-export main types for convenience
pub use config::{AssessConfig, AssessConfigBuilder, ConfigError, ConfigPreset, Validatable};
pub use custom_code::CustomCodeDetector;
pub use discovery::ProjectLocator;
pub use error::{AssessError, ErrorContext, Result};
pub use model::{ComplexityScore, Project, ProjectDescriptor, RiskTier};
pub use pipeline::{run_assessment, write_reports, PipelineError, ProjectAnalyzer};
pub use portfolio::{PortfolioAggregate, PortfolioAggregator};
pub use reports::{AssessmentReport, ReportFormat, ReportGenerator};
pub use scanner::StructuralScanner;
pub use scoring::ComplexityScorer;
pub use transform::TransformAnalyzer;
