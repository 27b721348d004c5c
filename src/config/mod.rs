//! Configuration module for mule-assess.
//!
//! This module provides a unified configuration system with:
//! - Type-safe configuration structures
//! - Validation for all configuration values
//! - Named presets for common assessment postures
//! - YAML config file loading and discovery
//! - CLI argument merging
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use mule_assess::config::{AssessConfig, ConfigPreset};
//!
//! // Use defaults
//! let config = AssessConfig::default();
//!
//! // Use a preset
//! let config = AssessConfig::from_preset(ConfigPreset::Strict);
//!
//! // Use builder
//! let config = AssessConfig::builder()
//!     .root("/repos")
//!     .output_dir("report_output")
//!     .individual_files(true)
//!     .build();
//! ```
//!
//! # Configuration File
//!
//! Place a `.mule-assess.yaml` file in the working directory or
//! `~/.config/mule-assess/`:
//!
//! ```yaml
//! scan:
//!   large_file_lines: 1500
//! scoring:
//!   tiers:
//!     critical: 80
//!   connector_weights:
//!     sap: 6
//! ```

mod defaults;
pub mod file;
mod types;
mod validation;

// Re-export main types
pub use defaults::{
    ConfigPreset, DEFAULT_COMPLEX_FLOW_COMPONENTS, DEFAULT_CONNECTOR_WEIGHT,
    DEFAULT_CUSTOM_CODE_RATIO, DEFAULT_HEAVY_CONNECTOR_WEIGHT, DEFAULT_LARGE_FILE_LINES,
    DEFAULT_LOW_COVERAGE, DEFAULT_MAX_DEPTH, DEFAULT_OUTPUT_DIR, DEFAULT_TOP_N,
};
pub use types::{
    AssessConfig, AssessConfigBuilder, CategoryScales, CategoryWeights, OutputConfig,
    PortfolioConfig, ScanConfig, ScoringConfig, TierCutoffs, TransformThresholds,
};
pub use validation::{ConfigError, Validatable};

// Re-export file utilities
pub use file::{
    discover_config_file, generate_example_config, load_config_file, load_config_file_over,
    load_or_default, ConfigFileError, ConfigOverrides, CONFIG_FILE_NAMES,
};

/// Generate a JSON Schema for the `AssessConfig` configuration format.
///
/// This schema documents all configuration options that can be set in
/// `.mule-assess.yaml` config files.
pub fn generate_json_schema() -> Result<String, serde_json::Error> {
    let schema = schemars::schema_for!(AssessConfig);
    serde_json::to_string_pretty(&schema)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_schema_lists_sections() {
        let schema = generate_json_schema().unwrap();
        for section in ["scan", "scoring", "transform", "portfolio", "output"] {
            assert!(schema.contains(&format!("\"{section}\"")), "missing {section}");
        }
    }
}
