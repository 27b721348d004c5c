//! Configuration validation for mule-assess.
//!
//! Provides validation traits and implementations for all configuration types.

use super::types::{
    AssessConfig, CategoryScales, CategoryWeights, OutputConfig, PortfolioConfig, ScanConfig,
    ScoringConfig, TierCutoffs, TransformThresholds,
};

// ============================================================================
// Configuration Error
// ============================================================================

/// Error type for configuration validation.
#[derive(Debug, Clone)]
pub struct ConfigError {
    /// The field that failed validation
    pub field: String,
    /// Description of the validation error
    pub message: String,
}

impl ConfigError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Validation Trait
// ============================================================================

/// Trait for validatable configuration types.
pub trait Validatable {
    /// Validate the configuration, returning any errors found.
    fn validate(&self) -> Vec<ConfigError>;

    /// Check if the configuration is valid.
    fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }
}

// ============================================================================
// Validation Implementations
// ============================================================================

impl Validatable for AssessConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.scan.validate());
        errors.extend(self.scoring.validate());
        errors.extend(self.transform.validate());
        errors.extend(self.portfolio.validate());
        errors.extend(self.output.validate());
        errors
    }
}

impl Validatable for ScanConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if !self.root.exists() {
            errors.push(ConfigError::new(
                "scan.root",
                format!("Root directory does not exist: {}", self.root.display()),
            ));
        } else if !self.root.is_dir() {
            errors.push(ConfigError::new(
                "scan.root",
                format!("Root is not a directory: {}", self.root.display()),
            ));
        }

        if !(1..=8).contains(&self.max_depth) {
            errors.push(ConfigError::new(
                "scan.max_depth",
                format!("Max depth must be between 1 and 8, got {}", self.max_depth),
            ));
        }

        if self.large_file_lines == 0 {
            errors.push(ConfigError::new(
                "scan.large_file_lines",
                "Large-file threshold must be at least 1",
            ));
        }

        if self.complex_flow_components == 0 {
            errors.push(ConfigError::new(
                "scan.complex_flow_components",
                "Complex-flow threshold must be at least 1",
            ));
        }

        if self.jobs == Some(0) {
            errors.push(ConfigError::new("scan.jobs", "Jobs must be at least 1"));
        }

        if self.projects.iter().any(|p| p.trim().is_empty()) {
            errors.push(ConfigError::new(
                "scan.projects",
                "Project filter entries must not be empty",
            ));
        }

        errors
    }
}

impl Validatable for ScoringConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        errors.extend(self.weights.validate());
        errors.extend(self.scales.validate());
        errors.extend(self.tiers.validate());

        if !(0.0..=1.0).contains(&self.low_coverage_threshold) {
            errors.push(ConfigError::new(
                "scoring.low_coverage_threshold",
                format!(
                    "Threshold must be between 0.0 and 1.0, got {}",
                    self.low_coverage_threshold
                ),
            ));
        }

        if self.default_connector_weight == 0 {
            errors.push(ConfigError::new(
                "scoring.default_connector_weight",
                "Default connector weight must be at least 1",
            ));
        }

        for (connector, weight) in &self.connector_weights {
            if *weight == 0 {
                errors.push(ConfigError::new(
                    "scoring.connector_weights",
                    format!("Weight for '{connector}' must be at least 1"),
                ));
            }
        }

        errors
    }
}

impl Validatable for CategoryWeights {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let all = [
            ("connectors", self.connectors),
            ("custom_code", self.custom_code),
            ("transformation", self.transformation),
            ("structure", self.structure),
        ];

        for (name, weight) in all {
            if !(0.0..=1.0).contains(&weight) {
                errors.push(ConfigError::new(
                    &format!("scoring.weights.{name}"),
                    format!("Weight must be between 0.0 and 1.0, got {weight}"),
                ));
            }
        }

        if (self.total() - 1.0).abs() > 1e-6 {
            errors.push(ConfigError::new(
                "scoring.weights",
                format!("Weights must sum to 1.0, got {:.4}", self.total()),
            ));
        }

        errors
    }
}

impl Validatable for CategoryScales {
    fn validate(&self) -> Vec<ConfigError> {
        [
            ("connectors", self.connectors),
            ("custom_code", self.custom_code),
            ("transformation", self.transformation),
            ("structure", self.structure),
        ]
        .into_iter()
        .filter(|(_, scale)| !scale.is_finite() || *scale <= 0.0)
        .map(|(name, scale)| {
            ConfigError::new(
                &format!("scoring.scales.{name}"),
                format!("Scale must be positive, got {scale}"),
            )
        })
        .collect()
    }
}

impl Validatable for TierCutoffs {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let ordered = 0.0 < self.medium && self.medium < self.high && self.high < self.critical;
        if !ordered || self.critical > 100.0 {
            errors.push(ConfigError::new(
                "scoring.tiers",
                format!(
                    "Cut-offs must satisfy 0 < medium < high < critical <= 100, got {}/{}/{}",
                    self.medium, self.high, self.critical
                ),
            ));
        }
        errors
    }
}

impl Validatable for TransformThresholds {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.low_max_lines > self.high_min_lines {
            errors.push(ConfigError::new(
                "transform.low_max_lines",
                format!(
                    "Low line bound ({}) exceeds high line bound ({})",
                    self.low_max_lines, self.high_min_lines
                ),
            ));
        }
        if self.low_max_operators > self.high_min_operators {
            errors.push(ConfigError::new(
                "transform.low_max_operators",
                format!(
                    "Low operator bound ({}) exceeds high operator bound ({})",
                    self.low_max_operators, self.high_min_operators
                ),
            ));
        }
        if self.high_min_depth == 0 {
            errors.push(ConfigError::new(
                "transform.high_min_depth",
                "Depth threshold must be at least 1",
            ));
        }

        errors
    }
}

impl Validatable for PortfolioConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.top_n == 0 {
            errors.push(ConfigError::new("portfolio.top_n", "Top-N must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.custom_code_ratio_threshold) {
            errors.push(ConfigError::new(
                "portfolio.custom_code_ratio_threshold",
                format!(
                    "Ratio must be between 0.0 and 1.0, got {}",
                    self.custom_code_ratio_threshold
                ),
            ));
        }

        errors
    }
}

impl Validatable for OutputConfig {
    fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        if self.dir.as_os_str().is_empty() {
            errors.push(ConfigError::new("output.dir", "Output directory must not be empty"));
        } else if self.dir.exists() && !self.dir.is_dir() {
            errors.push(ConfigError::new(
                "output.dir",
                format!("Output path exists and is not a directory: {}", self.dir.display()),
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AssessConfig::default();
        let errors = config.validate();
        assert!(errors.is_empty(), "{errors:?}");
    }

    #[test]
    fn test_missing_root() {
        let config = AssessConfig::builder()
            .root("/definitely/not/a/real/dir")
            .build();
        let errors = config.validate();
        assert!(errors.iter().any(|e| e.field == "scan.root"));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let weights = CategoryWeights {
            connectors: 0.5,
            custom_code: 0.5,
            transformation: 0.5,
            structure: 0.0,
        };
        let errors = weights.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "scoring.weights");
    }

    #[test]
    fn test_unordered_cutoffs() {
        let tiers = TierCutoffs {
            medium: 50.0,
            high: 40.0,
            critical: 75.0,
        };
        assert!(!tiers.is_valid());
    }

    #[test]
    fn test_zero_jobs_and_scale() {
        let mut config = AssessConfig::default();
        config.scan.jobs = Some(0);
        config.scan.complex_flow_components = 0;
        config.scoring.scales.structure = 0.0;
        let fields: Vec<_> = config.validate().into_iter().map(|e| e.field).collect();
        assert!(fields.contains(&"scan.jobs".to_string()));
        assert!(fields.contains(&"scan.complex_flow_components".to_string()));
        assert!(fields.contains(&"scoring.scales.structure".to_string()));
    }

    #[test]
    fn test_inverted_transform_thresholds() {
        let thresholds = TransformThresholds {
            low_max_lines: 200,
            ..TransformThresholds::default()
        };
        let errors = thresholds.validate();
        assert_eq!(errors[0].field, "transform.low_max_lines");
    }

    #[test]
    fn test_error_display() {
        let err = ConfigError::new("portfolio.top_n", "Top-N must be at least 1");
        assert_eq!(err.to_string(), "portfolio.top_n: Top-N must be at least 1");
    }
}
