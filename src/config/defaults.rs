//! Default values and presets for mule-assess.
//!
//! Provides named presets for common assessment postures and default values.

use super::types::{
    AssessConfig, OutputConfig, PortfolioConfig, ScanConfig, ScoringConfig, TierCutoffs,
    TransformThresholds,
};

// ============================================================================
// Default Values
// ============================================================================

/// Report directory used when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "report_output";

/// Maximum depth below the scan root searched for projects
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Files longer than this are size outliers
pub const DEFAULT_LARGE_FILE_LINES: usize = 1000;

/// Flows with more components than this are complex
pub const DEFAULT_COMPLEX_FLOW_COMPONENTS: usize = 50;

/// Weight for connector types absent from the built-in table
pub const DEFAULT_CONNECTOR_WEIGHT: u32 = 2;

/// Connectors at or above this weight count as heavy
pub const DEFAULT_HEAVY_CONNECTOR_WEIGHT: u32 = 4;

/// Test coverage below this ratio is a testing risk
pub const DEFAULT_LOW_COVERAGE: f64 = 0.5;

/// Custom-code project share above which a portfolio review is advised
pub const DEFAULT_CUSTOM_CODE_RATIO: f64 = 0.30;

/// Length of each top-N ranking
pub const DEFAULT_TOP_N: usize = 10;

// ============================================================================
// Configuration Presets
// ============================================================================

/// Named configuration presets for common assessment postures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigPreset {
    /// Balanced thresholds suitable for most portfolios
    Default,
    /// Lower cut-offs and tighter thresholds; surfaces more risk
    Strict,
    /// Higher cut-offs for portfolios dominated by large applications
    Lenient,
}

impl ConfigPreset {
    /// Get the preset name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Strict => "strict",
            Self::Lenient => "lenient",
        }
    }

    /// Parse a preset from a string name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "default" | "balanced" => Some(Self::Default),
            "strict" | "conservative" => Some(Self::Strict),
            "lenient" | "permissive" => Some(Self::Lenient),
            _ => None,
        }
    }

    /// Get a description of this preset.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Default => "Balanced thresholds suitable for most portfolios",
            Self::Strict => "Lower tier cut-offs and tighter size thresholds",
            Self::Lenient => "Higher tier cut-offs for large, mature applications",
        }
    }

    /// Get all available presets.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Default, Self::Strict, Self::Lenient]
    }
}

impl std::fmt::Display for ConfigPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Preset Implementations
// ============================================================================

impl AssessConfig {
    /// Create an `AssessConfig` from a named preset.
    #[must_use]
    pub fn from_preset(preset: ConfigPreset) -> Self {
        match preset {
            ConfigPreset::Default => Self::default(),
            ConfigPreset::Strict => Self::strict_preset(),
            ConfigPreset::Lenient => Self::lenient_preset(),
        }
    }

    /// Strict preset.
    ///
    /// - Tiers start at 20/40/60
    /// - Files over 500 lines and flows over 30 components are outliers
    /// - Scripts reach high at 60 lines or 25 operators
    #[must_use]
    pub fn strict_preset() -> Self {
        Self {
            scan: ScanConfig {
                large_file_lines: 500,
                complex_flow_components: 30,
                ..ScanConfig::default()
            },
            scoring: ScoringConfig {
                tiers: TierCutoffs {
                    medium: 20.0,
                    high: 40.0,
                    critical: 60.0,
                },
                low_coverage_threshold: 0.7,
                ..ScoringConfig::default()
            },
            transform: TransformThresholds {
                low_max_lines: 15,
                low_max_operators: 8,
                high_min_lines: 60,
                high_min_operators: 25,
                high_min_depth: 6,
            },
            portfolio: PortfolioConfig {
                custom_code_ratio_threshold: 0.20,
                ..PortfolioConfig::default()
            },
            output: OutputConfig::default(),
        }
    }

    /// Lenient preset.
    ///
    /// - Tiers start at 30/55/80
    /// - Files over 2000 lines are outliers
    #[must_use]
    pub fn lenient_preset() -> Self {
        Self {
            scan: ScanConfig {
                large_file_lines: 2000,
                ..ScanConfig::default()
            },
            scoring: ScoringConfig {
                tiers: TierCutoffs {
                    medium: 30.0,
                    high: 55.0,
                    critical: 80.0,
                },
                low_coverage_threshold: 0.3,
                ..ScoringConfig::default()
            },
            transform: TransformThresholds {
                low_max_lines: 30,
                low_max_operators: 15,
                high_min_lines: 150,
                high_min_operators: 60,
                high_min_depth: 10,
            },
            portfolio: PortfolioConfig {
                custom_code_ratio_threshold: 0.50,
                ..PortfolioConfig::default()
            },
            output: OutputConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Validatable;

    #[test]
    fn test_preset_names() {
        for preset in ConfigPreset::all() {
            assert_eq!(ConfigPreset::from_name(preset.name()), Some(*preset));
            assert!(!preset.description().is_empty());
        }
        assert_eq!(ConfigPreset::from_name("permissive"), Some(ConfigPreset::Lenient));
        assert_eq!(ConfigPreset::from_name("nope"), None);
    }

    #[test]
    fn test_presets_are_valid() {
        for preset in ConfigPreset::all() {
            let config = AssessConfig::from_preset(*preset);
            assert!(config.is_valid(), "{preset} preset failed validation");
        }
    }

    #[test]
    fn test_strict_is_stricter() {
        let strict = AssessConfig::strict_preset();
        let default = AssessConfig::default();
        assert!(strict.scoring.tiers.critical < default.scoring.tiers.critical);
        assert!(strict.scan.large_file_lines < default.scan.large_file_lines);
    }
}
