//! Configuration file loading and discovery.
//!
//! Supports loading configuration from YAML files with automatic discovery.

use super::defaults::ConfigPreset;
use super::types::AssessConfig;
use std::path::{Path, PathBuf};

// ============================================================================
// Configuration File Discovery
// ============================================================================

/// Standard config file names to search for.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    ".mule-assess.yaml",
    ".mule-assess.yml",
    "mule-assess.yaml",
    "mule-assess.yml",
];

/// Discover a config file by searching standard locations.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Current directory
/// 3. User config directory (~/.config/mule-assess/)
#[must_use]
pub fn discover_config_file(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then(|| path.to_path_buf());
    }

    if let Some(path) = std::env::current_dir()
        .ok()
        .and_then(|cwd| find_config_in_dir(&cwd))
    {
        return Some(path);
    }

    dirs::config_dir().and_then(|dir| find_config_in_dir(&dir.join("mule-assess")))
}

/// Find a config file in a specific directory.
fn find_config_in_dir(dir: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}

// ============================================================================
// Configuration File Loading
// ============================================================================

/// Error type for config file operations.
#[derive(Debug)]
pub enum ConfigFileError {
    /// File not found
    NotFound(PathBuf),
    /// IO error reading file
    Io(std::io::Error),
    /// YAML parsing error
    Parse(serde_yaml::Error),
    /// Unknown preset name
    UnknownPreset(String),
}

impl std::fmt::Display for ConfigFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => {
                write!(f, "Config file not found: {}", path.display())
            }
            Self::Io(e) => write!(f, "Failed to read config file: {e}"),
            Self::Parse(e) => write!(f, "Failed to parse config file: {e}"),
            Self::UnknownPreset(name) => {
                let valid: Vec<_> = ConfigPreset::all().iter().map(ConfigPreset::name).collect();
                write!(
                    f,
                    "Unknown preset '{name}'. Valid options: {}",
                    valid.join(", ")
                )
            }
        }
    }
}

impl std::error::Error for ConfigFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::NotFound(_) | Self::UnknownPreset(_) => None,
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ConfigFileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_yaml::Error> for ConfigFileError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Parse(err)
    }
}

/// Load an `AssessConfig` from a YAML file.
pub fn load_config_file(path: &Path) -> Result<AssessConfig, ConfigFileError> {
    load_config_file_over(path, &AssessConfig::default())
}

/// Load a YAML file on top of `base`.
///
/// Keys present in the file replace the base value; nested sections merge
/// key by key, so a file that sets one threshold keeps every other base value.
pub fn load_config_file_over(
    path: &Path,
    base: &AssessConfig,
) -> Result<AssessConfig, ConfigFileError> {
    if !path.exists() {
        return Err(ConfigFileError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let overlay: serde_yaml::Value = serde_yaml::from_str(&content)?;
    let mut merged = serde_yaml::to_value(base)?;
    merge_yaml(&mut merged, overlay);
    Ok(serde_yaml::from_value(merged)?)
}

/// Overlay `overlay` onto `base`, recursing into mappings.
fn merge_yaml(base: &mut serde_yaml::Value, overlay: serde_yaml::Value) {
    match (base, overlay) {
        (serde_yaml::Value::Mapping(base_map), serde_yaml::Value::Mapping(overlay_map)) => {
            for (key, value) in overlay_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_yaml(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (_, serde_yaml::Value::Null) => {}
        (slot, value) => *slot = value,
    }
}

/// Load config from discovered file, or return default.
///
/// A discovered file that fails to load is logged and ignored.
#[must_use]
pub fn load_or_default(explicit_path: Option<&Path>) -> (AssessConfig, Option<PathBuf>) {
    load_or_base(explicit_path, AssessConfig::default())
}

/// Load a discovered file over `base`, falling back to `base` itself.
fn load_or_base(explicit_path: Option<&Path>, base: AssessConfig) -> (AssessConfig, Option<PathBuf>) {
    match discover_config_file(explicit_path) {
        Some(path) => match load_config_file_over(&path, &base) {
            Ok(config) => (config, Some(path)),
            Err(e) => {
                tracing::warn!("Failed to load config from {}: {}", path.display(), e);
                (base, None)
            }
        },
        None => (base, None),
    }
}

// ============================================================================
// Command-line Overrides
// ============================================================================

/// Values given on the command line; each one set replaces the file value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub projects: Vec<String>,
    pub output_dir: Option<PathBuf>,
    pub individual_files: bool,
    pub jobs: Option<usize>,
    pub preset: Option<String>,
}

impl AssessConfig {
    /// Apply command-line overrides over this config.
    pub fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(root) = &overrides.root {
            self.scan.root.clone_from(root);
        }
        if !overrides.projects.is_empty() {
            self.scan.projects.clone_from(&overrides.projects);
        }
        if let Some(dir) = &overrides.output_dir {
            self.output.dir.clone_from(dir);
        }
        if overrides.individual_files {
            self.output.individual_files = true;
        }
        if overrides.jobs.is_some() {
            self.scan.jobs = overrides.jobs;
        }
    }

    /// Resolve the effective configuration for a run.
    ///
    /// The base is the named preset (or the defaults). A config file, when
    /// one is found, is layered over it key by key, and command-line
    /// overrides are applied last. An explicit config path that cannot be
    /// loaded is an error.
    pub fn resolve(
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<(Self, Option<PathBuf>), ConfigFileError> {
        let base = match overrides.preset.as_deref() {
            Some(name) => ConfigPreset::from_name(name)
                .map(Self::from_preset)
                .ok_or_else(|| ConfigFileError::UnknownPreset(name.to_string()))?,
            None => Self::default(),
        };

        let (mut config, loaded_from) = match config_path {
            Some(path) => (load_config_file_over(path, &base)?, Some(path.to_path_buf())),
            None => load_or_base(None, base),
        };

        config.apply_overrides(overrides);
        Ok((config, loaded_from))
    }
}

// ============================================================================
// Example Config Generation
// ============================================================================

/// Generate an example config file content.
#[must_use]
pub fn generate_example_config() -> String {
    let example = AssessConfig::default();
    format!(
        r"# mule-assess configuration
# Place this file at .mule-assess.yaml in the working directory or ~/.config/mule-assess/

{}
",
        serde_yaml::to_string(&example).unwrap_or_default()
    )
}
