//! Config command handlers: show, path, init and schema.

use crate::config::{
    discover_config_file, generate_example_config, generate_json_schema, AssessConfig,
    ConfigOverrides, CONFIG_FILE_NAMES,
};
use crate::reports::report_json_schema;
use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use std::path::{Path, PathBuf};

/// Document a schema is generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaKind {
    /// The `.mule-assess.yaml` configuration file
    Config,
    /// The `assessment.json` report
    Report,
}

/// Render the effective configuration as YAML.
///
/// The first line names the file it was loaded from, as a YAML comment.
pub fn show_config(config_path: Option<&Path>, preset: Option<&str>) -> Result<String> {
    let overrides = ConfigOverrides {
        preset: preset.map(str::to_string),
        ..ConfigOverrides::default()
    };
    let (config, loaded_from) =
        AssessConfig::resolve(config_path, &overrides).context("Failed to load configuration")?;
    let header = loaded_from.map_or_else(
        || "# No config file found; showing defaults".to_string(),
        |path| format!("# Loaded from: {}", path.display()),
    );
    let yaml = serde_yaml::to_string(&config).context("failed to serialize config")?;
    Ok(format!("{header}\n{yaml}"))
}

/// Describe where config files are looked for and which one is active.
#[must_use]
pub fn config_paths(config_path: Option<&Path>) -> String {
    let search_paths = [
        std::env::current_dir().ok(),
        dirs::config_dir().map(|p| p.join("mule-assess")),
    ];
    let mut lines = vec!["Config file search paths (in order):".to_string()];
    lines.extend(
        search_paths
            .into_iter()
            .flatten()
            .map(|path| format!("  {}", path.display())),
    );
    lines.push(String::new());
    lines.push("Recognized file names:".to_string());
    lines.extend(CONFIG_FILE_NAMES.iter().map(|name| format!("  {name}")));
    lines.push(String::new());
    lines.push(match discover_config_file(config_path) {
        Some(path) => format!("Active config file: {}", path.display()),
        None => "No config file found.".to_string(),
    });
    lines.join("\n")
}

/// Write an example `.mule-assess.yaml` into `dir`.
///
/// An existing file is never overwritten.
pub fn init_config(dir: &Path) -> Result<PathBuf> {
    let target = dir.join(CONFIG_FILE_NAMES[0]);
    if target.exists() {
        bail!(
            "{} already exists. Remove it first to re-initialize.",
            target.display()
        );
    }
    std::fs::write(&target, generate_example_config())
        .with_context(|| format!("failed to write {}", target.display()))?;
    Ok(target)
}

/// Render the JSON Schema for `kind`.
pub fn render_schema(kind: SchemaKind) -> Result<String> {
    let schema = match kind {
        SchemaKind::Config => generate_json_schema(),
        SchemaKind::Report => report_json_schema(),
    };
    schema.context("failed to generate schema")
}
