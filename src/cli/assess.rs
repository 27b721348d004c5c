//! Assess command handler.
//!
//! Resolves the effective configuration, runs the assessment and writes the
//! report artifacts.

use crate::config::{AssessConfig, ConfigOverrides, Validatable};
use crate::pipeline::{exit_codes, run_assessment, write_reports};
use anyhow::{bail, Context, Result};
use std::path::Path;

/// Build and validate the effective configuration.
///
/// Preset, config file and CLI overrides are layered in that order. Every
/// validation problem is reported in the returned error.
pub fn resolve_config(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<AssessConfig> {
    let (config, loaded_from) =
        AssessConfig::resolve(config_path, overrides).context("Failed to load configuration")?;
    if let Some(path) = loaded_from {
        tracing::debug!("Loaded configuration from {}", path.display());
    }

    let errors = config.validate();
    if !errors.is_empty() {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        bail!("Invalid configuration:\n  {}", details.join("\n  "));
    }
    Ok(config)
}

/// Run the assessment, returning the desired exit code.
///
/// Configuration and report-writing failures are logged and mapped to their
/// exit codes; absorbed per-project findings never change the exit code.
///
/// The caller is responsible for calling `std::process::exit()` with the
/// returned code when it is non-zero.
#[allow(clippy::needless_pass_by_value)]
pub fn run_assess(config: AssessConfig, quiet: bool) -> Result<i32> {
    let report = match run_assessment(&config) {
        Ok(report) => report,
        Err(err) => {
            tracing::error!("{err}");
            return Ok(err.exit_code());
        }
    };

    let written = match write_reports(&report, &config.output) {
        Ok(written) => written,
        Err(err) => {
            tracing::error!("{err:#}");
            return Ok(err.exit_code());
        }
    };

    if !quiet {
        let agg = &report.aggregate;
        println!(
            "Assessed {} project(s): average score {:.2}, {} high/critical, {} recommendation(s)",
            agg.project_count,
            agg.average_score,
            agg.tier_histogram.elevated(),
            agg.recommendations.len()
        );
        println!(
            "Reports written to {} ({} file(s))",
            config.output.dir.display(),
            written.files.len()
        );
    }
    Ok(exit_codes::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_missing_root_fails_validation() {
        let overrides = ConfigOverrides {
            root: Some("/definitely/not/here".into()),
            ..ConfigOverrides::default()
        };
        let err = resolve_config(None, &overrides).unwrap_err();
        assert!(err.to_string().contains("Invalid configuration"));
    }

    #[test]
    fn test_run_assess_exit_codes() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("repos");
        let project = root.join("orders");
        fs::create_dir_all(project.join("src/main/mule")).unwrap();
        fs::write(project.join("pom.xml"), "<project/>").unwrap();
        fs::write(
            project.join("src/main/mule/app.xml"),
            "<mule xmlns=\"http://www.mulesoft.org/schema/mule/core\"><flow name=\"f\"/></mule>",
        )
        .unwrap();

        let config = AssessConfig::builder()
            .root(&root)
            .output_dir(tmp.path().join("out"))
            .build();
        assert_eq!(run_assess(config.clone(), true).unwrap(), exit_codes::SUCCESS);
        assert!(tmp.path().join("out/assessment.json").is_file());

        let filtered = AssessConfig::builder()
            .root(&root)
            .projects(vec!["nope".to_string()])
            .output_dir(tmp.path().join("out2"))
            .build();
        assert_eq!(run_assess(filtered, true).unwrap(), exit_codes::CONFIG_ERROR);
    }
}
