//! mule-assess: Static migration-complexity assessment for MuleSoft portfolios

#![allow(clippy::needless_pass_by_value)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mule_assess::{
    cli::{self, SchemaKind},
    config::ConfigOverrides,
    pipeline::exit_codes,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Build long version string with supported input info
const fn build_long_version() -> &'static str {
    concat!(
        env!("CARGO_PKG_VERSION"),
        "\n\nRecognized Projects:",
        "\n  Mule 4 (pom.xml, mule-artifact.json)",
        "\n  Mule 3 (pom.xml, mule-project.xml)",
        "\n\nReport Artifacts:",
        "\n  assessment.json, summary.txt, comprehensive.txt, projects/*.json",
    )
}

#[derive(Parser)]
#[command(name = "mule-assess")]
#[command(author = "EPI-USE America")]
#[command(version, long_version = build_long_version())]
#[command(subcommand_negates_reqs = true)]
#[command(
    about = "Static migration-complexity assessment for MuleSoft integration portfolios",
    long_about = None
)]
#[command(after_help = "EXIT CODES:
    0  Assessment completed (unparsable files are reported, not fatal)
    2  Invalid configuration, missing root, or a filter matching no project
    3  Reports could not be written

EXAMPLES:
    # Assess every project under a directory
    mule-assess ./repos

    # Write reports elsewhere, one JSON document per project as well
    mule-assess ./repos -o out --individual-files

    # Assess two projects with the strict preset on four workers
    mule-assess ./repos -p orders-api,billing --preset strict -j 4

    # Show the configuration a run would use
    mule-assess config show --preset strict")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Directory containing the Mule projects to assess
    #[arg(required = true)]
    root: Option<PathBuf>,

    /// Directory the reports are written to [default: report_output]
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Also write one JSON document per project under projects/
    #[arg(long)]
    individual_files: bool,

    /// Only assess the named projects (name or display path; comma-separated or repeated)
    #[arg(short, long, value_name = "NAME", value_delimiter = ',')]
    projects: Vec<String>,

    /// Worker threads (defaults to the number of CPUs)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Path to configuration file
    #[arg(long, global = true, env = "MULE_ASSESS_CONFIG")]
    config: Option<PathBuf>,

    /// Configuration preset (default, strict, lenient)
    #[arg(long, global = true)]
    preset: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Show, discover, or initialize configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Sub-subcommands for the `config` command
#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (preset, then file)
    Show,
    /// Print config file search paths and the discovered config file
    Path,
    /// Generate an example .mule-assess.yaml in the current directory
    Init,
    /// Print the JSON Schema of the config file or the JSON report
    Schema {
        /// Document to describe
        #[arg(value_enum, default_value = "config")]
        kind: SchemaKind,

        /// Write schema to file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    if let Some(Commands::Config { action }) = cli.command {
        return run_config(action, cli.config.as_deref(), cli.preset.as_deref());
    }

    let overrides = ConfigOverrides {
        root: cli.root,
        projects: cli.projects,
        output_dir: cli.output_dir,
        individual_files: cli.individual_files,
        jobs: cli.jobs,
        preset: cli.preset,
    };

    let config = match cli::resolve_config(cli.config.as_deref(), &overrides) {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("{err:#}");
            std::process::exit(exit_codes::CONFIG_ERROR);
        }
    };

    let exit_code = cli::run_assess(config, cli.quiet)?;
    if exit_code != exit_codes::SUCCESS {
        std::process::exit(exit_code);
    }
    Ok(())
}

fn run_config(
    action: ConfigAction,
    config_path: Option<&std::path::Path>,
    preset: Option<&str>,
) -> Result<()> {
    match action {
        ConfigAction::Show => {
            print!("{}", cli::show_config(config_path, preset)?);
        }
        ConfigAction::Path => eprintln!("{}", cli::config_paths(config_path)),
        ConfigAction::Init => {
            let cwd = std::env::current_dir().context("cannot determine current directory")?;
            let target = cli::init_config(&cwd)?;
            eprintln!("Created {}", target.display());
        }
        ConfigAction::Schema { kind, output } => {
            let schema = cli::render_schema(kind)?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &schema)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    eprintln!("Schema written to {}", path.display());
                }
                None => println!("{schema}"),
            }
        }
    }
    Ok(())
}
