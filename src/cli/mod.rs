//! CLI command handlers.
//!
//! This module provides testable command handlers that are invoked by main.rs.

mod assess;
mod config;

pub use assess::{resolve_config, run_assess};
pub use config::{config_paths, init_config, render_schema, show_config, SchemaKind};

// Re-export config types used by handlers
pub use crate::config::{AssessConfig, ConfigOverrides};
