//! Shared utilities.

mod fs;
mod version;

pub use fs::{count_lines, relative_path, source_files};
pub use version::compare_versions;
