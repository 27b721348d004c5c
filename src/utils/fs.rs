//! Filesystem helpers shared by the scanners.

use crate::discovery::{has_extension, is_hidden};
use crate::error::AssessError;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Files under `dir` with one of the given extensions, in path order.
///
/// Hidden entries are skipped. Entries that cannot be read come back as
/// errors so the caller can record them; a missing `dir` yields nothing.
#[must_use]
pub fn source_files(
    dir: &Path,
    extensions: &[&str],
) -> (Vec<PathBuf>, Vec<(PathBuf, AssessError)>) {
    let mut files = Vec::new();
    let mut errors = Vec::new();
    if !dir.is_dir() {
        return (files, errors);
    }

    let walker = WalkDir::new(dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e));

    for item in walker {
        match item {
            Ok(entry) => {
                if entry.file_type().is_file()
                    && extensions.iter().any(|ext| has_extension(entry.path(), ext))
                {
                    files.push(entry.into_path());
                }
            }
            Err(err) => {
                let path = err.path().map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                let err = AssessError::io(path.clone(), io::Error::from(err));
                errors.push((path, err));
            }
        }
    }

    (files, errors)
}

/// `path` relative to `root`, `/`-separated.
#[must_use]
pub fn relative_path(root: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// Count lines in a file without holding it in memory.
///
/// A final line without a trailing newline still counts.
pub fn count_lines(path: &Path) -> io::Result<usize> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut lines = 0;
    let mut last = None;

    loop {
        let chunk = reader.fill_buf()?;
        if chunk.is_empty() {
            break;
        }
        lines += chunk.iter().filter(|&&b| b == b'\n').count();
        last = chunk.last().copied();
        let len = chunk.len();
        reader.consume(len);
    }

    if last.is_some_and(|b| b != b'\n') {
        lines += 1;
    }
    Ok(lines)
}
