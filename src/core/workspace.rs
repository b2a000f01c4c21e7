//! Project root discovery for the CLI.
//!
//! The core never discovers roots on its own; it is handed a [`RootPaths`]
//! built from whatever this module resolves.
//!
//! [`RootPaths`]: crate::core::store::RootPaths

use crate::core::config::CONFIG_FILE;
use crate::core::error::RecordkitError;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "RECORDKIT_ROOT";

/// Files whose presence marks a project root, checked in order.
pub const ROOT_MARKERS: [&str; 2] = [CONFIG_FILE, "CLAUDE.md"];

/// Resolve the project root.
///
/// An explicit directory wins, then `RECORDKIT_ROOT`, then an upward walk
/// from `start_dir` looking for a root marker.
pub fn resolve_project_root(
    explicit: Option<&Path>,
    start_dir: &Path,
) -> Result<PathBuf, RecordkitError> {
    if let Some(dir) = explicit {
        return existing_dir(dir);
    }
    if let Ok(dir) = std::env::var(ROOT_ENV) {
        if !dir.trim().is_empty() {
            return existing_dir(Path::new(&dir));
        }
    }
    find_project_root(start_dir)
}

fn existing_dir(dir: &Path) -> Result<PathBuf, RecordkitError> {
    if dir.is_dir() {
        Ok(dir.to_path_buf())
    } else {
        Err(RecordkitError::PathError(format!(
            "Project root is not a directory: {}",
            dir.display()
        )))
    }
}

/// Walk upward from `start_dir` until a directory holds a root marker.
pub fn find_project_root(start_dir: &Path) -> Result<PathBuf, RecordkitError> {
    let mut current_dir = start_dir.to_path_buf();
    loop {
        if ROOT_MARKERS.iter().any(|m| current_dir.join(m).is_file()) {
            return Ok(current_dir);
        }
        if !current_dir.pop() {
            return Err(RecordkitError::NotFound(format!(
                "Could not find project root (no {} found in current or parent directories)",
                ROOT_MARKERS.join(" or ")
            )));
        }
    }
}
