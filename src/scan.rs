//! Finding the test scripts in a freshly cloned corpus.
//!
//! Only the top level of the clone is looked at. An entry is a test script
//! when it is a regular file (symlinks are followed) whose name ends with the
//! configured suffix and has something left once the suffix is removed.
//! Everything else is skipped silently.

use crate::error::{Step, UpdateError};
use std::fs;
use std::path::{Path, PathBuf};

/// A test script and the name its converted output is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestScript {
    pub path: PathBuf,
    pub base_name: String,
}

/// Strip `suffix` from `file_name`, yielding the base name.
///
/// Returns `None` when the suffix is absent or nothing would be left.
pub fn base_name<'a>(file_name: &'a str, suffix: &str) -> Option<&'a str> {
    match file_name.strip_suffix(suffix) {
        Some(stem) if !stem.is_empty() => Some(stem),
        _ => None,
    }
}

/// List the test scripts directly inside `dir`, sorted by file name.
pub fn find_scripts(dir: &Path, suffix: &str) -> Result<Vec<TestScript>, UpdateError> {
    let entries = fs::read_dir(dir).map_err(|e| UpdateError::io(Step::Enumerate, dir, e))?;

    let mut scripts = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| UpdateError::io(Step::Enumerate, dir, e))?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(stem) = base_name(name, suffix) else {
            continue;
        };

        let path = entry.path();
        // metadata() follows symlinks; a dangling link is simply not a file.
        let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
        if is_file {
            scripts.push(TestScript {
                base_name: stem.to_string(),
                path,
            });
        }
    }

    scripts.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
    Ok(scripts)
}
