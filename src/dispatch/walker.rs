use anyhow::{bail, Context, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const JSON_EXTENSION: &str = "json";

/// All regular files under `root` whose extension is exactly `json`.
///
/// Hidden files (name starting with `.`) are skipped. Symlinks count when
/// they resolve to a regular file; symlinked directories are not followed.
/// Entries are visited sorted by file name within each directory, so the
/// order is stable across runs and platforms.
pub fn discover_json_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        bail!("Data directory does not exist: {:?}", root);
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {:?}", root))?;
        let is_file = if entry.path_is_symlink() {
            entry.path().is_file()
        } else {
            entry.file_type().is_file()
        };
        if !is_file || is_hidden(entry.file_name()) {
            continue;
        }
        let is_json = entry
            .path()
            .extension()
            .map(|ext| ext == JSON_EXTENSION)
            .unwrap_or(false);
        if is_json {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_hidden(name: &OsStr) -> bool {
    name.to_string_lossy().starts_with('.')
}
