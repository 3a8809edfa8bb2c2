//! Path helpers shared by the config loader.

use std::path::{Path, PathBuf};

/// Turn a relative directory or file path into an absolute one, anchored at
/// the current working directory. Empty paths are returned unchanged.
pub fn normalize_dir_path(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    let path = Path::new(trimmed);
    let absolute: PathBuf = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(path.strip_prefix(".").unwrap_or(path)),
            Err(_) => path.to_path_buf(),
        }
    };

    absolute.to_string_lossy().into_owned()
}
