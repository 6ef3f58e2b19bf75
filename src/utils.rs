//! Utility functions for cross-platform path handling

use std::path::{Component, Path, PathBuf};

/// Convert a path to Git format (always forward slashes)
///
/// Git expects paths with forward slashes, even on Windows.
pub fn path_to_git_format(path: &Path) -> String {
  #[cfg(target_os = "windows")]
  {
    path.to_string_lossy().replace('\\', "/")
  }
  #[cfg(not(target_os = "windows"))]
  {
    path.to_string_lossy().to_string()
  }
}

/// Split a file path into (containing directory, path relative to it)
///
/// A bare file name yields `.` as its directory.
pub fn split_containing_dir(file: &Path) -> (PathBuf, PathBuf) {
  let dir = match file.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  };
  let relative = file
    .file_name()
    .map(PathBuf::from)
    .unwrap_or_else(|| file.to_path_buf());
  (dir, relative)
}

/// Resolve `path` against `base` unless it is already absolute
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    base.join(path)
  }
}

/// Final component of a directory, used as a default display name
pub fn dir_name(dir: &Path) -> Option<String> {
  dir
    .components()
    .rev()
    .find_map(|c| match c {
      Component::Normal(name) => Some(name.to_string_lossy().to_string()),
      _ => None,
    })
}
