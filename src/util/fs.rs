//! Filesystem and path utilities.

use std::ffi::OsStr;
use std::path::{Component, Path, PathBuf};

/// Get the relative path from `base` to `path`.
pub fn relative_path(base: &Path, path: &Path) -> PathBuf {
    pathdiff::diff_paths(path, base).unwrap_or_else(|| path.to_path_buf())
}

/// Check if a path is inside another path.
pub fn is_inside(path: &Path, parent: &Path) -> bool {
    path.starts_with(parent)
}

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` at the root (or at the start of a relative path) is kept as-is.
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

/// Replace the extension suffix `from` on the file name with `to`.
///
/// Returns the path unchanged when it does not end with `from`.
pub fn replace_suffix(path: &Path, from: &str, to: &str) -> PathBuf {
    let raw = path.as_os_str().to_string_lossy();
    match raw.strip_suffix(from) {
        Some(stem) => PathBuf::from(format!("{}{}", stem, to)),
        None => path.to_path_buf(),
    }
}

/// Check whether the path's final text ends with `suffix`.
pub fn ends_with(path: impl AsRef<OsStr>, suffix: &str) -> bool {
    path.as_ref().to_string_lossy().ends_with(suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_path() {
        assert_eq!(
            clean_path(Path::new("/proj/build/app/main.mjs/../helper")),
            PathBuf::from("/proj/build/app/helper")
        );
        assert_eq!(
            clean_path(Path::new("/proj/./a/../../b")),
            PathBuf::from("/b")
        );
        assert_eq!(clean_path(Path::new("/../x")), PathBuf::from("/x"));
        assert_eq!(clean_path(Path::new("../x/./y")), PathBuf::from("../x/y"));
    }

    #[test]
    fn test_relative_path() {
        assert_eq!(
            relative_path(Path::new("/proj"), Path::new("/proj/src/main.mjs")),
            PathBuf::from("src/main.mjs")
        );
    }

    #[test]
    fn test_replace_suffix() {
        assert_eq!(
            replace_suffix(Path::new("src/app.gleam"), ".gleam", ".mjs"),
            PathBuf::from("src/app.mjs")
        );
        assert_eq!(
            replace_suffix(Path::new("src/app.css"), ".gleam", ".mjs"),
            PathBuf::from("src/app.css")
        );
    }
}
