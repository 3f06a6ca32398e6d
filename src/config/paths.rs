//! Path resolution against an instance directory.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base`, yielding an absolute, lexically normalized
/// path.
///
/// Absolute inputs ignore `base`. `.` components are dropped and `..` pops
/// the previous component; symlinks are not followed.
///
/// ```
/// use slsctl::config::resolve_against;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     resolve_against(Path::new("/a/b"), Path::new("./code")),
///     PathBuf::from("/a/b/code")
/// );
/// assert_eq!(
///     resolve_against(Path::new("/a/b"), Path::new("../shared/lib")),
///     PathBuf::from("/a/shared/lib")
/// );
/// ```
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    let joined = base.join(path);
    let joined = if joined.is_absolute() {
        joined
    } else {
        std::path::absolute(&joined).unwrap_or(joined)
    };
    normalize(&joined)
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_relative_paths() {
        assert_eq!(
            resolve_against(Path::new("/a/b"), Path::new("code")),
            PathBuf::from("/a/b/code")
        );
    }

    #[test]
    fn strips_current_dir_components() {
        assert_eq!(
            resolve_against(Path::new("/a/./b"), Path::new("./src/./lib")),
            PathBuf::from("/a/b/src/lib")
        );
    }

    #[test]
    fn absolute_paths_ignore_base() {
        assert_eq!(
            resolve_against(Path::new("/a/b"), Path::new("/opt/code")),
            PathBuf::from("/opt/code")
        );
    }

    #[test]
    fn parent_dir_cannot_escape_root() {
        assert_eq!(
            resolve_against(Path::new("/a"), Path::new("../../x")),
            PathBuf::from("/x")
        );
    }

    #[test]
    fn relative_base_becomes_absolute() {
        let resolved = resolve_against(Path::new("svc"), Path::new("./code"));
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("svc/code"));
    }
}
