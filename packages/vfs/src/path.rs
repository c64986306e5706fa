//! Lexical path cleaning.

use std::path::{Component, Path, PathBuf};

/// Return the shortest path equivalent to `path`, by lexical processing only.
///
/// - Repeated separators and `.` components are removed
/// - `..` removes the preceding normal component
/// - `..` directly after the root is dropped (`/..` is `/`)
/// - Leading `..` components of a relative path are kept
/// - An empty result becomes `.`
///
/// The filesystem is never consulted, so symlinks are not resolved. This is
/// hygiene, not confinement: a relative path may still climb out with `..`.
///
/// ```rust
/// use std::path::Path;
/// use manifold_vfs::clean_path;
///
/// assert_eq!(clean_path(Path::new("a/./b/../c")), Path::new("a/c"));
/// assert_eq!(clean_path(Path::new("/../etc")), Path::new("/etc"));
/// assert_eq!(clean_path(Path::new("../x")), Path::new("../x"));
/// assert_eq!(clean_path(Path::new("a/..")), Path::new("."));
/// ```
pub fn clean_path(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                out.push(component)
            }
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) => {}
                _ => out.push(component),
            },
        }
    }

    if out.is_empty() {
        return PathBuf::from(".");
    }
    out.iter().collect()
}

/// Clean `path` and drop everything that is not a normal component, giving a
/// relative path that cannot leave the directory it is joined to.
pub(crate) fn confine(path: &Path) -> PathBuf {
    clean_path(path)
        .components()
        .filter_map(|c| match c {
            Component::Normal(name) => Some(name),
            _ => None,
        })
        .collect()
}
