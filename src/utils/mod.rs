//! Path helpers.

use std::io;
use std::path::{Component, Path, PathBuf};

/// Make `path` absolute and remove `.` and `..` components lexically.
///
/// A leading `~` component is replaced with `$HOME`; `~user` forms are left
/// as they are. Symlinks are not resolved and the path does not need to
/// exist.
///
/// # Arguments
///
/// * `path` - Path as given on the command line, relative or absolute
///
/// # Errors
///
/// Fails if the current directory is needed and cannot be read.
pub fn normalize_path(path: &Path) -> io::Result<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let expanded = expand_home(path, home.as_deref());
    let absolute = std::path::absolute(&expanded)?;

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // popping past the root leaves the root in place
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }

    Ok(normalized)
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let mut components = path.components();
    match (components.next(), home) {
        (Some(Component::Normal(first)), Some(home)) if first == "~" => {
            home.join(components.as_path())
        }
        _ => path.to_path_buf(),
    }
}
