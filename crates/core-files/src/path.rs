//! Path helpers shared by the file registry, the chooser and the `e` command.
//!
//! Registry keys use `~` for the home directory so the recents file stays
//! portable between machines with different home locations.

use std::path::{Component, Path, PathBuf};

/// Resolve `path` against `base_dir`.
///
/// Absolute paths are returned as is, a leading `~` expands to the home
/// directory and anything else is joined onto `base_dir`. The result is
/// lexically normalized (`.` dropped, `..` pops a component).
pub fn to_full_path(base_dir: &Path, path: &str) -> PathBuf {
    to_full_path_with_home(base_dir, path, dirs::home_dir().as_deref())
}

pub fn to_full_path_with_home(base_dir: &Path, path: &str, home: Option<&Path>) -> PathBuf {
    if path.starts_with('/') {
        return normalize(Path::new(path));
    }
    if let (Some(rest), Some(home)) = (path.strip_prefix('~'), home) {
        let rest = rest.trim_start_matches('/');
        return normalize(&home.join(rest));
    }
    normalize(&base_dir.join(path))
}

/// Replace a leading home directory with `~`.
pub fn entilde(path: &Path) -> String {
    entilde_with_home(path, dirs::home_dir().as_deref())
}

pub fn entilde_with_home(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

/// Lexical normalization; never touches the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for comp in path.components() {
        match comp {
            Component::CurDir => {}
            Component::ParentDir => {
                // `/..` stays at the root
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
