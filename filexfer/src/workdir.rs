//! Per-player working directory, §4.6: `cd`/`pwd`/`getfile`/`putfile`
//! resolve paths relative to this directory, and every resolved path must
//! stay within the server's root.

use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEscapesRoot;

/// Tracks a single player's current server-side directory (default `.`,
/// i.e. the server root).
#[derive(Debug, Clone)]
pub struct WorkingDirectory {
    root: PathBuf,
    current: PathBuf,
}

impl WorkingDirectory {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        WorkingDirectory {
            root: root.into(),
            current: PathBuf::new(),
        }
    }

    pub fn current(&self) -> &Path {
        &self.current
    }

    /// `cd` into `target`, which may be relative or absolute-from-root.
    /// Rejects any resolution that would escape the server root.
    pub fn cd(&mut self, target: &str) -> Result<(), PathEscapesRoot> {
        let candidate = self.resolve(target)?;
        self.current = candidate;
        Ok(())
    }

    /// Resolve `target` relative to the current directory into an absolute
    /// filesystem path, verifying containment within the root. `target` is
    /// always treated as relative to `current`, even if it carries a root
    /// or prefix component of its own (an absolute-path argument must never
    /// discard `current`/`root` during the join).
    pub fn resolve(&self, target: &str) -> Result<PathBuf, PathEscapesRoot> {
        let mut joined = self.current.clone();
        for component in Path::new(target).components() {
            if let Component::Normal(_) | Component::CurDir | Component::ParentDir = component {
                joined.push(component.as_os_str());
            }
        }
        let normalized = normalize(&joined);
        if normalized.starts_with("..") {
            return Err(PathEscapesRoot);
        }
        Ok(self.root.join(&normalized))
    }
}

/// Collapse `.`/`..` components lexically (no filesystem access, so this
/// works for paths that do not exist yet).
fn normalize(path: &Path) -> PathBuf {
    let mut stack: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(stack.last(), Some(Component::Normal(_))) {
                    stack.pop();
                } else {
                    stack.push(component);
                }
            }
            other => stack.push(other),
        }
    }
    stack.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cd_into_subdirectory_then_resolve_file() {
        let mut wd = WorkingDirectory::new("/srv/zone");
        wd.cd("maps").unwrap();
        assert_eq!(wd.resolve("zone.lvl").unwrap(), PathBuf::from("/srv/zone/maps/zone.lvl"));
    }

    #[test]
    fn parent_dir_escape_is_rejected() {
        let wd = WorkingDirectory::new("/srv/zone");
        assert_eq!(wd.resolve("../../etc/passwd"), Err(PathEscapesRoot));
    }

    #[test]
    fn cd_up_from_subdirectory_is_allowed_but_not_past_root() {
        let mut wd = WorkingDirectory::new("/srv/zone");
        wd.cd("maps").unwrap();
        wd.cd("..").unwrap();
        assert_eq!(wd.current(), Path::new(""));
        assert_eq!(wd.resolve(".."), Err(PathEscapesRoot));
    }

    #[test]
    fn absolute_path_target_is_treated_as_relative_to_current() {
        let mut wd = WorkingDirectory::new("/srv/zone");
        wd.cd("maps").unwrap();
        assert_eq!(wd.resolve("/etc/passwd").unwrap(), PathBuf::from("/srv/zone/maps/etc/passwd"));
    }
}
