use std::path::{Path, PathBuf};

/// Resolve the project root directory.
///
/// Priority:
/// 1. `--root` flag / `CADENCE_ROOT` env var (passed in as `explicit`)
/// 2. Walk upward from `cwd` looking for `.cadence/`
/// 3. Walk upward from `cwd` looking for `.git/`
/// 4. Fall back to `cwd`
pub fn resolve_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(p) = explicit {
        return p.to_path_buf();
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // An initialized project beats a bare git checkout, even when the git
    // root is closer to cwd.
    walk_up(&cwd, cadence_core::paths::CADENCE_DIR)
        .or_else(|| walk_up(&cwd, ".git"))
        .unwrap_or(cwd)
}

/// Nearest ancestor of `start` (inclusive) containing a `marker` directory.
fn walk_up(start: &Path, marker: &str) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(marker).is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_root_wins() {
        let dir = TempDir::new().unwrap();
        let result = resolve_root(Some(dir.path()));
        assert_eq!(result, dir.path());
    }

    #[test]
    fn walk_up_finds_marker_in_ancestor() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("src/deep");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::create_dir(dir.path().join(cadence_core::paths::CADENCE_DIR)).unwrap();

        let found = walk_up(&nested, cadence_core::paths::CADENCE_DIR).unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn walk_up_prefers_nearest_ancestor() {
        let dir = TempDir::new().unwrap();
        let inner = dir.path().join("workspace/project");
        std::fs::create_dir_all(inner.join(".git")).unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        let found = walk_up(&inner.join("sub"), ".git");
        // `sub` does not exist on disk; ancestors() still walks the path
        assert_eq!(found.unwrap(), inner);
    }

    #[test]
    fn walk_up_without_marker_is_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(walk_up(dir.path(), ".cadence"), None);
    }
}
