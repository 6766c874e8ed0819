//! Project root location.

use std::path::{Path, PathBuf};

use crate::config::MANIFEST_FILE;

/// Marker names that identify a project root.
const ROOT_MARKERS: &[&str] = &[MANIFEST_FILE, ".git"];

/// How many ancestor directories to inspect before giving up.
const MAX_ASCENT: usize = 64;

/// Find the project root by walking ancestors of `start`.
///
/// Returns the first ancestor (including `start` itself) containing a
/// `bosun.toml` manifest or a `.git` directory, or `None` if no marker is
/// found within the ascent bound.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    find_project_root_with_markers(start, ROOT_MARKERS)
}

/// Find the project root using custom marker names.
pub fn find_project_root_with_markers(start: &Path, markers: &[&str]) -> Option<PathBuf> {
    let start = crate::util::fs::normalize_path(start);
    let mut current = start.as_path();

    for _ in 0..MAX_ASCENT {
        for marker in markers {
            if current.join(marker).exists() {
                return Some(current.to_path_buf());
            }
        }
        current = current.parent()?;
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_finds_manifest_in_ancestor() {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path().join("project");
        let nested = root.join("src").join("deep");
        fs::create_dir_all(&nested).unwrap();
        fs::write(root.join(MANIFEST_FILE), "").unwrap();

        let found = find_project_root(&nested).unwrap();
        assert_eq!(found, crate::util::fs::normalize_path(&root));
    }

    #[test]
    fn test_start_dir_itself_matches() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join(".git")).unwrap();

        let found = find_project_root(tmp.path()).unwrap();
        assert_eq!(found, crate::util::fs::normalize_path(tmp.path()));
    }

    #[test]
    fn test_custom_markers() {
        let tmp = TempDir::new().unwrap();
        let nested = tmp.path().join("a").join("b");
        fs::create_dir_all(&nested).unwrap();
        fs::write(tmp.path().join("Makefile"), "").unwrap();

        assert!(find_project_root_with_markers(&nested, &["Makefile"]).is_some());
        assert!(find_project_root_with_markers(&nested, &["missing.cfg"]).is_none());
    }
}
