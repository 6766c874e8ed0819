//! Source file and include directory discovery.

use std::path::{Path, PathBuf};

use anyhow::Result;
use walkdir::WalkDir;

use crate::util::fs::glob_files;

/// Default glob patterns for C/C++ translation units.
pub const SOURCE_PATTERNS: &[&str] = &["**/*.c", "**/*.cc", "**/*.cpp", "**/*.cxx", "**/*.c++"];

/// Conventional include directory names, checked in this order.
const CONVENTIONAL_INCLUDE_DIRS: &[&str] = &["include", "inc", "src", "headers"];

/// File extensions treated as headers.
const HEADER_EXTENSIONS: &[&str] = &["h", "hh", "hpp"];

/// Discovers sources and include directories in a project tree.
#[derive(Debug, Clone)]
pub struct SourceDiscoverer {
    project_root: PathBuf,
    build_dir: PathBuf,
}

impl SourceDiscoverer {
    /// Create a discoverer for the given project root and build directory.
    pub fn new(project_root: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        SourceDiscoverer {
            project_root: project_root.into(),
            build_dir: build_dir.into(),
        }
    }

    /// Glob the project tree for source files.
    ///
    /// Matches are relative to the project root, exclude anything under the
    /// build directory, include only regular files, and come back
    /// lexicographically sorted.
    pub fn discover_source_files(&self, patterns: Option<&[String]>) -> Result<Vec<PathBuf>> {
        let default_patterns: Vec<String> =
            SOURCE_PATTERNS.iter().map(|p| p.to_string()).collect();
        let patterns = patterns.unwrap_or(&default_patterns);

        let mut sources: Vec<PathBuf> = glob_files(&self.project_root, patterns)?
            .into_iter()
            .filter(|path| !path.starts_with(&self.build_dir))
            .filter_map(|path| {
                path.strip_prefix(&self.project_root)
                    .map(Path::to_path_buf)
                    .ok()
            })
            .collect();

        sources.sort();
        sources.dedup();
        Ok(sources)
    }

    /// Infer include directory candidates, relative to the project root.
    ///
    /// Starts with whichever conventional directories exist, in their fixed
    /// order, then appends every other directory containing at least one
    /// header file. Traversal is sorted by file name so the result is stable
    /// across platforms. No directory appears twice.
    pub fn discover_include_directories(&self) -> Vec<PathBuf> {
        let mut found: Vec<PathBuf> = Vec::new();

        for name in CONVENTIONAL_INCLUDE_DIRS {
            if self.project_root.join(name).is_dir() {
                found.push(PathBuf::from(name));
            }
        }

        let walker = WalkDir::new(&self.project_root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !e.path().starts_with(&self.build_dir));

        for entry in walker.filter_map(|e| e.ok()) {
            if !entry.file_type().is_file() || !is_header(entry.path()) {
                continue;
            }
            let Some(parent) = entry.path().parent() else {
                continue;
            };
            let Ok(relative) = parent.strip_prefix(&self.project_root) else {
                continue;
            };
            let relative = if relative.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                relative.to_path_buf()
            };
            if !found.contains(&relative) {
                found.push(relative);
            }
        }

        found
    }

    /// Find files by glob patterns, relative to the project root.
    ///
    /// Unlike [`discover_source_files`](Self::discover_source_files) this
    /// does not exclude the build directory and preserves per-pattern match
    /// order, for hook scripts that want raw lookups.
    pub fn find_files(&self, patterns: &[String]) -> Result<Vec<PathBuf>> {
        Ok(glob_files(&self.project_root, patterns)?
            .into_iter()
            .filter_map(|path| {
                path.strip_prefix(&self.project_root)
                    .map(Path::to_path_buf)
                    .ok()
            })
            .collect())
    }
}

fn is_header(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| HEADER_EXTENSIONS.contains(&ext))
}
