//! Build artifact registry.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::util::fs::ensure_dir;

/// Kind of build output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Executable,
    StaticLib,
    SharedLib,
}

impl ArtifactKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Executable => "executable",
            ArtifactKind::StaticLib => "static",
            ArtifactKind::SharedLib => "shared",
        }
    }
}

/// Descriptor for a produced build output.
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Unique artifact name (registry key)
    pub name: String,
    /// Absolute output path, inside the build directory
    pub path: PathBuf,
    /// What kind of output this is
    pub kind: ArtifactKind,
    /// Constituent sources, relative to the project root
    pub sources: Vec<PathBuf>,
    /// Intermediate object files (static libraries only), absolute
    pub objects: Vec<PathBuf>,
}

/// Owns the build output directory and the name → artifact mapping for a
/// build session. Append-only during a session; re-registering a name
/// overwrites the previous descriptor.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    build_dir: PathBuf,
    artifacts: BTreeMap<String, Artifact>,
}

impl ArtifactRegistry {
    /// Create a registry rooted at the given build directory.
    pub fn new(build_dir: impl Into<PathBuf>) -> Self {
        ArtifactRegistry {
            build_dir: build_dir.into(),
            artifacts: BTreeMap::new(),
        }
    }

    /// The build output directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Create the build directory and its parents. Idempotent.
    pub fn prepare_build_dir(&self) -> Result<()> {
        ensure_dir(&self.build_dir)
    }

    /// Record an artifact, replacing any previous entry with the same name.
    pub fn register(&mut self, artifact: Artifact) {
        tracing::debug!(
            "registered {} artifact `{}` at {}",
            artifact.kind.as_str(),
            artifact.name,
            artifact.path.display()
        );
        self.artifacts.insert(artifact.name.clone(), artifact);
    }

    /// Look up an artifact by name.
    pub fn get(&self, name: &str) -> Option<&Artifact> {
        self.artifacts.get(name)
    }

    /// Iterate over all registered artifacts.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Artifact> {
        self.artifacts.iter()
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn artifact(name: &str, kind: ArtifactKind) -> Artifact {
        Artifact {
            name: name.to_string(),
            path: PathBuf::from("/build").join(name),
            kind,
            sources: Vec::new(),
            objects: Vec::new(),
        }
    }

    #[test]
    fn test_prepare_build_dir_idempotent() {
        let tmp = TempDir::new().unwrap();
        let registry = ArtifactRegistry::new(tmp.path().join("out").join("debug"));

        registry.prepare_build_dir().unwrap();
        registry.prepare_build_dir().unwrap();

        assert!(registry.build_dir().is_dir());
    }

    #[test]
    fn test_register_upserts() {
        let mut registry = ArtifactRegistry::new("/build");

        registry.register(artifact("app", ArtifactKind::Executable));
        registry.register(artifact("app", ArtifactKind::SharedLib));

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("app").unwrap().kind, ArtifactKind::SharedLib);
    }

    #[test]
    fn test_iter_exports_all() {
        let mut registry = ArtifactRegistry::new("/build");
        registry.register(artifact("app", ArtifactKind::Executable));
        registry.register(artifact("math", ArtifactKind::StaticLib));

        let names: Vec<&str> = registry.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["app", "math"]);
    }
}
