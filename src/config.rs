//! Project configuration (`bosun.toml`).
//!
//! Configuration is parsed into concrete record types up front; there is no
//! dynamic key lookup. A missing or unparseable file falls back to defaults
//! so hooks keep working in bare projects.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Name of the project manifest file, also used as a project-root marker.
pub const MANIFEST_FILE: &str = "bosun.toml";

/// Top-level project configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Project metadata
    pub project: ProjectSection,

    /// Build settings
    pub build: BuildSection,
}

/// `[project]` metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectSection {
    pub name: Option<String>,
    pub version: Option<String>,
}

/// `[build]` settings for C/C++ compilation.
///
/// Flag lists here take precedence over the corresponding environment
/// variables, independently per category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSection {
    /// C compiler flags (overrides `CFLAGS`)
    pub cflags: Vec<String>,

    /// C++ compiler flags (overrides `CXXFLAGS`)
    pub cxxflags: Vec<String>,

    /// Linker flags (overrides `LDFLAGS`)
    pub ldflags: Vec<String>,

    /// Build output directory, relative to the project root unless absolute.
    /// The `BOSUN_BUILD_DIR` environment variable still wins over this.
    pub build_dir: Option<PathBuf>,
}

impl ProjectConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config: {}", path.display()))
    }

    /// Load configuration with fallback to defaults if the file is missing
    /// or malformed.
    pub fn load_or_default(path: &Path) -> Self {
        if path.exists() {
            Self::load(path).unwrap_or_else(|e| {
                tracing::warn!("failed to load config from {}: {}", path.display(), e);
                Self::default()
            })
        } else {
            Self::default()
        }
    }
}
