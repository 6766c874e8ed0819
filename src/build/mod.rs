//! Toolchain orchestration: artifact registry, platform toolchain adapters,
//! and the compilation strategy.

use std::path::{Path, PathBuf};

use anyhow::Result;

pub mod artifacts;
pub mod error;
pub mod strategy;
pub mod toolchain;

pub use artifacts::{Artifact, ArtifactKind, ArtifactRegistry};
pub use error::BuildError;
pub use strategy::{select_strategy, BuildStrategy, DelegatedCompiler, DirectCompiler, Linkage};
pub use toolchain::{GnuToolchain, MsvcToolchain, ToolchainAdapter};

use crate::config::BuildSection;
use crate::discovery::compilers::{CompilerSet, FlagSet};
use crate::util::env::Environment;
use crate::util::process::{CommandSpec, ExecOutput, Executor};

/// Environment variable overriding the build output directory.
pub const BUILD_DIR_ENV: &str = "BOSUN_BUILD_DIR";

/// Everything a compile call needs, resolved once per session.
#[derive(Debug, Clone)]
pub struct BuildContext {
    /// Project root directory (absolute)
    pub project_root: PathBuf,
    /// Build output directory (absolute)
    pub build_dir: PathBuf,
    /// Detected compilers
    pub compilers: CompilerSet,
    /// Resolved flags
    pub flags: FlagSet,
    /// Include directories, relative to the project root
    pub include_dirs: Vec<PathBuf>,
    /// Environment used for tool lookups and subprocess execution
    pub env: Environment,
}

impl BuildContext {
    /// Absolute path of a source file given relative to the project root.
    pub fn source_path(&self, source: &Path) -> PathBuf {
        self.project_root.join(source)
    }

    /// Absolute path of an include directory given relative to the root.
    pub fn include_path(&self, dir: &Path) -> PathBuf {
        self.project_root.join(dir)
    }
}

/// Resolve the build output directory for a session.
///
/// Precedence: `BOSUN_BUILD_DIR` environment override, then the configured
/// `build.build_dir`, then `<root>/build`. Relative values are anchored at
/// the project root.
pub fn resolve_build_dir(project_root: &Path, build: &BuildSection, env: &Environment) -> PathBuf {
    let dir = env
        .get(BUILD_DIR_ENV)
        .map(PathBuf::from)
        .or_else(|| build.build_dir.clone())
        .unwrap_or_else(|| PathBuf::from("build"));

    if dir.is_absolute() {
        dir
    } else {
        project_root.join(dir)
    }
}

/// Run a command and surface a non-zero exit as a [`BuildError`].
pub fn run_checked(exec: &dyn Executor, spec: &CommandSpec) -> Result<ExecOutput> {
    let out = exec.run(spec)?;
    if !out.success() {
        return Err(BuildError::CommandFailed {
            command: spec.display(),
            code: out.code,
            stderr: out.stderr_lossy(),
        }
        .into());
    }
    Ok(out)
}
