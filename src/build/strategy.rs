//! Compilation strategies.
//!
//! One strategy is selected at session setup: when the `bosun` CLI is on the
//! search path every compile request is delegated to it wholesale, otherwise
//! the direct compiler assembles and runs raw toolchain commands.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use crate::build::artifacts::{Artifact, ArtifactKind, ArtifactRegistry};
use crate::build::error::BuildError;
use crate::build::toolchain::{host_toolchain, ToolchainAdapter};
use crate::build::{run_checked, BuildContext};
use crate::util::process::{find_in_path, CommandSpec, Executor};

/// Name of the unified build CLI that compilation is delegated to when
/// present.
pub const DELEGATE_CLI: &str = "bosun";

/// Library linkage kind requested by a compile call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Linkage {
    Static,
    Shared,
}

/// A compilation strategy for one build session.
pub trait BuildStrategy {
    /// Compile an executable and return its output path.
    fn compile_executable(
        &self,
        registry: &mut ArtifactRegistry,
        name: &str,
        sources: &[PathBuf],
        extra_cflags: &[String],
        extra_ldflags: &[String],
        use_cxx: bool,
    ) -> Result<PathBuf>;

    /// Compile a static or shared library and return its output path.
    fn compile_library(
        &self,
        registry: &mut ArtifactRegistry,
        name: &str,
        sources: &[PathBuf],
        linkage: Linkage,
        extra_flags: &[String],
    ) -> Result<PathBuf>;
}

/// Pick the strategy for this session.
///
/// Checked once: presence of the `bosun` CLI on the search path selects
/// delegation, otherwise direct toolchain invocation.
pub fn select_strategy(exec: Arc<dyn Executor>, ctx: BuildContext) -> Box<dyn BuildStrategy> {
    match find_in_path(DELEGATE_CLI, &ctx.env) {
        Some(cli) => {
            tracing::debug!("delegating builds to `{}`", cli.display());
            Box::new(DelegatedCompiler::new(exec, cli, ctx.build_dir))
        }
        None => Box::new(DirectCompiler::new(exec, ctx)),
    }
}

/// Strategy that hands every request to the unified build CLI.
///
/// No local flag assembly happens on this path; success is trusted to have
/// produced the conventionally named output.
pub struct DelegatedCompiler {
    exec: Arc<dyn Executor>,
    cli: PathBuf,
    build_dir: PathBuf,
}

impl DelegatedCompiler {
    /// Create a delegating strategy for the given CLI binary.
    pub fn new(exec: Arc<dyn Executor>, cli: PathBuf, build_dir: PathBuf) -> Self {
        DelegatedCompiler {
            exec,
            cli,
            build_dir,
        }
    }
}

impl BuildStrategy for DelegatedCompiler {
    fn compile_executable(
        &self,
        _registry: &mut ArtifactRegistry,
        name: &str,
        _sources: &[PathBuf],
        _extra_cflags: &[String],
        _extra_ldflags: &[String],
        _use_cxx: bool,
    ) -> Result<PathBuf> {
        let cmd = CommandSpec::new(&self.cli)
            .args(["build", "--target"])
            .arg(name);
        run_checked(self.exec.as_ref(), &cmd)?;
        Ok(self.build_dir.join(name))
    }

    fn compile_library(
        &self,
        _registry: &mut ArtifactRegistry,
        name: &str,
        _sources: &[PathBuf],
        linkage: Linkage,
        _extra_flags: &[String],
    ) -> Result<PathBuf> {
        let cmd = CommandSpec::new(&self.cli)
            .args(["build", "--lib"])
            .arg(name);
        run_checked(self.exec.as_ref(), &cmd)?;

        let file_name = match linkage {
            Linkage::Static => format!("lib{name}.a"),
            Linkage::Shared => format!("lib{name}.so"),
        };
        Ok(self.build_dir.join(file_name))
    }
}

/// Strategy that assembles and runs raw toolchain commands.
pub struct DirectCompiler {
    exec: Arc<dyn Executor>,
    ctx: BuildContext,
    toolchain: Box<dyn ToolchainAdapter>,
}

impl DirectCompiler {
    /// Create a direct strategy using the host platform's toolchain adapter.
    pub fn new(exec: Arc<dyn Executor>, ctx: BuildContext) -> Self {
        Self::with_toolchain(exec, ctx, host_toolchain())
    }

    /// Create a direct strategy with an explicit toolchain adapter.
    pub fn with_toolchain(
        exec: Arc<dyn Executor>,
        ctx: BuildContext,
        toolchain: Box<dyn ToolchainAdapter>,
    ) -> Self {
        DirectCompiler {
            exec,
            ctx,
            toolchain,
        }
    }
}

impl BuildStrategy for DirectCompiler {
    fn compile_executable(
        &self,
        registry: &mut ArtifactRegistry,
        name: &str,
        sources: &[PathBuf],
        extra_cflags: &[String],
        extra_ldflags: &[String],
        use_cxx: bool,
    ) -> Result<PathBuf> {
        registry.prepare_build_dir()?;

        if sources.is_empty() {
            return Err(BuildError::NoSources.into());
        }

        let compiler = if use_cxx {
            &self.ctx.compilers.cxx
        } else {
            &self.ctx.compilers.cc
        };
        let base_flags = if use_cxx {
            &self.ctx.flags.cxxflags
        } else {
            &self.ctx.flags.cflags
        };
        let output = self.ctx.build_dir.join(name);

        // Flag order is fixed: base flags, per-call compile flags, include
        // paths, sources, output, per-call link flags, then the session-wide
        // linker flags last so they win under left-to-right link semantics.
        let mut cmd = CommandSpec::new(compiler);
        cmd = cmd.args(base_flags.iter().cloned());
        cmd = cmd.args(extra_cflags.iter().cloned());
        for dir in &self.ctx.include_dirs {
            cmd = cmd
                .arg("-I")
                .arg(self.ctx.include_path(dir).display().to_string());
        }
        for source in sources {
            cmd = cmd.arg(self.ctx.source_path(source).display().to_string());
        }
        cmd = cmd.arg("-o").arg(output.display().to_string());
        cmd = cmd.args(extra_ldflags.iter().cloned());
        cmd = cmd.args(self.ctx.flags.ldflags.iter().cloned());

        tracing::info!("compiling executable `{}`", name);
        run_checked(self.exec.as_ref(), &cmd)?;

        registry.register(Artifact {
            name: name.to_string(),
            path: output.clone(),
            kind: ArtifactKind::Executable,
            sources: sources.to_vec(),
            objects: Vec::new(),
        });

        Ok(output)
    }

    fn compile_library(
        &self,
        registry: &mut ArtifactRegistry,
        name: &str,
        sources: &[PathBuf],
        linkage: Linkage,
        extra_flags: &[String],
    ) -> Result<PathBuf> {
        registry.prepare_build_dir()?;

        if sources.is_empty() {
            return Err(BuildError::NoSources.into());
        }

        match linkage {
            Linkage::Static => {
                tracing::info!("compiling static library `{}`", name);
                let objects = self.toolchain.compile_objects(
                    self.exec.as_ref(),
                    &self.ctx,
                    name,
                    sources,
                    extra_flags,
                )?;
                let path = self
                    .toolchain
                    .link_static(self.exec.as_ref(), &self.ctx, name, &objects)?;

                registry.register(Artifact {
                    name: name.to_string(),
                    path: path.clone(),
                    kind: ArtifactKind::StaticLib,
                    sources: sources.to_vec(),
                    objects,
                });
                Ok(path)
            }
            Linkage::Shared => {
                tracing::info!("compiling shared library `{}`", name);
                let path = self.toolchain.link_shared(
                    self.exec.as_ref(),
                    &self.ctx,
                    name,
                    sources,
                    extra_flags,
                )?;

                registry.register(Artifact {
                    name: name.to_string(),
                    path: path.clone(),
                    kind: ArtifactKind::SharedLib,
                    sources: sources.to_vec(),
                    objects: Vec::new(),
                });
                Ok(path)
            }
        }
    }
}
