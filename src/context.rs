//! The hook scripting context.
//!
//! `HookContext` is the public API surface available inside build hooks. It
//! wires up project location, configuration, discovery, compiler detection,
//! and the compilation strategy once at construction, then exposes the
//! results plus compile and process-execution entry points.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};

use crate::build::strategy::DELEGATE_CLI;
use crate::build::{
    resolve_build_dir, run_checked, select_strategy, ArtifactRegistry, BuildContext,
    BuildStrategy, Linkage,
};
use crate::config::{ProjectConfig, MANIFEST_FILE};
use crate::discovery::compilers::{detect_compilers, resolve_flags, CompilerSet, FlagSet};
use crate::discovery::project::find_project_root;
use crate::discovery::sources::SourceDiscoverer;
use crate::util::env::Environment;
use crate::util::fs::normalize_path;
use crate::util::process::{find_in_path, CommandSpec, ExecOutput, Executor, ProcessRunner};

/// Context available inside hook scripts.
pub struct HookContext {
    project_root: PathBuf,
    config: ProjectConfig,
    env: Environment,
    compilers: CompilerSet,
    flags: FlagSet,
    sources: Vec<PathBuf>,
    include_dirs: Vec<PathBuf>,
    discoverer: SourceDiscoverer,
    registry: ArtifactRegistry,
    exec: Arc<dyn Executor>,
    strategy: Box<dyn BuildStrategy>,
}

impl HookContext {
    /// Create a context starting from the current directory, with the
    /// process environment.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to resolve current directory")?;
        Self::with_environment(&cwd, Environment::from_process())
    }

    /// Create a context starting from the given directory.
    pub fn with_start_dir(start: &Path) -> Result<Self> {
        Self::with_environment(start, Environment::from_process())
    }

    /// Create a context with an explicit environment snapshot.
    ///
    /// The project root is the nearest ancestor of `start` carrying a
    /// `bosun.toml` or `.git` marker, falling back to `start` itself.
    pub fn with_environment(start: &Path, env: Environment) -> Result<Self> {
        let start = normalize_path(start);
        let project_root = find_project_root(&start).unwrap_or(start);
        tracing::debug!("project root: {}", project_root.display());

        let config = ProjectConfig::load_or_default(&project_root.join(MANIFEST_FILE));
        let build_dir = resolve_build_dir(&project_root, &config.build, &env);

        let registry = ArtifactRegistry::new(build_dir.clone());
        registry.prepare_build_dir()?;

        let discoverer = SourceDiscoverer::new(project_root.clone(), build_dir.clone());
        let sources = discoverer.discover_source_files(None)?;
        let include_dirs = discoverer.discover_include_directories();

        let compilers = detect_compilers(&env);
        let flags = resolve_flags(&config.build, &env);

        let exec: Arc<dyn Executor> =
            Arc::new(ProcessRunner::new(project_root.clone(), env.clone()));
        let strategy = select_strategy(
            exec.clone(),
            BuildContext {
                project_root: project_root.clone(),
                build_dir,
                compilers: compilers.clone(),
                flags: flags.clone(),
                include_dirs: include_dirs.clone(),
                env: env.clone(),
            },
        );

        Ok(HookContext {
            project_root,
            config,
            env,
            compilers,
            flags,
            sources,
            include_dirs,
            discoverer,
            registry,
            exec,
            strategy,
        })
    }

    /// The resolved project root.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// The build output directory.
    pub fn build_dir(&self) -> &Path {
        self.registry.build_dir()
    }

    /// Parsed project configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// The environment snapshot this context operates with.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Discovered source files, relative to the project root.
    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Discovered include directories, relative to the project root.
    pub fn include_dirs(&self) -> &[PathBuf] {
        &self.include_dirs
    }

    /// Detected compilers.
    pub fn compilers(&self) -> &CompilerSet {
        &self.compilers
    }

    /// Resolved compiler and linker flags.
    pub fn flags(&self) -> &FlagSet {
        &self.flags
    }

    /// Artifacts produced so far in this session.
    pub fn artifacts(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// Execute a command in the project root, failing on non-zero exit.
    pub fn run(&self, argv: &[&str]) -> Result<ExecOutput> {
        let Some((program, args)) = argv.split_first() else {
            bail!("empty command");
        };
        let cmd = CommandSpec::new(program).args(args.iter().copied());
        run_checked(self.exec.as_ref(), &cmd)
    }

    /// Execute a shell command string via `sh -c`.
    pub fn sh(&self, script: &str) -> Result<ExecOutput> {
        let shell =
            find_in_path("sh", &self.env).unwrap_or_else(|| PathBuf::from("/bin/sh"));
        let cmd = CommandSpec::new(shell).arg("-c").arg(script);
        run_checked(self.exec.as_ref(), &cmd)
    }

    /// Invoke the `bosun` CLI directly with the given arguments.
    pub fn delegate(&self, args: &[&str]) -> Result<ExecOutput> {
        let Some(cli) = find_in_path(DELEGATE_CLI, &self.env) else {
            bail!("{} CLI not found on the search path", DELEGATE_CLI);
        };
        let cmd = CommandSpec::new(cli).args(args.iter().copied());
        run_checked(self.exec.as_ref(), &cmd)
    }

    /// Find files by glob patterns, relative to the project root.
    pub fn find_sources(&self, patterns: &[&str]) -> Result<Vec<PathBuf>> {
        let patterns: Vec<String> = patterns.iter().map(|p| p.to_string()).collect();
        self.discoverer.find_files(&patterns)
    }

    /// Compile an executable target.
    ///
    /// Sources are relative to the project root. `use_cxx` selects the C++
    /// driver; pass empty slices when no per-call flags are needed.
    pub fn compile_executable(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        extra_cflags: &[String],
        extra_ldflags: &[String],
        use_cxx: bool,
    ) -> Result<PathBuf> {
        self.strategy.compile_executable(
            &mut self.registry,
            name,
            sources,
            extra_cflags,
            extra_ldflags,
            use_cxx,
        )
    }

    /// Compile a static or shared library.
    pub fn compile_library(
        &mut self,
        name: &str,
        sources: &[PathBuf],
        linkage: Linkage,
        extra_flags: &[String],
    ) -> Result<PathBuf> {
        self.strategy
            .compile_library(&mut self.registry, name, sources, linkage, extra_flags)
    }
}
