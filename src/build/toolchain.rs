//! Platform toolchain adapters.
//!
//! Each adapter knows the command conventions of its toolchain family. The
//! host adapter is selected once at session setup; all adapters compile on
//! every platform so their command assembly stays testable everywhere.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::build::error::BuildError;
use crate::build::{run_checked, BuildContext};
use crate::util::fs::ensure_dir;
use crate::util::process::{find_first_in_path, find_in_path, CommandSpec, Executor};

/// Archiver candidates for Unix-like systems, in preference order.
const ARCHIVERS: &[&str] = &["ar", "emar"];

/// Platform-specific library build steps.
pub trait ToolchainAdapter {
    /// Compile each source to an object file in the library's dedicated
    /// object subdirectory, preserving source order.
    fn compile_objects(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        sources: &[PathBuf],
        extra_flags: &[String],
    ) -> Result<Vec<PathBuf>>;

    /// Archive object files into a static library.
    fn link_static(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        objects: &[PathBuf],
    ) -> Result<PathBuf>;

    /// Produce a shared library from the given sources.
    fn link_shared(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        sources: &[PathBuf],
        extra_flags: &[String],
    ) -> Result<PathBuf>;

    /// Static library file name for an artifact name.
    fn static_lib_name(&self, name: &str) -> String;

    /// Shared library file name for an artifact name.
    fn shared_lib_name(&self, name: &str) -> String;
}

/// Select the adapter for the host platform.
pub fn host_toolchain() -> Box<dyn ToolchainAdapter> {
    if cfg!(target_os = "windows") {
        Box::new(MsvcToolchain)
    } else {
        Box::new(GnuToolchain)
    }
}

/// Object subdirectory for a library build. Keeping objects per library
/// avoids collisions between libraries sharing a source basename.
fn object_dir(ctx: &BuildContext, name: &str) -> PathBuf {
    ctx.build_dir.join(format!("{name}_objects"))
}

/// Object file name for a source: same basename, toolchain extension.
fn object_file_name(source: &Path, extension: &str) -> String {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("object");
    format!("{stem}.{extension}")
}

/// GCC/Clang-style toolchain (Unix-like systems).
#[derive(Debug, Clone, Copy)]
pub struct GnuToolchain;

impl ToolchainAdapter for GnuToolchain {
    fn compile_objects(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        sources: &[PathBuf],
        extra_flags: &[String],
    ) -> Result<Vec<PathBuf>> {
        let obj_dir = object_dir(ctx, name);
        ensure_dir(&obj_dir)?;

        let mut objects = Vec::with_capacity(sources.len());
        for source in sources {
            let obj = obj_dir.join(object_file_name(source, "o"));

            let mut cmd = CommandSpec::new(&ctx.compilers.cxx)
                .arg("-c")
                .arg(ctx.source_path(source).display().to_string())
                .arg("-o")
                .arg(obj.display().to_string());
            cmd = cmd.args(ctx.flags.cxxflags.iter().cloned());
            cmd = cmd.args(extra_flags.iter().cloned());
            for dir in &ctx.include_dirs {
                cmd = cmd.arg("-I").arg(ctx.include_path(dir).display().to_string());
            }

            run_checked(exec, &cmd)?;
            objects.push(obj);
        }

        Ok(objects)
    }

    fn link_static(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        objects: &[PathBuf],
    ) -> Result<PathBuf> {
        let archive = ctx.build_dir.join(self.static_lib_name(name));

        // No hard failure here: fall back to the literal name and let the
        // invocation surface any problem.
        let archiver =
            find_first_in_path(ARCHIVERS, &ctx.env).unwrap_or_else(|| PathBuf::from("ar"));

        let mut cmd = CommandSpec::new(archiver)
            .arg("rcs")
            .arg(archive.display().to_string());
        cmd = cmd.args(objects.iter().map(|o| o.display().to_string()));

        run_checked(exec, &cmd)?;
        Ok(archive)
    }

    fn link_shared(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        sources: &[PathBuf],
        extra_flags: &[String],
    ) -> Result<PathBuf> {
        let output = ctx.build_dir.join(self.shared_lib_name(name));

        let mut cmd = CommandSpec::new(&ctx.compilers.cxx).arg("-shared");
        cmd = cmd.args(ctx.flags.cxxflags.iter().cloned());
        cmd = cmd.args(extra_flags.iter().cloned());
        cmd = cmd.args(
            sources
                .iter()
                .map(|s| ctx.source_path(s).display().to_string()),
        );
        cmd = cmd.arg("-o").arg(output.display().to_string());

        run_checked(exec, &cmd)?;
        Ok(output)
    }

    fn static_lib_name(&self, name: &str) -> String {
        format!("lib{name}.a")
    }

    fn shared_lib_name(&self, name: &str) -> String {
        format!("lib{name}.so")
    }
}

/// MSVC toolchain (Windows).
#[derive(Debug, Clone, Copy)]
pub struct MsvcToolchain;

impl ToolchainAdapter for MsvcToolchain {
    fn compile_objects(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        sources: &[PathBuf],
        extra_flags: &[String],
    ) -> Result<Vec<PathBuf>> {
        let obj_dir = object_dir(ctx, name);
        ensure_dir(&obj_dir)?;

        let mut objects = Vec::with_capacity(sources.len());
        for source in sources {
            let obj = obj_dir.join(object_file_name(source, "obj"));

            let mut cmd = CommandSpec::new(&ctx.compilers.cxx)
                .arg("/c")
                .arg(ctx.source_path(source).display().to_string())
                .arg(format!("/Fo{}", obj.display()));
            for dir in &ctx.include_dirs {
                cmd = cmd.arg("/I").arg(ctx.include_path(dir).display().to_string());
            }
            cmd = cmd.args(extra_flags.iter().cloned());

            run_checked(exec, &cmd)?;
            objects.push(obj);
        }

        Ok(objects)
    }

    fn link_static(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        objects: &[PathBuf],
    ) -> Result<PathBuf> {
        let output = ctx.build_dir.join(self.static_lib_name(name));

        let lib_tool =
            find_in_path("lib", &ctx.env).ok_or(BuildError::ToolNotFound("MSVC lib"))?;

        let mut cmd = CommandSpec::new(lib_tool).arg(format!("/OUT:{}", output.display()));
        cmd = cmd.args(objects.iter().map(|o| o.display().to_string()));

        run_checked(exec, &cmd)?;
        Ok(output)
    }

    fn link_shared(
        &self,
        exec: &dyn Executor,
        ctx: &BuildContext,
        name: &str,
        sources: &[PathBuf],
        extra_flags: &[String],
    ) -> Result<PathBuf> {
        let output = ctx.build_dir.join(self.shared_lib_name(name));

        let objects = self.compile_objects(exec, ctx, name, sources, extra_flags)?;

        let linker =
            find_in_path("link", &ctx.env).ok_or(BuildError::ToolNotFound("MSVC link"))?;

        let mut cmd = CommandSpec::new(linker)
            .arg("/DLL")
            .arg(format!("/OUT:{}", output.display()));
        cmd = cmd.args(objects.iter().map(|o| o.display().to_string()));

        run_checked(exec, &cmd)?;
        Ok(output)
    }

    fn static_lib_name(&self, name: &str) -> String {
        format!("{name}.lib")
    }

    fn shared_lib_name(&self, name: &str) -> String {
        format!("{name}.dll")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::TempDir;

    use crate::discovery::compilers::{CompilerSet, FlagSet};
    use crate::test_support::RecordingExecutor;
    use crate::util::env::Environment;

    fn msvc_context(tmp: &TempDir) -> BuildContext {
        BuildContext {
            project_root: tmp.path().to_path_buf(),
            build_dir: tmp.path().join("build"),
            compilers: CompilerSet {
                cc: PathBuf::from("cl"),
                cxx: PathBuf::from("cl"),
            },
            flags: FlagSet::default(),
            include_dirs: vec![PathBuf::from("include")],
            env: Environment::new(),
        }
    }

    #[test]
    fn test_msvc_object_command_shape() {
        let tmp = TempDir::new().unwrap();
        let ctx = msvc_context(&tmp);
        let exec = Arc::new(RecordingExecutor::new());

        let objects = MsvcToolchain
            .compile_objects(
                exec.as_ref(),
                &ctx,
                "core",
                &[PathBuf::from("src/a.c")],
                &["/W4".to_string()],
            )
            .unwrap();

        assert_eq!(objects.len(), 1);
        assert!(objects[0].ends_with("core_objects/a.obj"));

        let commands = exec.commands();
        assert_eq!(commands.len(), 1);
        let args = &commands[0].args;
        assert_eq!(args[0], "/c");
        assert_eq!(args[1], ctx.source_path(Path::new("src/a.c")).display().to_string());
        assert!(args[2].starts_with("/Fo"));
        assert_eq!(args[3], "/I");
        assert_eq!(args[5], "/W4");
    }

    #[test]
    fn test_msvc_static_requires_lib_tool() {
        let tmp = TempDir::new().unwrap();
        let ctx = msvc_context(&tmp);
        let exec = RecordingExecutor::new();

        // Empty environment: no search path, so lib.exe cannot resolve.
        let err = MsvcToolchain
            .link_static(&exec, &ctx, "core", &[PathBuf::from("a.obj")])
            .unwrap_err();

        let build_err = err.downcast::<BuildError>().unwrap();
        assert!(matches!(build_err, BuildError::ToolNotFound("MSVC lib")));
        assert!(exec.commands().is_empty());
    }

    #[test]
    fn test_lib_names() {
        assert_eq!(GnuToolchain.static_lib_name("math"), "libmath.a");
        assert_eq!(GnuToolchain.shared_lib_name("math"), "libmath.so");
        assert_eq!(MsvcToolchain.static_lib_name("math"), "math.lib");
        assert_eq!(MsvcToolchain.shared_lib_name("math"), "math.dll");
    }

    #[test]
    fn test_object_dirs_keep_basenames_apart() {
        let tmp = TempDir::new().unwrap();
        let ctx = msvc_context(&tmp);

        let a = object_dir(&ctx, "alpha").join(object_file_name(Path::new("src/util.c"), "o"));
        let b = object_dir(&ctx, "beta").join(object_file_name(Path::new("lib/util.c"), "o"));
        assert_ne!(a, b);
    }
}
