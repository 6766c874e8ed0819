//! Subprocess execution utilities.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::util::env::Environment;

/// A command to execute, with program, arguments, and environment.
#[derive(Debug, Clone)]
pub struct CommandSpec {
    /// The program to run (e.g., "gcc", "cl.exe")
    pub program: PathBuf,
    /// Command arguments
    pub args: Vec<String>,
    /// Extra environment variables to set for this invocation
    pub env: Vec<(String, String)>,
    /// Working directory override (defaults to the runner's directory)
    pub cwd: Option<PathBuf>,
}

impl CommandSpec {
    /// Create a new command spec.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        CommandSpec {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
            cwd: None,
        }
    }

    /// Add an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Add multiple arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(|a| a.into()));
        self
    }

    /// Add an environment variable.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Set the working directory.
    pub fn cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Display the command for logs and error messages.
    pub fn display(&self) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(self.args.iter().cloned());
        parts.join(" ")
    }
}

/// Captured result of a finished subprocess.
#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    /// Exit code, if the process exited normally.
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ExecOutput {
    /// A successful output with no captured streams.
    pub fn ok() -> Self {
        ExecOutput {
            code: Some(0),
            ..Default::default()
        }
    }

    /// Whether the process exited with code zero.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout as a lossily decoded string.
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    /// Stderr as a lossily decoded string.
    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Capability to run a command and wait for it.
///
/// The build core only ever talks to this trait; tests substitute a
/// recording implementation to inspect assembled command lines.
pub trait Executor {
    /// Run the command synchronously and capture its output.
    fn run(&self, spec: &CommandSpec) -> Result<ExecOutput>;
}

/// Real executor backed by `std::process::Command`.
///
/// Carries an explicit base environment and working directory; per-command
/// environment entries from the `CommandSpec` are layered on top.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
    env: Environment,
}

impl ProcessRunner {
    /// Create a runner rooted at the given directory.
    pub fn new(working_dir: impl Into<PathBuf>, env: Environment) -> Self {
        ProcessRunner {
            working_dir: working_dir.into(),
            env,
        }
    }

    /// The base environment commands run with.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    fn build_command(&self, spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        cmd.env_clear();
        cmd.envs(self.env.iter());
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd.current_dir(spec.cwd.as_deref().unwrap_or(&self.working_dir));
        cmd
    }
}

impl Executor for ProcessRunner {
    fn run(&self, spec: &CommandSpec) -> Result<ExecOutput> {
        tracing::debug!("executing `{}`", spec.display());

        let output = self
            .build_command(spec)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .with_context(|| format!("failed to spawn `{}`", spec.program.display()))?;

        Ok(ExecOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Find an executable on the search path carried by an environment map.
///
/// Returns `None` when `PATH` is unset or the name does not resolve.
pub fn find_in_path(name: &str, env: &Environment) -> Option<PathBuf> {
    let paths = env.get("PATH")?;
    which::which_in(name, Some(paths), Path::new(".")).ok()
}

/// Resolve the first of several candidate tool names on the search path.
pub fn find_first_in_path(names: &[&str], env: &Environment) -> Option<PathBuf> {
    names.iter().find_map(|name| find_in_path(name, env))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let spec = CommandSpec::new("gcc").args(["-Wall", "-o", "output", "input.c"]);
        assert_eq!(spec.display(), "gcc -Wall -o output input.c");
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_captures_output() {
        let runner = ProcessRunner::new(std::env::temp_dir(), Environment::from_process());
        let out = runner.run(&CommandSpec::new("echo").arg("hello")).unwrap();

        assert!(out.success());
        assert!(out.stdout_lossy().contains("hello"));
    }

    #[cfg(unix)]
    #[test]
    fn test_process_runner_reports_failure() {
        let runner = ProcessRunner::new(std::env::temp_dir(), Environment::from_process());
        let out = runner
            .run(&CommandSpec::new("sh").args(["-c", "exit 3"]))
            .unwrap();

        assert!(!out.success());
        assert_eq!(out.code, Some(3));
    }

    #[test]
    fn test_find_in_path_unset() {
        let env = Environment::new();
        assert!(find_in_path("cc", &env).is_none());
    }
}
