//! Test utilities for bosun-hooks unit tests.
//!
//! The central piece is [`RecordingExecutor`], an [`Executor`] that captures
//! every assembled command instead of spawning processes, so tests can
//! assert exact command lines without a toolchain installed.

use std::sync::Mutex;

use anyhow::Result;

use crate::util::process::{CommandSpec, ExecOutput, Executor};

/// Executor that records commands instead of running them.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    commands: Mutex<Vec<CommandSpec>>,
    fail_all: bool,
}

impl RecordingExecutor {
    /// Create an executor where every command succeeds.
    pub fn new() -> Self {
        RecordingExecutor::default()
    }

    /// Create an executor where every command exits non-zero.
    pub fn failing() -> Self {
        RecordingExecutor {
            commands: Mutex::new(Vec::new()),
            fail_all: true,
        }
    }

    /// All commands recorded so far.
    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.lock().unwrap().clone()
    }

    /// Recorded commands as display strings.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands().iter().map(CommandSpec::display).collect()
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, spec: &CommandSpec) -> Result<ExecOutput> {
        self.commands.lock().unwrap().push(spec.clone());
        if self.fail_all {
            Ok(ExecOutput {
                code: Some(1),
                stdout: Vec::new(),
                stderr: b"simulated failure".to_vec(),
            })
        } else {
            Ok(ExecOutput::ok())
        }
    }
}

/// Initialize tracing output for a test, honoring `RUST_LOG`.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
